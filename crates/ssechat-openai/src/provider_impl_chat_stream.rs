use std::pin::Pin;
use std::sync::Arc;

use crate::OpenAiAdapter;
use crate::api_v1::ChatCompletionRequest;
use crate::client::OpenAiClient;
use futures_core::stream::Stream;
use ssechat_core::delta::{CompletionPrompt, DeltaEvent};
use ssechat_core::error::{RelayError, Result};
use ssechat_core::provider::CompletionSource;

impl CompletionSource for OpenAiAdapter {
    type Deltas = Pin<Box<dyn Stream<Item = Result<DeltaEvent>> + Send + 'static>>;

    fn stream_completion(&self, prompt: CompletionPrompt) -> Self::Deltas {
        let request = ChatCompletionRequest::single_prompt(self.model.clone(), prompt.into_inner());
        Box::pin(delta_stream(Arc::clone(&self.client), request))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

fn delta_stream(
    client: Arc<OpenAiClient>,
    request: ChatCompletionRequest,
) -> impl Stream<Item = Result<DeltaEvent>> + Send + 'static {
    async_stream::try_stream! {
        use futures_util::StreamExt;

        let stream = client.chat_completion_stream(request);
        futures_util::pin_mut!(stream);

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(RelayError::from)?;
            // Only the first choice is relayed; chunks without text are role
            // announcements or finish markers.
            if let Some(delta) = chunk.first_content().and_then(|text| DeltaEvent::non_empty(text)) {
                yield delta;
            }
        }
    }
}
