use std::{env, sync::Arc, time::Duration};

use ssechat_core::{
    error::{RelayError, Result},
    model::Model,
};

use crate::{client::OpenAiClient, model_map::map_model};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper that wires the HTTP client [`OpenAiClient`] into a value that
/// implements [`ssechat_core::CompletionSource`].
///
/// It stores the resolved model name and owns a shareable, connection-pooled
/// `reqwest::Client`.  Every call to `stream_completion` still opens its own
/// request; nothing but the pool is shared between sessions.
pub struct OpenAiAdapter {
    pub(crate) client: Arc<OpenAiClient>,
    pub(crate) model: String,
}

impl OpenAiAdapter {
    /// API name of the model every completion is requested from.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

/// Builder for [`OpenAiAdapter`].
///
/// # Typical usage
///
/// ```rust,no_run
/// use ssechat_openai::OpenAiAdapterBuilder;
///
/// let backend = OpenAiAdapterBuilder::new_from_env()
///     .build()
///     .expect("OPENAI_API_KEY must be set");
/// ```
#[derive(Default)]
pub struct OpenAiAdapterBuilder {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) model: Model,
    pub(crate) connect_timeout: Option<Duration>,
}

impl OpenAiAdapterBuilder {
    /// Create an *empty* builder. Remember to supply an API key manually.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor that reads `OPENAI_API_KEY` and, if present,
    /// `OPENAI_BASE_URL` from the environment.
    ///
    /// Never panics. Missing keys only surface during [`Self::build`].
    pub fn new_from_env() -> Self {
        Self {
            api_key: env::var("OPENAI_API_KEY").ok(),
            base_url: env::var("OPENAI_BASE_URL").ok(),
            ..Self::default()
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Point the adapter at a proxy, an OpenAI-compatible server or a test
    /// double.  Must include the version segment, e.g. `http://host/v1`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn model(mut self, model: impl Into<Model>) -> Self {
        self.model = model.into();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Finalise the builder and return a ready-to-use adapter.
    ///
    /// # Errors
    ///
    /// * [`RelayError::Invalid`] – if the API key is missing or blank.
    /// * [`RelayError::ModelNotSupported`] – if the model name is blank.
    /// * [`RelayError::Backend`] – if the HTTP client cannot be built.
    pub fn build(self) -> Result<OpenAiAdapter> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(RelayError::Invalid(
                "missing env variable: `OPENAI_API_KEY`".into(),
            ))?;

        let model = map_model(&self.model).ok_or_else(|| RelayError::ModelNotSupported {
            provider: "openai",
            model: self.model.to_string(),
        })?;

        let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let client = OpenAiClient::new(api_key, self.base_url, connect_timeout)?;

        Ok(OpenAiAdapter {
            client: Arc::new(client),
            model: model.into_owned(),
        })
    }
}
