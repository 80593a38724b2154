use std::borrow::Cow;

use ssechat_core::model::Model;

pub(crate) fn map_model(model: &Model) -> Option<Cow<'static, str>> {
    match model {
        Model::OpenAi(openai_model) => Some(openai_model.as_str().into()),
        Model::Custom(custom) if !custom.trim().is_empty() => Some(custom.clone().into()),
        Model::Custom(_) => None,
    }
}
