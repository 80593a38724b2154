//! Model identifiers used throughout the **ssechat** workspace.
//!
//! The relay talks to exactly one model per process, picked at start-up from
//! configuration.  Well-known OpenAI models get their own enum variant so the
//! adapter can map them without string juggling; anything else travels as
//! [`Model::Custom`] and is passed through verbatim (useful for proxies and
//! OpenAI-compatible servers).
//!
//! ```rust
//! use ssechat_core::model::{Model, OpenAiModel};
//!
//! assert_eq!("gpt-4o-mini".parse::<Model>().unwrap(),
//!            Model::OpenAi(OpenAiModel::Gpt4oMini));
//! assert_eq!("llama3".parse::<Model>().unwrap(),
//!            Model::Custom("llama3".into()));
//! ```

use std::{convert::Infallible, fmt, str::FromStr};

/// Universal identifier for an LLM model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// Built-in OpenAI models (chat completion API).
    OpenAi(OpenAiModel),
    /// Any model name not covered by a dedicated enum variant.
    Custom(String),
}

impl Default for Model {
    fn default() -> Self {
        Model::OpenAi(OpenAiModel::Gpt35Turbo)
    }
}

/// Models the OpenAI back-end knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenAiModel {
    Gpt35Turbo,
    Gpt4o,
    Gpt4oMini,
}

impl OpenAiModel {
    /// Canonical API name of the model.
    pub fn as_str(self) -> &'static str {
        match self {
            OpenAiModel::Gpt35Turbo => "gpt-3.5-turbo",
            OpenAiModel::Gpt4o => "gpt-4o",
            OpenAiModel::Gpt4oMini => "gpt-4o-mini",
        }
    }
}

impl From<OpenAiModel> for Model {
    fn from(val: OpenAiModel) -> Self {
        Model::OpenAi(val)
    }
}

impl FromStr for Model {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let known = [
            OpenAiModel::Gpt35Turbo,
            OpenAiModel::Gpt4o,
            OpenAiModel::Gpt4oMini,
        ]
        .into_iter()
        .find(|m| m.as_str() == name);

        Ok(match known {
            Some(model) => Model::OpenAi(model),
            None => Model::Custom(name.to_owned()),
        })
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::OpenAi(model) => f.write_str(model.as_str()),
            Model::Custom(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_gpt_35_turbo() {
        assert_eq!(Model::default().to_string(), "gpt-3.5-turbo");
    }

    #[test]
    fn parse_trims_and_round_trips_known_names() {
        let model: Model = "  gpt-4o \n".parse().unwrap();
        assert_eq!(model, Model::OpenAi(OpenAiModel::Gpt4o));
        assert_eq!(model.to_string(), "gpt-4o");
    }

    #[test]
    fn unknown_names_become_custom() {
        let model: Model = "mistral-small".parse().unwrap();
        assert_eq!(model, Model::Custom("mistral-small".into()));
    }
}
