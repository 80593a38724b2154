mod common;
mod chat_completion;
mod chat_completion_stream;

pub use chat_completion::*;
pub use chat_completion_stream::*;
