//! Hosted text-generation providers.

pub mod claude;
pub mod deepseek;
pub(crate) mod http;
pub mod openai;
pub mod provider;
pub mod qwen;

pub use http::trim_blank_lines;
pub use provider::{CommitProvider, create_provider};
