mod consts;
mod directive;
pub mod error;
mod metadata;
pub mod stack;

pub use crate::directive::is_directive_line;
pub use crate::metadata::{SnippetMetadata, extract};
pub use crate::stack::StackConfig;
