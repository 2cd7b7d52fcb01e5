pub mod error;
mod index;
mod name;
mod validate;
mod version;

pub use crate::index::{INDEX_FILE_NAME, Index, Kind};
pub use crate::name::{ResourceName, base_name, extension_of, full_key, snippet_key, stack_key};
pub use crate::validate::{validate as validate_name, validate_stack};
pub use crate::version::Version;
