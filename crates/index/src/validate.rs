//! Base name validation.
//!
//! Base names end up both inside index keys and as file/directory names in
//! the store, so they must be a single, plain path segment.

use std::path::{Component, Path};

use crate::error::{ErrorKind, Result};
use crate::name::extension_of;

/// Validates a base name before it is used to build an index key.
///
/// > **Note:** [`ResourceName::parse`](crate::ResourceName::parse) stays total
/// >           and never calls this; only the store path validates.
///
/// # Returns
/// Returns the trimmed name if valid, or [`InvalidName`](crate::error::ErrorKind::InvalidName)
/// if invalid.
///
/// # Examples
///
/// ```
/// use boiler_index::validate_name;
/// // Valid names
/// assert!(validate_name("logger").is_ok());
/// assert!(validate_name("express-api").is_ok());
/// assert_eq!(validate_name("  spaced  ").unwrap(), "spaced");
/// // Invalid names
/// assert!(validate_name("").is_err());
/// assert!(validate_name("logger@2").is_err());
/// assert!(validate_name("nested/name").is_err());
/// assert!(validate_name("..").is_err());
/// ```
pub fn validate(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let invalid = || ErrorKind::InvalidName(name.to_string());
    // The version separator would make the key ambiguous to parse back.
    if trimmed.is_empty() || trimmed.contains('@') || trimmed.contains('\\') {
        exn::bail!(invalid());
    }
    let mut components = Path::new(trimmed).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(segment)), None) => {
            // Path::components() lets NUL through; syscalls would truncate at it.
            if segment.as_encoded_bytes().contains(&0) || segment != trimmed {
                exn::bail!(invalid());
            }
            Ok(trimmed)
        },
        _ => exn::bail!(invalid()),
    }
}

/// Validates a stack base name.
///
/// Stack keys carry no extension, so a dotted name such as `my.config` would
/// read back as a snippet. Those are rejected on top of [`validate`].
pub fn validate_stack(name: &str) -> Result<&str> {
    let trimmed = validate(name)?;
    if extension_of(trimmed).is_some() {
        exn::bail!(ErrorKind::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}
