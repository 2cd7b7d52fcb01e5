//! Materialize stored resources into a destination.
//!
//! Plain copies are byte for byte; substituted copies rewrite snippet text.
//! Both refuse to touch an existing destination unless told to overwrite.

pub mod error;
mod ignore;
mod plan;
mod substitute;

pub use crate::ignore::Ignore;
pub use crate::plan::{CopyPlan, CopySummary, OnConflict, Step};
pub use crate::substitute::Substitutions;

use crate::error::Result;
use std::path::Path;
use tracing::instrument;

/// Copy one file to `destination` (the full target path), preserving mode
/// bits and creating parent directories.
#[instrument(skip_all, fields(source = %source.as_ref().display(), destination = %destination.as_ref().display()))]
pub fn copy_file(source: impl AsRef<Path>, destination: impl AsRef<Path>, on_conflict: OnConflict) -> Result<u64> {
    let summary = CopyPlan::file(source.as_ref(), destination.as_ref()).execute(on_conflict)?;
    Ok(summary.bytes)
}

/// Recursively copy the directory `source` into `destination`, skipping
/// entries named in `ignore`.
#[instrument(skip_all, fields(source = %source.as_ref().display(), destination = %destination.as_ref().display()))]
pub fn copy_dir(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    ignore: &Ignore,
    on_conflict: OnConflict,
) -> Result<CopySummary> {
    let summary = CopyPlan::dir(source, destination, ignore)?.execute(on_conflict)?;
    tracing::info!(files = summary.files, directories = summary.directories, "Copied directory");
    Ok(summary)
}

/// Copy a snippet's text, dropping directive lines and substituting
/// variables. Mode bits are preserved as for [`copy_file`].
#[instrument(skip_all, fields(source = %source.as_ref().display(), destination = %destination.as_ref().display()))]
pub fn copy_with_substitution(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    substitutions: &Substitutions,
    on_conflict: OnConflict,
) -> Result<u64> {
    let summary = CopyPlan::file(source.as_ref(), destination.as_ref())
        .execute_with(on_conflict, |from, to| substitute::copy_lines(from, to, substitutions))?;
    Ok(summary.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;

    #[test]
    fn test_copy_file_refuses_existing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("logger.js");
        let destination = temp_dir.path().join("project/logger.js");
        fs::write(&source, "console.log(1);\n").unwrap();

        assert_eq!(copy_file(&source, &destination, OnConflict::Fail).unwrap(), 16);
        fs::write(&destination, "local edits").unwrap();

        let err = copy_file(&source, &destination, OnConflict::Fail).unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(p) if p == &destination));
        assert_eq!(fs::read_to_string(&destination).unwrap(), "local edits");

        copy_file(&source, &destination, OnConflict::from(true)).unwrap();
        assert_eq!(fs::read_to_string(&destination).unwrap(), "console.log(1);\n");
    }

    #[test]
    fn test_copy_file_missing_source() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = copy_file(temp_dir.path().join("nope"), temp_dir.path().join("out"), OnConflict::Fail).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_copy_with_substitution_refuses_existing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("cfg.yml");
        let destination = temp_dir.path().join("out.yml");
        fs::write(&source, "# __var bl__PORT = 80\nport: bl__PORT\n").unwrap();
        fs::write(&destination, "keep").unwrap();
        let subs: Substitutions = [("bl__PORT", "8080")].into_iter().collect();

        let err = copy_with_substitution(&source, &destination, &subs, OnConflict::Fail).unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(_)));
        assert_eq!(fs::read_to_string(&destination).unwrap(), "keep");

        copy_with_substitution(&source, &destination, &subs, OnConflict::Overwrite).unwrap();
        assert_eq!(fs::read_to_string(&destination).unwrap(), "port: 8080\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_with_substitution_keeps_mode_bits() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("deploy.sh");
        let destination = temp_dir.path().join("bin/deploy.sh");
        fs::write(&source, "# __var bl__ENV = dev\ndeploy bl__ENV\n").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o750)).unwrap();
        let subs: Substitutions = [("bl__ENV", "prod")].into_iter().collect();

        copy_with_substitution(&source, &destination, &subs, OnConflict::Fail).unwrap();
        assert_eq!(fs::read_to_string(&destination).unwrap(), "deploy prod\n");
        assert_eq!(fs::metadata(&destination).unwrap().permissions().mode() & 0o777, 0o750);

        // Overwriting an existing file takes the source's mode too.
        fs::set_permissions(&destination, fs::Permissions::from_mode(0o644)).unwrap();
        copy_with_substitution(&source, &destination, &subs, OnConflict::Overwrite).unwrap();
        assert_eq!(fs::metadata(&destination).unwrap().permissions().mode() & 0o777, 0o750);
    }
}
