//! Validation error report: a one-column CSV headed `Errors`.

use std::path::Path;

use crate::error::{ExportError, ExportResult};

pub const ERRORS_HEADER: &str = "Errors";

/// Render messages as CSV bytes, one message per line.
pub fn errors_to_csv(errors: &[String]) -> ExportResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([ERRORS_HEADER])?;
    for error in errors {
        writer.write_record([error.as_str()])?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// Write the report to disk.
pub fn write_error_report(path: &Path, errors: &[String]) -> ExportResult<()> {
    std::fs::write(path, errors_to_csv(errors)?)?;
    Ok(())
}
