//! CSV export of page results

use crate::output::traits::{OutputResult, PageResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column headers of the tabular export
pub const CSV_HEADERS: [&str; 2] = ["URL", "Content"];

/// Writes one row per page result, after a `URL,Content` header
pub fn write_csv<W: Write>(writer: W, results: &[PageResult]) -> OutputResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(CSV_HEADERS)?;

    for page in results {
        writer.write_record([page.url.as_str(), page.text.as_str()])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the tabular export to `path`
pub fn save_csv(path: &Path, results: &[PageResult]) -> OutputResult<()> {
    let file = File::create(path)?;
    write_csv(file, results)?;
    tracing::debug!("Wrote {} rows to {}", results.len(), path.display());
    Ok(())
}
