//! CSV output in a configurable text encoding.
//!
//! The spreadsheet tooling these files feed expects CP949, so the document
//! is rendered with the `csv` crate as UTF-8 and then re-encoded as a
//! whole. Encoding is strict: a character with no mapping in the target
//! encoding fails the write instead of being replaced.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use encoding_rs::Encoding;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

use crate::error::{Result, ScrapeError};
use crate::models::StoreRecord;

/// Render `header` and `records` as CSV text.
///
/// Fields are quoted only when needed and rows end in CRLF.
pub fn render(header: &[&str], records: &[StoreRecord]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for record in records {
        writer.write_record(record.to_csv_record())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ScrapeError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ScrapeError::Io(std::io::Error::other(e)))
}

/// Encode `text` with `encoding`, failing on any unmappable character.
pub fn encode_strict(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>> {
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(ScrapeError::Unencodable {
            encoding: encoding.name(),
        });
    }
    Ok(bytes.into_owned())
}

/// Write `records` under `header` to `path`, encoded with `encoding`.
#[instrument(level = "info", skip(header, records, encoding), fields(path = %path.display(), rows = records.len()))]
pub async fn write_records(
    path: &Path,
    header: &[&str],
    records: &[StoreRecord],
    encoding: &'static Encoding,
) -> Result<()> {
    let text = render(header, records)?;
    let bytes = encode_strict(&text, encoding)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, &bytes).await?;
    info!(bytes = bytes.len(), encoding = encoding.name(), "Wrote CSV");
    Ok(())
}
