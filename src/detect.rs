//! Input sniffing: decide whether a file is worth handing to the PDF loader.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Readers accept the header anywhere in the first 1024 bytes.
const HEADER_WINDOW: usize = 1024;

/// Read the header window of a file and return the declared PDF version.
///
/// # Example
/// ```no_run
/// use pdfoutline::detect::sniff_file;
///
/// let version = sniff_file("report.pdf").unwrap();
/// println!("PDF {}", version);
/// ```
pub fn sniff_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_WINDOW);
    file.by_ref()
        .take(HEADER_WINDOW as u64)
        .read_to_end(&mut header)?;
    sniff_bytes(&header)
}

/// Find the `%PDF-x.y` marker in a byte prefix and return `x.y`.
pub fn sniff_bytes(data: &[u8]) -> Result<String> {
    let window = &data[..data.len().min(HEADER_WINDOW)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version_bytes = window
        .get(start + PDF_MAGIC.len()..start + PDF_MAGIC.len() + 3)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    match version_bytes {
        [major @ b'1'..=b'2', b'.', minor] if minor.is_ascii_digit() => {
            log::trace!("detected PDF {}.{}", *major as char, *minor as char);
            Ok(version)
        }
        _ => Err(Error::UnsupportedVersion(version)),
    }
}

/// Whether a path carries a `.pdf` extension, ignoring case.
pub fn has_pdf_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
