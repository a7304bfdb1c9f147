//! Raw text extraction for PDF and plain-text inputs.
//!
//! PDF pages are concatenated in order with a `--- Page N ---` marker before
//! each page so the cleaner can reason about per-page boilerplate. Plain text
//! is read as UTF-8 with a Latin-1 fallback for legacy exports.

use std::fs;
use std::path::Path;

use super::types::ExtractError;

/// Extract raw text from a supported input file.
///
/// `.pdf` goes through the PDF library page by page; `.txt` is read directly.
/// Any other extension is rejected with [`ExtractError::UnsupportedFormat`].
pub fn extract(path: &Path) -> Result<String, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => extract_pdf(path),
        "txt" => read_text(path),
        other => Err(ExtractError::UnsupportedFormat(other.to_string())),
    }
}

/// Extract a PDF page by page, emitting a page-boundary marker before each page.
pub fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|error| ExtractError::Pdf(error.to_string()))?;

    tracing::debug!(path = %path.display(), pages = pages.len(), "Extracted PDF");

    let mut text = String::new();
    for (index, page) in pages.iter().enumerate() {
        text.push_str(&format!("\n--- Page {} ---\n", index + 1));
        text.push_str(page);
    }
    Ok(text)
}

fn read_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(error) => {
            tracing::debug!(
                path = %path.display(),
                "Input is not valid UTF-8; decoding as Latin-1"
            );
            Ok(latin1_to_string(error.as_bytes()))
        }
    }
}

fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_utf8_text_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "hello résumé").unwrap();
        let text = extract(file.path()).unwrap();
        assert_eq!(text, "hello résumé");
    }

    #[test]
    fn falls_back_to_latin1_for_invalid_utf8() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        // 0xE9 is 'é' in Latin-1 but an invalid UTF-8 sequence on its own.
        file.write_all(b"caf\xE9").unwrap();
        let text = extract(file.path()).unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn missing_file_is_not_found() {
        let error = extract(Path::new("does/not/exist.txt")).unwrap_err();
        assert!(matches!(error, ExtractError::NotFound(_)));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        let error = extract(file.path()).unwrap_err();
        assert!(matches!(error, ExtractError::UnsupportedFormat(ext) if ext == "docx"));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let mut file = tempfile::Builder::new().suffix(".TXT").tempfile().unwrap();
        write!(file, "upper").unwrap();
        assert_eq!(extract(file.path()).unwrap(), "upper");
    }
}
