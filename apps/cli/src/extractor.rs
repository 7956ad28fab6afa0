//! Résumé extractor — turns an uploaded PDF into plain text, page by page
//! in document order.

use std::path::Path;

use tracing::debug;

use crate::errors::AppError;

/// True when the path's extension indicates a PDF. This is checked before
/// any byte of the file is read.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Extracts the plain text of a PDF résumé. Text fragments within a page
/// are joined with single spaces, pages with newlines.
pub async fn extract(path: &Path) -> Result<String, AppError> {
    if !is_pdf(path) {
        return Err(AppError::UnsupportedFileType(path.display().to_string()));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::ExtractionFailed(format!("reading {}: {e}", path.display())))?;

    // pdf-extract is CPU-bound and can panic on hostile files; both are
    // contained by the blocking task.
    let pages =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&bytes))
            .await
            .map_err(|e| AppError::ExtractionFailed(format!("extraction task failed: {e}")))?
            .map_err(|e| AppError::ExtractionFailed(e.to_string()))?;

    debug!("extracted {} page(s) from {}", pages.len(), path.display());
    join_pages(&pages)
}

/// Normalizes per-page fragments and joins the pages. An empty result after
/// normalization means the document had no extractable text (for example a
/// scanned-image-only PDF).
fn join_pages(pages: &[String]) -> Result<String, AppError> {
    let text = pages
        .iter()
        .map(|page| page.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n");

    if text.trim().is_empty() {
        return Err(AppError::NoExtractableText);
    }
    Ok(text)
}
