use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use super::{ExtractionError, OcrEngine};

/// OCR through the `pdftoppm` (poppler-utils) and `tesseract` command-line tools.
pub struct TesseractOcr {
    dpi: u32,
    lang: String,
}

impl TesseractOcr {
    pub fn new(dpi: u32, lang: impl Into<String>) -> Self {
        Self {
            dpi,
            lang: lang.into(),
        }
    }

    /// Check if both external tools can be spawned.
    pub fn is_available() -> bool {
        let pdftoppm = Command::new("pdftoppm").arg("-v").output().is_ok();
        let tesseract = Command::new("tesseract").arg("--version").output().is_ok();

        if !pdftoppm {
            debug!("pdftoppm not found - install poppler-utils for OCR support");
        }
        if !tesseract {
            debug!("tesseract not found - install tesseract-ocr for OCR support");
        }

        pdftoppm && tesseract
    }

    /// Renders every page of `path` to a PNG inside `out_dir`, in page order.
    fn render_pages(&self, path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(path)
            .arg(out_dir.join("page"))
            .output()
            .map_err(|_| ExtractionError::ToolUnavailable("pdftoppm"))?;

        if !output.status.success() {
            return Err(ExtractionError::Tool {
                tool: "pdftoppm",
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let mut images: Vec<PathBuf> = std::fs::read_dir(out_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .collect();
        images.sort_by_key(|p| page_number(p));

        Ok(images)
    }

    fn recognize_image(&self, image: &Path) -> Result<String, ExtractionError> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .map_err(|_| ExtractionError::ToolUnavailable("tesseract"))?;

        if !output.status.success() {
            return Err(ExtractionError::Tool {
                tool: "tesseract",
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize_pages(&self, path: &Path) -> Result<Vec<String>, ExtractionError> {
        let temp_dir = tempfile::tempdir()?;
        let images = self.render_pages(path, temp_dir.path())?;

        if images.is_empty() {
            return Err(ExtractionError::Tool {
                tool: "pdftoppm",
                message: "produced no images".to_string(),
            });
        }

        info!(
            "Rendered {} pages at {} dpi, running OCR (lang={})",
            images.len(),
            self.dpi,
            self.lang
        );

        let mut pages = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            match self.recognize_image(image) {
                Ok(text) => pages.push(text),
                // A missing binary will fail every page the same way.
                Err(e @ ExtractionError::ToolUnavailable(_)) => return Err(e),
                Err(e) => {
                    warn!("OCR failed on page {}: {e}", i + 1);
                    pages.push(String::new());
                }
            }
        }

        Ok(pages)
    }
}

/// `page-07.png` → 7. Files without a trailing number sort last.
fn page_number(path: &Path) -> u32 {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.rsplit('-').next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_parses_pdftoppm_names() {
        assert_eq!(page_number(Path::new("/tmp/x/page-1.png")), 1);
        assert_eq!(page_number(Path::new("/tmp/x/page-012.png")), 12);
        assert_eq!(page_number(Path::new("/tmp/x/cover.png")), u32::MAX);
    }

    #[test]
    fn test_page_order_is_numeric_not_lexicographic() {
        let mut images = vec![
            PathBuf::from("page-10.png"),
            PathBuf::from("page-2.png"),
            PathBuf::from("page-1.png"),
        ];
        images.sort_by_key(|p| page_number(p));
        assert_eq!(
            images,
            vec![
                PathBuf::from("page-1.png"),
                PathBuf::from("page-2.png"),
                PathBuf::from("page-10.png"),
            ]
        );
    }

    #[test]
    fn test_missing_pdf_never_panics() {
        let ocr = TesseractOcr::new(150, "eng");
        // Either the tools are absent or pdftoppm rejects the path; both are errors.
        assert!(ocr
            .recognize_pages(Path::new("/definitely/not/here.pdf"))
            .is_err());
    }
}
