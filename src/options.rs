//! Assembly configuration.

use std::fs;
use std::io;
use std::path::PathBuf;

/// Where the template bytes come from.
///
/// The owning HTTP layer may have already fetched the bytes (upload,
/// remote storage) or may only know a filesystem path; both forms carry a
/// declared content type that is validated together with the magic bytes.
#[derive(Debug, Clone, Default)]
pub enum TemplateSource {
    /// No template configured; assembly relies on the blank fallback.
    #[default]
    None,
    /// Read from the filesystem; content type guessed from the extension.
    Path(PathBuf),
    /// Raw bytes with the content type the producer declared.
    Bytes {
        bytes: Vec<u8>,
        content_type: String,
    },
}

impl TemplateSource {
    /// Fetch the raw bytes plus declared content type.
    pub(crate) fn fetch(&self) -> io::Result<(Vec<u8>, String)> {
        match self {
            TemplateSource::None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "no template source configured",
            )),
            TemplateSource::Path(path) => {
                let bytes = fs::read(path)?;
                let content_type = mime_guess::from_path(path)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string();
                Ok((bytes, content_type))
            }
            TemplateSource::Bytes {
                bytes,
                content_type,
            } => Ok((bytes.clone(), content_type.clone())),
        }
    }
}

/// Named toggles controlling which blocks are rendered and how failures
/// degrade. Defaults: every optional display block off except the amount;
/// blank fallback allowed.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub show_amount: bool,
    pub show_academic_level: bool,
    pub show_psych_follow_up: bool,
    /// First-page issue-date block.
    pub show_issue_date: bool,
    /// Hide the entry-date mirror printed on every page's signature line.
    pub hide_entry_date_mirrors: bool,
    /// Hide the payment-schedule date slots.
    pub hide_schedule_date_mirrors: bool,
    /// Stroke each anchor rectangle; calibration diagnostic only.
    pub debug_outlines: bool,
    /// Diagonal low-opacity label on every page.
    pub watermark: bool,
    pub template: TemplateSource,
    pub allow_blank_fallback: bool,
    /// Stamp a visible diagnostic banner when the fallback page set is
    /// used in place of the real template.
    pub show_missing_template_banner: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_amount: true,
            show_academic_level: false,
            show_psych_follow_up: false,
            show_issue_date: false,
            hide_entry_date_mirrors: false,
            hide_schedule_date_mirrors: false,
            debug_outlines: false,
            watermark: false,
            template: TemplateSource::None,
            allow_blank_fallback: true,
            show_missing_template_banner: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy() {
        let options = RenderOptions::default();
        assert!(options.show_amount);
        assert!(!options.show_academic_level);
        assert!(!options.show_psych_follow_up);
        assert!(!options.show_issue_date);
        assert!(options.allow_blank_fallback);
        assert!(!options.watermark);
        assert!(!options.debug_outlines);
    }

    #[test]
    fn missing_source_is_a_not_found_error() {
        let err = TemplateSource::None.fetch().unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn byte_source_passes_declared_content_type() {
        let source = TemplateSource::Bytes {
            bytes: b"%PDF-1.4".to_vec(),
            content_type: "application/pdf".into(),
        };
        let (bytes, content_type) = source.fetch().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(content_type, "application/pdf");
    }
}
