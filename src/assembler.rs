//! Contract assembly: template acquisition, field iteration, and output
//! naming.
//!
//! Assembly degrades rather than fails: a field that cannot be rendered
//! is skipped with a log line, and a missing or invalid template falls
//! back to a synthesized blank page set when the options allow it. The
//! only fatal error is [`TemplateUnavailable`], raised when the template
//! cannot be used and the fallback is disabled.

use chrono::{Datelike, Local, NaiveDate};
use log::{info, warn};
use thiserror::Error;
use uuid::Uuid;

use crate::anchors::{FieldAnchor, PageSelector};
use crate::dates::{add_months_clamped, format_long, Locale};
use crate::options::{RenderOptions, TemplateSource};
use crate::overrides::OverrideStore;
use crate::pdf::{DocumentSurface, SurfaceError};
use crate::record::{ApplicantRecord, PlanKind};
use crate::render::{self, FieldValue, RectangleRenderer};
use crate::sanitize::{RedactionConfig, Redactor};

const FOLIO_PREFIX: &str = "CEEA";
const FILENAME_PREFIX: &str = "Contrato";
const NO_DETAIL: &str = "NO APLICA";
const WATERMARK_LABEL: &str = "DOCUMENTO PRELIMINAR";
const MISSING_TEMPLATE_BANNER: &str = "PLANTILLA OFICIAL NO DISPONIBLE";
const FALLBACK_HEADING: &str = "CONTRATO DE PRESTACION DE SERVICIOS EDUCATIVOS";

/// The template could not be used and the blank fallback was disabled.
#[derive(Debug, Error)]
pub enum TemplateUnavailable {
    #[error("no contract template is configured")]
    Missing,
    #[error("template could not be read: {0}")]
    Unreadable(#[source] std::io::Error),
    #[error("template bytes do not start with a PDF signature")]
    BadSignature,
    #[error("template content type {0:?} is not application/pdf")]
    ContentType(String),
    #[error("template could not be processed: {0}")]
    Malformed(#[source] SurfaceError),
    /// The surface was healthy but the final byte stream could not be
    /// produced; distinct from the template-side variants so the message
    /// does not blame a template that loaded fine.
    #[error("assembled document could not be serialized: {0}")]
    Serialize(#[source] SurfaceError),
}

/// A finished contract ready to be stored or sent to the client.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub folio: String,
}

/// Stateful assembler: calibration store, sanitizer, and date locale are
/// built once and reused across requests.
pub struct ContractAssembler {
    overrides: OverrideStore,
    redactor: Redactor,
    locale: Locale,
}

impl ContractAssembler {
    /// Assembler with the file-backed override store named by
    /// `CONTRACT_OVERRIDES_PATH` and the default redaction rules.
    pub fn new() -> Self {
        Self::with_store(OverrideStore::from_env())
    }

    pub fn with_store(overrides: OverrideStore) -> Self {
        Self {
            overrides,
            redactor: Redactor::default(),
            locale: Locale::default(),
        }
    }

    pub fn with_redaction(mut self, config: &RedactionConfig) -> Self {
        self.redactor = Redactor::from_config(config);
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn overrides(&self) -> &OverrideStore {
        &self.overrides
    }

    /// Record a corrected anchor point for `key`; takes effect on the next
    /// assembly and persists through the configured sink.
    pub fn calibrate(&self, key: &str, x: f32, y: f32) {
        self.overrides.set(key, x, y);
    }

    /// Drop every calibration override, restoring the built-in anchors.
    pub fn reset_calibration(&self) {
        self.overrides.clear_all();
    }

    /// Produce the contract for `record`. Field-level problems degrade
    /// silently; only an unusable template with the fallback disabled
    /// fails the call.
    pub fn assemble(
        &self,
        record: &ApplicantRecord,
        options: &RenderOptions,
    ) -> Result<AssembledDocument, TemplateUnavailable> {
        let issue_date = Local::now().date_naive();
        let folio = record
            .folio
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| generate_folio(issue_date));

        let mut surface = match self.load_template(options) {
            Ok(surface) => surface,
            Err(err) if options.allow_blank_fallback => {
                warn!("contract template unavailable, using blank fallback: {err}");
                let mut surface = DocumentSurface::blank(FieldAnchor::max_page_index() + 1);
                render::stamp_fallback_heading(&mut surface, FALLBACK_HEADING);
                if options.show_missing_template_banner {
                    render::stamp_banner(&mut surface, MISSING_TEMPLATE_BANNER);
                }
                surface
            }
            Err(err) => return Err(err),
        };

        let plan = PlanKind::from_raw(&record.plan);
        let renderer = RectangleRenderer {
            overrides: &self.overrides,
            redactor: &self.redactor,
        };
        for anchor in FieldAnchor::all() {
            let Some(value) = self.value_for(anchor, record, plan, &folio, issue_date, options)
            else {
                continue;
            };
            for page in pages_for(anchor.page_selector(), surface.page_count()) {
                renderer.render(&mut surface, page, anchor, &value, options);
            }
        }

        if options.watermark {
            render::stamp_watermark(&mut surface, WATERMARK_LABEL);
        }

        let bytes = surface.finish().map_err(TemplateUnavailable::Serialize)?;
        let filename = build_filename(&folio, &record.full_name());
        info!("assembled contract {folio} ({} bytes)", bytes.len());
        Ok(AssembledDocument {
            bytes,
            filename,
            folio,
        })
    }

    fn load_template(
        &self,
        options: &RenderOptions,
    ) -> Result<DocumentSurface, TemplateUnavailable> {
        if matches!(options.template, TemplateSource::None) {
            return Err(TemplateUnavailable::Missing);
        }
        let (bytes, content_type) = options
            .template
            .fetch()
            .map_err(TemplateUnavailable::Unreadable)?;
        if content_type != "application/pdf" {
            return Err(TemplateUnavailable::ContentType(content_type));
        }
        if !bytes.starts_with(b"%PDF-") {
            return Err(TemplateUnavailable::BadSignature);
        }
        DocumentSurface::from_template(&bytes).map_err(TemplateUnavailable::Malformed)
    }

    /// Resolve the value for one anchor, honoring the display gates.
    /// `None` means the anchor renders nothing for this record.
    fn value_for(
        &self,
        anchor: FieldAnchor,
        record: &ApplicantRecord,
        plan: Option<PlanKind>,
        folio: &str,
        issue_date: NaiveDate,
        options: &RenderOptions,
    ) -> Option<FieldValue> {
        use FieldAnchor::*;
        let text = |s: String| Some(FieldValue::Text(s));
        match anchor {
            FirstName => text(record.first_name.trim().to_uppercase()),
            LastName => text(record.last_name.trim().to_uppercase()),
            AcademicLevel => options
                .show_academic_level
                .then(|| FieldValue::Text(record.academic_level.trim().to_string())),
            Email => text(record.email.trim().to_string()),
            Phone => text(record.phone.trim().to_string()),
            GuardianName => text(record.guardian_name.trim().to_uppercase()),
            GuardianPhone => text(record.guardian_phone.trim().to_string()),
            AllergyFlag => text(yes_no_literal(&record.allergy_flag)),
            AllergyDetail => text(or_no_detail(&record.allergy_detail)),
            DisabilityDetail => text(or_no_detail(&record.disability_detail)),
            PsychFollowUp => options
                .show_psych_follow_up
                .then(|| FieldValue::Text(yes_no(record.psych_follow_up))),
            UniversityPrimary => text(record.university_primary.trim().to_string()),
            UniversitySecondary => text(record.university_secondary.trim().to_string()),
            Program => text(record.program.trim().to_string()),
            OrientationFlag => text(yes_no(record.orientation)),
            Amount => options
                .show_amount
                .then(|| FieldValue::Text(record.amount.clone())),
            Folio => text(folio.to_string()),
            PlanStartMark => (plan == Some(PlanKind::Start)).then_some(FieldValue::Mark),
            PlanIntensiveMark => (plan == Some(PlanKind::Intensive)).then_some(FieldValue::Mark),
            PlanPremiumMark => (plan == Some(PlanKind::Premium)).then_some(FieldValue::Mark),
            PaymentDate(slot) => {
                if options.hide_schedule_date_mirrors {
                    return None;
                }
                let offsets = plan?.schedule_offsets();
                let offset = *offsets.get(usize::from(slot))?;
                let due = add_months_clamped(record.entry_date, offset);
                text(format_long(due, &self.locale))
            }
            EntryDateMirror => (!options.hide_entry_date_mirrors)
                .then(|| FieldValue::Text(format_long(record.entry_date, &self.locale))),
            IssueDate => options
                .show_issue_date
                .then(|| FieldValue::Text(format_long(issue_date, &self.locale))),
        }
    }
}

impl Default for ContractAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Concrete page indices an anchor renders on. Pages the document does
/// not have are skipped; templates shorter than the anchor table are a
/// supported degraded case.
fn pages_for(selector: PageSelector, page_count: usize) -> Vec<usize> {
    match selector {
        PageSelector::First => {
            if page_count > 0 {
                vec![0]
            } else {
                Vec::new()
            }
        }
        PageSelector::Index(index) => {
            if index < page_count {
                vec![index]
            } else {
                log::debug!("page {index} not present, skipping anchor");
                Vec::new()
            }
        }
        PageSelector::All => (0..page_count).collect(),
    }
}

fn yes_no(flag: bool) -> String {
    if flag { "SI" } else { "NO" }.to_string()
}

/// Normalize the free-text medical indicator to the printed literal.
fn yes_no_literal(raw: &str) -> String {
    match raw.trim().to_uppercase().as_str() {
        "SI" | "SÍ" => "SI".to_string(),
        _ => "NO".to_string(),
    }
}

fn or_no_detail(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        NO_DETAIL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Tracking code: prefix, issue year, month-day, and a random serial.
fn generate_folio(issue_date: NaiveDate) -> String {
    let raw = Uuid::new_v4();
    let bytes = raw.as_bytes();
    let serial = u32::from(u16::from_be_bytes([bytes[0], bytes[1]])) % 10_000;
    format!(
        "{FOLIO_PREFIX}-{}-{:02}{:02}-{serial:04}",
        issue_date.year(),
        issue_date.month(),
        issue_date.day()
    )
}

/// `Contrato_{folio}_{NAME}.pdf`. The name component collapses every run
/// of non-alphanumeric characters to a single underscore; the folio is
/// machine-generated and used verbatim.
fn build_filename(folio: &str, full_name: &str) -> String {
    let mut name = String::with_capacity(full_name.len());
    for ch in full_name.chars() {
        if ch.is_ascii_alphanumeric() {
            name.push(ch);
        } else if !name.ends_with('_') && !name.is_empty() {
            name.push('_');
        }
    }
    let name = name.trim_end_matches('_');
    if name.is_empty() {
        format!("{FILENAME_PREFIX}_{folio}.pdf")
    } else {
        format!("{FILENAME_PREFIX}_{folio}_{name}.pdf")
    }
}
