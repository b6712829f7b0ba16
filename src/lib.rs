//! Contract document assembly for the enrollment office.
//!
//! The crate fills the official enrollment contract template from an
//! applicant record: field anchors calibrated in top-left coordinates,
//! runtime position overrides, credential redaction, box-constrained
//! text fitting, payment-schedule date generation, and a degraded blank
//! fallback when the template itself is unavailable.

pub mod anchors;
pub mod assembler;
pub mod dates;
pub mod fonts;
pub mod geometry;
pub mod options;
pub mod overrides;
pub mod pdf;
pub mod record;
mod render;
pub mod sanitize;
pub mod textfit;

pub use crate::anchors::{FieldAnchor, PageSelector, RenderKind, SCHEDULE_SLOTS};
pub use crate::assembler::{AssembledDocument, ContractAssembler, TemplateUnavailable};
pub use crate::dates::Locale;
pub use crate::fonts::{Face, FontMetrics};
pub use crate::geometry::{FieldRect, NativeRect};
pub use crate::options::{RenderOptions, TemplateSource};
pub use crate::overrides::{FileSink, MemorySink, OverridePoint, OverrideSink, OverrideStore};
pub use crate::pdf::DocumentSurface;
pub use crate::record::{ApplicantRecord, PlanKind};
pub use crate::sanitize::{RedactionConfig, Redactor};
pub use crate::textfit::{FittedText, MIN_FIT_SIZE};
