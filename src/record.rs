//! Applicant data consumed by the assembler.
//!
//! The record is a normalized projection of the student row built by the
//! caller; the assembler never mutates it. Free-text fields are untrusted
//! and go through the sanitizer before rendering.

use chrono::NaiveDate;
use serde::Deserialize;

/// The closed set of course plans the contract can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    Start,
    Intensive,
    Premium,
}

impl PlanKind {
    /// Parse the raw plan value from the enrollment form. Ambiguous or
    /// unrecognized values yield `None`, which renders no plan mark at all.
    pub fn from_raw(raw: &str) -> Option<PlanKind> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "START" => Some(PlanKind::Start),
            "INTENSIVO" | "INTENSIVE" => Some(PlanKind::Intensive),
            "PREMIUM" => Some(PlanKind::Premium),
            _ => None,
        }
    }

    /// Month offsets of the payment schedule, relative to the entry date.
    pub fn schedule_offsets(self) -> &'static [i32] {
        match self {
            PlanKind::Start => &[0, 1, 2, 3, 4, 5],
            PlanKind::Intensive => &[0, 1, 2],
            PlanKind::Premium => &[0],
        }
    }
}

/// Normalized applicant projection. Read-only input to the assembler.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicantRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub guardian_name: String,
    pub guardian_phone: String,
    /// Literal indicator from the medical form, e.g. "SI" / "NO".
    pub allergy_flag: String,
    pub allergy_detail: String,
    pub disability_detail: String,
    pub academic_level: String,
    pub university_primary: String,
    #[serde(default)]
    pub university_secondary: String,
    pub program: String,
    pub orientation: bool,
    pub psych_follow_up: bool,
    /// Raw plan selection; matched against [`PlanKind`] at render time.
    pub plan: String,
    /// Pre-formatted monetary amount, e.g. "$ 9,500.00 MXN".
    pub amount: String,
    /// Tracking code; generated when absent.
    #[serde(default)]
    pub folio: Option<String>,
    pub entry_date: NaiveDate,
}

impl ApplicantRecord {
    /// Full name as printed on the contract and used in the filename.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_uppercase()
    }

    /// Canned record for calibration renders: every field populated so all
    /// anchors produce visible output under debug outlines.
    pub fn sample() -> Self {
        Self {
            first_name: "MARIA JOSE".into(),
            last_name: "HERNANDEZ LOPEZ".into(),
            email: "maria.hernandez@example.com".into(),
            phone: "(287) 123-4567".into(),
            guardian_name: "JOSE HERNANDEZ".into(),
            guardian_phone: "(287) 765-4321".into(),
            allergy_flag: "SI".into(),
            allergy_detail: "PENICILINA".into(),
            disability_detail: String::new(),
            academic_level: "PREPARATORIA".into(),
            university_primary: "UNAM".into(),
            university_secondary: "IPN".into(),
            program: "MEDICINA".into(),
            orientation: true,
            psych_follow_up: false,
            plan: "START".into(),
            amount: "$ 9,500.00 MXN".into(),
            folio: Some("CEEA-2026-0801-0042".into()),
            entry_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap_or_default(),
        }
    }
}
