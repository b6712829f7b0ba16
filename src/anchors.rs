//! Built-in field anchors of the contract template.
//!
//! Every fillable region of the official template is one variant of
//! [`FieldAnchor`]: a closed set, so a typo in a field name is a compile
//! error instead of a silently dead map entry. The override store stays
//! keyed by each variant's string key for persistence compatibility with
//! the calibration tool.
//!
//! Bounds are authored in top-left-origin units (the calibration tool's
//! output) and translated per page at render time.

use crate::geometry::FieldRect;

/// Number of payment-schedule rows printed on the template.
pub const SCHEDULE_SLOTS: u8 = 6;

/// Which page(s) of the template an anchor applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelector {
    /// First page only.
    First,
    /// A specific zero-based page index.
    Index(usize),
    /// Mirrored onto every page of the document.
    All,
}

/// How the anchor's value is produced and drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    /// Sanitized, fitted text.
    Text,
    /// A literal check glyph; skips the sanitizer.
    Mark,
    /// Text computed by the date sequence generator.
    DateSequence,
}

/// A named fillable region of the contract template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAnchor {
    FirstName,
    LastName,
    AcademicLevel,
    Email,
    Phone,
    GuardianName,
    GuardianPhone,
    AllergyFlag,
    AllergyDetail,
    DisabilityDetail,
    PsychFollowUp,
    UniversityPrimary,
    UniversitySecondary,
    Program,
    OrientationFlag,
    Amount,
    Folio,
    PlanStartMark,
    PlanIntensiveMark,
    PlanPremiumMark,
    /// One row of the payment schedule, zero-based.
    PaymentDate(u8),
    EntryDateMirror,
    IssueDate,
}

impl FieldAnchor {
    /// Every declared anchor, schedule slots included.
    pub fn all() -> Vec<FieldAnchor> {
        use FieldAnchor::*;
        let mut anchors = vec![
            FirstName,
            LastName,
            AcademicLevel,
            Email,
            Phone,
            GuardianName,
            GuardianPhone,
            AllergyFlag,
            AllergyDetail,
            DisabilityDetail,
            PsychFollowUp,
            UniversityPrimary,
            UniversitySecondary,
            Program,
            OrientationFlag,
            Amount,
            Folio,
            PlanStartMark,
            PlanIntensiveMark,
            PlanPremiumMark,
        ];
        anchors.extend((0..SCHEDULE_SLOTS).map(PaymentDate));
        anchors.push(EntryDateMirror);
        anchors.push(IssueDate);
        anchors
    }

    /// Stable string key; what the override sink and the calibration tool
    /// use to refer to this anchor.
    pub fn key(&self) -> String {
        use FieldAnchor::*;
        match self {
            FirstName => "first_name".into(),
            LastName => "last_name".into(),
            AcademicLevel => "academic_level".into(),
            Email => "email".into(),
            Phone => "phone".into(),
            GuardianName => "guardian_name".into(),
            GuardianPhone => "guardian_phone".into(),
            AllergyFlag => "allergy_flag".into(),
            AllergyDetail => "allergy_detail".into(),
            DisabilityDetail => "disability_detail".into(),
            PsychFollowUp => "psych_follow_up".into(),
            UniversityPrimary => "university_primary".into(),
            UniversitySecondary => "university_secondary".into(),
            Program => "program".into(),
            OrientationFlag => "orientation_flag".into(),
            Amount => "amount".into(),
            Folio => "folio".into(),
            PlanStartMark => "plan_start_mark".into(),
            PlanIntensiveMark => "plan_intensive_mark".into(),
            PlanPremiumMark => "plan_premium_mark".into(),
            PaymentDate(i) => format!("payment_date_{}", i + 1),
            EntryDateMirror => "entry_date".into(),
            IssueDate => "issue_date".into(),
        }
    }

    pub fn page_selector(&self) -> PageSelector {
        use FieldAnchor::*;
        match self {
            Folio | EntryDateMirror => PageSelector::All,
            PlanStartMark | PlanIntensiveMark | PlanPremiumMark | PaymentDate(_) => {
                PageSelector::Index(1)
            }
            _ => PageSelector::First,
        }
    }

    pub fn render_kind(&self) -> RenderKind {
        use FieldAnchor::*;
        match self {
            PlanStartMark | PlanIntensiveMark | PlanPremiumMark => RenderKind::Mark,
            PaymentDate(_) | EntryDateMirror | IssueDate => RenderKind::DateSequence,
            _ => RenderKind::Text,
        }
    }

    /// Whether an opaque mask is painted over the template content before
    /// the value is drawn. Only the amount box carries a pre-printed
    /// placeholder that has to be hidden.
    pub fn overlay(&self) -> bool {
        matches!(self, FieldAnchor::Amount)
    }

    /// Calibrated bounds, top-left origin.
    pub fn bounds(&self) -> FieldRect {
        use FieldAnchor::*;
        match self {
            FirstName => FieldRect::new(95.0, 148.0, 290.0, 162.0),
            LastName => FieldRect::new(320.0, 148.0, 540.0, 162.0),
            AcademicLevel => FieldRect::new(95.0, 170.0, 290.0, 184.0),
            Email => FieldRect::new(95.0, 192.0, 330.0, 206.0),
            Phone => FieldRect::new(360.0, 192.0, 540.0, 206.0),
            GuardianName => FieldRect::new(95.0, 214.0, 360.0, 228.0),
            GuardianPhone => FieldRect::new(400.0, 214.0, 540.0, 228.0),
            AllergyFlag => FieldRect::new(95.0, 236.0, 150.0, 250.0),
            AllergyDetail => FieldRect::new(165.0, 236.0, 420.0, 250.0),
            DisabilityDetail => FieldRect::new(95.0, 258.0, 420.0, 272.0),
            PsychFollowUp => FieldRect::new(460.0, 258.0, 540.0, 272.0),
            UniversityPrimary => FieldRect::new(95.0, 292.0, 330.0, 306.0),
            UniversitySecondary => FieldRect::new(360.0, 292.0, 540.0, 306.0),
            Program => FieldRect::new(95.0, 314.0, 330.0, 328.0),
            OrientationFlag => FieldRect::new(460.0, 314.0, 540.0, 328.0),
            Amount => FieldRect::new(350.0, 358.0, 540.0, 376.0),
            Folio => FieldRect::new(430.0, 60.0, 560.0, 76.0),
            PlanStartMark => FieldRect::new(110.0, 210.0, 126.0, 226.0),
            PlanIntensiveMark => FieldRect::new(110.0, 240.0, 126.0, 256.0),
            PlanPremiumMark => FieldRect::new(110.0, 270.0, 126.0, 286.0),
            PaymentDate(i) => {
                let row = f32::from(*i) * 22.0;
                FieldRect::new(150.0, 330.0 + row, 320.0, 344.0 + row)
            }
            EntryDateMirror => FieldRect::new(95.0, 700.0, 300.0, 714.0),
            IssueDate => FieldRect::new(95.0, 740.0, 300.0, 754.0),
        }
    }

    /// Highest zero-based page index any declared anchor refers to.
    /// The blank fallback synthesizes enough pages to cover this.
    pub fn max_page_index() -> usize {
        Self::all()
            .iter()
            .map(|a| match a.page_selector() {
                PageSelector::Index(i) => i,
                _ => 0,
            })
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique() {
        let anchors = FieldAnchor::all();
        let keys: HashSet<String> = anchors.iter().map(|a| a.key()).collect();
        assert_eq!(keys.len(), anchors.len());
    }

    #[test]
    fn bounds_are_well_formed() {
        for anchor in FieldAnchor::all() {
            let r = anchor.bounds();
            assert!(r.x2 >= r.x1, "{:?}", anchor);
            assert!(r.y2 >= r.y1, "{:?}", anchor);
        }
    }

    #[test]
    fn schedule_slots_stack_downward() {
        let first = FieldAnchor::PaymentDate(0).bounds();
        let second = FieldAnchor::PaymentDate(1).bounds();
        assert!(second.y1 > first.y1);
        assert_eq!(second.x1, first.x1);
    }

    #[test]
    fn fallback_covers_second_page() {
        assert_eq!(FieldAnchor::max_page_index(), 1);
    }

    #[test]
    fn plan_marks_skip_the_sanitizer_path() {
        assert_eq!(FieldAnchor::PlanStartMark.render_kind(), RenderKind::Mark);
        assert!(!FieldAnchor::PlanStartMark.overlay());
    }
}
