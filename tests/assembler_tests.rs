mod common;

use academy_contracts::{
    ApplicantRecord, ContractAssembler, OverrideStore, RenderOptions, TemplateSource,
    TemplateUnavailable,
};
use chrono::NaiveDate;
use common::{page_content, page_count, template_bytes};

fn assembler() -> ContractAssembler {
    ContractAssembler::with_store(OverrideStore::in_memory())
}

fn options_with_template(pages: usize) -> RenderOptions {
    RenderOptions {
        template: TemplateSource::Bytes {
            bytes: template_bytes(pages),
            content_type: "application/pdf".into(),
        },
        ..Default::default()
    }
}

#[test]
fn fills_a_two_page_template() {
    let record = ApplicantRecord::sample();
    let output = assembler()
        .assemble(&record, &options_with_template(2))
        .unwrap();

    assert_eq!(page_count(&output.bytes), 2);
    let first = page_content(&output.bytes, 1);
    let second = page_content(&output.bytes, 2);

    assert!(first.contains("(MARIA JOSE) Tj"));
    assert!(first.contains("(HERNANDEZ LOPEZ) Tj"));
    assert!(first.contains("(PENICILINA) Tj"));
    // The folio mirrors onto every page.
    assert!(first.contains("(CEEA-2026-0801-0042) Tj"));
    assert!(second.contains("(CEEA-2026-0801-0042) Tj"));
}

#[test]
fn start_plan_marks_exactly_one_checkbox() {
    let mut record = ApplicantRecord::sample();
    record.plan = "START".into();
    let output = assembler()
        .assemble(&record, &options_with_template(2))
        .unwrap();
    let second = page_content(&output.bytes, 2);
    assert_eq!(second.matches("(X) Tj").count(), 1);
}

#[test]
fn start_plan_renders_six_schedule_dates() {
    let mut record = ApplicantRecord::sample();
    record.plan = "START".into();
    record.entry_date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
    let output = assembler()
        .assemble(&record, &options_with_template(2))
        .unwrap();
    let second = page_content(&output.bytes, 2);
    for expected in [
        "(01 AGOSTO 2026) Tj",
        "(01 SEPTIEMBRE 2026) Tj",
        "(01 OCTUBRE 2026) Tj",
        "(01 NOVIEMBRE 2026) Tj",
        "(01 DICIEMBRE 2026) Tj",
        "(01 ENERO 2027) Tj",
    ] {
        assert!(second.contains(expected), "missing {expected}");
    }
}

#[test]
fn premium_plan_renders_one_schedule_date() {
    let mut record = ApplicantRecord::sample();
    record.plan = "PREMIUM".into();
    record.entry_date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
    let output = assembler()
        .assemble(&record, &options_with_template(2))
        .unwrap();
    let second = page_content(&output.bytes, 2);
    assert!(second.contains("(01 AGOSTO 2026) Tj"));
    assert!(!second.contains("(01 SEPTIEMBRE 2026) Tj"));
}

#[test]
fn empty_medical_details_print_no_aplica() {
    let mut record = ApplicantRecord::sample();
    record.allergy_flag = "no".into();
    record.allergy_detail = String::new();
    record.disability_detail = String::new();
    let output = assembler()
        .assemble(&record, &options_with_template(2))
        .unwrap();
    let first = page_content(&output.bytes, 1);
    assert!(first.contains("(NO) Tj"));
    assert_eq!(first.matches("(NO APLICA) Tj").count(), 2);
}

#[test]
fn academic_credentials_never_reach_the_page() {
    let mut record = ApplicantRecord::sample();
    record.guardian_name = "LIC. JOSE HERNANDEZ".into();
    let output = assembler()
        .assemble(&record, &options_with_template(2))
        .unwrap();
    let first = page_content(&output.bytes, 1);
    assert!(first.contains("(JOSE HERNANDEZ) Tj"));
    assert!(!first.contains("LIC."));
}

#[test]
fn watermark_lands_on_every_page() {
    let record = ApplicantRecord::sample();
    let mut options = options_with_template(2);
    options.watermark = true;
    let output = assembler().assemble(&record, &options).unwrap();
    for page in 1..=2 {
        assert!(page_content(&output.bytes, page).contains("DOCUMENTO PRELIMINAR"));
    }

    let mut options = options_with_template(1);
    options.watermark = true;
    let output = assembler().assemble(&record, &options).unwrap();
    assert!(page_content(&output.bytes, 1).contains("DOCUMENTO PRELIMINAR"));
}

#[test]
fn single_page_template_skips_second_page_anchors() {
    let mut record = ApplicantRecord::sample();
    record.plan = "START".into();
    let output = assembler()
        .assemble(&record, &options_with_template(1))
        .unwrap();
    assert_eq!(page_count(&output.bytes), 1);
    let first = page_content(&output.bytes, 1);
    // Plan marks and schedule rows live on page two and simply vanish.
    assert!(!first.contains("(X) Tj"));
    assert!(first.contains("(MARIA JOSE) Tj"));
}

#[test]
fn filename_derives_from_folio_and_name() {
    let record = ApplicantRecord::sample();
    let output = assembler()
        .assemble(&record, &options_with_template(2))
        .unwrap();
    assert_eq!(output.folio, "CEEA-2026-0801-0042");
    assert_eq!(
        output.filename,
        "Contrato_CEEA-2026-0801-0042_MARIA_JOSE_HERNANDEZ_LOPEZ.pdf"
    );
}

#[test]
fn missing_folio_is_generated() {
    let mut record = ApplicantRecord::sample();
    record.folio = None;
    let output = assembler()
        .assemble(&record, &options_with_template(2))
        .unwrap();
    assert!(output.folio.starts_with("CEEA-"));
    assert!(output.filename.starts_with("Contrato_CEEA-"));
}

#[test]
fn bad_signature_without_fallback_is_fatal() {
    let record = ApplicantRecord::sample();
    let options = RenderOptions {
        template: TemplateSource::Bytes {
            bytes: b"this is not a pdf".to_vec(),
            content_type: "application/pdf".into(),
        },
        allow_blank_fallback: false,
        ..Default::default()
    };
    let err = assembler().assemble(&record, &options).unwrap_err();
    assert!(matches!(err, TemplateUnavailable::BadSignature));
}

#[test]
fn wrong_content_type_without_fallback_is_fatal() {
    let record = ApplicantRecord::sample();
    let options = RenderOptions {
        template: TemplateSource::Bytes {
            bytes: template_bytes(2),
            content_type: "text/html".into(),
        },
        allow_blank_fallback: false,
        ..Default::default()
    };
    let err = assembler().assemble(&record, &options).unwrap_err();
    assert!(matches!(err, TemplateUnavailable::ContentType(ct) if ct == "text/html"));
}

#[test]
fn bad_signature_with_fallback_degrades_to_blank_pages() {
    let record = ApplicantRecord::sample();
    let options = RenderOptions {
        template: TemplateSource::Bytes {
            bytes: b"<html>not a pdf</html>".to_vec(),
            content_type: "application/pdf".into(),
        },
        ..Default::default()
    };
    let output = assembler().assemble(&record, &options).unwrap();
    assert_eq!(page_count(&output.bytes), 2);
    assert!(page_content(&output.bytes, 1).contains("(MARIA JOSE) Tj"));
}

#[test]
fn missing_template_without_fallback_is_fatal() {
    let record = ApplicantRecord::sample();
    let options = RenderOptions {
        allow_blank_fallback: false,
        ..Default::default()
    };
    let err = assembler().assemble(&record, &options).unwrap_err();
    assert!(matches!(err, TemplateUnavailable::Missing));
}

#[test]
fn fallback_produces_a_complete_document() {
    common::init_logging();
    let record = ApplicantRecord::sample();
    let options = RenderOptions {
        show_missing_template_banner: true,
        ..Default::default()
    };
    let output = assembler().assemble(&record, &options).unwrap();
    // The synthetic page set covers every anchored page.
    assert_eq!(page_count(&output.bytes), 2);
    let first = page_content(&output.bytes, 1);
    assert!(first.contains("(CONTRATO DE PRESTACION DE SERVICIOS EDUCATIVOS) Tj"));
    assert!(first.contains("(PLANTILLA OFICIAL NO DISPONIBLE) Tj"));
    assert!(first.contains("(MARIA JOSE) Tj"));
}

#[test]
fn debug_outlines_stroke_anchor_rectangles() {
    let record = ApplicantRecord::sample();
    let mut options = options_with_template(2);
    options.debug_outlines = true;
    let output = assembler().assemble(&record, &options).unwrap();
    let first = page_content(&output.bytes, 1);
    assert!(first.contains("re S"));

    let plain = assembler()
        .assemble(&record, &options_with_template(2))
        .unwrap();
    assert!(!page_content(&plain.bytes, 1).contains("re S"));
}

#[test]
fn amount_gate_suppresses_the_overlay_mask() {
    let record = ApplicantRecord::sample();
    let mut options = options_with_template(2);
    options.show_amount = false;
    let output = assembler().assemble(&record, &options).unwrap();
    let first = page_content(&output.bytes, 1);
    assert!(!first.contains(&record.amount));
    assert!(!first.contains("re f"));
}
