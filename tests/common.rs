use academy_contracts::DocumentSurface;
use lopdf::Document;

/// Route `log` output to the test harness; safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A minimal but structurally valid PDF with `pages` blank pages, used as
/// a stand-in for the official contract template.
pub fn template_bytes(pages: usize) -> Vec<u8> {
    DocumentSurface::blank(pages)
        .finish()
        .expect("blank template serializes")
}

/// Decoded content stream of a 1-based page.
pub fn page_content(bytes: &[u8], page: u32) -> String {
    let doc = Document::load_mem(bytes).expect("output parses");
    let page_id = *doc
        .get_pages()
        .get(&page)
        .unwrap_or_else(|| panic!("page {page} exists"));
    String::from_utf8_lossy(&doc.get_page_content(page_id).expect("page has content"))
        .to_string()
}

pub fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes)
        .expect("output parses")
        .get_pages()
        .len()
}
