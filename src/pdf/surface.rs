//! Mutable page surface over a loaded (or synthesized) document.
//!
//! Draw calls accumulate content-stream operations per page; `finish`
//! wires the required resources (the two standard faces, and a
//! transparency graphics state when a watermark was stamped), appends one
//! new stream per touched page so existing template content is preserved,
//! and serializes the document.

use std::fmt::Write as _;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::SurfaceError;
use crate::fonts::Face;
use crate::geometry::NativeRect;

/// US Letter, the geometry of the official template.
const LETTER_WIDTH: f32 = 612.0;
const LETTER_HEIGHT: f32 = 792.0;

/// Name of the transparency graphics state used by the watermark.
const WATERMARK_GS: &str = "GSwm";
const WATERMARK_ALPHA: f32 = 0.15;

/// Cap height of the standard Helvetica faces, in em units (AFM data).
const CAP_HEIGHT: f32 = 0.718;

/// An RGB color in the 0..=1 range.
pub type Rgb = (f32, f32, f32);

struct PageState {
    id: ObjectId,
    width: f32,
    height: f32,
    ops: String,
}

pub struct DocumentSurface {
    doc: Document,
    pages: Vec<PageState>,
    uses_watermark_gs: bool,
}

impl DocumentSurface {
    /// Load an existing template from raw bytes.
    pub fn from_template(bytes: &[u8]) -> Result<Self, SurfaceError> {
        let doc = Document::load_mem(bytes)?;
        let page_map = doc.get_pages();
        if page_map.is_empty() {
            return Err(SurfaceError::NoPages);
        }
        let mut pages = Vec::with_capacity(page_map.len());
        for (_, id) in page_map {
            let (width, height) = media_box_size(&doc, id);
            pages.push(PageState {
                id,
                width,
                height,
                ops: String::new(),
            });
        }
        Ok(Self {
            doc,
            pages,
            uses_watermark_gs: false,
        })
    }

    /// Synthesize a minimal letter-sized page set for the blank fallback.
    pub fn blank(page_count: usize) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids = Vec::with_capacity(page_count);
        let mut pages = Vec::with_capacity(page_count);
        for _ in 0..page_count.max(1) {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    Object::Real(LETTER_WIDTH),
                    Object::Real(LETTER_HEIGHT),
                ],
            });
            kids.push(Object::Reference(page_id));
            pages.push(PageState {
                id: page_id,
                width: LETTER_WIDTH,
                height: LETTER_HEIGHT,
                ops: String::new(),
            });
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count.max(1) as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        Self {
            doc,
            pages,
            uses_watermark_gs: false,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_height(&self, page: usize) -> f32 {
        self.pages.get(page).map_or(LETTER_HEIGHT, |p| p.height)
    }

    pub fn page_width(&self, page: usize) -> f32 {
        self.pages.get(page).map_or(LETTER_WIDTH, |p| p.width)
    }

    /// Fill `rect` (grown by `pad` on every side) with a solid color.
    pub fn fill_rect(&mut self, page: usize, rect: NativeRect, color: Rgb, pad: f32) {
        let Some(state) = self.pages.get_mut(page) else {
            return;
        };
        let (r, g, b) = color;
        let _ = writeln!(
            state.ops,
            "q\n{r:.3} {g:.3} {b:.3} rg\n{:.2} {:.2} {:.2} {:.2} re f\nQ",
            rect.x - pad,
            rect.y - pad,
            rect.width + 2.0 * pad,
            rect.height + 2.0 * pad,
        );
    }

    /// Stroke the rectangle outline. Calibration diagnostic.
    pub fn stroke_rect(&mut self, page: usize, rect: NativeRect, color: Rgb) {
        let Some(state) = self.pages.get_mut(page) else {
            return;
        };
        let (r, g, b) = color;
        let _ = writeln!(
            state.ops,
            "q\n{r:.3} {g:.3} {b:.3} RG\n0.75 w\n{:.2} {:.2} {:.2} {:.2} re S\nQ",
            rect.x, rect.y, rect.width, rect.height,
        );
    }

    /// Draw a single line of text with its baseline at `(x, y)`.
    pub fn draw_text(
        &mut self,
        page: usize,
        x: f32,
        y: f32,
        face: Face,
        size: f32,
        color: Rgb,
        text: &str,
    ) {
        let Some(state) = self.pages.get_mut(page) else {
            return;
        };
        let (r, g, b) = color;
        let _ = writeln!(
            state.ops,
            "BT\n/{} {size:.1} Tf\n{r:.3} {g:.3} {b:.3} rg\n{x:.2} {y:.2} Td\n({}) Tj\nET",
            face.resource_name(),
            escape_text(text),
        );
    }

    /// Stamp a rotated, low-opacity label centered on the page.
    pub fn draw_watermark(&mut self, page: usize, face: Face, size: f32, angle_deg: f32, text: &str) {
        let width = self.page_width(page);
        let height = self.page_height(page);
        let Some(state) = self.pages.get_mut(page) else {
            return;
        };
        self.uses_watermark_gs = true;
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        // Center the glyph box on the page: half the advance back along the
        // rotated baseline, half the cap height below it.
        let half_width = crate::fonts::FontMetrics::text_width(&face, text, size) / 2.0;
        let half_cap = size * CAP_HEIGHT / 2.0;
        let _ = writeln!(
            state.ops,
            "q\n/{WATERMARK_GS} gs\n{cos:.4} {sin:.4} {:.4} {cos:.4} {:.2} {:.2} cm\n\
             BT\n/{} {size:.1} Tf\n0.60 0.60 0.60 rg\n{:.2} {:.2} Td\n({}) Tj\nET\nQ",
            -sin,
            width / 2.0,
            height / 2.0,
            face.resource_name(),
            -half_width,
            -half_cap,
            escape_text(text),
        );
    }

    /// Wire resources, append the accumulated streams, serialize.
    pub fn finish(mut self) -> Result<Vec<u8>, SurfaceError> {
        let helvetica = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => Face::Helvetica.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        let helvetica_bold = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => Face::HelveticaBold.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        let watermark_gs = if self.uses_watermark_gs {
            Some(self.doc.add_object(dictionary! {
                "Type" => "ExtGState",
                "ca" => Object::Real(WATERMARK_ALPHA),
                "CA" => Object::Real(WATERMARK_ALPHA),
            }))
        } else {
            None
        };

        let touched: Vec<(ObjectId, String)> = self
            .pages
            .iter_mut()
            .filter(|p| !p.ops.is_empty())
            .map(|p| (p.id, std::mem::take(&mut p.ops)))
            .collect();

        for (page_id, ops) in touched {
            wire_page_resources(
                &mut self.doc,
                page_id,
                helvetica,
                helvetica_bold,
                watermark_gs,
            )?;
            append_content(&mut self.doc, page_id, ops.into_bytes())?;
        }

        let mut out = Vec::new();
        self.doc.save_to(&mut out).map_err(SurfaceError::Save)?;
        Ok(out)
    }
}

/// Register the standard faces (and the watermark graphics state) in the
/// page's resource dictionary, following it through an indirect reference
/// when the template stores it that way.
fn wire_page_resources(
    doc: &mut Document,
    page_id: ObjectId,
    helvetica: ObjectId,
    helvetica_bold: ObjectId,
    watermark_gs: Option<ObjectId>,
) -> Result<(), SurfaceError> {
    enum ResLoc {
        Indirect(ObjectId),
        Inline,
        Missing,
    }

    let location = {
        let page_dict = doc.get_object(page_id)?.as_dict()?;
        match page_dict.get(b"Resources") {
            Ok(Object::Reference(id)) => ResLoc::Indirect(*id),
            Ok(Object::Dictionary(_)) => ResLoc::Inline,
            _ => ResLoc::Missing,
        }
    };

    if matches!(location, ResLoc::Missing) {
        // Absent (possibly inherited): give the page its own dict.
        doc.get_object_mut(page_id)?
            .as_dict_mut()?
            .set("Resources", Object::Dictionary(Dictionary::new()));
    }

    let resources = match location {
        ResLoc::Indirect(id) => doc.get_object_mut(id)?.as_dict_mut()?,
        ResLoc::Inline | ResLoc::Missing => doc
            .get_object_mut(page_id)?
            .as_dict_mut()?
            .get_mut(b"Resources")?
            .as_dict_mut()?,
    };

    if resources.get(b"Font").and_then(Object::as_dict).is_err() {
        resources.set("Font", Object::Dictionary(Dictionary::new()));
    }
    let fonts = resources.get_mut(b"Font")?.as_dict_mut()?;
    if !fonts.has(Face::Helvetica.resource_name().as_bytes()) {
        fonts.set(Face::Helvetica.resource_name(), Object::Reference(helvetica));
    }
    if !fonts.has(Face::HelveticaBold.resource_name().as_bytes()) {
        fonts.set(
            Face::HelveticaBold.resource_name(),
            Object::Reference(helvetica_bold),
        );
    }

    if let Some(gs_id) = watermark_gs {
        if resources.get(b"ExtGState").and_then(Object::as_dict).is_err() {
            resources.set("ExtGState", Object::Dictionary(Dictionary::new()));
        }
        let states = resources.get_mut(b"ExtGState")?.as_dict_mut()?;
        states.set(WATERMARK_GS, Object::Reference(gs_id));
    }

    Ok(())
}

/// Append a new content stream after the page's existing ones so template
/// content underneath is never replaced.
fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    content: Vec<u8>,
) -> Result<(), SurfaceError> {
    let stream_id = doc.add_object(Stream::new(Dictionary::new(), content));
    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;

    let updated = match page_dict.get(b"Contents") {
        Ok(Object::Array(existing)) => {
            let mut arr = existing.clone();
            arr.push(Object::Reference(stream_id));
            Object::Array(arr)
        }
        Ok(Object::Reference(existing)) => Object::Array(vec![
            Object::Reference(*existing),
            Object::Reference(stream_id),
        ]),
        _ => Object::Reference(stream_id),
    };
    page_dict.set("Contents", updated);
    Ok(())
}

/// Resolve the page's MediaBox, walking the Pages tree when inherited.
fn media_box_size(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    fn lookup(doc: &Document, dict_id: ObjectId, depth: usize) -> Option<[f32; 4]> {
        if depth == 0 {
            return None;
        }
        let dict = doc.get_object(dict_id).ok()?.as_dict().ok()?;
        if let Ok(obj) = dict.get(b"MediaBox") {
            let arr = match obj {
                Object::Array(arr) => Some(arr.clone()),
                Object::Reference(id) => match doc.get_object(*id) {
                    Ok(Object::Array(arr)) => Some(arr.clone()),
                    _ => None,
                },
                _ => None,
            };
            if let Some(arr) = arr {
                let values: Vec<f32> = arr
                    .iter()
                    .filter_map(|o| match o {
                        Object::Integer(i) => Some(*i as f32),
                        Object::Real(r) => Some(*r),
                        _ => None,
                    })
                    .collect();
                if values.len() == 4 {
                    return Some([values[0], values[1], values[2], values[3]]);
                }
            }
        }
        if let Ok(Object::Reference(parent)) = dict.get(b"Parent") {
            return lookup(doc, *parent, depth - 1);
        }
        None
    }

    let media_box = lookup(doc, page_id, 10).unwrap_or([0.0, 0.0, LETTER_WIDTH, LETTER_HEIGHT]);
    (media_box[2] - media_box[0], media_box[3] - media_box[1])
}

/// Escape text for a PDF literal string, mapping to WinAnsi bytes.
/// Characters the encoding cannot express degrade to `?`.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            '\n' | '\r' => out.push(' '),
            '\u{2026}' => out.push_str("\\205"),
            c if (' '..='~').contains(&c) => out.push(c),
            c => {
                let code = c as u32;
                if (0xA0..=0xFF).contains(&code) {
                    // Latin-1 range matches WinAnsi.
                    let _ = write!(out, "\\{code:03o}");
                } else {
                    out.push('?');
                }
            }
        }
    }
    out
}
