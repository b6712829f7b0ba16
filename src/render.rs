//! Rectangle rendering: the per-field path from anchor to drawn text.
//!
//! Order per field: resolve the effective anchor (calibration override
//! wins), translate to native page coordinates, paint the overlay mask
//! when the anchor asks for one, sanitize the value (marks skip this),
//! fit it to the box, draw it left-aligned at the top. The debug outline
//! is stroked last so it stays visible over the mask and the content.

use log::debug;

use crate::anchors::FieldAnchor;
use crate::fonts::Face;
use crate::geometry::{to_native, NativeRect};
use crate::options::RenderOptions;
use crate::overrides::OverrideStore;
use crate::pdf::DocumentSurface;
use crate::sanitize::Redactor;
use crate::textfit::fit;

/// The template's red accent used for filled values.
const ACCENT: (f32, f32, f32) = (0.86, 0.21, 0.27);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
/// Outline color for calibration renders; distinct from the accent.
const OUTLINE: (f32, f32, f32) = (0.0, 0.8, 1.0);
const MASK: (f32, f32, f32) = (1.0, 1.0, 1.0);
/// How far the overlay mask grows past the anchor bounds.
const MASK_PAD: f32 = 2.0;
/// Glyph drawn for mark anchors.
const MARK_GLYPH: &str = "X";

/// A resolved value ready to be drawn at an anchor.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldValue {
    Text(String),
    Mark,
}

struct FieldStyle {
    face: Face,
    base_size: f32,
    color: (f32, f32, f32),
}

fn style_for(anchor: FieldAnchor) -> FieldStyle {
    use FieldAnchor::*;
    match anchor {
        Folio | Amount => FieldStyle {
            face: Face::HelveticaBold,
            base_size: 12.0,
            color: ACCENT,
        },
        AllergyFlag | PsychFollowUp | OrientationFlag => FieldStyle {
            face: Face::HelveticaBold,
            base_size: 9.0,
            color: ACCENT,
        },
        IssueDate => FieldStyle {
            face: Face::Helvetica,
            base_size: 8.0,
            color: BLACK,
        },
        EntryDateMirror => FieldStyle {
            face: Face::Helvetica,
            base_size: 9.0,
            color: BLACK,
        },
        _ => FieldStyle {
            face: Face::Helvetica,
            base_size: 9.0,
            color: ACCENT,
        },
    }
}

pub(crate) struct RectangleRenderer<'a> {
    pub overrides: &'a OverrideStore,
    pub redactor: &'a Redactor,
}

impl RectangleRenderer<'_> {
    /// Draw `value` at `anchor` on `page`. Missing or empty text is a
    /// silent no-op; nothing here ever fails the assembly.
    pub fn render(
        &self,
        surface: &mut DocumentSurface,
        page: usize,
        anchor: FieldAnchor,
        value: &FieldValue,
        options: &RenderOptions,
    ) {
        let bounds = match self.overrides.get(&anchor.key()) {
            Some(point) => anchor.bounds().at(point.x, point.y),
            None => anchor.bounds(),
        };
        let native = to_native(bounds, surface.page_height(page));
        let style = style_for(anchor);

        if anchor.overlay() {
            surface.fill_rect(page, native, MASK, MASK_PAD);
        }

        match value {
            FieldValue::Mark => {
                let size = style.base_size.max(native.height - 2.0);
                draw_top_aligned(surface, page, native, Face::HelveticaBold, size, ACCENT, MARK_GLYPH);
            }
            FieldValue::Text(raw) => {
                let cleaned = self.redactor.clean(raw);
                // Cap the starting size so the line also fits the box height.
                let base = if native.height > 0.0 {
                    style.base_size.min(native.height)
                } else {
                    style.base_size
                };
                match fit(&cleaned, &style.face, native.width, base) {
                    Some(plan) => draw_top_aligned(
                        surface, page, native, style.face, plan.size, style.color, &plan.text,
                    ),
                    None => debug!("nothing to draw for field {}", anchor.key()),
                }
            }
        }

        if options.debug_outlines {
            surface.stroke_rect(page, native, OUTLINE);
        }
    }
}

/// Baseline placement for text left-aligned at the top of the box.
fn draw_top_aligned(
    surface: &mut DocumentSurface,
    page: usize,
    rect: NativeRect,
    face: Face,
    size: f32,
    color: (f32, f32, f32),
    text: &str,
) {
    let baseline = rect.y + (rect.height - size).max(0.0);
    surface.draw_text(page, rect.x, baseline, face, size, color, text);
}

/// Diagonal low-opacity label centered on every page. Cosmetic and
/// independent of field success.
pub(crate) fn stamp_watermark(surface: &mut DocumentSurface, label: &str) {
    for page in 0..surface.page_count() {
        surface.draw_watermark(page, Face::HelveticaBold, 54.0, 45.0, label);
    }
}

/// Visible diagnostic banner for the degraded-fallback path.
pub(crate) fn stamp_banner(surface: &mut DocumentSurface, text: &str) {
    let y = surface.page_height(0) - 30.0;
    surface.draw_text(0, 40.0, y, Face::HelveticaBold, 10.0, ACCENT, text);
}

/// Heading drawn on the synthetic page set so a fallback document is
/// recognizable as a contract.
pub(crate) fn stamp_fallback_heading(surface: &mut DocumentSurface, heading: &str) {
    let y = surface.page_height(0) - 60.0;
    surface.draw_text(0, 40.0, y, Face::HelveticaBold, 14.0, BLACK, heading);
}
