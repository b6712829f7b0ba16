//! Text fitting for fixed rectangles.
//!
//! The template boxes cannot grow, so overflowing content is first shrunk
//! in half-point steps down to a floor size and, if still too wide, cut
//! from the end with a trailing ellipsis. The returned plan is guaranteed
//! to fit the box width at the returned size.

use log::debug;

use crate::fonts::FontMetrics;

/// Smallest size a field is allowed to shrink to before truncation starts.
pub const MIN_FIT_SIZE: f32 = 7.0;

const SHRINK_STEP: f32 = 0.5;
const ELLIPSIS: char = '\u{2026}';

/// Render plan produced by [`fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub text: String,
    pub size: f32,
    pub truncated: bool,
}

/// Fit `text` into `max_width` starting at `base_size`.
///
/// Returns `None` for empty or whitespace-only input, and for boxes too
/// narrow to hold even the ellipsis at the floor size; such fields are a
/// silent no-op, not an empty box.
pub fn fit<M: FontMetrics>(
    text: &str,
    metrics: &M,
    max_width: f32,
    base_size: f32,
) -> Option<FittedText> {
    fit_with_floor(text, metrics, max_width, base_size, MIN_FIT_SIZE)
}

pub fn fit_with_floor<M: FontMetrics>(
    text: &str,
    metrics: &M,
    max_width: f32,
    base_size: f32,
    min_size: f32,
) -> Option<FittedText> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut size = base_size.max(min_size);
    while metrics.text_width(text, size) > max_width && size - SHRINK_STEP >= min_size {
        size -= SHRINK_STEP;
    }

    if metrics.text_width(text, size) <= max_width {
        return Some(FittedText {
            text: text.to_string(),
            size,
            truncated: false,
        });
    }

    // Still too wide at the floor size: cut characters from the end,
    // re-measuring with the ellipsis attached each step.
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + &ELLIPSIS.to_string();
        if metrics.text_width(&candidate, size) <= max_width {
            debug!("field text truncated to fit {:.1}pt box: {}", max_width, candidate);
            return Some(FittedText {
                text: candidate,
                size,
                truncated: true,
            });
        }
    }

    // Not even the lone ellipsis fits. The box cannot hold anything at the
    // floor size, so the field is a no-op, same as empty input.
    debug!("box of {max_width:.1}pt cannot hold any text at {size:.1}pt");
    None
}
