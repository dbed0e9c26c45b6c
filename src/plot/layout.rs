// PerfTrend - plot/layout.rs
//
// Annotation placement: labels start centred just above their anchor point
// and are pushed apart until no two overlap, staying inside the plotting
// area. Pure pixel-space geometry; the renderers draw the result.

use crate::util::constants;

/// Axis-aligned label box in pixels. `(x, y)` is the top-left corner and y
/// grows downwards, as on the bitmap backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LabelBox {
    /// Box centred horizontally on `anchor`, with its bottom edge on it.
    pub fn above(anchor: (f64, f64), width: f64, height: f64) -> Self {
        Self {
            x: anchor.0 - width / 2.0,
            y: anchor.1 - height,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Overlap extents `(dx, dy)` with `other`, grown by `padding`, or
    /// `None` when the padded boxes do not intersect.
    fn overlap(&self, other: &LabelBox, padding: f64) -> Option<(f64, f64)> {
        let dx = (self.x + self.width + padding).min(other.x + other.width + padding)
            - self.x.max(other.x);
        let dy = (self.y + self.height + padding).min(other.y + other.height + padding)
            - self.y.max(other.y);
        if dx > 0.0 && dy > 0.0 {
            Some((dx, dy))
        } else {
            None
        }
    }

    fn clamp_into(&mut self, bounds: &Bounds) {
        let max_x = (bounds.right - self.width).max(bounds.left);
        let max_y = (bounds.bottom - self.height).max(bounds.top);
        self.x = self.x.clamp(bounds.left, max_x);
        self.y = self.y.clamp(bounds.top, max_y);
    }
}

/// Pixel rectangle labels must stay within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Rough rendered size of `text` at `font_px`, without a font backend.
pub fn estimate_text_size(text: &str, font_px: u32) -> (f64, f64) {
    let px = f64::from(font_px);
    (text.chars().count() as f64 * px * 0.6, px * 1.2)
}

/// Separate overlapping boxes in place.
///
/// Each pass pushes every overlapping pair apart along the axis of smaller
/// overlap, half the distance each, then clamps all boxes into `bounds`.
/// Stops when a pass moves nothing or after the iteration cap. Returns the
/// number of passes that moved at least one box.
pub fn repel(boxes: &mut [LabelBox], bounds: &Bounds) -> usize {
    let padding = constants::LABEL_REPEL_PADDING;
    let mut passes = 0;

    for b in boxes.iter_mut() {
        b.clamp_into(bounds);
    }

    for _ in 0..constants::LABEL_REPEL_MAX_ITERATIONS {
        let mut moved = false;

        for i in 0..boxes.len() {
            for j in (i + 1)..boxes.len() {
                let Some((dx, dy)) = boxes[i].overlap(&boxes[j], padding) else {
                    continue;
                };
                moved = true;

                let (ci, cj) = (boxes[i].center(), boxes[j].center());
                if dx < dy {
                    // Coincident centres: the earlier label goes left.
                    let dir = if ci.0 <= cj.0 { -1.0 } else { 1.0 };
                    boxes[i].x += dir * dx / 2.0;
                    boxes[j].x -= dir * dx / 2.0;
                } else {
                    // Coincident centres: the earlier label goes up.
                    let dir = if ci.1 <= cj.1 { -1.0 } else { 1.0 };
                    boxes[i].y += dir * dy / 2.0;
                    boxes[j].y -= dir * dy / 2.0;
                }
            }
        }

        for b in boxes.iter_mut() {
            b.clamp_into(bounds);
        }

        if !moved {
            break;
        }
        passes += 1;
    }

    passes
}
