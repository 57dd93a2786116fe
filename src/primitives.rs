//! Drawing Primitives
//!
//! Stateless functions that mutate an RGBA canvas in place. Geometry is
//! clamped rather than rejected: zero or negative sizes draw nothing, corner
//! radii are capped at half the smaller dimension, and every pixel write is
//! bounds-checked. Nothing here panics for any input.

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

pub type Canvas = RgbaImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w: w.max(0), h: h.max(0) }
    }

    pub fn right(&self) -> i32 { self.x + self.w }
    pub fn bottom(&self) -> i32 { self.y + self.h }
    pub fn center_x(&self) -> i32 { self.x + self.w / 2 }
    pub fn is_empty(&self) -> bool { self.w == 0 || self.h == 0 }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    fn inset(&self, d: i32) -> Rect {
        Rect::new(self.x + d, self.y + d, self.w - 2 * d, self.h - 2 * d)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Source-over blend of one pixel. `alpha` in [0, 1] scales the color's own
/// alpha channel. Out-of-bounds writes are dropped.
pub fn blend_px(img: &mut Canvas, x: i32, y: i32, color: Rgba<u8>, alpha: f32) {
    if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
        return;
    }
    let sa = (color.0[3] as f32 / 255.0) * alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let dst = img.get_pixel_mut(x as u32, y as u32);
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    for i in 0..3 {
        let s = color.0[i] as f32;
        let d = dst.0[i] as f32;
        dst.0[i] = ((s * sa + d * da * (1.0 - sa)) / out_a).round() as u8;
    }
    dst.0[3] = (out_a * 255.0).round() as u8;
}

/// Coverage of a point inside a rounded rectangle, 0 outside, 1 inside, with
/// a one-pixel antialiased band on the corner arcs.
fn rounded_coverage(x: i32, y: i32, rect: Rect, radius: i32) -> f32 {
    if !rect.contains(x, y) {
        return 0.0;
    }
    let r = radius.clamp(0, rect.w.min(rect.h) / 2);
    if r == 0 {
        return 1.0;
    }
    let lx = x - rect.x;
    let ly = y - rect.y;
    if lx >= r && lx < rect.w - r {
        return 1.0;
    }
    if ly >= r && ly < rect.h - r {
        return 1.0;
    }
    let cx = if lx < r { r } else { rect.w - r - 1 };
    let cy = if ly < r { r } else { rect.h - r - 1 };
    let dx = (lx - cx) as f32;
    let dy = (ly - cy) as f32;
    let d = (dx * dx + dy * dy).sqrt();
    (r as f32 + 0.5 - d).clamp(0.0, 1.0)
}

/// Blank card canvas: fully transparent, with the background filled inside a
/// rounded-corner mask. Everything drawn afterwards lands on top; pixels
/// outside the mask stay transparent.
pub fn card_base(width: u32, height: u32, corner_radius: u32, background: Rgba<u8>) -> Canvas {
    let mut img = RgbaImage::from_pixel(width.max(1), height.max(1), Rgba([0, 0, 0, 0]));
    let rect = Rect::new(0, 0, img.width() as i32, img.height() as i32);
    fill_rounded_rect(&mut img, rect, corner_radius as i32, background);
    img
}

pub fn fill_rect(img: &mut Canvas, rect: Rect, color: Rgba<u8>) {
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            blend_px(img, x, y, color, 1.0);
        }
    }
}

pub fn fill_rounded_rect(img: &mut Canvas, rect: Rect, radius: i32, fill: Rgba<u8>) {
    if rect.is_empty() {
        return;
    }
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let cov = rounded_coverage(x, y, rect, radius);
            if cov > 0.0 {
                blend_px(img, x, y, fill, cov);
            }
        }
    }
}

pub fn stroke_rounded_rect(img: &mut Canvas, rect: Rect, radius: i32, color: Rgba<u8>, width: i32) {
    if rect.is_empty() || width <= 0 {
        return;
    }
    let w = width.min(rect.w.min(rect.h) / 2 + 1);
    let inner = rect.inset(w);
    let inner_radius = (radius - w).max(0);
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let outer_cov = rounded_coverage(x, y, rect, radius);
            let inner_cov = if inner.is_empty() {
                0.0
            } else {
                rounded_coverage(x, y, inner, inner_radius)
            };
            let cov = outer_cov - inner_cov;
            if cov > 0.0 {
                blend_px(img, x, y, color, cov);
            }
        }
    }
}

pub fn fill_circle(img: &mut Canvas, cx: i32, cy: i32, radius: i32, color: Rgba<u8>) {
    if radius <= 0 {
        return;
    }
    let r = radius as f32;
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            let dx = (x - cx) as f32;
            let dy = (y - cy) as f32;
            let cov = (r + 0.5 - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
            if cov > 0.0 {
                blend_px(img, x, y, color, cov);
            }
        }
    }
}

/// Ring between `radius - width` and `radius`.
pub fn stroke_circle(img: &mut Canvas, cx: i32, cy: i32, radius: i32, color: Rgba<u8>, width: i32) {
    if radius <= 0 || width <= 0 {
        return;
    }
    let outer = radius as f32;
    let inner = (radius - width.min(radius)) as f32;
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            let dx = (x - cx) as f32;
            let dy = (y - cy) as f32;
            let d = (dx * dx + dy * dy).sqrt();
            let cov = (outer + 0.5 - d).clamp(0.0, 1.0) * (d - inner + 0.5).clamp(0.0, 1.0);
            if cov > 0.0 {
                blend_px(img, x, y, color, cov);
            }
        }
    }
}

/// N equal angular segments around a center, starting at twelve o'clock and
/// proceeding clockwise. Callers pass colors already in canonical order.
pub fn fill_wedges(img: &mut Canvas, cx: i32, cy: i32, radius: i32, colors: &[Rgba<u8>]) {
    if radius <= 0 || colors.is_empty() {
        return;
    }
    if colors.len() == 1 {
        fill_circle(img, cx, cy, radius, colors[0]);
        return;
    }
    let r = radius as f32;
    let step = 360.0 / colors.len() as f32;
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            let dx = (x - cx) as f32;
            let dy = (y - cy) as f32;
            let d = (dx * dx + dy * dy).sqrt();
            let cov = (r + 0.5 - d).clamp(0.0, 1.0);
            if cov <= 0.0 {
                continue;
            }
            // Angle measured clockwise from twelve o'clock.
            let mut deg = dx.atan2(-dy).to_degrees();
            if deg < 0.0 {
                deg += 360.0;
            }
            let idx = ((deg / step) as usize).min(colors.len() - 1);
            blend_px(img, x, y, colors[idx], cov);
        }
    }
}

/// Equal-width vertical bands across a rectangle, one per color, left to
/// right. The last band absorbs the division remainder.
pub fn fill_bands(img: &mut Canvas, rect: Rect, colors: &[Rgba<u8>]) {
    if rect.is_empty() || colors.is_empty() {
        return;
    }
    let band_w = rect.w / colors.len() as i32;
    for (i, color) in colors.iter().enumerate() {
        let x = rect.x + i as i32 * band_w;
        let w = if i == colors.len() - 1 {
            rect.right() - x
        } else {
            band_w
        };
        fill_rect(img, Rect::new(x, rect.y, w, rect.h), *color);
    }
}

// --- Text ---

/// Advance width of a single line at the given pixel size.
pub fn text_width(font: &Font<'_>, size: f32, text: &str) -> f32 {
    let scale = Scale::uniform(size);
    text.chars()
        .map(|ch| font.glyph(ch).scaled(scale).h_metrics().advance_width)
        .sum()
}

fn draw_line(
    img: &mut Canvas,
    font: &Font<'_>,
    size: f32,
    color: Rgba<u8>,
    x: f32,
    baseline_y: f32,
    text: &str,
    clip: Option<Rect>,
) {
    let scale = Scale::uniform(size);
    let mut caret = x;
    for ch in text.chars() {
        let glyph = font.glyph(ch).scaled(scale).positioned(point(caret, baseline_y));
        let advance = glyph.unpositioned().h_metrics().advance_width;
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if let Some(c) = clip {
                    if !c.contains(px, py) {
                        return;
                    }
                }
                blend_px(img, px, py, color, v);
            });
        }
        caret += advance;
    }
}

/// One line of text centered on a point, both axes.
pub fn draw_text_centered(
    img: &mut Canvas,
    font: &Font<'_>,
    size: f32,
    color: Rgba<u8>,
    cx: i32,
    cy: i32,
    text: &str,
) {
    let v = font.v_metrics(Scale::uniform(size));
    let width = text_width(font, size, text);
    let x = cx as f32 - width / 2.0;
    let baseline = cy as f32 + (v.ascent + v.descent) / 2.0;
    draw_line(img, font, size, color, x, baseline, text, None);
}

/// Greedy word wrap by measured width. A word wider than the box gets a line
/// of its own and is clipped at draw time.
pub fn wrap_text(font: &Font<'_>, size: f32, max_width: f32, text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in words {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if current.is_empty() || text_width(font, size, &candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        lines.push(current);
    }
    lines
}

/// Wrapped text block inside a bounding box. The font size shrinks until the
/// wrapped lines fit the box height (floor 6 px); whatever still cannot fit
/// is clipped at the box edge, never drawn outside it.
#[allow(clippy::too_many_arguments)]
pub fn draw_text_block(
    img: &mut Canvas,
    font: &Font<'_>,
    size: f32,
    color: Rgba<u8>,
    rect: Rect,
    align: Align,
    line_spacing: f32,
    text: &str,
) {
    if rect.is_empty() || text.is_empty() {
        return;
    }
    let spacing = if line_spacing > 0.0 { line_spacing } else { 1.0 };

    let mut fitted = size.max(6.0);
    let mut lines = wrap_text(font, fitted, rect.w as f32, text);
    while fitted > 6.0 && (lines.len() as f32 * fitted * spacing) > rect.h as f32 {
        fitted = (fitted * 0.9).max(6.0);
        lines = wrap_text(font, fitted, rect.w as f32, text);
    }

    let v = font.v_metrics(Scale::uniform(fitted));
    let line_height = fitted * spacing;
    let mut baseline = rect.y as f32 + v.ascent;
    for line in &lines {
        let width = text_width(font, fitted, line);
        let x = match align {
            Align::Left => rect.x as f32,
            Align::Center => rect.x as f32 + (rect.w as f32 - width) / 2.0,
            Align::Right => rect.right() as f32 - width,
        };
        draw_line(img, font, fitted, color, x, baseline, line, Some(rect));
        baseline += line_height;
    }
}
