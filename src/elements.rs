//! Card Elements
//!
//! Mid-level composites built from the primitives: value badge, header bar,
//! rent table, color-circle cluster, chain-link border, stripe header. Each is
//! drawn once per template invocation; none holds state.

use image::Rgba;

use crate::cards::PropertyCard;
use crate::fonts::FontBook;
use crate::palette::PropertyColor;
use crate::primitives::{
    blend_px, draw_text_centered, fill_bands, fill_circle, fill_rect, fill_rounded_rect,
    fill_wedges, stroke_circle, stroke_rounded_rect, Canvas, Rect,
};
use crate::tokens::{BadgeTokens, DesignTokens, Palette};

/// Circular value badge with the card's monetary value, `$<n>M`.
pub fn value_badge(
    img: &mut Canvas,
    fonts: &FontBook,
    badge: &BadgeTokens,
    palette: &Palette,
    value: u32,
    cx: i32,
    cy: i32,
) {
    let radius = (badge.diameter / 2) as i32;
    fill_circle(img, cx, cy, radius, palette.paper());
    stroke_circle(img, cx, cy, radius, palette.ink(), badge.border_width as i32);
    let size = badge.diameter as f32 / 3.0;
    draw_text_centered(img, &fonts.bold, size, palette.ink(), cx, cy, &format!("${value}M"));
}

/// Colored header bar with the card name in uppercase.
pub fn header_bar(
    img: &mut Canvas,
    fonts: &FontBook,
    palette: &Palette,
    rect: Rect,
    fill: Rgba<u8>,
    title_size: f32,
    title: &str,
) {
    fill_rounded_rect(img, rect, 10, fill);
    stroke_rounded_rect(img, rect, 10, palette.ink(), 2);
    draw_text_centered(
        img,
        &fonts.bold,
        title_size,
        palette.ink(),
        rect.center_x(),
        rect.y + rect.h / 2,
        &title.to_uppercase(),
    );
}

/// Dashed chain-link border just inside the card edge.
pub fn chain_border(img: &mut Canvas, palette: &Palette, margin: i32) {
    let color = palette.muted();
    let w = img.width() as i32;
    let h = img.height() as i32;
    let segment = 15;
    let gap = 5;
    let thickness = 3;

    let mut x = margin;
    while x < w - margin {
        let len = segment.min(w - margin - x);
        fill_rect(img, Rect::new(x, margin, len, thickness), color);
        fill_rect(img, Rect::new(x, h - margin - thickness, len, thickness), color);
        x += segment + gap;
    }
    let mut y = margin;
    while y < h - margin {
        let len = segment.min(h - margin - y);
        fill_rect(img, Rect::new(margin, y, thickness, len), color);
        fill_rect(img, Rect::new(w - margin - thickness, y, thickness, len), color);
        y += segment + gap;
    }
}

/// One rent table, one row per `rent_values` entry in the record's order.
pub fn rent_table(
    img: &mut Canvas,
    fonts: &FontBook,
    tokens: &DesignTokens,
    card: &PropertyCard,
    set_color: Rgba<u8>,
) {
    let layout = &tokens.card_types.property;
    let palette = &tokens.palette;
    let width = tokens.card.width as i32;
    let x_start = 40;
    let x_end = width - 40;

    for (i, (owned, rent)) in card.rent_values.iter().enumerate() {
        let y = layout.rent_start_y + i as i32 * layout.rent_row_height;

        // Color swatch with the owned-count circle on top
        let swatch = Rect::new(x_start, y - 16, 32, 32);
        fill_rounded_rect(img, swatch, 6, set_color);
        stroke_rounded_rect(img, swatch, 6, palette.ink(), 2);
        let badge_cx = swatch.x + 16;
        fill_circle(img, badge_cx, y, 13, palette.paper());
        stroke_circle(img, badge_cx, y, 13, palette.ink(), 2);
        draw_text_centered(img, &fonts.bold, 16.0, palette.ink(), badge_cx, y, &owned.to_string());

        // Dotted leader up to the rent amount
        let dots_start = swatch.right() + 20;
        let dots_end = x_end - 70;
        let mut dot_x = dots_start;
        while dot_x < dots_end {
            blend_px(img, dot_x, y, palette.muted(), 1.0);
            blend_px(img, dot_x + 1, y, palette.muted(), 1.0);
            blend_px(img, dot_x, y + 1, palette.muted(), 1.0);
            blend_px(img, dot_x + 1, y + 1, palette.muted(), 1.0);
            dot_x += 10;
        }

        draw_text_centered(
            img,
            &fonts.bold,
            18.0,
            palette.ink(),
            x_end - 30,
            y,
            &format!("${rent}M"),
        );
    }
}

/// Two concentric circles for a two-color rent card.
pub fn color_circle_pair(
    img: &mut Canvas,
    palette: &Palette,
    cx: i32,
    cy: i32,
    outer_radius: i32,
    inner_radius: i32,
    outer: Rgba<u8>,
    inner: Rgba<u8>,
) {
    fill_circle(img, cx, cy, outer_radius, outer);
    stroke_circle(img, cx, cy, outer_radius, palette.ink(), 4);
    fill_circle(img, cx, cy, inner_radius, inner);
    stroke_circle(img, cx, cy, inner_radius, palette.ink(), 3);
}

/// Ten-segment wheel in canonical color order with an "ALL COLORS" hub, for
/// wild rent cards.
pub fn wild_wheel(
    img: &mut Canvas,
    fonts: &FontBook,
    palette: &Palette,
    cx: i32,
    cy: i32,
    outer_radius: i32,
    inner_radius: i32,
) {
    let colors: Vec<Rgba<u8>> = PropertyColor::ALL.iter().map(|c| palette.property(*c)).collect();
    fill_wedges(img, cx, cy, outer_radius, &colors);
    stroke_circle(img, cx, cy, outer_radius, palette.ink(), 4);
    fill_circle(img, cx, cy, inner_radius, palette.paper());
    stroke_circle(img, cx, cy, inner_radius, palette.ink(), 3);
    draw_text_centered(img, &fonts.bold, 24.0, palette.ink(), cx, cy - 12, "ALL");
    draw_text_centered(img, &fonts.bold, 14.0, palette.ink(), cx, cy + 12, "COLORS");
}

/// Equal-width color bands with an ink frame, for wildcard headers.
pub fn stripe_header(img: &mut Canvas, palette: &Palette, rect: Rect, colors: &[Rgba<u8>]) {
    fill_bands(img, rect, colors);
    stroke_rounded_rect(img, rect, 0, palette.ink(), 2);
}
