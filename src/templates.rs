//! Card Templates
//!
//! One pure function per card variant: `(record, tokens, fonts) -> image`.
//! Templates share only primitives and elements; none depends on another.
//! Output is deterministic: identical record and tokens yield bit-identical
//! pixels.

use crate::cards::{ActionCard, Card, MoneyCard, PropertyCard, RentCard, WildcardCard};
use crate::elements::{
    chain_border, color_circle_pair, header_bar, rent_table, stripe_header, value_badge,
    wild_wheel,
};
use crate::fonts::FontBook;
use crate::palette::PropertyColor;
use crate::primitives::{
    card_base, draw_text_block, draw_text_centered, fill_circle, stroke_circle, Align, Canvas,
    Rect,
};
use crate::tokens::DesignTokens;

/// Select the template matching the record's variant and invoke it. The match
/// is exhaustive; a sixth variant will not compile without a template.
pub fn render_card(card: &Card, tokens: &DesignTokens, fonts: &FontBook) -> Canvas {
    match card {
        Card::Property(c) => render_property(c, tokens, fonts),
        Card::Action(c) => render_action(c, tokens, fonts),
        Card::Rent(c) => render_rent(c, tokens, fonts),
        Card::Wildcard(c) => render_wildcard(c, tokens, fonts),
        Card::Money(c) => render_money(c, tokens, fonts),
    }
}

fn base_for(tokens: &DesignTokens, background: &str) -> Canvas {
    card_base(
        tokens.card.width,
        tokens.card.height,
        tokens.card.corner_radius,
        crate::palette::parse_hex(background).unwrap_or_else(|| tokens.palette.paper()),
    )
}

fn footer(img: &mut Canvas, tokens: &DesignTokens, fonts: &FontBook, y: i32) {
    if tokens.footer_text.is_empty() {
        return;
    }
    let cx = (img.width() / 2) as i32;
    draw_text_centered(
        img,
        &fonts.regular,
        tokens.typography.footer_size,
        tokens.palette.muted(),
        cx,
        y,
        &tokens.footer_text,
    );
}

fn description_block(
    img: &mut Canvas,
    tokens: &DesignTokens,
    fonts: &FontBook,
    width: i32,
    start_y: i32,
    block_width: i32,
    footer_y: i32,
    size: f32,
    text: &str,
) {
    if text.is_empty() {
        return;
    }
    let rect = Rect::new(
        (width - block_width) / 2,
        start_y,
        block_width,
        footer_y - start_y - 20,
    );
    draw_text_block(
        img,
        &fonts.regular,
        size,
        tokens.palette.ink(),
        rect,
        Align::Center,
        tokens.typography.line_spacing,
        text,
    );
}

pub fn render_property(card: &PropertyCard, tokens: &DesignTokens, fonts: &FontBook) -> Canvas {
    let layout = &tokens.card_types.property;
    let width = tokens.card.width as i32;
    let mut img = base_for(tokens, &layout.background);

    let set_color = tokens.palette.resolve_name(&card.color);
    let header = Rect::new(
        layout.header_padding,
        layout.header_y,
        width - 2 * layout.header_padding,
        layout.header_height,
    );
    header_bar(
        &mut img,
        fonts,
        &tokens.palette,
        header,
        set_color,
        tokens.typography.title_size,
        &card.name,
    );

    draw_text_centered(
        &mut img,
        &fonts.bold,
        tokens.typography.heading_size,
        tokens.palette.ink(),
        width / 2,
        layout.rent_start_y - 45,
        "RENT",
    );
    draw_text_centered(
        &mut img,
        &fonts.regular,
        tokens.typography.body_size,
        tokens.palette.muted(),
        width / 2,
        layout.rent_start_y - 22,
        "(No. of properties owned in set)",
    );

    rent_table(&mut img, fonts, tokens, card, set_color);

    let offset = tokens.value_badge.corner_offset;
    value_badge(&mut img, fonts, &tokens.value_badge, &tokens.palette, card.value, offset, offset);

    footer(&mut img, tokens, fonts, layout.footer_y);
    img
}

pub fn render_action(card: &ActionCard, tokens: &DesignTokens, fonts: &FontBook) -> Canvas {
    let layout = &tokens.card_types.action;
    let width = tokens.card.width as i32;
    let height = tokens.card.height as i32;
    let mut img = base_for(tokens, &layout.background);

    chain_border(&mut img, &tokens.palette, tokens.card.edge_margin);

    draw_text_centered(
        &mut img,
        &fonts.bold,
        16.0,
        tokens.palette.ink(),
        width / 2,
        layout.title_y,
        "ACTION CARD",
    );

    let radius = (layout.circle_diameter / 2) as i32;
    let cy = layout.circle_center_y;
    fill_circle(
        &mut img,
        width / 2,
        cy,
        radius,
        crate::palette::parse_hex(&layout.circle_background)
            .unwrap_or_else(|| tokens.palette.paper()),
    );
    stroke_circle(
        &mut img,
        width / 2,
        cy,
        radius,
        tokens.palette.ink(),
        layout.circle_border_width as i32,
    );

    // Long names split across two lines inside the circle
    let name = card.name.to_uppercase();
    if name.len() > 12 {
        let words: Vec<&str> = name.split_whitespace().collect();
        let mid = words.len() / 2;
        let ink = tokens.palette.ink();
        draw_text_centered(&mut img, &fonts.bold, 22.0, ink, width / 2, cy - 15, &words[..mid].join(" "));
        draw_text_centered(&mut img, &fonts.bold, 22.0, ink, width / 2, cy + 15, &words[mid..].join(" "));
    } else {
        draw_text_centered(&mut img, &fonts.bold, 24.0, tokens.palette.ink(), width / 2, cy, &name);
    }

    description_block(
        &mut img,
        tokens,
        fonts,
        width,
        layout.description_y,
        layout.description_width,
        layout.footer_y,
        tokens.typography.body_size,
        &card.description,
    );

    let offset = tokens.value_badge.corner_offset;
    value_badge(&mut img, fonts, &tokens.value_badge, &tokens.palette, card.value, offset, offset);
    value_badge(
        &mut img, fonts, &tokens.value_badge, &tokens.palette, card.value,
        width - offset, height - offset,
    );

    footer(&mut img, tokens, fonts, layout.footer_y);
    img
}

pub fn render_rent(card: &RentCard, tokens: &DesignTokens, fonts: &FontBook) -> Canvas {
    let layout = &tokens.card_types.rent;
    let width = tokens.card.width as i32;
    let height = tokens.card.height as i32;
    let mut img = base_for(tokens, &layout.background);

    chain_border(&mut img, &tokens.palette, tokens.card.edge_margin);

    draw_text_centered(
        &mut img,
        &fonts.bold,
        20.0,
        tokens.palette.ink(),
        width / 2,
        layout.title_y,
        "RENT",
    );

    let cx = width / 2;
    let cy = layout.circle_center_y;
    let outer = (layout.outer_diameter / 2) as i32;
    let inner = (layout.inner_diameter / 2) as i32;
    // An empty color list means wild even without the flag.
    if card.is_wild || card.colors.is_empty() {
        wild_wheel(&mut img, fonts, &tokens.palette, cx, cy, outer, inner);
    } else if card.colors.len() == 2 {
        color_circle_pair(
            &mut img,
            &tokens.palette,
            cx,
            cy,
            outer,
            inner,
            tokens.palette.resolve_name(&card.colors[0]),
            tokens.palette.resolve_name(&card.colors[1]),
        );
    }
    // Any other shape is rejected by validation before rendering.

    description_block(
        &mut img,
        tokens,
        fonts,
        width,
        layout.description_y,
        layout.description_width,
        layout.footer_y,
        tokens.typography.body_size,
        &card.description,
    );

    let offset = tokens.value_badge.corner_offset;
    value_badge(&mut img, fonts, &tokens.value_badge, &tokens.palette, card.value, offset, offset);
    value_badge(
        &mut img, fonts, &tokens.value_badge, &tokens.palette, card.value,
        width - offset, height - offset,
    );

    footer(&mut img, tokens, fonts, layout.footer_y);
    img
}

pub fn render_wildcard(card: &WildcardCard, tokens: &DesignTokens, fonts: &FontBook) -> Canvas {
    let layout = &tokens.card_types.wildcard;
    let width = tokens.card.width as i32;
    let mut img = base_for(tokens, &layout.background);

    // Multicolor stripes always use the canonical sequence; two-color cards
    // keep the record's order.
    let stripe_colors: Vec<_> = if card.is_multicolor {
        PropertyColor::ALL.iter().map(|c| tokens.palette.property(*c)).collect()
    } else {
        card.allowed_colors.iter().map(|n| tokens.palette.resolve_name(n)).collect()
    };
    let stripe = Rect::new(
        layout.stripe_margin,
        layout.stripe_y,
        width - 2 * layout.stripe_margin,
        layout.stripe_height,
    );
    stripe_header(&mut img, &tokens.palette, stripe, &stripe_colors);

    draw_text_centered(
        &mut img,
        &fonts.bold,
        16.0,
        tokens.palette.ink(),
        width / 2,
        layout.title_y,
        &card.name.to_uppercase(),
    );

    draw_text_centered(
        &mut img,
        &fonts.bold,
        64.0,
        tokens.palette.muted(),
        width / 2,
        layout.wild_label_y,
        "WILD",
    );

    description_block(
        &mut img,
        tokens,
        fonts,
        width,
        layout.description_y,
        layout.description_width,
        layout.footer_y,
        11.0,
        &card.description,
    );

    if card.value > 0 {
        let offset = tokens.value_badge.corner_offset;
        value_badge(
            &mut img, fonts, &tokens.value_badge, &tokens.palette, card.value, offset, offset,
        );
    }

    footer(&mut img, tokens, fonts, layout.footer_y);
    img
}

pub fn render_money(card: &MoneyCard, tokens: &DesignTokens, fonts: &FontBook) -> Canvas {
    let layout = &tokens.card_types.money;
    let width = tokens.card.width as i32;
    let height = tokens.card.height as i32;
    let mut img = base_for(tokens, &layout.background);

    chain_border(&mut img, &tokens.palette, tokens.card.edge_margin);

    let radius = (layout.circle_diameter / 2) as i32;
    let cy = layout.circle_center_y;
    fill_circle(
        &mut img,
        width / 2,
        cy,
        radius,
        crate::palette::parse_hex(&layout.circle_background)
            .unwrap_or_else(|| tokens.palette.paper()),
    );
    stroke_circle(
        &mut img,
        width / 2,
        cy,
        radius,
        tokens.palette.ink(),
        layout.circle_border_width as i32,
    );
    draw_text_centered(
        &mut img,
        &fonts.bold,
        60.0,
        tokens.palette.ink(),
        width / 2,
        cy,
        &format!("${}M", card.denomination),
    );

    let offset = tokens.value_badge.corner_offset;
    value_badge(
        &mut img, fonts, &tokens.value_badge, &tokens.palette, card.denomination, offset, offset,
    );
    value_badge(
        &mut img, fonts, &tokens.value_badge, &tokens.palette, card.denomination,
        width - offset, height - offset,
    );

    footer(&mut img, tokens, fonts, layout.footer_y);
    img
}
