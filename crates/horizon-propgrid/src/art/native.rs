use horizon_propgrid_core::{Rect, Size};

use super::{
    ArtMetrics, ArtProvider, ArtStyle, GlyphSet, RowState, collapsed_at, draw_background,
    draw_border, draw_centered_glyph, draw_clipped_text, draw_focus, draw_splitter, label_font,
    value_font,
};
use crate::host::DrawContext;
use crate::property::{Property, Regions};

/// Left inset of the value text.
const VALUE_INSET: f32 = 5.0;

/// The default art provider.
///
/// Regions, left to right: expander (rows with children only), check icon
/// (rows showing one), label up to the title width, splitter, value.
/// Separator labels take the whole remaining width.
#[derive(Debug, Clone)]
pub struct NativeArt {
    style: ArtStyle,
    glyphs: GlyphSet,
}

impl Default for NativeArt {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeArt {
    pub fn new() -> Self {
        Self::with_metrics(ArtMetrics::default())
    }

    pub fn with_metrics(metrics: ArtMetrics) -> Self {
        let icon = Size::new(metrics.expander_width, metrics.expander_width);
        Self {
            style: ArtStyle::with_metrics(metrics),
            glyphs: GlyphSet::new(icon, Size::new(12.0, 12.0)),
        }
    }

    fn draw_value(&self, dc: &mut dyn DrawContext, prop: &mut Property) {
        prop.show_value_tips = false;
        if prop.is_editing() {
            return;
        }
        let Some(rc) = prop.regions.value else {
            return;
        };
        let palette = &self.style.palette;
        let state = RowState::of(prop);
        let text_color = palette.text.resolve(&prop.text_colors, state);
        let bg_color = palette.background.resolve(&prop.bg_colors, state);

        dc.fill_rect(rc, bg_color);
        let text = prop.value_as_string();
        let font = value_font(&self.style, prop);
        prop.show_value_tips = draw_clipped_text(dc, &text, rc, VALUE_INSET, &font, text_color);
    }
}

impl ArtProvider for NativeArt {
    fn name(&self) -> &'static str {
        "native"
    }

    fn style(&self) -> &ArtStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ArtStyle {
        &mut self.style
    }

    fn glyphs(&self) -> &GlyphSet {
        &self.glyphs
    }

    fn prepare_draw_rect(&self, prop: &Property) -> Regions {
        let m = &self.style.metrics;
        let gap = m.gap;
        let irc = m.inner(prop.rect());
        let (top, height) = (irc.top(), irc.height());
        let mut regions = Regions::default();

        let mut x = irc.left() + gap * 2.0 + prop.indent() as f32 * m.indent_width;

        if m.expander_width > 0.0 && prop.has_children() {
            let rc = Rect::new(x + gap, top, m.expander_width, height);
            regions.expander = Some(rc);
            x = rc.right();
        }

        if prop.show_check() && !prop.is_separator() {
            let rc = Rect::new(x + gap, top, self.glyphs.check_size().width + 2.0, height);
            regions.check = Some(rc);
            x = rc.right();
        }

        let label_left = x + gap * 2.0;
        if prop.is_separator() {
            regions.label = Some(Rect::new(label_left, top, 0.0, height).with_right(irc.right()));
            regions.splitter = Some(collapsed_at(irc));
            regions.value = Some(collapsed_at(irc));
            return regions;
        }

        let title_width = prop.title_width().unwrap_or(m.title_width);
        let label = Rect::new(label_left, top, 0.0, height).with_right(title_width);
        regions.label = Some(label);

        let splitter = Rect::new(label.right() + gap, top, m.splitter_width, height);
        regions.splitter = Some(splitter);

        regions.value =
            Some(Rect::new(splitter.right(), top, 0.0, height).with_right(irc.right()));
        regions
    }

    fn draw_item(&self, dc: &mut dyn DrawContext, prop: &mut Property) {
        if !prop.is_visible() {
            return;
        }
        prop.regions = self.prepare_draw_rect(prop);
        let palette = &self.style.palette;

        draw_background(dc, palette, prop.rect());

        if let Some(rc) = prop.regions.expander {
            draw_centered_glyph(dc, self.glyphs.expander(prop.is_expanded()), rc);
        }

        if let Some(rc) = prop.regions.label {
            let color = match RowState::of(prop) {
                RowState::Disabled => palette.text.disabled,
                _ => palette.text.normal,
            };
            let font = label_font(&self.style, prop);
            prop.show_label_tips = draw_clipped_text(dc, &prop.label, rc, 0.0, &font, color);
        }

        if !prop.is_separator() {
            if let Some(rc) = prop.regions.check {
                draw_centered_glyph(dc, self.glyphs.check(prop), rc);
            }
            if let Some(rc) = prop.regions.splitter {
                draw_splitter(dc, palette, rc);
            }
            self.draw_value(dc, prop);
        }

        draw_border(dc, palette, prop.rect());
        draw_focus(dc, palette, prop);
    }
}
