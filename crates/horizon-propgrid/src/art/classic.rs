use horizon_propgrid_core::{Point, Rect, Size};

use super::{
    ArtMetrics, ArtProvider, ArtStyle, GlyphSet, RowState, collapsed_at, draw_background,
    draw_centered_glyph, draw_clipped_text, draw_focus, draw_splitter, label_font, value_font,
};
use crate::host::DrawContext;
use crate::property::{Property, Regions};

const GRIPPER_WIDTH: f32 = 6.0;
const GRIPPER_BAR: f32 = 3.0;
const VALUE_INSET: f32 = 1.0;

/// The classic look: fixed columns and framed values.
///
/// Every row reserves a gripper, an expander and a check column whether or
/// not it uses them, so labels line up across the grid. The row description
/// is shown after the value as `"value (description)"`.
#[derive(Debug, Clone)]
pub struct ClassicArt {
    style: ArtStyle,
    glyphs: GlyphSet,
}

impl Default for ClassicArt {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassicArt {
    pub fn new() -> Self {
        Self::with_metrics(ArtMetrics {
            indent_width: 20.0,
            ..ArtMetrics::default()
        })
    }

    pub fn with_metrics(metrics: ArtMetrics) -> Self {
        let icon = Size::new(metrics.expander_width, metrics.expander_width);
        Self {
            style: ArtStyle::with_metrics(metrics),
            glyphs: GlyphSet::new(icon, icon),
        }
    }

    /// Text shown in the value cell.
    pub fn value_text(prop: &Property) -> String {
        let value = prop.value_as_string();
        if prop.description().is_empty() {
            value
        } else {
            format!("{value} ({})", prop.description())
        }
    }

    fn draw_gripper(&self, dc: &mut dyn DrawContext, prop: &Property) {
        if let (Some(color), Some(rc)) = (prop.gripper_color(), prop.regions.gripper) {
            let bar = Rect::new(rc.left(), rc.top() + 1.0, GRIPPER_BAR, rc.height() - 1.0);
            dc.fill_rect(bar, color);
        }
    }

    fn draw_value(&self, dc: &mut dyn DrawContext, prop: &mut Property) {
        prop.show_value_tips = false;
        let Some(rc) = prop.regions.value else {
            return;
        };
        let palette = &self.style.palette;
        if prop.top_value_border() {
            dc.draw_line(rc.top_left(), rc.top_right(), palette.shadow);
        }
        if prop.bottom_value_border() {
            dc.draw_line(rc.bottom_left(), rc.bottom_right(), palette.shadow);
        }
        if prop.is_editing() {
            return;
        }

        let state = RowState::of(prop);
        let text_color = palette.text.resolve(&prop.text_colors, state);
        let bg_color = palette.background.resolve(&prop.bg_colors, state);
        dc.fill_rect(rc, bg_color);

        let text = Self::value_text(prop);
        let font = value_font(&self.style, prop);
        prop.show_value_tips = draw_clipped_text(dc, &text, rc, VALUE_INSET, &font, text_color);
    }
}

impl ArtProvider for ClassicArt {
    fn name(&self) -> &'static str {
        "classic"
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
        let column = |x: f32, width: f32| Rect::new(x + gap, top, width, height);
        let mut regions = Regions::default();

        let gripper = column(
            irc.left() + prop.indent() as f32 * m.indent_width,
            GRIPPER_WIDTH,
        );
        regions.gripper = Some(gripper);

        let expander = column(gripper.right(), m.expander_width + 2.0);
        if prop.has_children() {
            regions.expander = Some(expander);
        }

        let check = column(expander.right(), self.glyphs.check_size().width + 2.0);
        if prop.show_check() && !prop.is_separator() {
            regions.check = Some(check);
        }

        let label = Rect::new(check.right() + gap * 2.0, top, 0.0, height);
        if prop.is_separator() {
            regions.label = Some(label.with_right(irc.right()));
            regions.splitter = Some(collapsed_at(irc));
            regions.value = Some(collapsed_at(irc));
            return regions;
        }

        let label = label.with_right(prop.title_width().unwrap_or(m.title_width));
        regions.label = Some(label);

        let splitter = column(label.right(), m.splitter_width);
        regions.splitter = Some(splitter);

        let value = Rect::from_corners(
            Point::new(splitter.right(), top),
            Point::new(irc.right().max(splitter.right()), irc.bottom()),
        );
        regions.value = Some(value.deflate(1.0, 1.0));
        regions
    }

    fn draw_item(&self, dc: &mut dyn DrawContext, prop: &mut Property) {
        if !prop.is_visible() {
            return;
        }
        prop.regions = self.prepare_draw_rect(prop);
        let palette = &self.style.palette;

        draw_background(dc, palette, prop.rect());
        draw_focus(dc, palette, prop);

        if let Some(rc) = prop.regions.expander {
            draw_centered_glyph(dc, self.glyphs.expander(prop.is_expanded()), rc);
        }
        self.draw_gripper(dc, prop);

        if let Some(rc) = prop.regions.label {
            let color = if prop.is_enabled() {
                palette.text.normal
            } else {
                palette.text.disabled
            };
            let font = label_font(&self.style, prop);
            prop.show_label_tips = draw_clipped_text(dc, &prop.label, rc, 0.0, &font, color);
        }

        if prop.is_separator() {
            return;
        }
        if let Some(rc) = prop.regions.check {
            draw_centered_glyph(dc, self.glyphs.check(prop), rc);
        }
        if let Some(rc) = prop.regions.splitter {
            draw_splitter(dc, palette, rc);
        }
        self.draw_value(dc, prop);
    }
}
