//! Art providers: row layout and painting strategies.
//!
//! An art provider turns a row's bounding rect into click regions
//! ([`ArtProvider::prepare_draw_rect`]) and paints the row
//! ([`ArtProvider::draw_item`]). Providers keep no per-row state; the only
//! thing they own is their [`ArtStyle`] (metrics, palette, default fonts)
//! and their glyph set, both created once when the provider is built.
//!
//! Two providers ship with the crate:
//!
//! - [`NativeArt`]: the default look. Expander only on rows with children,
//!   check icon only on rows that show one.
//! - [`ClassicArt`]: fixed gripper, expander and check columns, the row
//!   description appended to the value, and framed value cells.

mod classic;
mod native;

use horizon_propgrid_core::{Color, FontDesc, Point, Rect, Size};
use serde::{Deserialize, Serialize};

pub use classic::ClassicArt;
pub use native::NativeArt;

use crate::error::PropGridResult;
use crate::host::{DrawContext, Glyph, GlyphKind, LineStyle};
use crate::property::{Property, Regions, StateColors};

/// Layout constants of an art provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtMetrics {
    /// Signed offsets added to each edge of the row rect.
    pub margin_left: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    /// Horizontal gap unit between regions.
    pub gap: f32,
    /// Right edge of the label column.
    pub title_width: f32,
    pub expander_width: f32,
    pub splitter_width: f32,
    /// Horizontal offset per indent level.
    pub indent_width: f32,
}

impl Default for ArtMetrics {
    fn default() -> Self {
        Self {
            margin_left: 0.0,
            margin_top: 0.0,
            margin_right: 0.0,
            margin_bottom: 0.0,
            gap: 2.0,
            title_width: 150.0,
            expander_width: 12.0,
            splitter_width: 8.0,
            indent_width: 28.0,
        }
    }
}

impl ArtMetrics {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> PropGridResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// `rect` with the margins applied.
    pub fn inner(&self, rect: Rect) -> Rect {
        Rect::from_corners(
            Point::new(rect.left() + self.margin_left, rect.top() + self.margin_top),
            Point::new(
                rect.right() + self.margin_right,
                rect.bottom() + self.margin_bottom,
            ),
        )
    }
}

/// A color for each row state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSet {
    pub normal: Color,
    pub selected: Color,
    pub disabled: Color,
}

impl ColorSet {
    pub fn get(&self, state: RowState) -> Color {
        match state {
            RowState::Normal => self.normal,
            RowState::Selected => self.selected,
            RowState::Disabled => self.disabled,
        }
    }

    /// Per-row overrides, falling back to `self` where unset.
    pub fn resolve(&self, overrides: &StateColors, state: RowState) -> Color {
        let custom = match state {
            RowState::Normal => overrides.normal,
            RowState::Selected => overrides.selected,
            RowState::Disabled => overrides.disabled,
        };
        custom.unwrap_or_else(|| self.get(state))
    }

    /// `overrides` with its unset entries taken from `defaults`.
    fn overridden(overrides: StateColors, defaults: ColorSet) -> ColorSet {
        ColorSet {
            normal: overrides.normal.unwrap_or(defaults.normal),
            selected: overrides.selected.unwrap_or(defaults.selected),
            disabled: overrides.disabled.unwrap_or(defaults.disabled),
        }
    }
}

/// The visual state a row is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Normal,
    Selected,
    Disabled,
}

impl RowState {
    pub fn of(prop: &Property) -> Self {
        if !prop.is_enabled() || prop.is_readonly() {
            RowState::Disabled
        } else if prop.is_activated() {
            RowState::Selected
        } else {
            RowState::Normal
        }
    }
}

/// Colors an art provider paints with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub text: ColorSet,
    pub background: ColorSet,
    /// Grid background behind each row.
    pub window: Color,
    /// Dark half of the 3D lines.
    pub shadow: Color,
    /// Light half of the 3D lines.
    pub light: Color,
    /// Dotted selection outline.
    pub focus: Color,
}

impl Palette {
    pub const DEFAULT_TEXT: ColorSet = ColorSet {
        normal: Color::BLACK,
        selected: Color::WHITE,
        disabled: Color::from_rgb(0.427, 0.427, 0.427),
    };

    pub const DEFAULT_BACKGROUND: ColorSet = ColorSet {
        normal: Color::WHITE,
        selected: Color::from_rgb(0.0, 0.471, 0.843),
        disabled: Color::from_rgb(0.941, 0.941, 0.941),
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            text: Self::DEFAULT_TEXT,
            background: Self::DEFAULT_BACKGROUND,
            window: Color::WHITE,
            shadow: Color::from_rgb(0.627, 0.627, 0.627),
            light: Color::WHITE,
            focus: Color::BLACK,
        }
    }
}

/// Everything configurable about a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtStyle {
    pub metrics: ArtMetrics,
    pub palette: Palette,
    pub font_label: FontDesc,
    pub font_value: FontDesc,
}

impl Default for ArtStyle {
    fn default() -> Self {
        Self::with_metrics(ArtMetrics::default())
    }
}

impl ArtStyle {
    pub fn with_metrics(metrics: ArtMetrics) -> Self {
        Self {
            metrics,
            palette: Palette::default(),
            font_label: FontDesc::default(),
            font_value: FontDesc::default(),
        }
    }
}

/// Icons a provider draws, built once per provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSet {
    pub expander_collapsed: Glyph,
    pub expander_expanded: Glyph,
    /// Indexed by [`GlyphSet::check`].
    pub checks: [Glyph; 4],
}

impl GlyphSet {
    pub fn new(expander: Size, check: Size) -> Self {
        let glyph = |kind, size| Glyph { kind, size };
        Self {
            expander_collapsed: glyph(GlyphKind::ExpanderCollapsed, expander),
            expander_expanded: glyph(GlyphKind::ExpanderExpanded, expander),
            checks: [
                glyph(GlyphKind::RadioOff, check),
                glyph(GlyphKind::RadioOffDisabled, check),
                glyph(GlyphKind::RadioOn, check),
                glyph(GlyphKind::RadioOnHighlighted, check),
            ],
        }
    }

    pub fn expander(&self, expanded: bool) -> &Glyph {
        if expanded {
            &self.expander_expanded
        } else {
            &self.expander_collapsed
        }
    }

    /// The check icon for a row's enable/checked/selected state.
    pub fn check(&self, prop: &Property) -> &Glyph {
        let index = if !prop.is_enabled() {
            1
        } else if prop.is_checked() {
            if prop.is_activated() { 3 } else { 2 }
        } else {
            0
        };
        &self.checks[index]
    }

    pub fn check_size(&self) -> Size {
        self.checks[0].size
    }
}

/// A row layout and painting strategy.
pub trait ArtProvider: Send {
    /// Short identifier, for logs and debug output.
    fn name(&self) -> &'static str;

    fn style(&self) -> &ArtStyle;

    fn style_mut(&mut self) -> &mut ArtStyle;

    fn glyphs(&self) -> &GlyphSet;

    /// Partition the row rect into regions.
    fn prepare_draw_rect(&self, prop: &Property) -> Regions;

    /// Paint one row. Stores the regions used and the clipping flags on
    /// `prop`. Rows that are not visible are skipped.
    fn draw_item(&self, dc: &mut dyn DrawContext, prop: &mut Property);

    fn metrics(&self) -> &ArtMetrics {
        &self.style().metrics
    }

    /// Default right edge of the label column.
    fn title_width(&self) -> f32 {
        self.style().metrics.title_width
    }

    fn set_title_width(&mut self, width: f32) {
        self.style_mut().metrics.title_width = width.max(0.0);
    }

    fn font_label(&self) -> &FontDesc {
        &self.style().font_label
    }

    fn set_font_label(&mut self, font: FontDesc) {
        self.style_mut().font_label = font;
    }

    fn font_value(&self) -> &FontDesc {
        &self.style().font_value
    }

    fn set_font_value(&mut self, font: FontDesc) {
        self.style_mut().font_value = font;
    }

    fn text_colors(&self) -> ColorSet {
        self.style().palette.text
    }

    /// Set the default text colors. Unset entries reset to the built-in
    /// defaults.
    fn set_text_colors(&mut self, colors: StateColors) {
        self.style_mut().palette.text = ColorSet::overridden(colors, Palette::DEFAULT_TEXT);
    }

    fn bg_colors(&self) -> ColorSet {
        self.style().palette.background
    }

    /// Set the default background colors. Unset entries reset to the
    /// built-in defaults.
    fn set_bg_colors(&mut self, colors: StateColors) {
        self.style_mut().palette.background =
            ColorSet::overridden(colors, Palette::DEFAULT_BACKGROUND);
    }
}

/// The label font for a row: its own, or the provider default, with the
/// row's italic flag applied.
pub(crate) fn label_font(style: &ArtStyle, prop: &Property) -> FontDesc {
    let font = prop.font_label().unwrap_or(&style.font_label).clone();
    if prop.is_italic() { font.italic(true) } else { font }
}

pub(crate) fn value_font(style: &ArtStyle, prop: &Property) -> FontDesc {
    prop.font_value().unwrap_or(&style.font_value).clone()
}

/// Draw `text` inside `rc`, `inset` px from its left edge and vertically
/// centered. Returns whether the text is wider than the region.
pub(crate) fn draw_clipped_text(
    dc: &mut dyn DrawContext,
    text: &str,
    rc: Rect,
    inset: f32,
    font: &FontDesc,
    color: Color,
) -> bool {
    let extent = dc.text_extent(text, font);
    dc.save();
    dc.clip_rect(rc);
    let origin = Point::new(rc.left() + inset, rc.top() + (rc.height() - extent.height) / 2.0);
    dc.draw_text(text, origin, font, color);
    dc.restore();
    extent.width > rc.width()
}

/// Draw `glyph` centered in `rc`, one pixel below center.
pub(crate) fn draw_centered_glyph(dc: &mut dyn DrawContext, glyph: &Glyph, rc: Rect) {
    let origin = Point::new(
        rc.left() + (rc.width() - glyph.size.width) / 2.0,
        rc.top() + (rc.height() - glyph.size.height) / 2.0 + 1.0,
    );
    dc.draw_glyph(glyph, origin);
}

/// The sunken double line of a splitter.
pub(crate) fn draw_splitter(dc: &mut dyn DrawContext, palette: &Palette, rc: Rect) {
    let lines = [
        (rc.left(), palette.shadow),
        (rc.right() - 1.0, palette.shadow),
        (rc.left() + 1.0, palette.light),
        (rc.right(), palette.light),
    ];
    for (x, color) in lines {
        dc.draw_line(Point::new(x, rc.top()), Point::new(x, rc.bottom()), color);
    }
}

/// Row background and 3D frame.
pub(crate) fn draw_background(dc: &mut dyn DrawContext, palette: &Palette, rc: Rect) {
    dc.fill_rect(rc, palette.window);
    draw_border(dc, palette, rc);
    dc.draw_line(rc.top_right(), rc.bottom_right(), palette.light);
}

/// Row frame, plus the dotted outline on the selected row.
pub(crate) fn draw_border(dc: &mut dyn DrawContext, palette: &Palette, rc: Rect) {
    dc.draw_line(rc.bottom_left(), rc.bottom_right(), palette.shadow);
    dc.draw_line(rc.top_left(), rc.bottom_left(), palette.shadow);
    dc.draw_line(rc.top_left(), rc.top_right(), palette.light);
    dc.draw_line(
        Point::new(rc.left() + 1.0, rc.top()),
        Point::new(rc.left() + 1.0, rc.bottom()),
        palette.light,
    );
}

pub(crate) fn draw_focus(dc: &mut dyn DrawContext, palette: &Palette, prop: &Property) {
    if prop.is_activated() {
        dc.stroke_rect(prop.rect(), palette.focus, LineStyle::Dotted);
    }
}

/// Zero-width regions at the right edge, used by separators.
pub(crate) fn collapsed_at(rc: Rect) -> Rect {
    Rect::new(rc.right(), rc.top(), 0.0, 0.0)
}
