use horizon_propgrid_core::logging::span_names;
use horizon_propgrid_core::{PerfSpan, Point, Rect};

use super::PropGrid;
use crate::host::DrawContext;

impl PropGrid {
    /// Paint the visible part of the grid.
    ///
    /// Only rows intersecting the view are drawn. The art provider records
    /// regions and clipping flags on each row it draws.
    pub fn paint(&mut self, dc: &mut dyn DrawContext) {
        let _span = PerfSpan::new(span_names::PAINT);
        let view = Rect::new(
            self.scroll.x,
            self.scroll.y,
            self.client_size.width,
            self.client_size.height,
        );

        dc.save();
        dc.translate(-self.scroll.x, -self.scroll.y);
        let palette = &self.art.style().palette;
        dc.fill_rect(view, palette.window);
        dc.draw_line(
            Point::new(view.left(), 0.0),
            Point::new(view.right(), 0.0),
            palette.shadow,
        );

        let art = self.art.as_ref();
        for id in &self.order {
            if let Some(prop) = self.props.get_mut(*id)
                && prop.visible
                && view.intersects(&prop.rect)
            {
                art.draw_item(dc, prop);
            }
        }
        dc.restore();
    }
}

#[cfg(test)]
mod tests {
    use horizon_propgrid_core::Size;

    use crate::grid::PropGrid;
    use crate::headless::{DrawOp, HeadlessHost, RecordingContext};
    use crate::property::PropertyBuilder;

    #[test]
    fn test_paint_skips_rows_outside_view() {
        let mut grid = PropGrid::new(HeadlessHost::new());
        grid.set_client_size(Size::new(300.0, 60.0));
        for i in 0..10 {
            grid.append(PropertyBuilder::text(format!("row{i}")).label(format!("Row {i}")));
        }
        let mut dc = RecordingContext::new();
        grid.paint(&mut dc);
        let texts = dc.texts();
        assert!(texts.contains(&"Row 0"));
        assert!(texts.contains(&"Row 2"));
        assert!(!texts.contains(&"Row 3"));
        assert_eq!(dc.ops().first(), Some(&DrawOp::Save));
        assert_eq!(dc.ops().last(), Some(&DrawOp::Restore));
    }

    #[test]
    fn test_paint_follows_scroll() {
        let mut grid = PropGrid::new(HeadlessHost::new());
        grid.set_client_size(Size::new(300.0, 60.0));
        for i in 0..10 {
            grid.append(PropertyBuilder::text(format!("row{i}")).label(format!("Row {i}")));
        }
        grid.scroll_to(100.0);
        let mut dc = RecordingContext::new();
        grid.paint(&mut dc);
        let texts = dc.texts();
        assert!(!texts.contains(&"Row 2"));
        assert!(texts.contains(&"Row 4"));
        assert!(dc.ops().contains(&DrawOp::Translate { dx: 0.0, dy: -100.0 }));
    }

    #[test]
    fn test_paint_skips_collapsed_children() {
        let mut grid = PropGrid::new(HeadlessHost::new());
        grid.set_client_size(Size::new(300.0, 200.0));
        grid.append(PropertyBuilder::text("p").label("Parent").expanded(false));
        grid.append(PropertyBuilder::text("c").label("Child").indent(1));
        let mut dc = RecordingContext::new();
        grid.paint(&mut dc);
        assert!(dc.texts().contains(&"Parent"));
        assert!(!dc.texts().contains(&"Child"));
    }
}
