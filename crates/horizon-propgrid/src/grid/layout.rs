//! Hierarchy derivation, row layout, scrolling and hit-testing.

use horizon_propgrid_core::logging::{span_names, targets};
use horizon_propgrid_core::{PerfSpan, Point, Rect, Size};

use super::{PropGrid, PropKey};
use crate::property::PropId;

impl PropGrid {
    pub fn client_size(&self) -> Size {
        self.client_size
    }

    /// The host window was resized.
    pub fn set_client_size(&mut self, size: Size) {
        self.client_size = size;
        self.update_grid();
    }

    /// Size of the scrollable area from the last layout.
    pub fn virtual_size(&self) -> Size {
        self.virtual_size
    }

    pub fn scroll_offset(&self) -> Point {
        self.scroll
    }

    /// Lay everything out again and repaint.
    pub fn update_grid(&mut self) {
        self.layout_all();
        self.host.refresh(None);
    }

    /// Derive parent links, `has_children` and visibility from the indents.
    pub(crate) fn check_prop(&mut self) {
        for i in 0..self.order.len() {
            let id = self.order[i];
            let Some(indent) = self.props.get(id).map(|p| p.indent) else {
                continue;
            };

            let mut parent = i.checked_sub(1).map(|j| self.order[j]);
            while let Some(p) = parent {
                match self.props.get(p) {
                    Some(candidate) if candidate.indent < indent => break,
                    Some(candidate) => parent = candidate.parent,
                    None => parent = None,
                }
            }

            if let Some(p) = parent
                && let Some(parent_prop) = self.props.get_mut(p)
            {
                parent_prop.has_children = true;
            }
            if let Some(prop) = self.props.get_mut(id) {
                prop.parent = parent;
                prop.has_children = false;
            }
        }

        // Parents precede their children, so one pass in order settles
        // visibility.
        for i in 0..self.order.len() {
            let id = self.order[i];
            let visible = match self.props.get(id).and_then(|p| p.parent) {
                Some(p) => self.props.get(p).is_some_and(|pp| pp.expanded && pp.visible),
                None => true,
            };
            if let Some(prop) = self.props.get_mut(id) {
                prop.visible = visible;
            }
        }
    }

    /// Row height needed to hold its editor, if one is open.
    pub(crate) fn row_min_size(&self, id: PropId) -> Size {
        let Some(prop) = self.props.get(id) else {
            return Size::ZERO;
        };
        let min = prop.min_size;
        match prop
            .editor
            .as_ref()
            .and_then(|b| self.host.editor_size(b.editor()))
        {
            Some(editor) => Size::new(min.width, min.height.max(editor.height + 2.0)),
            None => min,
        }
    }

    /// Assign row rects top to bottom, compute regions, and update the
    /// virtual size.
    pub(crate) fn layout_all(&mut self) {
        let _span = PerfSpan::new(span_names::LAYOUT);
        self.check_prop();

        let visible: Vec<PropId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.props.get(*id).is_some_and(|p| p.visible))
            .collect();
        let sizes: Vec<Size> = visible.iter().map(|id| self.row_min_size(*id)).collect();

        let width = sizes
            .iter()
            .fold(self.client_size.width, |w, s| w.max(s.width));
        let height = 1.0 + sizes.iter().map(|s| s.height).sum::<f32>();
        self.virtual_size = Size::new(width, height);
        self.host.set_virtual_size(self.virtual_size);

        let is_separator = |grid: &PropGrid, i: Option<usize>| match i {
            Some(i) => visible
                .get(i)
                .and_then(|id| grid.props.get(*id))
                .is_none_or(|p| p.separator),
            None => true,
        };

        let mut y = 1.0;
        for (i, (id, size)) in visible.iter().zip(&sizes).enumerate() {
            let top_border = is_separator(self, i.checked_sub(1));
            let bottom_border = is_separator(self, Some(i + 1));
            let art = self.art.as_ref();
            if let Some(prop) = self.props.get_mut(*id) {
                prop.rect = Rect::new(0.0, y, width, size.height);
                prop.top_value_border = top_border;
                prop.bottom_value_border = bottom_border;
                prop.regions = art.prepare_draw_rect(prop);
            }
            y += size.height;
        }

        for id in &visible {
            self.layout_editor(*id);
        }
        tracing::trace!(target: targets::LAYOUT, rows = visible.len(), height, "layout done");

        // A collapsed ancestor hides the row, so its edit ends here.
        let hidden_editing: Vec<PropId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.props.get(*id).is_some_and(|p| !p.visible && p.is_editing()))
            .collect();
        for id in hidden_editing {
            self.commit_and_close(id);
        }
    }

    /// Move a row's editor onto its value region.
    pub(crate) fn layout_editor(&mut self, id: PropId) {
        let Some(prop) = self.props.get(id) else {
            return;
        };
        let (Some(binding), Some(rc)) = (prop.editor.as_ref(), prop.regions.value) else {
            return;
        };
        let editor = binding.editor();
        let rc = self.to_client(rc);
        self.host.move_editor(editor, rc);
    }

    /// Repaint one row.
    pub(crate) fn refresh_prop(&mut self, id: PropId) {
        if let Some(prop) = self.props.get(id)
            && prop.visible
        {
            let rc = self.to_client(prop.rect);
            self.host.refresh(Some(rc));
        }
    }

    pub(crate) fn to_unscrolled(&self, pt: Point) -> Point {
        pt.offset(self.scroll.x, self.scroll.y)
    }

    pub(crate) fn to_client(&self, rc: Rect) -> Rect {
        rc.offset(-self.scroll.x, -self.scroll.y)
    }

    /// Index of the visible row under a client point.
    pub fn hit_test(&self, pt: Point) -> Option<usize> {
        self.hit_test_unscrolled(self.to_unscrolled(pt))
    }

    pub(crate) fn hit_test_unscrolled(&self, pt: Point) -> Option<usize> {
        self.order.iter().position(|id| {
            self.props
                .get(*id)
                .is_some_and(|p| p.visible && p.rect.contains(pt))
        })
    }

    /// Scroll so that the top of the view is at `y` pixels. The position
    /// snaps to the scroll unit and stays inside the virtual area.
    pub fn scroll_to(&mut self, y: f32) -> bool {
        let unit = self.config.scroll_unit.max(1.0);
        let overflow = (self.virtual_size.height - self.client_size.height).max(0.0);
        let max = (overflow / unit).ceil() * unit;
        let y = ((y / unit).round() * unit).clamp(0.0, max);
        if y == self.scroll.y {
            return false;
        }
        self.scroll.y = y;
        for id in self.order.clone() {
            self.layout_editor(id);
        }
        self.host.refresh(None);
        true
    }

    pub fn scroll_by_units(&mut self, units: f32) -> bool {
        self.scroll_to(self.scroll.y + units * self.config.scroll_unit)
    }

    /// Scroll the minimum amount that brings a row fully into view.
    pub fn ensure_visible<'k>(&mut self, key: impl Into<PropKey<'k>>) -> bool {
        let Some(id) = self.resolve(key) else {
            return false;
        };
        let Some(prop) = self.props.get(id) else {
            return false;
        };
        if !prop.visible || self.client_size.is_empty() {
            return false;
        }
        let rc = self.to_client(prop.rect);
        let unit = self.config.scroll_unit.max(1.0);
        let view_height = self.client_size.height;
        if rc.top() < 0.0 {
            self.scroll_to(self.scroll.y + (rc.top() / unit).floor() * unit)
        } else if rc.bottom() > view_height {
            self.scroll_to(self.scroll.y + ((rc.bottom() - view_height) / unit).ceil() * unit)
        } else {
            false
        }
    }

    /// Select the next (or previous) visible row and scroll to it.
    pub fn navigate(&mut self, down: bool) -> bool {
        let step: isize = if down { 1 } else { -1 };
        let mut i = self.selection().map_or(-1, |i| i as isize);
        loop {
            i += step;
            if i < 0 || i as usize >= self.order.len() {
                return false;
            }
            let id = self.order[i as usize];
            if self.props.get(id).is_some_and(|p| p.visible) {
                self.set_selection(Some(id));
                self.ensure_visible(id);
                return true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use horizon_propgrid_core::{Point, Rect, Size};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::grid::PropGrid;
    use crate::headless::HeadlessHost;
    use crate::property::{PropId, Property};

    fn grid_with(indents: &[(&str, usize)]) -> PropGrid {
        let mut grid = PropGrid::new(HeadlessHost::new());
        grid.set_client_size(Size::new(300.0, 100.0));
        for (name, indent) in indents {
            grid.append(Property::builder(*name).indent(*indent));
        }
        grid
    }

    #[test]
    fn test_parent_derivation() {
        let grid = grid_with(&[("a", 0), ("b", 1), ("c", 2), ("d", 1), ("e", 0)]);
        let id = |n: &str| grid.resolve(n).unwrap();
        assert_eq!(grid.get(id("b")).unwrap().parent(), Some(id("a")));
        assert_eq!(grid.get(id("c")).unwrap().parent(), Some(id("b")));
        assert_eq!(grid.get(id("d")).unwrap().parent(), Some(id("a")));
        assert_eq!(grid.get(id("e")).unwrap().parent(), None);
        assert!(grid.get(id("a")).unwrap().has_children());
        assert!(grid.get(id("b")).unwrap().has_children());
        assert!(!grid.get(id("d")).unwrap().has_children());
    }

    #[test]
    fn test_hierarchy_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let len = rng.gen_range(1..=12);
            let indents: Vec<usize> = (0..len).map(|_| rng.gen_range(0..=4)).collect();
            let names: Vec<(String, usize)> = indents
                .iter()
                .enumerate()
                .map(|(i, indent)| (format!("r{i}"), *indent))
                .collect();
            let mut grid = PropGrid::new(HeadlessHost::new());
            grid.set_client_size(Size::new(300.0, 100.0));
            for (name, indent) in &names {
                grid.append(Property::builder(name.as_str()).indent(*indent));
            }
            let ids: Vec<PropId> = grid.iter().map(|(id, _)| id).collect();
            for id in &ids {
                if rng.gen_bool(0.3) {
                    grid.prop_mut(*id).unwrap().set_expand(false);
                }
            }
            grid.update_grid();

            // Nearest earlier row with a smaller indent.
            let parents: Vec<Option<usize>> = (0..len)
                .map(|i| (0..i).rev().find(|&j| indents[j] < indents[i]))
                .collect();
            for i in 0..len {
                let prop = grid.get(ids[i]).unwrap();
                assert_eq!(prop.parent(), parents[i].map(|j| ids[j]), "{indents:?}");
                assert_eq!(prop.has_children(), parents.contains(&Some(i)));

                let mut visible = true;
                let mut ancestor = parents[i];
                while let Some(j) = ancestor {
                    visible &= grid.get(ids[j]).unwrap().is_expanded();
                    ancestor = parents[j];
                }
                assert_eq!(prop.is_visible(), visible, "{indents:?} row {i}");
            }

            let snapshot = |grid: &PropGrid| {
                grid.iter()
                    .map(|(id, p)| (id, p.parent(), p.is_visible(), p.rect()))
                    .collect::<Vec<_>>()
            };
            let before = snapshot(&grid);
            grid.update_grid();
            assert_eq!(snapshot(&grid), before);
        }
    }

    #[test]
    fn test_rows_stack_from_one() {
        let grid = grid_with(&[("a", 0), ("b", 0)]);
        assert_eq!(grid.get_index(0).unwrap().rect(), Rect::new(0.0, 1.0, 300.0, 25.0));
        assert_eq!(grid.get_index(1).unwrap().rect(), Rect::new(0.0, 26.0, 300.0, 25.0));
        assert_eq!(grid.virtual_size(), Size::new(300.0, 51.0));
        assert_eq!(grid.hit_test(Point::new(10.0, 30.0)), Some(1));
        assert_eq!(grid.hit_test(Point::new(10.0, 0.5)), None);
    }

    #[test]
    fn test_collapse_hides_descendants() {
        let mut grid = grid_with(&[("a", 0), ("b", 1), ("c", 2), ("d", 0)]);
        grid.prop_mut("a").unwrap().set_expand(false);
        let visible: Vec<_> = grid
            .iter()
            .filter(|(_, p)| p.is_visible())
            .map(|(_, p)| p.name().to_string())
            .collect();
        assert_eq!(visible, ["a", "d"]);
        assert_eq!(grid.get_index(3).unwrap().rect().top(), 26.0);
    }

    #[test]
    fn test_scroll_snaps_and_clamps() {
        let mut grid = grid_with(&[("a", 0), ("b", 0), ("c", 0), ("d", 0), ("e", 0), ("f", 0)]);
        // 6 rows of 25 plus 1 in a 100 px view.
        assert!(grid.scroll_to(12.0));
        assert_eq!(grid.scroll_offset().y, 10.0);
        grid.scroll_to(1000.0);
        assert_eq!(grid.scroll_offset().y, 55.0);
        assert_eq!(grid.hit_test(Point::new(5.0, 0.0)), Some(2));
    }

    #[test]
    fn test_navigate_and_ensure_visible() {
        let mut grid = grid_with(&[("a", 0), ("b", 0), ("c", 0), ("d", 0), ("e", 0)]);
        for _ in 0..5 {
            grid.navigate(true);
        }
        assert_eq!(grid.selection(), Some(4));
        assert!(!grid.navigate(true));
        // Row e spans 101..126 and must end inside the 100 px view.
        assert_eq!(grid.scroll_offset().y, 30.0);
        grid.navigate(false);
        assert_eq!(grid.selection(), Some(3));
    }

    #[test]
    fn test_navigate_skips_hidden_rows() {
        let mut grid = grid_with(&[("a", 0), ("b", 1), ("c", 0)]);
        grid.prop_mut("a").unwrap().set_expand(false);
        grid.set_selection_index(Some(0));
        grid.navigate(true);
        assert_eq!(grid.selection(), Some(2));
    }
}
