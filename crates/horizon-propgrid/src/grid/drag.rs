//! Row reordering and drag-and-drop.

use horizon_propgrid_core::logging::targets;
use horizon_propgrid_core::{Point, Rect};

use super::{PropGrid, PropKey};
use crate::config::CopyPolicy;
use crate::event::PropEventKind;
use crate::host::{DragData, DragOutcome};
use crate::property::{Notify, PropId, Property, StateColors};

/// What a drop did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    /// A row of this grid moved.
    Moved,
    /// Rows were copied in from another grid.
    Copied(Vec<PropId>),
    /// The payload was not a grid row; a `Drop` event was emitted.
    Forwarded,
    Ignored,
}

impl PropGrid {
    /// The row and, when it is collapsed, its hidden descendants.
    fn move_block(&self, index: usize) -> Vec<PropId> {
        let Some(id) = self.id_at(index) else {
            return Vec::new();
        };
        let mut block = vec![id];
        let Some(prop) = self.props.get(id) else {
            return block;
        };
        if prop.has_children && !prop.expanded {
            block.extend(
                self.order[index + 1..]
                    .iter()
                    .take_while(|c| self.props.get(**c).is_some_and(|c| c.indent > prop.indent))
                    .copied(),
            );
        }
        block
    }

    /// Move the row at `index` (with its collapsed block) so it lands before
    /// the row now at `target`, or at the end for `None`.
    ///
    /// Targets inside the moved block itself are a no-op.
    pub fn do_move_property(&mut self, index: usize, target: Option<usize>) -> bool {
        if index >= self.order.len() || target == Some(index) {
            return false;
        }
        let block = self.move_block(index);
        let len = block.len();
        if let Some(t) = target
            && t > index
            && t <= index + len
        {
            return false;
        }
        if target.is_none_or(|t| t >= self.order.len()) && index + len == self.order.len() {
            return false;
        }

        let mut from = index;
        match target {
            Some(t) if t < self.order.len() => {
                for (k, id) in block.iter().enumerate() {
                    self.order.insert(t + k, *id);
                }
                if from > t {
                    from += len;
                }
            }
            _ => self.order.extend(&block),
        }
        self.order.drain(from..from + len);
        tracing::debug!(target: targets::DRAG, index, to = ?target, rows = len, "rows moved");
        self.update_grid();
        true
    }

    /// Move a row by `step` slots. Positive steps count from the end of the
    /// row's collapsed block, so moving down by two passes one row.
    pub fn move_property<'k>(&mut self, key: impl Into<PropKey<'k>>, step: isize) -> bool {
        let Some(index) = self.index_of(key) else {
            return false;
        };
        if step == 0 {
            return false;
        }
        let target = if step > 0 {
            let end = index + self.move_block(index).len() - 1;
            Some(end.saturating_add_signed(step)).filter(|t| *t < self.order.len())
        } else {
            Some(index.saturating_add_signed(step))
        };
        self.do_move_property(index, target)
    }

    pub fn move_up<'k>(&mut self, key: impl Into<PropKey<'k>>) -> bool {
        self.move_property(key, -1)
    }

    pub fn move_down<'k>(&mut self, key: impl Into<PropKey<'k>>) -> bool {
        self.move_property(key, 2)
    }

    /// Hand a row to the host's drag loop and apply a drop back onto this
    /// grid. Drops elsewhere are the target's business.
    pub(crate) fn run_drag(&mut self, id: PropId) {
        let Some(prop) = self.props.get(id) else {
            return;
        };
        let data = DragData {
            name: prop.name.clone(),
            source: Some(self.id),
            prop: Some(id),
        };
        if let Some(drag) = self.interaction.drag.as_mut() {
            drag.running = true;
        }
        self.interaction.prop_under_mouse = None;
        self.set_capture(false);
        tracing::debug!(target: targets::DRAG, name = %data.name, "drag started");

        match self.host.start_drag(&data) {
            DragOutcome::DroppedHere(pt) => {
                self.drop_data(pt, &data, None);
            }
            outcome => {
                tracing::debug!(target: targets::DRAG, ?outcome, "drag ended");
            }
        }
        self.interaction.drag = None;
    }

    /// Accept a drop at a client point.
    ///
    /// A row of this grid is moved in front of the row under the point. A
    /// row of `source` is copied in, together with its descendants. Any
    /// other payload is reported to listeners as a `Drop` event.
    pub fn drop_data(
        &mut self,
        pt: Point,
        data: &DragData,
        source: Option<&PropGrid>,
    ) -> DropAction {
        let target = self.hit_test(pt);
        match (data.source, data.prop) {
            (Some(grid), Some(prop)) if grid == self.id => self.drop_own_row(prop, &data.name, target),
            (Some(grid), Some(prop)) => match source {
                Some(src) if src.id == grid => self.drop_foreign_row(src, prop, &data.name, target),
                _ => {
                    tracing::debug!(target: targets::DRAG, "source grid unavailable, forwarding drop");
                    self.forward_drop(data, target)
                }
            },
            _ => self.forward_drop(data, target),
        }
    }

    fn drop_own_row(&mut self, prop: PropId, name: &str, target: Option<usize>) -> DropAction {
        let Some(index) = self.index_of(prop) else {
            return DropAction::Ignored;
        };
        if target.and_then(|t| self.id_at(t)) == Some(prop)
            || self.props.get(prop).is_none_or(|p| p.name != name)
        {
            return DropAction::Ignored;
        }
        if self.do_move_property(index, target) {
            DropAction::Moved
        } else {
            DropAction::Ignored
        }
    }

    fn drop_foreign_row(
        &mut self,
        source: &PropGrid,
        prop: PropId,
        name: &str,
        target: Option<usize>,
    ) -> DropAction {
        let Some(index) = source.index_of(prop) else {
            return DropAction::Ignored;
        };
        let Some(root) = source.get(prop).filter(|p| p.name == name) else {
            return DropAction::Ignored;
        };

        let mut copies = vec![root.duplicate()];
        copies.extend(
            source.order[index + 1..]
                .iter()
                .filter_map(|id| source.get(*id))
                .take_while(|p| p.indent > root.indent)
                .map(Property::duplicate),
        );

        let policy = self.config.copy_policy;
        let mut at = target;
        let mut ids = Vec::with_capacity(copies.len());
        for mut copy in copies {
            if policy == CopyPolicy::ResetStyle {
                reset_style(&mut copy);
            }
            ids.push(self.insert_with(copy, at, Notify::Silent));
            at = at.map(|i| i + 1);
        }
        tracing::debug!(target: targets::DRAG, rows = ids.len(), "rows copied from another grid");
        self.update_grid();
        DropAction::Copied(ids)
    }

    fn forward_drop(&mut self, data: &DragData, target: Option<usize>) -> DropAction {
        let mut event = match target.and_then(|t| self.id_at(t)) {
            Some(id) => self.event_for(PropEventKind::Drop, id),
            None => crate::event::PropEvent::new(PropEventKind::Drop),
        };
        event.index = target;
        event.name = data.name.clone();
        self.emit(event);
        DropAction::Forwarded
    }

    /// A drag is hovering over the grid. Scrolls near the edges and, for
    /// rows of this grid, reorders live.
    pub fn on_drag_over(&mut self, pt: Point, data: &DragData) {
        let view = Rect::new(0.0, 0.0, self.client_size.width, self.client_size.height);
        let margin = self.config.autoscroll_margin;
        if view.contains(pt) {
            if pt.y < margin {
                self.scroll_by_units(-((margin - pt.y) / 3.0).ceil());
            } else if pt.y > view.bottom() - margin {
                self.scroll_by_units(((pt.y - (view.bottom() - margin)) / 3.0).ceil());
            }
        }
        if data.source == Some(self.id) {
            self.drop_data(pt, data, None);
        }
    }
}

fn reset_style(prop: &mut Property) {
    prop.font_label = None;
    prop.font_value = None;
    prop.text_colors = StateColors::default();
    prop.bg_colors = StateColors::default();
    prop.gripper_color = None;
}
