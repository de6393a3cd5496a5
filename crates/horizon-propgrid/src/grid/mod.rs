//! The property grid control.
//!
//! [`PropGrid`] owns an ordered list of [`Property`] rows in a slot-map
//! arena. Order is a separate vector of [`PropId`] handles, so reordering
//! never invalidates a handle. Hierarchy is implicit: a row's parent is the
//! nearest earlier row with a smaller indent, recomputed on every layout.
//!
//! Every change to a row goes through the grid, either directly or via a
//! [`PropMut`] handle. Changes produce [`PropEvent`]s which are delivered to
//! listeners registered with [`PropGrid::connect`] before the grid reacts
//! to them itself. A veto from a listener suppresses the grid's reaction
//! and, for cancelable kinds, rolls the change back.
//!
//! The grid is toolkit-agnostic. Input arrives through the `on_*` methods,
//! painting goes to a [`DrawContext`](crate::host::DrawContext), and
//! everything else is requested from the [`GridHost`].

mod debug;
mod drag;
mod editing;
mod input;
mod layout;
mod menu;
mod paint;
mod prop_mut;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use horizon_propgrid_core::logging::targets;
use horizon_propgrid_core::{ConnectionId, Dispatcher, Point, Size, TaskQueue, Verdict};
use slotmap::SlotMap;

pub use debug::GridTreeDebug;
pub use drag::DropAction;
pub use prop_mut::PropMut;

use crate::art::{ArtProvider, NativeArt};
use crate::config::GridConfig;
use crate::event::{PropEvent, PropEventKind};
use crate::host::{CursorShape, GridHost};
use crate::property::{DEFAULT_MIN_SIZE, Notify, PropId, Property, PropertyBuilder};

use editing::DeferredTask;

/// Process-unique identity of a grid, used to tell drags between grids apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridId(u64);

impl GridId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Ways to address a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKey<'a> {
    Id(PropId),
    Index(usize),
    /// Resolves only when exactly one row has this name.
    Name(&'a str),
}

impl From<PropId> for PropKey<'_> {
    fn from(id: PropId) -> Self {
        PropKey::Id(id)
    }
}

impl From<usize> for PropKey<'_> {
    fn from(index: usize) -> Self {
        PropKey::Index(index)
    }
}

impl<'a> From<&'a str> for PropKey<'a> {
    fn from(name: &'a str) -> Self {
        PropKey::Name(name)
    }
}

impl<'a> From<&'a String> for PropKey<'a> {
    fn from(name: &'a String) -> Self {
        PropKey::Name(name)
    }
}

/// Result of looking a row up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    None,
    One(PropId),
    /// Several rows share the name, in row order.
    Many(Vec<PropId>),
}

impl Lookup {
    /// The single match, if there is exactly one.
    pub fn single(&self) -> Option<PropId> {
        match self {
            Lookup::One(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Lookup::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ResizeMode {
    #[default]
    None,
    Splitter,
    BottomEdge,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PendingDrag {
    /// Client point of the mouse-down that armed the drag.
    pub start: Point,
    pub prop: PropId,
    pub running: bool,
}

/// Transient mouse state between a press and its release.
#[derive(Debug, Default)]
pub(crate) struct Interaction {
    /// Last mouse-down position, in unscrolled coordinates.
    pub pos_mouse_down: Point,
    pub prop_under_mouse: Option<PropId>,
    pub hover: Option<PropId>,
    pub resize: ResizeMode,
    pub drag: Option<PendingDrag>,
    pub captured: bool,
    pub cursor: CursorShape,
    pub tooltip: Option<String>,
    /// Client point for a context menu opened by the current right-click.
    pub menu_at: Point,
}

/// A property grid: an ordered, indented list of typed, editable rows.
pub struct PropGrid {
    id: GridId,
    host: Box<dyn GridHost>,
    art: Box<dyn ArtProvider>,
    config: GridConfig,

    props: SlotMap<PropId, Property>,
    order: Vec<PropId>,
    selected: Option<PropId>,

    listeners: Dispatcher<PropEvent>,
    tasks: TaskQueue<DeferredTask>,

    client_size: Size,
    virtual_size: Size,
    /// Scroll offset in pixels, always a multiple of the scroll unit.
    scroll: Point,

    interaction: Interaction,
}

impl PropGrid {
    /// A grid with the native art provider and default configuration.
    pub fn new(host: impl GridHost + 'static) -> Self {
        Self::from_host(Box::new(host), GridConfig::default())
    }

    pub fn with_config(host: impl GridHost + 'static, config: GridConfig) -> Self {
        Self::from_host(Box::new(host), config)
    }

    pub fn from_host(host: Box<dyn GridHost>, config: GridConfig) -> Self {
        let id = GridId::next();
        tracing::debug!(target: targets::GRID, grid = id.0, "grid created");
        Self {
            id,
            host,
            art: Box::new(NativeArt::new()),
            config,
            props: SlotMap::with_key(),
            order: Vec::new(),
            selected: None,
            listeners: Dispatcher::new(),
            tasks: TaskQueue::new(),
            client_size: Size::ZERO,
            virtual_size: Size::ZERO,
            scroll: Point::ZERO,
            interaction: Interaction::default(),
        }
    }

    pub fn id(&self) -> GridId {
        self.id
    }

    pub fn host(&self) -> &dyn GridHost {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> &mut dyn GridHost {
        self.host.as_mut()
    }

    pub fn art(&self) -> &dyn ArtProvider {
        self.art.as_ref()
    }

    /// Mutable access to the art provider. Call [`update_grid`](Self::update_grid)
    /// after changing metrics.
    pub fn art_mut(&mut self) -> &mut dyn ArtProvider {
        self.art.as_mut()
    }

    /// Swap the art provider and lay out again.
    pub fn set_art_provider(&mut self, art: impl ArtProvider + 'static) {
        tracing::debug!(target: targets::GRID, art = art.name(), "art provider replaced");
        self.art = Box::new(art);
        self.update_grid();
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GridConfig) {
        self.config = config;
        self.update_grid();
    }

    pub fn is_draggable(&self) -> bool {
        self.config.draggable
    }

    /// Allow or forbid row drags in this grid.
    pub fn set_draggable(&mut self, draggable: bool) {
        self.config.draggable = draggable;
    }

    pub fn is_configurable(&self) -> bool {
        self.config.configurable
    }

    /// Allow or forbid the row context menu.
    pub fn set_configurable(&mut self, configurable: bool) {
        self.config.configurable = configurable;
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Register a listener that may veto cancelable events.
    pub fn connect<F>(&mut self, listener: F) -> ConnectionId
    where
        F: FnMut(&PropEvent) -> Verdict + 'static,
    {
        self.listeners.connect(listener)
    }

    /// Register a listener that never vetoes.
    pub fn observe<F>(&mut self, observer: F) -> ConnectionId
    where
        F: FnMut(&PropEvent) + 'static,
    {
        self.listeners.observe(observer)
    }

    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        self.listeners.disconnect(id)
    }

    /// Suppress event delivery, for bulk updates.
    pub fn set_events_blocked(&mut self, blocked: bool) {
        self.listeners.set_blocked(blocked);
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    pub fn count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Row handles in display order.
    pub fn ids(&self) -> &[PropId] {
        &self.order
    }

    /// Rows in display order.
    pub fn iter(&self) -> impl Iterator<Item = (PropId, &Property)> + '_ {
        self.order.iter().filter_map(|id| Some((*id, self.props.get(*id)?)))
    }

    pub fn get(&self, id: PropId) -> Option<&Property> {
        self.props.get(id)
    }

    pub fn get_index(&self, index: usize) -> Option<&Property> {
        self.order.get(index).and_then(|id| self.props.get(*id))
    }

    /// The handle of the row at `index`.
    pub fn id_at(&self, index: usize) -> Option<PropId> {
        self.order.get(index).copied()
    }

    /// All rows named `name`.
    pub fn find(&self, name: &str) -> Lookup {
        let mut hits: Vec<PropId> = self
            .iter()
            .filter(|(_, p)| p.name() == name)
            .map(|(id, _)| id)
            .collect();
        match hits.len() {
            0 => Lookup::None,
            1 => Lookup::One(hits.remove(0)),
            _ => Lookup::Many(hits),
        }
    }

    /// Resolve any [`PropKey`] to a live handle.
    pub fn resolve<'k>(&self, key: impl Into<PropKey<'k>>) -> Option<PropId> {
        match key.into() {
            PropKey::Id(id) => self.props.contains_key(id).then_some(id),
            PropKey::Index(index) => self.id_at(index),
            PropKey::Name(name) => {
                let found = self.find(name);
                if let Lookup::Many(ids) = &found {
                    tracing::debug!(target: targets::GRID, name, matches = ids.len(), "ambiguous row name");
                }
                found.single()
            }
        }
    }

    /// Current position of a row.
    pub fn index_of<'k>(&self, key: impl Into<PropKey<'k>>) -> Option<usize> {
        let id = self.resolve(key)?;
        self.order.iter().position(|p| *p == id)
    }

    /// Index of the selected row.
    pub fn selection(&self) -> Option<usize> {
        self.selected.and_then(|id| self.index_of(id))
    }

    pub fn selected(&self) -> Option<PropId> {
        self.selected
    }

    pub fn selected_prop(&self) -> Option<&Property> {
        self.selected.and_then(|id| self.props.get(id))
    }

    /// A mutation handle for one row.
    pub fn prop_mut<'k>(&mut self, key: impl Into<PropKey<'k>>) -> Option<PropMut<'_>> {
        let id = self.resolve(key)?;
        Some(PropMut::new(self, id))
    }

    // -------------------------------------------------------------------------
    // Insertion and removal
    // -------------------------------------------------------------------------

    /// Insert a row at `index`, or append when `index` is `None` or past the
    /// end. Emits `Insert` and lays the grid out.
    pub fn insert(&mut self, prop: impl Into<Property>, index: Option<usize>) -> PropId {
        self.insert_with(prop, index, Notify::Emit)
    }

    /// Like [`insert`](Self::insert). With [`Notify::Silent`] only the
    /// hierarchy is recomputed, for bulk construction followed by one
    /// [`update_grid`](Self::update_grid).
    pub fn insert_with(
        &mut self,
        prop: impl Into<Property>,
        index: Option<usize>,
        notify: Notify,
    ) -> PropId {
        let mut prop = prop.into();
        prop.editor = None;
        prop.activated = false;
        if prop.min_size == DEFAULT_MIN_SIZE {
            prop.min_size = self.config.default_min_size();
        }
        let name = prop.name.clone();
        let id = self.props.insert(prop);
        let at = match index {
            Some(i) if i < self.order.len() => i,
            _ => self.order.len(),
        };
        self.order.insert(at, id);
        tracing::debug!(target: targets::GRID, name = %name, index = at, "row inserted");

        self.emit(self.event_for(PropEventKind::Insert, id));
        if notify.is_silent() {
            self.check_prop();
        } else {
            self.update_grid();
        }
        id
    }

    pub fn append(&mut self, prop: impl Into<Property>) -> PropId {
        self.insert(prop, None)
    }

    /// Insert a separator row.
    pub fn insert_separator(
        &mut self,
        name: &str,
        label: &str,
        index: Option<usize>,
    ) -> PropId {
        let builder = PropertyBuilder::separator(name);
        let builder = if label.is_empty() { builder } else { builder.label(label) };
        self.insert(builder, index)
    }

    /// Insert a copy of `prop` (from this grid or another one).
    pub fn copy_prop(&mut self, prop: &Property, index: Option<usize>) -> PropId {
        self.insert(prop.duplicate(), index)
    }

    /// Remove a row unconditionally.
    ///
    /// A selected row's edit is committed first and the selection moves to
    /// the row now at the same index (or the new last row). Any other open
    /// editor on the row is discarded.
    pub fn remove<'k>(&mut self, key: impl Into<PropKey<'k>>) -> bool {
        self.remove_with(key, Notify::Emit)
    }

    pub fn remove_with<'k>(&mut self, key: impl Into<PropKey<'k>>, notify: Notify) -> bool {
        let Some(id) = self.resolve(key) else {
            return false;
        };
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let was_selected = self.selected == Some(id);
        if was_selected {
            self.set_selection(None);
        }
        self.destroy_editor(id);
        self.tasks.cancel_where(|t| t.prop() == id);
        if self.interaction.prop_under_mouse == Some(id) {
            self.interaction.prop_under_mouse = None;
        }
        if self.interaction.hover == Some(id) {
            self.interaction.hover = None;
        }
        if self.interaction.drag.is_some_and(|d| d.prop == id) {
            self.interaction.drag = None;
        }

        self.order.remove(index);
        if let Some(prop) = self.props.remove(id) {
            tracing::debug!(target: targets::GRID, name = %prop.name, index, "row removed");
        }

        if was_selected && !self.order.is_empty() {
            let next = self.order[index.min(self.order.len() - 1)];
            self.set_selection(Some(next));
        }

        if notify.is_silent() {
            self.check_prop();
        } else {
            self.update_grid();
        }
        true
    }

    /// Ask listeners, then remove. Returns `false` if vetoed or not found.
    pub fn delete<'k>(&mut self, key: impl Into<PropKey<'k>>) -> bool {
        let Some(id) = self.resolve(key) else {
            return false;
        };
        if self.emit(self.event_for(PropEventKind::Delete, id)).is_vetoed() {
            tracing::debug!(target: targets::GRID, "delete vetoed");
            return false;
        }
        self.remove(id)
    }

    /// Delete every row, last first. Vetoed rows stay.
    pub fn delete_all(&mut self) {
        for id in self.order.clone().into_iter().rev() {
            self.delete(id);
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Select a row, or clear the selection.
    ///
    /// The previously selected row is deactivated, which commits and closes
    /// its editor. The new row is activated and `Selected` is emitted.
    /// Returns `false` if the selection did not change.
    pub fn set_selection(&mut self, id: Option<PropId>) -> bool {
        let id = id.filter(|id| self.props.contains_key(*id));
        if id == self.selected {
            return false;
        }
        if let Some(old) = self.selected.take() {
            self.deactivate(old);
        }
        self.selected = id;
        if let Some(new) = id {
            if let Some(prop) = self.props.get_mut(new) {
                prop.activated = true;
            }
            self.notify(PropEventKind::Selected, new);
        }
        self.host.refresh(None);
        true
    }

    /// Select by index; out-of-range clears the selection.
    pub fn set_selection_index(&mut self, index: Option<usize>) -> bool {
        self.set_selection(index.and_then(|i| self.id_at(i)))
    }

    fn deactivate(&mut self, id: PropId) {
        if let Some(prop) = self.props.get_mut(id) {
            prop.activated = false;
        }
        self.commit_and_close(id);
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Snapshot of a row for an event.
    pub(crate) fn event_for(&self, kind: PropEventKind, id: PropId) -> PropEvent {
        let mut event = PropEvent::new(kind);
        event.prop = Some(id);
        event.index = self.index_of(id);
        if let Some(prop) = self.props.get(id) {
            event.name = prop.name.clone();
            event.value = Some(prop.value.clone());
        }
        event
    }

    /// Deliver an event to listeners only.
    pub(crate) fn emit(&mut self, event: PropEvent) -> Verdict {
        let verdict = self.listeners.emit(&event);
        tracing::trace!(
            target: targets::GRID,
            kind = %event.kind,
            name = %event.name,
            vetoed = verdict.is_vetoed(),
            "event delivered"
        );
        verdict
    }

    /// Deliver an event about a row, then let the grid react unless vetoed.
    pub(crate) fn notify(&mut self, kind: PropEventKind, id: PropId) -> Verdict {
        let verdict = self.emit(self.event_for(kind, id));
        if verdict.is_vetoed() {
            return verdict;
        }
        match kind {
            PropEventKind::Collapsed
            | PropEventKind::Expanded
            | PropEventKind::Indent
            | PropEventKind::Resize => self.update_grid(),
            PropEventKind::Refresh => self.refresh_prop(id),
            PropEventKind::RightClick => self.show_context_menu(id),
            _ => {}
        }
        verdict
    }

    fn set_capture(&mut self, capture: bool) {
        if capture == self.interaction.captured {
            return;
        }
        self.interaction.captured = capture;
        if capture {
            self.host.capture_mouse();
        } else {
            self.host.release_mouse();
        }
    }
}

impl fmt::Debug for PropGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropGrid")
            .field("id", &self.id)
            .field("art", &self.art.name())
            .field("rows", &self.order.len())
            .field("selection", &self.selection())
            .field("client_size", &self.client_size)
            .field("scroll", &self.scroll)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::headless::HeadlessHost;
    use crate::value::PropValue;

    fn grid_abc() -> PropGrid {
        let mut grid = PropGrid::new(HeadlessHost::new());
        grid.set_client_size(Size::new(300.0, 200.0));
        for name in ["a", "b", "c"] {
            grid.append(Property::builder(name));
        }
        grid
    }

    #[test]
    fn test_grid_ids_are_unique() {
        let a = PropGrid::new(HeadlessHost::new());
        let b = PropGrid::new(HeadlessHost::new());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_insert_positions() {
        let mut grid = grid_abc();
        grid.insert(Property::builder("first"), Some(0));
        grid.insert(Property::builder("last"), Some(99));
        let names: Vec<_> = grid.iter().map(|(_, p)| p.name().to_string()).collect();
        assert_eq!(names, ["first", "a", "b", "c", "last"]);
    }

    #[test]
    fn test_find_and_resolve() {
        let mut grid = grid_abc();
        grid.append(Property::builder("a"));
        assert!(matches!(grid.find("a"), Lookup::Many(ref ids) if ids.len() == 2));
        assert!(grid.find("zz").is_none());
        assert_eq!(grid.resolve("a"), None);
        assert_eq!(grid.resolve("b"), grid.id_at(1));
        assert_eq!(grid.index_of("c"), Some(2));
    }

    #[test]
    fn test_remove_reselects_same_index() {
        let mut grid = grid_abc();
        grid.set_selection_index(Some(2));
        assert!(grid.remove(2usize));
        assert_eq!(grid.selection(), Some(1));
        assert!(grid.get_index(1).is_some_and(|p| p.is_activated()));

        grid.set_selection_index(Some(0));
        grid.remove(0usize);
        assert_eq!(grid.selected_prop().map(|p| p.name()), Some("b"));
    }

    #[test]
    fn test_removed_handle_is_dead() {
        let mut grid = grid_abc();
        let b = grid.resolve("b").unwrap();
        grid.remove(b);
        assert!(grid.get(b).is_none());
        assert!(grid.prop_mut(b).is_none());
        assert!(!grid.remove(b));
    }

    #[test]
    fn test_delete_veto() {
        let mut grid = grid_abc();
        grid.connect(|e| Verdict::from(!(e.kind == PropEventKind::Delete && e.name == "b")));
        grid.delete_all();
        let names: Vec<_> = grid.iter().map(|(_, p)| p.name().to_string()).collect();
        assert_eq!(names, ["b"]);
    }

    #[test]
    fn test_copy_prop_leaves_editor_behind() {
        let host = HeadlessHost::new();
        let mut grid = PropGrid::new(host.clone());
        grid.set_client_size(Size::new(300.0, 200.0));
        let id = grid.append(PropertyBuilder::int("n").value(4));
        assert!(grid.create_editor(id));

        let original = grid.get(id).unwrap().clone();
        let copy = grid.copy_prop(&original, Some(0));
        let copied = grid.get(copy).unwrap();
        assert!(!copied.is_editing());
        assert_eq!(copied.value(), &PropValue::Int(4));
        assert_eq!(grid.index_of(copy), Some(0));
        assert!(grid.get(id).unwrap().is_editing());
        assert_eq!(host.state().live_editors(), 1);
    }

    #[test]
    fn test_selection_emits_selected() {
        let mut grid = grid_abc();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        grid.observe(move |e| sink.lock().unwrap().push((e.kind, e.index)));

        assert!(grid.set_selection_index(Some(1)));
        assert!(!grid.set_selection_index(Some(1)));
        grid.set_selection(None);

        let seen = seen.lock().unwrap();
        assert!(seen.contains(&(PropEventKind::Selected, Some(1))));
        assert!(grid.get_index(1).is_some_and(|p| !p.is_activated()));
        assert_eq!(grid.selection(), None);
    }

    #[test]
    fn test_insert_applies_config_min_size() {
        let config = GridConfig {
            default_min_height: 30.0,
            ..GridConfig::default()
        };
        let mut grid = PropGrid::with_config(HeadlessHost::new(), config);
        let id = grid.append(Property::builder("x"));
        assert_eq!(grid.get(id).unwrap().min_size(), Size::new(200.0, 30.0));
    }
}
