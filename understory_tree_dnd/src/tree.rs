// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`DndTree`]: one drag-and-drop tree view over external records.
//!
//! The tree owns a live [`Outline`](understory_outline::Outline) mirrored from
//! the host's [`NodeRecord`]s, the [`ZoneRegistry`] of the last render pass,
//! and an outbound queue of [`TreeEvent`]s. The [`DragSession`] is owned by
//! the host and passed into each drag operation, so one session can span
//! several trees.
//!
//! Every structural change resets the zone registry and marks a render
//! pending; zones only come back when the host calls [`DndTree::render`].
//! The render pass restores a lost active zone when it is still a legal
//! target, and otherwise moves a `Droppable` session back to `Dragging`.

use alloc::vec::Vec;

use understory_outline::{Coordinates, NodeId, OutlineError};

use crate::drag::{DragPhase, DragSession};
use crate::error::DndError;
use crate::options::TreeOptions;
use crate::records::{NodeRecord, record_at};
use crate::registry::{RecordZoneTree, ZoneRegistry, ZoneRequest};
use crate::sync::{self, Model};

/// Identifier of a tree instance; lets a shared session tell trees apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(pub u32);

/// The item carried by a [`DragSession`] between trees.
#[derive(Clone, Debug, PartialEq)]
pub struct DragItem<T> {
    /// Tree the drag started in.
    pub tree: TreeId,
    /// Coordinates of the dragged node in that tree.
    pub coordinates: Coordinates,
    /// Snapshot of the dragged node's payload, for drop predicates.
    pub data: T,
    node: NodeId,
    epoch: u32,
}

/// The drag session type shared by [`DndTree`]s with payload `T` and
/// container handle `C`.
pub type TreeDrag<T, C> = DragSession<DragItem<T>, C>;

bitflags::bitflags! {
    /// Display state of a visible row.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RowFlags: u8 {
        /// The node may be picked up.
        const DRAGGABLE    = 0b0000_0001;
        /// The node has at least one child.
        const HAS_CHILDREN = 0b0000_0010;
        /// The node's children are hidden.
        const COLLAPSED    = 0b0000_0100;
        /// The node is the one being dragged.
        const DRAGGED      = 0b0000_1000;
    }
}

/// One visible node, in display order.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// Node coordinates.
    pub coordinates: Coordinates,
    /// Nesting depth; top-level rows are at depth 1.
    pub depth: usize,
    /// Horizontal offset in logical pixels.
    pub indent: f64,
    /// Display flags.
    pub flags: RowFlags,
}

/// Result of [`DndTree::render`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderPass {
    /// Visible rows in pre-order.
    pub rows: Vec<Row>,
    /// Number of drop zones registered.
    pub zones: usize,
}

/// Details of a completed drop.
///
/// Record snapshots are taken after synchronization. Parents are `None` at the
/// top level.
#[derive(Clone, Debug, PartialEq)]
pub struct DropEvent<T> {
    /// Tree the node came from.
    pub source_tree: TreeId,
    /// The moved node.
    pub target: NodeRecord<T>,
    /// Former parent.
    pub old_parent: Option<NodeRecord<T>>,
    /// Former index among the old parent's children.
    pub old_index: usize,
    /// New parent.
    pub new_parent: Option<NodeRecord<T>>,
    /// Final index among the new parent's children.
    pub new_index: usize,
    /// Former coordinates, in the source tree.
    pub old_coordinates: Coordinates,
    /// Coordinates after the drop.
    pub new_coordinates: Coordinates,
}

/// Outbound notification.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeEvent<T> {
    /// The records changed; read them with [`DndTree::records`].
    Changed,
    /// A node was dropped into this tree.
    Dropped(DropEvent<T>),
}

/// A drag-and-drop tree over records with payload `T`; `C` is the host's
/// drop-zone container handle.
#[derive(Debug)]
pub struct DndTree<T, C> {
    id: TreeId,
    state: Option<State<T>>,
    zones: ZoneRegistry<C>,
    events: Vec<TreeEvent<T>>,
    render_pending: bool,
    /// Active zone dropped by a reset, revisited on the next render.
    lost_active: Option<Coordinates>,
}

#[derive(Debug)]
struct State<T> {
    options: TreeOptions<T>,
    model: Model<T>,
    root: NodeId,
    /// Records mirrored into `model`: everything, or the current page.
    records: Vec<NodeRecord<T>>,
    /// The full array in list mode.
    backing: Option<Vec<NodeRecord<T>>>,
    /// Bumped whenever `model` is rebuilt; older node ids are meaningless.
    epoch: u32,
}

/// A subtree taken out of a source tree.
struct Taken<T> {
    record: NodeRecord<T>,
    coordinates: Coordinates,
    parent: Coordinates,
    index: usize,
    written: Vec<NodeRecord<T>>,
}

impl<T, C> DndTree<T, C> {
    /// Create an uninitialized tree.
    pub fn new(id: TreeId) -> Self {
        Self {
            id,
            state: None,
            zones: ZoneRegistry::new(),
            events: Vec::new(),
            render_pending: false,
            lost_active: None,
        }
    }

    /// This tree's identifier.
    pub fn id(&self) -> TreeId {
        self.id
    }

    /// Returns `true` after a change that the host has not rendered yet.
    pub fn is_render_pending(&self) -> bool {
        self.render_pending
    }

    /// The visible records: all of them, or the current page in list mode.
    pub fn records(&self) -> Result<&[NodeRecord<T>], DndError> {
        Ok(&self.state()?.records)
    }

    /// The full record array; differs from [`records`](Self::records) only in
    /// list mode.
    pub fn backing(&self) -> Result<&[NodeRecord<T>], DndError> {
        let state = self.state()?;
        Ok(state.backing.as_deref().unwrap_or(&state.records))
    }

    /// The options passed to [`init`](Self::init).
    pub fn options(&self) -> Result<&TreeOptions<T>, DndError> {
        Ok(&self.state()?.options)
    }

    /// The drop zones of the last render pass.
    pub fn zones(&self) -> &ZoneRegistry<C> {
        &self.zones
    }

    /// Take the queued notifications.
    pub fn drain_events(&mut self) -> Vec<TreeEvent<T>> {
        core::mem::take(&mut self.events)
    }

    /// Take the queued drop-zone show/clear requests.
    pub fn drain_zone_requests(&mut self) -> Vec<ZoneRequest<C>> {
        self.zones.drain_requests()
    }

    fn state(&self) -> Result<&State<T>, DndError> {
        self.state.as_ref().ok_or(DndError::NotInitialized)
    }

    fn reset_zones(&mut self)
    where
        C: Clone,
    {
        if let Some(active) = self.zones.active() {
            self.lost_active = Some(active.clone());
        }
        self.zones.reset();
    }
}

impl<T: Clone, C: Clone> DndTree<T, C> {
    /// Load `records` under `options`, replacing any previous content.
    ///
    /// In list mode nested children are stripped and only the current page is
    /// mirrored.
    pub fn init(&mut self, records: Vec<NodeRecord<T>>, options: TreeOptions<T>) {
        let (records, backing) = match options.list_mode() {
            Some(page) => {
                let backing: Vec<_> = records
                    .into_iter()
                    .map(|r| NodeRecord {
                        children: None,
                        ..r
                    })
                    .collect();
                (page.slice(&backing).to_vec(), Some(backing))
            }
            None => (records, None),
        };
        let (model, root) = sync::build(&records);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            tree = self.id.0,
            nodes = model.len() - 1,
            list_mode = backing.is_some(),
            "tree initialized"
        );
        let epoch = self.state.as_ref().map_or(0, |s| s.epoch.wrapping_add(1));
        self.state = Some(State {
            options,
            model,
            root,
            records,
            backing,
            epoch,
        });
        self.reset_zones();
        self.render_pending = true;
    }

    /// Rebuild the drop zones and return the visible rows.
    ///
    /// Slots `0..=len` are registered for the top level and for every expanded
    /// node that accepts children, except inside the subtree being dragged.
    /// An empty tree registers a single placeholder slot `[0]`.
    /// `container_for` supplies the host container for each slot.
    ///
    /// If this tree held the active zone of a `Droppable` session, that zone
    /// is re-activated when it is still registered and legal; otherwise the
    /// session falls back to `Dragging`.
    pub fn render<F>(
        &mut self,
        session: &mut TreeDrag<T, C>,
        mut container_for: F,
    ) -> Result<RenderPass, DndError>
    where
        F: FnMut(&Coordinates) -> C,
    {
        self.reset_zones();
        let previous = self.lost_active.take();
        let state = self.state.as_ref().ok_or(DndError::NotInitialized)?;
        let source = session
            .item()
            .filter(|item| item.tree == self.id && state.holds(item))
            .map(|item| item.coordinates.clone());
        let mut rows = Vec::new();
        if state.records.is_empty() {
            let slot = Coordinates::from([0]);
            let container = container_for(&slot);
            self.zones.register_placeholder(slot, container);
        } else {
            let mut walker = Walker {
                options: &state.options,
                source: source.as_ref(),
                zones: &mut self.zones,
                container_for: &mut container_for,
                rows: &mut rows,
            };
            walker.group(&state.records, &Coordinates::root(), true);
        }
        if let Some(slot) = previous
            && session.phase() == DragPhase::Droppable
        {
            let restored = self.zones.contains(&slot)
                && session
                    .item()
                    .is_some_and(|item| state.accepts(self.id, item, &slot));
            if restored {
                let tree = RecordZoneTree::new(&state.records, &state.options, source);
                self.zones.activate(&slot, &tree)?;
            } else {
                #[cfg(feature = "tracing")]
                tracing::trace!(tree = self.id.0, slot = %slot, "active zone lost");
                session.leave_droppable()?;
            }
        }
        self.render_pending = false;
        #[cfg(feature = "tracing")]
        tracing::trace!(
            tree = self.id.0,
            rows = rows.len(),
            zones = self.zones.len(),
            "render pass"
        );
        Ok(RenderPass {
            rows,
            zones: self.zones.len(),
        })
    }

    /// Pick up the node at `node`, dragged out of the host container `origin`.
    pub fn begin_drag(
        &mut self,
        session: &mut TreeDrag<T, C>,
        node: &Coordinates,
        origin: C,
    ) -> Result<(), DndError> {
        let state = self.state.as_ref().ok_or(DndError::NotInitialized)?;
        let (id, entry) = state
            .entry_at(node)
            .ok_or_else(|| DndError::NotFound(node.clone()))?;
        if !state.options.dragging_allowed(&entry.data) {
            return Err(DndError::DraggingNotAllowed(node.clone()));
        }
        let item = DragItem {
            tree: self.id,
            coordinates: node.clone(),
            data: entry.data.clone(),
            node: id,
            epoch: state.epoch,
        };
        session.begin(item, origin)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(tree = self.id.0, node = %node, "drag started");
        self.render_pending = true;
        Ok(())
    }

    /// The pointer is over `slot`.
    ///
    /// A registered slot that the drop predicate accepts becomes the active
    /// zone, its family is shown, and the session moves to `Droppable`.
    /// Anything else clears the family and the session falls back to
    /// `Dragging`. Returns whether `slot` is a legal target. An idle session
    /// is never over a legal target.
    pub fn hover(
        &mut self,
        session: &mut TreeDrag<T, C>,
        slot: &Coordinates,
    ) -> Result<bool, DndError> {
        let state = self.state.as_ref().ok_or(DndError::NotInitialized)?;
        let Some(item) = session.item() else {
            return Ok(false);
        };
        let source = (item.tree == self.id).then(|| item.coordinates.clone());
        let legal = self.zones.contains(slot) && state.accepts(self.id, item, slot);
        self.lost_active = None;
        #[cfg(feature = "tracing")]
        tracing::trace!(tree = self.id.0, slot = %slot, legal, "hover");
        if legal {
            let tree = RecordZoneTree::new(&state.records, &state.options, source);
            self.zones.activate(slot, &tree)?;
            if session.phase() == DragPhase::Dragging {
                session.enter_droppable()?;
            }
        } else {
            self.zones.clear();
            if session.phase() == DragPhase::Droppable {
                session.leave_droppable()?;
            }
        }
        Ok(legal)
    }

    /// The pointer left this tree: clear the family and fall back to `Dragging`.
    pub fn leave(&mut self, session: &mut TreeDrag<T, C>) -> Result<(), DndError> {
        self.state()?;
        let held = self.zones.active().is_some() || self.lost_active.take().is_some();
        self.zones.clear();
        if held && session.phase() == DragPhase::Droppable {
            session.leave_droppable()?;
        }
        Ok(())
    }

    /// Promote a secondary zone of the shown family to active.
    ///
    /// The slot must accept the item dragged in `session`; a family member
    /// that the drop predicate rejects is never promoted.
    pub fn swap_active(
        &mut self,
        session: &TreeDrag<T, C>,
        slot: &Coordinates,
    ) -> Result<(), DndError> {
        let state = self.state()?;
        let item = session.item().ok_or(DndError::NoActiveZone)?;
        if !state.accepts(self.id, item, slot) {
            return Err(DndError::DropNotAllowed(slot.clone()));
        }
        Ok(self.zones.swap_active(slot)?)
    }

    /// Drop the dragged node at the active zone.
    ///
    /// The drag must have started in this tree; use
    /// [`drop_from`](Self::drop_from) for a node from another tree. An active
    /// zone the item may not land in is cleared and the session falls back to
    /// `Dragging`. Once captured, the session is released whether or not the
    /// move succeeds.
    pub fn drop(&mut self, session: &mut TreeDrag<T, C>) -> Result<(), DndError> {
        let state = self.state.as_mut().ok_or(DndError::NotInitialized)?;
        if session.item().is_some_and(|item| item.tree != self.id) {
            return Err(DndError::ForeignSource);
        }
        let Some(slot) = self.zones.active().cloned() else {
            if self.lost_active.take().is_some() && session.phase() == DragPhase::Droppable {
                session.leave_droppable()?;
            }
            return Err(DndError::NoActiveZone);
        };
        if session
            .item()
            .is_some_and(|item| !state.accepts(self.id, item, &slot))
        {
            self.zones.clear();
            if session.phase() == DragPhase::Droppable {
                session.leave_droppable()?;
            }
            return Err(DndError::DropNotAllowed(slot));
        }
        let node = session.capture()?.node;
        let moved = state.move_within(self.id, node, &slot);
        session.release();
        match moved {
            Ok(event) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    tree = self.id.0,
                    from = %event.old_coordinates,
                    to = %event.new_coordinates,
                    "node dropped"
                );
                self.changed();
                self.events.push(TreeEvent::Dropped(event));
                Ok(())
            }
            Err(err) => {
                self.zones.clear();
                self.render_pending = true;
                Err(err)
            }
        }
    }

    /// Drop a node dragged out of `source` at this tree's active zone.
    ///
    /// The subtree is taken out of `source`, which is synchronized and gets a
    /// [`TreeEvent::Changed`], and grafted here. The target slot is validated
    /// before anything is detached.
    pub fn drop_from(
        &mut self,
        session: &mut TreeDrag<T, C>,
        source: &mut Self,
    ) -> Result<(), DndError> {
        match session.item().map(|item| item.tree) {
            Some(tree) if tree == self.id => return self.drop(session),
            Some(tree) if tree != source.id => return Err(DndError::ForeignSource),
            _ => {}
        }
        let target = self.state.as_mut().ok_or(DndError::NotInitialized)?;
        let origin = source.state.as_mut().ok_or(DndError::NotInitialized)?;
        let Some(slot) = self.zones.active().cloned() else {
            if self.lost_active.take().is_some() && session.phase() == DragPhase::Droppable {
                session.leave_droppable()?;
            }
            return Err(DndError::NoActiveZone);
        };
        if session
            .item()
            .is_some_and(|item| !target.accepts(self.id, item, &slot))
        {
            self.zones.clear();
            if session.phase() == DragPhase::Droppable {
                session.leave_droppable()?;
            }
            return Err(DndError::DropNotAllowed(slot));
        }
        if let Some(item) = session.item()
            && !origin.holds(item)
        {
            return Err(DndError::NotFound(item.coordinates.clone()));
        }
        let (parent_path, index) = split_slot(&slot)?;
        let new_parent = target
            .model
            .descendant(target.root, &parent_path)
            .ok_or(DndError::NotFound(parent_path))?;
        let len = target.model.children_of(new_parent).len();
        if index > len {
            return Err(OutlineError::IndexOutOfRange { index, len }.into());
        }

        let node = session.capture()?.node;
        let taken = origin.take(node);
        session.release();
        let taken = match taken {
            Ok(taken) => taken,
            Err(err) => {
                self.zones.clear();
                return Err(err);
            }
        };
        source.changed();

        let (new_coordinates, new_parent_at, written) =
            target.put(new_parent, index, &taken.record)?;
        let event = DropEvent {
            source_tree: source.id,
            target: snapshot(&written, &new_coordinates)
                .ok_or_else(|| DndError::NotFound(new_coordinates.clone()))?,
            old_parent: snapshot(&taken.written, &taken.parent),
            old_index: taken.index,
            new_parent: snapshot(&written, &new_parent_at),
            new_index: index,
            old_coordinates: taken.coordinates,
            new_coordinates,
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            from_tree = source.id.0,
            to_tree = self.id.0,
            from = %event.old_coordinates,
            to = %event.new_coordinates,
            "node dropped across trees"
        );
        self.changed();
        self.events.push(TreeEvent::Dropped(event));
        Ok(())
    }

    /// Abandon the drag. Nothing was detached, so nothing is rolled back.
    pub fn release(
        &mut self,
        session: &mut TreeDrag<T, C>,
    ) -> Result<Option<(DragItem<T>, C)>, DndError> {
        self.state()?;
        self.zones.clear();
        let released = session.release();
        if released.is_some() {
            self.render_pending = true;
        }
        Ok(released)
    }

    /// Remove the node at `node` and its subtree; returns the removed records.
    ///
    /// The top level's payload-less root (`[]`) cannot be removed.
    pub fn remove(&mut self, node: &Coordinates) -> Result<NodeRecord<T>, DndError> {
        let state = self.state.as_mut().ok_or(DndError::NotInitialized)?;
        let id = state
            .model
            .descendant(state.root, node)
            .ok_or_else(|| DndError::NotFound(node.clone()))?;
        let removed = state.model.remove(id)?;
        let record = sync::extract(&state.model, removed);
        state.model.discard(removed);
        state.sync();
        self.changed();
        record.ok_or_else(|| DndError::NotFound(node.clone()))
    }

    /// Expand or collapse the node at `node`.
    pub fn set_collapsed(&mut self, node: &Coordinates, collapsed: bool) -> Result<(), DndError> {
        let state = self.state.as_mut().ok_or(DndError::NotInitialized)?;
        let id = state
            .node_at(node)
            .ok_or_else(|| DndError::NotFound(node.clone()))?;
        match state.model.data_mut(id) {
            Some(Some(entry)) => entry.collapsed = collapsed,
            _ => return Err(DndError::NotFound(node.clone())),
        }
        state.sync();
        self.changed();
        Ok(())
    }

    /// Show another page in list mode.
    pub fn set_page(&mut self, page: usize) -> Result<(), DndError> {
        let state = self.state.as_mut().ok_or(DndError::NotInitialized)?;
        if state.options.list_mode().is_none() {
            return Err(DndError::InvalidOperation("not in list mode"));
        }
        state.options.set_page(page);
        state.reload_page();
        self.reset_zones();
        self.render_pending = true;
        Ok(())
    }

    fn changed(&mut self) {
        self.reset_zones();
        self.render_pending = true;
        self.events.push(TreeEvent::Changed);
    }
}

impl<T: Clone> State<T> {
    fn node_at(&self, node: &Coordinates) -> Option<NodeId> {
        if node.is_root() {
            return None;
        }
        self.model.descendant(self.root, node)
    }

    fn entry_at(&self, node: &Coordinates) -> Option<(NodeId, &sync::Entry<T>)> {
        let id = self.node_at(node)?;
        let entry = self.model.data(id)?.as_ref()?;
        Some((id, entry))
    }

    /// Whether `item` may land at `slot`: never inside its own subtree, and
    /// only where the drop predicate agrees.
    fn accepts(&self, tree: TreeId, item: &DragItem<T>, slot: &Coordinates) -> bool {
        if item.tree == tree && (!self.holds(item) || item.coordinates.is_ancestor_of(slot)) {
            return false;
        }
        self.drop_allowed(&item.data, slot)
    }

    /// Whether the dragged node is still where the drag picked it up.
    fn holds(&self, item: &DragItem<T>) -> bool {
        item.epoch == self.epoch
            && self
                .model
                .coordinates(item.node)
                .is_ok_and(|at| at == item.coordinates)
    }

    fn drop_allowed(&self, source: &T, slot: &Coordinates) -> bool {
        let (Some(parent), Some(index)) = (slot.parent(), slot.last()) else {
            return false;
        };
        let parent_data = if parent.is_root() {
            None
        } else {
            match record_at(&self.records, &parent) {
                Some(record) => Some(&record.data),
                None => return false,
            }
        };
        self.options.drop_allowed(source, parent_data, index)
    }

    /// Move `node` to `slot` within this tree.
    fn move_within(
        &mut self,
        tree: TreeId,
        node: NodeId,
        slot: &Coordinates,
    ) -> Result<DropEvent<T>, DndError> {
        let (parent_path, slot_index) = split_slot(slot)?;
        let new_parent = self
            .model
            .descendant(self.root, &parent_path)
            .ok_or(DndError::NotFound(parent_path))?;
        if new_parent == node || self.model.is_ancestor_of(node, new_parent) {
            return Err(DndError::InvalidOperation(
                "cannot drop a node into its own subtree",
            ));
        }
        let old_parent = self
            .model
            .parent_of(node)
            .ok_or(OutlineError::StaleNode(node))?;
        let old_index = self
            .model
            .index_in_parent(node)
            .ok_or(OutlineError::Inconsistent(node))?;
        let old_coordinates = self.model.coordinates(node)?;
        // Slots count the node itself; positions after it shift left by one.
        let new_index = if new_parent == old_parent && old_index < slot_index {
            slot_index - 1
        } else {
            slot_index
        };
        self.model.insert_child(new_parent, node, new_index)?;
        sync::mark_explicit(&mut self.model, new_parent);

        let new_coordinates = self.model.coordinates(node)?;
        let old_parent_at = self.model.coordinates(old_parent)?;
        let new_parent_at = self.model.coordinates(new_parent)?;
        let written = self.sync();
        Ok(DropEvent {
            source_tree: tree,
            target: snapshot(&written, &new_coordinates)
                .ok_or_else(|| DndError::NotFound(new_coordinates.clone()))?,
            old_parent: snapshot(&written, &old_parent_at),
            old_index,
            new_parent: snapshot(&written, &new_parent_at),
            new_index,
            old_coordinates,
            new_coordinates,
        })
    }

    /// Detach and free `node`, returning its records.
    fn take(&mut self, node: NodeId) -> Result<Taken<T>, DndError> {
        let coordinates = self.model.coordinates(node)?;
        let parent = self
            .model
            .parent_of(node)
            .ok_or(OutlineError::StaleNode(node))?;
        let index = self
            .model
            .index_in_parent(node)
            .ok_or(OutlineError::Inconsistent(node))?;
        let record = sync::extract(&self.model, node)
            .ok_or_else(|| DndError::NotFound(coordinates.clone()))?;
        self.model.remove(node)?;
        self.model.discard(node);
        let parent = self.model.coordinates(parent)?;
        let written = self.sync();
        Ok(Taken {
            record,
            coordinates,
            parent,
            index,
            written,
        })
    }

    /// Graft `record` as child `index` of `parent`; returns the new node's
    /// coordinates, the parent's coordinates, and the synchronized records.
    fn put(
        &mut self,
        parent: NodeId,
        index: usize,
        record: &NodeRecord<T>,
    ) -> Result<(Coordinates, Coordinates, Vec<NodeRecord<T>>), DndError> {
        let node = sync::graft(&mut self.model, parent, index, record)?;
        sync::mark_explicit(&mut self.model, parent);
        let at = self.model.coordinates(node)?;
        let parent_at = self.model.coordinates(parent)?;
        Ok((at, parent_at, self.sync()))
    }

    /// Write the model back to the records; returns what was written.
    ///
    /// In list mode the written page replaces its range of the backing array
    /// and the page is taken again, so the model may be rebuilt.
    fn sync(&mut self) -> Vec<NodeRecord<T>> {
        let written = sync::write_back(&self.model, self.root);
        if let Some(page) = self.options.list_mode()
            && let Some(backing) = self.backing.as_mut()
        {
            page.splice(backing, written.clone());
            self.reload_page();
        } else {
            self.records = written.clone();
        }
        written
    }

    fn reload_page(&mut self) {
        if let Some(page) = self.options.list_mode()
            && let Some(backing) = &self.backing
        {
            self.records = page.slice(backing).to_vec();
            (self.model, self.root) = sync::build(&self.records);
            self.epoch = self.epoch.wrapping_add(1);
        }
    }
}

struct Walker<'a, T, C, F> {
    options: &'a TreeOptions<T>,
    source: Option<&'a Coordinates>,
    zones: &'a mut ZoneRegistry<C>,
    container_for: &'a mut F,
    rows: &'a mut Vec<Row>,
}

impl<T, C: Clone, F: FnMut(&Coordinates) -> C> Walker<'_, T, C, F> {
    fn group(&mut self, records: &[NodeRecord<T>], parent: &Coordinates, slots: bool) {
        if slots {
            for index in 0..=records.len() {
                let slot = parent.child(index);
                let container = (self.container_for)(&slot);
                self.zones.register(slot, container);
            }
        }
        for (index, record) in records.iter().enumerate() {
            let coordinates = parent.child(index);
            let dragged = self.source == Some(&coordinates);
            let mut flags = RowFlags::empty();
            flags.set(
                RowFlags::DRAGGABLE,
                self.options.dragging_allowed(&record.data),
            );
            flags.set(RowFlags::HAS_CHILDREN, record.has_children());
            flags.set(RowFlags::COLLAPSED, record.collapsed);
            flags.set(RowFlags::DRAGGED, dragged);
            let depth = coordinates.depth();
            self.rows.push(Row {
                coordinates: coordinates.clone(),
                depth,
                indent: self.options.indent_for(depth),
                flags,
            });
            if !record.collapsed {
                let nested = slots && !dragged && self.options.nesting_allowed(&record.data);
                self.group(record.children(), &coordinates, nested);
            }
        }
    }
}

fn split_slot(slot: &Coordinates) -> Result<(Coordinates, usize), DndError> {
    match (slot.parent(), slot.last()) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(DndError::InvalidOperation("a drop slot needs a parent")),
    }
}

fn snapshot<T: Clone>(records: &[NodeRecord<T>], at: &Coordinates) -> Option<NodeRecord<T>> {
    if at.is_root() {
        return None;
    }
    record_at(records, at).cloned()
}
