// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop-zone registry and the drop-zone family algorithm.
//!
//! A drop zone is one insertion slot: coordinates `[...parent, slot]` mean
//! "insert as child number `slot` of the node at `parent`". The registry holds
//! every zone rendered in the current pass, which one is *active* (the primary
//! target under the pointer), and which are *secondary* (logically the same
//! destination, highlighted less prominently).
//!
//! ## Families
//!
//! In a nested list several slots can mean the same drop:
//!
//! - After the last child of `A` is the same place as before `A`'s next
//!   sibling one level up.
//! - Right after `A` is the same place as after `A`'s last child, or as `A`'s
//!   first child when `A` is an empty node that accepts children.
//!
//! [`ZoneRegistry::show_family`] walks these equivalences recursively. A
//! [`Skip`] direction stops an upward step from immediately descending back
//! into the branch it came from, and the other way round.
//!
//! ## Usage
//!
//! 1) On every render pass, [`ZoneRegistry::reset`] and
//!    [`register`](ZoneRegistry::register) each slot with the host's container
//!    handle.
//! 2) On hover, [`ZoneRegistry::activate`] the slot under the pointer with a
//!    [`ZoneTree`] describing the current tree.
//! 3) Drain [`ZoneRequest`]s with [`ZoneRegistry::drain_requests`] and show or
//!    clear the markers.
//!
//! ```
//! use understory_outline::Coordinates;
//! use understory_tree_dnd::{NodeRecord, RecordZoneTree, TreeOptions, ZoneRegistry};
//!
//! // Two leaves, X and Y. Nesting is allowed everywhere.
//! let records = vec![NodeRecord::new("X"), NodeRecord::new("Y")];
//! let options = TreeOptions::new();
//! let tree = RecordZoneTree::new(&records, &options, None);
//!
//! let slots: [&[usize]; 5] = [&[0], &[1], &[2], &[0, 0], &[1, 0]];
//! let mut zones = ZoneRegistry::new();
//! for slot in slots {
//!     zones.register(Coordinates::from(slot), ());
//! }
//!
//! // "After X" is also "first child of X".
//! zones.activate(&Coordinates::from([1]), &tree).unwrap();
//! assert_eq!(zones.active(), Some(&Coordinates::from([1])));
//! assert_eq!(zones.secondaries(), &[Coordinates::from([0, 0])]);
//! ```

use alloc::vec::Vec;

use hashbrown::HashMap;
use understory_outline::Coordinates;

use crate::error::ZoneError;
use crate::options::TreeOptions;
use crate::records::{NodeRecord, coordinates_group, record_at};

/// Read-only facts about the tree that the family algorithm needs.
///
/// Paths passed to `group_len` address a parent; paths passed to the other
/// methods address a node.
pub trait ZoneTree {
    /// Number of children of the node at `parent` (`[]` is the top level).
    fn group_len(&self, parent: &Coordinates) -> Option<usize>;

    /// Whether the node at `node` has at least one child.
    fn has_children(&self, node: &Coordinates) -> bool;

    /// Whether the node at `node` may receive children.
    fn nesting_allowed(&self, node: &Coordinates) -> bool;

    /// Coordinates of the node being dragged, if it belongs to this tree.
    fn drag_source(&self) -> Option<&Coordinates>;
}

/// Direction suppressed for the next step of the family walk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Skip {
    /// Walk both up and down.
    #[default]
    None,
    /// Do not descend into a previous sibling (we just came up from there).
    Above,
    /// Do not climb to the parent's next sibling (we just came down from there).
    Below,
}

/// One registered insertion slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropZone<C> {
    /// Slot coordinates.
    pub coordinates: Coordinates,
    /// Host container that renders this zone's marker.
    pub container: C,
    /// Whether this is the synthetic slot of an empty tree.
    pub placeholder: bool,
}

/// A render request for the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZoneRequest<C> {
    /// Show the marker in `container`, as the primary target if `active`.
    Show {
        /// Container to draw into.
        container: C,
        /// Slot coordinates.
        coordinates: Coordinates,
        /// Primary (`true`) or secondary (`false`) highlight.
        active: bool,
    },
    /// Remove the marker from `container`.
    Clear {
        /// Container to clear.
        container: C,
        /// Slot coordinates.
        coordinates: Coordinates,
    },
}

/// The live set of drop zones plus the currently shown family.
#[derive(Clone, Debug)]
pub struct ZoneRegistry<C> {
    zones: HashMap<Coordinates, DropZone<C>>,
    active: Option<Coordinates>,
    secondary: Vec<Coordinates>,
    requests: Vec<ZoneRequest<C>>,
}

impl<C> Default for ZoneRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ZoneRegistry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            zones: HashMap::new(),
            active: None,
            secondary: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Number of registered zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Returns `true` if no zones are registered.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// The zone registered at `coordinates`.
    pub fn get(&self, coordinates: &Coordinates) -> Option<&DropZone<C>> {
        self.zones.get(coordinates)
    }

    /// Returns `true` if a zone is registered at `coordinates`.
    pub fn contains(&self, coordinates: &Coordinates) -> bool {
        self.zones.contains_key(coordinates)
    }

    /// All registered zones, in unspecified order.
    pub fn zones(&self) -> impl Iterator<Item = &DropZone<C>> + '_ {
        self.zones.values()
    }

    /// The active zone, if any.
    pub fn active(&self) -> Option<&Coordinates> {
        self.active.as_ref()
    }

    /// Secondary zones in the order they joined the family.
    pub fn secondaries(&self) -> &[Coordinates] {
        &self.secondary
    }

    /// Returns `true` if `coordinates` is active or secondary.
    pub fn is_shown(&self, coordinates: &Coordinates) -> bool {
        self.active.as_ref() == Some(coordinates) || self.secondary.contains(coordinates)
    }

    /// Take the queued render requests.
    pub fn drain_requests(&mut self) -> Vec<ZoneRequest<C>> {
        core::mem::take(&mut self.requests)
    }
}

impl<C: Clone> ZoneRegistry<C> {
    /// Register a zone, returning the container it replaced.
    pub fn register(&mut self, coordinates: Coordinates, container: C) -> Option<C> {
        self.insert_zone(coordinates, container, false)
    }

    /// Register the single slot of an empty tree.
    pub fn register_placeholder(&mut self, coordinates: Coordinates, container: C) -> Option<C> {
        self.insert_zone(coordinates, container, true)
    }

    /// Remove a zone, clearing its marker if it was shown.
    pub fn unregister(&mut self, coordinates: &Coordinates) -> Option<DropZone<C>> {
        if self.is_shown(coordinates) {
            self.hide(coordinates);
        }
        self.zones.remove(coordinates)
    }

    /// Drop every zone, clearing the shown family first.
    pub fn reset(&mut self) {
        self.clear();
        self.zones.clear();
    }

    /// Clear the active zone and all secondaries.
    pub fn clear(&mut self) {
        if let Some(active) = self.active.take() {
            self.push_clear(&active);
        }
        for coordinates in core::mem::take(&mut self.secondary) {
            self.push_clear(&coordinates);
        }
    }

    /// Make `zone` the active zone and show its family.
    ///
    /// The previous family is cleared first. Activating the zone that is
    /// already active leaves the family as it is.
    pub fn activate<Z: ZoneTree + ?Sized>(
        &mut self,
        zone: &Coordinates,
        tree: &Z,
    ) -> Result<(), ZoneError> {
        if !self.zones.contains_key(zone) {
            return Err(ZoneError::NotFound(zone.clone()));
        }
        if self.active.as_ref() == Some(zone) {
            return Ok(());
        }
        self.clear();
        self.show_family(zone, true, Skip::None, tree);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            zone = %zone,
            secondaries = self.secondary.len(),
            "drop zone family shown"
        );
        Ok(())
    }

    /// Show `zone` and, recursively, every zone equivalent to it.
    ///
    /// Zones that are not registered end the walk silently. `skip` suppresses
    /// the step back toward the zone this call was reached from.
    pub fn show_family<Z: ZoneTree + ?Sized>(
        &mut self,
        zone: &Coordinates,
        active: bool,
        skip: Skip,
        tree: &Z,
    ) {
        if !self.zones.contains_key(zone) || self.is_shown(zone) {
            return;
        }
        self.mark(zone, active);

        let (Some(parent), Some(slot)) = (zone.parent(), zone.last()) else {
            return;
        };

        // After the last child: same as before the parent's next sibling.
        if skip != Skip::Below
            && zone.depth() > 1
            && tree.group_len(&parent) == Some(slot)
            && let Some(up) = parent.next_sibling()
        {
            self.show_family(&up, false, Skip::Above, tree);
        }

        // After a sibling: same as the end of that sibling's children.
        if skip != Skip::Above
            && let Some(prev) = zone.previous_sibling()
        {
            if tree.drag_source() == Some(&prev) {
                return;
            }
            let first = prev.child(0);
            if tree.has_children(&prev) {
                if self.zones.contains_key(&first) {
                    let mut last = first;
                    while let Some(next) = last.next_sibling()
                        && self.zones.contains_key(&next)
                    {
                        last = next;
                    }
                    self.show_family(&last, false, Skip::Below, tree);
                }
            } else if tree.nesting_allowed(&prev) {
                self.show_family(&first, false, Skip::Below, tree);
            }
        }
    }

    /// Promote a secondary zone to active; the old active zone becomes secondary.
    pub fn swap_active(&mut self, zone: &Coordinates) -> Result<(), ZoneError> {
        let Some(old) = self.active.clone() else {
            return Err(ZoneError::InvalidOperation("no active drop zone"));
        };
        let Some(pos) = self.secondary.iter().position(|c| c == zone) else {
            return Err(ZoneError::InvalidOperation(
                "zone is not in the secondary set",
            ));
        };
        self.secondary[pos] = old.clone();
        self.active = Some(zone.clone());
        self.push_show(&old, false);
        self.push_show(zone, true);
        Ok(())
    }

    fn insert_zone(&mut self, coordinates: Coordinates, container: C, placeholder: bool) -> Option<C> {
        let zone = DropZone {
            coordinates: coordinates.clone(),
            container,
            placeholder,
        };
        self.zones.insert(coordinates, zone).map(|old| old.container)
    }

    fn mark(&mut self, zone: &Coordinates, active: bool) {
        if active {
            self.active = Some(zone.clone());
        } else {
            self.secondary.push(zone.clone());
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(zone = %zone, active, "drop zone shown");
        self.push_show(zone, active);
    }

    fn hide(&mut self, zone: &Coordinates) {
        if self.active.as_ref() == Some(zone) {
            self.active = None;
        }
        self.secondary.retain(|c| c != zone);
        self.push_clear(zone);
    }

    fn push_show(&mut self, coordinates: &Coordinates, active: bool) {
        if let Some(z) = self.zones.get(coordinates) {
            self.requests.push(ZoneRequest::Show {
                container: z.container.clone(),
                coordinates: coordinates.clone(),
                active,
            });
        }
    }

    fn push_clear(&mut self, coordinates: &Coordinates) {
        if let Some(z) = self.zones.get(coordinates) {
            self.requests.push(ZoneRequest::Clear {
                container: z.container.clone(),
                coordinates: coordinates.clone(),
            });
        }
    }
}

/// A [`ZoneTree`] over external records and an options policy.
///
/// Group lengths come from [`coordinates_group`], so a childless record
/// resolves to an empty group exactly as a drop into it would.
#[derive(Debug)]
pub struct RecordZoneTree<'a, T> {
    records: &'a [NodeRecord<T>],
    options: &'a TreeOptions<T>,
    drag_source: Option<Coordinates>,
}

impl<'a, T> RecordZoneTree<'a, T> {
    /// View `records` under `options`, with the dragged node at `drag_source`
    /// if it belongs to these records.
    pub fn new(
        records: &'a [NodeRecord<T>],
        options: &'a TreeOptions<T>,
        drag_source: Option<Coordinates>,
    ) -> Self {
        Self {
            records,
            options,
            drag_source,
        }
    }
}

impl<T> ZoneTree for RecordZoneTree<'_, T> {
    fn group_len(&self, parent: &Coordinates) -> Option<usize> {
        coordinates_group(self.records, parent).ok().map(<[_]>::len)
    }

    fn has_children(&self, node: &Coordinates) -> bool {
        record_at(self.records, node).is_some_and(NodeRecord::has_children)
    }

    fn nesting_allowed(&self, node: &Coordinates) -> bool {
        record_at(self.records, node).is_some_and(|r| self.options.nesting_allowed(&r.data))
    }

    fn drag_source(&self) -> Option<&Coordinates> {
        self.drag_source.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Permission;
    use alloc::vec;

    fn c<const N: usize>(path: [usize; N]) -> Coordinates {
        Coordinates::from(path)
    }

    fn registry(slots: &[&[usize]]) -> ZoneRegistry<u32> {
        let mut zones = ZoneRegistry::new();
        for (i, slot) in slots.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation, reason = "Tiny test fixtures.")]
            zones.register(Coordinates::from(*slot), i as u32);
        }
        zones
    }

    /// `[X, Y]`, both leaves.
    fn leaves() -> Vec<NodeRecord<&'static str>> {
        vec![NodeRecord::new("X"), NodeRecord::new("Y")]
    }

    /// `[A [a0, a1], B]`.
    fn nested() -> Vec<NodeRecord<&'static str>> {
        vec![
            NodeRecord::new("A").with_children(vec![NodeRecord::new("a0"), NodeRecord::new("a1")]),
            NodeRecord::new("B"),
        ]
    }

    const NESTED_SLOTS: &[&[usize]] = &[
        &[0],
        &[1],
        &[2],
        &[0, 0],
        &[0, 1],
        &[0, 2],
        &[0, 0, 0],
        &[0, 1, 0],
        &[1, 0],
    ];

    #[test]
    fn after_leaf_includes_first_child_slot() {
        let records = leaves();
        let options = TreeOptions::new();
        let tree = RecordZoneTree::new(&records, &options, None);
        let mut zones = registry(&[&[0], &[1], &[2], &[0, 0], &[1, 0]]);

        zones.activate(&c([1]), &tree).unwrap();
        assert_eq!(zones.active(), Some(&c([1])));
        assert_eq!(zones.secondaries(), &[c([0, 0])]);

        zones.activate(&c([2]), &tree).unwrap();
        assert_eq!(zones.secondaries(), &[c([1, 0])]);
    }

    #[test]
    fn empty_child_slot_climbs_to_next_sibling() {
        let records = leaves();
        let options = TreeOptions::new();
        let tree = RecordZoneTree::new(&records, &options, None);
        let mut zones = registry(&[&[0], &[1], &[2], &[0, 0], &[1, 0]]);

        zones.activate(&c([0, 0]), &tree).unwrap();
        assert_eq!(zones.active(), Some(&c([0, 0])));
        assert_eq!(zones.secondaries(), &[c([1])]);
    }

    #[test]
    fn nesting_policy_blocks_leaf_descent() {
        let records = leaves();
        let options = TreeOptions::new().with_nesting(Permission::when(|v: &&str| *v != "X"));
        let tree = RecordZoneTree::new(&records, &options, None);
        let mut zones = registry(&[&[0], &[1], &[2], &[0, 0], &[1, 0]]);

        zones.activate(&c([1]), &tree).unwrap();
        assert!(zones.secondaries().is_empty());
    }

    #[test]
    fn after_parent_descends_to_last_child_slot() {
        let records = nested();
        let options = TreeOptions::new();
        let tree = RecordZoneTree::new(&records, &options, None);
        let mut zones = registry(NESTED_SLOTS);

        zones.activate(&c([1]), &tree).unwrap();
        assert_eq!(zones.secondaries(), &[c([0, 2]), c([0, 1, 0])]);
    }

    #[test]
    fn last_child_slot_climbs_and_descends() {
        let records = nested();
        let options = TreeOptions::new();
        let tree = RecordZoneTree::new(&records, &options, None);
        let mut zones = registry(NESTED_SLOTS);

        zones.activate(&c([0, 2]), &tree).unwrap();
        assert_eq!(zones.active(), Some(&c([0, 2])));
        assert_eq!(zones.secondaries(), &[c([1]), c([0, 1, 0])]);
    }

    #[test]
    fn slot_after_drag_source_has_no_descent() {
        let records = nested();
        let options = TreeOptions::new();
        let tree = RecordZoneTree::new(&records, &options, Some(c([0, 1])));
        // The dragged node's own child slot is never rendered.
        let slots: Vec<&[usize]> = NESTED_SLOTS
            .iter()
            .copied()
            .filter(|s| *s != [0, 1, 0].as_slice())
            .collect();
        let mut zones = registry(&slots);

        zones.activate(&c([0, 2]), &tree).unwrap();
        assert_eq!(zones.secondaries(), &[c([1])]);
    }

    #[test]
    fn collapsed_parent_ends_descent() {
        let records = nested();
        let options = TreeOptions::new();
        let tree = RecordZoneTree::new(&records, &options, None);
        let mut zones = registry(&[&[0], &[1], &[2], &[1, 0]]);

        zones.activate(&c([1]), &tree).unwrap();
        assert!(zones.secondaries().is_empty());
    }

    #[test]
    fn unregistered_zone_is_not_found() {
        let records = leaves();
        let options = TreeOptions::new();
        let tree = RecordZoneTree::new(&records, &options, None);
        let mut zones = registry(&[&[0]]);
        assert_eq!(
            zones.activate(&c([3]), &tree),
            Err(ZoneError::NotFound(c([3])))
        );
        assert!(zones.active().is_none());
    }

    #[test]
    fn requests_track_show_and_clear() {
        let records = leaves();
        let options = TreeOptions::new();
        let tree = RecordZoneTree::new(&records, &options, None);
        let mut zones = registry(&[&[0], &[1], &[2], &[0, 0], &[1, 0]]);

        zones.activate(&c([1]), &tree).unwrap();
        assert_eq!(
            zones.drain_requests(),
            vec![
                ZoneRequest::Show {
                    container: 1,
                    coordinates: c([1]),
                    active: true
                },
                ZoneRequest::Show {
                    container: 3,
                    coordinates: c([0, 0]),
                    active: false
                },
            ]
        );

        zones.clear();
        assert_eq!(
            zones.drain_requests(),
            vec![
                ZoneRequest::Clear {
                    container: 1,
                    coordinates: c([1])
                },
                ZoneRequest::Clear {
                    container: 3,
                    coordinates: c([0, 0])
                },
            ]
        );
        assert!(zones.active().is_none());
        assert!(zones.secondaries().is_empty());
    }

    #[test]
    fn reactivating_active_zone_is_a_no_op() {
        let records = leaves();
        let options = TreeOptions::new();
        let tree = RecordZoneTree::new(&records, &options, None);
        let mut zones = registry(&[&[0], &[1], &[2], &[0, 0], &[1, 0]]);
        zones.activate(&c([1]), &tree).unwrap();
        let _ = zones.drain_requests();
        zones.activate(&c([1]), &tree).unwrap();
        assert!(zones.drain_requests().is_empty());
    }

    #[test]
    fn swap_active_promotes_secondary() {
        let records = leaves();
        let options = TreeOptions::new();
        let tree = RecordZoneTree::new(&records, &options, None);
        let mut zones = registry(&[&[0], &[1], &[2], &[0, 0], &[1, 0]]);

        assert!(matches!(
            zones.swap_active(&c([0, 0])),
            Err(ZoneError::InvalidOperation(_))
        ));

        zones.activate(&c([1]), &tree).unwrap();
        zones.swap_active(&c([0, 0])).unwrap();
        assert_eq!(zones.active(), Some(&c([0, 0])));
        assert_eq!(zones.secondaries(), &[c([1])]);

        assert!(matches!(
            zones.swap_active(&c([2])),
            Err(ZoneError::InvalidOperation(_))
        ));
        assert_eq!(zones.active(), Some(&c([0, 0])));
    }

    #[test]
    fn unregister_and_reset_clear_markers() {
        let records = leaves();
        let options = TreeOptions::new();
        let tree = RecordZoneTree::new(&records, &options, None);
        let mut zones = registry(&[&[0], &[1], &[2], &[0, 0], &[1, 0]]);
        zones.activate(&c([1]), &tree).unwrap();
        let _ = zones.drain_requests();

        let removed = zones.unregister(&c([0, 0])).unwrap();
        assert_eq!(removed.container, 3);
        assert!(zones.secondaries().is_empty());
        assert_eq!(zones.drain_requests().len(), 1);

        zones.reset();
        assert!(zones.is_empty());
        assert!(zones.active().is_none());
    }

    #[test]
    fn placeholder_flag_is_kept() {
        let mut zones: ZoneRegistry<()> = ZoneRegistry::new();
        zones.register_placeholder(c([0]), ());
        assert!(zones.get(&c([0])).is_some_and(|z| z.placeholder));
        assert_eq!(zones.register(c([0]), ()), Some(()));
        assert!(zones.get(&c([0])).is_some_and(|z| !z.placeholder));
    }
}
