// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Options policy: which nodes may be dragged, nested into, or dropped where.

use alloc::boxed::Box;
use core::fmt;

use crate::pagination::Pagination;

/// A yes/no policy that may depend on a node's payload.
pub enum Permission<T> {
    /// Allowed for every node.
    Always,
    /// Allowed for no node.
    Never,
    /// Allowed where the predicate returns `true`.
    When(Box<dyn Fn(&T) -> bool>),
}

impl<T> Permission<T> {
    /// Build a predicate permission.
    pub fn when(predicate: impl Fn(&T) -> bool + 'static) -> Self {
        Self::When(Box::new(predicate))
    }

    /// Evaluate the permission for `data`.
    pub fn allows(&self, data: &T) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::When(predicate) => predicate(data),
        }
    }
}

impl<T> From<bool> for Permission<T> {
    fn from(allowed: bool) -> Self {
        if allowed { Self::Always } else { Self::Never }
    }
}

impl<T> fmt::Debug for Permission<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::Never => f.write_str("Never"),
            Self::When(_) => f.write_str("When(..)"),
        }
    }
}

type DropPredicate<T> = Box<dyn Fn(&T, Option<&T>, usize) -> bool>;

/// Policy for one tree, fixed for the duration of a render pass.
///
/// ```
/// use understory_tree_dnd::{Pagination, Permission, TreeOptions};
///
/// struct Item { folder: bool, locked: bool }
///
/// let options = TreeOptions::<Item>::new()
///     .with_nesting(Permission::when(|item: &Item| item.folder))
///     .with_dragging(Permission::when(|item: &Item| !item.locked))
///     .with_drop(|_source, parent, _index| parent.is_none_or(|p| !p.locked))
///     .with_indent(16.0);
///
/// let folder = Item { folder: true, locked: false };
/// assert!(options.nesting_allowed(&folder));
/// assert_eq!(options.indent_for(3), 32.0);
///
/// // List mode turns nesting off for every node.
/// let flat = TreeOptions::<Item>::new().with_list_mode(Pagination::new(10, 1));
/// assert!(!flat.nesting_allowed(&folder));
/// ```
pub struct TreeOptions<T> {
    allow_nesting: Permission<T>,
    allow_dragging: Permission<T>,
    allow_drop: Option<DropPredicate<T>>,
    indent: f64,
    list_mode: Option<Pagination>,
}

impl<T> fmt::Debug for TreeOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeOptions")
            .field("allow_nesting", &self.allow_nesting)
            .field("allow_dragging", &self.allow_dragging)
            .field("allow_drop", &self.allow_drop.as_ref().map(|_| ".."))
            .field("indent", &self.indent)
            .field("list_mode", &self.list_mode)
            .finish()
    }
}

impl<T> Default for TreeOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeOptions<T> {
    /// Default indent per nesting level, in logical pixels.
    pub const DEFAULT_INDENT: f64 = 20.0;

    /// Nesting and dragging allowed everywhere, every drop accepted, no list mode.
    pub fn new() -> Self {
        Self {
            allow_nesting: Permission::Always,
            allow_dragging: Permission::Always,
            allow_drop: None,
            indent: Self::DEFAULT_INDENT,
            list_mode: None,
        }
    }

    /// Set the nesting policy.
    #[must_use]
    pub fn with_nesting(mut self, permission: impl Into<Permission<T>>) -> Self {
        self.allow_nesting = permission.into();
        self
    }

    /// Set the dragging policy.
    #[must_use]
    pub fn with_dragging(mut self, permission: impl Into<Permission<T>>) -> Self {
        self.allow_dragging = permission.into();
        self
    }

    /// Set the drop predicate: `(source, proposed parent, proposed index)`.
    ///
    /// The proposed parent is `None` for the top level.
    #[must_use]
    pub fn with_drop(mut self, predicate: impl Fn(&T, Option<&T>, usize) -> bool + 'static) -> Self {
        self.allow_drop = Some(Box::new(predicate));
        self
    }

    /// Set the indent per nesting level, in logical pixels.
    ///
    /// Negative values are clamped to zero.
    #[must_use]
    pub fn with_indent(mut self, indent: f64) -> Self {
        debug_assert!(indent.is_finite(), "indent must be finite; got {indent:?}");
        self.indent = indent.max(0.0);
        self
    }

    /// Show a flat, paginated list. Nesting is disabled tree-wide.
    #[must_use]
    pub fn with_list_mode(mut self, pagination: Pagination) -> Self {
        self.list_mode = Some(pagination);
        self
    }

    /// Whether `data` may receive children.
    pub fn nesting_allowed(&self, data: &T) -> bool {
        self.list_mode.is_none() && self.allow_nesting.allows(data)
    }

    /// Whether `data` may be picked up.
    pub fn dragging_allowed(&self, data: &T) -> bool {
        self.allow_dragging.allows(data)
    }

    /// Whether `source` may be dropped at `index` under `parent`.
    pub fn drop_allowed(&self, source: &T, parent: Option<&T>, index: usize) -> bool {
        self.allow_drop
            .as_ref()
            .is_none_or(|predicate| predicate(source, parent, index))
    }

    /// Indent per nesting level.
    pub fn indent(&self) -> f64 {
        self.indent
    }

    /// Horizontal offset for a row or slot at `depth` (top level is depth 1).
    pub fn indent_for(&self, depth: usize) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Depths are far below 2^52."
        )]
        let levels = depth.saturating_sub(1) as f64;
        self.indent * levels
    }

    /// The list-mode pagination, if enabled.
    pub fn list_mode(&self) -> Option<Pagination> {
        self.list_mode
    }

    /// Move list mode to another page; ignored outside list mode.
    pub fn set_page(&mut self, page: usize) {
        if let Some(p) = &mut self.list_mode {
            p.page = page;
        }
    }
}
