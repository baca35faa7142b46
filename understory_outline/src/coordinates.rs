// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index paths from a root to a node or to an insertion slot.

use core::fmt;
use core::ops::Deref;

use smallvec::SmallVec;

/// A path of child indices walked from a designated root.
///
/// `[]` denotes the root itself and `[2, 0]` denotes child 0 of child 2 of the
/// root. When a path names an insertion *slot* rather than a node, the last
/// index is the insertion position among the siblings.
///
/// Coordinates are a derived view. They are never stored on nodes and change
/// implicitly whenever an ancestor's child order changes, so recompute them
/// with [`Outline::coordinates`](crate::Outline::coordinates) after a mutation.
///
/// ```
/// use understory_outline::Coordinates;
///
/// let slot = Coordinates::from([2, 0]);
/// assert_eq!(slot.parent(), Some(Coordinates::from([2])));
/// assert_eq!(slot.next_sibling(), Some(Coordinates::from([2, 1])));
/// assert_eq!(slot.previous_sibling(), None);
/// assert_eq!(slot.child(4), Coordinates::from([2, 0, 4]));
/// ```
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Coordinates(SmallVec<[usize; 8]>);

impl Coordinates {
    /// The empty path, addressing the root.
    pub fn root() -> Self {
        Self(SmallVec::new())
    }

    /// Returns `true` for the empty path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of indices in the path.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The final index, or `None` for the root.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// The path with its last index dropped; the root has no parent.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(SmallVec::from_slice(rest)))
    }

    /// The path with its last index incremented.
    pub fn next_sibling(&self) -> Option<Self> {
        let mut next = self.clone();
        let last = next.0.last_mut()?;
        *last = last.checked_add(1)?;
        Some(next)
    }

    /// The path with its last index decremented, or `None` if it is already 0.
    pub fn previous_sibling(&self) -> Option<Self> {
        let mut prev = self.clone();
        let last = prev.0.last_mut()?;
        *last = last.checked_sub(1)?;
        Some(prev)
    }

    /// The path extended by `index`.
    pub fn child(&self, index: usize) -> Self {
        let mut child = self.clone();
        child.0.push(index);
        child
    }

    /// Returns `true` if `self` is a strict prefix of `other`.
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    /// Returns the indices as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub(crate) fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub(crate) fn reverse(&mut self) {
        self.0.reverse();
    }
}

impl Deref for Coordinates {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl From<&[usize]> for Coordinates {
    fn from(path: &[usize]) -> Self {
        Self(SmallVec::from_slice(path))
    }
}

impl<const N: usize> From<[usize; N]> for Coordinates {
    fn from(path: [usize; N]) -> Self {
        Self(path.into_iter().collect())
    }
}

impl FromIterator<usize> for Coordinates {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Debug for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{index}")?;
        }
        f.write_str("]")
    }
}
