// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Inclusive block ranges and midpoint splitting

use std::fmt;

use alloy_primitives::BlockNumber;
use serde::{Deserialize, Serialize};

/// An inclusive block range `[from, to]`
///
/// # Examples
///
/// ```
/// use vagarish::BlockRange;
///
/// let range = BlockRange::new(0, 9).unwrap();
/// assert_eq!(range.len(), 10);
///
/// let (left, right) = range.split_mid().unwrap();
/// assert_eq!((left.from(), left.to()), (0, 4));
/// assert_eq!((right.from(), right.to()), (5, 9));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockRange {
    from: BlockNumber,
    to: BlockNumber,
}

impl BlockRange {
    /// Create a range, or `None` if `to < from`
    pub const fn new(from: BlockNumber, to: BlockNumber) -> Option<Self> {
        if to < from {
            None
        } else {
            Some(Self { from, to })
        }
    }

    /// First block (inclusive)
    pub const fn from(&self) -> BlockNumber {
        self.from
    }

    /// Last block (inclusive)
    pub const fn to(&self) -> BlockNumber {
        self.to
    }

    /// Number of blocks covered
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> u64 {
        // Saturates for the full u64 span, which no chain reaches.
        (self.to - self.from).saturating_add(1)
    }

    /// Whether `block` falls inside the range
    pub const fn contains(&self, block: BlockNumber) -> bool {
        self.from <= block && block <= self.to
    }

    /// Split at the floor midpoint into `[from, mid]` and `[mid + 1, to]`
    ///
    /// Returns `None` for a single-block range.
    pub const fn split_mid(&self) -> Option<(Self, Self)> {
        if self.from == self.to {
            return None;
        }
        let mid = self.from + (self.to - self.from) / 2;
        Some((
            Self {
                from: self.from,
                to: mid,
            },
            Self {
                from: mid + 1,
                to: self.to,
            },
        ))
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}
