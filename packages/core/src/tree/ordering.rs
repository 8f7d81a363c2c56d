//! Sibling sort-order allocation
//!
//! Orders are plain `i32` values kept non-decreasing along a sibling
//! sequence. Appending honours large gaps left by callers (a node whose order
//! belongs inside a gap lands there instead of at the end); relative inserts
//! pick a value strictly between the neighbours and renumber the group when
//! none is left.

use std::cmp::Ordering;

/// Minimum distance between two neighbours for the gap to take an appended node
pub const SORT_ORDER_THRESHOLD: i64 = 9999;

/// Distance between neighbours after a renumbering
pub const RENUMBER_STEP: i32 = 10;

/// Position and order chosen for a node entering a sibling sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub index: usize,
    pub order: i32,
}

/// Calculates sort orders for nodes entering a sibling group
pub struct OrderCalculator;

impl OrderCalculator {
    /// Slot for a node appended to `siblings` (their orders, top to bottom)
    ///
    /// # Examples
    /// ```
    /// use pagetree_core::tree::{OrderCalculator, Slot};
    ///
    /// // Empty group keeps the node's own order
    /// assert_eq!(OrderCalculator::append_slot(&[], 7), Slot { index: 0, order: 7 });
    ///
    /// // Large gap takes the node
    /// assert_eq!(
    ///     OrderCalculator::append_slot(&[0, 20000], 5),
    ///     Slot { index: 1, order: 5 }
    /// );
    ///
    /// // No gap: append with the last order
    /// assert_eq!(
    ///     OrderCalculator::append_slot(&[0, 10, 20], 5),
    ///     Slot { index: 3, order: 20 }
    /// );
    /// ```
    pub fn append_slot(siblings: &[i32], own: i32) -> Slot {
        let Some(&last) = siblings.last() else {
            return Slot {
                index: 0,
                order: own,
            };
        };

        if own >= last {
            return Slot {
                index: siblings.len(),
                order: own,
            };
        }

        // Scan backward with a threshold that shrinks along with the previous sibling
        let mut upper = last as i64;
        for i in (0..siblings.len() - 1).rev() {
            let current = siblings[i] as i64;
            if current < upper - SORT_ORDER_THRESHOLD {
                let (low, high) = (siblings[i], siblings[i + 1]);
                let order = if low <= own && own <= high { own } else { low + 1 };
                return Slot {
                    index: i + 1,
                    order,
                };
            }
            upper = current;
        }

        if upper > SORT_ORDER_THRESHOLD {
            let order = if own <= siblings[0] { own } else { 0 };
            return Slot { index: 0, order };
        }

        Slot {
            index: siblings.len(),
            order: last,
        }
    }

    /// Order strictly between two neighbours, `None` when no integer fits
    ///
    /// A missing neighbour leaves one `RENUMBER_STEP` of room on that side.
    pub fn between(prev: Option<i32>, next: Option<i32>) -> Option<i32> {
        match (prev, next) {
            (None, None) => Some(0),
            (None, Some(next)) => next.checked_sub(RENUMBER_STEP),
            (Some(prev), None) => prev.checked_add(RENUMBER_STEP),
            (Some(prev), Some(next)) => {
                let (prev, next) = (prev as i64, next as i64);
                if next - prev >= 2 {
                    Some((prev + (next - prev) / 2) as i32)
                } else {
                    None
                }
            }
        }
    }

    /// Check if a sequence breaks the non-decreasing rule
    pub fn needs_sorting(orders: &[i32]) -> bool {
        orders.windows(2).any(|pair| pair[0] > pair[1])
    }

    /// Evenly spaced orders for a group of `count` siblings
    ///
    /// # Example
    /// Input:  3
    /// Output: [0, 10, 20]
    pub fn renumber(count: usize) -> Vec<i32> {
        (0..count)
            .map(|i| i32::try_from(i).unwrap_or(i32::MAX).saturating_mul(RENUMBER_STEP))
            .collect()
    }

    /// Compare two orders the way sibling sequences are sorted
    pub fn compare(a: i32, b: i32) -> Ordering {
        a.cmp(&b)
    }
}
