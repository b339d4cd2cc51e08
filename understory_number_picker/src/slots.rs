// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot layout of the scroll wheel.

/// Padded, uniformly sized slot strip backing the scroll wheel.
///
/// The strip holds `domain_len + 2 * offset_items` slots: the domain values in
/// the middle and inert padding slots at both ends, so the first and last values
/// can be centred. The viewport shows the selected slot and `offset_items`
/// neighbours on each side.
///
/// All extents are along the scroll axis, in the surface's units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotStrip {
    domain_len: usize,
    offset_items: usize,
    item_extent: f64,
}

/// Zoom at the centre shrinks by this fraction at full distance.
const SHRINK_AMOUNT: f64 = 0.5;
/// Fraction of the half-viewport over which the zoom shrinks.
const SHRINK_DISTANCE: f64 = 0.9;

impl SlotStrip {
    /// Creates a strip for `domain_len` values with `offset_items` padding slots
    /// on each side. Negative or non-finite extents are treated as zero.
    #[must_use]
    pub fn new(domain_len: usize, offset_items: usize, item_extent: f64) -> Self {
        Self {
            domain_len,
            offset_items,
            item_extent: if item_extent.is_finite() && item_extent > 0.0 {
                item_extent
            } else {
                0.0
            },
        }
    }

    /// Total number of slots, padding included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.domain_len + 2 * self.offset_items
    }

    /// Returns `true` if there are no slots at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of domain values.
    #[must_use]
    pub const fn domain_len(&self) -> usize {
        self.domain_len
    }

    /// Number of padding slots on each side.
    #[must_use]
    pub const fn offset_items(&self) -> usize {
        self.offset_items
    }

    /// Uniform slot extent.
    #[must_use]
    pub const fn item_extent(&self) -> f64 {
        self.item_extent
    }

    /// Slot showing the domain value at `index`.
    #[must_use]
    pub const fn slot_of(&self, index: usize) -> usize {
        index + self.offset_items
    }

    /// Domain index shown in `slot`, or `None` for padding and out-of-range slots.
    #[must_use]
    pub fn index_at(&self, slot: usize) -> Option<usize> {
        slot.checked_sub(self.offset_items)
            .filter(|&index| index < self.domain_len)
    }

    /// Returns `true` if `slot` is a padding slot.
    #[must_use]
    pub fn is_padding(&self, slot: usize) -> bool {
        slot < self.len() && self.index_at(slot).is_none()
    }

    /// Viewport extent that fits the selection plus its visible neighbours.
    #[must_use]
    pub fn viewport_extent(&self) -> f64 {
        self.item_extent * slot_count_f64(1 + 2 * self.offset_items)
    }

    /// Extent of all slots together.
    #[must_use]
    pub fn content_extent(&self) -> f64 {
        self.item_extent * slot_count_f64(self.len())
    }

    /// Scroll offset that centres `slot`, clamped to the scrollable range.
    #[must_use]
    pub fn centered_scroll_offset(&self, slot: usize) -> f64 {
        let len = self.len();
        if len == 0 {
            return 0.0;
        }
        let slot = slot.min(len - 1);
        let item_start = self.item_extent * slot_count_f64(slot);
        let centered = item_start + self.item_extent / 2.0 - self.viewport_extent() / 2.0;
        let max_offset = (self.content_extent() - self.viewport_extent()).max(0.0);
        centered.clamp(0.0, max_offset)
    }

    /// Signed distance from the centre of `slot` to the viewport centre at
    /// `scroll_offset`. Scrolling by this amount centres the slot.
    #[must_use]
    pub fn snap_distance(&self, slot: usize, scroll_offset: f64) -> f64 {
        let slot_center = self.item_extent * (slot_count_f64(slot) + 0.5);
        slot_center - (scroll_offset + self.viewport_extent() / 2.0)
    }

    /// The slot closest to the viewport centre at `scroll_offset`.
    #[must_use]
    pub fn slot_at_center(&self, scroll_offset: f64) -> Option<usize> {
        let len = self.len();
        if len == 0 || self.item_extent <= 0.0 {
            return None;
        }
        let center = scroll_offset + self.viewport_extent() / 2.0;
        if center <= 0.0 {
            return Some(0);
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Non-negative and truncation is the intended floor"
        )]
        let slot = (center / self.item_extent) as usize;
        Some(slot.min(len - 1))
    }

    /// Scale factor for a slot whose centre is `distance` away from the viewport
    /// centre: `1.0` at the centre, shrinking linearly to `0.5` at 90% of the
    /// half-viewport and beyond.
    #[must_use]
    pub fn zoom_factor(&self, distance: f64) -> f64 {
        let shrink_distance = SHRINK_DISTANCE * self.viewport_extent() / 2.0;
        if shrink_distance <= 0.0 {
            return 1.0;
        }
        let distance = if distance < 0.0 { -distance } else { distance };
        1.0 - SHRINK_AMOUNT * distance.min(shrink_distance) / shrink_distance
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Slot counts stay far below the f64 mantissa range"
)]
fn slot_count_f64(count: usize) -> f64 {
    count as f64
}
