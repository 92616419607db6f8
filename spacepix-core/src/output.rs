//! Bounds-checked, write-once output views.
//!
//! Every clustering unit writes through a [`SlotView`] that covers only the
//! slots it owns. Views are carved out of a caller-owned buffer with
//! [`SlotView::split_at`], so two units can never be handed the same slot.

use std::ops::Range;

/// Mutable view over the slots `[base, base + len)` of an output buffer.
///
/// Slots are addressed by their index in the *whole* buffer, so a unit can
/// use global cell indices or measurement links directly.
#[derive(Debug)]
pub struct SlotView<'a, T> {
    base: usize,
    slots: &'a mut [Option<T>],
}

impl<'a, T> SlotView<'a, T> {
    /// Creates a view over a whole buffer.
    #[must_use]
    pub fn new(slots: &'a mut [Option<T>]) -> Self {
        Self { base: 0, slots }
    }

    /// Creates a view whose first slot has global index `base`.
    #[must_use]
    pub fn with_base(base: usize, slots: &'a mut [Option<T>]) -> Self {
        Self { base, slots }
    }

    /// Global index of the first slot.
    #[must_use]
    pub fn base(&self) -> usize {
        self.base
    }

    /// Number of slots in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the view covers no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Global indices covered by the view.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.base..self.base + self.slots.len()
    }

    /// Returns true if `index` falls inside the view.
    #[inline]
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }

    /// Stores `value` in slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the view. In debug builds, also panics if
    /// the slot was already written.
    #[inline]
    pub fn write(&mut self, index: usize, value: T) {
        assert!(
            self.contains(index),
            "slot {index} outside output view {:?}",
            self.range()
        );
        let slot = &mut self.slots[index - self.base];
        debug_assert!(slot.is_none(), "slot {index} written twice");
        *slot = Some(value);
    }

    /// Reads back slot `index`, if it is inside the view and written.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if self.contains(index) {
            self.slots[index - self.base].as_ref()
        } else {
            None
        }
    }

    /// Splits the view into `[base, base + mid)` and the remainder.
    ///
    /// # Panics
    ///
    /// Panics if `mid > self.len()`.
    #[must_use]
    pub fn split_at(self, mid: usize) -> (Self, Self) {
        let base = self.base;
        let (head, tail) = self.slots.split_at_mut(mid);
        (
            Self { base, slots: head },
            Self {
                base: base + mid,
                slots: tail,
            },
        )
    }

    /// Splits the view into consecutive disjoint views of the given lengths.
    ///
    /// # Panics
    ///
    /// Panics if the lengths add up to more than `self.len()`.
    #[must_use]
    pub fn split_lengths(self, lengths: &[usize]) -> Vec<Self> {
        let mut views = Vec::with_capacity(lengths.len());
        let mut rest = self;
        for &len in lengths {
            let (head, tail) = rest.split_at(len);
            views.push(head);
            rest = tail;
        }
        views
    }
}
