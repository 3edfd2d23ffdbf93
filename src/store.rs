use alloc::boxed::Box;
use alloc::vec::Vec;
use core::alloc::Layout;

use crate::error::TableError;
use crate::slot::Slot;

/// Fixed-size, power-of-two array of slots.
///
/// Allocation is fallible. Growth and shrinking happen by building a new
/// store and moving entries across, never by resizing in place.
#[derive(Clone, Debug)]
pub(crate) struct SlotStore<K, V> {
    slots: Box<[Slot<K, V>]>,
}

impl<K, V> SlotStore<K, V> {
    pub(crate) fn try_with_slots(slots: usize) -> Result<Self, TableError> {
        debug_assert!(slots.is_power_of_two());

        let layout = Layout::array::<Slot<K, V>>(slots).map_err(|_| TableError::CapacityOverflow)?;
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(slots)
            .map_err(|_| TableError::AllocationFailed { layout })?;
        buffer.resize_with(slots, || Slot::Empty);

        Ok(Self {
            slots: buffer.into_boxed_slice(),
        })
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    #[inline]
    pub(crate) fn slot(&self, index: usize) -> &Slot<K, V> {
        &self.slots[index]
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Slot<K, V> {
        &mut self.slots[index]
    }

    #[inline]
    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    #[inline]
    pub(crate) fn slots_mut(&mut self) -> &mut [Slot<K, V>] {
        &mut self.slots
    }

    /// Drops every entry and marks every slot empty.
    pub(crate) fn reset(&mut self) {
        self.slots.fill_with(|| Slot::Empty);
    }

    pub(crate) fn into_slots(self) -> alloc::vec::IntoIter<Slot<K, V>> {
        self.slots.into_vec().into_iter()
    }

    #[cfg(feature = "stats")]
    pub(crate) fn size_in_bytes(&self) -> usize {
        core::mem::size_of_val::<[Slot<K, V>]>(&self.slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = SlotStore::<u64, u64>::try_with_slots(8).unwrap();
        assert_eq!(store.len(), 8);
        assert_eq!(store.mask(), 7);
        assert!(store.slots().iter().all(Slot::is_empty));
    }

    #[test]
    fn reset_clears_entries() {
        let mut store = SlotStore::<u64, u64>::try_with_slots(4).unwrap();
        *store.slot_mut(2) = Slot::occupied(1, 10, 20);
        *store.slot_mut(3) = Slot::Tombstone;
        store.reset();
        assert!(store.slots().iter().all(Slot::is_empty));
    }

    #[test]
    fn huge_request_overflows() {
        let err = SlotStore::<u64, [u8; 64]>::try_with_slots(1 << (usize::BITS - 1)).unwrap_err();
        assert_eq!(err, TableError::CapacityOverflow);
    }
}
