/// One cell of the backing array.
///
/// `Empty` terminates a probe. `Tombstone` marks a removed entry: lookups
/// pass over it and inserts may reuse it.
#[derive(Clone, Debug)]
pub(crate) enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied {
        /// 1-based probe attempt at which the entry was placed.
        psl: usize,
        key: K,
        value: V,
    },
}

/// What a slot holds, without its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotStatus {
    /// Never occupied since the last rehash.
    Empty,
    /// Occupied, then removed.
    Tombstone,
    /// Live, placed on the given 1-based probe attempt.
    Occupied(usize),
}

impl<K, V> Slot<K, V> {
    #[inline]
    pub(crate) fn occupied(psl: usize, key: K, value: V) -> Self {
        Slot::Occupied { psl, key, value }
    }

    #[inline]
    pub(crate) fn status(&self) -> SlotStatus {
        match self {
            Slot::Empty => SlotStatus::Empty,
            Slot::Tombstone => SlotStatus::Tombstone,
            Slot::Occupied { psl, .. } => SlotStatus::Occupied(*psl),
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline]
    pub(crate) fn entry(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Occupied { key, value, .. } => Some((key, value)),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self) -> Option<(&K, &mut V)> {
        match self {
            Slot::Occupied { key, value, .. } => Some((key, value)),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn into_entry(self) -> Option<(K, V)> {
        match self {
            Slot::Occupied { key, value, .. } => Some((key, value)),
            _ => None,
        }
    }

    /// Moves a live entry out, leaving a tombstone. Non-live slots are left
    /// alone.
    #[inline]
    pub(crate) fn take(&mut self) -> Option<(K, V)> {
        match self {
            Slot::Occupied { .. } => core::mem::replace(self, Slot::Tombstone).into_entry(),
            _ => None,
        }
    }

    /// Records the probe attempt a live entry was last matched on.
    #[inline]
    pub(crate) fn set_psl(&mut self, attempt: usize) {
        if let Slot::Occupied { psl, .. } = self {
            *psl = attempt;
        }
    }

    /// Key of a slot the caller knows to be live.
    #[inline]
    pub(crate) fn live_key(&self) -> &K {
        match self {
            Slot::Occupied { key, .. } => key,
            _ => unreachable!("slot is not occupied"),
        }
    }

    #[inline]
    pub(crate) fn replace_key(&mut self, new: K) -> K {
        match self {
            Slot::Occupied { key, .. } => core::mem::replace(key, new),
            _ => unreachable!("slot is not occupied"),
        }
    }

    /// Value of a slot the caller knows to be live.
    #[inline]
    pub(crate) fn live_value(&self) -> &V {
        match self {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("slot is not occupied"),
        }
    }

    #[inline]
    pub(crate) fn live_value_mut(&mut self) -> &mut V {
        match self {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("slot is not occupied"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_leaves_tombstone() {
        let mut slot = Slot::occupied(3, "k", 7);
        assert_eq!(slot.status(), SlotStatus::Occupied(3));
        assert_eq!(slot.take(), Some(("k", 7)));
        assert_eq!(slot.status(), SlotStatus::Tombstone);
        assert_eq!(slot.take(), None);
        assert_eq!(slot.status(), SlotStatus::Tombstone);
    }

    #[test]
    fn empty_slot_has_no_entry() {
        let mut slot: Slot<u32, u32> = Slot::Empty;
        assert!(slot.is_empty());
        assert!(slot.entry().is_none());
        assert!(slot.entry_mut().is_none());
        slot.set_psl(4);
        assert_eq!(slot.status(), SlotStatus::Empty);
    }
}
