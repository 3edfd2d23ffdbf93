use alloc::alloc::handle_alloc_error;
use core::alloc::Layout;

use thiserror::Error;

/// Errors reported by the fallible (`try_*`) table operations and by
/// configuration validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    /// The requested slot count does not fit in memory addressing limits.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The allocator could not provide the backing store.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    AllocationFailed {
        /// Layout of the slot array that failed to allocate.
        layout: Layout,
    },

    /// A load factor is out of range.
    #[error("invalid {name} load factor: {value}")]
    InvalidLoadFactor {
        /// Which factor was rejected (`"max"` or `"min"`).
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl TableError {
    pub(crate) fn invalid_load_factor(name: &'static str, value: f64) -> Self {
        TableError::InvalidLoadFactor { name, value }
    }

    /// Escalates an error from an infallible entry point the way `alloc`
    /// collections do.
    #[cold]
    #[inline(never)]
    pub(crate) fn raise(self) -> ! {
        match self {
            TableError::AllocationFailed { layout } => handle_alloc_error(layout),
            other => panic!("{other}"),
        }
    }
}
