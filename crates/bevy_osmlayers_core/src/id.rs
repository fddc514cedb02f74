//! Layer identity.

use std::fmt;

/// Opaque layer identifier.
///
/// Allocated by [`LayerRegistry`](crate::registry::LayerRegistry) from a monotonic counter.
/// Never reused and never derived from the layer title, since the same tag can be searched
/// more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub(crate) u64);

impl LayerId {
    /// Raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// Monotonic id source. Starts at 1.
#[derive(Debug, Default)]
pub(crate) struct LayerIdAllocator {
    last: u64,
}

impl LayerIdAllocator {
    pub(crate) fn next_id(&mut self) -> LayerId {
        self.last += 1;
        LayerId(self.last)
    }
}
