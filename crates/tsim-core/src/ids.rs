//! Typed identifiers for intersections, road segments, and vehicles.
//!
//! Each id is a `u32` newtype.  Ordering follows the integer, which is what
//! every "ascending" guarantee in the workspace refers to.  Display prints
//! the bare number so ids drop straight into the diagnostic dumps.

use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u32);

        impl $name {
            /// Placeholder for "no such id", e.g. an unreached vertex in a
            /// predecessor table.
            pub const INVALID: $name = $name(u32::MAX);

            /// Slot in a `SparseIndex` or matrix row.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u32> for $name {
            #[inline]
            fn from(n: u32) -> $name {
                $name(n)
            }
        }
    };
}

id_type! {
    /// An intersection in the road network.  Ids need not be contiguous.
    VertexId
}

id_type! {
    /// A directed road segment.  Assigned by the graph in first-insertion
    /// order of each distinct `(from, to)` pair.
    EdgeId
}

id_type! {
    /// A vehicle, assigned sequentially by the engine as cars are added.
    VehicleId
}
