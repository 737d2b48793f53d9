//! Arena indices for the flat syntax tree.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create a new id from a raw index.
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Get the index into the owning arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the raw u32 value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    /// Index into a unit's expression arena.
    ExprId
);

define_id!(
    /// Index into a unit's declaration arena.
    DeclId
);

define_id!(
    /// Position of a source unit in the list handed to semantic analysis.
    ///
    /// The standard library unit is always `UnitId(0)`.
    UnitId
);

impl UnitId {
    /// The standard library unit.
    pub const STDLIB: UnitId = UnitId(0);
}
