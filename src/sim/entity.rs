//! Entity handles
//!
//! An entity is an opaque non-zero 32-bit id. Zero is reserved as "none",
//! so `Option<Entity>` costs nothing extra.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Handle identifying a game object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(NonZeroU32);

impl Entity {
    /// Wrap a raw id, `None` for the reserved zero id
    #[inline]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Raw numeric id (never zero)
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}
