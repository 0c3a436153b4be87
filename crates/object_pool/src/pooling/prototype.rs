//! Prototype identity
//!
//! A prototype is the template a pool produces instances of. Identity is the
//! numeric id; the name is the logical name used by name-based spawning and
//! by diagnostics.

use serde::{Serialize, Deserialize};
use std::hash::{Hash, Hasher};

/// Stable numeric prototype identifier
pub type PrototypeId = u32;

/// Template identity that keys a pool
///
/// Two prototypes are the same prototype when their ids match, regardless of
/// name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prototype {
    id: PrototypeId,
    name: String,
}

impl Prototype {
    /// Create a prototype with a stable id and logical name
    pub fn new(id: PrototypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Numeric identity
    pub fn id(&self) -> PrototypeId {
        self.id
    }

    /// Logical name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Prototype {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Prototype {}

impl Hash for Prototype {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Prototype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}
