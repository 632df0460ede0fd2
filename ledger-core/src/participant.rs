//! Participant registry
//!
//! Participants are registered once per run. Registration order fixes each
//! participant's index, and that index is the participant's row and column in
//! the debt matrix. Names are matched case-insensitively after trimming.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable participant index assigned at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(usize);

impl ParticipantId {
    /// Wrap a raw index
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw index (matrix row/column)
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant<A = ()> {
    /// Index assigned at registration
    pub id: ParticipantId,

    /// Name as supplied (trimmed)
    pub display_name: String,

    /// Caller data carried alongside the participant, never inspected here
    pub aux: A,
}

/// Order-preserving registry of uniquely named participants
#[derive(Debug, Clone)]
pub struct ParticipantRegistry<A = ()> {
    index_by_name: HashMap<String, usize>,
    participants: Vec<Participant<A>>,
}

/// Normalized identity of a name: trimmed and lowercased
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl<A> Default for ParticipantRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> ParticipantRegistry<A> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            index_by_name: HashMap::new(),
            participants: Vec::new(),
        }
    }

    /// Build a registry from `(name, aux)` pairs, stopping at the first error
    pub fn from_entries<N, I>(entries: I) -> Result<Self>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, A)>,
    {
        let mut registry = Self::new();
        for (name, aux) in entries {
            registry.register(name.as_ref(), aux)?;
        }
        Ok(registry)
    }

    /// Register a participant and return its index
    pub fn register(&mut self, name: &str, aux: A) -> Result<ParticipantId> {
        let key = normalize_name(name);
        if key.is_empty() {
            return Err(Error::EmptyName);
        }
        if self.index_by_name.contains_key(&key) {
            return Err(Error::DuplicateName(name.trim().to_string()));
        }

        let id = ParticipantId(self.participants.len());
        self.index_by_name.insert(key, id.0);
        self.participants.push(Participant {
            id,
            display_name: name.trim().to_string(),
            aux,
        });

        tracing::debug!(participant = %name.trim(), index = id.0, "Registered participant");
        Ok(id)
    }

    /// Look a participant up by name
    pub fn lookup_by_name(&self, name: &str) -> Option<&Participant<A>> {
        self.index_by_name
            .get(&normalize_name(name))
            .map(|&i| &self.participants[i])
    }

    /// Resolve a name to its index
    pub fn resolve(&self, name: &str) -> Result<ParticipantId> {
        self.lookup_by_name(name)
            .map(|p| p.id)
            .ok_or_else(|| Error::UnknownParticipant(name.to_string()))
    }

    /// Participant at an engine-assigned index
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this registry.
    pub fn lookup_by_index(&self, id: ParticipantId) -> &Participant<A> {
        &self.participants[id.0]
    }

    /// Participant at an index that may come from outside the engine
    pub fn get(&self, index: usize) -> Option<&Participant<A>> {
        self.participants.get(index)
    }

    /// True if `id` belongs to a registered participant
    pub fn contains(&self, id: ParticipantId) -> bool {
        id.0 < self.participants.len()
    }

    /// Check that `name` is the participant registered at `index`
    pub fn is_valid_at(&self, name: &str, index: usize) -> bool {
        self.index_by_name
            .get(&normalize_name(name))
            .is_some_and(|&i| i == index)
    }

    /// Display name of a participant
    pub fn name_of(&self, id: ParticipantId) -> &str {
        &self.lookup_by_index(id).display_name
    }

    /// Number of registered participants
    pub fn count(&self) -> usize {
        self.participants.len()
    }

    /// True if nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Participants in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Participant<A>> + '_ {
        self.participants.iter()
    }

    /// Participant ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = ParticipantId> {
        (0..self.participants.len()).map(ParticipantId)
    }
}
