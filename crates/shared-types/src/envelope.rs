//! # Authenticated Actor
//!
//! The identity established by the authentication provider for the current
//! request. The hub treats it as opaque input; it is the sole source of truth
//! for who is calling. Document-declared sender ids are compared against it,
//! never the other way round.

use crate::identity::ActorNumber;
use crate::roles::ActorRole;
use serde::{Deserialize, Serialize};

/// Data-access restriction granted by the authentication provider.
///
/// Carried through untouched. It never relaxes authorization: acting for
/// another actor needs a delegation at either level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Restriction {
    /// Not limited to the caller's own data.
    #[default]
    None,
    /// Limited to data owned by the caller.
    Owned,
}

/// Caller identity attached to every incoming request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedActor {
    pub actor_number: ActorNumber,
    pub role: ActorRole,
    pub restriction: Restriction,
}

impl AuthenticatedActor {
    #[must_use]
    pub fn new(actor_number: ActorNumber, role: ActorRole, restriction: Restriction) -> Self {
        Self {
            actor_number,
            role,
            restriction,
        }
    }

    /// True when `sender` is this actor.
    #[must_use]
    pub fn is_sender(&self, sender: &ActorNumber) -> bool {
        &self.actor_number == sender
    }

    /// True when acting for `original` requires a delegation.
    #[must_use]
    pub fn needs_delegation_for(&self, original: &ActorNumber) -> bool {
        &self.actor_number != original
    }
}
