//! Shared query parameter types for API handlers.

use assetwatch_core::audit::Actor;
use assetwatch_core::types::DbId;
use serde::Deserialize;

/// Optional acting user (`?actor_user_id=`).
///
/// Manual triggers pass the operator's id; without it the action is recorded
/// as performed by the system.
#[derive(Debug, Default, Deserialize)]
pub struct ActorParams {
    pub actor_user_id: Option<DbId>,
}

impl ActorParams {
    pub fn actor(&self) -> Actor {
        Actor::from_user(self.actor_user_id)
    }
}
