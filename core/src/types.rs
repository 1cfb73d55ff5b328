//! Domain DTOs for the hosted CRUD service.
//!
//! # Design
//! These mirror the service's record schema but are defined independently of
//! the mock-api crate; the integration tests catch any drift between the two.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do item as stored by the service.
///
/// `id` is assigned by the service on create and is stable for the item's
/// lifetime. The client never mutates items in place; it re-fetches the
/// collection after every mutating call, so a `Todo` held locally is a cache
/// entry, not a source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: Uuid,
    pub value: String,
}

/// Payload for creating a new item. The service assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub value: String,
}

/// Payload for updating an existing item. Replaces `value` wholesale;
/// behavior for an unknown id is left to the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodo {
    pub value: String,
}

/// API key/URI pair identifying one account on the hosted service.
///
/// Held in memory only; seeded from the environment and freely editable on
/// the credential screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_uri: String,
}
