//! Legacy tag taxonomy, kept readable so old stores can be promoted to lists.

use serde::{Deserialize, Serialize};

use super::user::UserId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TagId(pub i64);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub created_at: String,
    pub user_id: UserId,
}
