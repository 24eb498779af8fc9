//! Rooms, materials and material usage per room

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A training room
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    /// Seats, when known
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomInput {
    pub name: String,
    pub capacity: Option<i32>,
}

/// A kind of teaching material that can be assigned to rooms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialInput {
    pub name: String,
}

/// How many units of a material are assigned to a room
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRoomUsage {
    pub room_id: Uuid,
    pub material_id: Uuid,
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
}

/// Body of an insert; room and material come from the path
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialUsageInput {
    pub quantity: i32,
}

/// Body of an update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRoomUsageUpdate {
    pub room_id: Uuid,
    pub material_id: Uuid,
    pub quantity: i32,
}

/// Query-string key of a single usage record
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRoomKey {
    pub room_id: Uuid,
    pub material_id: Uuid,
}
