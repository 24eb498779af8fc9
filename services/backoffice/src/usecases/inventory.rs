//! Rooms and materials that usages refer to

use common::error::DatabaseError;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use super::error::{UseCaseError, UseCaseResult};
use crate::models::{Material, MaterialInput, Room, RoomInput};
use crate::repositories::{MaterialRepository, RoomRepository};
use crate::validation::{MAX_INVENTORY_NAME_LENGTH, validate_required};

const ROOM_NOT_FOUND: &str = "room not found";
const MATERIAL_NOT_FOUND: &str = "material not found";

#[derive(Clone)]
pub struct InventoryUseCases {
    rooms: Arc<dyn RoomRepository>,
    materials: Arc<dyn MaterialRepository>,
}

impl InventoryUseCases {
    pub fn new(rooms: Arc<dyn RoomRepository>, materials: Arc<dyn MaterialRepository>) -> Self {
        Self { rooms, materials }
    }

    pub async fn create_room(&self, input: RoomInput) -> UseCaseResult<Room> {
        let name = validate_name("Room name", &input.name)?;
        if input.capacity.is_some_and(|capacity| capacity < 1) {
            return Err(UseCaseError::Validation(
                "Capacity must be at least 1".to_string(),
            ));
        }

        let room = self
            .rooms
            .create_room(name, input.capacity)
            .await
            .map_err(|e| name_conflict(e, "room", name))?;

        info!(operation = "create_room", id = %room.id, "Room created");
        Ok(room)
    }

    pub async fn get_all_rooms(&self) -> UseCaseResult<Vec<Room>> {
        Ok(self.rooms.find_all_rooms().await?)
    }

    /// Remove a room together with its material usages
    pub async fn delete_room(&self, id: Uuid) -> UseCaseResult<()> {
        if !self.rooms.delete_room(id).await? {
            error!(operation = "delete_room", %id, "{}", ROOM_NOT_FOUND);
            return Err(UseCaseError::NotFound(ROOM_NOT_FOUND.to_string()));
        }

        info!(operation = "delete_room", %id, "Room deleted");
        Ok(())
    }

    pub async fn create_material(&self, input: MaterialInput) -> UseCaseResult<Material> {
        let name = validate_name("Material name", &input.name)?;

        let material = self
            .materials
            .create_material(name)
            .await
            .map_err(|e| name_conflict(e, "material", name))?;

        info!(operation = "create_material", id = %material.id, "Material created");
        Ok(material)
    }

    pub async fn get_all_materials(&self) -> UseCaseResult<Vec<Material>> {
        Ok(self.materials.find_all_materials().await?)
    }

    /// Remove a material and every usage of it
    pub async fn delete_material(&self, id: Uuid) -> UseCaseResult<()> {
        if !self.materials.delete_material(id).await? {
            error!(operation = "delete_material", %id, "{}", MATERIAL_NOT_FOUND);
            return Err(UseCaseError::NotFound(MATERIAL_NOT_FOUND.to_string()));
        }

        info!(operation = "delete_material", %id, "Material deleted");
        Ok(())
    }
}

fn validate_name<'a>(field: &str, name: &'a str) -> UseCaseResult<&'a str> {
    validate_required(field, name, MAX_INVENTORY_NAME_LENGTH).map_err(UseCaseError::Validation)?;
    Ok(name.trim())
}

fn name_conflict(err: DatabaseError, kind: &str, name: &str) -> UseCaseError {
    match err {
        DatabaseError::UniqueViolation(_) => {
            UseCaseError::InvalidState(format!("{} {} already exists", kind, name))
        }
        err => err.into(),
    }
}
