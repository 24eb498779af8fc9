//! Assignment of materials to rooms

use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use super::error::{UseCaseError, UseCaseResult};
use crate::models::{MaterialRoomUsage, MaterialRoomUsageUpdate, MaterialUsageInput};
use crate::repositories::MaterialRoomRepository;

const USAGE_NOT_FOUND: &str = "material is not assigned to this room";

#[derive(Clone)]
pub struct MaterialRoomUseCases {
    repository: Arc<dyn MaterialRoomRepository>,
}

impl MaterialRoomUseCases {
    pub fn new(repository: Arc<dyn MaterialRoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn insert(
        &self,
        usage: MaterialUsageInput,
        room_id: Uuid,
        material_id: Uuid,
    ) -> UseCaseResult<MaterialRoomUsage> {
        validate_quantity(usage.quantity)?;

        if !self.repository.room_exists(room_id).await? {
            return Err(UseCaseError::NotFound("room not found".to_string()));
        }
        if !self.repository.material_exists(material_id).await? {
            return Err(UseCaseError::NotFound("material not found".to_string()));
        }

        let inserted = self
            .repository
            .insert_usage(room_id, material_id, usage.quantity)
            .await?
            .ok_or_else(|| {
                UseCaseError::InvalidState("material is already assigned to this room".to_string())
            })?;

        info!(operation = "insert_material_room", %room_id, %material_id, "Material assigned");
        Ok(inserted)
    }

    pub async fn delete(&self, room_id: Uuid, material_id: Uuid) -> UseCaseResult<()> {
        if !self.repository.delete_usage(room_id, material_id).await? {
            error!(
                operation = "delete_material_room",
                %room_id,
                %material_id,
                "{}",
                USAGE_NOT_FOUND
            );
            return Err(UseCaseError::NotFound(USAGE_NOT_FOUND.to_string()));
        }
        Ok(())
    }

    pub async fn get(&self, room_id: Uuid, material_id: Uuid) -> UseCaseResult<MaterialRoomUsage> {
        self.repository
            .find_usage(room_id, material_id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound(USAGE_NOT_FOUND.to_string()))
    }

    pub async fn get_all(&self) -> UseCaseResult<Vec<MaterialRoomUsage>> {
        Ok(self.repository.find_all_usages().await?)
    }

    pub async fn update(&self, usage: MaterialRoomUsageUpdate) -> UseCaseResult<MaterialRoomUsage> {
        validate_quantity(usage.quantity)?;

        self.repository
            .update_usage(usage.room_id, usage.material_id, usage.quantity)
            .await?
            .ok_or_else(|| UseCaseError::NotFound(USAGE_NOT_FOUND.to_string()))
    }
}

fn validate_quantity(quantity: i32) -> UseCaseResult<()> {
    if quantity < 1 {
        return Err(UseCaseError::Validation(
            "Quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}
