use std::{path::Path, sync::Arc};

use chrono::Utc;
use fieldbook_core::{
    errors::{ServiceError, ServiceResult},
    models::field::{FieldRequest, FieldResponse, UploadedImage, MAX_IMAGE_BYTES},
    pagination::{paginate, PageRequest, Paginated, PaginationQuery},
};
use fieldbook_db::{
    models::{DbField, NewField},
    repositories::field::{FieldRepository, FIELD_SORT_COLUMNS},
};
use uuid::Uuid;

use crate::storage::blob::BlobStore;

/// Catalog of bookable fields and their images.
#[derive(Clone)]
pub struct FieldService {
    repository: Arc<dyn FieldRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl FieldService {
    pub fn new(repository: Arc<dyn FieldRepository>, blob_store: Arc<dyn BlobStore>) -> Self {
        Self {
            repository,
            blob_store,
        }
    }

    pub async fn list_paginated(
        &self,
        query: &PaginationQuery,
    ) -> ServiceResult<Paginated<FieldResponse>> {
        let page = PageRequest::from_query(query, FIELD_SORT_COLUMNS)?;
        let (fields, total) = self.repository.find_all_paginated(&page).await?;

        Ok(paginate(
            fields.into_iter().map(FieldResponse::from).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    pub async fn list_all(&self) -> ServiceResult<Vec<FieldResponse>> {
        let fields = self.repository.find_all().await?;
        Ok(fields.into_iter().map(FieldResponse::from).collect())
    }

    pub async fn get_by_uuid(&self, uuid: Uuid) -> ServiceResult<FieldResponse> {
        self.find_by_uuid(uuid).await.map(FieldResponse::from)
    }

    /// Creates a field. Images are optional; when present they are validated
    /// and uploaded before anything is written.
    pub async fn create(&self, request: FieldRequest) -> ServiceResult<FieldResponse> {
        request.validate()?;

        let images = match request.images {
            Some(images) => self.upload_images(images).await?,
            None => Vec::new(),
        };

        let field = self
            .repository
            .create(NewField {
                code: request.code.trim().to_string(),
                name: request.name.trim().to_string(),
                price_per_hour: request.price_per_hour,
                images,
            })
            .await?;

        tracing::info!(uuid = %field.uuid, code = %field.code, "Created field");
        Ok(field.into())
    }

    /// Replaces a field's attributes. Without new images the stored ones are kept.
    pub async fn update(&self, uuid: Uuid, request: FieldRequest) -> ServiceResult<FieldResponse> {
        request.validate()?;
        let existing = self.find_by_uuid(uuid).await?;

        let images = match request.images {
            Some(images) => self.upload_images(images).await?,
            None => existing.images,
        };

        let field = self
            .repository
            .update(
                uuid,
                NewField {
                    code: request.code.trim().to_string(),
                    name: request.name.trim().to_string(),
                    price_per_hour: request.price_per_hour,
                    images,
                },
            )
            .await?
            .ok_or_else(|| ServiceError::NotFound("Field".to_string()))?;

        tracing::info!(%uuid, "Updated field");
        Ok(field.into())
    }

    /// Deletes a field. Refused with `InUse` while schedules reference it.
    pub async fn delete(&self, uuid: Uuid) -> ServiceResult<()> {
        self.find_by_uuid(uuid).await?;

        if self.repository.delete(uuid).await? == 0 {
            return Err(ServiceError::NotFound("Field".to_string()));
        }

        tracing::info!(%uuid, "Deleted field");
        Ok(())
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> ServiceResult<DbField> {
        self.repository
            .find_by_uuid(uuid)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Field".to_string()))
    }

    async fn upload_images(&self, images: Vec<UploadedImage>) -> ServiceResult<Vec<String>> {
        validate_upload(&images)?;

        let stamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
        let mut urls = Vec::with_capacity(images.len());
        for (index, image) in images.into_iter().enumerate() {
            let object_name = image_object_name(&stamp, index, &image.file_name);
            urls.push(self.blob_store.upload(&object_name, image.bytes).await?);
        }
        Ok(urls)
    }
}

/// Upload contract: at least one file, none above [`MAX_IMAGE_BYTES`].
pub fn validate_upload(images: &[UploadedImage]) -> ServiceResult<()> {
    if images.is_empty() {
        return Err(ServiceError::UploadRejected("invalid upload file".to_string()));
    }
    if let Some(image) = images.iter().find(|image| image.size() > MAX_IMAGE_BYTES) {
        return Err(ServiceError::UploadRejected(format!(
            "Size is too big: {} exceeds 5 MiB",
            image.file_name
        )));
    }
    Ok(())
}

/// `images/<yyyymmddHHMMSS>-<index>-<filename>`, with any client-side
/// directories dropped. `index` is the file's position within its request.
pub fn image_object_name(stamp: &str, index: usize, file_name: &str) -> String {
    let file_name = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("image");
    format!("images/{stamp}-{index}-{file_name}")
}
