//! Resource library API endpoints.

use axum::{
    extract::multipart::{Field, MultipartRejection},
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Multipart, Path, Query, State},
    Json,
};

use super::{
    current_revision, error, json_body, query_params, record_id, reindex_resource, success,
    ApiResult,
};
use crate::catalog::{run_pipeline, Listing, ResourceQuery};
use crate::errors::{AppError, FieldErrors};
use crate::forms::{simulate_latency, validate_upload};
use crate::models::{
    Resource, StatusChangeRequest, UpdateResourceRequest, UploadResourceRequest,
};
use crate::AppState;

/// GET /api/resources - Filtered, sorted resource listing.
pub async fn list_resources(
    State(state): State<AppState>,
    query: Result<Query<ResourceQuery>, QueryRejection>,
) -> ApiResult<Listing<Resource>> {
    let revision_id = current_revision(&state).await;

    let params = match query_params(query) {
        Ok(params) => params,
        Err(e) => return error(e, revision_id),
    };

    match state.store.list_resources().await {
        Ok(resources) => success(
            run_pipeline(
                resources,
                &params.predicate(),
                params.sort_key(),
                params.page(),
                "resources",
            ),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/resources/:id - Get a single resource.
pub async fn get_resource(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Resource> {
    let revision_id = current_revision(&state).await;

    let id = match record_id(path) {
        Ok(id) => id,
        Err(e) => return error(e, revision_id),
    };

    match state.store.get_resource(id).await {
        Ok(Some(resource)) => success(resource, revision_id),
        Ok(None) => error(AppError::not_found("Resource", id), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/resources - Create a resource from JSON metadata.
pub async fn create_resource(
    State(state): State<AppState>,
    body: Result<Json<UploadResourceRequest>, JsonRejection>,
) -> ApiResult<Resource> {
    let revision_id = current_revision(&state).await;

    let request = match json_body(body) {
        Ok(request) => request,
        Err(e) => return error(e, revision_id),
    };

    store_upload(&state, &request, revision_id).await
}

/// POST /api/resources/upload - Multipart upload of a file plus its metadata.
///
/// The file bytes are measured and discarded; only the metadata is stored.
pub async fn upload_resource(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Resource> {
    let revision_id = current_revision(&state).await;

    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(e) => return error(AppError::BadRequest(e.body_text()), revision_id),
    };

    let request = match read_upload_form(multipart).await {
        Ok(request) => request,
        Err(e) => return error(e, revision_id),
    };

    store_upload(&state, &request, revision_id).await
}

/// Validate, wait out the simulated processing time, then create.
async fn store_upload(
    state: &AppState,
    request: &UploadResourceRequest,
    revision_id: i64,
) -> ApiResult<Resource> {
    // Validation happens first so a rejected form never waits.
    let new = match validate_upload(request) {
        Ok(new) => new,
        Err(e) => return error(e, revision_id),
    };

    simulate_latency(state.config.simulated_latency).await;

    match state.store.create_resource(&new).await {
        Ok(resource) => {
            reindex_resource(state, &resource).await;
            tracing::info!(
                id = resource.id,
                file = %new.file_name,
                "Resource uploaded"
            );

            let new_revision = current_revision(state).await;
            success(resource, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// Collect the upload form fields; `language` and `tags` may repeat or be
/// comma separated.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadResourceRequest, AppError> {
    let mut request = UploadResourceRequest::default();
    let mut flag_errors = FieldErrors::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            request.file_name = file_name;
            request.file_size = Some(bytes.len() as u64);
            continue;
        }

        let value = field_text(field).await?;
        match name.as_str() {
            "title" => request.title = Some(value),
            "description" => request.description = Some(value),
            "category" => request.category = Some(value),
            "sector" => request.sector = Some(value),
            "type" => request.resource_type = Some(value),
            "status" => request.status = Some(value),
            "language" => request
                .language
                .get_or_insert_with(Vec::new)
                .extend(split_list(&value)),
            "tags" => request
                .tags
                .get_or_insert_with(Vec::new)
                .extend(split_list(&value)),
            "featured" => request.featured = parse_flag(&mut flag_errors, "featured", &value),
            "isPublic" => request.is_public = parse_flag(&mut flag_errors, "isPublic", &value),
            other => tracing::debug!("Ignoring unknown upload field '{}'", other),
        }
    }

    if !flag_errors.is_empty() {
        return Err(AppError::InvalidFields(flag_errors));
    }
    Ok(request)
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

fn split_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_flag(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => None,
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" => Some(false),
        _ => {
            errors.insert(field.to_string(), "Expected true or false".to_string());
            None
        }
    }
}

/// PUT /api/resources/:id - Partially update a resource.
pub async fn update_resource(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateResourceRequest>, JsonRejection>,
) -> ApiResult<Resource> {
    let revision_id = current_revision(&state).await;

    let (id, request) = match (record_id(path), json_body(body)) {
        (Ok(id), Ok(request)) => (id, request),
        (Err(e), _) | (_, Err(e)) => return error(e, revision_id),
    };

    let mut blank = FieldErrors::new();
    for (field, value) in [("title", &request.title), ("description", &request.description)] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            blank.insert(field.to_string(), format!("{} cannot be empty", field));
        }
    }
    if !blank.is_empty() {
        return error(AppError::InvalidFields(blank), revision_id);
    }

    apply_update(&state, id, &request, revision_id).await
}

/// PUT /api/resources/:id/status - Publish, unpublish or archive.
pub async fn set_resource_status(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<StatusChangeRequest>, JsonRejection>,
) -> ApiResult<Resource> {
    let revision_id = current_revision(&state).await;

    let (id, request) = match (record_id(path), json_body(body)) {
        (Ok(id), Ok(request)) => (id, request),
        (Err(e), _) | (_, Err(e)) => return error(e, revision_id),
    };

    let changes = UpdateResourceRequest {
        status: Some(request.status),
        expected_version: request.expected_version,
        ..Default::default()
    };
    apply_update(&state, id, &changes, revision_id).await
}

/// POST /api/resources/:id/feature - Toggle the featured flag.
pub async fn toggle_featured(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Resource> {
    let revision_id = current_revision(&state).await;

    let id = match record_id(path) {
        Ok(id) => id,
        Err(e) => return error(e, revision_id),
    };

    let existing = match state.store.get_resource(id).await {
        Ok(Some(resource)) => resource,
        Ok(None) => return error(AppError::not_found("Resource", id), revision_id),
        Err(e) => return error(e, revision_id),
    };

    // Pin the version read above so a concurrent toggle cannot be undone.
    let changes = UpdateResourceRequest {
        featured: Some(!existing.featured),
        expected_version: Some(existing.version),
        ..Default::default()
    };
    apply_update(&state, id, &changes, revision_id).await
}

async fn apply_update(
    state: &AppState,
    id: i64,
    changes: &UpdateResourceRequest,
    revision_id: i64,
) -> ApiResult<Resource> {
    match state.store.update_resource(id, changes).await {
        Ok(resource) => {
            reindex_resource(state, &resource).await;
            let new_revision = current_revision(state).await;
            success(resource, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/resources/:id - Delete a resource.
pub async fn delete_resource(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let revision_id = current_revision(&state).await;

    let id = match record_id(path) {
        Ok(id) => id,
        Err(e) => return error(e, revision_id),
    };

    match state.store.delete_resource(id).await {
        Ok(()) => {
            // Remove from search index
            if let Err(e) = state.search.remove_resource(id).await {
                tracing::warn!("Failed to remove resource {} from index: {}", id, e);
            }

            let new_revision = current_revision(&state).await;
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
