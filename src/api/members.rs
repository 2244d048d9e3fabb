//! Member API endpoints.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    Json,
};

use super::{current_revision, error, json_body, query_params, record_id, success, ApiResult};
use crate::catalog::{run_pipeline, Listing, MemberQuery};
use crate::errors::{AppError, FieldErrors};
use crate::models::{Member, UpdateMemberRequest};
use crate::AppState;

/// GET /api/members - Filtered, sorted member listing.
pub async fn list_members(
    State(state): State<AppState>,
    query: Result<Query<MemberQuery>, QueryRejection>,
) -> ApiResult<Listing<Member>> {
    let revision_id = current_revision(&state).await;

    let params = match query_params(query) {
        Ok(params) => params,
        Err(e) => return error(e, revision_id),
    };

    match state.store.list_members().await {
        Ok(members) => success(
            run_pipeline(
                members,
                &params.predicate(),
                params.sort_key(),
                params.page(),
                "members",
            ),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/members/:id - Get a single member.
pub async fn get_member(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Member> {
    let revision_id = current_revision(&state).await;

    let id = match record_id(path) {
        Ok(id) => id,
        Err(e) => return error(e, revision_id),
    };

    match state.store.get_member(id).await {
        Ok(Some(member)) => success(member, revision_id),
        Ok(None) => error(AppError::not_found("Member", id), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/members/:id - Change a member's role, status or organization.
pub async fn update_member(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateMemberRequest>, JsonRejection>,
) -> ApiResult<Member> {
    let revision_id = current_revision(&state).await;

    let (id, request) = match (record_id(path), json_body(body)) {
        (Ok(id), Ok(request)) => (id, request),
        (Err(e), _) | (_, Err(e)) => return error(e, revision_id),
    };

    if request
        .organization
        .as_deref()
        .is_some_and(|o| o.trim().is_empty())
    {
        let mut fields = FieldErrors::new();
        fields.insert(
            "organization".to_string(),
            "Organization cannot be empty".to_string(),
        );
        return error(AppError::InvalidFields(fields), revision_id);
    }

    match state.store.update_member(id, &request).await {
        Ok(member) => {
            let new_revision = current_revision(&state).await;
            success(member, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/members/:id - Remove a member.
pub async fn delete_member(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let revision_id = current_revision(&state).await;

    let id = match record_id(path) {
        Ok(id) => id,
        Err(e) => return error(e, revision_id),
    };

    match state.store.delete_member(id).await {
        Ok(()) => {
            let new_revision = current_revision(&state).await;
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
