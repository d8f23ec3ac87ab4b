// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only API endpoints for membership management.
//!
//! These endpoints require the Admin role and provide:
//! - Member overview
//! - Joining date, due date and inactive flag maintenance
//! - Announcements

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    api::accounts::require,
    auth::{CurrentAdmin, Role},
    error::ApiError,
    models::{
        Announcement, CreateAnnouncementRequest, Member, MemberPatch, MemberProfile,
        MessageResponse, Principal, UpdateDueDateRequest, UpdateInactiveStatusRequest,
        UpdateJoiningDateRequest,
    },
    state::AppState,
    store::StoreError,
};

async fn patch_member(state: &AppState, id: Uuid, patch: MemberPatch) -> Result<Member, ApiError> {
    state
        .principals
        .update_member(id, patch)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Member not found"),
            other => other.into(),
        })
}

#[utoipa::path(
    get,
    path = "/api/admin/members",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [MemberProfile]),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<MemberProfile>>, ApiError> {
    let members = state.principals.list_all(Role::Member).await?;
    Ok(Json(
        members
            .into_iter()
            .filter_map(Principal::into_member)
            .map(|m| MemberProfile::from(&m))
            .collect(),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/members/{id}/joining-date",
    params(("id" = Uuid, Path, description = "Member identifier")),
    request_body = UpdateJoiningDateRequest,
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MemberProfile),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_joining_date(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateJoiningDateRequest>,
) -> Result<Json<MemberProfile>, ApiError> {
    let patch = MemberPatch {
        joining_date: Some(request.joining_date),
        ..Default::default()
    };
    let profile = MemberProfile::from(&patch_member(&state, id, patch).await?);
    info!(%id, due_date = ?profile.due_date, "Joining date updated");
    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/admin/members/{id}/due-date",
    params(("id" = Uuid, Path, description = "Member identifier")),
    request_body = UpdateDueDateRequest,
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MemberProfile),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_due_date(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateDueDateRequest>,
) -> Result<Json<MemberProfile>, ApiError> {
    let patch = MemberPatch {
        due_date: Some(request.due_date),
        ..Default::default()
    };
    let member = patch_member(&state, id, patch).await?;
    Ok(Json(MemberProfile::from(&member)))
}

#[utoipa::path(
    put,
    path = "/api/admin/members/{id}/inactive-status",
    params(("id" = Uuid, Path, description = "Member identifier")),
    request_body = UpdateInactiveStatusRequest,
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_inactive_status(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateInactiveStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let patch = MemberPatch {
        inactive: Some(request.is_inactive),
        ..Default::default()
    };
    patch_member(&state, id, patch).await?;
    Ok(Json(MessageResponse::new("Inactive status updated successfully")))
}

#[utoipa::path(
    post,
    path = "/api/admin/announcements",
    request_body = CreateAnnouncementRequest,
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = Announcement),
        (status = 404, description = "Admin no longer exists")
    )
)]
pub async fn create_announcement(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Json(request): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>), ApiError> {
    require("title", &request.title)?;
    require("content", &request.content)?;

    let announcement = state
        .records
        .write()
        .await
        .create_announcement(request, admin.id, Utc::now());
    info!(id = %announcement.id, created_by = %admin.id, "Announcement created");
    Ok((StatusCode::CREATED, Json(announcement)))
}
