// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Member self-service endpoints. Mounted behind the member gates, so the
//! handlers receive a freshly loaded [`Member`](crate::models::Member).

use axum::{extract::State, Json};

use crate::{
    api::accounts::hash_in_background,
    auth::CurrentMember,
    error::ApiError,
    models::{Announcement, MemberPatch, MemberProfile, UpdateProfileRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/member/profile",
    tag = "Members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MemberProfile),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Member no longer exists")
    )
)]
pub async fn get_profile(CurrentMember(member): CurrentMember) -> Json<MemberProfile> {
    Json((&member).into())
}

/// Non-blank values from `request`, password hashed.
async fn profile_patch(request: UpdateProfileRequest) -> Result<MemberPatch, ApiError> {
    let present = |v: Option<String>| v.filter(|v| !v.trim().is_empty());
    let password_hash = match request.password.filter(|v| !v.is_empty()) {
        Some(password) => Some(hash_in_background(password).await?),
        None => None,
    };
    Ok(MemberPatch {
        name: present(request.name),
        email: present(request.email),
        mobile: present(request.mobile),
        password_hash,
        ..Default::default()
    })
}

#[utoipa::path(
    put,
    path = "/api/member/profile",
    request_body = UpdateProfileRequest,
    tag = "Members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MemberProfile),
        (status = 409, description = "Email or mobile already in use")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<MemberProfile>, ApiError> {
    let patch = profile_patch(request).await?;
    let updated = state.principals.update_member(member.id, patch).await?;
    Ok(Json(MemberProfile::from(&updated)))
}

#[utoipa::path(
    get,
    path = "/api/member/announcements",
    tag = "Members",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [Announcement]))
)]
pub async fn list_announcements(
    State(state): State<AppState>,
    _member: CurrentMember,
) -> Json<Vec<Announcement>> {
    Json(state.records.read().await.list_announcements())
}
