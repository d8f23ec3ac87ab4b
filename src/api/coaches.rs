// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    api::accounts::{hash_in_background, require},
    auth::{CurrentCoach, Role},
    error::ApiError,
    models::{Coach, CoachProfile, CreateCoachRequest, Principal, UpdateCoachRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/coach/profile",
    tag = "Coaches",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = CoachProfile),
        (status = 403, description = "Not a coach"),
        (status = 404, description = "Coach no longer exists")
    )
)]
pub async fn get_profile(CurrentCoach(coach): CurrentCoach) -> Json<CoachProfile> {
    Json((&coach).into())
}

#[utoipa::path(
    post,
    path = "/api/admin/coaches",
    request_body = CreateCoachRequest,
    tag = "Coaches",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = CoachProfile),
        (status = 409, description = "Mobile number already registered")
    )
)]
pub async fn create_coach(
    State(state): State<AppState>,
    Json(request): Json<CreateCoachRequest>,
) -> Result<(StatusCode, Json<CoachProfile>), ApiError> {
    require("name", &request.name)?;
    require("mobile", &request.mobile)?;
    require("password", &request.password)?;

    let coach = Coach {
        id: Uuid::new_v4(),
        name: request.name,
        mobile: request.mobile,
        password_hash: hash_in_background(request.password).await?,
        created_at: Utc::now(),
        is_active: true,
    };
    let profile = CoachProfile::from(&coach);
    state.principals.insert(Principal::Coach(coach)).await?;

    info!(id = %profile.id, "Coach created");
    Ok((StatusCode::CREATED, Json(profile)))
}

#[utoipa::path(
    get,
    path = "/api/admin/coaches",
    tag = "Coaches",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [CoachProfile]))
)]
pub async fn list_coaches(State(state): State<AppState>) -> Result<Json<Vec<CoachProfile>>, ApiError> {
    let coaches = state.principals.list_all(Role::Coach).await?;
    Ok(Json(
        coaches
            .into_iter()
            .filter_map(Principal::into_coach)
            .map(|c| CoachProfile::from(&c))
            .collect(),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/coaches/{id}",
    params(("id" = Uuid, Path, description = "Coach identifier")),
    request_body = UpdateCoachRequest,
    tag = "Coaches",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = CoachProfile),
        (status = 404, description = "Coach not found")
    )
)]
pub async fn update_coach(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateCoachRequest>,
) -> Result<Json<CoachProfile>, ApiError> {
    let mut coach = state
        .principals
        .find_by_id(Role::Coach, id)
        .await?
        .into_coach()
        .ok_or_else(|| ApiError::not_found("Coach not found"))?;

    if let Some(name) = request.name.filter(|v| !v.trim().is_empty()) {
        coach.name = name;
    }
    if let Some(is_active) = request.is_active {
        coach.is_active = is_active;
    }

    let profile = CoachProfile::from(&coach);
    state.principals.update(Principal::Coach(coach)).await?;
    Ok(Json(profile))
}
