// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration form endpoints. Any authenticated principal may file a form
//! for an existing member; listing and editing are admin-only.

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
    auth::Role,
    error::ApiError,
    models::{CreateRegistrationRequest, RegistrationForm, UpdateRegistrationRequest},
    state::AppState,
    store::StoreError,
};

fn registration_not_found(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound => ApiError::not_found("Registration not found"),
        other => other.into(),
    }
}

#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = CreateRegistrationRequest,
    tag = "Registrations",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = RegistrationForm),
        (status = 400, description = "Missing field or unknown member"),
        (status = 409, description = "Member already registered")
    )
)]
pub async fn create_registration(
    State(state): State<AppState>,
    Json(request): Json<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<RegistrationForm>), ApiError> {
    require("formNo", &request.form_no)?;
    require("fullName", &request.full_name)?;
    require("contactNo", &request.contact_no)?;
    require("date", &request.date)?;
    require("dateOfBirth", &request.date_of_birth)?;

    match state.principals.find_by_id(Role::Member, request.member_id).await {
        Ok(_) => {}
        Err(StoreError::NotFound) => return Err(ApiError::bad_request("Member does not exist")),
        Err(e) => return Err(e.into()),
    }

    let form = state
        .records
        .write()
        .await
        .create_registration(request, Utc::now())?;
    info!(id = %form.id, member_id = %form.member_id, "Registration created");
    Ok((StatusCode::CREATED, Json(form)))
}

#[utoipa::path(
    get,
    path = "/api/registrations",
    tag = "Registrations",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [RegistrationForm]))
)]
pub async fn list_registrations(State(state): State<AppState>) -> Json<Vec<RegistrationForm>> {
    Json(state.records.read().await.list_registrations())
}

#[utoipa::path(
    get,
    path = "/api/registrations/{id}",
    params(("id" = Uuid, Path, description = "Registration identifier")),
    tag = "Registrations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = RegistrationForm),
        (status = 404, description = "Registration not found")
    )
)]
pub async fn get_registration(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<RegistrationForm>, ApiError> {
    let form = state
        .records
        .read()
        .await
        .registration(id)
        .map_err(registration_not_found)?;
    Ok(Json(form))
}

#[utoipa::path(
    put,
    path = "/api/registrations/{id}",
    params(("id" = Uuid, Path, description = "Registration identifier")),
    request_body = UpdateRegistrationRequest,
    tag = "Registrations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = RegistrationForm),
        (status = 404, description = "Registration not found")
    )
)]
pub async fn update_registration(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateRegistrationRequest>,
) -> Result<Json<RegistrationForm>, ApiError> {
    let form = state
        .records
        .write()
        .await
        .update_registration(id, request, Utc::now())
        .map_err(registration_not_found)?;
    Ok(Json(form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fixtures, Principal};
    use crate::state::testing;
    use crate::store::records::fixtures::registration_request;

    async fn with_member() -> (AppState, Uuid) {
        let state = testing::state();
        let member = fixtures::member("9000000001", "m@example.com", "secret1");
        let id = member.id;
        state.principals.insert(Principal::Member(member)).await.unwrap();
        (state, id)
    }

    #[tokio::test]
    async fn one_form_per_member() {
        let (state, member_id) = with_member().await;
        let (status, _) = create_registration(State(state.clone()), Json(registration_request(member_id)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let err = create_registration(State(state), Json(registration_request(member_id)))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn unknown_member_is_rejected() {
        let err = create_registration(
            State(testing::state()),
            Json(registration_request(Uuid::new_v4())),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_required_field_is_rejected() {
        let (state, member_id) = with_member().await;
        let mut request = registration_request(member_id);
        request.full_name = String::new();
        let err = create_registration(State(state), Json(request)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "fullName is required");
    }

    #[tokio::test]
    async fn update_and_fetch() {
        let (state, member_id) = with_member().await;
        let (_, Json(form)) = create_registration(State(state.clone()), Json(registration_request(member_id)))
            .await
            .unwrap();

        update_registration(
            Path(form.id),
            State(state.clone()),
            Json(UpdateRegistrationRequest {
                education: Some("Grade 9".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let Json(fetched) = get_registration(Path(form.id), State(state.clone())).await.unwrap();
        assert_eq!(fetched.education, "Grade 9");
        assert_eq!(fetched.form_no, form.form_no);

        let Json(all) = list_registrations(State(state)).await;
        assert_eq!(all, vec![fetched]);
    }
}
