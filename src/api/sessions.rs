// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::accounts::require,
    auth::Role,
    error::ApiError,
    models::{CreateSessionRequest, MessageResponse, Session, UpdateSessionRequest},
    state::AppState,
    store::StoreError,
};

fn session_not_found(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound => ApiError::not_found("Session not found"),
        other => other.into(),
    }
}

#[utoipa::path(
    get,
    path = "/api/sessions",
    tag = "Sessions",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [Session]))
)]
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<Session>> {
    Json(state.records.read().await.list_sessions())
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session identifier")),
    tag = "Sessions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Session),
        (status = 404, description = "Session not found")
    )
)]
pub async fn get_session(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Session>, ApiError> {
    let session = state.records.read().await.session(id).map_err(session_not_found)?;
    Ok(Json(session))
}

#[utoipa::path(
    get,
    path = "/api/sessions/coach/{coach_id}",
    params(("coach_id" = Uuid, Path, description = "Coach identifier")),
    tag = "Sessions",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [Session]))
)]
pub async fn list_sessions_by_coach(
    Path(coach_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Json<Vec<Session>> {
    Json(state.records.read().await.sessions_by_coach(coach_id))
}

#[utoipa::path(
    post,
    path = "/api/admin/sessions",
    request_body = CreateSessionRequest,
    tag = "Sessions",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = Session),
        (status = 400, description = "Unknown coach or missing field")
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    require("title", &request.title)?;
    require("date", &request.date)?;

    match state.principals.find_by_id(Role::Coach, request.coach_id).await {
        Ok(_) => {}
        Err(StoreError::NotFound) => return Err(ApiError::bad_request("Coach does not exist")),
        Err(e) => return Err(e.into()),
    }

    let session = state.records.write().await.create_session(request, Utc::now());
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    put,
    path = "/api/admin/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = UpdateSessionRequest,
    tag = "Sessions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Session),
        (status = 404, description = "Session not found")
    )
)]
pub async fn update_session(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateSessionRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .records
        .write()
        .await
        .update_session(id, request, Utc::now())
        .map_err(session_not_found)?;
    Ok(Json(session))
}

#[utoipa::path(
    delete,
    path = "/api/admin/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session identifier")),
    tag = "Sessions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "Session not found")
    )
)]
pub async fn delete_session(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .records
        .write()
        .await
        .delete_session(id)
        .map_err(session_not_found)?;
    Ok(Json(MessageResponse::new("Session deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fixtures, Principal};
    use crate::state::testing;
    use crate::store::records::fixtures::session_request;

    async fn with_coach() -> (AppState, Uuid) {
        let state = testing::state();
        let coach = fixtures::coach("9000000010", "secret1");
        let id = coach.id;
        state.principals.insert(Principal::Coach(coach)).await.unwrap();
        (state, id)
    }

    #[tokio::test]
    async fn create_requires_existing_coach() {
        let state = testing::state();
        let err = create_session(State(state), Json(session_request(Uuid::new_v4())))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_list_and_filter() {
        let (state, coach_id) = with_coach().await;
        let (status, Json(session)) = create_session(State(state.clone()), Json(session_request(coach_id)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(all) = list_sessions(State(state.clone())).await;
        assert_eq!(all, vec![session.clone()]);

        let Json(by_coach) = list_sessions_by_coach(Path(coach_id), State(state.clone())).await;
        assert_eq!(by_coach, vec![session.clone()]);

        let Json(other) = list_sessions_by_coach(Path(Uuid::new_v4()), State(state.clone())).await;
        assert!(other.is_empty());

        let Json(fetched) = get_session(Path(session.id), State(state)).await.unwrap();
        assert_eq!(fetched, session);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let (state, coach_id) = with_coach().await;
        let (_, Json(session)) = create_session(State(state.clone()), Json(session_request(coach_id)))
            .await
            .unwrap();

        let Json(updated) = update_session(
            Path(session.id),
            State(state.clone()),
            Json(UpdateSessionRequest {
                venue: Some("Indoor nets".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.venue, "Indoor nets");
        assert_eq!(updated.title, session.title);

        delete_session(Path(session.id), State(state.clone())).await.unwrap();
        let err = get_session(Path(session.id), State(state)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Session not found");
    }
}
