// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public account endpoints: member signup and the three login flows.
//!
//! Login failures never reveal whether the identifier or the password was
//! wrong.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::{password::hash_password, password::verify_password, Claims, Role},
    error::ApiError,
    models::{
        EmailLoginRequest, LoginResponse, Member, MessageResponse, MobileLoginRequest, Principal,
        SignupRequest,
    },
    state::AppState,
    store::{StoreError, UniqueField},
};

const INVALID_MOBILE_LOGIN: &str = "Invalid mobile number or password";
const INVALID_EMAIL_LOGIN: &str = "Invalid email or password";

/// Reject blank required fields.
pub(crate) fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{field} is required")));
    }
    Ok(())
}

/// Argon2 hashing on the blocking pool.
pub(crate) async fn hash_in_background(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)
}

/// Argon2 verification on the blocking pool.
pub(crate) async fn verify_in_background(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(ApiError::internal)
}

/// Sign a token for `principal` and build the login response.
pub(crate) fn issue_login(state: &AppState, principal: &Principal) -> Result<LoginResponse, ApiError> {
    let claims = Claims::new(principal.id(), principal.role(), Utc::now(), state.token_ttl)
        .ok_or_else(|| ApiError::internal("token expiry out of range"))?;
    let token = state.auth.codec.issue(&claims).map_err(ApiError::internal)?;
    let expires_at = claims
        .expires_at()
        .ok_or_else(|| ApiError::internal("token expiry out of range"))?;

    Ok(LoginResponse {
        message: "Login successful".to_string(),
        token,
        expires_at,
        principal: principal.into(),
    })
}

async fn login(
    state: &AppState,
    kind: Role,
    field: UniqueField,
    identifier: &str,
    password: &str,
    failure: &'static str,
) -> Result<Json<LoginResponse>, ApiError> {
    let principal = match state
        .principals
        .find_by_unique_field(kind, field, identifier)
        .await
    {
        Ok(principal) => principal,
        Err(StoreError::NotFound) => return Err(ApiError::unauthorized(failure)),
        Err(e) => return Err(e.into()),
    };

    let matches =
        verify_in_background(password.to_string(), principal.password_hash().to_string()).await?;
    if !matches {
        return Err(ApiError::unauthorized(failure));
    }

    info!(id = %principal.id(), role = %kind, "Login successful");
    Ok(Json(issue_login(state, &principal)?))
}

#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignupRequest,
    tag = "Accounts",
    responses(
        (status = 201, body = MessageResponse),
        (status = 400, description = "Missing field"),
        (status = 409, description = "Email or mobile already registered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    require("name", &request.name)?;
    require("mobile", &request.mobile)?;
    require("email", &request.email)?;
    require("password", &request.password)?;

    let password_hash = hash_in_background(request.password).await?;
    let member = Member {
        id: Uuid::new_v4(),
        name: request.name,
        mobile: request.mobile,
        email: request.email,
        password_hash,
        created_at: Utc::now(),
        joining_date: None,
        due_date: None,
        inactive: false,
    };
    let id = member.id;
    state.principals.insert(Principal::Member(member)).await?;

    info!(%id, "Member signed up");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Member created successfully")),
    ))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = MobileLoginRequest,
    tag = "Accounts",
    responses(
        (status = 200, body = LoginResponse),
        (status = 401, description = "Invalid mobile number or password")
    )
)]
pub async fn member_login(
    State(state): State<AppState>,
    Json(request): Json<MobileLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    login(
        &state,
        Role::Member,
        UniqueField::Mobile,
        &request.mobile,
        &request.password,
        INVALID_MOBILE_LOGIN,
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/coach/login",
    request_body = MobileLoginRequest,
    tag = "Accounts",
    responses(
        (status = 200, body = LoginResponse),
        (status = 401, description = "Invalid mobile number or password")
    )
)]
pub async fn coach_login(
    State(state): State<AppState>,
    Json(request): Json<MobileLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    login(
        &state,
        Role::Coach,
        UniqueField::Mobile,
        &request.mobile,
        &request.password,
        INVALID_MOBILE_LOGIN,
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = EmailLoginRequest,
    tag = "Accounts",
    responses(
        (status = 200, body = LoginResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<EmailLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    login(
        &state,
        Role::Admin,
        UniqueField::Email,
        &request.email,
        &request.password,
        INVALID_EMAIL_LOGIN,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fixtures, PrincipalProfile};
    use crate::state::testing;

    fn signup_request(mobile: &str, email: &str) -> SignupRequest {
        SignupRequest {
            name: "Virat".into(),
            mobile: mobile.into(),
            email: email.into(),
            password: "cover-drive".into(),
        }
    }

    #[tokio::test]
    async fn signup_then_login() {
        let state = testing::state();
        let (status, _) = signup(State(state.clone()), Json(signup_request("9000000001", "v@example.com")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(response) = member_login(
            State(state.clone()),
            Json(MobileLoginRequest {
                mobile: "9000000001".into(),
                password: "cover-drive".into(),
            }),
        )
        .await
        .unwrap();

        let claims = state.auth.verify_at(&response.token, Utc::now()).unwrap();
        assert_eq!(claims.role, Role::Member);
        assert_eq!(Some(response.expires_at), claims.expires_at());
        match response.principal {
            PrincipalProfile::Member(profile) => assert_eq!(profile.email, "v@example.com"),
            other => panic!("unexpected profile {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_signup_conflicts() {
        let state = testing::state();
        signup(State(state.clone()), Json(signup_request("9000000001", "v@example.com")))
            .await
            .unwrap();

        let err = signup(State(state.clone()), Json(signup_request("9000000002", "v@example.com")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err = signup(State(state), Json(signup_request("9000000001", "w@example.com")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn signup_rejects_blank_fields() {
        let mut request = signup_request("9000000001", "v@example.com");
        request.password = "  ".into();
        let err = signup(State(testing::state()), Json(request)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_failures_are_uniform() {
        let state = testing::state();
        let coach = fixtures::coach("9000000002", "secret1");
        state.principals.insert(Principal::Coach(coach)).await.unwrap();

        let wrong_password = coach_login(
            State(state.clone()),
            Json(MobileLoginRequest {
                mobile: "9000000002".into(),
                password: "nope".into(),
            }),
        )
        .await
        .unwrap_err();
        let unknown_mobile = coach_login(
            State(state),
            Json(MobileLoginRequest {
                mobile: "9999999999".into(),
                password: "secret1".into(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.message, unknown_mobile.message);
    }

    #[tokio::test]
    async fn member_credentials_do_not_open_admin_login() {
        let state = testing::state();
        let member = fixtures::member("9000000001", "m@example.com", "secret1");
        state.principals.insert(Principal::Member(member)).await.unwrap();

        let err = admin_login(
            State(state),
            Json(EmailLoginRequest {
                email: "m@example.com".into(),
                password: "secret1".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unrepresentable_expiry_fails_login_without_panicking() {
        let mut state = testing::state();
        state.token_ttl = chrono::Duration::try_hours(10_000_000_000).unwrap();
        let member = fixtures::member("9000000001", "m@example.com", "secret1");
        state.principals.insert(Principal::Member(member)).await.unwrap();

        let err = member_login(
            State(state),
            Json(MobileLoginRequest {
                mobile: "9000000001".into(),
                password: "secret1".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn password_work_runs_off_the_runtime() {
        let hash = hash_in_background("cover-drive".into()).await.unwrap();
        assert!(verify_in_background("cover-drive".into(), hash.clone()).await.unwrap());
        assert!(!verify_in_background("pull-shot".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn admin_login_issues_admin_token() {
        let state = testing::state();
        let admin = fixtures::admin("admin@example.com", "admin123");
        state.principals.insert(Principal::Admin(admin.clone())).await.unwrap();

        let Json(response) = admin_login(
            State(state.clone()),
            Json(EmailLoginRequest {
                email: "admin@example.com".into(),
                password: "admin123".into(),
            }),
        )
        .await
        .unwrap();
        let claims = state.auth.verify_at(&response.token, Utc::now()).unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.subject_id(), Some(admin.id));
    }
}
