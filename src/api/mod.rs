// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface.
//!
//! Every protected group is wrapped as authenticate → authorize → validate.
//! `route_layer` calls run last-added-first, so each group lists them in
//! reverse.

use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{
        middleware::{authenticate, require_role, validate_principal},
        Claims, Role,
    },
    models::{
        AdminProfile, Announcement, CoachProfile, CreateAnnouncementRequest, CreateCoachRequest,
        CreateRegistrationRequest, CreateSessionRequest, EmailLoginRequest, LoginResponse,
        MemberProfile, MessageResponse, MobileLoginRequest, ParentDetails, PrincipalProfile,
        RegistrationForm, Session, SignupRequest, UpdateCoachRequest, UpdateDueDateRequest,
        UpdateInactiveStatusRequest, UpdateJoiningDateRequest, UpdateProfileRequest,
        UpdateRegistrationRequest, UpdateSessionRequest,
    },
    state::AppState,
};

pub mod accounts;
pub mod admin;
pub mod coaches;
pub mod health;
pub mod members;
pub mod registrations;
pub mod sessions;

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let authn = from_fn_with_state(state.auth.clone(), authenticate);

    let public = Router::new()
        .route("/signup", post(accounts::signup))
        .route("/login", post(accounts::member_login))
        .route("/coach/login", post(accounts::coach_login))
        .route("/admin/login", post(accounts::admin_login));

    let member = Router::new()
        .route(
            "/member/profile",
            get(members::get_profile).put(members::update_profile),
        )
        .route("/member/announcements", get(members::list_announcements))
        .route_layer(from_fn_with_state(
            state.principal_gate(Role::Member),
            validate_principal,
        ))
        .route_layer(from_fn_with_state(Role::Member, require_role))
        .route_layer(authn.clone());

    let coach = Router::new()
        .route("/coach/profile", get(coaches::get_profile))
        .route_layer(from_fn_with_state(
            state.principal_gate(Role::Coach),
            validate_principal,
        ))
        .route_layer(from_fn_with_state(Role::Coach, require_role))
        .route_layer(authn.clone());

    // Announcements record their author, so the admin must still exist.
    let admin_validated = Router::new()
        .route("/admin/announcements", post(admin::create_announcement))
        .route_layer(from_fn_with_state(
            state.principal_gate(Role::Admin),
            validate_principal,
        ));

    let admin = Router::new()
        .route("/admin/members", get(admin::list_members))
        .route("/admin/members/{id}/joining-date", put(admin::update_joining_date))
        .route("/admin/members/{id}/due-date", put(admin::update_due_date))
        .route(
            "/admin/members/{id}/inactive-status",
            put(admin::update_inactive_status),
        )
        .route(
            "/admin/coaches",
            get(coaches::list_coaches).post(coaches::create_coach),
        )
        .route("/admin/coaches/{id}", put(coaches::update_coach))
        .route("/admin/sessions", post(sessions::create_session))
        .route(
            "/admin/sessions/{id}",
            put(sessions::update_session).delete(sessions::delete_session),
        )
        .route("/registrations", get(registrations::list_registrations))
        .route(
            "/registrations/{id}",
            get(registrations::get_registration).put(registrations::update_registration),
        )
        .merge(admin_validated)
        .route_layer(from_fn_with_state(Role::Admin, require_role))
        .route_layer(authn.clone());

    let authenticated = Router::new()
        .route("/sessions", get(sessions::list_sessions))
        .route("/sessions/{id}", get(sessions::get_session))
        .route(
            "/sessions/coach/{coach_id}",
            get(sessions::list_sessions_by_coach),
        )
        .route("/registrations", post(registrations::create_registration))
        .route_layer(authn);

    let api = Router::new()
        .merge(public)
        .merge(member)
        .merge(coach)
        .merge(admin)
        .merge(authenticated);

    Router::new()
        .nest("/api", api)
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::signup,
        accounts::member_login,
        accounts::coach_login,
        accounts::admin_login,
        members::get_profile,
        members::update_profile,
        members::list_announcements,
        coaches::get_profile,
        coaches::create_coach,
        coaches::list_coaches,
        coaches::update_coach,
        admin::list_members,
        admin::update_joining_date,
        admin::update_due_date,
        admin::update_inactive_status,
        admin::create_announcement,
        sessions::list_sessions,
        sessions::get_session,
        sessions::list_sessions_by_coach,
        sessions::create_session,
        sessions::update_session,
        sessions::delete_session,
        registrations::create_registration,
        registrations::list_registrations,
        registrations::get_registration,
        registrations::update_registration,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Claims,
            Role,
            AdminProfile,
            CoachProfile,
            MemberProfile,
            PrincipalProfile,
            SignupRequest,
            MobileLoginRequest,
            EmailLoginRequest,
            LoginResponse,
            UpdateProfileRequest,
            CreateCoachRequest,
            UpdateCoachRequest,
            UpdateJoiningDateRequest,
            UpdateDueDateRequest,
            UpdateInactiveStatusRequest,
            MessageResponse,
            Session,
            CreateSessionRequest,
            UpdateSessionRequest,
            Announcement,
            CreateAnnouncementRequest,
            ParentDetails,
            RegistrationForm,
            CreateRegistrationRequest,
            UpdateRegistrationRequest,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Accounts", description = "Signup and login"),
        (name = "Members", description = "Member self-service"),
        (name = "Coaches", description = "Coach profiles and management"),
        (name = "Admin", description = "Membership administration"),
        (name = "Sessions", description = "Coaching sessions"),
        (name = "Registrations", description = "Enrolment forms"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ExpiryPolicy;
    use crate::models::{fixtures, Principal};
    use crate::state::testing;
    use crate::store::{records::fixtures::registration_request, InMemoryStore};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use chrono::Utc;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn app(state: &AppState) -> Router {
        router(state.clone(), TIMEOUT)
    }

    fn token_for(state: &AppState, principal: &Principal) -> String {
        let claims = Claims::new(principal.id(), principal.role(), Utc::now(), state.token_ttl).unwrap();
        state.auth.codec.issue(&claims).unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn send_json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn seed(state: &AppState, principal: Principal) -> String {
        let token = token_for(state, &principal);
        state.principals.insert(principal).await.unwrap();
        token
    }

    fn member() -> Principal {
        Principal::Member(fixtures::member("9000000001", "m@example.com", "secret1"))
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let _ = app(&testing::state()).into_make_service();
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = app(&testing::state()).oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn signup_login_profile_flow() {
        let state = testing::state();
        let app = app(&state);

        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/api/signup",
                None,
                json!({"name": "Smriti", "mobile": "9000000005", "email": "s@example.com", "password": "pull-shot"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/api/login",
                None,
                json!({"mobile": "9000000005", "password": "pull-shot"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let token = body["token"].as_str().unwrap().to_string();
        assert_eq!(body["principal"]["role"], "member");

        let response = app
            .oneshot(get("/api/member/profile", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let profile = json_body(response).await;
        assert_eq!(profile["email"], "s@example.com");
        assert!(profile.get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let response = app(&testing::state())
            .oneshot(get("/api/member/profile", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error_code"], "missing_token");
    }

    #[tokio::test]
    async fn foreign_token_is_rejected() {
        let response = app(&testing::state())
            .oneshot(get("/api/sessions", Some("not.a.token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error_code"], "invalid_token");
    }

    #[tokio::test]
    async fn member_token_on_admin_route_is_forbidden() {
        let state = testing::state();
        let token = seed(&state, member()).await;

        let response = app(&state)
            .oneshot(get("/api/admin/members", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await["error_code"], "forbidden");
    }

    #[tokio::test]
    async fn coach_token_on_member_route_is_forbidden() {
        let state = testing::state();
        let token = seed(&state, Principal::Coach(fixtures::coach("9000000010", "secret1"))).await;

        let app = app(&state);
        let response = app
            .clone()
            .oneshot(get("/api/member/profile", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app.oneshot(get("/api/coach/profile", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn removed_member_is_locked_out() {
        let state = testing::state();
        let principal = member();
        let id = principal.id();
        let token = seed(&state, principal).await;
        state.principals.remove(Role::Member, id).await.unwrap();

        let response = app(&state)
            .oneshot(get("/api/member/profile", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error_code"], "principal_not_found");
    }

    #[tokio::test]
    async fn expired_token_depends_on_policy() {
        let expired_token = |state: &AppState, principal: &Principal| {
            let claims = Claims::new(
                principal.id(),
                principal.role(),
                Utc::now() - chrono::Duration::hours(48),
                chrono::Duration::hours(24),
            )
            .unwrap();
            state.auth.codec.issue(&claims).unwrap()
        };

        let enforcing = testing::state();
        let principal = member();
        let token = expired_token(&enforcing, &principal);
        enforcing.principals.insert(principal).await.unwrap();
        let response = app(&enforcing)
            .oneshot(get("/api/member/profile", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error_code"], "token_expired");

        let lenient = testing::state_with(Arc::new(InMemoryStore::new()), ExpiryPolicy::Ignore);
        let principal = member();
        let token = expired_token(&lenient, &principal);
        lenient.principals.insert(principal).await.unwrap();
        let response = app(&lenient)
            .oneshot(get("/api/member/profile", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn concurrent_requests_with_same_token() {
        let state = testing::state();
        let token = seed(&state, member()).await;
        let app = app(&state);

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..16 {
            let app = app.clone();
            let token = token.clone();
            tasks.spawn(async move {
                app.oneshot(get("/api/member/profile", Some(&token)))
                    .await
                    .unwrap()
                    .status()
            });
        }
        while let Some(status) = tasks.join_next().await {
            assert_eq!(status.unwrap(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn announcements_flow_from_admin_to_member() {
        let state = testing::state();
        let admin_token = seed(
            &state,
            Principal::Admin(fixtures::admin("admin@example.com", "admin123")),
        )
        .await;
        let member_token = seed(&state, member()).await;
        let app = app(&state);

        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/api/admin/announcements",
                Some(&admin_token),
                json!({"title": "Trials", "content": "Under-16 trials on Sunday"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(get("/api/member/announcements", Some(&member_token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Trials");
    }

    #[tokio::test]
    async fn removed_admin_cannot_announce_but_can_list() {
        let state = testing::state();
        let admin = Principal::Admin(fixtures::admin("admin@example.com", "admin123"));
        let id = admin.id();
        let token = seed(&state, admin).await;
        state.principals.remove(Role::Admin, id).await.unwrap();
        let app = app(&state);

        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/api/admin/announcements",
                Some(&token),
                json!({"title": "t", "content": "c"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(get("/api/admin/members", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn registrations_split_by_method() {
        let state = testing::state();
        let principal = member();
        let member_id = principal.id();
        let token = seed(&state, principal).await;
        let app = app(&state);

        let body = serde_json::to_value(registration_request(member_id)).unwrap();
        let response = app
            .clone()
            .oneshot(send_json("POST", "/api/registrations", Some(&token), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.oneshot(get("/api/registrations", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn stalled_request_times_out_with_408() {
        let state = testing::state();
        let token = token_for(&state, &member());
        let _held = state.records.write().await;

        let response = router(state.clone(), Duration::from_millis(50))
            .oneshot(get("/api/sessions", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn openapi_lists_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
