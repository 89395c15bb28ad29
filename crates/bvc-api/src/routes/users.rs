//! 사용자 API 라우트
//!
//! 인증은 다루지 않습니다. 사용자 범위 API(관심종목, 포트폴리오, 알림)는
//! 경로의 `user_id`로 대상을 지정합니다.
//!
//! - `POST /api/v1/users` - 사용자 생성
//! - `GET /api/v1/users/{user_id}` - 사용자 조회

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

use crate::error::{api_error, bad_request, db_error, db_unavailable, not_found, ApiResult};
use crate::repository::{is_unique_violation, NewUser, UserRecord, UserRepository};
use crate::state::AppState;

/// POST /api/v1/users - 사용자 생성
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "생성됨", body = UserRecord),
        (status = 400, description = "잘못된 입력", body = crate::error::ApiErrorResponse),
        (status = 409, description = "이메일 중복", body = crate::error::ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<UserRecord>)> {
    let email = input.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(bad_request("email must be a valid address"));
    }

    let pool = state.db_pool.as_ref().ok_or_else(db_unavailable)?;

    let user = UserRepository::create(pool, &input).await.map_err(|e| {
        if is_unique_violation(&e) {
            api_error(StatusCode::CONFLICT, "CONFLICT", "email already registered")
        } else {
            db_error("Failed to create user", e)
        }
    })?;

    info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/{user_id} - 사용자 조회
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "사용자", body = UserRecord),
        (status = 404, description = "사용자 없음", body = crate::error::ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserRecord>> {
    let pool = state.db_pool.as_ref().ok_or_else(db_unavailable)?;

    UserRepository::find_by_id(pool, user_id)
        .await
        .map_err(|e| db_error("Failed to load user", e))?
        .map(Json)
        .ok_or_else(|| not_found(format!("user {} not found", user_id)))
}

/// 사용자 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_user))
        .route("/{user_id}", get(get_user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use crate::state::create_test_state;

    fn app() -> Router {
        Router::new()
            .nest("/api/v1/users", users_router())
            .with_state(Arc::new(create_test_state()))
    }

    #[tokio::test]
    async fn test_create_user_validates_email_before_db() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/users")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"email":"not-an-email"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_user_without_db() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/users/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
