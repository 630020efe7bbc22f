//! HTTP route handlers for accounts and authenticated review edits

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{post, put},
};
use serde::{Deserialize, Serialize};

use super::manager::SessionError;
use super::state::Account;
use crate::catalog::Review;
use crate::catalog::routes::get_reviews;
use crate::server::AppState;

/// Error response for account and review API
#[derive(Debug, Serialize)]
pub struct SessionErrorResponse {
    pub error: String,
    pub code: String,
}

impl SessionErrorResponse {
    fn invalid(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }
}

impl From<SessionError> for SessionErrorResponse {
    fn from(e: SessionError) -> Self {
        let code = match &e {
            SessionError::UsernameTaken(_) => "already_exists",
            SessionError::InvalidCredentials => "invalid_credentials",
            SessionError::Unauthorized => "unauthorized",
            SessionError::Catalog(_) => "not_found",
        };
        Self {
            error: e.to_string(),
            code: code.to_string(),
        }
    }
}

impl IntoResponse for SessionErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "already_exists" | "invalid_credentials" | "invalid_rating" | "invalid_input" => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Body for POST /register and POST /login
#[derive(Debug, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl CredentialsRequest {
    fn validate(&self) -> Result<(), SessionErrorResponse> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(SessionErrorResponse::invalid(
                "invalid_input",
                "Username and password are required",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// Body for PUT /books/:isbn/review
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Defaults to the acting username when omitted
    #[serde(default)]
    pub reviewer: Option<String>,
    pub text: String,
    pub rating: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewMutationResponse {
    pub message: String,
    pub reviews: Vec<Review>,
}

/// Extract the token from `Authorization: Bearer <token>`
///
/// The scheme name is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|token| !token.is_empty())
}

/// Resolve the caller's account from the request headers
async fn acting_account(state: &AppState, headers: &HeaderMap) -> Option<Account> {
    match bearer_token(headers) {
        Some(token) => state.session_manager.resolve(token).await,
        None => None,
    }
}

/// POST /register - Create an account
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), SessionErrorResponse> {
    body.validate()?;
    state
        .session_manager
        .register(&body.username, &body.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// POST /login - Open a session and return its token
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, SessionErrorResponse> {
    body.validate()?;
    let token = state
        .session_manager
        .login(&body.username, &body.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

/// PUT /books/:isbn/review - Add a review (authenticated)
pub async fn add_review(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    headers: HeaderMap,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewMutationResponse>, SessionErrorResponse> {
    // Authorization is decided before the body is looked at
    let acting = acting_account(&state, &headers).await;
    let Some(account) = acting.as_ref() else {
        tracing::warn!("Unauthenticated review submission for {}", isbn);
        return Err(SessionError::Unauthorized.into());
    };

    let Json(body) = body.map_err(|rejection| {
        tracing::debug!("Rejected review body for {}: {}", isbn, rejection);
        SessionErrorResponse::invalid("invalid_input", rejection.body_text())
    })?;

    let range = &state.rating_range;
    let rating = u8::try_from(body.rating)
        .ok()
        .filter(|r| range.contains(r))
        .ok_or_else(|| {
            SessionErrorResponse::invalid(
                "invalid_rating",
                format!(
                    "Rating must be between {} and {}",
                    range.start(),
                    range.end()
                ),
            )
        })?;

    let reviewer = body
        .reviewer
        .as_deref()
        .unwrap_or(account.username.as_str());
    let reviews = state
        .session_manager
        .add_review(acting.as_ref(), &isbn, reviewer, &body.text, rating)
        .await?;

    Ok(Json(ReviewMutationResponse {
        message: "Review added successfully".to_string(),
        reviews,
    }))
}

/// DELETE /books/:isbn/review - Remove the caller's reviews (authenticated)
pub async fn delete_own_reviews(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ReviewMutationResponse>, SessionErrorResponse> {
    let acting = acting_account(&state, &headers).await;
    let reviews = state
        .session_manager
        .remove_reviews_by_current_user(acting.as_ref(), &isbn)
        .await?;

    Ok(Json(ReviewMutationResponse {
        message: "Review deleted successfully".to_string(),
        reviews,
    }))
}

/// Build account and review routes
///
/// Review reads share the path with the authenticated writes, so the
/// catalog's `get_reviews` handler is mounted here too.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route(
            "/books/:isbn/review",
            put(add_review).delete(delete_own_reviews).get(get_reviews),
        )
}
