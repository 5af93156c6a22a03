use axum::Json;
use axum::extract::State;
use tracing::instrument;

use bastion_core::AppError;
use bastion_models::auth::ProfileResponse;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Current user", body = ProfileResponse),
        (status = 401, description = "Missing or invalid access token", body = crate::modules::auth::controller::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all, fields(user_id = auth_user.user_id()))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state.auth_service.profile(auth_user.user_id()).await?;
    Ok(Json(ProfileResponse { user }))
}
