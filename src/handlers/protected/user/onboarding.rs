use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub onboarding_completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
    pub message: String,
}

/// GET /api/user/onboarding-status
///
/// ```json
/// { "onboardingCompleted": false }
/// ```
pub async fn status_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<OnboardingStatus>, ApiError> {
    let completed = state
        .accounts
        .onboarding_status(&user.email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(OnboardingStatus {
        onboarding_completed: completed,
    }))
}

/// POST /api/user/reset-onboarding
pub async fn reset_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Acknowledgement>, ApiError> {
    set_completed(&state, &user, false).await?;
    tracing::info!("Onboarding reset for {}", user.email);

    Ok(Json(Acknowledgement {
        success: true,
        message: "Onboarding status reset successfully".to_string(),
    }))
}

/// POST /api/user/complete-onboarding
pub async fn complete_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Acknowledgement>, ApiError> {
    set_completed(&state, &user, true).await?;
    tracing::info!("Onboarding completed for {}", user.email);

    Ok(Json(Acknowledgement {
        success: true,
        message: "Onboarding completed".to_string(),
    }))
}

async fn set_completed(state: &AppState, user: &AuthUser, completed: bool) -> Result<(), ApiError> {
    let matched = state
        .accounts
        .set_onboarding_completed(&user.email, completed)
        .await?;

    if matched == 0 {
        tracing::warn!("No account for session email {}", user.email);
        return Err(ApiError::not_found("User not found"));
    }

    Ok(())
}
