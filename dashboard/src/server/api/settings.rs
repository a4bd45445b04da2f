//! Detection settings API:
//!   GET /api/settings  – device configuration as a form
//!   PUT /api/settings  – validate and write the form to the device

use axum::Json;
use axum::extract::State;

use super::{ApiError, ApiResult, device_error, err_json};
use crate::app::SharedState;
use crate::events;
use crate::services::settings::{self, SettingsError, SettingsForm};

fn map_error(e: SettingsError) -> ApiError {
    match e {
        SettingsError::Invalid { .. } => err_json(400, &e.to_string()),
        SettingsError::Device(e) => device_error("Device settings request failed", &e),
    }
}

/// GET /api/settings
pub async fn get_settings(State(state): State<SharedState>) -> ApiResult<Json<SettingsForm>> {
    let form = settings::load_form(state.client()).await.map_err(map_error)?;
    Ok(Json(form))
}

/// PUT /api/settings
pub async fn update_settings(
    State(state): State<SharedState>,
    Json(form): Json<SettingsForm>,
) -> ApiResult<Json<SettingsForm>> {
    let config = settings::save_form(state.client(), &form)
        .await
        .map_err(map_error)?;

    let saved = SettingsForm::from_config(&config);
    events::broadcast(state.ws_sender(), events::SETTINGS_UPDATED, &saved);
    Ok(Json(saved))
}
