//! Location lookup used by the "use my location" button.

use axum::{Form, Json, extract::State};
use onboarding_core::Coordinates;
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::geocoding::Location;
use crate::state::AppState;

/// Coordinates reported by the browser.
#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeForm {
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
}

/// Resolve browser coordinates to address fields.
///
/// POST /location/reverse
#[instrument(skip(state))]
pub async fn reverse(
    State(state): State<AppState>,
    Form(form): Form<ReverseGeocodeForm>,
) -> Result<Json<Location>, AppError> {
    let coordinates = Coordinates::parse(&form.latitude, &form.longitude)
        .map_err(|e| AppError::BadRequest(format!("Invalid location: {e}")))?;

    let geocoder = state.geocoder().ok_or(AppError::GeocodingUnavailable)?;
    let location = geocoder.reverse(coordinates).await?;

    Ok(Json(location))
}
