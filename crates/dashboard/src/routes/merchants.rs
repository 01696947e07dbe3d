//! Merchant route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use onboarding_core::{FieldErrors, INDIAN_STATES, StoreCategory};
use tower_sessions::Session;
use tracing::instrument;

use super::store_form_path;
use crate::filters;
use crate::forms::MerchantForm;
use crate::notifications::{self, Notification};
use crate::state::AppState;

/// New merchant page template.
#[derive(Template, WebTemplate)]
#[template(path = "merchants/new.html")]
pub struct NewMerchantTemplate {
    pub form: MerchantForm,
    pub errors: FieldErrors,
    pub notifications: Vec<Notification>,
    pub categories: [StoreCategory; 5],
    pub states: &'static [&'static str],
    pub geolocation_enabled: bool,
}

impl NewMerchantTemplate {
    fn new(
        state: &AppState,
        form: MerchantForm,
        errors: FieldErrors,
        notifications: Vec<Notification>,
    ) -> Self {
        Self {
            form,
            errors,
            notifications,
            categories: StoreCategory::ALL,
            states: INDIAN_STATES,
            geolocation_enabled: state.geocoder().is_some(),
        }
    }
}

/// Display the new merchant form.
#[instrument(skip(state, session))]
pub async fn new_merchant(State(state): State<AppState>, session: Session) -> NewMerchantTemplate {
    let notifications = notifications::take(&session).await;
    NewMerchantTemplate::new(&state, MerchantForm::default(), FieldErrors::new(), notifications)
}

/// Create a merchant and continue to its store form.
///
/// Invalid input re-renders the form with inline errors (400). A backend
/// failure re-renders it with the submitted values and an error
/// notification (502).
#[instrument(skip(state, session, form), fields(merchant.name = %form.name))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<MerchantForm>,
) -> Response {
    let form = form.normalized();

    let new_merchant = match form.validate() {
        Ok(new_merchant) => new_merchant,
        Err(errors) => {
            tracing::debug!(%errors, "Merchant form rejected");
            return (
                StatusCode::BAD_REQUEST,
                NewMerchantTemplate::new(&state, form, errors, Vec::new()),
            )
                .into_response();
        }
    };

    match state.merchant_api().create_merchant(&new_merchant).await {
        Ok(merchant) => {
            tracing::info!(merchant.id = %merchant.id, "Merchant created");
            notifications::push(&session, Notification::success("Merchant created successfully"))
                .await;
            Redirect::to(&store_form_path(&merchant.id)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create merchant");
            let notice = Notification::error(e.user_message());
            (
                StatusCode::BAD_GATEWAY,
                NewMerchantTemplate::new(&state, form, FieldErrors::new(), vec![notice]),
            )
                .into_response()
        }
    }
}
