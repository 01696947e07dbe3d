//! Store route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use onboarding_core::{FieldErrors, INDIAN_STATES, MerchantId, SWATCHES, StoreCategory, flatten};
use tower_sessions::Session;
use tracing::instrument;

use super::store_form_path;
use crate::error::AppError;
use crate::filters;
use crate::forms::{HoursRowView, StoreFields, StoreForm, WEEKDAYS};
use crate::notifications::{self, Notification};
use crate::state::AppState;

/// New store page template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/new.html")]
pub struct NewStoreTemplate {
    /// Percent-encoded merchant ID for building URLs
    pub merchant_path: String,
    pub merchant_name: String,
    pub form: StoreFields,
    pub hours: Vec<HoursRowView>,
    pub errors: FieldErrors,
    pub notifications: Vec<Notification>,
    pub categories: [StoreCategory; 5],
    pub states: &'static [&'static str],
    pub weekdays: &'static [&'static str],
    pub swatches: &'static [&'static str],
    pub geolocation_enabled: bool,
    /// Files were submitted but cannot be refilled into the re-rendered form
    pub files_dropped: bool,
}

struct StorePage {
    form: StoreFields,
    errors: FieldErrors,
    notifications: Vec<Notification>,
    files_dropped: bool,
}

impl NewStoreTemplate {
    fn new(
        state: &AppState,
        merchant_id: &MerchantId,
        merchant_name: String,
        mut page: StorePage,
    ) -> Self {
        // A submission without any hours rows gets the full week back.
        if page.form.business_hours.is_empty() {
            page.form.business_hours = StoreFields::default().business_hours;
        }
        Self {
            merchant_path: urlencoding::encode(merchant_id.as_str()).into_owned(),
            merchant_name,
            hours: page.form.hours_rows(&page.errors),
            form: page.form,
            errors: page.errors,
            notifications: page.notifications,
            categories: StoreCategory::ALL,
            states: INDIAN_STATES,
            weekdays: WEEKDAYS,
            swatches: SWATCHES,
            geolocation_enabled: state.geocoder().is_some(),
            files_dropped: page.files_dropped,
        }
    }
}

/// Heading name for a merchant, falling back to its ID when the lookup fails.
async fn merchant_heading(state: &AppState, merchant_id: &MerchantId) -> String {
    match state.merchant_api().get_merchant(merchant_id).await {
        Ok(merchant) => merchant.display_name().to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load merchant, using ID as heading");
            merchant_id.to_string()
        }
    }
}

/// Display the new store form for a merchant.
#[instrument(skip(state, session))]
pub async fn new_store(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: Session,
) -> NewStoreTemplate {
    let merchant_id = MerchantId::new(id);
    let notifications = notifications::take(&session).await;
    let merchant_name = merchant_heading(&state, &merchant_id).await;

    NewStoreTemplate::new(
        &state,
        &merchant_id,
        merchant_name,
        StorePage {
            form: StoreFields::default(),
            errors: FieldErrors::new(),
            notifications,
            files_dropped: false,
        },
    )
}

/// Create a store for a merchant.
///
/// Invalid input re-renders the form with inline errors (400). On success
/// the operator is sent back to a fresh form to add another store. A backend
/// failure re-renders the form with an error notification (502).
#[instrument(skip(state, session, multipart))]
pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: Session,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let merchant_id = MerchantId::new(id);
    let mut form = StoreForm::from_multipart(multipart).await?;
    form.normalize();
    let has_files = form.logo.is_some() || !form.menu_images.is_empty();

    let parsed = match form.validate() {
        Ok(parsed) => parsed,
        Err(errors) => {
            tracing::debug!(%errors, "Store form rejected");
            let merchant_name = merchant_heading(&state, &merchant_id).await;
            let page = StorePage {
                form: form.fields,
                errors,
                notifications: Vec::new(),
                files_dropped: has_files,
            };
            return Ok((
                StatusCode::BAD_REQUEST,
                NewStoreTemplate::new(&state, &merchant_id, merchant_name, page),
            )
                .into_response());
        }
    };

    let retained = form.fields.clone();
    let payload = flatten(form.into_form_node(&merchant_id, parsed));

    match state.merchant_api().create_store(&merchant_id, payload).await {
        Ok(store) => {
            tracing::info!(store.id = %store.id, "Store created");
            notifications::push(&session, Notification::success("Store created successfully")).await;
            Ok(Redirect::to(&store_form_path(&merchant_id)).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create store");
            let merchant_name = merchant_heading(&state, &merchant_id).await;
            let page = StorePage {
                form: retained,
                errors: FieldErrors::new(),
                notifications: vec![Notification::error(e.user_message())],
                files_dropped: has_files,
            };
            Ok((
                StatusCode::BAD_GATEWAY,
                NewStoreTemplate::new(&state, &merchant_id, merchant_name, page),
            )
                .into_response())
        }
    }
}
