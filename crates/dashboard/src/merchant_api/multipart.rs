//! Conversion of flattened form fields into a `reqwest` multipart body.

use onboarding_core::{FormField, FormValue, Upload};
use reqwest::multipart::{Form, Part};

use super::MerchantApiError;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Build a multipart form, preserving field order.
///
/// # Errors
///
/// Returns `MerchantApiError::Parse` if an upload carries an unusable content type.
pub fn into_form(fields: Vec<FormField>) -> Result<Form, MerchantApiError> {
    fields
        .into_iter()
        .try_fold(Form::new(), |form, field| match field.value {
            FormValue::Text(text) => Ok(form.text(field.key, text)),
            FormValue::File(upload) => Ok(form.part(field.key, file_part(upload)?)),
        })
}

fn file_part(upload: Upload) -> Result<Part, MerchantApiError> {
    let content_type = upload
        .content_type
        .filter(|ct| ct.contains('/'))
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

    Part::bytes(upload.bytes)
        .file_name(upload.file_name)
        .mime_str(&content_type)
        .map_err(|e| MerchantApiError::Parse(format!("Invalid content type '{content_type}': {e}")))
}
