//! Onboarding forms.
//!
//! Each form owns its raw submitted values (so it can be re-rendered with
//! what the operator typed), its validation schema, and the conversion into
//! the payload the merchant backend expects.

mod merchant;
mod store;

pub use merchant::MerchantForm;
pub use store::{
    DEFAULT_DESCRIPTION, HoursRow, HoursRowView, ParsedStore, QrStyle, StoreFields, StoreForm,
    WEEKDAYS, WebsiteTheme,
};

use std::sync::LazyLock;

use onboarding_core::{Coordinates, FieldErrors};
use regex::Regex;

/// Form values of [`StoreCategory`](onboarding_core::StoreCategory) ids.
const CATEGORY_IDS: &[&str] = &["1", "2", "3", "4", "5"];

/// Six-digit Indian postal code; the first digit is never zero.
static PINCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("Invalid regex"));

pub(crate) fn pincode_regex() -> Regex {
    PINCODE.clone()
}

/// Validate an optional coordinate pair.
///
/// Both blank is fine; anything else must parse as a valid pair.
pub(crate) fn check_coordinates(
    latitude: &str,
    longitude: &str,
    errors: &mut FieldErrors,
) -> Option<Coordinates> {
    if latitude.trim().is_empty() && longitude.trim().is_empty() {
        return None;
    }
    match Coordinates::parse(latitude, longitude) {
        Ok(coordinates) => Some(coordinates),
        Err(e) => {
            errors.insert("latitude", format!("Invalid location: {e}"));
            None
        }
    }
}

/// Split `prefix[index][key]` into its index and key.
pub(crate) fn parse_indexed_key<'a>(name: &'a str, prefix: &str) -> Option<(usize, &'a str)> {
    let rest = name.strip_prefix(prefix)?.strip_prefix('[')?;
    let (index, rest) = rest.split_once(']')?;
    let key = rest.strip_prefix('[')?.strip_suffix(']')?;
    Some((index.parse().ok()?, key))
}

/// Split `prefix[key]` into its key.
pub(crate) fn parse_subscript<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix)?
        .strip_prefix('[')?
        .strip_suffix(']')
}
