//! The "new merchant" form.

use std::sync::LazyLock;

use onboarding_core::{
    FieldErrors, FieldSource, INDIAN_STATES, PhoneRules, Rule, Schema, StoreCategory,
    canonical_state,
};
use serde::Deserialize;

use super::{CATEGORY_IDS, check_coordinates, pincode_regex};
use crate::merchant_api::NewMerchant;

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field("name", [Rule::min_chars(2, "Name must be at least 2 characters")])
        .field("email", [Rule::email("Invalid email address")])
        .field(
            "phoneNumber",
            [Rule::phone(PhoneRules::MERCHANT, "Invalid phone number")],
        )
        .field(
            "category",
            [Rule::one_of(CATEGORY_IDS, "Please select a category").optional()],
        )
        .field(
            "pincode",
            [Rule::pattern(pincode_regex(), "Please enter a valid 6-digit pincode").optional()],
        )
        .field(
            "state",
            [Rule::one_of(INDIAN_STATES, "Please select a valid state").optional()],
        )
});

/// Raw values of the merchant form, keyed by their HTML field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MerchantForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub category: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub state: String,
    pub latitude: String,
    pub longitude: String,
}

impl FieldSource for MerchantForm {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "name" => &self.name,
            "email" => &self.email,
            "phoneNumber" => &self.phone_number,
            "category" => &self.category,
            "address" => &self.address,
            "city" => &self.city,
            "pincode" => &self.pincode,
            "state" => &self.state,
            "latitude" => &self.latitude,
            "longitude" => &self.longitude,
            _ => return None,
        };
        Some(value)
    }
}

impl MerchantForm {
    /// Trim every value, and canonicalize the state name.
    #[must_use]
    pub fn normalized(self) -> Self {
        let state = self.state.trim();
        let state = canonical_state(state).map_or_else(|| state.to_string(), str::to_string);
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            category: self.category.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            pincode: self.pincode.trim().to_string(),
            state,
            latitude: self.latitude.trim().to_string(),
            longitude: self.longitude.trim().to_string(),
        }
    }

    /// Validate the form and build the backend payload.
    ///
    /// # Errors
    ///
    /// Returns one message per invalid field.
    pub fn validate(&self) -> Result<NewMerchant, FieldErrors> {
        let mut errors = SCHEMA.validate(self).err().unwrap_or_default();
        let coordinates = check_coordinates(&self.latitude, &self.longitude, &mut errors);
        errors.into_result()?;

        Ok(NewMerchant {
            name: self.name.clone(),
            category: StoreCategory::from_form_value(&self.category).map(StoreCategory::id),
            address: self.address.clone(),
            city: self.city.clone(),
            pincode: self.pincode.clone(),
            state: self.state.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            latitude: coordinates.map(|c| c.latitude_fixed()).unwrap_or_default(),
            longitude: coordinates.map(|c| c.longitude_fixed()).unwrap_or_default(),
        })
    }

    /// Whether `state` is the selected state.
    #[must_use]
    pub fn has_state(&self, state: &str) -> bool {
        self.state == state
    }

    /// Whether `category` is the selected category.
    #[must_use]
    pub fn has_category(&self, category: &StoreCategory) -> bool {
        self.category == category.id().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> MerchantForm {
        MerchantForm {
            name: "Chai Point".to_string(),
            email: "owner@chaipoint.in".to_string(),
            phone_number: "+919876543210".to_string(),
            category: "1".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            pincode: "560001".to_string(),
            state: "Karnataka".to_string(),
            latitude: "12.9715987".to_string(),
            longitude: "77.594566".to_string(),
        }
    }

    #[test]
    fn test_valid_form_builds_payload() {
        let merchant = valid_form().validate().unwrap();
        assert_eq!(merchant.name, "Chai Point");
        assert_eq!(merchant.category, Some(1));
        assert_eq!(merchant.phone_number, "+919876543210");
        assert_eq!(merchant.latitude, "12.971599");
        assert_eq!(merchant.longitude, "77.594566");
    }

    #[test]
    fn test_optional_fields_may_be_blank() {
        let form = MerchantForm {
            category: String::new(),
            pincode: String::new(),
            state: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            ..valid_form()
        };
        let merchant = form.validate().unwrap();
        assert_eq!(merchant.category, None);
        assert_eq!(merchant.latitude, "");
        assert_eq!(merchant.pincode, "");
    }

    #[test]
    fn test_reports_each_invalid_field() {
        let form = MerchantForm {
            name: "C".to_string(),
            email: "chaipoint.in".to_string(),
            phone_number: "12345".to_string(),
            pincode: "012345".to_string(),
            state: "Atlantis".to_string(),
            latitude: "123".to_string(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
        assert_eq!(errors.get("email"), Some("Invalid email address"));
        assert_eq!(errors.get("phoneNumber"), Some("Invalid phone number"));
        assert_eq!(errors.get("pincode"), Some("Please enter a valid 6-digit pincode"));
        assert_eq!(errors.get("state"), Some("Please select a valid state"));
        assert!(errors.contains("latitude"));
    }

    #[test]
    fn test_normalized_trims_and_canonicalizes_state() {
        let form = MerchantForm {
            name: "  Chai Point ".to_string(),
            state: " karnataka".to_string(),
            ..valid_form()
        }
        .normalized();
        assert_eq!(form.name, "Chai Point");
        assert_eq!(form.state, "Karnataka");
        assert!(form.has_state("Karnataka"));
        assert!(form.has_category(&StoreCategory::Restaurant));
        assert!(!form.has_category(&StoreCategory::Retail));
    }

    #[test]
    fn test_deserializes_camel_case_form_fields() {
        let form: MerchantForm =
            serde_json::from_str(r#"{"name":"Chai Point","phoneNumber":"9876543210"}"#).unwrap();
        assert_eq!(form.phone_number, "9876543210");
        assert_eq!(form.city, "");
    }
}
