//! The "new store" form.
//!
//! Submitted as `multipart/form-data`. Nested values arrive with bracketed
//! names (`qr[primaryColor]`, `businessHours[0][openTime]`) and are sent on
//! to the backend the same way, so parsing and [`StoreForm::into_form_node`]
//! mirror each other.

use std::sync::LazyLock;

use axum::extract::Multipart;
use onboarding_core::{
    BusinessHours, Coordinates, FieldErrors, FieldSource, FormMap, FormNode, HoursError,
    INDIAN_STATES, MerchantId, PhoneRules, Rule, Schema, StoreCategory, Upload, canonical_state,
};
use regex::Regex;

use super::{
    CATEGORY_IDS, check_coordinates, parse_indexed_key, parse_subscript, pincode_regex,
};
use crate::error::AppError;

/// Description prefilled for new stores.
pub const DEFAULT_DESCRIPTION: &str = "We are dedicated to providing the best services to our customers. Your satisfaction is our priority.";

/// Days offered in the business-hours table, in display order.
pub const WEEKDAYS: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Business-hours rows beyond this index are ignored.
const MAX_HOURS_ROWS: usize = 14;

const MAX_MENU_IMAGES: usize = 10;

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let font_size = Regex::new(r"^[1-9][0-9]{0,2}px$").expect("Invalid regex");
    let radius = Regex::new(r"^[0-9]{1,2}$").expect("Invalid regex");

    Schema::new()
        .field(
            "name",
            [Rule::min_chars(2, "Store name must be at least 2 characters")],
        )
        .field(
            "categoryId",
            [
                Rule::required("Please select a category"),
                Rule::one_of(CATEGORY_IDS, "Please select a category"),
            ],
        )
        .field(
            "tagLine",
            [Rule::min_chars(5, "Tagline must be at least 5 characters")],
        )
        .field(
            "description",
            [Rule::min_chars(10, "Description must be at least 10 characters")],
        )
        .field(
            "ownerName",
            [Rule::min_chars(2, "Owner name must be at least 2 characters")],
        )
        .field("phone", [Rule::phone(PhoneRules::STORE, "Invalid phone number")])
        .field("email", [Rule::email("Invalid email address")])
        .field(
            "address",
            [Rule::min_chars(10, "Please enter complete address")],
        )
        .field(
            "state",
            [Rule::one_of(INDIAN_STATES, "Please select a valid state").optional()],
        )
        .field(
            "pincode",
            [Rule::pattern(pincode_regex(), "Please enter a valid 6-digit pincode").optional()],
        )
        .field(
            "qr[titleFontSize]",
            [Rule::pattern(font_size, "Font size must look like 24px")],
        )
        .field("qr[primaryColor]", [Rule::hex_color("Invalid color")])
        .field("qr[secondaryColor]", [Rule::hex_color("Invalid color")])
        .field("qr[ctaColor]", [Rule::hex_color("Invalid color")])
        .field(
            "qr[radius]",
            [Rule::pattern(radius, "Radius must be a whole number")],
        )
        .field(
            "website[primaryColor]",
            [
                Rule::required("Theme color is required"),
                Rule::hex_color("Invalid color"),
            ],
        )
        .field("website[secondaryColor]", [Rule::hex_color("Invalid color")])
});

/// Styling of the printed QR card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrStyle {
    pub title_font_size: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub primary_text: String,
    pub cta_text: String,
    pub cta_color: String,
    pub radius: String,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            title_font_size: "24px".to_string(),
            primary_color: "#228be6".to_string(),
            secondary_color: "#ffffff".to_string(),
            primary_text: "Scan Here".to_string(),
            cta_text: "To View Our Menu".to_string(),
            cta_color: "#fab005".to_string(),
            radius: "5".to_string(),
        }
    }
}

impl QrStyle {
    fn slot(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "titleFontSize" => Some(&mut self.title_font_size),
            "primaryColor" => Some(&mut self.primary_color),
            "secondaryColor" => Some(&mut self.secondary_color),
            "primaryText" => Some(&mut self.primary_text),
            "ctaText" => Some(&mut self.cta_text),
            "ctaColor" => Some(&mut self.cta_color),
            "radius" => Some(&mut self.radius),
            _ => None,
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "titleFontSize" => &self.title_font_size,
            "primaryColor" => &self.primary_color,
            "secondaryColor" => &self.secondary_color,
            "primaryText" => &self.primary_text,
            "ctaText" => &self.cta_text,
            "ctaColor" => &self.cta_color,
            "radius" => &self.radius,
            _ => return None,
        };
        Some(value)
    }

    fn into_form_map(self) -> FormMap {
        FormMap::new()
            .insert("titleFontSize", self.title_font_size)
            .insert("primaryColor", self.primary_color)
            .insert("secondaryColor", self.secondary_color)
            .insert("primaryText", self.primary_text)
            .insert("ctaText", self.cta_text)
            .insert("ctaColor", self.cta_color)
            .insert("radius", self.radius)
    }
}

/// Colors of the store's generated website.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteTheme {
    pub primary_color: String,
    pub secondary_color: String,
}

impl Default for WebsiteTheme {
    fn default() -> Self {
        Self {
            primary_color: "#fab005".to_string(),
            secondary_color: "#091151".to_string(),
        }
    }
}

impl WebsiteTheme {
    fn slot(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "primaryColor" => Some(&mut self.primary_color),
            "secondaryColor" => Some(&mut self.secondary_color),
            _ => None,
        }
    }

    fn into_form_map(self) -> FormMap {
        FormMap::new()
            .insert("primaryColor", self.primary_color)
            .insert("secondaryColor", self.secondary_color)
    }
}

/// One row of the business-hours table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoursRow {
    pub day: String,
    pub open_time: String,
    pub close_time: String,
}

impl HoursRow {
    fn for_day(day: &str) -> Self {
        Self {
            day: day.to_string(),
            ..Self::default()
        }
    }

    /// A row with neither time filled in means the store is closed that day.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.open_time.trim().is_empty() && self.close_time.trim().is_empty()
    }

    fn slot(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "day" => Some(&mut self.day),
            "openTime" => Some(&mut self.open_time),
            "closeTime" => Some(&mut self.close_time),
            _ => None,
        }
    }
}

/// A business-hours row prepared for rendering, with its field errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoursRowView {
    pub index: usize,
    pub day: String,
    pub open_time: String,
    pub close_time: String,
    pub day_error: Option<String>,
    pub open_error: Option<String>,
    pub close_error: Option<String>,
}

impl HoursRowView {
    /// Whether `day` is the selected day of this row.
    #[must_use]
    pub fn has_day(&self, day: &str) -> bool {
        self.day.eq_ignore_ascii_case(day)
    }
}

/// Text values of the store form, keyed by their HTML field names.
///
/// Kept separate from the uploads so a submission can be re-rendered
/// without copying file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFields {
    pub name: String,
    pub category_id: String,
    pub tag_line: String,
    pub description: String,
    pub owner_name: String,
    pub phone: String,
    pub email: String,
    pub license_id: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub latitude: String,
    pub longitude: String,
    pub qr: QrStyle,
    pub website: WebsiteTheme,
    pub business_hours: Vec<HoursRow>,
}

impl Default for StoreFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            category_id: StoreCategory::default().id().to_string(),
            tag_line: String::new(),
            description: DEFAULT_DESCRIPTION.to_string(),
            owner_name: String::new(),
            phone: String::new(),
            email: String::new(),
            license_id: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            pincode: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            qr: QrStyle::default(),
            website: WebsiteTheme::default(),
            business_hours: WEEKDAYS.iter().map(|day| HoursRow::for_day(day)).collect(),
        }
    }
}

impl FieldSource for StoreFields {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "name" => &self.name,
            "categoryId" => &self.category_id,
            "tagLine" => &self.tag_line,
            "description" => &self.description,
            "ownerName" => &self.owner_name,
            "phone" => &self.phone,
            "email" => &self.email,
            "licenseId" => &self.license_id,
            "address" => &self.address,
            "city" => &self.city,
            "state" => &self.state,
            "pincode" => &self.pincode,
            "latitude" => &self.latitude,
            "longitude" => &self.longitude,
            "website[primaryColor]" => &self.website.primary_color,
            "website[secondaryColor]" => &self.website.secondary_color,
            _ => return parse_subscript(name, "qr").and_then(|key| self.qr.get(key)),
        };
        Some(value)
    }
}

impl StoreFields {
    fn slot(&mut self, name: &str) -> Option<&mut String> {
        let slot = match name {
            "name" => &mut self.name,
            "categoryId" => &mut self.category_id,
            "tagLine" => &mut self.tag_line,
            "description" => &mut self.description,
            "ownerName" => &mut self.owner_name,
            "phone" => &mut self.phone,
            "email" => &mut self.email,
            "licenseId" => &mut self.license_id,
            "address" => &mut self.address,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "pincode" => &mut self.pincode,
            "latitude" => &mut self.latitude,
            "longitude" => &mut self.longitude,
            _ => {
                if let Some(key) = parse_subscript(name, "qr") {
                    return self.qr.slot(key);
                }
                if let Some(key) = parse_subscript(name, "website") {
                    return self.website.slot(key);
                }
                let (index, key) = parse_indexed_key(name, "businessHours")?;
                if index >= MAX_HOURS_ROWS {
                    return None;
                }
                if self.business_hours.len() <= index {
                    self.business_hours.resize_with(index + 1, HoursRow::default);
                }
                return self.business_hours.get_mut(index)?.slot(key);
            }
        };
        Some(slot)
    }

    /// Store a submitted text value under its HTML field name.
    ///
    /// Returns false for names the form does not know.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        match self.slot(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn normalize(&mut self) {
        for value in [
            &mut self.name,
            &mut self.category_id,
            &mut self.tag_line,
            &mut self.description,
            &mut self.owner_name,
            &mut self.phone,
            &mut self.email,
            &mut self.license_id,
            &mut self.address,
            &mut self.city,
            &mut self.pincode,
            &mut self.latitude,
            &mut self.longitude,
            &mut self.qr.title_font_size,
            &mut self.qr.primary_color,
            &mut self.qr.secondary_color,
            &mut self.qr.primary_text,
            &mut self.qr.cta_text,
            &mut self.qr.cta_color,
            &mut self.qr.radius,
            &mut self.website.primary_color,
            &mut self.website.secondary_color,
        ] {
            *value = value.trim().to_string();
        }

        let state = self.state.trim();
        self.state = canonical_state(state).map_or_else(|| state.to_string(), str::to_string);

        for row in &mut self.business_hours {
            row.day = row.day.trim().to_string();
            row.open_time = row.open_time.trim().to_string();
            row.close_time = row.close_time.trim().to_string();
        }
    }

    /// Check every non-blank business-hours row, collecting the parsed hours.
    fn check_hours(&self, errors: &mut FieldErrors) -> Vec<BusinessHours> {
        let mut hours = Vec::new();
        let mut row_errors = false;

        for (index, row) in self.business_hours.iter().enumerate() {
            if row.is_blank() {
                continue;
            }
            let key = |field: &str| format!("businessHours[{index}][{field}]");

            let mut missing = false;
            if row.open_time.is_empty() {
                errors.insert(key("openTime"), "Opening time is required");
                missing = true;
            }
            if row.close_time.is_empty() {
                errors.insert(key("closeTime"), "Closing time is required");
                missing = true;
            }
            if missing {
                row_errors = true;
                continue;
            }

            match BusinessHours::parse(&row.day, &row.open_time, &row.close_time) {
                Ok(parsed) => hours.push(parsed),
                Err(HoursError::MissingDay | HoursError::UnknownDay(_)) => {
                    errors.insert(key("day"), "Please select a day");
                    row_errors = true;
                }
                Err(HoursError::InvalidTime(which)) => {
                    let field = if which == "opening time" {
                        "openTime"
                    } else {
                        "closeTime"
                    };
                    errors.insert(key(field), "Enter a time like 09:30");
                    row_errors = true;
                }
            }
        }

        if hours.is_empty() && !row_errors {
            errors.insert("businessHours", "Add business hours for at least one day");
        }

        hours
    }

    /// Rows for the business-hours table, with their inline errors.
    #[must_use]
    pub fn hours_rows(&self, errors: &FieldErrors) -> Vec<HoursRowView> {
        self.business_hours
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let error = |field: &str| {
                    errors
                        .get(&format!("businessHours[{index}][{field}]"))
                        .map(str::to_string)
                };
                HoursRowView {
                    index,
                    day: row.day.clone(),
                    open_time: row.open_time.clone(),
                    close_time: row.close_time.clone(),
                    day_error: error("day"),
                    open_error: error("openTime"),
                    close_error: error("closeTime"),
                }
            })
            .collect()
    }

    /// Whether `state` is the selected state.
    #[must_use]
    pub fn has_state(&self, state: &str) -> bool {
        self.state == state
    }

    /// Whether `category` is the selected category.
    #[must_use]
    pub fn has_category(&self, category: &StoreCategory) -> bool {
        self.category_id == category.id().to_string()
    }
}

/// Values checked and parsed during validation, consumed when building the
/// backend payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStore {
    pub category: StoreCategory,
    pub coordinates: Option<Coordinates>,
    pub hours: Vec<BusinessHours>,
}

/// A submitted store form: text values plus uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreForm {
    pub fields: StoreFields,
    pub logo: Option<Upload>,
    pub menu_images: Vec<Upload>,
}

impl StoreForm {
    /// Read a multipart submission.
    ///
    /// The business-hours table starts empty and holds exactly the rows that
    /// were submitted. Unknown fields are ignored, as are file inputs left
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Upload` if the body is not valid multipart or
    /// exceeds the upload limit.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self {
            fields: StoreFields {
                business_hours: Vec::new(),
                ..StoreFields::default()
            },
            ..Self::default()
        };

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(str::to_owned) {
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.add_file(&name, Upload::new(file_name, content_type, bytes.to_vec()));
            } else {
                let value = field.text().await?;
                if !form.fields.set(&name, value) {
                    tracing::debug!(field = %name, "Ignoring unknown store form field");
                }
            }
        }

        Ok(form)
    }

    fn add_file(&mut self, name: &str, upload: Upload) {
        if name == "logo" {
            self.logo = Some(upload);
        } else if name == "menuImages" || parse_subscript(name, "menuImages").is_some() {
            self.menu_images.push(upload);
        } else {
            tracing::debug!(field = %name, "Ignoring unknown store upload");
        }
    }

    /// Trim text values and canonicalize the state name.
    pub fn normalize(&mut self) {
        self.fields.normalize();
    }

    /// Validate the whole form.
    ///
    /// # Errors
    ///
    /// Returns one message per invalid field. Business-hours errors are keyed
    /// like their inputs, e.g. `businessHours[2][closeTime]`.
    pub fn validate(&self) -> Result<ParsedStore, FieldErrors> {
        let fields = &self.fields;
        let mut errors = SCHEMA.validate(fields).err().unwrap_or_default();
        let coordinates = check_coordinates(&fields.latitude, &fields.longitude, &mut errors);
        let hours = fields.check_hours(&mut errors);

        if self.logo.as_ref().is_some_and(|logo| !is_image(logo)) {
            errors.insert("logo", "Logo must be an image");
        }
        if self.menu_images.iter().any(|image| !is_image(image)) {
            errors.insert("menuImages", "Menu images must be image files");
        }
        if self.menu_images.len() > MAX_MENU_IMAGES {
            errors.insert(
                "menuImages",
                format!("Upload at most {MAX_MENU_IMAGES} menu images"),
            );
        }

        errors.into_result()?;

        Ok(ParsedStore {
            category: StoreCategory::from_form_value(&fields.category_id).unwrap_or_default(),
            coordinates,
            hours,
        })
    }

    /// Build the nested payload for `POST /v1/merchants/{id}/stores`.
    #[must_use]
    pub fn into_form_node(self, merchant_id: &MerchantId, parsed: ParsedStore) -> FormNode {
        let fields = self.fields;
        let hours: Vec<FormNode> = parsed
            .hours
            .iter()
            .map(|h| {
                FormMap::new()
                    .insert("day", h.day_name())
                    .insert("openTime", h.opens_at_hhmm())
                    .insert("closeTime", h.closes_at_hhmm())
                    .into()
            })
            .collect();

        FormMap::new()
            .insert("name", fields.name)
            .insert("categoryId", parsed.category.id().to_string())
            .insert("tagLine", fields.tag_line)
            .insert("description", fields.description)
            .insert("ownerName", fields.owner_name)
            .insert("phone", fields.phone)
            .insert("email", fields.email)
            .insert_opt("logo", self.logo)
            .insert("licenseId", fields.license_id)
            .insert("address", fields.address)
            .insert("state", fields.state)
            .insert("pincode", fields.pincode)
            .insert("city", fields.city)
            .insert(
                "latitude",
                parsed.coordinates.map(|c| c.latitude_fixed()).unwrap_or_default(),
            )
            .insert(
                "longitude",
                parsed.coordinates.map(|c| c.longitude_fixed()).unwrap_or_default(),
            )
            .insert("storeUniqueId", merchant_id.as_str())
            .insert("qr", fields.qr.into_form_map())
            .insert("website", fields.website.into_form_map())
            .insert("businessHours", hours)
            .insert("menuImages", self.menu_images)
            .into()
    }
}

fn is_image(upload: &Upload) -> bool {
    upload
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("image/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use onboarding_core::{FormValue, flatten};

    use super::*;

    fn png(name: &str) -> Upload {
        Upload::new(name, Some("image/png".to_string()), vec![0x89, b'P', b'N', b'G'])
    }

    fn valid_form() -> StoreForm {
        let mut fields = StoreFields {
            name: "Chai Point Koramangala".to_string(),
            tag_line: "Fresh chai, all day".to_string(),
            owner_name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            email: "koramangala@chaipoint.in".to_string(),
            license_id: "FSSAI-1122".to_string(),
            address: "80 Feet Road, Koramangala 4th Block".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560034".to_string(),
            ..StoreFields::default()
        };
        fields.business_hours[0].open_time = "09:00".to_string();
        fields.business_hours[0].close_time = "21:00".to_string();
        StoreForm {
            fields,
            logo: None,
            menu_images: Vec::new(),
        }
    }

    #[test]
    fn test_defaults() {
        let fields = StoreFields::default();
        assert_eq!(fields.category_id, "1");
        assert_eq!(fields.description, DEFAULT_DESCRIPTION);
        assert_eq!(fields.qr.primary_color, "#228be6");
        assert_eq!(fields.qr.radius, "5");
        assert_eq!(fields.website.primary_color, "#fab005");
        assert_eq!(fields.website.secondary_color, "#091151");
        assert_eq!(fields.business_hours.len(), 7);
        assert!(fields.business_hours.iter().all(HoursRow::is_blank));
    }

    #[test]
    fn test_valid_form_passes() {
        let parsed = valid_form().validate().unwrap();
        assert_eq!(parsed.category, StoreCategory::Restaurant);
        assert_eq!(parsed.hours.len(), 1);
        assert_eq!(parsed.hours[0].day_name(), "Monday");
        assert!(parsed.coordinates.is_none());
    }

    #[test]
    fn test_field_messages() {
        let mut form = valid_form();
        form.fields.name = "C".to_string();
        form.fields.tag_line = "Chai".to_string();
        form.fields.description = "Short".to_string();
        form.fields.owner_name = "A".to_string();
        form.fields.phone = "0123".to_string();
        form.fields.email = "owner@".to_string();
        form.fields.address = "MG Road".to_string();
        form.fields.category_id = String::new();
        form.fields.website.primary_color = String::new();
        form.fields.qr.cta_color = "yellow".to_string();

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("name"), Some("Store name must be at least 2 characters"));
        assert_eq!(errors.get("tagLine"), Some("Tagline must be at least 5 characters"));
        assert_eq!(
            errors.get("description"),
            Some("Description must be at least 10 characters")
        );
        assert_eq!(
            errors.get("ownerName"),
            Some("Owner name must be at least 2 characters")
        );
        assert_eq!(errors.get("phone"), Some("Invalid phone number"));
        assert_eq!(errors.get("email"), Some("Invalid email address"));
        assert_eq!(errors.get("address"), Some("Please enter complete address"));
        assert_eq!(errors.get("categoryId"), Some("Please select a category"));
        assert_eq!(errors.get("website[primaryColor]"), Some("Theme color is required"));
        assert_eq!(errors.get("qr[ctaColor]"), Some("Invalid color"));
    }

    #[test]
    fn test_hours_row_requires_both_times() {
        let mut form = valid_form();
        form.fields.business_hours[1].open_time = "10:00".to_string();
        form.fields.business_hours[2].close_time = "18:00".to_string();

        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("businessHours[1][closeTime]"),
            Some("Closing time is required")
        );
        assert_eq!(
            errors.get("businessHours[2][openTime]"),
            Some("Opening time is required")
        );
        assert!(!errors.contains("businessHours"));
    }

    #[test]
    fn test_at_least_one_hours_row() {
        let mut form = valid_form();
        form.fields.business_hours = WEEKDAYS.iter().map(|d| HoursRow::for_day(d)).collect();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("businessHours"),
            Some("Add business hours for at least one day")
        );
    }

    #[test]
    fn test_invalid_time_and_day() {
        let mut form = valid_form();
        form.fields.business_hours[0].close_time = "9pm".to_string();
        form.fields.business_hours[1] = HoursRow {
            day: "Someday".to_string(),
            open_time: "09:00".to_string(),
            close_time: "17:00".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("businessHours[0][closeTime]"),
            Some("Enter a time like 09:30")
        );
        assert_eq!(errors.get("businessHours[1][day]"), Some("Please select a day"));
    }

    #[test]
    fn test_uploads_must_be_images() {
        let mut form = valid_form();
        form.logo = Some(Upload::new("logo.pdf", Some("application/pdf".to_string()), vec![1]));
        form.menu_images = vec![png("menu.png"), Upload::new("menu.txt", None, vec![1])];

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("logo"), Some("Logo must be an image"));
        assert_eq!(errors.get("menuImages"), Some("Menu images must be image files"));
    }

    #[test]
    fn test_menu_image_limit() {
        let mut form = valid_form();
        form.menu_images = (0..MAX_MENU_IMAGES).map(|i| png(&format!("menu-{i}.png"))).collect();
        assert!(form.validate().is_ok());

        form.menu_images.push(png("one-too-many.png"));
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("menuImages"), Some("Upload at most 10 menu images"));
    }

    #[test]
    fn test_set_routes_bracketed_names() {
        let mut fields = StoreFields {
            business_hours: Vec::new(),
            ..StoreFields::default()
        };
        assert!(fields.set("qr[primaryColor]", "#000000".to_string()));
        assert!(fields.set("website[secondaryColor]", "#111111".to_string()));
        assert!(fields.set("businessHours[2][openTime]", "08:00".to_string()));
        assert!(!fields.set("businessHours[99][openTime]", "08:00".to_string()));
        assert!(!fields.set("qr[unknown]", "x".to_string()));
        assert!(!fields.set("storeUniqueId", "spoofed".to_string()));

        assert_eq!(fields.qr.primary_color, "#000000");
        assert_eq!(fields.website.secondary_color, "#111111");
        assert_eq!(fields.business_hours.len(), 3);
        assert_eq!(fields.business_hours[2].open_time, "08:00");
        assert!(fields.business_hours[0].is_blank());
    }

    #[test]
    fn test_normalize_trims_and_canonicalizes() {
        let mut form = valid_form();
        form.fields.name = "  Chai Point  ".to_string();
        form.fields.state = "karnataka ".to_string();
        form.fields.business_hours[0].open_time = " 09:00 ".to_string();
        form.normalize();
        assert_eq!(form.fields.name, "Chai Point");
        assert_eq!(form.fields.state, "Karnataka");
        assert_eq!(form.fields.business_hours[0].open_time, "09:00");
    }

    #[test]
    fn test_into_form_node_flattens_to_backend_keys() {
        let mut form = valid_form();
        form.fields.latitude = "12.9352".to_string();
        form.fields.longitude = "77.6245".to_string();
        form.fields.business_hours[4].open_time = "18:00".to_string();
        form.fields.business_hours[4].close_time = "02:00".to_string();
        form.logo = Some(png("logo.png"));
        form.menu_images = vec![png("menu-1.png"), png("menu-2.png")];

        let parsed = form.validate().unwrap();
        let fields = flatten(form.into_form_node(&MerchantId::new("42"), parsed));
        let text = |key: &str| {
            fields
                .iter()
                .find(|f| f.key == key)
                .and_then(|f| f.value.as_text())
        };

        assert_eq!(text("storeUniqueId"), Some("42"));
        assert_eq!(text("categoryId"), Some("1"));
        assert_eq!(text("latitude"), Some("12.935200"));
        assert_eq!(text("qr[ctaText]"), Some("To View Our Menu"));
        assert_eq!(text("website[primaryColor]"), Some("#fab005"));
        assert_eq!(text("businessHours[0][day]"), Some("Monday"));
        assert_eq!(text("businessHours[1][day]"), Some("Friday"));
        assert_eq!(text("businessHours[1][closeTime]"), Some("02:00"));
        assert_eq!(text("businessHours[2][day]"), None);

        let files: Vec<&str> = fields
            .iter()
            .filter(|f| matches!(f.value, FormValue::File(_)))
            .map(|f| f.key.as_str())
            .collect();
        assert_eq!(files, ["logo", "menuImages[0]", "menuImages[1]"]);
    }

    #[test]
    fn test_hours_rows_carry_errors() {
        let mut form = valid_form();
        form.fields.business_hours[3].open_time = "11:00".to_string();
        let errors = form.validate().unwrap_err();

        let rows = form.fields.hours_rows(&errors);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[3].day, "Thursday");
        assert_eq!(rows[3].close_error.as_deref(), Some("Closing time is required"));
        assert_eq!(rows[0].close_error, None);
    }
}
