//! Request and response types for the merchant backend.

use onboarding_core::{MerchantId, StoreId};
use serde::{Deserialize, Serialize};

/// Body of `POST /v1/merchants`.
///
/// Optional fields the operator left blank are sent as empty strings, except
/// `category`, which is `null` when no category was chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMerchant {
    pub name: String,
    pub category: Option<u8>,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub state: String,
    pub email: String,
    pub phone_number: String,
    pub latitude: String,
    pub longitude: String,
}

/// A merchant record as returned by the backend.
///
/// Only `id` is guaranteed; the dashboard tolerates sparse records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub id: MerchantId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl Merchant {
    /// Name for page headings, falling back to the ID for unnamed records.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

/// A store record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    #[serde(default)]
    pub name: String,
}

/// Every successful backend response wraps its payload in `data`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// Error bodies carry either `message` or `error`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}
