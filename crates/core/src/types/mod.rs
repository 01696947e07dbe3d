//! Core types for the onboarding dashboard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod color;
pub mod email;
pub mod geo;
pub mod hours;
pub mod id;
pub mod phone;
pub mod region;

pub use chrono::Weekday;

pub use category::StoreCategory;
pub use color::{ColorError, HexColor, SWATCHES};
pub use email::{Email, EmailError};
pub use geo::{Coordinates, CoordinatesError};
pub use hours::{BusinessHours, HoursError, weekday_name};
pub use id::*;
pub use phone::{PhoneError, PhoneNumber, PhoneRules};
pub use region::{INDIAN_STATES, canonical_state};
