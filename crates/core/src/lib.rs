//! Onboarding Core - Shared types library.
//!
//! This crate provides the pieces of the onboarding dashboard that do not
//! touch the network:
//! - `dashboard` - Operator-facing merchant and store registration forms
//! - `integration-tests` - End-to-end checks against a fake backend
//!
//! # Architecture
//!
//! The core crate contains only types, validation rules and the form-data
//! encoder - no I/O, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, phone numbers, coordinates and colors
//! - [`validation`] - Declarative field schemas that collect per-field error messages
//! - [`form_data`] - Flattening of nested form values into `key[sub]` multipart pairs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod form_data;
pub mod types;
pub mod validation;

pub use form_data::{FormField, FormMap, FormNode, FormValue, Upload, flatten};
pub use types::*;
pub use validation::{FieldErrors, FieldSource, Rule, Schema};
