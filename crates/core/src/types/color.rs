//! Hex color type used by the QR and website theme settings.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Palette offered next to every color input.
pub const SWATCHES: &[&str] = &[
    "#2e2e2e", "#868e96", "#fa5252", "#e64980", "#be4bdb", "#7950f2", "#4c6ef5", "#228be6",
    "#15aabf", "#12b886", "#40c057", "#82c91e", "#fab005", "#fd7e14",
];

/// Errors that can occur when parsing a [`HexColor`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("color cannot be empty")]
    Empty,
    #[error("color must look like #rrggbb")]
    InvalidFormat,
}

/// A `#rrggbb` color. Letter case is preserved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Parse a `#rrggbb` color.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError`] if the input is empty or not six hex digits
    /// prefixed with `#`.
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        if s.is_empty() {
            return Err(ColorError::Empty);
        }
        let hex = s.strip_prefix('#').ok_or(ColorError::InvalidFormat)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidFormat);
        }
        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(HexColor::parse("#228be6").is_ok());
        assert!(HexColor::parse("#FAB005").is_ok());
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(HexColor::parse(""), Err(ColorError::Empty));
        assert_eq!(HexColor::parse("228be6"), Err(ColorError::InvalidFormat));
        assert_eq!(HexColor::parse("#fff"), Err(ColorError::InvalidFormat));
        assert_eq!(HexColor::parse("#12345g"), Err(ColorError::InvalidFormat));
    }

    #[test]
    fn test_swatches_are_valid() {
        for swatch in SWATCHES {
            assert!(HexColor::parse(swatch).is_ok(), "{swatch}");
        }
    }
}
