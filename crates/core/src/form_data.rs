//! Flattening of nested form values into multipart key/value pairs.
//!
//! Multipart bodies are flat, but the store payload is nested: theme
//! settings live under `qr` and `website`, business hours are a list of
//! rows, menu images are a list of files. The backend expects the nesting to
//! be encoded in the field names with bracket subscripts:
//!
//! ```text
//! name                        -> "Chai Point"
//! qr[primaryColor]            -> "#228be6"
//! businessHours[0][openTime]  -> "09:00"
//! menuImages[1]               -> <file>
//! ```
//!
//! [`flatten`] walks a [`FormNode`] depth-first. Maps and lists are
//! traversed, with list members keyed by index. Text and files are
//! terminal and are emitted verbatim under the accumulated key; a file is
//! never traversed.

use core::fmt;

/// An uploaded file held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }
}

// File contents are left out so uploads can sit in traced structs.
impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A nested form value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormNode {
    Text(String),
    File(Upload),
    Map(Vec<(String, FormNode)>),
    List(Vec<FormNode>),
}

impl From<String> for FormNode {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FormNode {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Upload> for FormNode {
    fn from(value: Upload) -> Self {
        Self::File(value)
    }
}

impl<T: Into<FormNode>> From<Vec<T>> for FormNode {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Builder for [`FormNode::Map`] that keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormMap(Vec<(String, FormNode)>);

impl FormMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn insert(mut self, key: impl Into<String>, value: impl Into<FormNode>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    /// Insert only when a value is present; `None` leaves the key out.
    #[must_use]
    pub fn insert_opt<V: Into<FormNode>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.insert(key, value),
            None => self,
        }
    }
}

impl From<FormMap> for FormNode {
    fn from(map: FormMap) -> Self {
        Self::Map(map.0)
    }
}

/// A terminal value in a flattened form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(Upload),
}

impl FormValue {
    /// The text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::File(_) => None,
        }
    }

    /// The file, if this is a file value.
    #[must_use]
    pub const fn as_file(&self) -> Option<&Upload> {
        match self {
            Self::Text(_) => None,
            Self::File(upload) => Some(upload),
        }
    }
}

/// One flattened `key = value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: String,
    pub value: FormValue,
}

/// Flatten a nested value into bracket-keyed pairs, in traversal order.
///
/// Empty maps and lists produce no pairs. A terminal value at the root is
/// emitted under the empty key.
#[must_use]
pub fn flatten(node: FormNode) -> Vec<FormField> {
    let mut fields = Vec::new();
    flatten_into(node, String::new(), &mut fields);
    fields
}

fn flatten_into(node: FormNode, key: String, out: &mut Vec<FormField>) {
    match node {
        FormNode::Map(members) => {
            for (name, child) in members {
                let child_key = subscript(&key, &name);
                flatten_into(child, child_key, out);
            }
        }
        FormNode::List(items) => {
            for (index, child) in items.into_iter().enumerate() {
                let child_key = subscript(&key, &index.to_string());
                flatten_into(child, child_key, out);
            }
        }
        FormNode::Text(text) => out.push(FormField {
            key,
            value: FormValue::Text(text),
        }),
        FormNode::File(upload) => out.push(FormField {
            key,
            value: FormValue::File(upload),
        }),
    }
}

fn subscript(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}[{key}]")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn keys(fields: &[FormField]) -> Vec<&str> {
        fields.iter().map(|f| f.key.as_str()).collect()
    }

    fn text<'a>(fields: &'a [FormField], key: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|f| f.key == key)
            .and_then(|f| f.value.as_text())
    }

    #[test]
    fn test_top_level_keys_are_bare() {
        let fields = flatten(
            FormMap::new()
                .insert("name", "Chai Point")
                .insert("city", "Pune")
                .into(),
        );
        assert_eq!(keys(&fields), ["name", "city"]);
        assert_eq!(text(&fields, "name"), Some("Chai Point"));
    }

    #[test]
    fn test_nested_maps_use_brackets() {
        let node: FormNode = FormMap::new()
            .insert(
                "qr",
                FormMap::new()
                    .insert("primaryColor", "#228be6")
                    .insert("radius", "5"),
            )
            .insert("website", FormMap::new().insert("primaryColor", "#fab005"))
            .into();

        let fields = flatten(node);
        assert_eq!(
            keys(&fields),
            ["qr[primaryColor]", "qr[radius]", "website[primaryColor]"]
        );
        assert_eq!(text(&fields, "qr[radius]"), Some("5"));
    }

    #[test]
    fn test_lists_are_indexed() {
        let hours = vec![
            FormNode::from(FormMap::new().insert("day", "Monday").insert("openTime", "09:00")),
            FormNode::from(FormMap::new().insert("day", "Tuesday").insert("openTime", "10:00")),
        ];
        let fields = flatten(FormMap::new().insert("businessHours", hours).into());

        assert_eq!(
            keys(&fields),
            [
                "businessHours[0][day]",
                "businessHours[0][openTime]",
                "businessHours[1][day]",
                "businessHours[1][openTime]",
            ]
        );
        assert_eq!(text(&fields, "businessHours[1][openTime]"), Some("10:00"));
    }

    #[test]
    fn test_files_are_terminal() {
        let menu = vec![
            Upload::new("page1.jpg", Some("image/jpeg".to_string()), vec![1, 2, 3]),
            Upload::new("page2.png", Some("image/png".to_string()), vec![4]),
        ];
        let logo = Upload::new("logo.png", None, vec![9]);
        let fields = flatten(
            FormMap::new()
                .insert("logo", logo.clone())
                .insert("menuImages", menu)
                .into(),
        );

        assert_eq!(keys(&fields), ["logo", "menuImages[0]", "menuImages[1]"]);
        assert_eq!(fields[0].value.as_file(), Some(&logo));
        assert_eq!(fields[2].value.as_file().unwrap().file_name, "page2.png");
    }

    #[test]
    fn test_empty_containers_emit_nothing() {
        let fields = flatten(
            FormMap::new()
                .insert("menuImages", Vec::<Upload>::new())
                .insert("qr", FormMap::new())
                .insert("name", "")
                .into(),
        );
        // Empty strings are still values.
        assert_eq!(keys(&fields), ["name"]);
    }

    #[test]
    fn test_insert_opt_skips_none() {
        let fields = flatten(
            FormMap::new()
                .insert_opt("logo", None::<Upload>)
                .insert_opt("licenseId", Some("LIC-1"))
                .into(),
        );
        assert_eq!(keys(&fields), ["licenseId"]);
    }

    #[test]
    fn test_root_terminal_uses_empty_key() {
        let fields = flatten(FormNode::from("orphan"));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].key, "");
    }

    #[test]
    fn test_upload_debug_omits_bytes() {
        let upload = Upload::new("logo.png", None, vec![0xde, 0xad, 0xbe, 0xef]);
        let debug = format!("{upload:?}");
        assert!(debug.contains("logo.png"));
        assert!(debug.contains("len: 4"));
        assert!(!debug.contains("222"));
    }
}
