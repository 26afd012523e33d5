//! # Persisted Layout Format
//!
//! The plain nested JSON the host stores and reloads:
//!
//! ```text
//! { "version": 1,
//!   "layout": { "sections": [ { "header": {..}, "items": [
//!       { "size": { "xl": { "gridWidth": 6, "gridHeight": 22 } },
//!         "content": { "type": "widget", "kind": { "type": "insight", .. } } } ] } ] } }
//! ```
//!
//! The layout is the only state needed to resume editing; breakpoint and
//! settings are not part of it.

use crate::error::{LayoutError, LayoutResult};
use crate::layout::Layout;
use serde::{Deserialize, Serialize};

/// Newest format this crate writes
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLayout {
    pub version: u32,
    pub layout: Layout,
}

impl PersistedLayout {
    pub fn new(layout: Layout) -> Self {
        Self {
            version: FORMAT_VERSION,
            layout,
        }
    }

    pub fn to_json(&self) -> LayoutResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> LayoutResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> LayoutResult<Self> {
        let persisted: PersistedLayout = serde_json::from_str(json)?;
        if persisted.version > FORMAT_VERSION {
            return Err(LayoutError::UnsupportedVersion {
                found: persisted.version,
                supported: FORMAT_VERSION,
            });
        }
        Ok(persisted)
    }

    pub fn into_layout(self) -> Layout {
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_version_is_rejected() {
        let json = r#"{ "version": 7, "layout": { "sections": [] } }"#;
        assert_eq!(
            PersistedLayout::from_json(json),
            Err(LayoutError::UnsupportedVersion {
                found: 7,
                supported: FORMAT_VERSION
            })
        );
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PersistedLayout::from_json("{ \"version\": 1 }"),
            Err(LayoutError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_layout_round_trip() {
        let json = PersistedLayout::new(Layout::new()).to_json().unwrap();
        assert_eq!(json, r#"{"version":1,"layout":{"sections":[]}}"#);
        assert_eq!(PersistedLayout::from_json(&json).unwrap().into_layout(), Layout::new());
    }
}
