//! Sizing settings consumed from the host application

use crate::breakpoint::Breakpoint;
use crate::size::GRID_COLUMNS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Feature flags and grid geometry the sizing model depends on
pub trait SettingsProvider: Send + Sync {
    /// When enabled, items keep their own heights instead of matching the
    /// tallest item in their row
    fn custom_height_enabled(&self) -> bool;

    /// When enabled, sizes are also fitted and stored for the breakpoint the
    /// host is rendering; otherwise only `xl` is stored and every other
    /// breakpoint derives from it
    fn flexible_layout_enabled(&self) -> bool;

    /// Column count of the root grid at a breakpoint
    fn columns(&self, breakpoint: Breakpoint) -> u32;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub custom_height_enabled: bool,
    pub flexible_layout_enabled: bool,
    pub columns: BTreeMap<Breakpoint, u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            custom_height_enabled: false,
            flexible_layout_enabled: true,
            columns: Breakpoint::ALL.iter().map(|bp| (*bp, GRID_COLUMNS)).collect(),
        }
    }
}

impl Settings {
    pub fn with_custom_height(mut self, enabled: bool) -> Self {
        self.custom_height_enabled = enabled;
        self
    }

    pub fn with_flexible_layout(mut self, enabled: bool) -> Self {
        self.flexible_layout_enabled = enabled;
        self
    }
}

impl SettingsProvider for Settings {
    fn custom_height_enabled(&self) -> bool {
        self.custom_height_enabled
    }

    fn flexible_layout_enabled(&self) -> bool {
        self.flexible_layout_enabled
    }

    fn columns(&self, breakpoint: Breakpoint) -> u32 {
        self.columns.get(&breakpoint).copied().unwrap_or(GRID_COLUMNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "customHeightEnabled": true, "columns": { "xs": 4 } }"#).unwrap();

        assert!(settings.custom_height_enabled());
        assert!(settings.flexible_layout_enabled());
        assert_eq!(settings.columns(Breakpoint::Xs), 4);
        // breakpoints missing from an explicit map fall back to the standard grid
        assert_eq!(settings.columns(Breakpoint::Xl), GRID_COLUMNS);
    }
}
