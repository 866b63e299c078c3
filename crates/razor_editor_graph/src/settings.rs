// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings, stored as RON.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "razor_editor.ron";

/// Rule set applied when a drag gesture commits a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkPolicy {
    /// The drop target's upstream becomes the drag origin, unchecked
    Permissive,
    /// Output feeds input, compatible kinds, no self-links or cycles
    #[default]
    Strict,
}

/// Node box layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Title bar height as a multiple of the title's line height
    pub title_height_factor: f32,
    /// Vertical gap between connector rows
    pub row_spacing: f32,
    /// Horizontal space added between the two label columns
    pub horizontal_padding: f32,
    /// Distance between a connector marker and its label
    pub label_margin: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            title_height_factor: 3.0,
            row_spacing: 4.0,
            horizontal_padding: 40.0,
            label_margin: 10.0,
        }
    }
}

/// Graph editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Connector hit radius, also the marker radius
    pub slot_radius: f32,
    /// Samples per link curve
    pub link_steps: usize,
    /// Horizontal tangent length of link curves
    pub curve_tangent: f32,
    /// Link commit rules
    pub link_policy: LinkPolicy,
    /// Font size used for node labels
    pub font_size: f32,
    /// Node layout
    pub layout: LayoutSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            slot_radius: 5.0,
            link_steps: 12,
            curve_tangent: 80.0,
            link_policy: LinkPolicy::Strict,
            font_size: 13.0,
            layout: LayoutSettings::default(),
        }
    }
}

impl EditorSettings {
    /// Load settings from a RON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings = ron::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No settings file at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load(path) {
            Ok(settings) => {
                tracing::info!("Loaded editor settings from {:?}", path);
                settings
            }
            Err(err) => {
                tracing::warn!("Failed to load settings from {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    /// Save settings to a RON file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::default();
        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Error when loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed RON
    #[error("Invalid settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failed
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}
