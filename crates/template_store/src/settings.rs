//! Builder settings persistence
//!
//! Settings live in a single `settings.json` inside the builder's data
//! directory. A missing file means defaults; a file that fails to parse is
//! logged and replaced by defaults rather than failing startup.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use template_model::StyleDefaults;

// =============================================================================
// Settings Types
// =============================================================================

/// Export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    /// Pretty-print exported template JSON
    pub pretty: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// All builder settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderSettings {
    /// Spacing applied to new elements and document fields
    pub style_defaults: StyleDefaults,
    pub export: ExportSettings,
}

// =============================================================================
// Settings Manager
// =============================================================================

/// Owns `settings.json` and the settings last read from or written to it
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    current: BuilderSettings,
}

impl SettingsManager {
    /// Create a new settings manager with the given data directory
    pub fn new(data_dir: PathBuf) -> Self {
        let settings_path = data_dir.join("settings.json");
        Self {
            settings_path,
            current: BuilderSettings::default(),
        }
    }

    /// Get the path to the settings file
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    fn parse_or_default(&self, content: &str) -> BuilderSettings {
        match serde_json::from_str::<BuilderSettings>(content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    path = %self.settings_path.display(),
                    "Failed to parse settings file, using defaults: {}",
                    e
                );
                BuilderSettings::default()
            }
        }
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub async fn load(&mut self) -> Result<&BuilderSettings> {
        self.current = if self.settings_path.exists() {
            let content = tokio::fs::read_to_string(&self.settings_path).await?;
            self.parse_or_default(&content)
        } else {
            BuilderSettings::default()
        };
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        tokio::fs::write(&self.settings_path, content).await?;
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &BuilderSettings {
        &self.current
    }

    /// Update settings and save to disk
    pub async fn update(&mut self, settings: BuilderSettings) -> Result<()> {
        self.current = settings;
        self.save().await
    }

    /// Reset settings to defaults and save
    pub async fn reset(&mut self) -> Result<&BuilderSettings> {
        self.current = BuilderSettings::default();
        self.save().await?;
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = BuilderSettings::default();
        assert_eq!(settings.style_defaults.element_spacing, 8.0);
        assert_eq!(settings.style_defaults.document_field_spacing, 0.0);
        assert!(settings.export.pretty);
    }

    #[test]
    fn test_partial_settings_file() {
        let settings: BuilderSettings =
            serde_json::from_str(r#"{"export": {"pretty": false}}"#).unwrap();
        assert!(!settings.export.pretty);
        assert_eq!(settings.style_defaults, StyleDefaults::default());
    }

    #[tokio::test]
    async fn test_settings_manager_load_update() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());

        // Defaults when no file exists
        let settings = manager.load().await.unwrap();
        assert_eq!(settings, &BuilderSettings::default());

        let mut new_settings = BuilderSettings::default();
        new_settings.style_defaults.element_spacing = 4.0;
        new_settings.export.pretty = false;
        manager.update(new_settings.clone()).await.unwrap();
        assert_eq!(manager.get(), &new_settings);

        let mut manager2 = SettingsManager::new(temp_dir.path().to_path_buf());
        let loaded = manager2.load().await.unwrap();
        assert_eq!(loaded, &new_settings);
    }

    #[tokio::test]
    async fn test_unparsable_settings_fall_back() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());
        tokio::fs::write(manager.settings_path(), "{ not json").await.unwrap();

        let settings = manager.load().await.unwrap();
        assert_eq!(settings, &BuilderSettings::default());
    }

    #[tokio::test]
    async fn test_settings_manager_reset() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());

        let mut new_settings = BuilderSettings::default();
        new_settings.export.pretty = false;
        manager.update(new_settings).await.unwrap();

        let settings = manager.reset().await.unwrap();
        assert!(settings.export.pretty);

        let mut manager2 = SettingsManager::new(temp_dir.path().to_path_buf());
        assert!(manager2.load().await.unwrap().export.pretty);
    }

    #[tokio::test]
    async fn test_settings_manager_async() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().join("nested"));

        manager.load().await.unwrap();

        let mut new_settings = BuilderSettings::default();
        new_settings.style_defaults.document_field_spacing = 2.0;
        manager.update(new_settings).await.unwrap();

        let mut manager2 = SettingsManager::new(temp_dir.path().join("nested"));
        let loaded = manager2.load().await.unwrap();
        assert_eq!(loaded.style_defaults.document_field_spacing, 2.0);
    }
}
