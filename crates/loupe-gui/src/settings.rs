use std::path::{Path, PathBuf};

use anyhow::Context as _;
use loupe_core::assets::AssetDescriptor;
use loupe_core::config::{ScrollContainer, ZoomConfig, DEFAULT_LABEL_ZOOM_IN, DEFAULT_LABEL_ZOOM_OUT};
use serde::{Deserialize, Serialize};

/// Zoom options as editable UI fields.
pub struct SettingsState {
    pub label_zoom_in: String,
    pub label_zoom_out: String,
    /// Swap in a full-resolution decode of the same file while zoomed.
    pub use_replacement: bool,
    pub margin: f32,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            label_zoom_in: DEFAULT_LABEL_ZOOM_IN.to_string(),
            label_zoom_out: DEFAULT_LABEL_ZOOM_OUT.to_string(),
            use_replacement: true,
            margin: 24.0,
        }
    }
}

impl SettingsState {
    pub fn to_zoom_config(&self, image_path: Option<&Path>) -> ZoomConfig {
        let replacement = if self.use_replacement {
            image_path.map(|p| AssetDescriptor::from_source(p.display().to_string()))
        } else {
            None
        };
        ZoomConfig {
            label_zoom_in: self.label_zoom_in.clone(),
            label_zoom_out: self.label_zoom_out.clone(),
            replacement,
            scroll_container: ScrollContainer::Viewport,
            margin: self.margin,
        }
        .sanitized()
    }

    pub fn from_zoom_config(config: &ZoomConfig) -> Self {
        Self {
            label_zoom_in: config.label_zoom_in.clone(),
            label_zoom_out: config.label_zoom_out.clone(),
            use_replacement: config.replacement.is_some(),
            margin: config.margin,
        }
    }
}

/// On-disk settings file.
#[derive(Serialize, Deserialize)]
pub struct DemoSettings {
    pub config: ZoomConfig,
    pub image_path: Option<PathBuf>,
}

impl DemoSettings {
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = toml::to_string_pretty(self).context("serialize settings")?;
        std::fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        toml::from_str(&text).context("parse settings")
    }
}
