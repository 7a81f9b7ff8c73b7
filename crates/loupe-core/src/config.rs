use serde::{Deserialize, Serialize};

use crate::assets::AssetDescriptor;

pub const DEFAULT_LABEL_ZOOM_IN: &str = "Expand image";
pub const DEFAULT_LABEL_ZOOM_OUT: &str = "Minimize image";

/// Which scrollable ancestor scroll events are tracked on.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ScrollContainer {
    /// The global viewport.
    #[default]
    Viewport,
    /// A named scrollable ancestor the embedder resolves.
    Element(String),
}

/// Options recognized by the zoom engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    /// Accessible label while the image is collapsed.
    pub label_zoom_in: String,
    /// Accessible label while the image is enlarged.
    pub label_zoom_out: String,
    /// Higher-resolution asset swapped in while zoomed.
    pub replacement: Option<AssetDescriptor>,
    /// Scrollable ancestor whose scrolling closes the zoom.
    pub scroll_container: ScrollContainer,
    /// Pixels reserved around the expanded box on each side.
    pub margin: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            label_zoom_in: DEFAULT_LABEL_ZOOM_IN.to_string(),
            label_zoom_out: DEFAULT_LABEL_ZOOM_OUT.to_string(),
            replacement: None,
            scroll_container: ScrollContainer::default(),
            margin: 0.0,
        }
    }
}

impl ZoomConfig {
    /// Clamp out-of-range values instead of rejecting them; a hostile
    /// margin degrades to the default rather than failing the interaction.
    pub fn sanitized(mut self) -> Self {
        if !self.margin.is_finite() || self.margin < 0.0 {
            self.margin = 0.0;
        }
        self
    }
}
