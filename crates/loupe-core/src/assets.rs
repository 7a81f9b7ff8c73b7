use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::LoupeError;
use crate::geometry::Size;

/// Descriptor for the optional higher-resolution replacement image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub source: String,
    pub source_set: Option<String>,
    pub sizes: Option<String>,
}

impl AssetDescriptor {
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            source_set: None,
            sizes: None,
        }
    }
}

/// Which asset record a probe decode feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetSlot {
    /// The higher-resolution image shown only while zoomed.
    Replacement,
    /// The full-resolution decode of the target's own source.
    Natural,
}

/// A probe the presentation layer must decode off-screen.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeRequest {
    pub slot: AssetSlot,
    pub source: String,
    pub source_set: Option<String>,
    pub sizes: Option<String>,
}

/// Successful probe decode.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    pub source: String,
    pub natural: Size,
}

/// Tracks readiness of the replacement asset and freshness of the natural
/// asset. Decodes run elsewhere; outcomes are fed back through [`apply`]
/// and checked against the latest requested source, so a superseded decode
/// resolving late is simply ignored.
///
/// [`apply`]: AssetLoader::apply
#[derive(Debug, Default)]
pub struct AssetLoader {
    replacement_source: Option<String>,
    replacement_natural: Option<Size>,
    replacement_ready: bool,
    natural_source: Option<String>,
    natural: Option<Size>,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin loading the replacement asset for a new zoom session.
    pub fn request_replacement(&mut self, descriptor: &AssetDescriptor) -> DecodeRequest {
        self.replacement_source = Some(descriptor.source.clone());
        DecodeRequest {
            slot: AssetSlot::Replacement,
            source: descriptor.source.clone(),
            source_set: descriptor.source_set.clone(),
            sizes: descriptor.sizes.clone(),
        }
    }

    /// Track the target's own source, issuing a probe when it changed.
    pub fn request_natural(
        &mut self,
        source: &str,
        source_set: Option<&str>,
        sizes: Option<&str>,
    ) -> Option<DecodeRequest> {
        if self.natural_source.as_deref() == Some(source) {
            return None;
        }
        Some(self.reload_natural(source, source_set, sizes))
    }

    /// Force a fresh natural probe, e.g. after the source element reloaded.
    pub fn reload_natural(
        &mut self,
        source: &str,
        source_set: Option<&str>,
        sizes: Option<&str>,
    ) -> DecodeRequest {
        self.natural_source = Some(source.to_string());
        self.natural = None;
        DecodeRequest {
            slot: AssetSlot::Natural,
            source: source.to_string(),
            source_set: source_set.map(str::to_string),
            sizes: sizes.map(str::to_string),
        }
    }

    /// Record a probe outcome. Outcomes for a source that is no longer
    /// current are dropped; failures leave readiness untouched.
    pub fn apply(&mut self, slot: AssetSlot, outcome: Result<DecodedImage, LoupeError>) {
        let image = match outcome {
            Ok(image) => image,
            Err(err) => {
                debug!(?slot, %err, "probe decode failed; keeping lower-resolution asset");
                return;
            }
        };

        let current = match slot {
            AssetSlot::Replacement => self.replacement_source.as_deref(),
            AssetSlot::Natural => self.natural_source.as_deref(),
        };
        if current != Some(image.source.as_str()) {
            trace!(?slot, source = %image.source, "stale probe result ignored");
            return;
        }

        match slot {
            AssetSlot::Replacement => {
                self.replacement_natural = Some(image.natural);
                self.replacement_ready = true;
            }
            AssetSlot::Natural => {
                self.natural = Some(image.natural);
            }
        }
    }

    /// True once the replacement asset decoded during this zoom session.
    pub fn replacement_ready(&self) -> bool {
        self.replacement_ready
    }

    pub fn replacement_natural(&self) -> Option<Size> {
        self.replacement_natural.filter(|_| self.replacement_ready)
    }

    pub fn natural_size(&self) -> Option<Size> {
        self.natural
    }

    /// Forget the replacement decode when an unzoom completes; the next
    /// session probes again.
    pub fn reset_replacement(&mut self) {
        self.replacement_source = None;
        self.replacement_natural = None;
        self.replacement_ready = false;
    }
}
