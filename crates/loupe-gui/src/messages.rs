use loupe_core::assets::AssetSlot;

/// Commands sent from the UI thread to the decode worker.
pub enum WorkerCommand {
    /// Decode an image file off-screen, like a detached probe element.
    Decode { slot: AssetSlot, source: String },
}

/// Results sent from the decode worker back to the UI thread.
pub enum WorkerResult {
    DecodeComplete {
        slot: AssetSlot,
        source: String,
        size: [usize; 2],
        /// RGBA8 pixel data, row-major.
        pixels: Vec<u8>,
    },
    DecodeFailed {
        slot: AssetSlot,
        source: String,
        message: String,
    },
}
