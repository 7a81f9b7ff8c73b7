use thiserror::Error;

use crate::events::ListenerKind;

#[derive(Error, Debug)]
pub enum LoupeError {
    #[error("decode failed for {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("event surface does not support {0:?} listeners")]
    UnsupportedListener(ListenerKind),
}

pub type Result<T> = std::result::Result<T, LoupeError>;
