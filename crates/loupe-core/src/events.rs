use std::sync::Arc;

use tracing::debug;

use crate::error::{LoupeError, Result};

/// The listeners the engine manages over a zoom session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerKind {
    /// Click on the resolved target (open request).
    TargetClick,
    /// Escape while the modal surface is open.
    EscapeKey,
    /// Scroll on the tracked container.
    Scroll,
    /// Viewport resize.
    Resize,
}

impl ListenerKind {
    pub const ALL: &[Self] = &[
        Self::TargetClick,
        Self::EscapeKey,
        Self::Scroll,
        Self::Resize,
    ];

    fn index(self) -> usize {
        match self {
            Self::TargetClick => 0,
            Self::EscapeKey => 1,
            Self::Scroll => 2,
            Self::Resize => 3,
        }
    }
}

/// Injected handle to the surrounding event environment.
///
/// The embedder decides what a listener physically is (a DOM listener, an
/// input-routing flag, a test recorder) and which container scroll events
/// come from. Implementations may use interior mutability; all methods take
/// `&self` so hosts can be shared via `Arc`.
pub trait EventHost: Send + Sync {
    /// Whether the surface can deliver this listener kind at all.
    fn supports(&self, kind: ListenerKind) -> bool {
        let _ = kind;
        true
    }

    fn attach(&self, kind: ListenerKind);

    fn detach(&self, kind: ListenerKind);
}

/// Tracks which listeners are attached so every attach has exactly one
/// matching detach, across any sequence of open/close cycles.
pub struct EventCoordinator {
    host: Arc<dyn EventHost>,
    attached: [bool; ListenerKind::ALL.len()],
}

impl EventCoordinator {
    pub fn new(host: Arc<dyn EventHost>) -> Self {
        Self {
            host,
            attached: [false; ListenerKind::ALL.len()],
        }
    }

    /// Attach a listener. Already-attached kinds are a no-op; a surface
    /// without the capability is skipped and reported as an error the
    /// caller may log and ignore.
    pub fn attach(&mut self, kind: ListenerKind) -> Result<()> {
        if self.attached[kind.index()] {
            return Ok(());
        }
        if !self.host.supports(kind) {
            return Err(LoupeError::UnsupportedListener(kind));
        }
        self.host.attach(kind);
        self.attached[kind.index()] = true;
        Ok(())
    }

    /// Detach a listener; a no-op unless currently attached.
    pub fn detach(&mut self, kind: ListenerKind) {
        if self.attached[kind.index()] {
            self.host.detach(kind);
            self.attached[kind.index()] = false;
        }
    }

    pub fn is_attached(&self, kind: ListenerKind) -> bool {
        self.attached[kind.index()]
    }

    pub fn attached_count(&self) -> usize {
        self.attached.iter().filter(|a| **a).count()
    }

    /// Detach everything, whatever the lifecycle state.
    pub fn teardown(&mut self) {
        for kind in ListenerKind::ALL {
            self.detach(*kind);
        }
        debug!("event listeners torn down");
    }
}

impl Drop for EventCoordinator {
    fn drop(&mut self) {
        self.teardown();
    }
}
