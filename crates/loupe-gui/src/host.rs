use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use loupe_core::config::ScrollContainer;
use loupe_core::events::{EventHost, ListenerKind};
use loupe_core::lifecycle::ZoomReporter;
use tracing::info;

/// Event environment backed by egui input routing.
///
/// "Attaching" a listener here means flipping a flag the frame loop checks
/// before forwarding the corresponding input to the machine, which gives the
/// engine's listener windows real effect in the demo.
pub struct EguiEventHost {
    scroll_container: ScrollContainer,
    click: AtomicBool,
    escape: AtomicBool,
    scroll: AtomicBool,
    resize: AtomicBool,
}

impl EguiEventHost {
    pub fn new(scroll_container: ScrollContainer) -> Self {
        Self {
            scroll_container,
            click: AtomicBool::new(false),
            escape: AtomicBool::new(false),
            scroll: AtomicBool::new(false),
            resize: AtomicBool::new(false),
        }
    }

    pub fn scroll_container(&self) -> &ScrollContainer {
        &self.scroll_container
    }

    pub fn is_attached(&self, kind: ListenerKind) -> bool {
        self.flag(kind).load(Ordering::Relaxed)
    }

    fn flag(&self, kind: ListenerKind) -> &AtomicBool {
        match kind {
            ListenerKind::TargetClick => &self.click,
            ListenerKind::EscapeKey => &self.escape,
            ListenerKind::Scroll => &self.scroll,
            ListenerKind::Resize => &self.resize,
        }
    }
}

impl EventHost for EguiEventHost {
    fn attach(&self, kind: ListenerKind) {
        self.flag(kind).store(true, Ordering::Relaxed);
    }

    fn detach(&self, kind: ListenerKind) {
        self.flag(kind).store(false, Ordering::Relaxed);
    }
}

/// Mirrors autonomous zoom changes into the shared boolean the demo owns.
pub struct SharedToggleReporter {
    zoomed: Arc<AtomicBool>,
}

impl SharedToggleReporter {
    pub fn new(zoomed: Arc<AtomicBool>) -> Self {
        Self { zoomed }
    }
}

impl ZoomReporter for SharedToggleReporter {
    fn zoom_changed(&self, zoomed: bool) {
        self.zoomed.store(zoomed, Ordering::Relaxed);
        info!(zoomed, "zoom state changed autonomously");
    }
}
