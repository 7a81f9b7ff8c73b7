use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::assets::{AssetLoader, AssetSlot, DecodeRequest, DecodedImage};
use crate::config::ZoomConfig;
use crate::error::LoupeError;
use crate::events::{EventCoordinator, EventHost, ListenerKind};
use crate::geometry::{compute_box, BoxMode, GeometryBox, Size, Viewport};
use crate::target::{ContentRegion, TargetPoll, TargetResolver, ZoomTarget};

/// Where a zoom session is in its life.
///
/// `Unloaded` and `Loaded` are stable; `Loading` and `Unloading` advance
/// only when the presentation layer reports the corresponding transition
/// finished, and even then one tick later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Unloaded,
    Loading,
    Loaded,
    Unloading,
}

/// Which animated transition a completion event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    Enlarge,
    Shrink,
}

/// Inputs fed to the machine by the external owner and the presentation
/// layer.
#[derive(Debug)]
pub enum ZoomEvent {
    /// The external zoom request changed.
    SetZoomed(bool),
    /// The resolved target was clicked.
    TargetClicked,
    /// Explicit close control: button or overlay background.
    CloseRequested,
    /// Escape pressed while the modal surface is open.
    EscapePressed,
    /// Scroll on the tracked container.
    Scrolled,
    /// The viewport changed size.
    Resized(Viewport),
    /// The target's source element reported a fresh load.
    TargetSourceLoaded,
    /// An animated transition finished. The token must match the one the
    /// machine armed; anything else is stale and dropped.
    TransitionEnded { phase: TransitionPhase, token: u64 },
    /// A probe decode resolved.
    DecodeFinished {
        slot: AssetSlot,
        outcome: Result<DecodedImage, LoupeError>,
    },
}

/// Work the presentation layer performs on the machine's behalf.
#[derive(Clone, Debug, PartialEq)]
pub enum ZoomCommand {
    OpenOverlay,
    CloseOverlay,
    StartDecode(DecodeRequest),
    /// Run the animated transition for `phase` and report back with
    /// [`ZoomEvent::TransitionEnded`] carrying the same token.
    AwaitTransition { phase: TransitionPhase, token: u64 },
}

/// Callback surface toward the external owner of the zoom boolean.
///
/// Invoked only when the machine changes state on its own (click open,
/// Escape/scroll/button close); the owner's own toggles are not echoed.
/// All methods default to no-ops.
pub trait ZoomReporter: Send + Sync {
    fn zoom_changed(&self, zoomed: bool) {
        let _ = zoomed;
    }
}

/// Reporter used when the embedder does not care.
pub struct NoOpReporter;
impl ZoomReporter for NoOpReporter {}

/// Styling hooks derived from the current state.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomSurface {
    pub state: LifecycleState,
    /// Inline content shows only while fully unloaded.
    pub content_visible: bool,
    /// The overlay shows while loading and loaded.
    pub overlay_visible: bool,
    /// Rest box of the enlarged image for the current phase.
    pub image_box: Option<GeometryBox>,
    /// Accessible label for the toggle control.
    pub label: String,
    /// Bumped whenever a resize forces geometry recomputation.
    pub refresh_serial: u64,
}

/// Why a close began; decides whether the owner gets a callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CloseReason {
    ExternalToggle,
    Explicit,
    Escape,
    Scroll,
}

impl CloseReason {
    fn autonomous(self) -> bool {
        !matches!(self, Self::ExternalToggle)
    }
}

/// The zoom lifecycle orchestrator. Sole writer of [`LifecycleState`].
pub struct ZoomMachine {
    state: LifecycleState,
    config: ZoomConfig,
    assets: AssetLoader,
    listeners: EventCoordinator,
    reporter: Arc<dyn ZoomReporter>,
    resolver: TargetResolver,
    /// Target captured when the session opened; geometry runs against this
    /// snapshot until the session fully closes.
    session_target: Option<ZoomTarget>,
    viewport: Viewport,
    /// Monotonic token; arming a transition bumps it, which is what cancels
    /// a pending completion on reversal.
    transition_token: u64,
    awaiting: Option<(TransitionPhase, u64)>,
    /// Completion staged for the next tick, so a transition-end never
    /// commits state within its own event turn.
    deferred: Option<TransitionPhase>,
    refresh_serial: u64,
    commands: VecDeque<ZoomCommand>,
}

impl ZoomMachine {
    pub fn new(
        config: ZoomConfig,
        host: Arc<dyn EventHost>,
        reporter: Arc<dyn ZoomReporter>,
    ) -> Self {
        Self {
            state: LifecycleState::Unloaded,
            config: config.sanitized(),
            assets: AssetLoader::new(),
            listeners: EventCoordinator::new(host),
            reporter,
            resolver: TargetResolver::new(),
            session_target: None,
            viewport: Viewport::default(),
            transition_token: 0,
            awaiting: None,
            deferred: None,
            refresh_serial: 0,
            commands: VecDeque::new(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// True while the machine holds open intent.
    pub fn is_open(&self) -> bool {
        matches!(self.state, LifecycleState::Loading | LifecycleState::Loaded)
    }

    pub fn refresh_serial(&self) -> u64 {
        self.refresh_serial
    }

    pub fn listeners(&self) -> &EventCoordinator {
        &self.listeners
    }

    pub fn assets(&self) -> &AssetLoader {
        &self.assets
    }

    /// Replace the configuration. Ignored unless fully unloaded; options
    /// must not change under a live session.
    pub fn set_config(&mut self, config: ZoomConfig) {
        if self.state == LifecycleState::Unloaded {
            self.config = config.sanitized();
        } else {
            debug!(state = ?self.state, "config change ignored while session active");
        }
    }

    /// Record the viewport without treating it as a resize event.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Refresh the resolved target from the region. Keeps the click
    /// listener and the natural asset in step with what is resolved.
    pub fn observe_region(&mut self, region: &ContentRegion) -> TargetPoll {
        let poll = self.resolver.poll(region);
        if poll == TargetPoll::Unchanged {
            return poll;
        }

        match self.resolver.current() {
            Some(target) => {
                if let Err(err) = self.listeners.attach(ListenerKind::TargetClick) {
                    debug!(%err, "click listener skipped");
                }
                if let Some(source) = target.source.clone() {
                    let request = self.assets.request_natural(
                        &source,
                        target.source_set.as_deref(),
                        target.sizes.as_deref(),
                    );
                    if let Some(request) = request {
                        self.commands.push_back(ZoomCommand::StartDecode(request));
                    }
                }
            }
            None => self.listeners.detach(ListenerKind::TargetClick),
        }
        poll
    }

    pub fn handle(&mut self, event: ZoomEvent) {
        match event {
            ZoomEvent::SetZoomed(true) => self.request_open(false),
            ZoomEvent::SetZoomed(false) => self.request_close(CloseReason::ExternalToggle),
            ZoomEvent::TargetClicked => {
                if self.state == LifecycleState::Unloaded {
                    self.request_open(true);
                }
            }
            ZoomEvent::CloseRequested => {
                if self.is_open() {
                    self.request_close(CloseReason::Explicit);
                }
            }
            ZoomEvent::EscapePressed => {
                // Identical to the explicit close control.
                if self.is_open() {
                    self.request_close(CloseReason::Escape);
                }
            }
            ZoomEvent::Scrolled => {
                // Scroll always closes; it never re-centers.
                if self.state == LifecycleState::Loaded {
                    self.request_close(CloseReason::Scroll);
                }
            }
            ZoomEvent::Resized(viewport) => {
                self.viewport = viewport;
                if self.state == LifecycleState::Loaded {
                    self.refresh_serial += 1;
                    trace!(serial = self.refresh_serial, "resize forced geometry refresh");
                }
            }
            ZoomEvent::TargetSourceLoaded => {
                if let Some(target) = self.resolver.current() {
                    if let Some(source) = target.source.clone() {
                        let source_set = target.source_set.clone();
                        let sizes = target.sizes.clone();
                        let request = self.assets.reload_natural(
                            &source,
                            source_set.as_deref(),
                            sizes.as_deref(),
                        );
                        self.commands.push_back(ZoomCommand::StartDecode(request));
                    }
                }
            }
            ZoomEvent::TransitionEnded { phase, token } => {
                if self.awaiting == Some((phase, token)) {
                    self.awaiting = None;
                    self.deferred = Some(phase);
                } else {
                    trace!(?phase, token, "stale transition completion dropped");
                }
            }
            ZoomEvent::DecodeFinished { slot, outcome } => {
                self.assets.apply(slot, outcome);
            }
        }
    }

    /// Commit any transition completion staged last turn. Call once per
    /// presentation tick, before reading the surface.
    pub fn tick(&mut self) {
        let Some(phase) = self.deferred.take() else {
            return;
        };
        match (self.state, phase) {
            (LifecycleState::Loading, TransitionPhase::Enlarge) => {
                self.state = LifecycleState::Loaded;
                debug!("zoom loaded");
                if let Err(err) = self.listeners.attach(ListenerKind::Scroll) {
                    debug!(%err, "scroll listener skipped");
                }
                if let Err(err) = self.listeners.attach(ListenerKind::Resize) {
                    debug!(%err, "resize listener skipped");
                }
            }
            (LifecycleState::Unloading, TransitionPhase::Shrink) => {
                self.state = LifecycleState::Unloaded;
                debug!("zoom unloaded");
                self.listeners.detach(ListenerKind::Scroll);
                self.listeners.detach(ListenerKind::Resize);
                self.listeners.detach(ListenerKind::EscapeKey);
                self.refresh_serial = 0;
                self.assets.reset_replacement();
                self.session_target = None;
                self.commands.push_back(ZoomCommand::CloseOverlay);
            }
            (state, phase) => {
                trace!(?state, ?phase, "transition completion no longer applicable");
            }
        }
    }

    /// Drain the queued presentation work.
    pub fn take_commands(&mut self) -> Vec<ZoomCommand> {
        self.commands.drain(..).collect()
    }

    /// Detach everything and forget the session, whatever the state.
    pub fn teardown(&mut self) {
        self.cancel_pending_transition();
        self.listeners.teardown();
        self.session_target = None;
        self.state = LifecycleState::Unloaded;
    }

    pub fn surface(&self) -> ZoomSurface {
        let image_box = match self.state {
            LifecycleState::Unloaded => None,
            LifecycleState::Loading | LifecycleState::Loaded => self.expanded_box(),
            LifecycleState::Unloading => self.collapsed_box(),
        };
        let label = if self.state == LifecycleState::Unloaded {
            self.config.label_zoom_in.clone()
        } else {
            self.config.label_zoom_out.clone()
        };
        ZoomSurface {
            state: self.state,
            content_visible: self.state == LifecycleState::Unloaded,
            overlay_visible: self.is_open(),
            image_box,
            label,
            refresh_serial: self.refresh_serial,
        }
    }

    /// Box matching the inline target's current position.
    pub fn collapsed_box(&self) -> Option<GeometryBox> {
        self.active_target().map(|target| {
            compute_box(
                target,
                BoxMode::Collapsed,
                self.config.margin,
                self.viewport,
                None,
            )
        })
    }

    /// Centered fit box for the enlarged image.
    pub fn expanded_box(&self) -> Option<GeometryBox> {
        self.active_target().map(|target| {
            compute_box(
                target,
                BoxMode::Expanded,
                self.config.margin,
                self.viewport,
                self.native_cap(target),
            )
        })
    }

    fn active_target(&self) -> Option<&ZoomTarget> {
        self.session_target.as_ref().or_else(|| self.resolver.current())
    }

    /// Natural resolution of whichever asset the enlarged view shows.
    fn native_cap(&self, target: &ZoomTarget) -> Option<Size> {
        self.assets
            .replacement_natural()
            .or_else(|| self.assets.natural_size())
            .or_else(|| Some(target.natural).filter(|n| !n.is_empty()))
    }

    fn request_open(&mut self, autonomous: bool) {
        match self.state {
            LifecycleState::Unloaded => {
                // A missing target turns every zoom request into a no-op.
                let Some(target) = self.resolver.current().cloned() else {
                    trace!("open request ignored: no zoomable target");
                    return;
                };
                self.session_target = Some(target);
                self.state = LifecycleState::Loading;
                debug!("zoom loading");
                self.commands.push_back(ZoomCommand::OpenOverlay);
                if let Err(err) = self.listeners.attach(ListenerKind::EscapeKey) {
                    debug!(%err, "escape listener skipped");
                }
                if let Some(descriptor) = self.config.replacement.clone() {
                    let request = self.assets.request_replacement(&descriptor);
                    self.commands.push_back(ZoomCommand::StartDecode(request));
                }
                self.arm_transition(TransitionPhase::Enlarge);
                if autonomous {
                    self.reporter.zoom_changed(true);
                }
            }
            LifecycleState::Unloading => {
                // Re-open mid-shrink: cancel the pending completion and run
                // the enlarge again. The overlay never closed, and the
                // replacement probe from the original open is still valid.
                self.cancel_pending_transition();
                self.state = LifecycleState::Loading;
                debug!("zoom re-opened during unload");
                self.arm_transition(TransitionPhase::Enlarge);
                if autonomous {
                    self.reporter.zoom_changed(true);
                }
            }
            LifecycleState::Loading | LifecycleState::Loaded => {}
        }
    }

    fn request_close(&mut self, reason: CloseReason) {
        match self.state {
            LifecycleState::Loaded => self.begin_unload(reason),
            LifecycleState::Loading => {
                // Reversal: drop the pending enlarge completion outright so
                // the session cannot flicker through Loaded on its way out.
                self.cancel_pending_transition();
                self.begin_unload(reason);
            }
            LifecycleState::Unloaded | LifecycleState::Unloading => {}
        }
    }

    fn begin_unload(&mut self, reason: CloseReason) {
        self.state = LifecycleState::Unloading;
        debug!(?reason, "zoom unloading");
        // The owner learns about the intent now, not when the shrink
        // animation lands.
        if reason.autonomous() {
            self.reporter.zoom_changed(false);
        }
        self.arm_transition(TransitionPhase::Shrink);
    }

    fn arm_transition(&mut self, phase: TransitionPhase) {
        self.transition_token += 1;
        let token = self.transition_token;
        self.awaiting = Some((phase, token));
        self.commands
            .push_back(ZoomCommand::AwaitTransition { phase, token });
    }

    fn cancel_pending_transition(&mut self) {
        self.transition_token += 1;
        self.awaiting = None;
        self.deferred = None;
    }
}
