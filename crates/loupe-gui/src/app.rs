use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};
use std::time::Instant;

use loupe_core::assets::{AssetSlot, DecodedImage};
use loupe_core::config::ScrollContainer;
use loupe_core::error::LoupeError;
use loupe_core::events::ListenerKind;
use loupe_core::geometry::{GeometryBox, Size, Viewport};
use loupe_core::lifecycle::{
    LifecycleState, TransitionPhase, ZoomCommand, ZoomEvent, ZoomMachine,
};
use loupe_core::target::{ContentRegion, ElementKind, RegionNode};
use tracing::warn;

use crate::host::{EguiEventHost, SharedToggleReporter};
use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::settings::SettingsState;
use crate::transition::Transition;
use crate::worker;

pub struct LoupeApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    /// File paths picked on a dialog thread, drained each frame.
    pub picked_tx: mpsc::Sender<PathBuf>,
    picked_rx: mpsc::Receiver<PathBuf>,

    pub machine: ZoomMachine,
    pub host: Arc<EguiEventHost>,
    /// The external zoom boolean this demo owns; the machine proposes
    /// changes to it through the reporter.
    pub zoomed: Arc<AtomicBool>,

    pub region: ContentRegion,
    pub image_path: Option<PathBuf>,
    pub thumb_texture: Option<egui::TextureHandle>,
    pub full_texture: Option<egui::TextureHandle>,

    pub overlay_open: bool,
    pub transition: Option<Transition>,

    pub settings: SettingsState,
    pub gallery_rect: egui::Rect,
    pub status: Option<String>,

    last_viewport: Viewport,
}

impl LoupeApp {
    pub fn new(ctx: &egui::Context) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = worker::spawn_worker(result_tx, ctx.clone());
        let (picked_tx, picked_rx) = mpsc::channel();

        let settings = SettingsState::default();
        let host = Arc::new(EguiEventHost::new(ScrollContainer::Viewport));
        let zoomed = Arc::new(AtomicBool::new(false));
        let reporter = Arc::new(SharedToggleReporter::new(zoomed.clone()));
        let machine = ZoomMachine::new(settings.to_zoom_config(None), host.clone(), reporter);

        Self {
            cmd_tx,
            result_rx,
            picked_tx,
            picked_rx,
            machine,
            host,
            zoomed,
            region: ContentRegion::new(),
            image_path: None,
            thumb_texture: None,
            full_texture: None,
            overlay_open: false,
            transition: None,
            settings,
            gallery_rect: egui::Rect::NOTHING,
            status: None,
            last_viewport: Viewport::default(),
        }
    }

    /// Swap the displayed image; the engine picks up the new source from
    /// the region and probes its natural size in the background.
    pub fn open_image(&mut self, path: PathBuf) {
        if self.machine.is_open() {
            self.machine.handle(ZoomEvent::SetZoomed(false));
        }
        self.thumb_texture = None;
        self.full_texture = None;

        let mut node = RegionNode::new(ElementKind::Img);
        node.source = Some(path.display().to_string());
        node.alt = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        self.region.clear();
        self.region.push(node);
        self.image_path = Some(path);
        self.status = None;
    }

    /// Drain all pending results from the decode worker.
    fn poll_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::DecodeComplete {
                    slot,
                    source,
                    size,
                    pixels,
                } => {
                    let natural = Size::new(size[0] as f32, size[1] as f32);
                    let color = egui::ColorImage::from_rgba_unmultiplied(size, &pixels);
                    let name = match slot {
                        AssetSlot::Natural => "inline-image",
                        AssetSlot::Replacement => "replacement-image",
                    };
                    let texture = ctx.load_texture(name, color, egui::TextureOptions::LINEAR);
                    match slot {
                        AssetSlot::Natural => {
                            self.thumb_texture = Some(texture);
                            self.region.update(0, |node| node.natural = natural);
                        }
                        AssetSlot::Replacement => self.full_texture = Some(texture),
                    }
                    self.machine.handle(ZoomEvent::DecodeFinished {
                        slot,
                        outcome: Ok(DecodedImage { source, natural }),
                    });
                }
                WorkerResult::DecodeFailed {
                    slot,
                    source,
                    message,
                } => {
                    warn!(?slot, source, message, "probe decode failed");
                    self.status = Some(format!("Decode failed: {message}"));
                    self.machine.handle(ZoomEvent::DecodeFinished {
                        slot,
                        outcome: Err(LoupeError::Decode {
                            url: source,
                            reason: message,
                        }),
                    });
                }
            }
        }
    }

    fn sync_viewport(&mut self, ctx: &egui::Context) {
        let rect = ctx.screen_rect();
        let viewport = Viewport::new(rect.width(), rect.height());
        if viewport != self.last_viewport {
            self.last_viewport = viewport;
            self.machine.set_viewport(viewport);
            if self.host.is_attached(ListenerKind::Resize) {
                self.machine.handle(ZoomEvent::Resized(viewport));
            }
        }
    }

    /// Forward raw input through the listener windows the engine opened.
    fn forward_input(&mut self, ctx: &egui::Context) {
        let (escape, scroll_delta, pointer) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.raw_scroll_delta,
                i.pointer.latest_pos(),
            )
        });

        if escape && self.host.is_attached(ListenerKind::EscapeKey) {
            self.machine.handle(ZoomEvent::EscapePressed);
        }

        if scroll_delta != egui::Vec2::ZERO && self.host.is_attached(ListenerKind::Scroll) {
            let in_scope = match self.host.scroll_container() {
                ScrollContainer::Viewport => true,
                ScrollContainer::Element(_) => pointer
                    .map(|p| self.gallery_rect.contains(p))
                    .unwrap_or(false),
            };
            if in_scope {
                self.machine.handle(ZoomEvent::Scrolled);
            }
        }
    }

    /// Push edited settings into the machine once it is idle.
    fn apply_config_if_idle(&mut self) {
        if self.machine.state() != LifecycleState::Unloaded {
            return;
        }
        let config = self.settings.to_zoom_config(self.image_path.as_deref());
        if self.machine.config() != &config {
            self.machine.set_config(config);
        }
    }

    fn dispatch_commands(&mut self) {
        for command in self.machine.take_commands() {
            match command {
                ZoomCommand::OpenOverlay => self.overlay_open = true,
                ZoomCommand::CloseOverlay => {
                    self.overlay_open = false;
                    self.transition = None;
                }
                ZoomCommand::StartDecode(request) => {
                    let _ = self.cmd_tx.send(WorkerCommand::Decode {
                        slot: request.slot,
                        source: request.source,
                    });
                }
                ZoomCommand::AwaitTransition { phase, token } => {
                    self.start_transition(phase, token);
                }
            }
        }
    }

    fn start_transition(&mut self, phase: TransitionPhase, token: u64) {
        let now = Instant::now();
        let current = self.transition.as_ref().map(|t| t.box_at(now));
        let (from, to) = match phase {
            TransitionPhase::Enlarge => (
                current.or_else(|| self.machine.collapsed_box()),
                self.machine.expanded_box(),
            ),
            TransitionPhase::Shrink => (
                current.or_else(|| self.machine.expanded_box()),
                self.machine.collapsed_box(),
            ),
        };
        match (from, to) {
            (Some(from), Some(to)) => {
                self.transition = Some(Transition::new(phase, token, from, to));
            }
            _ => {
                // No geometry to animate; complete immediately so the
                // machine never waits on a transition that cannot run.
                self.machine
                    .handle(ZoomEvent::TransitionEnded { phase, token });
            }
        }
    }

    fn drive_transition(&mut self, ctx: &egui::Context) {
        let Some(transition) = &self.transition else {
            return;
        };
        let now = Instant::now();
        if transition.finished(now) {
            let (phase, token) = (transition.phase, transition.token);
            self.transition = None;
            self.machine
                .handle(ZoomEvent::TransitionEnded { phase, token });
        }
        // Keep animating, and keep ticking until the deferred commit lands.
        ctx.request_repaint();
    }

    /// Current rectangle to paint the enlarged image in.
    pub fn overlay_box(&self) -> Option<GeometryBox> {
        if let Some(transition) = &self.transition {
            return Some(transition.box_at(Instant::now()));
        }
        self.machine.surface().image_box
    }
}

impl eframe::App for LoupeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(path) = self.picked_rx.try_recv() {
            self.open_image(path);
        }
        self.poll_results(ctx);
        self.sync_viewport(ctx);
        self.forward_input(ctx);

        panels::settings::show(ctx, self);
        panels::gallery::show(ctx, self);

        self.apply_config_if_idle();
        self.machine.tick();
        self.dispatch_commands();
        self.drive_transition(ctx);

        panels::overlay::show(ctx, self);
    }
}
