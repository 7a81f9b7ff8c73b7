use std::sync::{Arc, Mutex};

use loupe_core::config::ZoomConfig;
use loupe_core::events::{EventHost, ListenerKind};
use loupe_core::geometry::{GeometryBox, Size, Viewport};
use loupe_core::lifecycle::{TransitionPhase, ZoomCommand, ZoomEvent, ZoomMachine, ZoomReporter};
use loupe_core::target::{ContentRegion, ElementKind, RegionNode};

/// Records every attach/detach call so tests can audit listener symmetry.
#[derive(Default)]
pub struct RecordingHost {
    log: Mutex<Vec<(ListenerKind, bool)>>,
    unsupported: Vec<ListenerKind>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host lacking the given capabilities.
    pub fn without(kinds: &[ListenerKind]) -> Self {
        Self {
            log: Mutex::new(Vec::new()),
            unsupported: kinds.to_vec(),
        }
    }

    pub fn attaches(&self, kind: ListenerKind) -> usize {
        self.count(kind, true)
    }

    pub fn detaches(&self, kind: ListenerKind) -> usize {
        self.count(kind, false)
    }

    fn count(&self, kind: ListenerKind, attached: bool) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, a)| *k == kind && *a == attached)
            .count()
    }
}

impl EventHost for RecordingHost {
    fn supports(&self, kind: ListenerKind) -> bool {
        !self.unsupported.contains(&kind)
    }

    fn attach(&self, kind: ListenerKind) {
        self.log.lock().unwrap().push((kind, true));
    }

    fn detach(&self, kind: ListenerKind) {
        self.log.lock().unwrap().push((kind, false));
    }
}

/// Records the booleans the machine reports autonomously.
#[derive(Default)]
pub struct RecordingReporter {
    log: Mutex<Vec<bool>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<bool> {
        self.log.lock().unwrap().clone()
    }
}

impl ZoomReporter for RecordingReporter {
    fn zoom_changed(&self, zoomed: bool) {
        self.log.lock().unwrap().push(zoomed);
    }
}

/// A machine wired to recording collaborators.
pub struct TestRig {
    pub machine: ZoomMachine,
    pub host: Arc<RecordingHost>,
    pub reporter: Arc<RecordingReporter>,
}

pub fn rig(config: ZoomConfig) -> TestRig {
    rig_with_host(config, Arc::new(RecordingHost::new()))
}

pub fn rig_with_host(config: ZoomConfig, host: Arc<RecordingHost>) -> TestRig {
    let reporter = Arc::new(RecordingReporter::new());
    let machine = ZoomMachine::new(config, host.clone(), reporter.clone());
    TestRig {
        machine,
        host,
        reporter,
    }
}

/// Build an image node with the given geometry.
pub fn image_node(source: &str, natural: Size, display: Size, bounds: GeometryBox) -> RegionNode {
    let mut node = RegionNode::new(ElementKind::Img);
    node.source = Some(source.to_string());
    node.natural = natural;
    node.display = display;
    node.bounds = bounds;
    node
}

/// Region holding one 400x300 inline image.
pub fn standard_region() -> ContentRegion {
    let mut region = ContentRegion::new();
    region.push(image_node(
        "thumb.jpg",
        Size::new(400.0, 300.0),
        Size::new(400.0, 300.0),
        GeometryBox::new(100.0, 500.0, 400.0, 300.0),
    ));
    region
}

/// A rig with the standard region observed and a 1000x800 viewport.
pub fn ready_rig(config: ZoomConfig) -> (TestRig, ContentRegion) {
    let mut rig = rig(config);
    let region = standard_region();
    rig.machine.set_viewport(Viewport::new(1000.0, 800.0));
    rig.machine.observe_region(&region);
    (rig, region)
}

/// The transition the machine most recently asked the presentation layer
/// to run.
pub fn pending_transition(commands: &[ZoomCommand]) -> Option<(TransitionPhase, u64)> {
    commands.iter().rev().find_map(|c| match c {
        ZoomCommand::AwaitTransition { phase, token } => Some((*phase, *token)),
        _ => None,
    })
}

/// Report the pending transition as finished and run the deferred commit.
pub fn finish_transition(machine: &mut ZoomMachine, commands: &[ZoomCommand]) {
    let (phase, token) = pending_transition(commands).expect("a transition should be armed");
    machine.handle(ZoomEvent::TransitionEnded { phase, token });
    machine.tick();
}

/// Open and settle to Loaded. Returns the commands from the open step.
pub fn open_to_loaded(machine: &mut ZoomMachine) -> Vec<ZoomCommand> {
    machine.handle(ZoomEvent::SetZoomed(true));
    let commands = machine.take_commands();
    finish_transition(machine, &commands);
    commands
}

/// Close and settle to Unloaded. Returns the commands from the close step.
pub fn close_to_unloaded(machine: &mut ZoomMachine) -> Vec<ZoomCommand> {
    machine.handle(ZoomEvent::SetZoomed(false));
    let commands = machine.take_commands();
    finish_transition(machine, &commands);
    commands
}
