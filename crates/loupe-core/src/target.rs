use tracing::trace;

use crate::geometry::{GeometryBox, Size};

/// How the resolved element represents an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    /// A native raster image element.
    Image,
    /// An inline vector graphic; intrinsic pixel size is ambiguous.
    InlineSvg,
    /// A block container standing in for an image (e.g. background image).
    Container,
    /// Any element explicitly flagged as playing the image role.
    GenericImageRole,
}

/// The element a zoom session enlarges.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomTarget {
    pub kind: TargetKind,
    /// Primary source URL, when the element has one.
    pub source: Option<String>,
    /// Responsive source-set descriptor string.
    pub source_set: Option<String>,
    /// Responsive sizes descriptor string.
    pub sizes: Option<String>,
    pub alt: Option<String>,
    /// Intrinsic pixel dimensions; zero when unknown.
    pub natural: Size,
    /// Currently rendered dimensions.
    pub display: Size,
    /// Current on-screen box.
    pub bounds: GeometryBox,
}

/// Element flavor of a region node, before classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Img,
    Svg,
    Div,
    Other,
}

/// One element in a content region snapshot, in document order.
#[derive(Clone, Debug)]
pub struct RegionNode {
    pub element: ElementKind,
    /// Explicitly flagged as representing an image.
    pub image_role: bool,
    pub source: Option<String>,
    pub source_set: Option<String>,
    pub sizes: Option<String>,
    pub alt: Option<String>,
    pub natural: Size,
    pub display: Size,
    pub bounds: GeometryBox,
}

impl RegionNode {
    /// A bare node of the given flavor; attributes filled in by the caller.
    pub fn new(element: ElementKind) -> Self {
        Self {
            element,
            image_role: false,
            source: None,
            source_set: None,
            sizes: None,
            alt: None,
            natural: Size::default(),
            display: Size::default(),
            bounds: GeometryBox::default(),
        }
    }

    fn classify(&self) -> Option<TargetKind> {
        match self.element {
            ElementKind::Img => Some(TargetKind::Image),
            ElementKind::Svg => Some(TargetKind::InlineSvg),
            // A div only counts as an image substitute when it carries a source.
            ElementKind::Div if self.source.is_some() => Some(TargetKind::Container),
            _ if self.image_role => Some(TargetKind::GenericImageRole),
            _ => None,
        }
    }

    fn to_target(&self, kind: TargetKind) -> ZoomTarget {
        ZoomTarget {
            kind,
            source: self.source.clone(),
            source_set: self.source_set.clone(),
            sizes: self.sizes.clone(),
            alt: self.alt.clone(),
            natural: self.natural,
            display: self.display,
            bounds: self.bounds,
        }
    }
}

/// Snapshot of the content region the zoomable element lives in.
///
/// Every structural or attribute mutation bumps the revision, which is what
/// lets [`TargetResolver::poll`] re-resolve without watching the tree itself.
#[derive(Debug, Default)]
pub struct ContentRegion {
    nodes: Vec<RegionNode>,
    revision: u64,
}

impl ContentRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RegionNode> {
        self.nodes.get(index)
    }

    pub fn push(&mut self, node: RegionNode) {
        self.nodes.push(node);
        self.revision += 1;
    }

    pub fn remove(&mut self, index: usize) -> Option<RegionNode> {
        if index >= self.nodes.len() {
            return None;
        }
        self.revision += 1;
        Some(self.nodes.remove(index))
    }

    pub fn clear(&mut self) {
        if !self.nodes.is_empty() {
            self.nodes.clear();
            self.revision += 1;
        }
    }

    /// Mutate a node in place; counts as an attribute mutation.
    pub fn update<F>(&mut self, index: usize, f: F) -> bool
    where
        F: FnOnce(&mut RegionNode),
    {
        match self.nodes.get_mut(index) {
            Some(node) => {
                f(node);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// First descendant matching the zoomable role, or `None`.
    pub fn resolve_target(&self) -> Option<ZoomTarget> {
        self.nodes
            .iter()
            .find_map(|node| node.classify().map(|kind| node.to_target(kind)))
    }
}

/// Outcome of a resolver poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetPoll {
    Unchanged,
    Changed,
}

/// Re-resolves the zoomable target whenever the region revision moves.
///
/// Exactly one target is current per resolver, or none; nothing is cached
/// across structural changes.
#[derive(Debug, Default)]
pub struct TargetResolver {
    seen_revision: Option<u64>,
    current: Option<ZoomTarget>,
}

impl TargetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ZoomTarget> {
        self.current.as_ref()
    }

    /// Refresh against the region, resolving only when its revision changed.
    pub fn poll(&mut self, region: &ContentRegion) -> TargetPoll {
        if self.seen_revision == Some(region.revision()) {
            return TargetPoll::Unchanged;
        }
        self.seen_revision = Some(region.revision());

        let next = region.resolve_target();
        if next == self.current {
            return TargetPoll::Unchanged;
        }
        trace!(
            present = next.is_some(),
            revision = region.revision(),
            "zoom target changed"
        );
        self.current = next;
        TargetPoll::Changed
    }
}
