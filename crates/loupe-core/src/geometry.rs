use crate::target::{TargetKind, ZoomTarget};

/// Width/height pair in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either axis is missing or collapsed.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Visible viewport dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// On-screen rectangle for the enlarged image at a given lifecycle phase.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeometryBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl GeometryBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Which rest position the box is computed for.
///
/// `Collapsed` matches the inline target's current position and is the
/// start/end point of the transition; `Expanded` is the centered fit box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxMode {
    Collapsed,
    Expanded,
}

/// Compute the rectangle the enlarged image occupies.
///
/// `native_cap` is the natural resolution of the active asset (the
/// replacement once decoded, otherwise the target's own full-resolution
/// decode); the expanded box is never scaled past it. Inline SVG targets
/// have no meaningful pixel resolution, so the cap is ignored and the
/// aspect ratio comes from the rendered box instead.
pub fn compute_box(
    target: &ZoomTarget,
    mode: BoxMode,
    margin: f32,
    viewport: Viewport,
    native_cap: Option<Size>,
) -> GeometryBox {
    match mode {
        BoxMode::Collapsed => target.bounds,
        BoxMode::Expanded => expanded_box(target, margin, viewport, native_cap),
    }
}

fn expanded_box(
    target: &ZoomTarget,
    margin: f32,
    viewport: Viewport,
    native_cap: Option<Size>,
) -> GeometryBox {
    let margin = if margin.is_finite() { margin.max(0.0) } else { 0.0 };
    let aspect = aspect_source(target);

    if aspect.is_empty() {
        // Zero-size targets collapse to a zero box at the viewport center.
        return GeometryBox::new(viewport.width / 2.0, viewport.height / 2.0, 0.0, 0.0);
    }

    let avail_w = (viewport.width - 2.0 * margin).max(0.0);
    let avail_h = (viewport.height - 2.0 * margin).max(0.0);

    let mut scale = (avail_w / aspect.width).min(avail_h / aspect.height);

    // Never upscale past the active asset's native resolution.
    if !matches!(target.kind, TargetKind::InlineSvg) {
        if let Some(cap) = native_cap.filter(|c| !c.is_empty()) {
            scale = scale
                .min(cap.width / aspect.width)
                .min(cap.height / aspect.height);
        }
    }
    let scale = scale.max(0.0);

    let width = aspect.width * scale;
    let height = aspect.height * scale;

    GeometryBox::new(
        (viewport.width - width) / 2.0,
        (viewport.height - height) / 2.0,
        width,
        height,
    )
}

/// The size whose ratio the expanded box preserves.
///
/// Raster targets prefer their intrinsic dimensions; SVG targets use the
/// rendered box because their intrinsic size is ambiguous.
fn aspect_source(target: &ZoomTarget) -> Size {
    match target.kind {
        TargetKind::InlineSvg => target.display,
        _ => {
            if !target.natural.is_empty() {
                target.natural
            } else {
                target.display
            }
        }
    }
}
