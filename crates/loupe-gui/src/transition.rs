use std::time::{Duration, Instant};

use loupe_core::geometry::GeometryBox;
use loupe_core::lifecycle::TransitionPhase;

pub const TRANSITION_DURATION: Duration = Duration::from_millis(300);

/// An in-flight enlarge or shrink animation between two geometry boxes.
pub struct Transition {
    pub phase: TransitionPhase,
    pub token: u64,
    from: GeometryBox,
    to: GeometryBox,
    started: Instant,
}

impl Transition {
    pub fn new(phase: TransitionPhase, token: u64, from: GeometryBox, to: GeometryBox) -> Self {
        Self {
            phase,
            token,
            from,
            to,
            started: Instant::now(),
        }
    }

    pub fn finished(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= TRANSITION_DURATION
    }

    pub fn box_at(&self, now: Instant) -> GeometryBox {
        let elapsed = now.duration_since(self.started).as_secs_f32();
        let t = (elapsed / TRANSITION_DURATION.as_secs_f32()).clamp(0.0, 1.0);
        lerp_box(self.from, self.to, ease(t))
    }
}

// Smoothstep; matches the ease-in-out feel of a CSS transition.
fn ease(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn lerp_box(a: GeometryBox, b: GeometryBox, t: f32) -> GeometryBox {
    GeometryBox::new(
        lerp(a.left, b.left, t),
        lerp(a.top, b.top, t),
        lerp(a.width, b.width, t),
        lerp(a.height, b.height, t),
    )
}
