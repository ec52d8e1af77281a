use foundation::math::Vec2;

use crate::zoom::ZoomTransform;

/// Symmetric cubic easing on `[0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Animated change of the zoom transform.
///
/// Interpolates the visible window rather than the raw transform: the world
/// point under the viewport center moves linearly and the window width
/// changes geometrically, so zooming feels uniform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomTransition {
    pub from: ZoomTransform,
    pub to: ZoomTransform,
    pub start_ms: f64,
    pub duration_ms: f64,
    /// Viewport center in screen space.
    pub center: Vec2,
}

impl ZoomTransition {
    pub fn new(
        from: ZoomTransform,
        to: ZoomTransform,
        start_ms: f64,
        duration_ms: u32,
        center: Vec2,
    ) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: f64::from(duration_ms),
            center,
        }
    }

    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    pub fn sample(&self, now_ms: f64) -> ZoomTransform {
        let p = self.progress(now_ms);
        if p >= 1.0 {
            return self.to;
        }
        if p <= 0.0 {
            return self.from;
        }
        let t = ease_cubic_in_out(p);

        let c0 = self.from.invert(self.center);
        let c1 = self.to.invert(self.center);
        let c = c0.lerp(c1, t);
        let k = self.from.k * (self.to.k / self.from.k).powf(t);
        ZoomTransform::new(k, self.center.x - c.x * k, self.center.y - c.y * k)
    }
}
