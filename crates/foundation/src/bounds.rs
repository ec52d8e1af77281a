use crate::math::Vec2;

/// Axis-aligned bounding box in screen (or projected) space.
///
/// An empty box has `min > max` on both axes and absorbs the first point
/// passed to `extend`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    pub fn empty() -> Self {
        Aabb2 {
            min: [f64::INFINITY, f64::INFINITY],
            max: [f64::NEG_INFINITY, f64::NEG_INFINITY],
        }
    }

    /// Box spanning two arbitrary corners.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let mut out = Self::empty();
        out.extend(a);
        out.extend(b);
        out
    }

    pub fn is_empty(&self) -> bool {
        !(self.min[0] <= self.max[0] && self.min[1] <= self.max[1])
    }

    pub fn extend(&mut self, p: Vec2) {
        if !p.x.is_finite() || !p.y.is_finite() {
            return;
        }
        self.min[0] = self.min[0].min(p.x);
        self.min[1] = self.min[1].min(p.y);
        self.max[0] = self.max[0].max(p.x);
        self.max[1] = self.max[1].max(p.y);
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max[0] - self.min[0]
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max[1] - self.min[1]
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        )
    }
}

impl Default for Aabb2 {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::math::Vec2;

    #[test]
    fn empty_absorbs_first_point() {
        let mut b = Aabb2::empty();
        assert!(b.is_empty());
        b.extend(Vec2::new(3.0, -1.0));
        assert!(!b.is_empty());
        assert_eq!(b.min, [3.0, -1.0]);
        assert_eq!(b.max, [3.0, -1.0]);
        assert_eq!(b.width(), 0.0);
    }

    #[test]
    fn corners_are_normalized() {
        let b = Aabb2::from_corners(Vec2::new(10.0, 2.0), Vec2::new(4.0, 8.0));
        assert_eq!(b.min, [4.0, 2.0]);
        assert_eq!(b.max, [10.0, 8.0]);
        assert_eq!(b.center(), Vec2::new(7.0, 5.0));
    }

    #[test]
    fn non_finite_points_are_ignored() {
        let mut b = Aabb2::empty();
        b.extend(Vec2::new(f64::NAN, 1.0));
        assert!(b.is_empty());
    }
}
