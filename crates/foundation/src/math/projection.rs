//! Natural Earth 1 pseudo-cylindrical projection.
//!
//! Coordinates go in as longitude/latitude degrees and come out as screen
//! pixels (y grows downwards). The polynomial matches the one published by
//! Šavrič et al. and used by most web mapping toolkits.

use super::Vec2;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NaturalEarth {
    /// Pixels per unit of the raw projection.
    pub scale: f64,
    pub translate: Vec2,
}

impl Default for NaturalEarth {
    fn default() -> Self {
        Self {
            scale: 175.295,
            translate: Vec2::new(480.0, 250.0),
        }
    }
}

impl NaturalEarth {
    pub fn new(scale: f64, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    /// Unit projection with y pointing north.
    pub fn raw(lon_deg: f64, lat_deg: f64) -> Vec2 {
        let lambda = lon_deg.to_radians();
        let phi = lat_deg.to_radians();
        let phi2 = phi * phi;
        let phi4 = phi2 * phi2;
        let x = lambda
            * (0.870_700 - 0.131_979 * phi2
                + phi4 * (-0.013_791 + phi4 * (0.003_971 * phi2 - 0.001_529 * phi4)));
        let y = phi
            * (1.007_226
                + phi2 * (0.015_085 + phi4 * (-0.044_475 + 0.028_874 * phi2 - 0.005_916 * phi4)));
        Vec2::new(x, y)
    }

    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> Vec2 {
        let r = Self::raw(lon_deg, lat_deg);
        Vec2::new(
            self.translate.x + self.scale * r.x,
            self.translate.y - self.scale * r.y,
        )
    }

    /// Fits the projection so that every given lon/lat point lands inside a
    /// `width` x `height` box, centered on both axes.
    ///
    /// With no points the whole sphere outline is fitted instead.
    pub fn fit_size<I>(width: f64, height: f64, lon_lat: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut points: Vec<Vec2> = lon_lat
            .into_iter()
            .map(|(lon, lat)| Self::raw(lon, lat))
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();
        if points.is_empty() {
            points = [(-180.0, 0.0), (180.0, 0.0), (0.0, -90.0), (0.0, 90.0)]
                .into_iter()
                .map(|(lon, lat)| Self::raw(lon, lat))
                .collect();
        }

        let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &points {
            // Screen orientation: flip y before taking bounds.
            min.x = min.x.min(p.x);
            min.y = min.y.min(-p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(-p.y);
        }

        let bw = max.x - min.x;
        let bh = max.y - min.y;
        let kx = if bw > 0.0 { width / bw } else { f64::INFINITY };
        let ky = if bh > 0.0 { height / bh } else { f64::INFINITY };
        let mut k = kx.min(ky);
        if !k.is_finite() || k <= 0.0 {
            k = 1.0;
        }

        let tx = (width - k * (min.x + max.x)) * 0.5;
        let ty = (height - k * (min.y + max.y)) * 0.5;
        Self::new(k, Vec2::new(tx, ty))
    }
}
