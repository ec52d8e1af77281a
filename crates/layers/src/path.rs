use foundation::math::{NaturalEarth, Vec2};
use formats::{BoundaryGeometry, GeoPoint};

use crate::svg::PathData;

/// Projected SVG outline of a country: one closed subpath per ring.
pub fn geometry_path(geometry: &BoundaryGeometry, projection: &NaturalEarth) -> String {
    let mut d = PathData::new();
    for rings in geometry.polygons() {
        for ring in rings {
            let mut pts: Vec<Vec2> = ring
                .iter()
                .filter(|p| p.lon_deg.is_finite() && p.lat_deg.is_finite())
                .map(|p: &GeoPoint| projection.project(p.lon_deg, p.lat_deg))
                .collect();
            drop_closing_duplicate(&mut pts);
            if pts.len() < 3 {
                continue;
            }
            d.polyline(pts, true);
        }
    }
    d.finish()
}

fn drop_closing_duplicate(points: &mut Vec<Vec2>) {
    if points.len() >= 2 && points.first() == points.last() {
        points.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::geometry_path;
    use foundation::math::{NaturalEarth, Vec2};
    use formats::{BoundaryGeometry, GeoPoint};

    fn square(lon: f64, lat: f64, size: f64) -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(lon, lat),
            GeoPoint::new(lon + size, lat),
            GeoPoint::new(lon + size, lat + size),
            GeoPoint::new(lon, lat + size),
            GeoPoint::new(lon, lat),
        ]
    }

    #[test]
    fn one_subpath_per_ring() {
        let projection = NaturalEarth::new(100.0, Vec2::new(0.0, 0.0));
        let geometry = BoundaryGeometry::MultiPolygon(vec![
            vec![square(0.0, 0.0, 10.0)],
            vec![square(20.0, 0.0, 5.0)],
        ]);
        let d = geometry_path(&geometry, &projection);
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('Z').count(), 2);
        // Closing vertex is implied by Z.
        assert_eq!(d.matches('L').count(), 6);
        assert!(d.starts_with("M0.00,0.00L"));
    }

    #[test]
    fn degenerate_rings_are_skipped() {
        let projection = NaturalEarth::new(100.0, Vec2::new(0.0, 0.0));
        let geometry = BoundaryGeometry::Polygon(vec![vec![GeoPoint::new(1.0, 1.0), GeoPoint::new(2.0, 2.0)]]);
        assert_eq!(geometry_path(&geometry, &projection), "");
    }
}
