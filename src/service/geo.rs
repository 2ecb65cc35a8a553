//! Great-circle distance on a spherical earth.

use crate::model::coordinate::Coordinate;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two points, in meters.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        for (lat, lon) in [(0.0, 0.0), (12.9716, 77.5946), (-89.5, 179.9), (51.5, -0.12)] {
            let p = Coordinate::new(lat, lon);
            assert_eq!(distance(p, p), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (Coordinate::new(12.9716, 77.5946), Coordinate::new(12.9800, 77.6000)),
            (Coordinate::new(-33.8688, 151.2093), Coordinate::new(51.5074, -0.1278)),
            (Coordinate::new(0.0, 179.5), Coordinate::new(0.0, -179.5)),
        ];
        for (a, b) in pairs {
            assert!((distance(a, b) - distance(b, a)).abs() < 1e-9);
        }
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn short_hops_are_sub_meter_accurate() {
        // 500 m due north, using the arc length of the same sphere
        let center = Coordinate::new(12.9716, 77.5946);
        let north = Coordinate::new(12.9716 + (500.0 / EARTH_RADIUS_METERS).to_degrees(), 77.5946);
        assert!((distance(center, north) - 500.0).abs() < 0.01);
    }
}
