/**
 * Great-circle Distance
 *
 * Haversine distance between two coordinates, used by the nearby search.
 * The formula and the Earth radius constant are fixed; the inclusion
 * boundary everywhere in the crate is `distance <= radius`.
 */

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, [-90, 90]
    pub latitude: f64,
    /// Longitude in degrees, [-180, 180]
    pub longitude: f64,
}

impl GeoPoint {
    /// Check that both coordinates are in range
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Haversine distance between two points in kilometers
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const NYC_DOWNTOWN: GeoPoint = GeoPoint {
        latitude: 40.7128,
        longitude: -74.0060,
    };
    const NYC_VILLAGE: GeoPoint = GeoPoint {
        latitude: 40.73,
        longitude: -74.02,
    };

    #[test]
    fn test_known_distance() {
        // Two points in Manhattan, roughly 1.9 km apart
        let d = haversine_km(NYC_DOWNTOWN, NYC_VILLAGE);
        assert!((d - 1.9).abs() < 0.15, "distance was {d}");
    }

    #[test]
    fn test_radius_boundary() {
        let d = haversine_km(NYC_DOWNTOWN, NYC_VILLAGE);
        assert!(d <= 10.0);
        assert!(d > 1.0);
    }

    #[test]
    fn test_symmetry() {
        let ab = haversine_km(NYC_DOWNTOWN, NYC_VILLAGE);
        let ba = haversine_km(NYC_VILLAGE, NYC_DOWNTOWN);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_zero_distance() {
        assert_eq!(haversine_km(NYC_DOWNTOWN, NYC_DOWNTOWN), 0.0);
    }

    #[test]
    fn test_point_validation() {
        assert!(NYC_DOWNTOWN.is_valid());
        assert!(!GeoPoint {
            latitude: 91.0,
            longitude: 0.0
        }
        .is_valid());
        assert!(!GeoPoint {
            latitude: 0.0,
            longitude: -180.5
        }
        .is_valid());
    }
}
