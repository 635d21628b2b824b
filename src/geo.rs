//! Great-circle geometry on a spherical Earth.
//!
//! Coordinates are WGS-84 degrees. Distances use the haversine formula with
//! the mean Earth radius, which is accurate to roughly 0.5% against the
//! ellipsoid and plenty for picking the closest salesperson.

use std::fmt;
use thiserror::Error;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
///
/// Construction does not range-check; use [`Coordinate::checked`] at the
/// request boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} out of range (-90..90)")]
    Latitude(f64),
    #[error("longitude {0} out of range (-180..180)")]
    Longitude(f64),
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a coordinate, rejecting out-of-range or non-finite values.
    pub fn checked(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Both halves must be known; a lone latitude or longitude is no location.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Some(Self { lat, lon }),
            _ => None,
        }
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_km(self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", self.lat.abs(), ns, self.lon.abs(), ew)
    }
}

/// Haversine distance between two coordinates, in kilometers.
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points. `f64::min`
    // would swallow NaN, so compare by hand.
    let s = h.sqrt();
    let s = if s > 1.0 { 1.0 } else { s };
    let c = 2.0 * s.asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    const DELHI: Coordinate = Coordinate::new(28.6139, 77.2090);
    const MUMBAI: Coordinate = Coordinate::new(19.0760, 72.8777);

    #[test]
    fn test_delhi_mumbai() {
        let d = haversine_km(&DELHI, &MUMBAI);
        println!("Delhi -> Mumbai: {:.2} km", d);
        assert!(d > 1150.0 && d < 1165.0, "got {d}");
        assert_abs_diff_eq!(MUMBAI.distance_km(&DELHI), d, epsilon = 1e-9);
    }

    #[test]
    fn test_one_degree_at_equator() {
        let origin = Coordinate::new(0.0, 0.0);
        let east = haversine_km(&origin, &Coordinate::new(0.0, 1.0));
        let north = haversine_km(&origin, &Coordinate::new(1.0, 0.0));
        assert_abs_diff_eq!(east, 111.19, epsilon = 0.01);
        assert_abs_diff_eq!(east, north, epsilon = 1e-9);
    }

    #[test]
    fn test_antipodes_do_not_nan() {
        let d = haversine_km(&Coordinate::new(0.0, 0.0), &Coordinate::new(0.0, 180.0));
        assert!(d.is_finite());
        assert_abs_diff_eq!(d, std::f64::consts::PI * EARTH_RADIUS_KM, epsilon = 1e-6);
    }

    #[test]
    fn test_out_of_range_still_computes() {
        let d = haversine_km(&Coordinate::new(120.0, 400.0), &DELHI);
        assert!(d.is_finite());
    }

    #[test]
    fn test_checked() {
        assert!(Coordinate::checked(90.0, -180.0).is_ok());
        assert_eq!(Coordinate::checked(90.5, 0.0), Err(CoordinateError::Latitude(90.5)));
        assert_eq!(Coordinate::checked(0.0, 181.0), Err(CoordinateError::Longitude(181.0)));
        assert!(Coordinate::checked(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(Coordinate::from_parts(Some(0.0), Some(0.0)), Some(Coordinate::new(0.0, 0.0)));
        assert_eq!(Coordinate::from_parts(Some(1.0), None), None);
        assert_eq!(Coordinate::from_parts(None, Some(1.0)), None);
        assert_eq!(Coordinate::from_parts(None, None), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Coordinate::new(-33.8688, 151.2093).to_string(), "33.8688\u{00B0}S, 151.2093\u{00B0}E");
    }

    fn coord() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
    }

    proptest! {
        #[test]
        fn prop_identity_is_zero(a in coord()) {
            prop_assert!(haversine_km(&a, &a).abs() < 1e-9);
        }

        #[test]
        fn prop_symmetric(a in coord(), b in coord()) {
            let ab = haversine_km(&a, &b);
            let ba = haversine_km(&b, &a);
            prop_assert!((ab - ba).abs() < 1e-3, "{} vs {}", ab, ba);
        }

        #[test]
        fn prop_triangle_inequality(a in coord(), b in coord(), c in coord()) {
            let direct = haversine_km(&a, &c);
            let via = haversine_km(&a, &b) + haversine_km(&b, &c);
            // Near-antipodal asin loses a few digits.
            prop_assert!(direct <= via + 1e-3, "{} > {}", direct, via);
        }

        #[test]
        fn prop_bounded_by_half_circumference(a in coord(), b in coord()) {
            let d = haversine_km(&a, &b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }
    }
}
