use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average transport emission factor, grams of CO2-equivalent per kilometre.
pub const GRAMS_CO2_PER_KM: f64 = 14.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance in kilometres.
///
/// Every coordinate is folded to its absolute value before the haversine is
/// applied, so points in different hemispheres are measured as if they were in
/// the same one.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let from_lat = from.latitude.abs().to_radians();
    let from_long = from.longitude.abs().to_radians();
    let to_lat = to.latitude.abs().to_radians();
    let to_long = to.longitude.abs().to_radians();

    let d_lat = to_lat - from_lat;
    let d_long = to_long - from_long;

    let a = (d_lat / 2.0).sin().powi(2)
        + from_lat.cos() * to_lat.cos() * (d_long / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Estimated trip emissions in grams of CO2-equivalent.
pub fn carbon_footprint(from: Coordinates, to: Coordinates) -> f64 {
    haversine_km(from, to) * GRAMS_CO2_PER_KM
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn test_same_point_has_no_emissions() {
        let jakarta = Coordinates::new(-6.2, 106.8);
        assert_eq!(carbon_footprint(jakarta, jakarta), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let distance = haversine_km(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));
        // 6371 * pi / 180
        assert!(close(distance, 111.195, 0.01), "got {}", distance);
        assert!(close(
            carbon_footprint(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0)),
            111.195 * GRAMS_CO2_PER_KM,
            0.2
        ));
    }

    #[test]
    fn test_signs_are_discarded() {
        let south = Coordinates::new(-7.8, -110.4);
        let north = Coordinates::new(7.8, 110.4);
        assert_eq!(haversine_km(south, north), 0.0);

        let a = haversine_km(Coordinates::new(-6.2, 106.8), Coordinates::new(-7.8, 110.4));
        let b = haversine_km(Coordinates::new(6.2, 106.8), Coordinates::new(7.8, 110.4));
        assert_eq!(a, b);
    }

    #[test]
    fn test_nan_passes_through() {
        let value = carbon_footprint(Coordinates::new(f64::NAN, 0.0), Coordinates::new(1.0, 1.0));
        assert!(value.is_nan());
    }
}
