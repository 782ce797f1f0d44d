/// Mean Earth radius in kilometres, matching the constant commonly used for
/// WGS84 great-circle approximations.
const EARTH_RADIUS_KM: f64 = 6371.0088;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }
}

/// Great-circle distance between two coordinates, in kilometres.
///
/// Used both to validate what the facility store reports and, for the
/// diagnostic in-process paths, to compute distance directly.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    let c = 2.0 * h.sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Median of a slice of `f64`. Used for centroid aggregation, which favors
/// the median over the mean to stay robust to outlier coordinates in the
/// facility store.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_zero_distance() {
        let p = Coordinate::new(12.9716, 77.5946);
        assert!(haversine_km(p, p) < 1e-9);
    }

    #[test]
    fn haversine_known_distance() {
        // Bengaluru to Chennai is roughly 290 km as the crow flies.
        let blr = Coordinate::new(12.9716, 77.5946);
        let che = Coordinate::new(13.0827, 80.2707);
        let d = haversine_km(blr, che);
        assert!((270.0..320.0).contains(&d), "distance was {d}");
    }

    #[test]
    fn median_odd_even() {
        let mut odd = vec![3.0, 1.0, 2.0];
        assert_eq!(median(&mut odd), Some(2.0));
        let mut even = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(median(&mut even), Some(2.5));
        let mut empty: Vec<f64> = vec![];
        assert_eq!(median(&mut empty), None);
    }

    #[test]
    fn median_robust_to_outlier() {
        let mut values = vec![12.9, 12.95, 13.0, 99.0];
        assert_eq!(median(&mut values), Some((12.95 + 13.0) / 2.0));
    }
}
