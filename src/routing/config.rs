use crate::classifier::types::SeverityLevel;

/// The fixed progressive-radius sequence the router walks, in kilometres.
pub const RADIUS_SEQUENCE_KM: [f64; 4] = [5.0, 8.0, 12.0, 20.0];

/// Minimum admissible radius for a given severity level, and whether
/// `emergency_available` is preferred in pass 1 (§4.4 table).
pub struct LevelConfig {
    pub initial_radius_km: f64,
    pub prefer_emergency_available: bool,
    pub label: &'static str,
}

pub fn level_config(level: SeverityLevel) -> LevelConfig {
    match level {
        SeverityLevel::Mild => LevelConfig {
            initial_radius_km: 5.0,
            prefer_emergency_available: false,
            label: "Mild",
        },
        SeverityLevel::Moderate => LevelConfig {
            initial_radius_km: 8.0,
            prefer_emergency_available: false,
            label: "Moderate",
        },
        SeverityLevel::High => LevelConfig {
            initial_radius_km: 12.0,
            prefer_emergency_available: false,
            label: "High",
        },
        SeverityLevel::Emergency => LevelConfig {
            initial_radius_km: 12.0,
            prefer_emergency_available: true,
            label: "Emergency",
        },
    }
}

/// Radii from the level's initial radius through the end of the fixed
/// sequence, e.g. mild -> [5, 8, 12, 20], high/emergency -> [12, 20].
pub fn radii_from(initial_radius_km: f64) -> Vec<f64> {
    RADIUS_SEQUENCE_KM
        .iter()
        .copied()
        .filter(|r| *r >= initial_radius_km)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radii_from_mild_includes_full_sequence() {
        assert_eq!(radii_from(5.0), vec![5.0, 8.0, 12.0, 20.0]);
    }

    #[test]
    fn radii_from_high_skips_smaller_radii() {
        assert_eq!(radii_from(12.0), vec![12.0, 20.0]);
    }
}
