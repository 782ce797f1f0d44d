use crate::classifier::types::SeverityLevel;
use crate::store::Facility;

/// Sorts by ascending distance, ties broken by descending data quality then
/// lexicographic id (§4.4 ranking).
pub fn sort_by_distance(facilities: &mut [Facility]) {
    facilities.sort_by(|a, b| {
        let da = a.distance_km.unwrap_or(f64::MAX);
        let db = b.distance_km.unwrap_or(f64::MAX);
        da.total_cmp(&db)
            .then_with(|| b.data_quality.total_cmp(&a.data_quality))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Post-filter government bias (§4.4, done by the HTTP surface): for mild
/// and moderate severities, government-tagged facilities move ahead of
/// non-government ones, preserving distance order within each group. No
/// bias is applied for high or emergency.
pub fn apply_government_bias(mut facilities: Vec<Facility>, level: SeverityLevel) -> Vec<Facility> {
    if !matches!(level, SeverityLevel::Mild | SeverityLevel::Moderate) {
        return facilities;
    }

    let mut government = Vec::new();
    let mut other = Vec::new();
    for f in facilities.drain(..) {
        if f.is_government() {
            government.push(f);
        } else {
            other.push(f);
        }
    }
    government.extend(other);
    government
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(id: &str, distance_km: f64, category: &str) -> Facility {
        Facility {
            id: id.to_string(),
            name: id.to_string(),
            latitude: Some(12.0),
            longitude: Some(77.0),
            care_type: None,
            category: Some(category.to_string()),
            ayush_flag: None,
            discipline: vec![],
            specialties: vec![],
            facilities: vec![],
            emergency_available: None,
            emergency_phone: None,
            ambulance_phone: None,
            blood_bank_phone: None,
            general_phone: None,
            total_beds: None,
            postal_code: None,
            district: None,
            state: None,
            address: None,
            data_quality: 0.8,
            distance_km: Some(distance_km),
        }
    }

    #[test]
    fn government_bias_preserves_distance_order_within_group() {
        let facilities = vec![
            facility("a", 1.0, "private"),
            facility("b", 2.0, "government"),
            facility("c", 3.0, "private"),
            facility("d", 4.0, "public hospital"),
        ];
        let ranked = apply_government_bias(facilities, SeverityLevel::Mild);
        let ids: Vec<&str> = ranked.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn no_bias_for_high_or_emergency() {
        let facilities = vec![facility("a", 1.0, "private"), facility("b", 2.0, "government")];
        let ranked = apply_government_bias(facilities.clone(), SeverityLevel::High);
        let ids: Vec<&str> = ranked.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn sort_by_distance_breaks_ties_by_quality_then_id() {
        let mut facilities = vec![
            {
                let mut f = facility("z", 1.0, "private");
                f.data_quality = 0.5;
                f
            },
            {
                let mut f = facility("a", 1.0, "private");
                f.data_quality = 0.9;
                f
            },
        ];
        sort_by_distance(&mut facilities);
        assert_eq!(facilities[0].id, "a");
    }
}
