use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    ExternalGeocode,
    LocalExactCentroid,
    LocalDistrictCentroid,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::ExternalGeocode => "external_geocode",
            Provenance::LocalExactCentroid => "local_exact_centroid",
            Provenance::LocalDistrictCentroid => "local_district_centroid",
        }
    }
}

/// Transient result of resolving a postal code (§3).
#[derive(Debug, Clone, Serialize)]
pub struct PostalCodeResolution {
    pub pincode: String,
    pub latitude: f64,
    pub longitude: f64,
    pub state: Option<String>,
    pub district: Option<String>,
    pub hospital_count: i64,
    pub source: Provenance,
}
