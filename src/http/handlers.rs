use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;

use crate::classifier::types::{Assessment, ClassifyRequest, SeverityLevel};
use crate::error::AppError;
use crate::location::is_valid_postal_code;
use crate::routing::ranking::{apply_government_bias, sort_by_distance};
use crate::state::AppState;
use crate::store::NearestFilters;

use super::dto::{
    severity_level_label, FacilityDto, HealthResponse, HospitalsQuery, HospitalsResponse,
    LevelConfigDto, SeverityBasedRequest, SeverityBasedResponse,
};

pub async fn severity_based(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeverityBasedRequest>,
) -> Result<Json<SeverityBasedResponse>, AppError> {
    if !req.latitude.is_finite() || !req.longitude.is_finite() {
        return Err(AppError::InvalidInput("coordinates must be finite".to_string()));
    }
    if !state
        .config
        .country_bounding_box
        .contains(req.latitude, req.longitude)
    {
        return Err(AppError::InvalidInput(
            "coordinates fall outside the supported country bounding box".to_string(),
        ));
    }
    let severity_level = SeverityLevel::parse(&req.severity_level)
        .ok_or_else(|| AppError::InvalidInput(format!("unknown severityLevel '{}'", req.severity_level)))?;

    let specialty = req.specialties.first().map(|s| s.as_str());

    tracing::info!(
        pincode = req.pincode.as_deref().unwrap_or(""),
        severity_level = severity_level.as_str(),
        "severity-based search"
    );

    let result = state
        .router
        .search(req.latitude, req.longitude, severity_level, specialty)
        .await?;

    let mut facilities = result.facilities;
    sort_by_distance(&mut facilities);
    let facilities = apply_government_bias(facilities, severity_level);

    let dto = SeverityBasedResponse {
        facilities: facilities.into_iter().map(FacilityDto::from).collect(),
        radius_used: result.radius_used_km,
        was_expanded: result.was_expanded,
        specialty_filtered: result.specialty_filtered,
        severity_level: severity_level.as_str().to_string(),
        config: LevelConfigDto {
            level: severity_level_label(severity_level).to_string(),
            initial_radius: result.initial_radius_km,
        },
    };

    Ok(Json(dto))
}

pub async fn pincode(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<crate::location::PostalCodeResolution>, AppError> {
    if !is_valid_postal_code(&code) {
        return Err(AppError::InvalidInput(
            "pincode must be exactly six digits".to_string(),
        ));
    }

    let resolution = state.resolver.resolve(&code).await?;
    Ok(Json(resolution))
}

pub async fn classify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClassifyRequest>,
) -> Json<Assessment> {
    // Contract: this endpoint never returns 5xx (§6); a malformed-but-present
    // body still reaches the totally-defined classifier.
    let assessment = state.classifier.classify(&req).await;
    Json(assessment)
}

pub async fn hospitals(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HospitalsQuery>,
) -> Result<Json<HospitalsResponse>, AppError> {
    if !q.lat.is_finite() || !q.lng.is_finite() || q.radius <= 0.0 {
        return Err(AppError::InvalidInput(
            "lat, lng and radius must be finite and radius must be positive".to_string(),
        ));
    }

    let filters = NearestFilters {
        quality_threshold: state.config.quality_threshold,
        emergency_only: q.emergency.unwrap_or(false),
        specialty: q.specialty.clone(),
        ayush_only: q.ayush.unwrap_or(false),
    };

    let mut facilities = state
        .store
        .nearest_within(q.lat, q.lng, q.radius * 1000.0, &filters)
        .await?;
    sort_by_distance(&mut facilities);

    Ok(Json(HospitalsResponse {
        count: facilities.len(),
        hospitals: facilities.into_iter().map(FacilityDto::from).collect(),
        radius: q.radius,
    }))
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<crate::store::FacilityStats>, AppError> {
    let stats = state.store.stats().await?;
    Ok(Json(stats))
}

pub async fn health(State(state): State<Arc<AppState>>) -> (axum::http::StatusCode, Json<HealthResponse>) {
    let reachable = state.store.stats().await.is_ok();
    let status_code = if reachable {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if reachable { "ok" } else { "degraded" },
        database: if reachable { "reachable" } else { "unreachable" },
        timestamp: Utc::now().to_rfc3339(),
    };

    (status_code, Json(body))
}
