use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{PgPool, Row};
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::store::{Centroid, Facility, FacilityStats, FacilityStore, NearestFilters};

/// Result sets are capped per §4.5: 20 rows for routing queries, 50 for
/// diagnostic ones. The router always asks for the smaller cap.
pub const ROUTING_ROW_CAP: i64 = 20;
pub const DIAGNOSTIC_ROW_CAP: i64 = 50;

pub struct PostgresFacilityStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresFacilityStore {
    pub async fn connect(
        dsn: &str,
        pool_size: u32,
        acquire_timeout: Duration,
        query_timeout: Duration,
        require_tls: bool,
    ) -> anyhow::Result<Self> {
        let ssl_mode = if require_tls { PgSslMode::Require } else { PgSslMode::Prefer };
        let connect_options = PgConnectOptions::from_str(dsn)?.ssl_mode(ssl_mode);
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(acquire_timeout)
            .connect_with(connect_options)
            .await?;
        Ok(PostgresFacilityStore { pool, query_timeout })
    }

    async fn timed<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, sqlx::Error>>,
    ) -> Result<T, AppError> {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => {
                if matches!(e, sqlx::Error::PoolTimedOut) {
                    Err(AppError::ServiceUnavailable)
                } else {
                    Err(AppError::StoreError(e.to_string()))
                }
            }
            Err(_) => Err(AppError::StoreError("query timed out".to_string())),
        }
    }
}

const FACILITY_COLUMNS: &str = r#"
    id, name, latitude, longitude, care_type, category, ayush_flag,
    coalesce(discipline, '[]'::jsonb) as discipline,
    coalesce(specialties, '[]'::jsonb) as specialties,
    coalesce(facilities, '[]'::jsonb) as facilities,
    emergency_available, emergency_phone, ambulance_phone, blood_bank_phone,
    general_phone, total_beds, postal_code, district, state, address, data_quality
"#;

#[async_trait]
impl FacilityStore for PostgresFacilityStore {
    async fn nearest_within(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
        filters: &NearestFilters,
    ) -> Result<Vec<Facility>, AppError> {
        let mut sql = format!(
            r#"
            select {cols},
                ST_Distance(
                    location::geography,
                    ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography
                ) / 1000.0 as distance_km
            from facilities
            where location is not null
              and ST_DWithin(
                    location::geography,
                    ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography,
                    $3
              )
              and data_quality >= $4
            "#,
            cols = FACILITY_COLUMNS
        );

        let mut arg_idx = 5;
        if filters.emergency_only {
            sql.push_str(" and emergency_available = true");
        }
        if filters.ayush_only {
            sql.push_str(" and ayush_flag = true");
        }
        if filters.specialty.is_some() {
            sql.push_str(&format!(
                " and specialties @> to_jsonb(${}::text)",
                arg_idx
            ));
            arg_idx += 1;
        }
        let _ = arg_idx;
        sql.push_str(" order by emergency_available desc nulls last, distance_km asc, data_quality desc, id asc");
        sql.push_str(&format!(" limit {ROUTING_ROW_CAP}"));

        let mut query = sqlx::query_as::<_, Facility>(&sql)
            .bind(lng)
            .bind(lat)
            .bind(radius_m)
            .bind(filters.quality_threshold);
        if let Some(specialty) = &filters.specialty {
            query = query.bind(specialty);
        }

        self.timed(query.fetch_all(&self.pool)).await
    }

    async fn stats(&self) -> Result<FacilityStats, AppError> {
        let row = self
            .timed(
                sqlx::query(
                    r#"
                    select
                        count(*) as total,
                        count(*) filter (where location is not null) as with_coordinates,
                        count(*) filter (where emergency_available = true) as emergency,
                        count(*) filter (where ayush_flag = true) as ayush,
                        count(*) filter (where category ilike '%gov%' or category ilike '%public%') as government,
                        count(*) filter (where data_quality >= 0.3) as quality_passed
                    from facilities
                    "#,
                )
                .fetch_one(&self.pool),
            )
            .await?;

        Ok(FacilityStats {
            total: row.try_get("total").unwrap_or_default(),
            with_coordinates: row.try_get("with_coordinates").unwrap_or_default(),
            emergency: row.try_get("emergency").unwrap_or_default(),
            ayush: row.try_get("ayush").unwrap_or_default(),
            government: row.try_get("government").unwrap_or_default(),
            quality_passed: row.try_get("quality_passed").unwrap_or_default(),
        })
    }

    async fn centroid_by_postal_code(&self, code: &str) -> Result<Option<Centroid>, AppError> {
        let rows = self
            .timed(
                sqlx::query(
                    r#"
                    select latitude, longitude
                    from facilities
                    where postal_code = $1 and location is not null
                    "#,
                )
                .bind(code)
                .fetch_all(&self.pool),
            )
            .await?;

        median_centroid(rows)
    }

    async fn centroid_by_district(
        &self,
        state: &str,
        district: &str,
    ) -> Result<Option<Centroid>, AppError> {
        let rows = self
            .timed(
                sqlx::query(
                    r#"
                    select latitude, longitude
                    from facilities
                    where state = $1 and district = $2 and location is not null
                    "#,
                )
                .bind(state)
                .bind(district)
                .fetch_all(&self.pool),
            )
            .await?;

        median_centroid(rows)
    }

    async fn district_for_postal_code(
        &self,
        code: &str,
    ) -> Result<Option<(String, String)>, AppError> {
        let row = self
            .timed(
                sqlx::query(
                    r#"
                    select state, district
                    from facilities
                    where postal_code = $1 and state is not null and district is not null
                    limit 1
                    "#,
                )
                .bind(code)
                .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(|r| {
            (
                r.try_get::<String, _>("state").unwrap_or_default(),
                r.try_get::<String, _>("district").unwrap_or_default(),
            )
        }))
    }

    async fn fuzzy_name_search(
        &self,
        query: &str,
        state: Option<&str>,
    ) -> Result<Vec<Facility>, AppError> {
        let mut sql = format!(
            r#"
            select {cols}, null::float8 as distance_km,
                case
                    when lower(name) = lower($1) then 0
                    when lower(name) like lower($1) || '%' then 1
                    else 2
                end as rank
            from facilities
            where lower(name) like '%' || lower($1) || '%'
            "#,
            cols = FACILITY_COLUMNS
        );
        if state.is_some() {
            sql.push_str(" and state = $2");
        }
        sql.push_str(&format!(" order by rank asc, name asc limit {DIAGNOSTIC_ROW_CAP}"));

        let mut q = sqlx::query_as::<_, Facility>(&sql).bind(query);
        if let Some(s) = state {
            q = q.bind(s);
        }

        self.timed(q.fetch_all(&self.pool)).await
    }
}

fn median_centroid(rows: Vec<sqlx::postgres::PgRow>) -> Result<Option<Centroid>, AppError> {
    let mut lats = Vec::with_capacity(rows.len());
    let mut lngs = Vec::with_capacity(rows.len());
    for row in &rows {
        let lat: Option<f64> = row.try_get("latitude").ok();
        let lng: Option<f64> = row.try_get("longitude").ok();
        if let (Some(lat), Some(lng)) = (lat, lng) {
            if crate::config::BoundingBox::india().contains(lat, lng) {
                lats.push(lat);
                lngs.push(lng);
            }
        }
    }
    if lats.is_empty() {
        return Ok(None);
    }
    let count = lats.len() as i64;
    let (Some(latitude), Some(longitude)) = (crate::geo::median(&mut lats), crate::geo::median(&mut lngs)) else {
        return Ok(None);
    };
    Ok(Some(Centroid {
        latitude,
        longitude,
        count,
    }))
}
