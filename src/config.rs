use std::time::Duration;

/// Country-specific admissibility box for coordinates.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat.is_finite()
            && lng.is_finite()
            && lat >= self.min_lat
            && lat <= self.max_lat
            && lng >= self.min_lng
            && lng <= self.max_lng
    }

    pub const fn india() -> Self {
        BoundingBox {
            min_lat: 6.0,
            max_lat: 37.5,
            min_lng: 68.0,
            max_lng: 97.5,
        }
    }
}

/// Process-wide configuration, read once at startup from the environment.
///
/// Mirrors the option table in the specification; there is no live-reload,
/// a change requires a restart.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_port: u16,
    pub allowed_origin: String,
    pub db_dsn: String,
    pub db_ssl: bool,
    pub db_pool_size: u32,

    pub geocode_provider_region: String,
    pub geocode_index_name: Option<String>,
    pub geocode_api_key: Option<String>,
    pub geocode_endpoint: Option<String>,

    pub country_bounding_box: BoundingBox,
    pub quality_threshold: f64,
    pub min_results_before_relax: usize,
    pub max_radius_km: f64,

    pub ai_classifier_url: Option<String>,
    pub ai_classifier_timeout: Duration,
    pub stage1_cache_retention: Duration,

    pub cache_ttl: Duration,

    pub geocoder_timeout: Duration,
    pub db_query_timeout: Duration,
    pub request_deadline: Duration,
    pub pool_acquire_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment, applying the
    /// defaults from the specification where a variable is unset.
    pub fn from_env() -> anyhow::Result<Self> {
        // dotenvy is best-effort: local development may keep secrets in a
        // `.env` file, deployed environments set these directly.
        let _ = dotenvy::dotenv();

        let listen_port = env_or("LISTEN_PORT", "5000").parse()?;
        let allowed_origin = env_or("ALLOWED_ORIGIN", "http://localhost:3001");
        let db_dsn = std::env::var("DB_DSN")
            .map_err(|_| anyhow::anyhow!("DB_DSN must be set"))?;
        let db_ssl = env_or("DB_SSL", "false").parse()?;
        let db_pool_size = env_or("DB_POOL_SIZE", "10").parse()?;

        let geocode_provider_region = env_or("GEOCODE_PROVIDER_REGION", "ap-south-1");
        let geocode_index_name = std::env::var("GEOCODE_INDEX_NAME").ok();
        let geocode_api_key = std::env::var("GEOCODE_API_KEY").ok();
        let geocode_endpoint = std::env::var("GEOCODE_ENDPOINT").ok();

        let quality_threshold = env_or("QUALITY_THRESHOLD", "0.3").parse()?;
        let min_results_before_relax = env_or("MIN_RESULTS_BEFORE_RELAX", "3").parse()?;
        let max_radius_km = env_or("MAX_RADIUS_KM", "20").parse()?;

        let ai_classifier_url = std::env::var("AI_CLASSIFIER_URL").ok();
        let ai_classifier_timeout_ms: u64 = env_or("AI_CLASSIFIER_TIMEOUT_MS", "8000").parse()?;
        let cache_ttl_s: u64 = env_or("CACHE_TTL_S", "86400").parse()?;
        let stage1_cache_retention_s: u64 =
            env_or("STAGE1_CACHE_RETENTION_S", "600").parse()?;

        Ok(Config {
            listen_port,
            allowed_origin,
            db_dsn,
            db_ssl,
            db_pool_size,
            geocode_provider_region,
            geocode_index_name,
            geocode_api_key,
            geocode_endpoint,
            country_bounding_box: BoundingBox::india(),
            quality_threshold,
            min_results_before_relax,
            max_radius_km,
            ai_classifier_url,
            ai_classifier_timeout: Duration::from_millis(ai_classifier_timeout_ms),
            stage1_cache_retention: Duration::from_secs(stage1_cache_retention_s),
            cache_ttl: Duration::from_secs(cache_ttl_s),
            geocoder_timeout: Duration::from_secs(2),
            db_query_timeout: Duration::from_secs(3),
            request_deadline: Duration::from_secs(15),
            pool_acquire_timeout: Duration::from_millis(500),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
