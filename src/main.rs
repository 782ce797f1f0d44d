use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use svastha_router::classifier::Classifier;
use svastha_router::config::Config;
use svastha_router::http::build_router;
use svastha_router::location::geocode::Geocoder;
use svastha_router::location::LocationResolver;
use svastha_router::routing::SeverityRouter;
use svastha_router::state::AppState;
use svastha_router::store::postgres::PostgresFacilityStore;
use svastha_router::store::FacilityStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn FacilityStore> = Arc::new(
        PostgresFacilityStore::connect(
            &config.db_dsn,
            config.db_pool_size,
            config.pool_acquire_timeout,
            config.db_query_timeout,
            config.db_ssl,
        )
        .await?,
    );

    let geocoder = Geocoder::new(
        config.geocode_endpoint.clone(),
        config.geocode_api_key.clone(),
        config.geocode_provider_region.clone(),
        config.geocode_index_name.clone(),
        config.geocoder_timeout,
    );

    let resolver = LocationResolver::new(
        store.clone(),
        geocoder,
        config.cache_ttl,
        config.country_bounding_box,
    );

    let router = SeverityRouter::new(
        store.clone(),
        config.quality_threshold,
        config.min_results_before_relax,
        config.max_radius_km,
    );

    let classifier = Classifier::new(
        config.ai_classifier_url.clone(),
        config.ai_classifier_timeout,
        config.stage1_cache_retention,
    );

    let listen_port = config.listen_port;

    let state = Arc::new(AppState {
        config,
        store,
        resolver,
        router,
        classifier,
    });

    let app = build_router(state)?;

    let listener = TcpListener::bind(("0.0.0.0", listen_port)).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(anyhow::Error::from)?;

    Ok(())
}
