use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use border_route::config::ServerConfig;
use border_route::countries::{CountrySource, MockCountrySource, RestCountriesClient};
use border_route::repository::CountryRepository;
use border_route::web::{AppState, CountrySummary, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    match &config.mock_file {
        Some(path) => {
            let source = MockCountrySource::from_json_file(
                path,
                config.countries.name_language.as_deref(),
            )?;
            info!(
                path = %path.display(),
                countries = source.len(),
                "serving countries from file"
            );
            serve(source, config).await
        }
        None => {
            let source = RestCountriesClient::new(config.countries.clone())?;
            info!(base_url = %config.countries.base_url, "using REST Countries API");
            serve(source, config).await
        }
    }
}

async fn serve<S>(source: S, config: ServerConfig) -> Result<(), Box<dyn Error>>
where
    S: CountrySource + Send + Sync + 'static,
{
    let repository = CountryRepository::new(source);

    // Seeding the cache up front means most searches start with both
    // endpoints already known.
    let preloaded = match repository.get_all().await {
        Ok(all) => {
            info!(countries = all.len(), "loaded country list");
            Some(all.iter().map(|c| CountrySummary::from(&**c)).collect())
        }
        Err(e) => {
            warn!(error = %e, "could not preload countries, fetching on demand");
            None
        }
    };

    let state = AppState::new(repository, config.search.clone());
    if let Some(countries) = preloaded {
        // Fresh cell, cannot already be set
        let _ = state.countries.set(countries);
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "border route finder listening");
    info!("  GET /health         - health check");
    info!("  GET /api/countries  - country selection list");
    info!("  GET /api/route      - find a land route (?from=DEU&to=ESP)");

    axum::serve(listener, app).await?;
    Ok(())
}
