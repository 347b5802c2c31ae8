use metrics_exporter_prometheus::PrometheusHandle;
use program_finder::config::AppConfig;
use program_finder::error::AppError;
use program_finder::requirements::{HttpPageFetcher, RequirementsService};
use program_finder::search::{HttpSearchBackend, ProviderAccounts, ProviderError, ProviderRotator};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Production wiring shared by the server and the one-shot CLI commands.
pub(crate) struct ProgramServices {
    pub(crate) requirements: Arc<RequirementsService<HttpPageFetcher>>,
    pub(crate) search: Arc<ProviderRotator<HttpSearchBackend>>,
}

impl ProgramServices {
    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let fetcher = HttpPageFetcher::new(&config.fetch)?;
        let requirements = RequirementsService::new(Arc::new(fetcher), config.fetch.timeout);

        let backend = HttpSearchBackend::new(
            config.search.endpoint.clone(),
            config.search.result_count,
            config.fetch.timeout,
        )
        .map_err(|err| ProviderError::Provider(err.to_string()))?;
        let accounts = ProviderAccounts::new(
            config.search.credentials.clone(),
            &config.search.engine_id,
        );

        Ok(Self {
            requirements: Arc::new(requirements),
            search: Arc::new(ProviderRotator::new(Arc::new(backend), accounts)),
        })
    }
}
