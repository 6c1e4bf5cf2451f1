use std::fs::File;
use std::sync::Arc;

use alasr_sdk::{
    ApiClient, CredentialStore, FileCredentialStore, PortalError, PortalServices, Transport,
    UnconfiguredTransport,
};
use anyhow::Context;
use tracing::warn;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    application::ports::{MasjidGateway, QuestionGateway, SessionGateway, UserGateway},
    infra::config::AppConfig,
    use_cases::{
        AnalyticsUseCases, DashboardUseCases, MasajidsUseCases, QuestionsUseCases,
        SessionUseCases, UsersUseCases,
    },
};

/// Everything a command needs.
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub services: PortalServices,
    pub session: SessionUseCases,
    pub masajids: MasajidsUseCases,
    pub users: UsersUseCases,
    pub questions: QuestionsUseCases,
    pub dashboard: DashboardUseCases,
    pub analytics: AnalyticsUseCases,
}

pub fn init_app(config: AppConfig) -> anyhow::Result<AppContext> {
    let store: Arc<dyn CredentialStore> =
        Arc::new(FileCredentialStore::new(config.credentials_path.clone()));

    let transport: Arc<dyn Transport> = match alasr_sdk::ReqwestTransport::new(
        &config.transport_config(),
    ) {
        Ok(transport) => Arc::new(transport),
        Err(PortalError::Config(reason)) => {
            warn!(%reason, "Backend not configured, requests will fail");
            Arc::new(UnconfiguredTransport::new(reason))
        }
        Err(e) => return Err(e).context("Failed to create HTTP transport"),
    };

    let api = Arc::new(ApiClient::with_transport(transport, store));
    let services = PortalServices::new(api, config.cache_ttl);

    let masjid_gateway: Arc<dyn MasjidGateway> = Arc::new(services.masajids.clone());
    let user_gateway: Arc<dyn UserGateway> = Arc::new(services.users.clone());
    let question_gateway: Arc<dyn QuestionGateway> = Arc::new(services.questions.clone());
    let session_gateway: Arc<dyn SessionGateway> = Arc::new(services.clone());

    Ok(AppContext {
        config: Arc::new(config),
        session: SessionUseCases::new(session_gateway),
        masajids: MasajidsUseCases::new(masjid_gateway.clone(), user_gateway.clone()),
        users: UsersUseCases::new(user_gateway.clone(), masjid_gateway.clone()),
        questions: QuestionsUseCases::new(question_gateway.clone()),
        dashboard: DashboardUseCases::new(
            masjid_gateway.clone(),
            user_gateway.clone(),
            question_gateway.clone(),
        ),
        analytics: AnalyticsUseCases::new(masjid_gateway, user_gateway, question_gateway),
        services,
    })
}

/// Compact logs on stderr, plus JSON lines to `ALASR_LOG_JSON_FILE` when set.
///
/// Stdout stays reserved for command output.
pub fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "alasr_portal=info,alasr_sdk=info".into());

    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    let mut file_error = None;
    let json_layer = config.log_json_file.as_ref().and_then(|path| {
        match File::create(path) {
            Ok(file) => Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(true)
                    .with_span_list(true)
                    .boxed(),
            ),
            Err(e) => {
                file_error = Some(format!("{}: {e}", path.display()));
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    if let Some(error) = file_error {
        warn!(%error, "Cannot open JSON log file, logging to stderr only");
    }
}
