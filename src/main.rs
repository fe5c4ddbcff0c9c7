use actix_web::{App, HttpServer, web};
use rst_portal::infrastructure::config::AppConfig;
use rst_portal::infrastructure::logging::init_logging;
use rst_portal::presentation::handlers::AppState;
use rst_portal::presentation::middleware::{RequestTracing, SessionMiddleware};
use rst_portal::presentation::routes::configure;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config.log_level);
    info!(database_url = %config.database_url, "Configuration loaded");
    if config.uses_development_secret() {
        warn!("SESSION_SECRET not set, using the development secret");
    }

    let bind_addr = config.bind_address();

    info!("Bootstrapping database");
    let (state, seeded) = AppState::initialize(config).await.map_err(|e| {
        error!(error = %e, "Failed to initialize database");
        std::io::Error::other(e.to_string())
    })?;
    info!(
        news_inserted = seeded.news_inserted,
        doctors_inserted = seeded.doctors_inserted,
        "Database ready"
    );

    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(SessionMiddleware)
            .wrap(RequestTracing)
            .configure(configure)
    });

    info!(host = %bind_addr.0, port = bind_addr.1, "Binding server to address");
    let server = server.bind(bind_addr.clone())?;

    info!(host = %bind_addr.0, port = bind_addr.1, "Starting HTTP server");
    server.run().await
}
