use nuptial::{AppState, Config, SiteError, Store, build_router, logger::Logger};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), SiteError> {
    if let Err(e) = Logger::init() {
        eprintln!("Failed to install logger: {}", e);
    }

    let config = Config::from_env();
    let store = Store::from_config(&config).await?;
    let addr = config.socket_addr();

    let app = build_router(AppState::new(config, store));

    log::info!("Content API listening on http://{}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await.map_err(SiteError::from)
}
