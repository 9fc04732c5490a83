use std::{net::SocketAddr, sync::Arc};

use blog_home::{
    config::RuntimeConfig,
    content_loader::load_content,
    hot_reload::start_content_watcher,
    routes::router,
    state::{AppState, RouterState},
};
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> blog_home::Result<()> {
    let config = RuntimeConfig::from_env();

    // logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("RUST_ENV is set to development: {}", config.is_development);

    let content = load_content(&config.content_dir).await?;
    info!(posts = content.posts.len(), "Loaded content");

    let state = Arc::new(AppState::new(
        content,
        config.content_dir.clone(),
        config.is_development,
    ));

    let (tx, _rx) = broadcast::channel(1);
    if config.is_development {
        info!("Hot reload enabled. Check logs for file change events.");
        start_content_watcher(tx.clone(), state.clone());
    }

    let app = router(RouterState {
        app_state: state,
        broadcaster: tx,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
