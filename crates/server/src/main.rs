use std::error::Error;

use clap::Parser;
use itinerary_server::config::Args;
use itinerary_server::error_chain;
use itinerary_server::http::{router, AppState};
use log::{error, info, warn};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(err) = run(args).await {
        error!("{}", error_chain(&*err));
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let state = AppState::from_args(&args);
    if !itinerary_pdf::fonts::fonts_available() {
        warn!("no font family found; generation requests will fail until fonts are installed");
    }

    let listener = TcpListener::bind(&args.http_addr).await?;
    info!(
        "listening on {} (output dir {})",
        listener.local_addr()?,
        state.render.output_dir.display()
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
