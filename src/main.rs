use std::{process, sync::Arc, time::Duration};

use bacheca::{
    application::{error::AppError, posts::PostService},
    cache::{QueryStore, RefetchWorker},
    config,
    infra::{error::InfraError, http, telemetry},
    rpc::{PostClient, memory::MemoryPostClient},
};
use clap::Parser;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let cli = config::CliArgs::parse();
    let settings = config::load(&cli)
        .map_err(|err| InfraError::configuration(format!("failed to load configuration: {err}")))
        .map_err(AppError::from)?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    serve(settings).await
}

async fn serve(settings: config::Settings) -> Result<(), AppError> {
    let client: Arc<dyn PostClient> = Arc::new(MemoryPostClient::new());
    let (cache, refetch_rx) = QueryStore::new();

    let worker = RefetchWorker::new(cache.clone(), client.clone());
    let worker_handle = tokio::spawn(worker.run(refetch_rx));

    let posts = Arc::new(PostService::new(client, cache));
    let state = http::AppState::new(posts, settings.board.name.clone());
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let local_addr = listener
        .local_addr()
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        addr = %local_addr,
        board = %settings.board.name,
        "bacheca listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal(settings.server.graceful_shutdown))
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    worker_handle.abort();
    let _ = worker_handle.await;

    Ok(())
}

async fn shutdown_signal(grace: Duration) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    info!(grace_secs = grace.as_secs(), "shutdown signal received");

    // Bound the connection drain: if open connections outlive the grace
    // window, exit anyway.
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        warn!("graceful shutdown window elapsed, exiting");
        process::exit(0);
    });
}

#[cfg(test)]
mod tests {}
