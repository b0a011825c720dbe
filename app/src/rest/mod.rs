use crate::config::Config;
use crate::error::ApiError;
use crate::metrics::AagMetrics;
use crate::source::SnapshotSource;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

mod aag_routes;
mod metric_routes;

pub mod dto {
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    pub struct ErrorResponseDto {
        pub error: String,
    }
}

/// Runs a blocking file read on tokio's blocking pool
async fn run_blocking<T, E>(
    task: impl FnOnce() -> Result<T, E> + Send + 'static,
) -> Result<T, ApiError>
where
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(task).await?.map_err(Into::into)
}

fn error_response(err: ApiError) -> Box<dyn Reply> {
    error!(error = %err, "Request failed");
    Box::new(warp::reply::with_status(
        warp::reply::json(&dto::ErrorResponseDto {
            error: err.to_string(),
        }),
        StatusCode::INTERNAL_SERVER_ERROR,
    ))
}

fn build_response<T: Serialize>(resp: Result<T, ApiError>) -> Result<Box<dyn Reply>, Rejection> {
    match resp {
        Ok(data) => Ok(Box::new(warp::reply::json(&data))),
        Err(err) => Ok(error_response(err)),
    }
}

fn build_text_response(
    resp: Result<String, ApiError>,
    content_type: &'static str,
) -> Result<Box<dyn Reply>, Rejection> {
    match resp {
        Ok(text) => Ok(Box::new(warp::reply::with_header(
            text,
            "content-type",
            content_type,
        ))),
        Err(err) => Ok(error_response(err)),
    }
}

/// Serves the json api and the metrics endpoint until Ctrl-C
pub async fn dispatch_server(
    config: &Config,
    source: Arc<SnapshotSource>,
    metrics: Arc<AagMetrics>,
) -> Result<(), warp::Error> {
    let (shutdown_sender, shutdown_receiver) = watch::channel(false);
    let shutdown = move || {
        let mut receiver = shutdown_receiver.clone();
        async move {
            let _ = receiver.changed().await;
        }
    };

    let api = aag_routes::routes(&source).with(warp::trace::request());
    let (api_addr, api_server) =
        warp::serve(api).try_bind_with_graceful_shutdown(config.server_addr(), shutdown())?;
    info!("Serving api at: {}", api_addr);

    let scrape = metric_routes::routes(&source, &metrics).with(warp::trace::request());
    let (metrics_addr, metrics_server) =
        warp::serve(scrape).try_bind_with_graceful_shutdown(config.metrics_addr(), shutdown())?;
    info!("Serving metrics at: {}", metrics_addr);

    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed listening for Ctrl-C");
            return;
        }
        info!("Shutting down");
        let _ = shutdown_sender.send(true);
    });

    tokio::join!(api_server, metrics_server);
    Ok(())
}

#[cfg(test)]
mod test;
