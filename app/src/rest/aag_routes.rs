use super::{build_response, build_text_response, run_blocking};
use crate::source::SnapshotSource;
use std::sync::Arc;
use warp::Filter;

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

pub fn routes(
    source: &Arc<SnapshotSource>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    current_reading(source.clone()).or(debug_text(source.clone()))
}

/// GET /aag
///
/// Decode the current snapshot
///
/// Returns the `Reading` with its timestamp in UTC,
/// or 500 if the snapshot can't be read or decoded
fn current_reading(
    source: Arc<SnapshotSource>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || source.clone())
        .and(warp::get())
        .and(warp::path!("aag"))
        .and_then(|source: Arc<SnapshotSource>| async move {
            let resp = run_blocking(move || source.read_reading()).await;
            build_response(resp)
        })
        .boxed()
}

/// GET /debug
///
/// Pass through the diagnostic dump of the cloud watcher
///
/// Returns the text with `\n` line endings, or 500 if the file is missing
fn debug_text(
    source: Arc<SnapshotSource>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || source.clone())
        .and(warp::get())
        .and(warp::path!("debug"))
        .and_then(|source: Arc<SnapshotSource>| async move {
            let resp = run_blocking(move || source.read_diagnostic()).await;
            build_text_response(resp, TEXT_CONTENT_TYPE)
        })
        .boxed()
}
