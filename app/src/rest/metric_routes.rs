use super::{build_text_response, run_blocking};
use crate::metrics::AagMetrics;
use crate::source::SnapshotSource;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    source: &Arc<SnapshotSource>,
    metrics: &Arc<AagMetrics>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    scrape(source.clone(), metrics.clone())
}

/// GET /metrics
///
/// Run one collection cycle
///
/// Returns the prometheus text format, or 500 without any samples
/// if the snapshot can't be read
fn scrape(
    source: Arc<SnapshotSource>,
    metrics: Arc<AagMetrics>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || (source.clone(), metrics.clone()))
        .and(warp::get())
        .and(warp::path!("metrics"))
        .and_then(
            |(source, metrics): (Arc<SnapshotSource>, Arc<AagMetrics>)| async move {
                let resp = run_blocking(move || metrics.collect(&source)).await;
                build_text_response(resp, prometheus::TEXT_FORMAT)
            },
        )
        .boxed()
}
