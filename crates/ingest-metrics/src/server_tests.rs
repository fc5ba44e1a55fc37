// SPDX-License-Identifier: MIT

use super::*;
use crate::registry::PrometheusMetrics;
use std::time::Duration;

#[tokio::test]
async fn serve_shuts_down_gracefully_when_cancelled() {
    let metrics = Arc::new(PrometheusMetrics::new());
    let ctx = CancellationToken::new();
    let addr: SocketAddr = "127.0.0.1:0".parse().expect("addr");

    let serve_ctx = ctx.clone();
    let handle = tokio::spawn(serve(addr, metrics, serve_ctx));

    tokio::task::yield_now().await;
    ctx.cancel();

    let result = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("server task finished")
        .expect("server task did not panic");
    assert!(result.is_ok());
}
