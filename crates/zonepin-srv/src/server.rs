//! HTTP listener runner: one task per listen address.

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::error::SrvError;

/// Bind every address and serve `router` on all of them.
///
/// All addresses are bound before any serving starts, so a bad address
/// fails startup as a whole. Runs until the first listener fails; the
/// remaining listeners are then stopped and that error is returned.
pub async fn serve(addrs: &[SocketAddr], router: Router) -> crate::Result<()> {
    if addrs.is_empty() {
        return Err(SrvError::Server("no addresses to listen on".into()));
    }

    let mut listeners = Vec::with_capacity(addrs.len());
    for &addr in addrs {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| SrvError::Server(format!("bind {addr}: {e}")))?;
        info!(addr = %listener.local_addr()?, "HTTP listener bound");
        listeners.push((addr, listener));
    }

    let mut tasks = JoinSet::new();
    for (addr, listener) in listeners {
        let router = router.clone();
        tasks.spawn(async move {
            axum::serve(listener, router)
                .await
                .map_err(|e| SrvError::Server(format!("serve {addr}: {e}")))
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let result = joined.map_err(|e| SrvError::Task(e.to_string())).and_then(|r| r);
        if let Err(e) = result {
            error!(error = %e, "HTTP listener stopped");
            tasks.abort_all();
            return Err(e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use std::time::Duration;

    fn app() -> Router {
        Router::new().route("/", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn test_empty_address_list() {
        let err = serve(&[], app()).await.unwrap_err();
        assert!(matches!(err, SrvError::Server(_)));
    }

    #[tokio::test]
    async fn test_bind_conflict_fails_startup() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();
        let free: SocketAddr = "127.0.0.1:0".parse().unwrap();

        let err = serve(&[free, addr], app()).await.unwrap_err();
        assert!(err.to_string().contains(&addr.to_string()));
    }

    #[tokio::test]
    async fn test_serves_until_stopped() {
        let addrs: Vec<SocketAddr> = vec!["127.0.0.1:0".parse().unwrap(); 2];
        let result = tokio::time::timeout(Duration::from_millis(200), serve(&addrs, app())).await;
        assert!(result.is_err(), "listeners should keep running");
    }
}
