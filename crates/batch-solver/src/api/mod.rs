//! Serve a solver engine API.

use {
    crate::domain::solver::Solver,
    std::{future::Future, net::SocketAddr},
    tokio::sync::oneshot,
};

mod routes;

pub struct Api {
    pub addr: SocketAddr,
    pub solver: Solver,
}

impl Api {
    pub async fn serve(
        self,
        bind: Option<oneshot::Sender<SocketAddr>>,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let app = axum::Router::new()
            .route("/solve", axum::routing::post(routes::solve))
            .route("/notify", axum::routing::post(routes::notify))
            .route("/healthz", axum::routing::get(routes::healthz))
            .route("/metrics", axum::routing::get(routes::metrics))
            // Auctions with a lot of liquidity easily exceed the default body
            // limit.
            .layer(axum::extract::DefaultBodyLimit::disable())
            .layer(
                tower::ServiceBuilder::new().layer(tower_http::trace::TraceLayer::new_for_http()),
            )
            .with_state(self.solver);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "serving batch solver");
        if let Some(bind) = bind {
            let _ = bind.send(local_addr);
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
