use axum::handler::Handler;
use axum::http::HeaderName;
use axum::routing::get;
use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::WardAxumState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub struct WardApp {
    pub state: WardAxumState,
    pub router: Router<()>,
}

impl Clone for WardApp {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            router: self.router.clone(),
        }
    }
}

impl WardApp {
    pub fn new(state: WardAxumState) -> Self {
        Self {
            state,
            router: Router::new(),
        }
    }

    pub fn use_router(mut self, path: &str, router: Router<()>) -> Self {
        self.router = self.router.nest(path, router);
        self
    }

    /// Mount a GET handler at `path`.
    pub fn service<H, T>(mut self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()> + Clone + Send + Sync + 'static,
        T: 'static,
    {
        self.router = self.router.route(path, get(handler));
        self
    }

    /// The finished router: request ids and tracing around every route.
    pub fn into_router(self) -> Router<()> {
        let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
        self.router
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, "listening");
        }
        axum::serve(listener, self.into_router()).await?;
        Ok(())
    }
}
