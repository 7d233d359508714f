// In-process stand-in for the risk API, used by client, service and state tests

use crate::client::{ApiClient, CookieSource};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;

pub(crate) struct FakeBackend {
    addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl FakeBackend {
    /// Serve `router` on an ephemeral localhost port
    pub(crate) async fn spawn(router: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("fake backend serves");
        });

        Self { addr, handle }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub(crate) fn client(&self, cookies: Arc<dyn CookieSource>) -> ApiClient {
        ApiClient::with_http(reqwest::Client::new(), &self.base_url(), cookies)
            .expect("fake backend URL is valid")
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A base URL nothing listens on, for transport-failure tests
pub(crate) fn unreachable_client() -> ApiClient {
    ApiClient::with_http(
        reqwest::Client::new(),
        "http://127.0.0.1:9",
        Arc::new(crate::client::NoCookies),
    )
    .expect("static URL is valid")
}
