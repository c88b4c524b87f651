//! Test harness: spawns a real server on a free port and drives it over HTTP.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use shelter_api::{AppState, create_router};

pub struct TestServer {
    client: reqwest::Client,
    base_url: String,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let port = portpicker::pick_unused_port().expect("no free port");
        let addr = format!("127.0.0.1:{port}");

        let state = Arc::new(AppState::new());
        let router = create_router(state);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .expect("bind test listener");

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    shutdown_rx.changed().await.ok();
                })
                .await
        });

        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{addr}"),
            shutdown_tx,
            handle,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .unwrap()
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn put_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .put(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}{path}", self.base_url))
            .send()
            .await
            .unwrap()
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }
}
