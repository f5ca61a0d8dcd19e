//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use workflow_devserver::config::LauncherConfig;

/// A config bound to localhost with every port picked dynamically.
pub fn local_config() -> LauncherConfig {
    let mut config = LauncherConfig::default();
    config.frontend.ip = "127.0.0.1".to_string();
    config.frontend.port = 0;
    config.ui.port = 0;
    config
}

/// HTTP client that never reuses connections or goes through a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap()
}

/// Poll `GET http://{addr}/health` until it answers 200.
pub async fn wait_until_serving(addr: SocketAddr) {
    let client = client();
    for _ in 0..50 {
        if let Ok(res) = client.get(format!("http://{addr}/health")).send().await {
            if res.status().is_success() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("{addr} never became healthy");
}
