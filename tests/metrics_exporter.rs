//! Prometheus exporter wiring. Kept in its own binary because the recorder is
//! installed process-wide.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use workflow_devserver::lifecycle::interrupt;
use workflow_devserver::server::{ports, EmbeddedServerFactory, Server, ServerFactory, ServerOptions};

mod common;

const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

async fn scrape(addr: SocketAddr) -> String {
    let client = common::client();
    for _ in 0..50 {
        if let Ok(res) = client.get(format!("http://{addr}/metrics")).send().await {
            if res.status().is_success() {
                return res.text().await.unwrap();
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("metrics endpoint {addr} never answered");
}

#[tokio::test]
async fn exporter_publishes_namespace_gauge_and_request_histogram() {
    let token = CancellationToken::new();
    let (_bridge, rx) = interrupt::arm(Some(token.clone()));
    let metrics_port = ports::allocate_free_port(LOCALHOST).unwrap();

    let options = ServerOptions {
        dynamic_ports: true,
        frontend_ip: LOCALHOST,
        frontend_port: 0,
        metrics_port,
        namespaces: vec!["default".into(), "orders".into()],
        interrupt: Some(rx),
        ..Default::default()
    };
    let server = EmbeddedServerFactory.build(options).unwrap();
    let frontend = server.frontend_addr();

    let handle = tokio::spawn(server.start());
    common::wait_until_serving(frontend).await;

    let body = scrape(SocketAddr::new(LOCALHOST, metrics_port)).await;

    let gauge = body
        .lines()
        .find(|line| line.starts_with("devserver_namespaces_enabled "))
        .unwrap_or_else(|| panic!("namespace gauge missing:\n{body}"));
    let value: f64 = gauge.rsplit(' ').next().unwrap().parse().unwrap();
    assert_eq!(value, 2.0);
    assert!(body.contains(r#"route="/health""#), "request counter missing:\n{body}");
    assert!(body.contains("# TYPE devserver_request_duration_seconds histogram"));
    assert!(body.contains("devserver_request_duration_seconds_bucket"));

    token.cancel();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}
