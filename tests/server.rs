//! HTTP server tests over a real socket.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::StatusCode;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use webapi_dispatch::config::WebApiConfig;
use webapi_dispatch::http::DispatchPool;
use webapi_dispatch::lifecycle::Shutdown;
use webapi_dispatch::{web_api_handler, HttpServer, WebApiHttpContext, WebApiRouter};

mod common;

use common::TestObject;

static SLOW_ACTIVE: AtomicUsize = AtomicUsize::new(0);
static SLOW_PEAK: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct SlowHandler;

web_api_handler! {
    #[handler("Slow")]
    impl SlowHandler {
        #[get]
        pub fn Work(&self, context: WebApiHttpContext) {
            let active = SLOW_ACTIVE.fetch_add(1, Ordering::SeqCst) + 1;
            SLOW_PEAK.fetch_max(active, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(2500));
            SLOW_ACTIVE.fetch_sub(1, Ordering::SeqCst);
            context.response().write_no_content();
        }
    }
}

type Serving = (SocketAddr, Shutdown, JoinHandle<std::io::Result<()>>);

async fn start_server(config: WebApiConfig) -> Serving {
    start_server_with(config, common::router()).await.0
}

async fn start_server_with(config: WebApiConfig, router: WebApiRouter) -> (Serving, DispatchPool) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, router);
    let pool = server.dispatch_pool().clone();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));
    ((addr, shutdown, handle), pool)
}

#[tokio::test]
async fn test_get_through_server() {
    let (addr, shutdown, handle) = start_server(WebApiConfig::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("http://{addr}/api/v1/test/Hello1?name=Justin&age=10"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.unwrap(), "\"Hello Justin, your age is 10\"");

    let obj: TestObject = client
        .get(format!("http://{addr}/api/test"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(obj.name, "Justin");
    assert_eq!(obj.age, 10);

    drop(client);
    shutdown.trigger();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_post_bodies_through_server() {
    let (addr, shutdown, handle) = start_server(WebApiConfig::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/api/test"))
        .json(&TestObject {
            name: "Justin".into(),
            age: 10,
        })
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "\"Hello Justin, your age is 10\"");

    let resp = client
        .post(format!("http://{addr}/api/v1/test/Hello4"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("Name=Ann&Age=7")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.text().await.unwrap(), "\"Hello Ann, your age is 7\"");

    let resp = client
        .post(format!("http://{addr}/api/v1/test/Hello4"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    drop(client);
    shutdown.trigger();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_error_statuses_through_server() {
    let (addr, shutdown, handle) = start_server(WebApiConfig::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("http://{addr}/nothing/here"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .get(format!("http://{addr}/api/v2/items/Explode"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = client
        .delete(format!("http://{addr}/api/v2/items/Remove?id=1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    drop(client);
    shutdown.trigger();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = WebApiConfig::default();
    config.dispatch.max_body_bytes = 16;
    let (addr, shutdown, handle) = start_server(config).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/v1/test/Hello4"))
        .header("content-type", "application/json")
        .body(r#"{"Name":"A very long name indeed","Age":10}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    shutdown.trigger();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_provided_request_id_is_propagated() {
    let (addr, shutdown, handle) = start_server(WebApiConfig::default()).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/api/v1/test/GetObject"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "req-42");

    shutdown.trigger();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_timed_out_dispatch_keeps_its_slot() {
    let mut config = WebApiConfig::default();
    config.dispatch.max_concurrent_requests = 1;
    config.timeouts.request_secs = 1;
    let router = WebApiRouter::builder()
        .application_name(common::APPLICATION_NAME)
        .handler::<SlowHandler>()
        .build()
        .unwrap();
    let ((addr, shutdown, handle), _pool) = start_server_with(config, router).await;
    let client = reqwest::Client::new();

    // Each request times out while the handler keeps running on the blocking pool.
    let mut requests = Vec::new();
    for i in 0..3u64 {
        let client = client.clone();
        let url = format!("http://{addr}/api/slow/Work");
        requests.push(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1100 * i)).await;
            client.get(url).send().await.unwrap().status()
        }));
    }
    for request in requests {
        assert_eq!(request.await.unwrap(), StatusCode::REQUEST_TIMEOUT);
    }

    while SLOW_ACTIVE.load(Ordering::SeqCst) > 0 {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(SLOW_PEAK.load(Ordering::SeqCst), 1);

    drop(client);
    shutdown.trigger();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_shutdown_closes_dispatch_pool() {
    let ((_addr, shutdown, handle), pool) =
        start_server_with(WebApiConfig::default(), common::router()).await;
    assert!(pool.acquire().await.is_some());

    shutdown.trigger();
    handle.await.unwrap().unwrap();
    assert!(pool.acquire().await.is_none());
}
