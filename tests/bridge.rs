//! End-to-end tests: legacy handlers served over real HTTP.

use std::io::{Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    Router,
};
use legacy_bridge::adapter::LegacyAdapter;
use legacy_bridge::host::UserValueExt;
use legacy_bridge::http::{demo_routes, RequestIdExt, X_REQUEST_ID};
use legacy_bridge::legacy::{LegacyRequest, ResponseWriter};

mod common;

/// What the legacy handler observed, checked after the response arrives.
#[derive(Debug, Default, Clone)]
struct Observed {
    method: String,
    proto: String,
    request_uri: String,
    path: String,
    content_length: u64,
    host: String,
    remote_addr: String,
    body: String,
    foo_bar: Option<String>,
    abc: Option<String>,
    context_value: Option<String>,
    request_id: Option<String>,
}

async fn set_context_value(mut req: Request<Body>, next: Next) -> Response {
    req.set_user_value("contextKey", "contextValue".to_string());
    next.run(req).await
}

#[tokio::test]
async fn test_legacy_handler_over_http() {
    let calls = Arc::new(AtomicUsize::new(0));
    let observed = Arc::new(Mutex::new(Observed::default()));

    let handler = {
        let calls = Arc::clone(&calls);
        let observed = Arc::clone(&observed);
        move |w: &mut dyn ResponseWriter, r: &mut LegacyRequest| {
            calls.fetch_add(1, Ordering::SeqCst);

            let mut body = String::new();
            let _ = r.body.read_to_string(&mut body);
            r.body.close();

            *observed.lock().unwrap() = Observed {
                method: r.method.to_string(),
                proto: r.proto().to_string(),
                request_uri: r.request_uri.clone(),
                path: r.url.path().to_string(),
                content_length: r.content_length,
                host: r.host.clone(),
                remote_addr: r.remote_addr.clone(),
                body: body.clone(),
                foo_bar: r.header("Foo-Bar").map(str::to_string),
                abc: r.header("Abc").map(str::to_string),
                context_value: r.context().value::<String>("contextKey").cloned(),
                request_id: r.request_id().map(|id| id.to_string()),
            };

            w.header_mut()
                .insert("header1", HeaderValue::from_static("value1"));
            w.header_mut()
                .insert("header2", HeaderValue::from_static("value2"));
            w.write_header(StatusCode::BAD_REQUEST);
            let _ = write!(w, "request body is {:?}", body);
        }
    };

    let routes = Router::new()
        .route_service("/", LegacyAdapter::from_fn(handler).into_service())
        .layer(middleware::from_fn(set_context_value));
    let server = common::start_server(routes).await;

    let expected_body = "body 123 foo bar baz";
    let res = common::client()
        .post(server.url("/"))
        .header("Foo-Bar", "baz")
        .header("Abc", "defg")
        .header(X_REQUEST_ID, "it-1")
        .body(expected_body)
        .send()
        .await
        .expect("bridge unreachable");

    assert_eq!(res.status(), 400);
    assert_eq!(res.headers().get("header1").unwrap(), "value1");
    assert_eq!(res.headers().get("header2").unwrap(), "value2");
    assert_eq!(res.headers().get(X_REQUEST_ID).unwrap(), "it-1");
    assert_eq!(
        res.text().await.unwrap(),
        format!("request body is {:?}", expected_body)
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let seen = observed.lock().unwrap().clone();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.proto, "HTTP/1.1");
    assert_eq!(seen.request_uri, "/");
    assert_eq!(seen.path, "/");
    assert_eq!(seen.content_length, expected_body.len() as u64);
    assert_eq!(seen.host, server.addr.to_string());
    assert!(seen.remote_addr.starts_with("127.0.0.1:"));
    assert_eq!(seen.body, expected_body);
    assert_eq!(seen.foo_bar.as_deref(), Some("baz"));
    assert_eq!(seen.abc.as_deref(), Some("defg"));
    assert_eq!(seen.context_value.as_deref(), Some("contextValue"));
    assert_eq!(seen.request_id.as_deref(), Some("it-1"));

    server.stop().await;
}

#[tokio::test]
async fn test_default_status_and_multi_valued_headers() {
    let handler = |w: &mut dyn ResponseWriter, _r: &mut LegacyRequest| {
        let h = w.header_mut();
        h.append("set-cookie", HeaderValue::from_static("session=abc"));
        h.append("set-cookie", HeaderValue::from_static("theme=dark"));
        let _ = w.write_all(b"part one, ");
        let _ = w.write_all(b"part two");
    };
    let routes = Router::new().route_service("/", LegacyAdapter::from_fn(handler).into_service());
    let server = common::start_server(routes).await;

    let res = common::client().get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let cookies: Vec<_> = res
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cookies, ["session=abc", "theme=dark"]);
    assert_eq!(res.text().await.unwrap(), "part one, part two");

    server.stop().await;
}

#[tokio::test]
async fn test_demo_echo_over_http() {
    let server = common::start_server(demo_routes()).await;

    let res = common::client()
        .put(server.url("/echo/widgets/9?dry_run=1"))
        .body("{\"name\":\"sprocket\"}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let request_id = res
        .headers()
        .get(X_REQUEST_ID)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let value: serde_json::Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
    assert_eq!(value["method"], "PUT");
    assert_eq!(value["path"], "/echo/widgets/9");
    assert_eq!(value["query"], "dry_run=1");
    assert_eq!(value["body"], "{\"name\":\"sprocket\"}");
    assert_eq!(value["content_length"], 19);
    assert_eq!(value["request_id"], request_id.as_str());

    server.stop().await;
}
