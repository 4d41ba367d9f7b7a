//! Tower service wrapper so adapted handlers mount on an axum `Router`.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tower::Service;

use crate::adapter::{AdapterError, LegacyAdapter};
use crate::host::{Transaction, UNKNOWN_REMOTE_ADDR};
use crate::legacy::LegacyHandler;

/// A `tower::Service` that serves requests with a legacy handler.
///
/// The request body is buffered in full before the handler runs. The peer
/// address comes from axum's `ConnectInfo`, when the server provides it.
/// When the target cannot be parsed, the 500 response carries the
/// `AdapterError` in its extensions.
pub struct LegacyService<H> {
    adapter: LegacyAdapter<H>,
}

impl<H: LegacyHandler> LegacyService<H> {
    pub fn new(adapter: LegacyAdapter<H>) -> Self {
        Self { adapter }
    }
}

impl<H> Clone for LegacyService<H> {
    fn clone(&self) -> Self {
        Self {
            adapter: self.adapter.clone(),
        }
    }
}

impl<H> Service<Request<Body>> for LegacyService<H>
where
    H: LegacyHandler + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let adapter = self.adapter.clone();
        Box::pin(async move {
            let remote_addr = req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr)
                .unwrap_or(UNKNOWN_REMOTE_ADDR);

            let (parts, body) = req.into_parts();
            let body = match axum::body::to_bytes(body, usize::MAX).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to buffer request body");
                    return Ok((StatusCode::BAD_REQUEST, "Bad Request").into_response());
                }
            };

            let mut txn = Transaction::from_parts(parts, body, remote_addr);
            let outcome = adapter.call(&mut txn);
            let mut response = txn.into_response();
            if let Err(e) = outcome {
                response.extensions_mut().insert(e);
            }
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::UserValueExt;
    use crate::legacy::{LegacyRequest, ResponseWriter};
    use axum::http::Method;
    use std::io::{Read, Write};
    use tower::ServiceExt;

    fn echo_service() -> LegacyService<impl LegacyHandler> {
        LegacyAdapter::from_fn(|w: &mut dyn ResponseWriter, r: &mut LegacyRequest| {
            let mut body = Vec::new();
            let _ = r.body.read_to_end(&mut body);
            let user = r
                .context()
                .value::<String>("user")
                .cloned()
                .unwrap_or_else(|| "anonymous".to_string());
            w.header_mut()
                .insert("x-remote", r.remote_addr.parse().unwrap());
            w.write_header(StatusCode::ACCEPTED);
            let _ = write!(w, "{} {} {} ", r.method, r.url.path(), user);
            let _ = w.write_all(&body);
        })
        .into_service()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_service_round_trip() {
        let mut req = Request::builder()
            .method(Method::POST)
            .uri("/orders")
            .body(Body::from("qty=3"))
            .unwrap();
        req.set_user_value("user", "alice".to_string());
        req.extensions_mut()
            .insert(ConnectInfo::<SocketAddr>("10.0.0.7:5555".parse().unwrap()));

        let response = echo_service().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers().get("x-remote").unwrap(), "10.0.0.7:5555");
        assert_eq!(body_string(response).await, "POST /orders alice qty=3");
    }

    #[tokio::test]
    async fn test_service_without_connect_info() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = echo_service().oneshot(req).await.unwrap();
        assert_eq!(response.headers().get("x-remote").unwrap(), "0.0.0.0:0");
        assert!(response.extensions().get::<AdapterError>().is_none());
        assert_eq!(body_string(response).await, "GET / anonymous ");
    }

    #[tokio::test]
    async fn test_malformed_target_error_in_extensions() {
        let req = Request::builder().uri("/a%zzb").body(Body::empty()).unwrap();
        let response = echo_service().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        match response.extensions().get::<AdapterError>() {
            Some(AdapterError::MalformedTarget { target, source }) => {
                assert_eq!(target, "/a%zzb");
                assert_eq!(*source, crate::legacy::UrlError::InvalidEscape("%zz".into()));
            }
            None => panic!("missing AdapterError extension"),
        }
        assert_eq!(body_string(response).await, "Internal Server Error");
    }
}
