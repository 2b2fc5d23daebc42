//! # HTTP runner and health endpoint.
//!
//! [`HttpRunner`] serves an axum [`Router`] until the group's stop signal
//! fires, then shuts the server down gracefully and returns. Binding happens
//! inside `execute` (so a busy port becomes the group's outcome) unless a
//! pre-bound listener is supplied with [`HttpRunner::with_listener`].
//!
//! [`health_router`] exposes `GET /healthz`, answering `200 OK` with body `ok`.
//!
//! ```text
//! execute(stop)
//!   ├─► bind(addr) or take pre-bound listener   (io error ─► RunnerError::Io)
//!   └─► axum::serve(listener, router)
//!         .with_graceful_shutdown(stop.fired_owned())
//!         ├─ finished before stop        ─► result
//!         └─ stop fired ─► timeout(grace, serve)
//!                            ├─ Ok(res)  ─► res
//!                            └─ elapsed  ─► drop serve, Ok(())   (open connections abandoned)
//! ```
//!
//! Once the stop signal fired, in-flight requests get [`HttpRunner::DEFAULT_GRACE`]
//! (or the value set with [`HttpRunner::with_grace`]) to finish. A client that
//! stalls mid-request cannot hold the group open past that.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::time;

use crate::core::StopSignal;
use crate::error::RunnerError;
use crate::runners::Runner;

/// Path of the health endpoint.
pub const HEALTHZ_PATH: &str = "/healthz";

/// Router with the health endpoint only.
pub fn health_router() -> Router {
    Router::new().route(HEALTHZ_PATH, get(healthz))
}

async fn healthz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

enum Bind {
    Addr(SocketAddr),
    Listener(Mutex<Option<TcpListener>>),
}

/// Serves a router until the stop signal fires.
pub struct HttpRunner {
    router: Router,
    bind: Bind,
    local_addr: Option<SocketAddr>,
    grace: Duration,
}

impl HttpRunner {
    /// Time in-flight requests get after the stop signal fired.
    pub const DEFAULT_GRACE: Duration = Duration::from_secs(1);

    /// Serves `router` on `addr`; the socket is bound when the runner starts.
    pub fn new(addr: SocketAddr, router: Router) -> Self {
        Self {
            router,
            bind: Bind::Addr(addr),
            local_addr: None,
            grace: Self::DEFAULT_GRACE,
        }
    }

    /// Serves `router` on an already bound listener.
    pub fn with_listener(listener: TcpListener, router: Router) -> Self {
        let local_addr = listener.local_addr().ok();
        Self {
            router,
            bind: Bind::Listener(Mutex::new(Some(listener))),
            local_addr,
            grace: Self::DEFAULT_GRACE,
        }
    }

    /// Sets how long in-flight requests may run after stop; `Duration::ZERO`
    /// drops them right away.
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Address of a pre-bound listener; `None` when binding lazily.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    async fn listener(&self) -> Result<TcpListener, RunnerError> {
        match &self.bind {
            Bind::Addr(addr) => Ok(TcpListener::bind(*addr).await?),
            Bind::Listener(slot) => slot
                .lock()
                .await
                .take()
                .ok_or_else(|| RunnerError::fail("listener already consumed by an earlier run")),
        }
    }
}

#[async_trait]
impl Runner for HttpRunner {
    fn name(&self) -> &str {
        "http"
    }

    async fn execute(&self, stop: StopSignal) -> Result<(), RunnerError> {
        let listener = self.listener().await?;
        let addr = listener.local_addr()?;
        tracing::debug!(listen = %addr, "http runner listening");

        let serve = axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(stop.fired_owned())
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            res = &mut serve => res?,
            () = stop.fired() => match time::timeout(self.grace, &mut serve).await {
                Ok(res) => res?,
                Err(_elapsed) => tracing::warn!(
                    listen = %addr,
                    grace = ?self.grace,
                    "http runner dropped open connections after grace period"
                ),
            },
        }

        tracing::debug!(listen = %addr, "http runner stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tower::ServiceExt;

    use super::*;
    use crate::{Group, RunnerFn, RunnerRef};

    async fn call(method: Method, uri: &str) -> (StatusCode, String) {
        let resp = health_router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn probe_healthz(addr: SocketAddr) -> Result<(), RunnerError> {
        let mut stream = TcpStream::connect(addr).await?;
        stream
            .write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await?;
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await?;
        if raw.starts_with("HTTP/1.1 200") && raw.ends_with("ok") {
            Ok(())
        } else {
            Err(RunnerError::fail(format!("unexpected response: {raw}")))
        }
    }

    #[tokio::test]
    async fn healthz_answers_ok() {
        assert_eq!(
            call(Method::GET, "/healthz").await,
            (StatusCode::OK, "ok".to_string())
        );
    }

    #[tokio::test]
    async fn healthz_rejects_other_methods_and_paths() {
        assert_eq!(
            call(Method::POST, "/healthz").await.0,
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(call(Method::GET, "/metrics").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serves_until_group_stops() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let web = HttpRunner::with_listener(listener, health_router());
        let addr = web.local_addr().unwrap();

        let probe: RunnerRef =
            RunnerFn::arc("probe", move |_stop: StopSignal| probe_healthz(addr));

        let group = Group::builder()
            .with_runner(Arc::new(web))
            .with_runner(probe)
            .build();
        group.run().await.unwrap();
    }

    #[tokio::test]
    async fn stalled_client_does_not_block_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let web = HttpRunner::with_listener(listener, health_router())
            .with_grace(Duration::from_millis(50));
        let addr = web.local_addr().unwrap();

        // Keeps the half-written request open until the test ends.
        let held: Arc<std::sync::Mutex<Vec<TcpStream>>> = Arc::default();
        let hold = Arc::clone(&held);
        let stall: RunnerRef = RunnerFn::arc("stall", move |_stop: StopSignal| {
            let hold = Arc::clone(&hold);
            async move {
                let mut stream = TcpStream::connect(addr).await?;
                stream.write_all(b"GET /healthz HTTP/1.1\r\nHost: x\r\n").await?;
                tokio::time::sleep(Duration::from_millis(50)).await;
                hold.lock().unwrap().push(stream);
                Ok::<(), RunnerError>(())
            }
        });

        let group = Group::builder()
            .with_runner(Arc::new(web))
            .with_runner(stall)
            .build();
        tokio::time::timeout(Duration::from_secs(5), group.run())
            .await
            .expect("http runner must return within its grace period")
            .unwrap();
        assert_eq!(held.lock().unwrap().len(), 1);
    }

    #[test]
    fn grace_defaults_and_overrides() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let web = HttpRunner::new(addr, health_router());
        assert_eq!(web.grace, HttpRunner::DEFAULT_GRACE);
        assert_eq!(web.with_grace(Duration::ZERO).grace, Duration::ZERO);
    }

    #[tokio::test]
    async fn busy_port_becomes_io_error() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let web = HttpRunner::new(taken.local_addr().unwrap(), health_router());
        assert!(web.local_addr().is_none());

        let err = web.execute(StopSignal::never()).await.unwrap_err();
        assert!(matches!(err, RunnerError::Io { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn pre_bound_listener_is_used_once() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let web = HttpRunner::with_listener(listener, health_router());
        let _ = web.listener().await.unwrap();
        let err = web.listener().await.unwrap_err();
        assert!(matches!(err, RunnerError::Fail { .. }));
    }
}
