//! The `tower` layer and service.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use pin_context::scope;
use tower::{Layer, Service};
use tracing::debug;

use crate::config::PinConfig;
use crate::resolve::resolve_inbound;
use crate::store::store_outbound;

/// Wraps a service with routing-context propagation.
#[derive(Debug, Clone, Default)]
pub struct PinLayer {
    config: Arc<PinConfig>,
}

impl PinLayer {
    pub fn new(config: PinConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl<S> Layer<S> for PinLayer {
    type Service = PinService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PinService {
            inner,
            config: self.config.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PinService<S> {
    inner: S,
    config: Arc<PinConfig>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for PinService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        // Use the service that was polled ready, leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        if self.config.is_ignored(request.uri().path()) {
            return Box::pin(inner.call(request));
        }

        let inbound = resolve_inbound(&self.config, request.uri(), request.headers());
        debug!(
            "Routing context for {}: {:?} (current: {}, previous: {})",
            request.uri().path(),
            inbound.resolution,
            inbound.current,
            inbound.previous,
        );

        let request_scope = inbound.into_scope();
        request.extensions_mut().insert(request_scope.clone());

        let config = self.config.clone();
        let future = scope::with_scope_sync(request_scope.clone(), || inner.call(request));

        Box::pin(async move {
            let mut response = scope::with_scope(request_scope.clone(), future).await?;
            let status = response.status();
            store_outbound(&config, &request_scope, status, response.headers_mut());
            Ok(response)
        })
    }
}
