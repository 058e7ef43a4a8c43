//! Group gate in front of a Router: decide → forward (`next.run`) or reject.
//!
//! The routes of the wrapped Router are the downstream handler. The gate
//! writes nothing on success; on failure it writes exactly one plain-text
//! response and the downstream is never invoked.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::authz::GroupGate;
use crate::error::GateError;

/// Put `gate` in front of every route of `router`.
///
/// ```ignore
/// let gate = Arc::new(GroupGate::new("api", GateConfig::with_groups(["dev"]))?);
/// let v1 = middleware::authz::apply(api::v1::routes(), gate);
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply<S>(router: Router<S>, gate: Arc<GroupGate>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, authz_middleware))
}

async fn authz_middleware(
    State(gate): State<Arc<GroupGate>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GateError> {
    match gate.authorize(req.headers()) {
        Ok(group) => {
            tracing::debug!(gate = %gate.name(), group = %group, "request authorized");
        }
        Err(err) => {
            // never log the token itself
            tracing::warn!(
                gate = %gate.name(),
                status = err.status().as_u16(),
                error = %err,
                "request denied"
            );
            return Err(err);
        }
    }

    Ok(next.run(req).await)
}
