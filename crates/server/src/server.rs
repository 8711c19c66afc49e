use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::headers::{Error as AxumError, Header, HeaderMapExt};

use std::sync::Arc;

use crate::{budgets, goals, reports, transactions};
use engine::Engine;

static USER_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-user-id");

/// Report defaults applied when a request does not override them.
#[derive(Clone, Copy, Debug)]
pub struct ReportSettings {
    /// Length of the dashboard's income vs expense series.
    pub series_months: u32,
    pub include_unpaid_in_balance: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            series_months: 6,
            include_unpaid_in_balance: false,
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub reports: ReportSettings,
}

/// Caller identity, inserted into request extensions by [`identify`].
#[derive(Clone, Debug)]
pub struct UserId(pub String);

/// `TypedHeader` for the caller identity
///
/// Every request must contain a non-empty "x-user-id" entry in the header.
#[derive(Debug)]
struct UserHeader(String);

impl Header for UserHeader {
    fn name() -> &'static axum::http::HeaderName {
        &USER_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(AxumError::invalid());
        }

        Ok(UserHeader(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-user-id header"),
        }
    }
}

async fn identify(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let user = match request.headers().typed_try_get::<UserHeader>() {
        Ok(Some(header)) => header.0,
        Ok(None) | Err(_) => return Err(StatusCode::UNAUTHORIZED),
    };

    request.extensions_mut().insert(UserId(user));
    Ok(next.run(request).await)
}

pub fn router(engine: Arc<Engine>, reports: ReportSettings) -> Router {
    let state = ServerState { engine, reports };
    Router::new()
        .route("/dashboard-summary", get(reports::dashboard))
        .route("/reports", get(reports::breakdown))
        .route("/reports/monthly", get(reports::monthly))
        .route("/reports/series", get(reports::series))
        .route("/balance", get(reports::balance))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route(
            "/transactions/{id}/toggle-paid",
            post(transactions::toggle_paid),
        )
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route("/budgets/status", get(budgets::status))
        .route("/budgets/{id}", put(budgets::update).delete(budgets::delete))
        .route("/goals", get(goals::list).post(goals::create))
        .route("/goals/{id}", put(goals::update).delete(goals::delete))
        .route_layer(middleware::from_fn(identify))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    reports: ReportSettings,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine), reports)).await
}
