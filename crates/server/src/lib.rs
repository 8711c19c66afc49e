use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use api_types::ErrorBody;
pub use server::{ReportSettings, router, run_with_listener};

mod budgets;
mod goals;
mod parse;
mod reports;
mod server;
mod transactions;

pub mod types {
    pub mod transaction {
        pub use api_types::transaction::{
            TransactionKind, TransactionList, TransactionListResponse, TransactionNew,
            TransactionUpdate, TransactionView,
        };
    }

    pub mod budget {
        pub use api_types::budget::{
            BudgetNew, BudgetStatus, BudgetStatusView, BudgetUpdate, BudgetView,
        };
    }

    pub mod goal {
        pub use api_types::goal::{GoalNew, GoalUpdate, GoalView};
    }

    pub mod report {
        pub use api_types::report::{
            BalanceView, ChartData, DashboardSummary, MonthlyTotalsView, SeriesPointView, Summary,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::InvalidMonthFormat(_)
        | EngineError::InvalidRange(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidCategory(_)
        | EngineError::InvalidCursor(_)
        | EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), err.to_string()),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
