//! JSON request and response bodies of the HTTP API.
//!
//! Money travels as a JSON number (`rust_decimal::serde::float`), dates as
//! `YYYY-MM-DD`, months as `YYYY-MM` and categories as their display label
//! (`"Alimentação"`, `"Lazer"`, ...).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Returned by every create endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: Uuid,
}

fn default_true() -> bool {
    true
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub date: NaiveDate,
        pub description: String,
        pub category: String,
        /// Signed: positive = income, negative = expense.
        #[serde(with = "rust_decimal::serde::float")]
        pub amount: Decimal,
        /// Derived from the sign of `amount` when absent.
        #[serde(rename = "type", default)]
        pub kind: Option<TransactionKind>,
        #[serde(default = "default_true")]
        pub is_paid: bool,
    }

    /// Partial update: absent fields keep their stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        #[serde(default)]
        pub date: Option<NaiveDate>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default, with = "rust_decimal::serde::float_option")]
        pub amount: Option<Decimal>,
        #[serde(rename = "type", default)]
        pub kind: Option<TransactionKind>,
        #[serde(default)]
        pub is_paid: Option<bool>,
    }

    /// Query string of `GET /transactions`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        /// Inclusive.
        pub from: Option<NaiveDate>,
        /// Inclusive.
        pub to: Option<NaiveDate>,
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        ///
        /// Newest → older pagination.
        pub cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub description: String,
        pub category: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub amount: Decimal,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub is_paid: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category: String,
        /// `YYYY-MM`.
        pub month: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub limit: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        #[serde(with = "rust_decimal::serde::float")]
        pub limit: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub category: String,
        pub month: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub limit: Decimal,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum BudgetStatus {
        Ok,
        Warning,
        Exceeded,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatusView {
        pub budget_id: Uuid,
        pub category: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub limit: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        pub spent: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        pub remaining: Decimal,
        pub percentage: u64,
        pub status: BudgetStatus,
    }
}

pub mod goal {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub target_amount: Decimal,
        #[serde(default, with = "rust_decimal::serde::float")]
        pub saved_amount: Decimal,
    }

    /// Partial update: absent fields keep their stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GoalUpdate {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default, with = "rust_decimal::serde::float_option")]
        pub target_amount: Option<Decimal>,
        #[serde(default, with = "rust_decimal::serde::float_option")]
        pub saved_amount: Option<Decimal>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub target_amount: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        pub saved_amount: Decimal,
        /// Whole percent, may exceed 100.
        pub progress: u64,
    }
}

pub mod report {
    use super::*;

    /// Query string carrying an optional `YYYY-MM` month.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MonthQuery {
        pub month: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SeriesQuery {
        pub start: String,
        pub months: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceQuery {
        pub as_of: Option<NaiveDate>,
        pub include_unpaid: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub as_of: NaiveDate,
        #[serde(with = "rust_decimal::serde::float")]
        pub balance: Decimal,
        pub include_unpaid: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTotalsView {
        pub month: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub income: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        pub expenses: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        pub net: Decimal,
    }

    /// Category breakdown as parallel arrays, ready for a chart.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ChartData {
        pub labels: Vec<String>,
        #[serde(with = "float_seq")]
        pub data: Vec<Decimal>,
    }

    /// `rust_decimal::serde::float` applied to every element of a list.
    mod float_seq {
        use rust_decimal::Decimal;
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        #[derive(Serialize, Deserialize)]
        #[serde(transparent)]
        struct Float(#[serde(with = "rust_decimal::serde::float")] Decimal);

        pub fn serialize<S: Serializer>(
            values: &[Decimal],
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(values.iter().copied().map(Float))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<Decimal>, D::Error> {
            let values = Vec::<Float>::deserialize(deserializer)?;
            Ok(values.into_iter().map(|Float(value)| value).collect())
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SeriesPointView {
        pub month: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub income: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        pub expenses: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Summary {
        #[serde(with = "rust_decimal::serde::float")]
        pub saldo_total: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        pub receitas_mes: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        pub despesas_mes: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        pub economia_mes: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DashboardSummary {
        pub summary: Summary,
        pub expenses_by_category: ChartData,
        pub income_vs_expense: Vec<SeriesPointView>,
        /// Ids excluded from the figures because their kind disagrees with
        /// the sign of their amount.
        pub faulty_transactions: Vec<Uuid>,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn transaction_new_accepts_the_form_payload() {
        let body = r#"{
            "description": "Ônibus",
            "amount": -150.5,
            "date": "2024-07-05",
            "category": "Transporte",
            "type": "expense"
        }"#;
        let parsed: transaction::TransactionNew = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.amount, dec!(-150.5));
        assert_eq!(parsed.kind, Some(transaction::TransactionKind::Expense));
        assert!(parsed.is_paid);
    }

    #[test]
    fn update_fields_are_optional() {
        let parsed: transaction::TransactionUpdate =
            serde_json::from_str(r#"{"is_paid": false}"#).unwrap();
        assert_eq!(parsed.is_paid, Some(false));
        assert!(parsed.amount.is_none());
        assert!(parsed.kind.is_none());
    }

    #[test]
    fn dashboard_uses_camel_case_keys_and_numbers() {
        let summary = report::DashboardSummary {
            summary: report::Summary {
                saldo_total: dec!(12450.75),
                receitas_mes: dec!(7500.00),
                despesas_mes: dec!(4890.30),
                economia_mes: dec!(2609.70),
            },
            expenses_by_category: report::ChartData::default(),
            income_vs_expense: Vec::new(),
            faulty_transactions: Vec::new(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["summary"]["saldoTotal"], serde_json::json!(12450.75));
        assert_eq!(json["summary"]["economiaMes"], serde_json::json!(2609.7));
        assert!(json["expensesByCategory"]["labels"].is_array());
        assert!(json["incomeVsExpense"].is_array());
        assert!(json["faultyTransactions"].is_array());
    }

    #[test]
    fn chart_data_travels_as_numbers() {
        let chart = report::ChartData {
            labels: vec!["Lazer".to_string(), "Moradia".to_string()],
            data: vec![dec!(40.50), dec!(1850.5)],
        };
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["data"], serde_json::json!([40.5, 1850.5]));

        let parsed: report::ChartData = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.data, vec![dec!(40.5), dec!(1850.5)]);
    }

    #[test]
    fn budget_status_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&budget::BudgetStatus::Exceeded).unwrap(),
            "\"exceeded\""
        );
    }
}
