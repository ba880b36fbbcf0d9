use std::fmt::Display;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Financial statement row shown on the index screen.
///
/// Balances are integer cents; the console stores and renders them but
/// never computes with them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FinancialStatement {
    pub id: i32,
    pub account: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub kind: StatementKind,
    pub balance_cents: i64,
    pub currency: String,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum StatementKind {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
    Other(String),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewStatement {
    pub account: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub kind: StatementKind,
    pub balance_cents: i64,
    pub currency: String,
}

impl NewStatement {
    #[must_use]
    pub fn new(
        account: String,
        period_start: NaiveDate,
        period_end: NaiveDate,
        kind: StatementKind,
        balance_cents: i64,
        currency: String,
    ) -> Self {
        Self {
            account: account.trim().to_string(),
            period_start,
            period_end,
            kind,
            balance_cents,
            currency: currency.trim().to_uppercase(),
        }
    }
}

impl Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatementKind::BalanceSheet => write!(f, "BalanceSheet"),
            StatementKind::IncomeStatement => write!(f, "IncomeStatement"),
            StatementKind::CashFlow => write!(f, "CashFlow"),
            StatementKind::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for StatementKind {
    fn from(s: &str) -> Self {
        match s {
            "BalanceSheet" => StatementKind::BalanceSheet,
            "IncomeStatement" => StatementKind::IncomeStatement,
            "CashFlow" => StatementKind::CashFlow,
            _ => StatementKind::Other(s.to_string()),
        }
    }
}

impl From<String> for StatementKind {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}
