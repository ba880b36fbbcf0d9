use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::statement::{
    FinancialStatement as DomainStatement, NewStatement as DomainNewStatement,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::statements)]
/// Diesel model for [`crate::domain::statement::FinancialStatement`].
pub struct Statement {
    pub id: i32,
    pub account: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub kind: String,
    pub balance_cents: i64,
    pub currency: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::statements)]
pub struct NewStatement<'a> {
    pub account: &'a str,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub kind: String,
    pub balance_cents: i64,
    pub currency: &'a str,
}

impl From<Statement> for DomainStatement {
    fn from(statement: Statement) -> Self {
        Self {
            id: statement.id,
            account: statement.account,
            period_start: statement.period_start,
            period_end: statement.period_end,
            kind: statement.kind.into(),
            balance_cents: statement.balance_cents,
            currency: statement.currency,
            created_at: statement.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewStatement> for NewStatement<'a> {
    fn from(statement: &'a DomainNewStatement) -> Self {
        Self {
            account: statement.account.as_str(),
            period_start: statement.period_start,
            period_end: statement.period_end,
            kind: statement.kind.to_string(),
            balance_cents: statement.balance_cents,
            currency: statement.currency.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::statement::StatementKind;

    #[test]
    fn db_statement_into_domain() {
        let statement = Statement {
            id: 3,
            account: "1010-operating".to_string(),
            period_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            kind: "BalanceSheet".to_string(),
            balance_cents: 1_250_000,
            currency: "USD".to_string(),
            created_at: Utc::now().naive_utc(),
        };

        let domain: DomainStatement = statement.into();
        assert_eq!(domain.kind, StatementKind::BalanceSheet);
        assert_eq!(domain.balance_cents, 1_250_000);
    }
}
