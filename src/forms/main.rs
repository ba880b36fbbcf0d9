use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::statement::{NewStatement, StatementKind};
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
pub struct AddStatementForm {
    #[validate(length(min = 1))]
    pub account: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub kind: String,
    /// Balance as a decimal string, e.g. `-1234.56`.
    pub balance: String,
    #[validate(length(min = 3, max = 3))]
    pub currency: String,
}

impl AddStatementForm {
    pub fn to_new_statement(&self) -> Result<NewStatement, FormError> {
        if self.period_end < self.period_start {
            return Err(FormError::InvalidPeriod);
        }

        Ok(NewStatement::new(
            self.account.clone(),
            self.period_start,
            self.period_end,
            StatementKind::from(self.kind.as_str()),
            parse_balance_cents(&self.balance)?,
            self.currency.clone(),
        ))
    }
}

#[derive(MultipartForm)]
pub struct UploadStatementsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

#[derive(Deserialize)]
struct StatementCsvRow {
    account: String,
    period_start: NaiveDate,
    period_end: NaiveDate,
    kind: String,
    balance: String,
    currency: String,
}

impl UploadStatementsForm {
    /// Parses the uploaded CSV into statement records. Expected header:
    /// `account,period_start,period_end,kind,balance,currency`.
    pub fn parse(&mut self) -> Result<Vec<NewStatement>, FormError> {
        let file = self
            .csv
            .file
            .reopen()
            .map_err(|e| FormError::InvalidCsv(e.to_string()))?;
        let mut reader = csv::Reader::from_reader(file);

        let mut statements = Vec::new();
        for (line, result) in reader.deserialize::<StatementCsvRow>().enumerate() {
            let row = result.map_err(|e| FormError::InvalidCsv(e.to_string()))?;
            if row.period_end < row.period_start {
                return Err(FormError::InvalidCsv(format!(
                    "record {}: period end precedes period start",
                    line + 1
                )));
            }
            statements.push(NewStatement::new(
                row.account,
                row.period_start,
                row.period_end,
                StatementKind::from(row.kind.as_str()),
                parse_balance_cents(&row.balance)?,
                row.currency,
            ));
        }

        Ok(statements)
    }
}

/// Parses a decimal amount string into integer cents without going through
/// floating point.
fn parse_balance_cents(raw: &str) -> Result<i64, FormError> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    if whole.is_empty() || fraction.len() > 2 {
        return Err(FormError::InvalidAmount);
    }

    let whole: i64 = whole.parse().map_err(|_| FormError::InvalidAmount)?;
    let fraction: i64 = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{fraction:0<2}");
        padded.parse().map_err(|_| FormError::InvalidAmount)?
    };

    let cents = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or(FormError::InvalidAmount)?;

    Ok(if negative { -cents } else { cents })
}
