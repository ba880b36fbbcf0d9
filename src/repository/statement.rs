use diesel::prelude::*;

use crate::domain::statement::{FinancialStatement, NewStatement};
use crate::domain::types::StatementId;
use crate::models::statement::{NewStatement as DbNewStatement, Statement as DbStatement};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, StatementListQuery, StatementReader, StatementWriter};

impl StatementReader for DieselRepository {
    fn list_statements(
        &self,
        query: StatementListQuery,
    ) -> RepositoryResult<(usize, Vec<FinancialStatement>)> {
        use crate::schema::statements;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = statements::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = match query.search_field.as_deref() {
                    None => items.filter(
                        statements::account
                            .like(pattern.clone())
                            .or(statements::kind.like(pattern.clone()))
                            .or(statements::currency.like(pattern)),
                    ),
                    Some("account") => items.filter(statements::account.like(pattern)),
                    Some("kind") => items.filter(statements::kind.like(pattern)),
                    Some("currency") => items.filter(statements::currency.like(pattern)),
                    Some(other) => {
                        return Err(RepositoryError::ValidationError(format!(
                            "Unknown search field: {other}"
                        )));
                    }
                };
            }
            Ok(items)
        };

        let total = query_builder()?.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder()?;
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let statements = items
            .order((statements::period_end.desc(), statements::id.asc()))
            .load::<DbStatement>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect::<Vec<FinancialStatement>>();

        Ok((total, statements))
    }
}

impl StatementWriter for DieselRepository {
    fn create_statements(&self, new_statements: &[NewStatement]) -> RepositoryResult<usize> {
        use crate::schema::statements;

        let mut conn = self.conn()?;
        let insertables: Vec<DbNewStatement> = new_statements.iter().map(Into::into).collect();
        let affected = diesel::insert_into(statements::table)
            .values(&insertables)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_statement(&self, id: StatementId) -> RepositoryResult<()> {
        use crate::schema::statements;

        let mut conn = self.conn()?;
        diesel::delete(statements::table.find(id.get())).execute(&mut conn)?;
        Ok(())
    }
}
