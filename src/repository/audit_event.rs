use diesel::prelude::*;

use crate::domain::audit_event::{AuditEvent, NewAuditEvent};
use crate::models::audit_event::{AuditEvent as DbAuditEvent, NewAuditEvent as DbNewAuditEvent};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{AuditEventListQuery, AuditEventReader, AuditEventWriter, DieselRepository};

impl AuditEventReader for DieselRepository {
    fn list_audit_events(
        &self,
        query: AuditEventListQuery,
    ) -> RepositoryResult<(usize, Vec<AuditEvent>)> {
        use crate::schema::audit_events;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = audit_events::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(event_type) = &query.event_type {
                items = items.filter(audit_events::event_type.eq(event_type.to_string()));
            }

            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = match query.search_field.as_deref() {
                    None => items.filter(
                        audit_events::actor
                            .like(pattern.clone())
                            .or(audit_events::event_type.like(pattern)),
                    ),
                    Some("actor") => items.filter(audit_events::actor.like(pattern)),
                    Some("event") => items.filter(audit_events::event_type.like(pattern)),
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

        let events = items
            .order(audit_events::created_at.desc())
            .load::<DbAuditEvent>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect::<Vec<AuditEvent>>();

        Ok((total, events))
    }
}

impl AuditEventWriter for DieselRepository {
    fn create_audit_event(&self, event: &NewAuditEvent) -> RepositoryResult<AuditEvent> {
        use crate::schema::audit_events;

        let mut conn = self.conn()?;
        let insertable: DbNewAuditEvent = event.into();
        let event = diesel::insert_into(audit_events::table)
            .values(&insertable)
            .get_result::<DbAuditEvent>(&mut conn)?;

        Ok(event.into())
    }
}
