//! Diesel models for the audit trail.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::audit_event::{
    AuditEvent as DomainAuditEvent, NewAuditEvent as DomainNewAuditEvent,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::audit_events)]
pub struct AuditEvent {
    pub id: i32,
    pub actor: String,
    pub event_type: String,
    pub event_data: String, // store JSON text in the DB
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::audit_events)]
pub struct NewAuditEvent {
    pub actor: String,
    pub event_type: String,
    pub event_data: String,
    pub created_at: NaiveDateTime,
}

impl From<AuditEvent> for DomainAuditEvent {
    fn from(event: AuditEvent) -> Self {
        let event_data = serde_json::from_str(&event.event_data).unwrap_or_default();

        Self {
            id: event.id,
            actor: event.actor,
            event_type: event.event_type.into(),
            event_data,
            created_at: event.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewAuditEvent> for NewAuditEvent {
    fn from(event: &'a DomainNewAuditEvent) -> Self {
        Self {
            actor: event.actor.clone(),
            event_type: event.event_type.to_string(),
            event_data: event.event_data.to_string(),
            created_at: event.created_at,
        }
    }
}

impl From<DomainNewAuditEvent> for NewAuditEvent {
    fn from(event: DomainNewAuditEvent) -> Self {
        Self::from(&event)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::domain::audit_event::AuditEventType;

    #[test]
    fn event_data_round_trips_through_text() {
        let domain = DomainNewAuditEvent {
            actor: "ops@example.com".to_string(),
            event_type: AuditEventType::BackupCreated,
            event_data: json!({"filename": "backup-1.sqlite"}),
            created_at: Utc::now().naive_utc(),
        };

        let db: NewAuditEvent = (&domain).into();
        assert_eq!(db.event_type, "BackupCreated");

        let restored: serde_json::Value = serde_json::from_str(&db.event_data).unwrap();
        assert_eq!(restored["filename"], "backup-1.sqlite");
    }

    #[test]
    fn malformed_event_data_becomes_null() {
        let db = AuditEvent {
            id: 1,
            actor: "ops@example.com".to_string(),
            event_type: "Login".to_string(),
            event_data: "{not json".to_string(),
            created_at: Utc::now().naive_utc(),
        };

        let domain: DomainAuditEvent = db.into();
        assert_eq!(domain.event_type, AuditEventType::Login);
        assert!(domain.event_data.is_null());
    }
}
