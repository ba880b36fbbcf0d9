use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
/// Diesel model for [`crate::domain::user::User`].
///
/// Carries the credential columns the domain type deliberately omits.
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub password_hash: String,
    pub totp_enabled: bool,
    pub totp_secret: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
/// Insertable form of [`User`].
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role: String,
    pub password_hash: &'a str,
    pub totp_enabled: bool,
}

impl From<User> for DomainUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.into(),
            totp_enabled: user.totp_enabled,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            name: user.name.as_str(),
            email: user.email.as_str(),
            role: user.role.to_string(),
            password_hash: user.password_hash.as_str(),
            totp_enabled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::user::UserRole;

    #[test]
    fn db_user_into_domain_drops_credentials() {
        let now: NaiveDateTime = Utc::now().naive_utc();
        let db_user = User {
            id: 1,
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            role: "Auditor".to_string(),
            password_hash: "hash".to_string(),
            totp_enabled: true,
            totp_secret: Some("secret".to_string()),
            created_at: now,
            updated_at: now,
        };

        let domain: DomainUser = db_user.into();

        assert_eq!(domain.id, 1);
        assert_eq!(domain.role, UserRole::Auditor);
        assert!(domain.totp_enabled);
    }

    #[test]
    fn from_domain_new_creates_insertable() {
        let domain = DomainNewUser::new(
            "Dana".to_string(),
            "Dana@Example.com".to_string(),
            UserRole::Operator,
            "hash".to_string(),
        );

        let new: NewUser = (&domain).into();

        assert_eq!(new.name, "Dana");
        assert_eq!(new.email, "dana@example.com");
        assert_eq!(new.role, "Operator");
        assert!(!new.totp_enabled);
    }

    #[test]
    fn unknown_role_round_trips_as_other() {
        let role: UserRole = "Treasurer".into();
        assert_eq!(role, UserRole::Other("Treasurer".to_string()));
        assert_eq!(role.to_string(), "Treasurer");
    }
}
