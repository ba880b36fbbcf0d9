use diesel::prelude::*;

use crate::domain::types::{EmailAddress, UserId};
use crate::domain::user::{NewUser, User, UserRole};
use crate::models::user::{NewUser as DbNewUser, User as DbUser};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, UserListQuery, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .find(id.get())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn get_user_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = users::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = match query.search_field.as_deref() {
                    None => items.filter(
                        users::name
                            .like(pattern.clone())
                            .or(users::email.like(pattern.clone()))
                            .or(users::role.like(pattern)),
                    ),
                    Some("name") => items.filter(users::name.like(pattern)),
                    Some("email") => items.filter(users::email.like(pattern)),
                    Some("role") => items.filter(users::role.like(pattern)),
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

        let users = items
            .order(users::id.asc())
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect::<Vec<User>>();

        Ok((total, users))
    }

    fn user_password_hash(&self, id: UserId) -> RepositoryResult<Option<String>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let hash = users::table
            .find(id.get())
            .select(users::password_hash)
            .first::<String>(&mut conn)
            .optional()?;

        Ok(hash)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let insertable: DbNewUser = new_user.into();
        let user = diesel::insert_into(users::table)
            .values(&insertable)
            .get_result::<DbUser>(&mut conn)?;

        Ok(user.into())
    }

    fn update_user_role(&self, id: UserId, role: &UserRole) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = diesel::update(users::table.find(id.get()))
            .set((
                users::role.eq(role.to_string()),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<DbUser>(&mut conn)?;

        Ok(user.into())
    }

    fn set_user_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<()> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let affected = diesel::update(users::table.find(id.get()))
            .set((
                users::password_hash.eq(password_hash),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn set_user_two_factor(
        &self,
        id: UserId,
        enabled: bool,
        totp_secret: Option<String>,
    ) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = diesel::update(users::table.find(id.get()))
            .set((
                users::totp_enabled.eq(enabled),
                users::totp_secret.eq(totp_secret),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<DbUser>(&mut conn)?;

        Ok(user.into())
    }

    fn delete_user(&self, id: UserId) -> RepositoryResult<()> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        diesel::delete(users::table.find(id.get())).execute(&mut conn)?;
        Ok(())
    }
}
