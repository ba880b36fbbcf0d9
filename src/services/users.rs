//! User administration services: the roles screen and account mutations.

use serde_json::json;
use validator::Validate;

use crate::domain::audit_event::AuditEventType;
use crate::domain::types::UserId;
use crate::domain::user::{NewUser, User, UserRole};
use crate::dto::users::{UsersPageData, UsersQuery};
use crate::forms::users::{AddUserForm, DeleteUserForm, UpdateUserRoleForm};
use crate::models::auth::{AuthenticatedUser, check_role};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::query::{PageQuery, PagedQuery};
use crate::repository::{AuditEventWriter, UserReader, UserWriter};
use crate::services::fetchers::UserPages;
use crate::services::{ServiceError, ServiceResult, audit, hash_password};
use crate::SERVICE_ADMIN_ROLE;

/// Loads the paginated user list for the roles screen.
pub async fn load_users_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: UsersQuery,
) -> ServiceResult<UsersPageData>
where
    R: UserReader + ?Sized,
{
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = query.page.unwrap_or(1);
    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let search_field = query
        .field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut params = PageQuery::new(page, DEFAULT_ITEMS_PER_PAGE);
    params.search = search_query.clone();
    params.search_field = search_field.clone();

    let pages = PagedQuery::new(Box::new(UserPages { repo }), params).await;
    let snapshot = pages.snapshot();

    Ok(UsersPageData {
        users: Paginated::new(snapshot.items, snapshot.page, snapshot.total_pages),
        total: snapshot.total,
        search_query,
        search_field,
        fetch_error: snapshot.error,
    })
}

/// Validates the add-user form, hashes the password, and creates the account.
pub fn add_user<R>(repo: &R, user: &AuthenticatedUser, form: AddUserForm) -> ServiceResult<User>
where
    R: UserWriter + AuditEventWriter + ?Sized,
{
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    if let Err(err) = form.validate() {
        log::error!("Failed to validate user form: {err}");
        return Err(ServiceError::Form("Invalid user form".to_string()));
    }

    let password_hash = hash_password(&form.password)?;
    let new_user = NewUser::new(
        form.name,
        form.email,
        UserRole::from(form.role.as_str()),
        password_hash,
    );

    let created = repo.create_user(&new_user).map_err(|err| {
        log::error!("Failed to create user: {err}");
        err
    })?;

    audit::record_event(
        repo,
        &user.email,
        AuditEventType::UserCreated,
        json!({"user_id": created.id, "email": created.email}),
    )?;

    Ok(created)
}

/// Changes another account's role.
pub fn change_user_role<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: UpdateUserRoleForm,
) -> ServiceResult<User>
where
    R: UserWriter + AuditEventWriter + ?Sized,
{
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let id = UserId::new(form.user_id)?;
    let role = UserRole::from(form.role.as_str());

    let updated = repo.update_user_role(id, &role).map_err(|err| {
        log::error!("Failed to update role for user {id}: {err}");
        err
    })?;

    audit::record_event(
        repo,
        &user.email,
        AuditEventType::UserRoleChanged,
        json!({"user_id": updated.id, "role": role.to_string()}),
    )?;

    Ok(updated)
}

/// Deletes an account. Admins cannot delete themselves.
pub fn delete_user<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: DeleteUserForm,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter + AuditEventWriter + ?Sized,
{
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let id = UserId::new(form.user_id)?;
    let target = repo.get_user_by_id(id)?.ok_or(ServiceError::NotFound)?;

    if target.email == user.email {
        return Err(ServiceError::Form(
            "You cannot delete your own account".to_string(),
        ));
    }

    repo.delete_user(id).map_err(|err| {
        log::error!("Failed to delete user {id}: {err}");
        err
    })?;

    audit::record_event(
        repo,
        &user.email,
        AuditEventType::UserDeleted,
        json!({"user_id": target.id, "email": target.email}),
    )?;

    Ok(())
}
