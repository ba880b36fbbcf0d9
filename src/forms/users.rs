use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct AddUserForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: String,
    #[validate(length(min = 12))]
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateUserRoleForm {
    pub user_id: i32,
    pub role: String,
}

#[derive(Deserialize)]
pub struct DeleteUserForm {
    pub user_id: i32,
}
