use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateBackupForm {
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteBackupForm {
    pub backup_id: i32,
}
