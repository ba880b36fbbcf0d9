use diesel::prelude::*;

use crate::domain::backup::{Backup, NewBackup};
use crate::domain::types::BackupId;
use crate::models::backup::{Backup as DbBackup, NewBackup as DbNewBackup};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{BackupListQuery, BackupReader, BackupWriter, DieselRepository};

impl BackupReader for DieselRepository {
    fn get_backup_by_id(&self, id: BackupId) -> RepositoryResult<Option<Backup>> {
        use crate::schema::backups;

        let mut conn = self.conn()?;
        let backup = backups::table
            .find(id.get())
            .first::<DbBackup>(&mut conn)
            .optional()?;

        Ok(backup.map(Into::into))
    }

    fn list_backups(&self, query: BackupListQuery) -> RepositoryResult<(usize, Vec<Backup>)> {
        use crate::schema::backups;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = backups::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = match query.search_field.as_deref() {
                    None => items.filter(
                        backups::filename
                            .like(pattern.clone())
                            .or(backups::status.like(pattern)),
                    ),
                    Some("filename") => items.filter(backups::filename.like(pattern)),
                    Some("status") => items.filter(backups::status.like(pattern)),
                    Some("note") => items.filter(backups::note.like(pattern)),
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

        let backups = items
            .order(backups::created_at.desc())
            .load::<DbBackup>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect::<Vec<Backup>>();

        Ok((total, backups))
    }
}

impl BackupWriter for DieselRepository {
    fn create_backup(&self, new_backup: &NewBackup) -> RepositoryResult<Backup> {
        use crate::schema::backups;

        let mut conn = self.conn()?;
        let insertable: DbNewBackup = new_backup.into();
        let backup = diesel::insert_into(backups::table)
            .values(&insertable)
            .get_result::<DbBackup>(&mut conn)?;

        Ok(backup.into())
    }

    fn delete_backup(&self, id: BackupId) -> RepositoryResult<()> {
        use crate::schema::backups;

        let mut conn = self.conn()?;
        diesel::delete(backups::table.find(id.get())).execute(&mut conn)?;
        Ok(())
    }
}
