//! [`Notification`] records.

use bidbuilder_shared::{NotificationId, UserId};
use chrono::Utc;
use rusqlite::params;

use crate::database::Database;
use crate::error::Result;
use crate::models::Notification;
use crate::row;

impl Database {
    /// Insert an unread notification for `user_id`.
    pub fn insert_notification(&self, user_id: UserId, message: &str) -> Result<Notification> {
        let now = Utc::now();
        self.conn().execute(
            "INSERT INTO notifications (user_id, message, is_read, created_at)
             VALUES (?1, ?2, 0, ?3)",
            params![user_id, message, now.to_rfc3339()],
        )?;

        Ok(Notification {
            id: self.conn().last_insert_rowid(),
            user_id,
            message: message.to_string(),
            is_read: false,
            created_at: now,
        })
    }

    pub fn get_notification(&self, id: NotificationId) -> Result<Notification> {
        Ok(self.conn().query_row(
            "SELECT id, user_id, message, is_read, created_at FROM notifications WHERE id = ?1",
            params![id],
            row_to_notification,
        )?)
    }

    /// Notifications for `user_id`, newest first.
    pub fn list_notifications(&self, user_id: UserId) -> Result<Vec<Notification>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, user_id, message, is_read, created_at
             FROM notifications
             WHERE user_id = ?1
             ORDER BY id DESC",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_notification)?;
        Ok(row::collect(rows)?)
    }

    pub fn mark_notification_read(&self, id: NotificationId) -> Result<Notification> {
        self.conn().execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1",
            params![id],
        )?;
        self.get_notification(id)
    }
}

fn row_to_notification(row: &rusqlite::Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        message: row.get(2)?,
        is_read: row.get(3)?,
        created_at: row::timestamp(row, 4)?,
    })
}
