//! CRUD operations for the `applications` table.
//!
//! Every query is scoped by `user_id`; a row owned by someone else behaves
//! exactly like a missing row.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Row};

use super::{Database, DatabaseError};
use crate::model::{Application, ApplicationStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(column: &'static str, s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DatabaseError::InvalidData {
            column,
            value: s.to_string(),
        })
}

fn parse_date(column: &'static str, s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| DatabaseError::InvalidData {
        column,
        value: s.to_string(),
    })
}

/// A raw application row from the database.
#[derive(Debug, Clone)]
pub struct ApplicationRow {
    pub id: String,
    pub user_id: String,
    pub company_name: String,
    pub role: String,
    pub location: Option<String>,
    pub source: Option<String>,
    pub status: String,
    pub applied_date: String,
    pub follow_up_date: Option<String>,
    pub notes: Option<String>,
    pub salary_range: Option<String>,
    pub job_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ApplicationRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            company_name: row.get("company_name")?,
            role: row.get("role")?,
            location: row.get("location")?,
            source: row.get("source")?,
            status: row.get("status")?,
            applied_date: row.get("applied_date")?,
            follow_up_date: row.get("follow_up_date")?,
            notes: row.get("notes")?,
            salary_range: row.get("salary_range")?,
            job_url: row.get("job_url")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Encodes a domain record for storage.
    pub fn from_application(app: &Application) -> Self {
        Self {
            id: app.id.clone(),
            user_id: app.owner_id.clone(),
            company_name: app.company_name.clone(),
            role: app.role.clone(),
            location: app.location.clone(),
            source: app.source.clone(),
            status: app.status.as_str().to_string(),
            applied_date: app.applied_date.format(DATE_FORMAT).to_string(),
            follow_up_date: app
                .follow_up_date
                .map(|d| d.format(DATE_FORMAT).to_string()),
            notes: app.notes.clone(),
            salary_range: app.salary_range.clone(),
            job_url: app.job_url.clone(),
            created_at: format_timestamp(app.created_at),
            updated_at: format_timestamp(app.updated_at),
        }
    }

    /// Decodes the row into a domain record.
    pub fn into_application(self) -> Result<Application, DatabaseError> {
        let status = self
            .status
            .parse::<ApplicationStatus>()
            .map_err(|e| DatabaseError::InvalidData {
                column: "status",
                value: e.0,
            })?;
        let follow_up_date = match self.follow_up_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(parse_date("follow_up_date", s)?),
        };

        Ok(Application {
            applied_date: parse_date("applied_date", &self.applied_date)?,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
            id: self.id,
            owner_id: self.user_id,
            company_name: self.company_name,
            role: self.role,
            location: crate::model::normalize_text(self.location),
            source: crate::model::normalize_text(self.source),
            status,
            follow_up_date,
            notes: crate::model::normalize_text(self.notes),
            salary_range: crate::model::normalize_text(self.salary_range),
            job_url: crate::model::normalize_text(self.job_url),
        })
    }
}

/// Inserts a new application row.
pub fn insert(db: &Database, row: &ApplicationRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO applications (id, user_id, company_name, role, location, source,
             status, applied_date, follow_up_date, notes, salary_range, job_url,
             created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                row.id,
                row.user_id,
                row.company_name,
                row.role,
                row.location,
                row.source,
                row.status,
                row.applied_date,
                row.follow_up_date,
                row.notes,
                row.salary_range,
                row.job_url,
                row.created_at,
                row.updated_at,
            ],
        )?;
        Ok(())
    })
}

/// Overwrites every mutable column of the row matching `id` and `user_id`.
/// Returns false when no such row exists.
pub fn update(db: &Database, row: &ApplicationRow) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE applications SET company_name=?3, role=?4, location=?5, source=?6,
             status=?7, applied_date=?8, follow_up_date=?9, notes=?10, salary_range=?11,
             job_url=?12, updated_at=?13
             WHERE id=?1 AND user_id=?2",
            params![
                row.id,
                row.user_id,
                row.company_name,
                row.role,
                row.location,
                row.source,
                row.status,
                row.applied_date,
                row.follow_up_date,
                row.notes,
                row.salary_range,
                row.job_url,
                row.updated_at,
            ],
        )?;
        Ok(changed > 0)
    })
}

/// Finds an application by id, scoped to its owner.
pub fn find_by_id(
    db: &Database,
    user_id: &str,
    id: &str,
) -> Result<Option<ApplicationRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT * FROM applications WHERE id = ?1 AND user_id = ?2")?;
        let mut rows = stmt.query_map(params![id, user_id], ApplicationRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Lists all applications of a user, newest first.
pub fn list_by_owner(db: &Database, user_id: &str) -> Result<Vec<ApplicationRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM applications WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map(params![user_id], ApplicationRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Deletes an application. Returns false when no matching row existed.
pub fn delete(db: &Database, user_id: &str, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "DELETE FROM applications WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(changed > 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    fn sample_row(id: &str, user_id: &str, created_at: &str) -> ApplicationRow {
        ApplicationRow {
            id: id.to_string(),
            user_id: user_id.to_string(),
            company_name: "Acme".to_string(),
            role: "Engineer".to_string(),
            location: Some("Remote".to_string()),
            source: None,
            status: "applied".to_string(),
            applied_date: "2026-01-01".to_string(),
            follow_up_date: None,
            notes: None,
            salary_range: None,
            job_url: None,
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_insert_and_find() {
        let db = test_db();
        insert(&db, &sample_row("a1", "u1", "2026-01-01T00:00:00.000000Z")).unwrap();

        let found = find_by_id(&db, "u1", "a1").unwrap().unwrap();
        assert_eq!(found.company_name, "Acme");
        assert_eq!(found.location.as_deref(), Some("Remote"));
    }

    #[test]
    fn test_find_is_owner_scoped() {
        let db = test_db();
        insert(&db, &sample_row("a1", "u1", "2026-01-01T00:00:00.000000Z")).unwrap();

        assert!(find_by_id(&db, "u2", "a1").unwrap().is_none());
        assert!(find_by_id(&db, "u1", "missing").unwrap().is_none());
    }

    #[test]
    fn test_list_by_owner_newest_first() {
        let db = test_db();
        insert(&db, &sample_row("old", "u1", "2026-01-01T00:00:00.000000Z")).unwrap();
        insert(&db, &sample_row("new", "u1", "2026-01-03T00:00:00.000000Z")).unwrap();
        insert(&db, &sample_row("mid", "u1", "2026-01-02T00:00:00.000000Z")).unwrap();
        insert(&db, &sample_row("other", "u2", "2026-01-04T00:00:00.000000Z")).unwrap();

        let ids: Vec<String> = list_by_owner(&db, "u1")
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_list_ties_break_by_insertion_order() {
        let db = test_db();
        insert(&db, &sample_row("first", "u1", "2026-01-01T00:00:00.000000Z")).unwrap();
        insert(&db, &sample_row("second", "u1", "2026-01-01T00:00:00.000000Z")).unwrap();

        let ids: Vec<String> = list_by_owner(&db, "u1")
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[test]
    fn test_update_scoped_to_owner() {
        let db = test_db();
        let mut row = sample_row("a1", "u1", "2026-01-01T00:00:00.000000Z");
        insert(&db, &row).unwrap();

        row.status = "offer".to_string();
        assert!(update(&db, &row).unwrap());
        assert_eq!(find_by_id(&db, "u1", "a1").unwrap().unwrap().status, "offer");

        row.user_id = "u2".to_string();
        assert!(!update(&db, &row).unwrap());
    }

    #[test]
    fn test_delete() {
        let db = test_db();
        insert(&db, &sample_row("a1", "u1", "2026-01-01T00:00:00.000000Z")).unwrap();

        assert!(!delete(&db, "u2", "a1").unwrap());
        assert!(delete(&db, "u1", "a1").unwrap());
        assert!(!delete(&db, "u1", "a1").unwrap());
    }

    #[test]
    fn test_row_decodes_into_application() {
        let mut row = sample_row("a1", "u1", "2026-01-01T00:00:00.000000Z");
        row.follow_up_date = Some(String::new());
        row.notes = Some(String::new());

        let app = row.into_application().unwrap();
        assert_eq!(app.status, ApplicationStatus::Applied);
        assert_eq!(app.follow_up_date, None);
        assert_eq!(app.notes, None);
        assert_eq!(app.applied_date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn test_row_with_bad_status_is_invalid() {
        let mut row = sample_row("a1", "u1", "2026-01-01T00:00:00.000000Z");
        row.status = "ghosted".to_string();

        let err = row.into_application().unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::InvalidData { column: "status", .. }
        ));
    }

    #[test]
    fn test_encode_decode_preserves_record() {
        let row = sample_row("a1", "u1", "2026-01-01T10:30:00.000000Z");
        let app = row.into_application().unwrap();
        let encoded = ApplicationRow::from_application(&app);
        assert_eq!(encoded.created_at, "2026-01-01T10:30:00.000000Z");
        assert_eq!(encoded.into_application().unwrap(), app);
    }
}
