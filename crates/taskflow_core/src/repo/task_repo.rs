//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the persisted `todo_table`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every mutation is one implicit SQLite transaction; the call returns
//!   only after the row is durably committed.
//! - Date listing matches `date = ?` on the normalized key; rows sort by
//!   `created_at ASC, id ASC` (insertion order).
//! - Read paths reject invalid persisted state instead of masking it.

use crate::datetime::{DateKey, TimeOfDay};
use crate::db::DbError;
use crate::model::task::{normalize_description, Task, TaskDraft, TaskId, TaskValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    date,
    time,
    task,
    completed,
    created_at
FROM todo_table";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    /// Persists a validated draft and returns the committed record with
    /// its assigned id and creation timestamp.
    fn insert_task(&self, draft: &TaskDraft) -> RepoResult<Task>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists all tasks due on `date`, ordered by insertion.
    fn list_for_date(&self, date: DateKey) -> RepoResult<Vec<Task>>;
    /// Counts tasks due on `date` without materializing rows.
    fn count_for_date(&self, date: DateKey) -> RepoResult<u32>;
    fn set_completed(&self, id: TaskId, completed: bool) -> RepoResult<()>;
    fn set_description(&self, id: TaskId, description: &str) -> RepoResult<()>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, draft: &TaskDraft) -> RepoResult<Task> {
        self.conn.execute(
            "INSERT INTO todo_table (date, time, task, completed)
             VALUES (?1, ?2, ?3, 0);",
            params![
                draft.date().to_string(),
                draft.time().map(|time| time.to_string()),
                draft.description(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.load_task(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted task {id} missing on read-back"))
        })
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.load_task(id)
    }

    fn list_for_date(&self, date: DateKey) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE date = ?1
             ORDER BY created_at ASC, id ASC;"
        ))?;

        let mut rows = stmt.query([date.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn count_for_date(&self, date: DateKey) -> RepoResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM todo_table WHERE date = ?1;",
            [date.to_string()],
            |row| row.get::<_, u32>(0),
        )?;

        Ok(count)
    }

    fn set_completed(&self, id: TaskId, completed: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE todo_table SET completed = ?1 WHERE id = ?2;",
            params![i64::from(completed), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn set_description(&self, id: TaskId, description: &str) -> RepoResult<()> {
        let normalized = normalize_description(description)?;

        let changed = self.conn.execute(
            "UPDATE todo_table SET task = ?1 WHERE id = ?2;",
            params![normalized, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todo_table WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id: TaskId = row.get("id")?;

    let date_text: String = row.get("date")?;
    let date = DateKey::parse(&date_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date key `{date_text}` in todo_table.date (row {id})"
        ))
    })?;

    let time = match row.get::<_, Option<String>>("time")? {
        Some(value) => Some(TimeOfDay::parse(&value).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid time value `{value}` in todo_table.time (row {id})"
            ))
        })?),
        None => None,
    };

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in todo_table.completed (row {id})"
            )));
        }
    };

    Ok(Task {
        id,
        date,
        time,
        description: row.get("task")?,
        completed,
        created_at: row.get("created_at")?,
    })
}
