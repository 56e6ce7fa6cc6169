use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::PaperStore;
use crate::db::DatabaseError;
use crate::models::*;

const PAPER_COLUMNS: &str =
    "id, title, author, abstract_text, journal, status, created_at, updated_at";

/// SQLite-backed paper store.
///
/// Holds a single connection; each call takes the lock for the duration of
/// one statement.
pub struct SqlitePaperStore {
    conn: Mutex<Connection>,
}

impl SqlitePaperStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

impl PaperStore for SqlitePaperStore {
    fn save(&self, paper: NewPaper) -> Result<Paper, DatabaseError> {
        let paper = paper.into_paper(Uuid::new_v4(), chrono::Local::now().naive_local());
        let conn = self.conn()?;
        insert_paper(&conn, &paper)?;
        Ok(paper)
    }

    fn find_by_id(&self, id: &Uuid) -> Result<Option<Paper>, DatabaseError> {
        let conn = self.conn()?;
        get_paper(&conn, id)
    }

    fn find_all(&self) -> Result<Vec<Paper>, DatabaseError> {
        let conn = self.conn()?;
        get_all_papers(&conn)
    }
}

pub fn insert_paper(conn: &Connection, paper: &Paper) -> Result<(), DatabaseError> {
    conn.execute(
        &format!("INSERT INTO papers ({PAPER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
        params![
            paper.id.to_string(),
            paper.title,
            paper.author,
            paper.abstract_text,
            paper.journal,
            paper.status.as_str(),
            paper.created_at,
            paper.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_paper(conn: &Connection, id: &Uuid) -> Result<Option<Paper>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {PAPER_COLUMNS} FROM papers WHERE id = ?1"),
            params![id.to_string()],
            paper_row_from_rusqlite,
        )
        .optional()?;

    row.map(paper_from_row).transpose()
}

/// All papers, oldest first. Ties on `created_at` fall back to `id`.
pub fn get_all_papers(conn: &Connection) -> Result<Vec<Paper>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PAPER_COLUMNS} FROM papers ORDER BY created_at ASC, id ASC"
    ))?;

    let rows = stmt.query_map([], paper_row_from_rusqlite)?;

    let mut papers = Vec::new();
    for row in rows {
        papers.push(paper_from_row(row?)?);
    }
    Ok(papers)
}

struct PaperRow {
    id: String,
    title: String,
    author: String,
    abstract_text: Option<String>,
    journal: Option<String>,
    status: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

fn paper_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<PaperRow, rusqlite::Error> {
    Ok(PaperRow {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        abstract_text: row.get(3)?,
        journal: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn paper_from_row(row: PaperRow) -> Result<Paper, DatabaseError> {
    Ok(Paper {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(format!("papers.id `{}`: {e}", row.id)))?,
        title: row.title,
        author: row.author,
        abstract_text: row.abstract_text,
        journal: row.journal,
        status: PaperStatus::from_str(&row.status)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
