//! Client repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Map `Client` values to rows of the `clients` table and back.
//! - Issue exactly one SQL statement per operation.
//!
//! # Invariants
//! - The repository borrows the caller's connection; it never opens,
//!   closes or wraps it in a transaction.
//! - Insert ignores `Client::id`; the store assigns the key.
//! - Read paths reject rows with empty fields instead of masking them.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::client::{Client, ClientId, ClientValidationError};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CLIENTS_TABLE: &str = "clients";
const CLIENTS_REQUIRED_COLUMNS: &[&str] = &["id", "fio", "login", "birthday", "email"];

const CLIENT_SELECT_SQL: &str = "SELECT
    id,
    fio,
    login,
    birthday,
    email
FROM clients";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by client repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Lookup matched zero rows.
    NotFound(ClientId),
    /// Any failure reported by the store.
    Db(DbError),
    Validation(ClientValidationError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns whether this error means "no such client".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Db(err) => err.code(),
            Self::Validation(_) => "validation_failed",
            Self::InvalidData(_) => "invalid_data",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_table",
            Self::MissingRequiredColumn { .. } => "missing_column",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "client not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted client data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is below required {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClientValidationError> for RepoError {
    fn from(value: ClientValidationError) -> Self {
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

/// Data access contract for client records.
pub trait ClientRepository {
    /// Loads one client by primary key, or `NotFound`.
    fn get_client(&self, id: ClientId) -> RepoResult<Client>;
    /// Inserts a client and returns the store-assigned id.
    fn create_client(&self, client: &Client) -> RepoResult<ClientId>;
    /// Removes a client. Succeeds when no row matches.
    fn delete_client(&self, id: ClientId) -> RepoResult<()>;
}

/// SQLite-backed client repository over a borrowed connection.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    /// Wraps `conn` without checking its schema.
    ///
    /// Use when the `clients` table is managed outside this crate.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps `conn` after verifying the `clients` schema is in place.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn)?;
        Ok(Self::new(conn))
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn get_client(&self, id: ClientId) -> RepoResult<Client> {
        let client = self
            .conn
            .query_row(
                &format!("{CLIENT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_client_row,
            )
            .optional()?;

        match client {
            Some(client) => {
                client.ensure_populated().map_err(|err| {
                    RepoError::InvalidData(format!("clients row {id}: {err}"))
                })?;
                Ok(client)
            }
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn create_client(&self, client: &Client) -> RepoResult<ClientId> {
        client.validate()?;

        self.conn.execute(
            "INSERT INTO clients (fio, login, birthday, email) VALUES (?1, ?2, ?3, ?4);",
            params![
                client.fio.as_str(),
                client.login.as_str(),
                client.birthday.as_str(),
                client.email.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn delete_client(&self, id: ClientId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM clients WHERE id = ?1;", [id])?;
        debug!("event=client_delete module=repo id={id} rows={changed}");
        Ok(())
    }
}

fn parse_client_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get("id")?,
        fio: row.get("fio")?,
        login: row.get("login")?,
        birthday: row.get("birthday")?,
        email: row.get("email")?,
    })
}

fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [CLIENTS_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(CLIENTS_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({CLIENTS_TABLE});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for &column in CLIENTS_REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: CLIENTS_TABLE,
                column,
            });
        }
    }

    Ok(())
}
