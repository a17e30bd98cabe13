//! Client domain model.
//!
//! # Responsibility
//! - Define the canonical person record stored in `clients`.
//! - Check field shape before writes and field presence after reads.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - `fio`, `login`, `birthday` and `email` are non-empty.
//! - `birthday` is stored as an 8-character `YYYYMMDD` string; its calendar
//!   meaning is not interpreted here.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Primary key of a client row (SQLite `INTEGER PRIMARY KEY`).
pub type ClientId = i64;

/// Length of the `YYYYMMDD` birthday encoding.
pub const BIRTHDAY_LEN: usize = 8;

/// One person record.
///
/// `Client::default()` is the zero value: `id == 0` and every text field
/// empty. Lookups that find nothing leave callers with this value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Store-assigned identity. Ignored on insert.
    pub id: ClientId,
    /// Full name (surname, given name, patronymic).
    pub fio: String,
    pub login: String,
    /// `YYYYMMDD`.
    pub birthday: String,
    pub email: String,
}

/// Field-level validation failure for [`Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    EmptyField(&'static str),
    InvalidBirthday(String),
}

impl Display for ClientValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "client field `{field}` cannot be empty"),
            Self::InvalidBirthday(value) => {
                write!(f, "birthday `{value}` must be 8 characters (YYYYMMDD)")
            }
        }
    }
}

impl Error for ClientValidationError {}

impl Client {
    /// Creates an unsaved client. `id` stays `0` until the store assigns one.
    pub fn new(
        fio: impl Into<String>,
        login: impl Into<String>,
        birthday: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            fio: fio.into(),
            login: login.into(),
            birthday: birthday.into(),
            email: email.into(),
        }
    }

    /// Returns a copy of this record carrying the given identity.
    pub fn with_id(mut self, id: ClientId) -> Self {
        self.id = id;
        self
    }

    /// Checks that every text field is populated. `id` is not inspected.
    ///
    /// This is the only check applied to rows read back from the store.
    pub fn ensure_populated(&self) -> Result<(), ClientValidationError> {
        for (name, value) in [
            ("fio", &self.fio),
            ("login", &self.login),
            ("birthday", &self.birthday),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(ClientValidationError::EmptyField(name));
            }
        }
        Ok(())
    }

    /// Checks a record before it is written.
    ///
    /// # Errors
    /// - `EmptyField` when any text field is empty or whitespace-only.
    /// - `InvalidBirthday` when `birthday` is not exactly 8 characters.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        self.ensure_populated()?;

        if self.birthday.chars().count() != BIRTHDAY_LEN {
            return Err(ClientValidationError::InvalidBirthday(
                self.birthday.clone(),
            ));
        }

        Ok(())
    }
}
