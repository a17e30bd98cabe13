//! Client use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for client lookup, registration and removal.
//! - Emit one metadata-only log event per call.
//!
//! # Invariants
//! - Repository errors are returned unchanged.
//! - Personal fields (name, login, email, birthday) are never logged.

use crate::model::client::{Client, ClientId};
use crate::repo::client_repo::{ClientRepository, RepoError, RepoResult};
use log::{debug, info, warn};
use std::fmt::Write;
use std::time::Instant;

/// Use-case wrapper around a [`ClientRepository`].
pub struct ClientService<R: ClientRepository> {
    repo: R,
}

impl<R: ClientRepository> ClientService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads one client by id.
    pub fn get_client(&self, id: ClientId) -> RepoResult<Client> {
        let started_at = Instant::now();
        let result = self.repo.get_client(id);
        log_outcome("client_get", Some(id), started_at, &result);
        result
    }

    /// Persists `client` and returns its new id. `client.id` is ignored.
    pub fn create_client(&self, client: &Client) -> RepoResult<ClientId> {
        let started_at = Instant::now();
        let result = self.repo.create_client(client);
        let id = result.as_ref().ok().copied();
        log_outcome("client_create", id, started_at, &result);
        result
    }

    /// Builds and persists a client, returning the stored record.
    ///
    /// # Contract
    /// - The returned value equals what a later `get_client` yields.
    pub fn register_client(
        &self,
        fio: impl Into<String>,
        login: impl Into<String>,
        birthday: impl Into<String>,
        email: impl Into<String>,
    ) -> RepoResult<Client> {
        let client = Client::new(fio, login, birthday, email);
        let id = self.create_client(&client)?;
        Ok(client.with_id(id))
    }

    /// Removes a client by id. Missing ids are not an error.
    pub fn delete_client(&self, id: ClientId) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = self.repo.delete_client(id);
        log_outcome("client_delete", Some(id), started_at, &result);
        result
    }
}

fn log_outcome<T>(
    event: &str,
    id: Option<ClientId>,
    started_at: Instant,
    result: &RepoResult<T>,
) {
    let fields = event_fields(event, id, started_at.elapsed().as_millis());
    match result {
        Ok(_) => info!("{fields} status=ok"),
        Err(RepoError::NotFound(_)) => debug!("{fields} status=not_found"),
        Err(RepoError::Db(err)) => {
            warn!("{fields} status=error error_code={} error={err}", err.code())
        }
        // Validation messages may echo field values.
        Err(err) => warn!("{fields} status=error error_code={}", err.code()),
    }
}

/// Common event prefix. `id` is omitted when no row id is known.
fn event_fields(event: &str, id: Option<ClientId>, duration_ms: u128) -> String {
    let mut fields = format!("event={event} module=service duration_ms={duration_ms}");
    if let Some(id) = id {
        let _ = write!(fields, " id={id}");
    }
    fields
}
