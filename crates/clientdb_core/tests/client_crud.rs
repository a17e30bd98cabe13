use clientdb_core::db::migrations::latest_version;
use clientdb_core::db::{open_db, open_db_in_memory};
use clientdb_core::{
    Client, ClientRepository, ClientService, ClientValidationError, RepoError,
    SqliteClientRepository,
};
use rusqlite::Connection;

fn test_client() -> Client {
    Client::new("Test", "Test", "19700101", "mail@mail.com")
}

/// File database pre-populated with one client at id 1.
fn seeded_file_db() -> (tempfile::TempDir, Connection) {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("demo.db")).unwrap();
    conn.execute(
        "INSERT INTO clients (id, fio, login, birthday, email)
         VALUES (1, 'Petrov Petr Petrovich', 'petrov', '19850312', 'petrov@example.com');",
        [],
    )
    .unwrap();
    (dir, conn)
}

#[test]
fn get_existing_client_returns_populated_record() {
    let (_dir, conn) = seeded_file_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let client = repo.get_client(1).unwrap();
    assert_eq!(client.id, 1);
    assert!(!client.fio.is_empty());
    assert!(!client.login.is_empty());
    assert!(!client.birthday.is_empty());
    assert!(!client.email.is_empty());
}

#[test]
fn get_missing_client_returns_not_found_and_zero_value() {
    let (_dir, conn) = seeded_file_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let result = repo.get_client(-1);
    assert!(matches!(result, Err(RepoError::NotFound(-1))));

    let client = result.unwrap_or_default();
    assert_eq!(client, Client::default());
    assert!(client.fio.is_empty());
    assert!(client.email.is_empty());
}

#[test]
fn create_then_get_returns_inserted_values() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let mut client = test_client();
    let id = repo.create_client(&client).unwrap();
    assert_ne!(id, 0);
    client.id = id;

    assert_eq!(repo.get_client(id).unwrap(), client);
}

#[test]
fn create_ignores_caller_supplied_id() {
    let (_dir, conn) = seeded_file_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let id = repo.create_client(&test_client().with_id(1)).unwrap();
    assert_ne!(id, 1);
    assert_eq!(repo.get_client(1).unwrap().login, "petrov");
    assert_eq!(repo.get_client(id).unwrap().login, "Test");
}

#[test]
fn create_assigns_distinct_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let first = repo.create_client(&test_client()).unwrap();
    let second = repo.create_client(&test_client()).unwrap();
    assert!(second > first);
}

#[test]
fn create_then_delete_removes_row() {
    let (_dir, conn) = seeded_file_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let id = repo.create_client(&test_client()).unwrap();
    assert_ne!(id, 0);
    repo.get_client(id).unwrap();

    repo.delete_client(id).unwrap();
    assert!(repo.get_client(id).unwrap_err().is_not_found());
    assert!(repo.get_client(1).is_ok());
}

#[test]
fn delete_missing_client_succeeds() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    repo.delete_client(-1).unwrap();
    repo.delete_client(12345).unwrap();
}

#[test]
fn validation_failure_blocks_create() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let mut client = test_client();
    client.email = String::new();
    let err = repo.create_client(&client).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ClientValidationError::EmptyField("email"))
    ));

    client.email = "mail@mail.com".to_string();
    client.birthday = "1970-01-01".to_string();
    let err = repo.create_client(&client).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ClientValidationError::InvalidBirthday(_))
    ));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM clients;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn get_rejects_invalid_persisted_row() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO clients (id, fio, login, birthday, email)
         VALUES (7, 'Broken', 'broken', '', 'broken@example.com');",
        [],
    )
    .unwrap();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let err = repo.get_client(7).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn get_returns_stored_birthday_without_interpreting_it() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fio TEXT NOT NULL,
            login TEXT NOT NULL,
            birthday TEXT NOT NULL,
            email TEXT NOT NULL
        );
        INSERT INTO clients (id, fio, login, birthday, email)
        VALUES (1, 'Ivanov', 'ivan', '19701301', 'i@x.com');",
    )
    .unwrap();
    let repo = SqliteClientRepository::new(&conn);

    let client = repo.get_client(1).unwrap();
    assert_eq!(client.id, 1);
    assert_eq!(client.birthday, "19701301");
}

#[test]
fn create_accepts_any_eight_character_birthday() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let mut client = test_client();
    client.birthday = "1970-1-1".to_string();
    let id = repo.create_client(&client).unwrap();
    assert_eq!(repo.get_client(id).unwrap(), client.with_id(id));
}

#[test]
fn store_failures_surface_as_db_errors() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();
    conn.execute_batch("DROP TABLE clients;").unwrap();

    let err = repo.create_client(&test_client()).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(err.code(), "sqlite_error");
    assert!(matches!(repo.get_client(1), Err(RepoError::Db(_))));
}

#[test]
fn new_works_with_externally_managed_schema() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fio TEXT NOT NULL,
            login TEXT NOT NULL,
            birthday TEXT NOT NULL,
            email TEXT NOT NULL
        );",
    )
    .unwrap();
    let repo = SqliteClientRepository::new(&conn);

    let id = repo.create_client(&test_client()).unwrap();
    assert_eq!(repo.get_client(id).unwrap(), test_client().with_id(id));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteClientRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_clients_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteClientRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("clients"))
    ));
}

#[test]
fn repository_rejects_clients_table_missing_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fio TEXT NOT NULL,
            login TEXT NOT NULL,
            email TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteClientRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "clients",
            column: "birthday"
        })
    ));
}

#[test]
fn service_covers_full_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let service = ClientService::new(SqliteClientRepository::try_new(&conn).unwrap());

    let registered = service
        .register_client("Test", "Test", "19700101", "mail@mail.com")
        .unwrap();
    assert_ne!(registered.id, 0);
    assert_eq!(service.get_client(registered.id).unwrap(), registered);

    let second = service.create_client(&test_client()).unwrap();
    assert_ne!(second, registered.id);

    service.delete_client(registered.id).unwrap();
    assert!(matches!(
        service.get_client(registered.id),
        Err(RepoError::NotFound(id)) if id == registered.id
    ));
    assert!(service.get_client(second).is_ok());
}

#[test]
fn client_serializes_with_field_names() {
    let value = serde_json::to_value(test_client().with_id(3)).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "id": 3,
            "fio": "Test",
            "login": "Test",
            "birthday": "19700101",
            "email": "mail@mail.com"
        })
    );

    let decoded: Client = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, test_client().with_id(3));
}
