//! End-to-end tests for the database facade

use pocketdb::storage::Value;
use pocketdb::{Database, Error, QueryResult};
use tempfile::TempDir;

fn open_db(dir: &TempDir) -> Database {
    Database::open(dir.path().join("test.db")).unwrap()
}

#[test]
fn test_create_table() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    db.execute("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR)")
        .unwrap();
    assert!(db.table_exists("users"));
}

#[test]
fn test_insert_and_select() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    db.execute("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR)")
        .unwrap();
    let result = db.execute("INSERT INTO users VALUES (1, 'Alice')").unwrap();
    assert_eq!(result, QueryResult::None);

    let result = db.execute("SELECT * FROM users").unwrap();
    let rows = result.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], Value::Integer(1));
    assert_eq!(rows[0]["name"], Value::from("Alice"));
}

#[test]
fn test_primary_key_constraint() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    db.execute("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR)")
        .unwrap();
    db.execute("INSERT INTO users VALUES (1, 'Alice')").unwrap();

    let err = db
        .execute("INSERT INTO users VALUES (1, 'Bob')")
        .unwrap_err();
    assert!(matches!(err, Error::PrimaryKey(_)));

    // The failed insert left the row count unchanged
    let result = db.execute("SELECT * FROM users").unwrap();
    assert_eq!(result.rows().unwrap().len(), 1);
}

#[test]
fn test_unique_constraint_allows_multiple_nulls() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    db.execute("CREATE TABLE users (id INT, email VARCHAR UNIQUE)")
        .unwrap();
    db.execute("INSERT INTO users VALUES (1, 'test@test.com')")
        .unwrap();
    db.execute("INSERT INTO users VALUES (2, NULL)").unwrap();
    db.execute("INSERT INTO users VALUES (3, NULL)").unwrap();

    let err = db
        .execute("INSERT INTO users VALUES (4, 'test@test.com')")
        .unwrap_err();
    assert!(matches!(err, Error::UniqueConstraint { .. }));

    let result = db.execute("SELECT * FROM users").unwrap();
    assert_eq!(result.rows().unwrap().len(), 3);
}

#[test]
fn test_where_clause_operators() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    db.execute("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR, age INT)")
        .unwrap();
    db.execute("INSERT INTO users VALUES (1, 'Alice', 25)").unwrap();
    db.execute("INSERT INTO users VALUES (2, 'Bob', 30)").unwrap();
    db.execute("INSERT INTO users VALUES (3, 'Carol', 18)").unwrap();

    let result = db.execute("SELECT * FROM users WHERE age > 25").unwrap();
    let rows = result.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], Value::from("Bob"));

    // >= must include the boundary row at exactly 18
    let result = db.execute("SELECT * FROM users WHERE age >= 18").unwrap();
    assert_eq!(result.rows().unwrap().len(), 3);

    let result = db.execute("SELECT * FROM users WHERE age != 25").unwrap();
    assert_eq!(result.rows().unwrap().len(), 2);
}

#[test]
fn test_null_rows_never_match_predicates() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    db.execute("CREATE TABLE users (id INT PRIMARY KEY, age INT)")
        .unwrap();
    db.execute("INSERT INTO users VALUES (1, NULL)").unwrap();
    db.execute("INSERT INTO users VALUES (2, 30)").unwrap();

    for sql in [
        "SELECT * FROM users WHERE age = 30",
        "SELECT * FROM users WHERE age != 99",
        "SELECT * FROM users WHERE age >= 0",
    ] {
        let result = db.execute(sql).unwrap();
        let rows = result.rows().unwrap();
        assert_eq!(rows.len(), 1, "query: {}", sql);
        assert_eq!(rows[0]["id"], Value::Integer(2), "query: {}", sql);
    }
}

#[test]
fn test_update_returns_count() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    db.execute("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR)")
        .unwrap();
    db.execute("INSERT INTO users VALUES (1, 'Alice')").unwrap();

    let result = db
        .execute("UPDATE users SET name = 'Bob' WHERE id = 1")
        .unwrap();
    assert_eq!(result.count(), Some(1));

    let result = db.execute("SELECT * FROM users WHERE id = 1").unwrap();
    assert_eq!(result.rows().unwrap()[0]["name"], Value::from("Bob"));
}

#[test]
fn test_delete_returns_count() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    db.execute("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR)")
        .unwrap();
    db.execute("INSERT INTO users VALUES (1, 'Alice')").unwrap();

    let result = db.execute("DELETE FROM users WHERE id = 1").unwrap();
    assert_eq!(result.count(), Some(1));

    let result = db.execute("SELECT * FROM users").unwrap();
    assert!(result.rows().unwrap().is_empty());
}

#[test]
fn test_join() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    db.execute("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR)")
        .unwrap();
    db.execute("CREATE TABLE orders (id INT PRIMARY KEY, user_id INT, product VARCHAR)")
        .unwrap();
    db.execute("INSERT INTO users VALUES (1, 'Alice')").unwrap();
    db.execute("INSERT INTO users VALUES (2, 'Loner')").unwrap();
    db.execute("INSERT INTO orders VALUES (1, 1, 'Laptop')").unwrap();

    let result = db
        .execute("SELECT u.name, o.product FROM users u INNER JOIN orders o ON u.id = o.user_id")
        .unwrap();
    let rows = result.rows().unwrap();

    // One merged row per matching pair; the unmatched user produces nothing
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["u.name"], Value::from("Alice"));
    assert_eq!(rows[0]["o.product"], Value::from("Laptop"));
}

#[test]
fn test_delete_then_reinsert_unique_value() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    db.execute("CREATE TABLE users (id INT PRIMARY KEY, email VARCHAR UNIQUE)")
        .unwrap();
    db.execute("INSERT INTO users VALUES (1, 'a@b.com')").unwrap();
    db.execute("INSERT INTO users VALUES (2, 'keep@b.com')").unwrap();
    db.execute("DELETE FROM users WHERE id = 1").unwrap();

    // No stale index entry blocks re-using the deleted value
    db.execute("INSERT INTO users VALUES (3, 'a@b.com')").unwrap();

    let result = db.execute("SELECT * FROM users").unwrap();
    assert_eq!(result.rows().unwrap().len(), 2);
}

#[test]
fn test_persistence_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.db");

    {
        let mut db = Database::open(&path).unwrap();
        db.execute(
            "CREATE TABLE mixed (id INT PRIMARY KEY, label VARCHAR, score FLOAT, active BOOLEAN)",
        )
        .unwrap();
        db.execute("INSERT INTO mixed VALUES (1, 'first', 1.5, TRUE)")
            .unwrap();
        db.execute("INSERT INTO mixed VALUES (2, NULL, 2.5, FALSE)")
            .unwrap();
        db.execute("INSERT INTO mixed VALUES (3, 'third', NULL, NULL)")
            .unwrap();
    }

    let mut db = Database::open(&path).unwrap();
    let result = db.execute("SELECT * FROM mixed").unwrap();
    let rows = result.rows().unwrap();

    // Order-preserving: rows come back in insertion order with all types intact
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["id"], Value::Integer(1));
    assert_eq!(rows[0]["label"], Value::from("first"));
    assert_eq!(rows[0]["score"], Value::Float(1.5));
    assert_eq!(rows[0]["active"], Value::Boolean(true));
    assert!(rows[1]["label"].is_null());
    assert_eq!(rows[2]["id"], Value::Integer(3));

    // Constraints survive the reopen
    let err = db.execute("INSERT INTO mixed VALUES (1, 'dup')").unwrap_err();
    assert!(matches!(err, Error::PrimaryKey(_)));
}

#[test]
fn test_full_crud_scenario() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    db.execute("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR)")
        .unwrap();
    db.execute("INSERT INTO users VALUES (1, 'Alice')").unwrap();

    let result = db.execute("SELECT * FROM users WHERE id = 1").unwrap();
    let rows = result.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], Value::Integer(1));
    assert_eq!(rows[0]["name"], Value::from("Alice"));

    let result = db
        .execute("UPDATE users SET name = 'Bob' WHERE id = 1")
        .unwrap();
    assert_eq!(result.count(), Some(1));

    let result = db.execute("SELECT * FROM users WHERE id = 1").unwrap();
    assert_eq!(result.rows().unwrap()[0]["name"], Value::from("Bob"));

    let result = db.execute("DELETE FROM users WHERE id = 1").unwrap();
    assert_eq!(result.count(), Some(1));

    let result = db.execute("SELECT * FROM users").unwrap();
    assert!(result.rows().unwrap().is_empty());
}

#[test]
fn test_parse_errors_propagate() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    for sql in [
        "DROP TABLE users",
        "EXPLAIN SELECT 1",
        "",
        "SELECT * FROM users WHERE age",
    ] {
        let err = db.execute(sql).unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "query: {:?}", sql);
    }
}

#[test]
fn test_missing_table_errors() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    let err = db.execute("SELECT * FROM ghosts").unwrap_err();
    assert!(matches!(err, Error::TableNotFound(_)));

    let err = db.execute("INSERT INTO ghosts VALUES (1)").unwrap_err();
    assert!(matches!(err, Error::TableNotFound(_)));
}

#[test]
fn test_escaped_quotes_from_callers() {
    let dir = TempDir::new().unwrap();
    let mut db = open_db(&dir);

    db.execute("CREATE TABLE notes (id INT PRIMARY KEY, body VARCHAR)")
        .unwrap();
    // Callers escape embedded single quotes by doubling them
    db.execute("INSERT INTO notes VALUES (1, 'it''s fine')").unwrap();

    let result = db.execute("SELECT * FROM notes").unwrap();
    assert_eq!(result.rows().unwrap()[0]["body"], Value::from("it''s fine"));
}
