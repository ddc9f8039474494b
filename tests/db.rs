use diesel::connection::SimpleConnection;

mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let test_db = common::TestDb::new();
    let pool = test_db.pool();
    let conn = pool.get();
    assert!(conn.is_ok());
}

#[test]
fn test_pool_connections_enforce_foreign_keys() {
    let test_db = common::TestDb::new();
    let mut conn = test_db.pool().get().unwrap();
    conn.batch_execute("CREATE TABLE parents (id INTEGER PRIMARY KEY);")
        .unwrap();
    conn.batch_execute(
        "CREATE TABLE children (id INTEGER PRIMARY KEY, parent_id INTEGER NOT NULL REFERENCES parents(id));",
    )
    .unwrap();
    assert!(
        conn.batch_execute("INSERT INTO children (id, parent_id) VALUES (1, 42);")
            .is_err()
    );
}
