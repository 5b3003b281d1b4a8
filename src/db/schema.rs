//! SQL DDL for the detection log store.
//! Layout matches files written by the earlier declarative backend, so an
//! existing `test.db` opens unchanged.

/// One registered table: its name, the columns it is declared with, and the
/// statements that create it (and its indexes) when absent.
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub ddl: &'static [&'static str],
}

pub const DETECTION_HISTORY: TableDef = TableDef {
    name: "detection_history",
    columns: &[
        "id",
        "object_name",
        "advice",
        "image_path",
        "heatmap_path",
        "user_email",
    ],
    ddl: &[
        // `user_email` deliberately carries no REFERENCES clause.
        r#"CREATE TABLE IF NOT EXISTS detection_history (
            id INTEGER NOT NULL,
            object_name VARCHAR,
            advice VARCHAR,
            image_path VARCHAR,
            heatmap_path VARCHAR,
            user_email VARCHAR,
            PRIMARY KEY (id)
        )"#,
        "CREATE INDEX IF NOT EXISTS ix_detection_history_id ON detection_history (id)",
    ],
};

pub const USERS: TableDef = TableDef {
    name: "users",
    columns: &[
        "id",
        "first_name",
        "last_name",
        "email",
        "password",
        "google_id",
    ],
    ddl: &[
        r#"CREATE TABLE IF NOT EXISTS users (
            id INTEGER NOT NULL,
            first_name VARCHAR,
            last_name VARCHAR,
            email VARCHAR,
            password VARCHAR,
            google_id VARCHAR,
            PRIMARY KEY (id)
        )"#,
        "CREATE INDEX IF NOT EXISTS ix_users_id ON users (id)",
        "CREATE UNIQUE INDEX IF NOT EXISTS ix_users_email ON users (email)",
        "CREATE UNIQUE INDEX IF NOT EXISTS ix_users_google_id ON users (google_id)",
    ],
};

/// Every table the initializer creates, in creation order.
pub const TABLES: &[TableDef] = &[DETECTION_HISTORY, USERS];

pub fn table_names() -> impl Iterator<Item = &'static str> {
    TABLES.iter().map(|t| t.name)
}
