//! Helpers shared by the Diesel adapter suites.
//!
//! Each suite gets its own database cloned from a migrated template on one
//! embedded PostgreSQL cluster per test binary.

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{provision_template_database, shared_cluster_handle};

/// Render a `postgres` error with its SQLSTATE and message.
///
/// `Display` on `postgres::Error` collapses server errors to `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

/// Drop `table` so later queries fail with an undefined-table error.
pub fn drop_table(url: &str, table: &str) -> Result<(), String> {
    let mut client = postgres::Client::connect(url, postgres::NoTls)
        .map_err(|err| format_postgres_error(&err))?;
    let escaped = table.replace('"', "\"\"");
    client
        .batch_execute(&format!(r#"DROP TABLE IF EXISTS "{escaped}""#))
        .map_err(|err| format_postgres_error(&err))
}
