//! Applies the store's schema, seed data and functions from SQL files.

use crate::error::PostgreSQLStoreError;
use std::path::{Path, PathBuf};
use tokio_postgres::Client;
use tracing::info;

/// List the `.sql` files of a directory in lexicographic order.
pub fn collect_sql_files(dir: &Path) -> Result<Vec<PathBuf>, PostgreSQLStoreError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map(|e| e == "sql").unwrap_or(false) {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(PostgreSQLStoreError::NoSqlFiles(dir.display().to_string()));
    }

    files.sort();
    Ok(files)
}

/// Apply each file in its own transaction, stopping at the first failure.
///
/// Returns the number of files applied.
pub async fn apply_sql_files(
    client: &mut Client,
    files: &[PathBuf],
) -> Result<usize, PostgreSQLStoreError> {
    for file in files {
        let sql = std::fs::read_to_string(file)?;
        info!("Applying {:?}", file.file_name().unwrap_or(file.as_os_str()));

        let transaction = client.transaction().await?;
        transaction.batch_execute(&sql).await?;
        transaction.commit().await?;
    }
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_sql_files_sorted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("03_functions.sql"), "SELECT 1;").unwrap();
        std::fs::write(dir.path().join("01_schema.sql"), "SELECT 1;").unwrap();
        std::fs::write(dir.path().join("02_seed_data.sql"), "SELECT 1;").unwrap();
        std::fs::write(dir.path().join("README.md"), "ignored").unwrap();

        let files = collect_sql_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(
            names,
            vec!["01_schema.sql", "02_seed_data.sql", "03_functions.sql"]
        );
    }

    #[test]
    fn test_collect_sql_files_empty_dir() {
        let dir = TempDir::new().unwrap();
        let err = collect_sql_files(dir.path()).unwrap_err();
        assert!(matches!(err, PostgreSQLStoreError::NoSqlFiles(_)));
    }

    #[test]
    fn test_collect_sql_files_missing_dir() {
        let err = collect_sql_files(Path::new("/nonexistent/sql/dir")).unwrap_err();
        assert!(matches!(err, PostgreSQLStoreError::Io(_)));
    }
}
