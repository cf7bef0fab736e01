//! Append-only log of created Salesforce record IDs, one per line.
//!
//! Lets test records be handed to a Salesforce administrator for cleanup.

use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

pub async fn append_created_id(path: &Path, id: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(format!("{}\n", id).as_bytes()).await?;
    file.flush().await?;

    tracing::debug!("Recorded created ID {} in {}", id, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_appends_one_id_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("created_ids.txt");

        append_created_id(&path, "0031N00001AAAAA").await.unwrap();
        append_created_id(&path, "0031N00001BBBBB").await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents, "0031N00001AAAAA\n0031N00001BBBBB\n");
    }
}
