//! Tokio-based file reading implementation for vidgen.
//!
//! This crate provides [`TokioFileRead`], an async file reader that
//! implements the `FileRead` trait from `vidgen_core` using Tokio's file
//! system operations. It is mainly used to load credential key files.

use async_trait::async_trait;
use vidgen_core::{Error, FileRead, Result};

/// Tokio-based implementation of the `FileRead` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::unexpected("failed to read file").with_source(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidgen_core::Context;

    #[tokio::test]
    async fn test_file_read() {
        let dir = tempfile::tempdir().expect("must create tempdir");
        let path = dir.path().join("key.txt");
        std::fs::write(&path, b"token-value\n").expect("must write");

        let ctx = Context::new().with_file_read(TokioFileRead);
        let content = ctx
            .file_read_as_string(path.to_str().expect("path must be utf-8"))
            .await
            .expect("read must succeed");

        assert_eq!(content, "token-value\n");
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let ctx = Context::new().with_file_read(TokioFileRead);
        assert!(ctx.file_read("/definitely/not/there").await.is_err());
    }
}
