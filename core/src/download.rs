use crate::{Context, Error, Result};
use bytes::Bytes;
use futures::StreamExt;
use http::header::CONTENT_LENGTH;
use http::Method;
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};

// Write buffer size for artifact downloads. Generated videos can be large,
// so the body is never held in memory as a whole.
const WRITE_BUF_SIZE: usize = 8 * 1024;

/// Stream the artifact at `url` into `dest`.
///
/// The body is written through a fixed-size buffer to `{dest}.part` and the
/// part file is renamed onto `dest` only after the stream ends cleanly, so a
/// failed download never leaves a truncated artifact at the destination.
/// When the response declares a `Content-Length`, the byte count is verified
/// before the rename.
///
/// Returns the number of bytes written.
pub async fn download_artifact(ctx: &Context, url: &str, dest: &Path) -> Result<u64> {
    let req = http::Request::builder()
        .method(Method::GET)
        .uri(url)
        .body(Bytes::new())?;

    debug!("fetching artifact from {url}");
    let (parts, mut stream) = ctx.http_stream(req).await?.into_parts();

    if !parts.status.is_success() {
        return Err(Error::download_failed(format!(
            "artifact fetch returned {}",
            parts.status
        )));
    }

    let declared = parts
        .headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let part = part_path(dest);
    let file = fs::File::create(&part)
        .await
        .map_err(|e| Error::download_failed("failed to create part file").with_source(e))?;
    let mut writer = BufWriter::with_capacity(WRITE_BUF_SIZE, file);

    let mut written = 0u64;
    let copied: Result<()> = async {
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| Error::download_failed("failed to write artifact").with_source(e))?;
            written += chunk.len() as u64;
        }
        writer
            .flush()
            .await
            .map_err(|e| Error::download_failed("failed to flush artifact").with_source(e))?;
        Ok(())
    }
    .await;

    if let Err(err) = copied {
        let _ = fs::remove_file(&part).await;
        return Err(err);
    }

    if let Some(expected) = declared {
        if expected != written {
            let _ = fs::remove_file(&part).await;
            return Err(Error::download_failed(format!(
                "artifact truncated: wrote {written} of {expected} bytes"
            )));
        }
    }

    fs::rename(&part, dest)
        .await
        .map_err(|e| Error::download_failed("failed to finalize artifact").with_source(e))?;

    debug!("artifact saved to {} ({written} bytes)", dest.display());
    Ok(written)
}

fn part_path(dest: &Path) -> PathBuf {
    let mut os = dest.as_os_str().to_os_string();
    os.push(".part");
    PathBuf::from(os)
}
