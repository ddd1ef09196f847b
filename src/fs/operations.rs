use std::{
    io::{ErrorKind, SeekFrom},
    path::Path,
};

use anyhow::{Context, Result};
use fs4::tokio::AsyncFileExt;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::{debug, warn};

/// Reads a file of JSON values, one per line. A missing file is the same as an empty one.
/// Lines that aren't valid UTF-8 or don't deserialize into `T` are skipped with a warning, a
/// partially written last line is expected after a crash.
pub async fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    debug!("Extracting {path:?}");
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(e).with_context(|| format!("Failed to open {path:?}")),
    };

    file.lock_shared()?;
    let mut buffer = Vec::new();
    let read = file.read_to_end(&mut buffer).await;
    file.unlock_async().await?;
    read.with_context(|| format!("Failed to read {path:?}"))?;

    Ok(parse_json_lines(path, &buffer))
}

fn parse_json_lines<T: DeserializeOwned>(path: &Path, buffer: &[u8]) -> Vec<T> {
    let mut values = vec![];
    for (index, line) in buffer.split(|v| *v == b'\n').enumerate() {
        let Ok(line) = std::str::from_utf8(line) else {
            warn!("Line {} in {path:?} is not valid utf-8", index + 1);
            continue;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(v) => values.push(v),
            Err(e) => {
                warn!(
                    "During parsing in path {:?} found illegal json string {}:  {e}",
                    path, line
                )
            }
        }
    }
    values
}

fn encode_line<T: Serialize>(value: &T, buffer: &mut Vec<u8>) -> Result<()> {
    serde_json::to_writer(&mut *buffer, value)?;
    buffer.push(b'\n');
    Ok(())
}

/// Appends a single value as a new line. The file is created when missing. A last line cut short
/// by a crash is closed first, so only the broken line is lost and not the new one.
pub async fn append_json_line<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buffer = Vec::<u8>::new();
    encode_line(value, &mut buffer)?;

    let mut file = File::options()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .await
        .with_context(|| format!("Failed to open {path:?} for appending"))?;

    file.lock_exclusive()?;
    let result = async {
        if !ends_with_newline(&mut file).await? {
            warn!("Last line of {path:?} is incomplete, starting a new one");
            file.write_all(b"\n").await?;
        }
        file.write_all(&buffer).await?;
        file.flush().await
    }
    .await;
    file.unlock_async().await?;
    result.with_context(|| format!("Failed to append to {path:?}"))
}

/// True for an empty file or one whose last byte is a line break.
async fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata().await?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    Ok(last[0] == b'\n')
}

/// Replaces the whole file with `values`. The content goes to a sibling file first and is then
/// renamed over the target, so readers see either the old or the new content. The sibling is
/// removed when anything fails.
pub async fn overwrite_json_lines<T: Serialize>(path: &Path, values: &[T]) -> Result<()> {
    let mut buffer = Vec::<u8>::new();
    for value in values {
        encode_line(value, &mut buffer)?;
    }

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = Path::new(&staging);

    let result = async {
        let mut file = File::create(staging)
            .await
            .with_context(|| format!("Failed to create {staging:?}"))?;
        file.write_all(&buffer).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(staging, path)
            .await
            .with_context(|| format!("Failed to replace {path:?}"))
    }
    .await;

    if result.is_err() {
        if let Err(e) = tokio::fs::remove_file(staging).await {
            debug!("Couldn't remove {staging:?} {e}");
        }
    }
    result
}
