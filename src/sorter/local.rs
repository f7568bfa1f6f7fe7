use crate::record::types::{Record, decode_records};

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Stable sort by key. Records with equal keys keep their relative order.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| a.cmp_key(b));
}

pub fn is_sorted(records: &[Record]) -> bool {
    records.windows(2).all(|pair| pair[0].key() <= pair[1].key())
}

/// Reads a whole input shard. An empty file is a valid, empty shard.
pub async fn read_records(path: &Path) -> Result<Vec<Record>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("could not read input file {}", path.display()))?;

    let records = decode_records(&bytes)
        .with_context(|| format!("invalid input file {}", path.display()))?;

    tracing::info!("Read {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Writes records back to back and syncs the file. Creates or truncates `path`.
pub async fn write_records(path: &Path, records: &[Record]) -> Result<()> {
    let file = File::create(path)
        .await
        .with_context(|| format!("could not create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for record in records {
        writer.write_all(record.as_bytes()).await?;
    }
    writer.flush().await?;
    writer.get_ref().sync_all().await?;

    tracing::info!("Wrote {} record(s) to {}", records.len(), path.display());
    Ok(())
}

/// Sorts `records` and persists them to `path`.
pub async fn sort_and_write(path: &Path, mut records: Vec<Record>) -> Result<usize> {
    sort_records(&mut records);
    write_records(path, &records).await?;
    Ok(records.len())
}
