//! Snapshot file format: a newline-terminated stream of JSON `Record`s.

use crate::error::{Error, Result};
use crate::ids::LineItemId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Micro-currency units per display unit (1 unit = 10^-6 of the display currency).
pub const CURRENCY_UNIT: i64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub line_item_id: LineItemId,
    pub daily_budget: i64,
}

/// Reads a snapshot file to end-of-stream, decoding each line as a `Record`.
///
/// Consumed sequentially; a decode failure anywhere aborts the whole load.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|e| Error::Snapshot(e.to_string()))?;
    let reader = BufReader::new(file);
    let stream = serde_json::Deserializer::from_reader(reader).into_iter::<Record>();
    stream
        .collect::<std::result::Result<Vec<Record>, _>>()
        .map_err(|e| Error::Snapshot(e.to_string()))
}

/// Writes `count` randomly-generated records to `path`, one JSON object per line.
///
/// Used by the `pacer-snapshot` binary to produce test fixtures.
pub fn generate_snapshot(path: impl AsRef<Path>, count: usize) -> Result<Vec<Record>> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let record = Record {
            line_item_id: LineItemId::new(),
            daily_budget: (rand::random::<u32>() as i64) * CURRENCY_UNIT / 100,
        };
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
        records.push(record);
    }
    writer.flush()?;
    Ok(records)
}
