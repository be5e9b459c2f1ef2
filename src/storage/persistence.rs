//! File-backed durable store: one append-only log file per entity table.
//!
//! Each file is a sequence of frames, a little-endian `u32` length followed by
//! a MessagePack-encoded [`TableEntry`]. The first frame carries the table
//! schema; every following frame is one inserted row.

use crate::core::{AppError, Result, Row};
use crate::schema::{EntityType, SchemaRegistry};
use crate::storage::engine::DurableStore;
use crate::storage::table::TableSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

pub const TABLE_FILE_EXTENSION: &str = "tbl";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TableEntry {
    Create { schema: TableSchema },
    Insert { row: Row },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// fsync after every insert.
    #[default]
    Sync,
    /// Flush to the OS; leave syncing to it.
    Async,
}

impl FromStr for DurabilityMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sync" => Ok(Self::Sync),
            "async" => Ok(Self::Async),
            other => Err(format!("durability mode must be sync|async, got {}", other)),
        }
    }
}

impl fmt::Display for DurabilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync => write!(f, "sync"),
            Self::Async => write!(f, "async"),
        }
    }
}

// ============================================================================
// Table Log
// ============================================================================

/// Result of reading a table file from disk.
#[derive(Debug)]
pub struct LogContents {
    pub entries: Vec<TableEntry>,
    /// Byte length of the complete frames; anything past it is a torn write.
    pub valid_len: u64,
    pub torn_tail: bool,
}

pub struct TableLog {
    path: PathBuf,
    /// `None` after a failed write; reopened on the next append.
    writer: Option<BufWriter<File>>,
    durability_mode: DurabilityMode,
    /// File length up to the last fully written frame.
    len: u64,
    rows_written: usize,
}

impl TableLog {
    /// Opens an existing table file or creates a new one headed by `schema`.
    ///
    /// A torn final frame is cut off before the file is reopened for append.
    /// A file without a complete schema header is rewritten from scratch.
    pub fn open<P: AsRef<Path>>(path: P, schema: &TableSchema, durability_mode: DurabilityMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if path.exists() {
            let contents = read_frames(&path)?;
            if !contents.entries.is_empty() {
                check_header(&path, &contents.entries, schema)?;

                if contents.torn_tail {
                    warn!(path = %path.display(), valid_len = contents.valid_len, "truncating torn frame at end of table file");
                }
                let file = open_for_append(&path, contents.valid_len)?;

                return Ok(Self {
                    rows_written: contents.entries.len().saturating_sub(1),
                    path,
                    writer: Some(BufWriter::new(file)),
                    durability_mode,
                    len: contents.valid_len,
                });
            }
            warn!(path = %path.display(), "table file has no complete schema header; rewriting it");
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| AppError::store_unavailable("Failed to create table file", e))?;
        file.set_len(0)
            .map_err(|e| AppError::store_unavailable("Failed to truncate table file", e))?;

        let mut log = Self {
            path,
            writer: Some(BufWriter::new(file)),
            durability_mode,
            len: 0,
            rows_written: 0,
        };
        log.append(&TableEntry::Create { schema: schema.clone() })?;
        info!(table = schema.name(), path = %log.path.display(), "created table file");
        Ok(log)
    }

    /// Appends one frame. On failure nothing of the frame stays on disk or in
    /// the buffer, so a later append cannot persist it.
    pub fn append(&mut self, entry: &TableEntry) -> Result<()> {
        let serialized = rmp_serde::to_vec(entry)
            .map_err(|e| AppError::store_unavailable("Failed to serialize table entry", e))?;
        let mut frame = Vec::with_capacity(4 + serialized.len());
        frame.extend_from_slice(&(serialized.len() as u32).to_le_bytes());
        frame.extend_from_slice(&serialized);

        if let Err(err) = self.write_frame(&frame) {
            self.discard_unwritten();
            return Err(err);
        }

        self.len += frame.len() as u64;
        if matches!(entry, TableEntry::Insert { .. }) {
            self.rows_written += 1;
        }
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        let durability_mode = self.durability_mode;
        let writer = self.writer()?;
        writer
            .write_all(frame)
            .map_err(|e| AppError::store_unavailable("Failed to write table file", e))?;
        writer
            .flush()
            .map_err(|e| AppError::store_unavailable("Failed to flush table file", e))?;
        if durability_mode == DurabilityMode::Sync {
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| AppError::store_unavailable("Failed to sync table file", e))?;
        }
        Ok(())
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>> {
        if self.writer.is_none() {
            let file = open_for_append(&self.path, self.len)?;
            self.writer = Some(BufWriter::new(file));
        }
        self.writer
            .as_mut()
            .ok_or_else(|| AppError::StoreUnavailable(format!("Table file {} is not open", self.path.display())))
    }

    /// Drops the buffered bytes of a failed frame without flushing them and
    /// cuts the file back to the last complete frame.
    fn discard_unwritten(&mut self) {
        if let Some(writer) = self.writer.take() {
            let (file, _unwritten) = writer.into_parts();
            if let Err(err) = file.set_len(self.len) {
                // The next append reopens the file and truncates it again.
                warn!(path = %self.path.display(), error = %err, "could not truncate failed frame");
            }
        }
    }
}

/// Opens a table file for appending after cutting it to `len` bytes.
fn open_for_append(path: &Path, len: u64) -> Result<File> {
    let file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| AppError::store_unavailable("Failed to open table file", e))?;
    file.set_len(len)
        .map_err(|e| AppError::store_unavailable("Failed to truncate table file", e))?;
    Ok(file)
}

pub fn read_frames(path: &Path) -> Result<LogContents> {
    let file = File::open(path).map_err(|e| AppError::store_unavailable("Failed to open table file for reading", e))?;
    let mut reader = BufReader::new(file);
    let mut entries = Vec::new();
    let mut valid_len = 0u64;

    loop {
        let mut len_bytes = [0u8; 4];
        match read_full(&mut reader, &mut len_bytes)? {
            ReadOutcome::Complete => {}
            ReadOutcome::Eof => return Ok(LogContents { entries, valid_len, torn_tail: false }),
            ReadOutcome::Partial => return Ok(LogContents { entries, valid_len, torn_tail: true }),
        }

        let len = u32::from_le_bytes(len_bytes) as usize;
        let mut data = vec![0u8; len];
        match read_full(&mut reader, &mut data)? {
            ReadOutcome::Complete => {}
            ReadOutcome::Eof | ReadOutcome::Partial => {
                return Ok(LogContents { entries, valid_len, torn_tail: true });
            }
        }

        let entry: TableEntry = rmp_serde::from_slice(&data)
            .map_err(|e| AppError::store_unavailable("Failed to deserialize table entry", e))?;
        entries.push(entry);
        valid_len += 4 + len as u64;
    }
}

enum ReadOutcome {
    Complete,
    Eof,
    Partial,
}

fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<ReadOutcome> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Ok(if filled == 0 { ReadOutcome::Eof } else { ReadOutcome::Partial });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(AppError::store_unavailable("Failed to read table file", e)),
        }
    }
    Ok(ReadOutcome::Complete)
}

fn check_header(path: &Path, entries: &[TableEntry], expected: &TableSchema) -> Result<()> {
    match entries.first() {
        Some(TableEntry::Create { schema }) if schema == expected => Ok(()),
        Some(TableEntry::Create { schema }) => Err(AppError::SchemaMismatch(format!(
            "Table file {} was written with columns {:?}, expected {:?}",
            path.display(),
            schema.schema().column_names(),
            expected.schema().column_names()
        ))),
        _ => Err(AppError::StoreUnavailable(format!(
            "Table file {} has no schema header",
            path.display()
        ))),
    }
}

// ============================================================================
// File Store
// ============================================================================

pub struct FileStore {
    data_dir: PathBuf,
    durability_mode: DurabilityMode,
    tables: HashMap<EntityType, TableLog>,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(data_dir: P, durability_mode: DurabilityMode) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)
            .map_err(|e| AppError::store_unavailable("Failed to create data directory", e))?;
        info!(data_dir = %data_dir.display(), ?durability_mode, "opened file store");
        Ok(Self {
            data_dir,
            durability_mode,
            tables: HashMap::new(),
        })
    }

    pub fn table_path(&self, entity: EntityType) -> PathBuf {
        self.data_dir
            .join(entity.table_name())
            .with_extension(TABLE_FILE_EXTENSION)
    }

}

impl DurableStore for FileStore {
    fn ensure_table(&mut self, entity: EntityType) -> Result<()> {
        if self.tables.contains_key(&entity) {
            return Ok(());
        }
        let path = self.table_path(entity);
        let log = TableLog::open(path, SchemaRegistry::schema(entity), self.durability_mode)?;
        self.tables.insert(entity, log);
        Ok(())
    }

    fn insert(&mut self, entity: EntityType, row: Row) -> Result<()> {
        SchemaRegistry::schema(entity).schema().validate_stored_row(&row)?;
        self.ensure_table(entity)?;

        let log = self
            .tables
            .get_mut(&entity)
            .ok_or_else(|| AppError::StoreUnavailable(format!("Table '{}' is not open", entity)))?;
        log.append(&TableEntry::Insert { row })?;
        debug!(table = %entity, rows = log.rows_written(), "inserted row");
        Ok(())
    }

    fn scan(&self, entity: EntityType) -> Result<Vec<Row>> {
        let path = self.table_path(entity);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = read_frames(&path)?;
        if contents.entries.is_empty() {
            return Ok(Vec::new());
        }
        check_header(&path, &contents.entries, SchemaRegistry::schema(entity))?;
        if contents.torn_tail {
            warn!(table = %entity, "ignoring torn frame at end of table file");
        }

        Ok(contents
            .entries
            .into_iter()
            .filter_map(|entry| match entry {
                TableEntry::Insert { row } => Some(row),
                TableEntry::Create { .. } => None,
            })
            .collect())
    }

    fn table_exists(&self, entity: EntityType) -> bool {
        self.tables.contains_key(&entity) || self.table_path(entity).exists()
    }
}
