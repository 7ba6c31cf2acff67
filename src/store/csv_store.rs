use async_trait::async_trait;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{OrderSink, OrderSource};
use crate::errors::ServiceError;
use crate::models::{OrderRecord, ORDER_COLUMNS};

/// Order history kept in a single CSV file.
///
/// Clones share the same write lock, so appends from any clone are serialized.
#[derive(Debug, Clone)]
pub struct CsvOrderStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvOrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Raw file contents for download; a missing file exports the header only.
    pub async fn export(&self) -> Result<Vec<u8>, ServiceError> {
        let path = self.path.clone();
        let bytes = tokio::task::spawn_blocking(move || match fs::read(&path) {
            Ok(bytes) if !bytes.is_empty() => Ok(bytes),
            Ok(_) => Ok(header_line()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(header_line()),
            Err(err) => Err(err),
        })
        .await??;
        Ok(bytes)
    }
}

#[async_trait]
impl OrderSource for CsvOrderStore {
    async fn load(&self) -> Result<Vec<OrderRecord>, ServiceError> {
        let path = self.path.clone();
        let records = tokio::task::spawn_blocking(move || read_records(&path)).await??;
        debug!(path = %self.path.display(), rows = records.len(), "loaded order snapshot");
        Ok(records)
    }
}

#[async_trait]
impl OrderSink for CsvOrderStore {
    async fn append(&self, record: &OrderRecord) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || append_record(&path, &record)).await??;
        info!(path = %self.path.display(), "order appended");
        Ok(())
    }
}

fn header_line() -> Vec<u8> {
    format!("{}\n", ORDER_COLUMNS.join(",")).into_bytes()
}

fn read_records(path: &Path) -> Result<Vec<OrderRecord>, ServiceError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "order file missing; empty snapshot");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(file);

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (row_idx, result) in reader.deserialize::<OrderRecord>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                warn!(path = %path.display(), row = row_idx + 1, error = %err, "skipping malformed order row");
            }
        }
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, kept = records.len(), "order file had malformed rows");
    }
    Ok(records)
}

fn append_record(path: &Path, record: &OrderRecord) -> Result<(), ServiceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;
    let len = file.metadata()?.len();

    if len > 0 && !ends_with_newline(&mut file)? {
        file.write_all(b"\n")?;
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    if len == 0 {
        writer.write_record(ORDER_COLUMNS)?;
    }
    writer.write_record(record.to_row())?;
    writer.flush()?;
    Ok(())
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
