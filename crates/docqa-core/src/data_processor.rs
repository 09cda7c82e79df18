use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::hash::Hasher;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::types::{Document, DocumentChunk};

/// Word-window chunking parameters. `overlap` must stay below `window_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub window_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { window_size: 500, overlap: 50 }
    }
}

impl ChunkingConfig {
    pub fn new(window_size: usize, overlap: usize) -> crate::error::Result<Self> {
        let config = Self { window_size, overlap };
        config.step()?;
        Ok(config)
    }

    /// Words advanced between consecutive windows.
    pub fn step(&self) -> crate::error::Result<usize> {
        if self.window_size == 0 || self.overlap >= self.window_size {
            return Err(Error::InvalidConfiguration(format!(
                "overlap ({}) must be smaller than window_size ({})",
                self.overlap, self.window_size
            )));
        }
        Ok(self.window_size - self.overlap)
    }
}

/// Split `text` into overlapping windows of `window_size` words.
///
/// Windows start every `window_size - overlap` words until the word sequence
/// is exhausted, so a text of `n` words yields `ceil(n / step)` chunks. The
/// trailing windows may be shorter than `window_size`.
pub fn chunk_words(text: &str, config: &ChunkingConfig) -> crate::error::Result<Vec<String>> {
    let step = config.step()?;
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut chunks = Vec::with_capacity(words.len().div_ceil(step));
    let mut start = 0;
    while start < words.len() {
        let end = start.saturating_add(config.window_size).min(words.len());
        let chunk = words[start..end].join(" ");
        if !chunk.trim().is_empty() {
            chunks.push(chunk);
        }
        start = start.saturating_add(step);
    }
    Ok(chunks)
}

/// Turns `.txt` files on disk into chunked [`Document`]s and moves chunk
/// records in and out of JSON-lines files.
#[derive(Default)]
pub struct DataProcessor {
    chunking_config: ChunkingConfig,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(chunking_config: ChunkingConfig) -> crate::error::Result<Self> {
        chunking_config.step()?;
        Ok(Self { chunking_config })
    }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<Document>> {
        let files = self.list_txt_files(data_dir);
        if files.is_empty() {
            tracing::info!("No .txt files found under {}", data_dir.display());
            return Ok(vec![]);
        }
        let documents = self.process_files(&files, data_dir);
        let chunk_count: usize = documents.iter().map(|d| d.chunks.len()).sum();
        tracing::info!("Processed {} files into {} chunks", documents.len(), chunk_count);
        Ok(documents)
    }

    /// Process `files` in order. A file that cannot be read is logged and
    /// skipped so one bad file does not abort the ingest.
    pub fn process_files(&self, files: &[PathBuf], data_dir: &Path) -> Vec<Document> {
        let mut documents = Vec::with_capacity(files.len());
        for (file_index, file_path) in files.iter().enumerate() {
            tracing::debug!("Processing file {}/{}: {}", file_index + 1, files.len(), file_path.display());
            match self.process_file(file_path, data_dir) {
                Ok(document) => documents.push(document),
                Err(e) => tracing::warn!("Skipping {}: {:#}", file_path.display(), e),
            }
        }
        documents
    }

    /// Read and chunk one file. The document id is derived from the path
    /// relative to `data_dir`, so re-ingesting the same tree is stable.
    pub fn process_file(&self, file_path: &Path, data_dir: &Path) -> Result<Document> {
        let content = self.read_file_content(file_path)?;
        let relative_path = file_path.strip_prefix(data_dir).unwrap_or(file_path);
        let id = document_id(&relative_path.to_string_lossy());
        let name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| relative_path.to_string_lossy().to_string());
        let chunks = chunk_words(&content, &self.chunking_config)?;
        Ok(Document { id, name, chunks })
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => {
                let bytes = fs::read(file_path).with_context(|| format!("reading {}", file_path.display()))?;
                tracing::warn!("{} is not valid UTF-8, decoding lossily", file_path.display());
                Ok(String::from_utf8_lossy(&bytes).to_string())
            }
        }
    }

    pub fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("txt"))
            .collect();
        txt_files.sort();
        txt_files
    }

    /// Write one JSON object per chunk record.
    pub fn write_records<W: Write>(&self, documents: &[Document], mut writer: W) -> Result<usize> {
        let mut written = 0;
        for record in documents.iter().flat_map(Document::records) {
            serde_json::to_writer(&mut writer, &record)?;
            writer.write_all(b"\n")?;
            written += 1;
        }
        writer.flush()?;
        Ok(written)
    }

    /// Read chunk records written by [`DataProcessor::write_records`]. Blank
    /// lines are skipped; malformed lines are an error.
    pub fn read_records(&self, path: &Path) -> Result<Vec<DocumentChunk>> {
        let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut records = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            let record: DocumentChunk = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}: invalid chunk record", path.display(), line_no + 1))?;
            records.push(record);
        }
        Ok(records)
    }
}

/// Rebuild documents from persisted chunk records.
///
/// Documents keep the order in which their first record appears; chunks are
/// ordered by `chunk_index`. Duplicate indices keep the last record seen.
pub fn group_records(records: Vec<DocumentChunk>) -> Vec<Document> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: BTreeMap<String, (String, BTreeMap<usize, String>)> = BTreeMap::new();
    for record in records {
        let entry = grouped.entry(record.doc_id.clone()).or_insert_with(|| {
            order.push(record.doc_id.clone());
            (record.doc_name.clone(), BTreeMap::new())
        });
        if entry.1.insert(record.chunk_index, record.content).is_some() {
            tracing::warn!("duplicate chunk {}:{} replaced", record.doc_id, record.chunk_index);
        }
    }
    order
        .into_iter()
        .filter_map(|id| {
            let (name, chunks) = grouped.remove(&id)?;
            Some(Document { id, name, chunks: chunks.into_values().collect() })
        })
        .collect()
}

/// Stable 16-hex-digit id for a document path.
pub fn document_id(relative_path: &str) -> String {
    let mut hasher = twox_hash::XxHash64::with_seed(0);
    hasher.write(relative_path.as_bytes());
    format!("{:016x}", hasher.finish())
}
