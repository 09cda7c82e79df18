use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use docqa_core::config::{resolve_with_base, Config, DataConfig};
use docqa_core::data_processor::{group_records, ChunkingConfig, DataProcessor};
use docqa_core::traits::Retriever;
use docqa_core::types::{Document, RetrievalResult};
use docqa_retrieve::{GenerationRequest, LexicalRetriever};

#[derive(Parser)]
#[command(name = "docqa", version, about = "Ask questions against plain-text documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chunk every .txt file under a directory and emit chunk records as JSON lines.
    Chunk {
        /// Directory to scan (defaults to data.docs_dir).
        dir: Option<PathBuf>,
        /// Output file (defaults to data.records_path).
        #[arg(long, conflicts_with = "stdout")]
        out: Option<PathBuf>,
        /// Write records to stdout instead of a file.
        #[arg(long)]
        stdout: bool,
    },
    /// Rank passages for a question.
    Query {
        question: String,
        /// Directory of .txt documents (defaults to data.docs_dir).
        #[arg(long, conflicts_with = "records")]
        dir: Option<PathBuf>,
        /// JSON-lines chunk records written by `docqa chunk`.
        #[arg(long)]
        records: Option<PathBuf>,
        /// Print the retrieval result as JSON.
        #[arg(long)]
        json: bool,
        /// Print the generation request instead of the ranked passages.
        #[arg(long, conflicts_with = "json")]
        prompt: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;
    let engine = config.engine()?;
    let data = config.data()?;
    let base = std::env::current_dir()?;

    match cli.command {
        Command::Chunk { dir, out, stdout } => {
            let data_dir = dir.unwrap_or_else(|| resolve_with_base(&base, &data.docs_dir));
            let processor = DataProcessor::with_config(engine.chunking.clone())?;
            let documents = load_with_progress(&processor, &data_dir)?;
            let written = if stdout {
                processor.write_records(&documents, io::stdout().lock())?
            } else {
                let path = out.unwrap_or_else(|| resolve_with_base(&base, &data.records_path));
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                let file = fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
                processor.write_records(&documents, BufWriter::new(file))?
            };
            tracing::info!("Wrote {} chunk records from {} documents", written, documents.len());
        }
        Command::Query { question, dir, records, json, prompt } => {
            let documents = load_documents(&base, &data, &engine.chunking, dir, records)?;
            let retriever = LexicalRetriever::new(engine.retrieval);
            let result = retriever.retrieve(&question, &documents)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if prompt {
                println!("{}", serde_json::to_string_pretty(&GenerationRequest::new(&question, &result))?);
            } else {
                print_result(&result);
            }
        }
    }
    Ok(())
}

/// Precedence: `--records` > `--dir` > `data.docs_dir`.
fn load_documents(
    base: &Path,
    data: &DataConfig,
    chunking: &ChunkingConfig,
    dir: Option<PathBuf>,
    records: Option<PathBuf>,
) -> anyhow::Result<Vec<Document>> {
    let processor = DataProcessor::with_config(chunking.clone())?;
    if let Some(path) = records {
        let records = processor.read_records(&path)?;
        tracing::info!("Loaded {} chunk records from {}", records.len(), path.display());
        return Ok(group_records(records));
    }
    let data_dir = dir.unwrap_or_else(|| resolve_with_base(base, &data.docs_dir));
    processor.process_directory(&data_dir)
}

fn load_with_progress(processor: &DataProcessor, data_dir: &Path) -> anyhow::Result<Vec<Document>> {
    let files = processor.list_txt_files(data_dir);
    if files.is_empty() {
        tracing::warn!("No .txt files found under {}", data_dir.display());
        return Ok(vec![]);
    }
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")?);
    let mut documents = Vec::with_capacity(files.len());
    for file in &files {
        pb.set_message(file.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default());
        documents.extend(processor.process_files(std::slice::from_ref(file), data_dir));
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(documents)
}

fn print_result(result: &RetrievalResult) {
    if result.is_empty() {
        println!("No relevant information found.");
        return;
    }
    println!("Confidence: {:.0}%\n", result.confidence);
    for (i, c) in result.chunks.iter().enumerate() {
        let preview: String = c.text.chars().take(160).collect();
        println!("Source {}  score={:.3}  {} #{}\n    {}", i + 1, c.score, c.document_name, c.source_index, preview);
    }
}
