use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payment_validator::application::validation_service::ValidationService;
use payment_validator::config::PipelineConfig;
use payment_validator::domain::ports::SharedTransactionRepository;
use payment_validator::domain::validation::RuleChain;
use payment_validator::error::PaymentError;
use payment_validator::infrastructure::in_memory::InMemoryTransactionRepository;
use payment_validator::interfaces::json::transaction_reader::TransactionReader;
use payment_validator::interfaces::json::transaction_writer::TransactionWriter;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input transactions file, one JSON object per line
    input: PathBuf,

    /// Path to persistent database for declined transactions (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Write every declined transaction to this file once the input is processed
    #[arg(long)]
    declined_output: Option<PathBuf>,

    #[command(flatten)]
    pipeline: PipelineConfig,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_repository(db_path: Option<PathBuf>) -> Result<SharedTransactionRepository> {
    use payment_validator::infrastructure::rocksdb::RocksDBTransactionRepository;

    match db_path {
        Some(path) => {
            let repository = RocksDBTransactionRepository::open(path).into_diagnostic()?;
            Ok(Arc::new(repository))
        }
        None => Ok(Arc::new(InMemoryTransactionRepository::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_repository(db_path: Option<PathBuf>) -> Result<SharedTransactionRepository> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Arc::new(InMemoryTransactionRepository::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let repository = open_repository(cli.db_path)?;
    let (inbound, inbound_rx) = cli.pipeline.inbound_channel().into_diagnostic()?;
    let (outbound_tx, mut outbound) = cli.pipeline.outbound_channel().into_diagnostic()?;

    let service = ValidationService::new(
        RuleChain::default(),
        Arc::clone(&repository),
        inbound_rx,
        outbound_tx,
    );
    service.run().into_diagnostic()?;

    // Downstream stage: forwarded transactions go to stdout
    let downstream = tokio::spawn(async move {
        let mut writer = TransactionWriter::new(io::stdout());
        while let Some(tx) = outbound.recv().await {
            writer.write_transaction(&tx)?;
        }
        writer.flush()
    });

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = TransactionReader::new(file);
    for tx_result in reader.transactions() {
        match tx_result {
            Ok(tx) => {
                if inbound.send(tx).await.is_err() {
                    error!("Validation worker stopped before the input was exhausted");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "Error reading transaction");
            }
        }
    }
    drop(inbound);

    let stats = service.join().await.into_diagnostic()?;
    downstream
        .await
        .map_err(PaymentError::from)
        .into_diagnostic()?
        .into_diagnostic()?;

    info!(
        received = stats.received,
        forwarded = stats.forwarded,
        declined = stats.declined,
        persistence_failures = stats.persistence_failures,
        "Pipeline finished"
    );

    if let Some(path) = cli.declined_output {
        let declined = repository.get_all().await.into_diagnostic()?;
        let file = File::create(path).into_diagnostic()?;
        TransactionWriter::new(io::BufWriter::new(file))
            .write_transactions(declined)
            .into_diagnostic()?;
    }

    Ok(())
}
