use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cloud_worker_lifecycle::api::node_record_dto::NodeRecordDto;
use cloud_worker_lifecycle::domain::node::migrator;
use cloud_worker_lifecycle::domain::node::node_record::StoredNodeRecord;
use cloud_worker_lifecycle::error::Result;
use cloud_worker_lifecycle::loader::parser::{parse_json_file, write_json_file};
use cloud_worker_lifecycle::{load_config, logger};

#[derive(Debug, Parser)]
#[command(name = "node-lifecycle", about = "Maintenance tooling for persisted cloud node records")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a node record of any format version into the current one.
    Migrate {
        /// Persisted node record (JSON).
        record: PathBuf,

        /// Controller configuration supplying default options for legacy records.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Replace the record file instead of printing the result.
        #[arg(long)]
        write: bool,
    },
}

fn main() -> ExitCode {
    logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Migrate { record, config, write } => {
            let config = load_config(config.as_deref())?;
            let dto: NodeRecordDto = parse_json_file(&record)?;
            let migrated = migrator::normalize(StoredNodeRecord::try_from(dto)?, &config.default_options)?;
            let out = NodeRecordDto::from(&migrated);

            if write {
                write_json_file(&record, &out)?;
                log::info!("Record '{}' migrated in place.", record.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            Ok(())
        }
    }
}
