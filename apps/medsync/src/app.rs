//! Command handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Subcommand};
use medsync_girder::Client;
use medsync_protocol::PathKey;
use medsync_store::Store;
use medsync_sync::{PatientInfo, SyncRunner, SyncStatus, UploadOutcome, ingest_file};
use tracing::info;

use crate::config::Config;
use crate::girder_adapter::GirderRemote;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the local database, optionally with demo centers and patients
    Init {
        #[arg(long)]
        seed: bool,
    },
    /// Copy a file into the uploads tree and record it as pending sync
    Ingest {
        file: PathBuf,
        #[command(flatten)]
        target: Target,
    },
    /// Show local sync counts
    Status,
    /// Print the local center / patient / visit / document tree
    Tree {
        /// Also list the files under each document type
        #[arg(long)]
        files: bool,
    },
    #[command(flatten)]
    Remote(RemoteCommand),
}

/// Commands that talk to Girder.
#[derive(Debug, Subcommand)]
pub enum RemoteCommand {
    /// Create the remote folder tree for every local document path
    Schema,
    /// Upload every unsynced file
    Sync,
    /// Upload a single file record
    SyncOne { id: i64 },
    /// Upload a local file straight to its remote folder
    Upload {
        file: PathBuf,
        #[command(flatten)]
        target: Target,
        /// Expand a ZIP and upload its entries instead of the archive
        #[arg(long)]
        extract: bool,
    },
    /// Create a patient folder, attach demographics and upload any given files into it
    Patient {
        #[arg(long)]
        center: String,
        #[arg(long)]
        patient: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        sex: String,
        /// Files uploaded as-is into the patient folder
        files: Vec<PathBuf>,
    },
    /// Check that the Girder root folder is reachable
    Health,
}

/// Center / patient / visit / document a file belongs to.
#[derive(Debug, Args)]
pub struct Target {
    #[arg(long)]
    center: String,
    #[arg(long)]
    patient: String,
    #[arg(long)]
    visit: String,
    #[arg(long)]
    document: String,
}

impl Target {
    fn key(&self) -> PathKey {
        PathKey::new(&self.center, &self.patient, &self.visit, &self.document)
    }
}

pub async fn run(command: Command, config: Config) -> anyhow::Result<ExitCode> {
    let store = Store::open(&config.store.database)
        .with_context(|| format!("opening {}", config.store.database.display()))?;

    match command {
        Command::Init { seed } => {
            if seed && store.seed_demo_structure()? {
                println!("seeded demo structure");
            }
            println!(
                "database ready at {} ({} document paths)",
                config.store.database.display(),
                store.document_paths()?.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Ingest { file, target } => {
            let record = ingest_file(&store, &config.store.uploads_dir, &file, &target.key()).await?;
            println!(
                "ingested #{} {} ({} bytes) under {}",
                record.id, record.file_name, record.size, record.path
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            let (total, synced) = store.file_counts()?;
            println!("files: {total}, synced: {synced}, pending: {}", total - synced);
            Ok(ExitCode::SUCCESS)
        }
        Command::Tree { files } => {
            print_tree(&store, files)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Remote(command) => run_remote(command, &config, &store).await,
    }
}

async fn run_remote(command: RemoteCommand, config: &Config, store: &Store) -> anyhow::Result<ExitCode> {
    let client = Client::new(&config.client_config()?)?;
    let remote = GirderRemote::new(client);
    let runner = SyncRunner::new(&remote, &remote, store, config.sync_config()?);

    match command {
        RemoteCommand::Schema => {
            let report = runner.create_structure().await?;
            println!("resolved {} document folders", report.resolved);
            for failure in &report.failures {
                println!("  FAILED {}: {}", failure.path, failure.error);
            }
            Ok(exit_code(report.failures.is_empty()))
        }
        RemoteCommand::Sync => {
            let report = runner.sync_all().await?;
            println!(
                "total: {}, synced: {}, failed: {} ({:?})",
                report.total,
                report.synced,
                report.failed,
                report.status()
            );
            for failure in report.failures() {
                println!("  FAILED #{} {}: {}", failure.record_id, failure.file_name, failure.message);
            }
            Ok(exit_code(matches!(
                report.status(),
                SyncStatus::FullySynced | SyncStatus::NothingToSync
            )))
        }
        RemoteCommand::SyncOne { id } => {
            let detail = runner.sync_record(id).await?;
            println!("#{} {}: {}", detail.record_id, detail.file_name, detail.message);
            Ok(exit_code(detail.success))
        }
        RemoteCommand::Upload {
            file,
            target,
            extract,
        } => match runner.upload_file(&file, &target.key(), extract).await? {
            UploadOutcome::File(uploaded) => {
                println!("uploaded {} as {} ({} bytes)", uploaded.name, uploaded.file_id, uploaded.size);
                Ok(ExitCode::SUCCESS)
            }
            UploadOutcome::Archive(report) => {
                println!(
                    "{}: {} entries uploaded, {} failed",
                    report.archive_name,
                    report.uploaded.len(),
                    report.failed.len()
                );
                for failure in &report.failed {
                    println!("  FAILED {}: {}", failure.entry_path, failure.error);
                }
                Ok(exit_code(report.is_clean()))
            }
        },
        RemoteCommand::Patient {
            center,
            patient,
            age,
            sex,
            files,
        } => {
            let info = PatientInfo {
                center_code: center,
                patient_id: patient,
                age,
                sex,
            };
            if files.is_empty() {
                let folder_id = runner.sync_patient(&info).await?;
                println!("patient {} synced to folder {folder_id}", info.patient_id);
                return Ok(ExitCode::SUCCESS);
            }
            let report = runner.upload_patient_files(&info, &files).await?;
            println!(
                "patient {} synced to folder {}: {} file(s) uploaded, {} failed",
                info.patient_id,
                report.patient_folder_id,
                report.uploaded.len(),
                report.failed.len()
            );
            for failure in &report.failed {
                println!("  FAILED {}: {}", failure.name, failure.error);
            }
            Ok(exit_code(report.is_clean()))
        }
        RemoteCommand::Health => {
            let root = runner.health().await?;
            info!(root = %root.id, "Girder reachable");
            println!("ok: root folder '{}' ({})", root.name, root.id);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_tree(store: &Store, with_files: bool) -> anyhow::Result<()> {
    let folder = |id: &Option<String>| match id {
        Some(id) => format!(" [{id}]"),
        None => String::new(),
    };

    for center in store.structure()? {
        println!("{} ({}){}", center.name, center.code, folder(&center.folder_id));
        for patient in &center.patients {
            println!("  {}{}", patient.patient_id, folder(&patient.folder_id));
            for visit in &patient.visits {
                println!("    {} ({}){}", visit.name, visit.code, folder(&visit.folder_id));
                for doc in &visit.documents {
                    println!(
                        "      {}{}: {} file(s), {} pending",
                        doc.name,
                        folder(&doc.folder_id),
                        doc.file_count,
                        doc.pending_count()
                    );
                    if with_files && doc.file_count > 0 {
                        let key = PathKey::new(&center.code, &patient.patient_id, &visit.name, &doc.name);
                        for file in store.files_for(&key)? {
                            let state = match &file.remote_file_id {
                                Some(id) if file.synced => format!("synced as {id}"),
                                _ => "pending".to_string(),
                            };
                            println!("        #{} {} ({} bytes, {state})", file.id, file.file_name, file.size);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
