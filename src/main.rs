//! Media store maintenance CLI
//!
//! Operational commands for the managed media store: orphan scanning and
//! deletion, and permission repair after an import. Referenced paths are
//! supplied as a newline-delimited file exported by the web application.

use clap::{Parser, Subcommand};
use env_logger;
use log::error;
use std::path::PathBuf;
use std::process;

use gramps_media_store::config::parse_octal_mode;
use gramps_media_store::error::MediaStoreError;
use gramps_media_store::orphans::FileReferenceIndex;
use gramps_media_store::store::{PermissionPolicy, mode_string};
use gramps_media_store::{MediaConfig, MediaStore};

#[derive(Parser)]
#[command(name = "gramps-media-store", version, about = "Maintenance commands for the genealogy media store")]
struct Cli {
    /// Managed media root, overriding configuration and environment
    #[arg(long, global = true)]
    media_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report files with no referencing record (read-only)
    ScanOrphans {
        /// Store subfolder to scan
        #[arg(long, default_value = "imported")]
        subfolder: String,
        /// Newline-delimited file of referenced canonical paths
        #[arg(long)]
        refs: PathBuf,
    },
    /// Delete files with no referencing record (dry run unless --yes)
    DeleteOrphans {
        #[arg(long, default_value = "imported")]
        subfolder: String,
        /// Newline-delimited file of referenced canonical paths
        #[arg(long)]
        refs: PathBuf,
        /// Actually delete; without this flag the command only lists
        #[arg(long)]
        yes: bool,
    },
    /// Apply the permission policy to a store subfolder
    FixPermissions {
        #[arg(long, default_value = "imported")]
        subfolder: String,
        /// Directory permissions in octal
        #[arg(long, default_value = "755")]
        dir_mode: String,
        /// File permissions in octal
        #[arg(long, default_value = "644")]
        file_mode: String,
    },
}

fn main() {
    // env_logger picks up the RUST_LOG environment variable
    env_logger::init();

    if let Err(e) = run() {
        error!("Maintenance command failed: {}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), MediaStoreError> {
    let cli = Cli::parse();

    let mut config = MediaConfig::load()?;
    if let Some(media_root) = cli.media_root {
        config.media_root = media_root;
    }
    let store = MediaStore::new(config);

    match cli.command {
        Command::ScanOrphans { subfolder, refs } => {
            let index =
                FileReferenceIndex::new(refs, store.config().subfolders.clone());
            let report = store.find_orphans(&subfolder, &index)?;
            println!(
                "Scanned {} files under {}/{}",
                report.scanned,
                store.config().media_root_str(),
                subfolder
            );
            if report.is_empty() {
                println!("No orphaned files found");
            } else {
                println!("{} orphaned file(s):", report.len());
                for orphan in &report.orphans {
                    println!("  {}", orphan);
                }
            }
        }
        Command::DeleteOrphans {
            subfolder,
            refs,
            yes,
        } => {
            let index =
                FileReferenceIndex::new(refs, store.config().subfolders.clone());
            let report = store.find_orphans(&subfolder, &index)?;
            if report.is_empty() {
                println!("No orphaned files found");
            } else if !yes {
                println!("{} orphaned file(s) would be deleted:", report.len());
                for orphan in &report.orphans {
                    println!("  {}", orphan);
                }
                println!("Pass --yes to delete them");
            } else {
                let outcome = store.delete_orphans(&report)?;
                println!(
                    "Deleted {} file(s), {} already gone, {} failed",
                    outcome.deleted, outcome.missing, outcome.failed
                );
            }
        }
        Command::FixPermissions {
            subfolder,
            dir_mode,
            file_mode,
        } => {
            let dir_mode = parse_octal_mode(&dir_mode)
                .ok_or_else(|| MediaStoreError::InvalidMode(dir_mode.clone()))?;
            let file_mode = parse_octal_mode(&file_mode)
                .ok_or_else(|| MediaStoreError::InvalidMode(file_mode.clone()))?;
            let policy = PermissionPolicy {
                dir_mode,
                file_mode,
            };
            println!(
                "Fixing permissions in {}/{}",
                store.config().media_root_str(),
                subfolder
            );
            println!("  Directories: {:o} ({})", dir_mode, mode_string(dir_mode));
            println!("  Files: {:o} ({})", file_mode, mode_string(file_mode));

            let report = store.fix_permissions_with(&subfolder, &policy)?;
            println!(
                "Updated {} directories and {} files ({} skipped)",
                report.directories, report.files, report.skipped
            );
            if !report.writable {
                println!(
                    "Warning: {} is still not writable; rerun as the media directory owner",
                    subfolder
                );
            }
        }
    }

    Ok(())
}
