use clap::Parser;
use restore_core::AppConfig;
use restore_io::{codec, BackupStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Check that every backup of a scene decodes and re-encodes identically
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides the configured backup directory.
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Overrides the configured scene name.
    #[arg(short, long)]
    scene: Option<String>,
}

enum Outcome {
    Ok,
    Unreadable(String),
    Drift { original: usize, reencoded: usize },
}

fn check(store: &BackupStore, id: &str) -> Outcome {
    let path = store.path_for(id);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => return Outcome::Unreadable(e.to_string()),
    };
    let snapshot = match store.load(id) {
        Ok(snapshot) => snapshot,
        Err(e) => return Outcome::Unreadable(e.to_string()),
    };
    let reencoded = codec::encode_with(&snapshot, store.codec_options());
    if reencoded == bytes {
        Outcome::Ok
    } else {
        Outcome::Drift {
            original: bytes.len(),
            reencoded: reencoded.len(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load(&args.config)?;
    if let Some(directory) = args.directory {
        config.store.directory = directory;
    }
    if let Some(scene) = args.scene {
        config.store.scene_name = scene;
    }
    config.validate()?;

    let mut store = BackupStore::open(&config.store)?;
    let ids = store.list()?.to_vec();
    if ids.is_empty() {
        println!(
            "No backups for scene {} in {:?}. Nothing to verify.",
            config.store.scene_name, config.store.directory
        );
        return Ok(());
    }

    let mut failures = 0;
    for id in &ids {
        match check(&store, id) {
            Outcome::Ok => println!("ok       {id}"),
            Outcome::Unreadable(reason) => {
                failures += 1;
                println!("FAILED   {id}: {reason}");
            }
            Outcome::Drift {
                original,
                reencoded,
            } => {
                failures += 1;
                println!("DRIFT    {id}: {original} bytes on disk, {reencoded} re-encoded");
            }
        }
    }

    let verified = ids.len() - failures;
    println!("\n{verified} of {} backups verified", ids.len());
    anyhow::ensure!(failures == 0, "{failures} backups failed verification");
    Ok(())
}
