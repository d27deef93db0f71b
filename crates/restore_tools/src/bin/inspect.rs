use anyhow::Context;
use clap::Parser;
use restore_core::{AppConfig, StringPrefix};
use restore_io::{codec, CodecOptions, SnapshotSummary};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Print a JSON summary of a terrain backup file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backup file to inspect.
    file: PathBuf,

    /// Config whose string prefix is used when `--prefix` is not given.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// String length prefix: "i32" or "varint".
    #[arg(short, long)]
    prefix: Option<String>,
}

fn parse_prefix(value: &str) -> anyhow::Result<StringPrefix> {
    match value {
        "i32" => Ok(StringPrefix::I32),
        "varint" => Ok(StringPrefix::Varint),
        other => anyhow::bail!("Unknown string prefix {other:?}, expected i32 or varint"),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let prefix = match &args.prefix {
        Some(value) => parse_prefix(value)?,
        None => AppConfig::load(&args.config)?.store.string_prefix,
    };

    let path = &args.file;
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {path:?}"))?;
    let snapshot = codec::decode_with(&bytes, CodecOptions::new(prefix))
        .with_context(|| format!("Failed to decode {path:?}"))?;

    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let summary = SnapshotSummary::new(id, &bytes, &snapshot);
    println!("{}", restore_io::to_json_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing_defaults() {
        let args = Args::parse_from(["inspect", "backup.dat"]);
        assert_eq!(args.file, PathBuf::from("backup.dat"));
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert!(args.prefix.is_none());
    }

    #[test]
    fn test_args_parsing_prefix() {
        let args = Args::parse_from(["inspect", "-p", "varint", "backup.dat"]);
        let prefix = parse_prefix(args.prefix.as_deref().unwrap()).unwrap();
        assert_eq!(prefix, StringPrefix::Varint);
        assert!(parse_prefix("u16").is_err());
    }
}
