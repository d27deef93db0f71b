use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use restore_core::capture::capture_all;
use restore_core::region::rect_from_brush;
use terrain_restore_lib::{MemoryTerrain, TerrainBounds, TerrainRestore};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List backups of the configured scene, newest first
    List,
    /// Delete one backup
    Delete { id: String },
    /// Paint a square of one backup into another and save the result as a new backup
    Paint {
        /// Backup to restore from
        #[arg(long)]
        from: String,
        /// Backup treated as the live terrains
        #[arg(long)]
        into: String,
        /// Brush centre in world units, as "x,z"
        #[arg(long, value_parser = parse_center)]
        center: [f32; 2],
        /// Brush size; defaults to the configured size
        #[arg(long)]
        size: Option<f32>,
        /// World size of each terrain tile. Tiles are laid out along +x.
        #[arg(long, default_value_t = 1000.0)]
        terrain_size: f32,
    },
}

fn parse_center(value: &str) -> Result<[f32; 2], String> {
    let (x, z) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,z\", got {value:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let z = z.trim().parse().map_err(|e| format!("bad z: {e}"))?;
    Ok([x, z])
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let mut app = TerrainRestore::from_config_file(&args.config)?;

    match args.command {
        Command::List => {
            let ids = app.list_backups()?;
            if ids.is_empty() {
                println!("No backups for scene {}.", app.config.store.scene_name);
            }
            for id in ids {
                let marker = if app.selected_backup() == Some(id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {id}");
            }
        }
        Command::Delete { id } => {
            app.list_backups()?;
            if app.delete_backup(&id) {
                println!("Deleted {id}.");
            } else {
                anyhow::bail!("Could not delete backup {id}");
            }
        }
        Command::Paint {
            from,
            into,
            center,
            size,
            terrain_size,
        } => {
            anyhow::ensure!(
                terrain_size.is_finite() && terrain_size > 0.0,
                "Terrain size must be positive"
            );
            app.list_backups()?;
            let base = app
                .load_backup(&into)
                .with_context(|| format!("Failed to load backup {into}"))?;
            let mut terrains: Vec<MemoryTerrain> = base
                .terrains
                .iter()
                .enumerate()
                .map(|(n, snapshot)| {
                    let bounds =
                        TerrainBounds::new([n as f32 * terrain_size, 0.0], [terrain_size; 2]);
                    MemoryTerrain::from_snapshot(bounds, snapshot)
                })
                .collect();

            anyhow::ensure!(app.select_backup(&from), "Unknown backup {from}");
            app.set_painting(true)?;
            if let Some(size) = size {
                app.session_mut().set_brush_size(size);
            }

            let rect = rect_from_brush(center, app.session().brush_size());
            let report = app
                .restore_region(&mut terrains, &rect)
                .context("Restore session did not start")?;
            app.set_painting(false)?;

            let id = app.save_snapshot(&capture_all(&terrains))?;
            println!(
                "Painted {from} into {into} at {:?}: {} height, {} weight, {} detail cells, {} trees in, {} out",
                center,
                report.height_cells,
                report.weight_cells,
                report.detail_cells,
                report.instances_inserted,
                report.instances_removed
            );
            for mismatch in &report.mismatches {
                println!("  {mismatch}");
            }
            println!("Saved as {id}.");
        }
    }

    Ok(())
}
