//! lvl2gltf CLI
//!
//! Convert level files to glTF 2.0.

use clap::Parser;
use lvl2gltf::source::loader::load_container;
use lvl2gltf::{export_glb, export_gltf, Container, Converter, ConverterConfig, OutputFormat};
use lvl2gltf::SceneSource;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lvl2gltf")]
#[command(author, version, about = "Level to glTF 2.0 converter", long_about = None)]
struct Cli {
    /// Path to the world level file to convert
    #[arg(short, long = "inlvl")]
    input: PathBuf,

    /// Path to a common level holding shared models (command posts, turrets, ...)
    #[arg(short, long = "incommon")]
    common: Option<PathBuf>,

    /// Output file. Defaults to the input path with the extension changed
    #[arg(short, long = "outglb")]
    output: Option<PathBuf>,

    /// Write a .gltf file (JSON + .bin buffers) instead of .glb
    #[arg(long)]
    gltf: bool,

    /// Convert only this world (repeatable). All worlds by default
    #[arg(short, long = "world")]
    worlds: Vec<String>,

    /// List the worlds in the level and exit
    #[arg(long)]
    list: bool,

    /// Share materials between segments with the same diffuse color
    #[arg(long)]
    dedup_materials: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Specified file '{}' doesn't exist!", cli.input.display()).into());
    }

    let format = if cli.gltf {
        OutputFormat::Text
    } else {
        OutputFormat::Binary
    };
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension(format.extension()));

    log::info!("Loading '{}'...", cli.input.display());
    let container = load_container(&cli.input, cli.common.as_ref())?;

    if cli.list {
        list_worlds(&container);
        return Ok(());
    }

    let mut config = ConverterConfig::default().with_material_deduplication(cli.dedup_materials);
    if !cli.worlds.is_empty() {
        config = config.with_worlds(cli.worlds.iter().cloned());
    }

    let converted = Converter::with_config(config).convert(&container)?;

    log::info!("Writing output file: {}...", output.display());
    write_output(&converted.document, &output, format)?;
    log::info!("Done!");

    Ok(())
}

fn list_worlds(container: &Container) {
    let worlds = container.worlds();
    if worlds.is_empty() {
        println!("No worlds found");
        return;
    }
    for (i, world) in worlds.iter().enumerate() {
        println!(
            "  {:2}) {:25} [{} objects]{}",
            i + 1,
            world.name,
            world.instances.len(),
            if world.terrain.is_some() { " +terrain" } else { "" }
        );
    }
}

fn write_output(
    document: &lvl2gltf::Document,
    path: &Path,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Binary => {
            let glb = export_glb(document)?;
            fs::write(path, &glb)?;
            log::info!("Exported GLB ({} bytes) to {:?}", glb.len(), path);
        }
        OutputFormat::Text => {
            let bins = export_gltf(document, path)?;
            log::info!("Exported glTF to {:?} with {} buffer file(s)", path, bins.len());
        }
    }
    Ok(())
}
