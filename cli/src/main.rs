use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use c2g::export::Config;
use c2g::prelude::ConfigType;

#[derive(Parser)]
#[command(name = "c2g-cli")]
#[command(about = "A CLI tool for exporting meshes to the C2G binary format")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export the objects of an OBJ file into one C2G file
    Export {
        /// Input .obj file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// JSON file with export options
        #[arg(long)]
        config: Option<PathBuf>,

        /// Layout version tag, e.g. 0100 or 0200
        #[arg(long)]
        format_version: Option<String>,

        /// Also write `<output>.base64`
        #[arg(long)]
        base64: bool,

        /// Also write `<output>.json`
        #[arg(long)]
        json: bool,

        /// Only export the named objects; may be repeated
        #[arg(long = "object")]
        objects: Vec<String>,
    },
    /// Print the header and statistics of a C2G file
    Inspect {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Write the Base64 text of a file next to it
    Base64 {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Export { input, output, config, format_version, base64, json, objects } => {
            let mut cfg = match config {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read options from {}", path.display()))?;
                    Config::from_json(&text)?
                }
                None => Config::default(),
            };
            // validated before any loading happens
            if let Some(tag) = format_version {
                cfg.format_version = Config::with_version_tag(&tag)?.format_version;
            }
            cfg.write_base64 |= base64;
            cfg.write_json |= json;
            export_obj(&input, &output, &cfg, &objects)
        }
        Command::Inspect { input } => inspect(&input),
        Command::Base64 { input } => write_base64(&input),
    }
}

fn export_obj(input: &Path, output: &Path, cfg: &Config, objects: &[String]) -> Result<()> {
    let input_ext = input.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    if input_ext != "obj" {
        anyhow::bail!("Input file must be a .obj file");
    }

    let mut meshes = c2g::io::obj::load_obj(input)
        .with_context(|| format!("Failed to load OBJ file {}", input.display()))?;
    if !objects.is_empty() {
        if let Some(missing) = objects.iter().find(|name| !meshes.iter().any(|m| m.get_name() == name.as_str())) {
            anyhow::bail!("No object named '{}' in {}", missing, input.display());
        }
        meshes.retain(|m| objects.iter().any(|name| name == m.get_name()));
    }

    let export = c2g::export::export(&meshes, cfg).context("Failed to export meshes")?;
    for object in &export.report.objects {
        log::info!(
            "{}: {} corners, {} vertices, {} triangles",
            object.name, object.num_corners, object.num_vertices, object.num_triangles
        );
        for skipped in &object.skipped_faces {
            log::warn!("{}: face {} with {} sides was not exported", object.name, skipped.face, skipped.arity);
        }
    }

    c2g::io::file::write_export(output, &export)?;
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let decoded = c2g::decode::decode_slice(&bytes)
        .with_context(|| format!("{} is not a valid C2G file", input.display()))?;
    let header = &decoded.header;

    println!("format version: {}", header.version);
    println!("vertex shape:   {}", header.shape);
    println!("vertex size:    {} bytes", header.vertex_size);
    println!("index size:     {} bytes", header.index_size);
    println!("vertices:       {}", header.vertex_count);
    println!("triangles:      {}", header.index_count / 3);
    println!("total size:     {} bytes", bytes.len());
    Ok(())
}

fn write_base64(input: &Path) -> Result<()> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let output = c2g::io::file::sibling_path(input, "base64");
    std::fs::write(&output, c2g::mirror::to_base64(&bytes))
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("Wrote {}", output.display());
    Ok(())
}
