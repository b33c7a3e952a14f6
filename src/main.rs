//! Lodestar CLI - Command-line tool for space-sim mod data files.
//!
//! This is the main entry point for the Lodestar command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::{MatchOptions, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use walkdir::WalkDir;

use lodestar::prelude::*;

/// Lodestar - space-sim mod data tool
#[derive(Parser)]
#[command(name = "lodestar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Auto,
    Text,
    Binary,
}

impl From<Format> for FormatHint {
    fn from(format: Format) -> Self {
        match format {
            Format::Auto => FormatHint::Auto,
            Format::Text => FormatHint::Text,
            Format::Binary => FormatHint::Binary,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the blocks of an INI or BINI file as text
    IniDump {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(short, long, value_enum, default_value = "auto")]
        format: Format,
    },

    /// Convert BINI files to text INI
    IniConvert {
        /// Input file or directory
        #[arg(short, long)]
        input: PathBuf,

        /// Output file or directory
        #[arg(short, long)]
        output: PathBuf,

        /// Filter pattern for relative paths (glob-style)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Encode a text INI file as BINI
    BiniEncode {
        /// Input text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output BINI file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Map a config file through the template and print records as JSON
    Map {
        /// Input config file
        #[arg(short, long)]
        input: PathBuf,

        /// Template XML file
        #[arg(short, long, env = "LODESTAR_TEMPLATE")]
        template: PathBuf,

        /// Schema file name (default: matched by path)
        #[arg(short, long)]
        schema: Option<String>,

        /// Input format
        #[arg(short, long, value_enum, default_value = "auto")]
        format: Format,

        /// Print dropped blocks and options
        #[arg(short, long)]
        report: bool,
    },

    /// Read, map, unmap and write a config file
    Roundtrip {
        /// Input config file
        #[arg(short, long)]
        input: PathBuf,

        /// Output text file
        #[arg(short, long)]
        output: PathBuf,

        /// Template XML file
        #[arg(short, long, env = "LODESTAR_TEMPLATE")]
        template: PathBuf,

        /// Schema file name (default: matched by path)
        #[arg(short, long)]
        schema: Option<String>,
    },

    /// Print the node tree of a UTF file
    UtfTree {
        /// Input UTF file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the parts, joints and mesh references of a compound model
    CmpDump {
        /// Input .cmp file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::IniDump { input, format } => {
            cmd_ini_dump(&input, format.into())?;
        }
        Commands::IniConvert { input, output, filter } => {
            cmd_ini_convert(&input, &output, filter.as_deref())?;
        }
        Commands::BiniEncode { input, output } => {
            cmd_bini_encode(&input, &output)?;
        }
        Commands::Map {
            input,
            template,
            schema,
            format,
            report,
        } => {
            cmd_map(&input, &template, schema.as_deref(), format.into(), report)?;
        }
        Commands::Roundtrip {
            input,
            output,
            template,
            schema,
        } => {
            cmd_roundtrip(&input, &output, &template, schema.as_deref())?;
        }
        Commands::UtfTree { input } => {
            cmd_utf_tree(&input)?;
        }
        Commands::CmpDump { input } => {
            cmd_cmp_dump(&input)?;
        }
    }

    Ok(())
}

fn cmd_ini_dump(input: &Path, format: FormatHint) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;
    let blocks = parse_blocks(&data, format, TextReader::new()).context("Failed to parse input file")?;
    print!("{}", TextWriter::to_string(&blocks));
    Ok(())
}

/// Convert one file. Returns `false` if the input is not BINI.
fn convert_file(input: &Path, output: &Path) -> Result<bool> {
    let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let Some(blocks) = BiniReader::try_parse(&data).with_context(|| format!("Failed to parse {}", input.display()))?
    else {
        return Ok(false);
    };

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    TextWriter::write_file(&blocks, output).with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(true)
}

fn cmd_ini_convert(input: &Path, output: &Path, filter: Option<&str>) -> Result<()> {
    if input.is_file() {
        println!("Converting: {} -> {}", input.display(), output.display());
        if !convert_file(input, output)? {
            anyhow::bail!("Input file is not a BINI file");
        }
        println!("Conversion complete");
        return Ok(());
    }

    let pattern = filter
        .map(|f| Pattern::new(&f.replace('\\', "/")))
        .transpose()
        .context("Invalid filter pattern")?;
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    let files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| {
            let relative = path.strip_prefix(input).unwrap_or(path);
            let relative = relative.to_string_lossy().replace('\\', "/");
            pattern.as_ref().map_or(true, |p| p.matches_with(&relative, options))
        })
        .collect();

    println!("Converting {} files from {}...", files.len(), input.display());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let results: Vec<(PathBuf, Result<bool>)> = files
        .par_iter()
        .map(|path| {
            let relative = path.strip_prefix(input).unwrap_or(path);
            let result = convert_file(path, &output.join(relative));
            pb.inc(1);
            (path.clone(), result)
        })
        .collect();
    pb.finish_with_message("Done");

    let mut converted = 0;
    let mut skipped = 0;
    let mut errors = 0;
    for (path, result) in results {
        match result {
            Ok(true) => converted += 1,
            Ok(false) => skipped += 1,
            Err(e) => {
                eprintln!("Error converting {}: {:#}", path.display(), e);
                errors += 1;
            }
        }
    }

    println!(
        "Converted {} files in {:?} ({} not BINI, {} errors)",
        converted,
        start.elapsed(),
        skipped,
        errors
    );

    Ok(())
}

fn cmd_bini_encode(input: &Path, output: &Path) -> Result<()> {
    println!("Encoding: {} -> {}", input.display(), output.display());

    let blocks = TextReader::new().read(input).context("Failed to read input file")?;
    let bytes = BiniBuilder::new().build(&blocks).context("Failed to encode BINI")?;
    fs::write(output, &bytes).context("Failed to write output file")?;

    println!("Wrote {} blocks, {} bytes", blocks.len(), bytes.len());

    Ok(())
}

fn open_manager(template: &Path, format: FormatHint) -> Result<FileManager> {
    let catalog = SchemaCatalog::open(template).context("Failed to load template")?;
    Ok(FileManager::new(Arc::new(catalog)).with_options(ReadOptions::new().format(format)))
}

fn load_schema<'a>(manager: &'a FileManager, input: &Path, name: Option<&str>) -> Result<&'a SchemaFile> {
    let schema = match name {
        Some(name) => manager.schema_named(name)?,
        None => manager.schema_for(input)?,
    };
    Ok(schema)
}

fn cmd_map(input: &Path, template: &Path, schema: Option<&str>, format: FormatHint, report: bool) -> Result<()> {
    let manager = open_manager(template, format)?;
    let schema = load_schema(&manager, input, schema)?;

    let (records, map_report) = manager
        .read_config_as(input, schema)
        .context("Failed to read config")?;

    println!("{}", serde_json::to_string_pretty(&records)?);

    if report {
        eprintln!("Schema: {}", schema.name);
        for block in &map_report.dropped_blocks {
            eprintln!("  dropped block [{}]", block);
        }
        for (block, option) in &map_report.dropped_options {
            eprintln!("  dropped option [{}] {}", block, option);
        }
        if map_report.misordered_children > 0 {
            eprintln!("  {} child values precede their parent", map_report.misordered_children);
        }
    }

    Ok(())
}

fn cmd_roundtrip(input: &Path, output: &Path, template: &Path, schema: Option<&str>) -> Result<()> {
    println!("Round trip: {} -> {}", input.display(), output.display());

    let start = Instant::now();
    let manager = open_manager(template, FormatHint::Auto)?;
    let schema = load_schema(&manager, input, schema)?;

    let (records, report) = manager
        .read_config_as(input, schema)
        .context("Failed to read config")?;
    manager
        .write_config(output, &records)
        .context("Failed to write output file")?;

    println!(
        "Wrote {} records in {:?} ({} blocks and {} options dropped)",
        records.len(),
        start.elapsed(),
        report.dropped_blocks.len(),
        report.dropped_options.len()
    );

    Ok(())
}

fn cmd_utf_tree(input: &Path) -> Result<()> {
    let tree = UtfTree::open(input).context("Failed to parse UTF file")?;

    for id in tree.iter() {
        let mut depth: usize = 0;
        let mut current = tree.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = tree.parent(parent);
        }

        let indent = "  ".repeat(depth.saturating_sub(1));
        match tree.payload(id) {
            Some(payload) => println!("{}{} ({} bytes)", indent, tree.name(id), payload.len()),
            None => println!("{}{}", indent, tree.name(id)),
        }
    }

    println!("\nTotal: {} nodes, {} leaves", tree.len() - 1, tree.leaf_count());

    Ok(())
}

fn cmd_cmp_dump(input: &Path) -> Result<()> {
    let tree = UtfTree::open(input).context("Failed to parse UTF file")?;
    let model = CmpModel::from_tree(&tree).context("Failed to read compound model")?;

    println!("Parts:");
    for part in model.parts() {
        println!("  {:>3} {} ({})", part.index, part.object_name, part.file_name);
    }

    println!("Constructs:");
    for construct in model.constructs() {
        let origin = construct.origin();
        println!(
            "  {:<6} {} -> {} at ({:.3}, {:.3}, {:.3})",
            construct.kind().node_name(),
            construct.parent(),
            construct.child(),
            origin.x,
            origin.y,
            origin.z
        );
    }

    let refs = CmpModel::vmesh_refs(&tree).context("Failed to decode mesh references")?;
    println!("Mesh references:");
    for (id, mesh_ref) in &refs {
        println!(
            "  {} -> {:#010x} vertices {}+{} indices {}+{}",
            tree.path_of(*id),
            mesh_ref.mesh_id,
            mesh_ref.start_vertex,
            mesh_ref.vertex_count,
            mesh_ref.start_index,
            mesh_ref.index_count
        );
    }

    for (name, mesh) in CmpModel::mesh_library(&tree).context("Failed to decode mesh library")? {
        println!(
            "Mesh {}: {} groups, {} triangles, {} vertices",
            name,
            mesh.meshes.len(),
            mesh.indices.len() / 3,
            mesh.vertices.len()
        );
    }

    Ok(())
}
