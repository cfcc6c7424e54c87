use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::Pattern;
use rastercode::RasterCode;
use rlregion_tools::{
    decode_codes, encode_positions, format_inspect_pretty, format_positions_pretty, inspect_code,
    logging, parse_positions, sort_scan_order,
};

#[derive(Parser)]
#[command(
    name = "rlregion-tools",
    version,
    about = "rlregion raster code encoding, inspection and decoding tools"
)]
struct Cli {
    /// Log filter directives, overridden by RUST_LOG.
    #[arg(long, global = true, default_value = "warn")]
    log: String,
    /// Multi-line log output.
    #[arg(long, global = true)]
    log_pretty: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a JSON array of positions into a raster code.
    Encode {
        /// Path to the positions JSON.
        positions_path: PathBuf,
        /// Dimensionality, required when the position list is empty.
        #[arg(long)]
        dims: Option<usize>,
        /// Dimension-0 base; defaults to the smallest x coordinate.
        #[arg(long, allow_hyphen_values = true)]
        base_x: Option<i64>,
        /// Sort into scan order and drop duplicates before encoding.
        #[arg(long)]
        sort: bool,
        /// Write the code here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Explain a code run by run.
    Inspect {
        /// Path to the code JSON.
        code_path: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
    /// Decode one code, or several fragments as a union, into positions.
    Decode {
        /// Code files, or directories of code files.
        #[arg(required = true)]
        code_paths: Vec<PathBuf>,
        /// Glob filter for files inside directories.
        #[arg(long)]
        glob: Option<String>,
        /// Comma-separated translation, e.g. `3,-1`.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        offset: Vec<i64>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(&cli.log, cli.log_pretty);

    match cli.command {
        Command::Encode {
            positions_path,
            dims,
            base_x,
            sort,
            output,
        } => {
            let contents = fs::read_to_string(&positions_path)
                .with_context(|| format!("read positions {}", positions_path.display()))?;
            let mut positions = parse_positions(&contents)?;
            if sort {
                sort_scan_order(&mut positions);
            }
            let code = encode_positions(&positions, dims, base_x)?;
            tracing::info!(
                points = code.len(),
                tokens = code.tokens().len(),
                "encoded {}",
                positions_path.display()
            );
            let json = serde_json::to_string(&code).context("serialize code")?;
            match output {
                Some(path) => {
                    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
                }
                None => println!("{json}"),
            }
        }
        Command::Inspect { code_path, format } => {
            let code = load_code(&code_path)?;
            let report = inspect_code(&code)?;
            match format {
                Format::Json => {
                    let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                    println!("{json}");
                }
                Format::Pretty => print!("{}", format_inspect_pretty(&report)),
            }
        }
        Command::Decode {
            code_paths,
            glob,
            offset,
            format,
        } => {
            let files = collect_code_files(&code_paths, glob.as_deref())?;
            let codes = files
                .iter()
                .map(|path| load_code(path))
                .collect::<Result<Vec<_>>>()?;
            let positions = decode_codes(&codes, &offset)?;
            match format {
                Format::Json => {
                    let json = serde_json::to_string(&positions).context("serialize json")?;
                    println!("{json}");
                }
                Format::Pretty => print!("{}", format_positions_pretty(&positions)),
            }
        }
    }
    Ok(())
}

fn load_code(path: &Path) -> Result<RasterCode> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read code {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse code {}", path.display()))
}

/// Expands directories into their matching files, sorted by path. Explicit
/// files are kept in the order given.
fn collect_code_files(paths: &[PathBuf], glob: Option<&str>) -> Result<Vec<PathBuf>> {
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("read dir {}", path.display()))? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(pattern) = &pattern {
                let matches_path = pattern.matches_path(&path);
                let matches_name = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| pattern.matches(name));
                if !matches_path && !matches_name {
                    continue;
                }
            }
            entries.push(path);
        }
        entries.sort();
        tracing::debug!(dir = %path.display(), fragments = entries.len(), "collected fragments");
        files.extend(entries);
    }
    Ok(files)
}
