use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use stegtail::manifest::Manifest;

#[derive(Parser)]
#[command(name = "stegtail", about = "Hide files behind a carrier file and get them back")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine a carrier file and one or more hidden files
    Embed {
        /// Carrier file whose bytes open the combined file
        #[arg(short, long)]
        carrier: PathBuf,
        /// Files to hide, in order
        #[arg(short, long, required = true, num_args = 1..)]
        payload: Vec<PathBuf>,
        /// Directory the combined file is written into
        #[arg(short = 'C', long, default_value = ".")]
        output_dir: PathBuf,
        /// Name of the combined file (a single name, no path separators)
        #[arg(short, long)]
        output: String,
    },
    /// Recover the hidden files from a combined file
    Extract {
        input: PathBuf,
        #[arg(short = 'C', long, default_value = ".")]
        output_dir: PathBuf,
        /// Overwrite existing files without asking
        #[arg(short, long)]
        force: bool,
    },
    /// List the hidden files without extracting them
    List {
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {

        // ── Embed ────────────────────────────────────────────────────────────
        Commands::Embed { carrier, payload, output_dir, output } => {
            let combined = stegtail::embed(&carrier, &payload, &output_dir, &output)?;
            for path in &payload {
                println!("  hidden  {}", path.display());
            }
            println!("Created: {}", combined.display());
        }

        // ── Extract ──────────────────────────────────────────────────────────
        Commands::Extract { input, output_dir, force } => {
            let written = stegtail::extract(&input, &output_dir, |path| {
                force || confirm_overwrite(path)
            })?;
            for path in &written {
                println!("  wrote   {}", path.display());
            }
            println!("Recovered {} file(s) into {}", written.len(), output_dir.display());
        }

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List { input } => {
            let data = std::fs::read(&input)?;
            let (metadata, payload) = stegtail::find_valid_record(&data, data.len())
                .ok_or("no hidden data signature found")?;
            let manifest = Manifest::from_value(&metadata)?;
            println!("Combined file: {}", input.display());
            println!("{:<32} {:>12}", "Name", "Size");
            for entry in &manifest.files {
                println!("{:<32} {:>12}", entry.filename, entry.size);
            }
            println!("{} file(s), {} payload byte(s)", manifest.files.len(), payload.len());
        }
    }

    Ok(())
}

/// Interactive overwrite decision used by `extract` without `--force`.
fn confirm_overwrite(path: &Path) -> bool {
    print!("{} already exists. Overwrite? [y/N] ", path.display());
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes" | "Yes" | "YES")
}
