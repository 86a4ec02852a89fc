use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::seq::IndexedRandom;

use roulette::{Paths, ProcessOptions, SheetKind, mark_revision, process, resolve_selection};

/// Pick a random unsolved study item from a sheet and record it as solved
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Sheet selection: exact index, substring filter, or 'random' for all.
    /// Prompts interactively when omitted.
    #[arg(short, long)]
    sheet: Option<String>,

    /// Run the full selection flow without writing history or revision files
    #[arg(long)]
    dry_run: bool,

    /// Skip the revision prompt after selection
    #[arg(long)]
    no_revision_prompt: bool,

    /// Directory holding data/, history/, revision/ and the question pools
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let input = match args.sheet {
        Some(input) => input,
        None => {
            println!("Available sheet types:");
            for (i, kind) in SheetKind::ALL.iter().enumerate() {
                println!("  {i}: {kind}");
            }
            println!("Enter a number, a substring filter, or 'random' for all.");
            prompt("Enter sheet type: ")?
        }
    };

    let kinds = resolve_selection(&input, &SheetKind::ALL)?;
    let mut rng = rand::rng();
    let kind = *kinds
        .choose(&mut rng)
        .context("no sheet types to choose from")?;
    println!("Selected sheet: {kind}");

    let handler = kind.handler();
    let paths = Paths::new(&args.root);
    let options = ProcessOptions {
        persist: !args.dry_run,
        ..Default::default()
    };

    let selection = process(handler.as_ref(), &paths, &mut rng, &options)
        .with_context(|| format!("failed to process sheet '{kind}'"))?;
    println!("{}", serde_json::to_string_pretty(&selection.item)?);
    println!("{}", selection.link);

    if !args.no_revision_prompt {
        let answer = prompt("Mark for revision? (y/n): ")?;
        if answer.eq_ignore_ascii_case("y") {
            if let Some(id) = mark_revision(handler.as_ref(), &paths, &options)
                .with_context(|| format!("failed to mark revision for sheet '{kind}'"))?
            {
                println!("Marked '{id}' for revision.");
            }
        }
    }

    Ok(())
}
