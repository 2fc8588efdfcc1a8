use anyhow::{Context, Result};
use clap::Parser;
use sheetfill::{
    load::load_table,
    report::{column_summaries, render_preview},
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Show a sheet's first rows and how many cells each column is missing"
)]
struct Args {
    /// Spreadsheet to inspect
    input: PathBuf,
    /// Sheet to read; defaults to the first one
    #[arg(short, long)]
    sheet: Option<String>,
    /// Rows to preview
    #[arg(long, default_value_t = 5)]
    rows: usize,
    /// Print the per-column summary as JSON only
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let table = load_table(&args.input, args.sheet.as_deref())
        .with_context(|| format!("loading {}", args.input.display()))?;

    if args.json {
        let summaries = column_summaries(&table);
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).context("serializing column summary")?
        );
        return Ok(());
    }

    println!("=== {} [{}] ===", args.input.display(), table.sheet);
    println!("Rows:    {}", table.row_count());
    println!("Columns: {}", table.width());
    println!();
    println!("{}", render_preview(&table, args.rows));
    println!();

    println!("{: <6} {: <30} {:>10}  {}", "Index", "Column", "Missing", "Leading gap");
    println!("{:-<62}", "");
    for s in column_summaries(&table) {
        println!(
            "{: <6} {: <30} {:>10}  {}",
            s.index,
            s.name,
            s.missing,
            if s.leading_gap { "yes" } else { "" }
        );
    }
    Ok(())
}
