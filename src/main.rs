use anyhow::{Context, Result};
use clap::Parser;
use sheetfill::{
    report::{ConsoleReporter, Reporter, SilentReporter},
    run, ColumnSelector, FillPolicy, FillRequest,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Exit status when `--strict` rejects a column that still has gaps.
const EXIT_INCOMPLETE: i32 = 2;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Forward-fill the empty cells of a spreadsheet column with the value above them"
)]
struct Args {
    /// Spreadsheet to read (xlsx, xlsm, xlsb, xls, ods)
    input: PathBuf,
    /// Where to write the filled workbook (.xlsx)
    #[arg(short, long, default_value = "updated_table.xlsx")]
    output: PathBuf,
    /// Sheet to read; defaults to the first one
    #[arg(short, long)]
    sheet: Option<String>,
    /// Column to fill: a zero-based position (`0`, `#2`) or a header name
    #[arg(short, long, default_value = "0", conflicts_with = "column_name")]
    column: ColumnSelector,
    /// Column to fill by header name, even when the name looks like a number
    #[arg(short = 'n', long)]
    column_name: Option<String>,
    /// Fail with exit status 2, writing nothing, if the column starts with empty cells
    #[arg(long)]
    strict: bool,
    /// Rows to preview after loading; 0 disables the preview
    #[arg(long, default_value_t = 5)]
    preview_rows: usize,
    /// Print the run report as JSON instead of the preview and summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) build the request ────────────────────────────────────────
    let args = Args::parse();
    let column = match args.column_name {
        Some(name) => ColumnSelector::Name(name),
        None => args.column,
    };
    let policy = if args.strict {
        FillPolicy::Strict
    } else {
        FillPolicy::Lenient
    };
    let mut req = FillRequest::new(&args.input, &args.output)
        .column(column)
        .policy(policy);
    if let Some(sheet) = args.sheet {
        req = req.sheet(sheet);
    }
    info!(input = %args.input.display(), output = %args.output.display(), "starting fill");

    // ─── 3) run ──────────────────────────────────────────────────────
    let mut console;
    let mut silent = SilentReporter;
    let reporter: &mut dyn Reporter = if args.json {
        &mut silent
    } else {
        console = ConsoleReporter::stdout(args.preview_rows);
        &mut console
    };
    let report = match run(&req, reporter) {
        Ok(report) => report,
        // strict-mode gaps: nothing written, distinct exit status from hard failures
        Err(e) if !e.is_fatal() => {
            error!("{}", e);
            std::process::exit(EXIT_INCOMPLETE);
        }
        Err(e) => return Err(e).with_context(|| format!("filling {}", args.input.display())),
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing run report")?
        );
    }
    Ok(())
}
