// perfmon: performance-monitor module report generator

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use perfmon::config::{
    DEFAULT_INDENT_WIDTH, DEFAULT_MAX_DEPTH, DEFAULT_MAX_INDENT, MAX_NESTING_DEPTH,
};
use perfmon::payload::record::Aggregate;
use perfmon::payload::{ModuleBuilder, ModuleImage, TscStats};
use perfmon::ui::App;
use perfmon::{report, Report, ReportConfig};

/// Render performance-monitor module images as reports
#[derive(Debug, Parser)]
#[command(name = "perfmon", author, version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    options: ReportArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the report for a module image to stdout
    Print {
        /// Module image file
        image: PathBuf,
    },
    /// Browse the report for a module image interactively
    View {
        /// Module image file
        image: PathBuf,
    },
    /// Write a small nested sample module image
    Sample {
        /// Output file
        out: PathBuf,
    },
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// Deepest module nesting to descend into
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, value_parser = nesting_depth, global = true)]
    max_depth: usize,

    /// Spaces of indentation per nesting level
    #[arg(long, default_value_t = DEFAULT_INDENT_WIDTH, global = true)]
    indent: usize,

    /// Maximum indentation in columns
    #[arg(long, default_value_t = DEFAULT_MAX_INDENT, global = true)]
    max_indent: usize,
}

fn nesting_depth(s: &str) -> Result<usize, String> {
    let depth: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a nesting depth", s))?;
    if depth <= MAX_NESTING_DEPTH {
        Ok(depth)
    } else {
        Err(format!("nesting depth must be at most {}", MAX_NESTING_DEPTH))
    }
}

impl ReportArgs {
    fn config(&self) -> ReportConfig {
        ReportConfig::default()
            .with_max_depth(self.max_depth)
            .with_indent(self.indent, self.max_indent)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let config = cli.options.config();
    match cli.command {
        Command::Print { image } => {
            let report = load_report(&image, &config)?;
            print_report(&report)?;
            if !report.is_complete() {
                std::process::exit(1);
            }
        }
        Command::View { image } => {
            let report = load_report(&image, &config)?;
            let title = image.display().to_string();
            run_viewer(App::new(report, title))?;
        }
        Command::Sample { out } => {
            fs::write(&out, sample_image().as_bytes())
                .with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!("wrote sample module image to {}", out.display());
        }
    }

    Ok(())
}

fn load_report(path: &Path, config: &ReportConfig) -> anyhow::Result<Report> {
    let image =
        ModuleImage::open(path).with_context(|| format!("failed to read {}", path.display()))?;
    let module = image
        .module()
        .with_context(|| format!("{} is not a module image", path.display()))?;

    tracing::info!(
        "parsing module with {} byte descriptor and {} byte payload",
        module.descriptor.len(),
        module.payload.len()
    );
    Ok(report(module, config))
}

fn print_report(report: &Report) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(report.text().as_bytes())?;
    stdout.flush()?;

    for err in &report.errors {
        eprintln!("error: {}", err);
    }
    Ok(())
}

fn run_viewer(mut app: App) -> anyhow::Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("viewer failed")
}

fn sample_image() -> ModuleImage {
    let stats = |start: i64, calls: i64, nanos: i64| TscStats {
        start_count: start,
        end_count: start + calls,
        nanos: Aggregate {
            total: nanos * calls,
            min: nanos / 2,
            avg: nanos as f64,
            max: nanos * 3,
        },
        cycles: Aggregate {
            total: nanos * calls * 3,
            min: nanos * 3 / 2,
            avg: (nanos * 3) as f64,
            max: nanos * 9,
        },
    };

    let rx = ModuleBuilder::new("TSC poll[2]; TSC copy[1];")
        .counters([stats(0, 120, 40), stats(0, 118, 55), stats(0, 118, 900)]);
    let tx = ModuleBuilder::new("TSC send[1];").counter(stats(4, 64, 1200));

    ModuleBuilder::new("TSC loop[1]; MODULE * rx; MODULE * tx;")
        .counter(stats(0, 1000, 15000))
        .module(rx)
        .module(tx)
        .image()
}
