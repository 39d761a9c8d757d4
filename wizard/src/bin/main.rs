use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wizard::{
    page::{
        css::{parse_color, ColorValue},
        document::Page,
        xhtml::{load_page_file, write_page},
    },
    to_hex, to_hsl, AnalysisReport, ColorFormat, ContentSession, Request, Response, Settings,
};

/// Color palette and typography probe for page snapshots
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Settings file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report the colors and fonts a page uses
    Analyze {
        /// XHTML page snapshot
        page: PathBuf,

        /// Color format, overrides the settings file
        #[arg(long, value_enum)]
        format: Option<ColorFormat>,

        /// Print the raw report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Highlight every element using a color or a font family
    Highlight {
        /// XHTML page snapshot
        page: PathBuf,

        /// Resolved color to look for, e.g. "rgb(10, 10, 10)"
        #[arg(long, conflicts_with = "font", required_unless_present = "font")]
        color: Option<String>,

        /// Font family name to look for
        #[arg(long)]
        font: Option<String>,

        /// Highlight color, overrides the settings file
        #[arg(long = "with")]
        highlight_color: Option<String>,

        /// Write the highlighted page here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print colors in every supported format
    Convert {
        /// Colors in rgb(r, g, b) form
        #[arg(required = true)]
        colors: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match args.command {
        Command::Analyze { page, format, json } => {
            analyze(&page, format.unwrap_or(settings.format), json)
        }
        Command::Highlight {
            page,
            color,
            font,
            highlight_color,
            out,
        } => {
            let request = match (color, font) {
                (Some(color), _) => Request::HighlightColor {
                    color,
                    highlight_color,
                },
                (None, Some(font)) => Request::HighlightFont {
                    font,
                    highlight_color,
                },
                (None, None) => anyhow::bail!("Either --color or --font is required"),
            };
            highlight(&page, request, &settings, out.as_deref())
        }
        Command::Convert { colors } => {
            for color in colors {
                println!(
                    "{} {:<20} {:<10} {}",
                    swatch(&color),
                    color,
                    to_hex(&color).unwrap_or_else(|| "-".into()),
                    to_hsl(&color).unwrap_or_else(|| "-".into())
                );
            }
            Ok(())
        }
    }
}

fn analyze(path: &Path, format: ColorFormat, json: bool) -> anyhow::Result<()> {
    let page = load_page_file(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let mut session = ContentSession::new(page);

    let report = match session.handle(Request::Analyze) {
        Some(Response::Report(report)) => report,
        Some(Response::Failure { error }) => anyhow::bail!("Analysis failed: {}", error),
        None => anyhow::bail!("Analysis produced no report"),
    };

    if json {
        serde_json::to_writer_pretty(io::stdout().lock(), &report)?;
        println!();
    } else {
        print_report(&report, format);
    }
    Ok(())
}

fn print_report(report: &AnalysisReport, format: ColorFormat) {
    println!("{} ({})", report.title.bold(), report.url);

    println!("\n{}", "Colors".bold());
    if report.colors.is_empty() {
        println!("  none");
    }
    for entry in &report.colors {
        println!(
            "  {} {:<24} x{:<4} {}",
            swatch(&entry.color),
            format.format(&entry.color),
            entry.count,
            entry.elements.join(", ")
        );
    }

    println!("\n{}", "Fonts".bold());
    if report.fonts.is_empty() {
        println!("  none");
    }
    for entry in &report.fonts {
        println!(
            "  {:<24} {:>6} x{:<4} weights {} | sizes {} | {}",
            entry.name,
            entry.usage_percent,
            entry.count,
            entry.weights.join(", "),
            entry.sizes.join(", "),
            entry.elements.join(", ")
        );
    }
}

fn highlight(
    path: &Path,
    request: Request,
    settings: &Settings,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let page = load_page_file(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let mut session = ContentSession::new(page).with_style(settings.highlight_style());
    session.handle(request);

    let count = session.highlighted_count();
    info!("{} elements highlighted", count);
    println!("{} elements highlighted", count);

    let page = session.into_page();
    if let Some((node, options)) = page.scroll_log().first() {
        println!(
            "scrolled <{}> into view ({}, {})",
            page.tag_name(node),
            options.behavior,
            options.block
        );
    }

    if let Some(out) = out {
        let file =
            File::create(out).with_context(|| format!("Failed to create {}", out.display()))?;
        write_page(&page, BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", out.display()))?;
        info!("Wrote highlighted page to {}", out.display());
    }
    Ok(())
}

/// Two blank cells painted in `color`, or blanks when it does not parse.
fn swatch(color: &str) -> ColoredString {
    match parse_color(color) {
        Some(ColorValue::Resolved(resolved)) => {
            "  ".on_truecolor(resolved.red, resolved.green, resolved.blue)
        }
        _ => "  ".normal(),
    }
}
