use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use tambo_ith::chart::ChartViewport;
use tambo_ith::pipeline::{parse_feed, DateWindow, Snapshot};
use tambo_ith::settings::Settings;
use tambo_ith::stress::StressTier;

/// Analyze a tambo ITH feed snapshot: heat-stress tiers, cooling-cycle
/// compliance and chart geometry.
#[derive(Parser, Debug)]
#[command(name = "tambo-ith", version)]
struct Args {
    /// Snapshot JSON file (record key -> field bag), as exported from the store
    #[arg(required_unless_present = "dump_config")]
    feed: Option<PathBuf>,

    /// Configuration file (TOML or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Restrict to a single day (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["from", "month"])]
    day: Option<NaiveDate>,

    /// Range start (YYYY-MM-DD), requires --to
    #[arg(long, requires = "to", conflicts_with = "month")]
    from: Option<NaiveDate>,

    /// Range end (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Restrict to the current calendar month
    #[arg(long)]
    month: bool,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 400.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 300.0)]
    height: f64,

    /// Horizontal zoom factor (>= 1.0)
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let settings = match Settings::new(args.config.clone()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.dump_config {
        match settings.dump("toml") {
            Ok(text) => {
                println!("{}", text);
                return ExitCode::SUCCESS;
            }
            Err(e) => {
                error!("Failed to dump configuration: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let feed_path = args.feed.as_ref().expect("clap enforces feed presence");
    let bytes = match std::fs::read(feed_path) {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to read feed file {:?}: {}", feed_path, e);
            return ExitCode::FAILURE;
        }
    };
    let raw = match parse_feed(&bytes) {
        Ok(map) => map,
        Err(e) => {
            error!("Failed to parse feed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let window = if args.month {
        Some(DateWindow::CurrentMonth)
    } else if let (Some(from), Some(to)) = (args.from, args.to) {
        Some(DateWindow::Range(from, to))
    } else {
        args.day.map(DateWindow::Day)
    };

    let viewport = ChartViewport {
        width: args.width,
        height: args.height,
        zoom: args.zoom,
    };

    let today = Utc::now().date_naive();
    let snapshot = Snapshot::compute(&raw, window, today, &viewport, &settings);

    info!(
        tambo = %settings.tambo.name,
        records = snapshot.report.total,
        dropped = snapshot.report.dropped_no_date,
        "feed normalized"
    );

    println!("Mediciones: {}", snapshot.points.len());
    if let Some(worst) = snapshot
        .points
        .iter()
        .filter_map(|p| p.tier)
        .max_by_key(StressTier::level)
    {
        println!("Peor nivel: {} ({})", worst.label(), worst.level());
    }

    println!(
        "\nRegistro de ciclos (objetivo: {}s agua + {}s aire):",
        settings.compliance.wet_target_secs, settings.compliance.dry_target_secs
    );
    if snapshot.cycles.is_empty() {
        println!("  sin ciclos registrados");
    }
    for event in &snapshot.cycles {
        let status = if event.is_pending {
            "en curso"
        } else if event.is_valid {
            "OK"
        } else {
            "irregular"
        };
        let dry = if event.is_pending {
            "...".to_string()
        } else {
            format!("{:.0}s", event.dry_duration_secs)
        };
        println!(
            "  {}  mojado {:.0}s  ventilación {}  [{}]",
            event.start_time.format("%Y-%m-%d %H:%M:%S"),
            event.wet_duration_secs,
            dry,
            status
        );
    }

    if let Some(chart) = &snapshot.chart {
        println!(
            "\nGeometría: {} puntos, {} franjas de estado, {} ticks X",
            chart.points.len(),
            chart.state_bands.len(),
            chart.x_ticks.len()
        );
    } else {
        println!("\nSin datos graficables en la ventana seleccionada");
    }

    ExitCode::SUCCESS
}
