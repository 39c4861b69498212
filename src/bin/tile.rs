use std::path::PathBuf;
use std::process;

use anyhow::{Context, bail};
use clap::Parser;
use serde::Serialize;
use tile_wm::common::config::Config;
use tile_wm::common::log;
use tile_wm::layout_engine::{
    Container, ContainerConfiguration, LayoutKind, SplitAxis, WindowHolder,
};
use tile_wm::sys::geometry::Boundary;
use tile_wm::sys::headless::HeadlessDisplay;
use tile_wm::sys::monitor::{MonitorEnumerator, monitor_for_window};
use tile_wm::sys::window::{RegexWindowFilter, WindowFilter, WindowId, enumerate_windows};
use tracing::{debug, info};

const TITLES: &[&str] = &["Terminal", "Editor", "Browser", "Mail", "Notes"];

/// Plans a tiled layout for a set of simulated windows and prints the result.
#[derive(Parser)]
struct Cli {
    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Check the configuration for problems and exit.
    #[arg(long)]
    validate: bool,

    /// Number of windows to open.
    #[arg(long, default_value_t = 3)]
    windows: usize,

    #[arg(long, default_value_t = 1920)]
    width: u32,

    #[arg(long, default_value_t = 1080)]
    height: u32,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    left: i32,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    top: i32,

    /// Only manage windows whose title matches this pattern from its start.
    #[arg(long, value_name = "REGEX")]
    title: Option<String>,

    /// Layout kind, overriding the configuration.
    #[arg(long)]
    layout: Option<LayoutKind>,

    /// Split axis, overriding the configuration.
    #[arg(long)]
    axis: Option<SplitAxis>,

    /// Print window placements as JSON instead of the tree.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Placement {
    window: WindowId,
    title: String,
    monitor: Option<String>,
    boundary: Boundary,
}

fn main() {
    sigpipe::reset();
    let opt = Cli::parse();

    let config = match Config::load(opt.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            process::exit(1);
        }
    };

    if opt.validate {
        let issues = config.validate();
        if issues.is_empty() {
            println!("Config validation passed");
        } else {
            for issue in issues {
                eprintln!("{}", issue);
            }
            process::exit(1);
        }
        return;
    }

    log::init_logging(&config.logging.filter);

    if let Err(e) = run(&opt, &config) {
        eprintln!("{e:#}");
        process::exit(1);
    }
}

fn run(opt: &Cli, config: &Config) -> anyhow::Result<()> {
    let region = Boundary::from_origin_size(opt.left, opt.top, opt.width, opt.height);
    let display = HeadlessDisplay::new();
    display.add_monitor("headless-0", region);
    for i in 0..opt.windows {
        display.open_window(&format!("{} {}", TITLES[i % TITLES.len()], i + 1));
    }

    let filter = opt
        .title
        .as_deref()
        .map(RegexWindowFilter::new)
        .transpose()
        .context("invalid --title pattern")?;
    let filters: Vec<&dyn WindowFilter> =
        filter.iter().map(|f| f as &dyn WindowFilter).collect();
    let mut windows = enumerate_windows(&display, &filters)?;
    windows.sort_by_key(|w| w.id());
    if windows.is_empty() {
        bail!("no windows to lay out");
    }
    info!(count = windows.len(), region = %region, "Laying out windows");

    let holders = windows
        .into_iter()
        .map(|w| WindowHolder::new(w, config.layout.mode))
        .collect::<Result<Vec<_>, _>>()?;

    let defaults = config.container_configuration();
    let configuration = ContainerConfiguration::new(
        opt.layout.unwrap_or(defaults.layout()),
        opt.axis.unwrap_or(defaults.axis()),
    );
    debug!(layout = %configuration.layout(), axis = %configuration.axis(), "Using configuration");

    let mut root = Container::with_windows(configuration, region, holders)?;
    root.resize(region)?;

    if !opt.json {
        print!("{}", root.draw_tree());
        return Ok(());
    }

    let monitors = display.monitors()?;
    let placements = root
        .windows()
        .map(|holder| -> anyhow::Result<Placement> {
            let window = holder.window();
            Ok(Placement {
                window: window.id(),
                title: window.title()?,
                monitor: monitor_for_window(window, &monitors)?.map(|m| m.device.clone()),
                boundary: window.boundary()?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    println!("{}", serde_json::to_string_pretty(&placements)?);
    Ok(())
}
