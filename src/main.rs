//! vlist - Entry Point
//!
//! Runs the virtualization engine against a simulated scroll container and
//! reports where it ended up.

use clap::{Parser, ValueEnum};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Widget;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use vlist::config::{CliOverrides, Settings};
use vlist::engine::{EngineSnapshot, ListEngine};
use vlist::host::{random_heights, SimError, SimStats, SimulatedHost};
use vlist::model::{AppError, ItemId};
use vlist::view::{buffer_to_string, ListView};
use vlist::view_state::types::Alignment;

/// Widest drawing produced by `--draw`.
const DRAW_WIDTH: u16 = 40;
/// Tallest drawing produced by `--draw`.
const MAX_DRAW_LINES: f64 = 200.0;

/// vlist - simulate list virtualization with rows of unknown height
#[derive(Parser, Debug)]
#[command(name = "vlist")]
#[command(version)]
#[command(about = "Simulate a virtualized list whose row heights are discovered by measuring")]
pub struct Args {
    /// Number of items in the list
    #[arg(short = 'n', long, default_value = "1000")]
    pub items: usize,

    /// Height of the scroll container
    #[arg(long, default_value = "500")]
    pub viewport: f64,

    /// Smallest true row height
    #[arg(long, default_value = "20")]
    pub min_height: f64,

    /// Largest true row height
    #[arg(long, default_value = "60")]
    pub max_height: f64,

    /// Seed for the true row heights
    #[arg(long, default_value = "1")]
    pub seed: u64,

    /// Navigate to this item index after the initial load
    #[arg(short, long)]
    pub jump_to: Option<usize>,

    /// Where the navigation target should land
    #[arg(long, value_enum, default_value = "top")]
    pub align: AlignArg,

    /// Estimated row height (overrides config)
    #[arg(long)]
    pub item_height: Option<f64>,

    /// Rows rendered beyond each viewport edge (overrides config)
    #[arg(long)]
    pub buffer: Option<i64>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Draw the final viewport, one line per height unit
    #[arg(long)]
    pub draw: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlignArg {
    Top,
    Center,
    Bottom,
}

impl From<AlignArg> for Alignment {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Top => Alignment::Top,
            AlignArg::Center => Alignment::Center,
            AlignArg::Bottom => Alignment::Bottom,
        }
    }
}

/// Outcome of one simulation run.
#[derive(Debug, Serialize)]
struct Report {
    items: usize,
    seed: u64,
    elapsed_ms: u64,
    target: Option<usize>,
    /// Top of the target row relative to the viewport top.
    target_screen_offset: Option<f64>,
    scroll_top: f64,
    engine: EngineSnapshot,
    host: SimStats,
}

fn item_ids(count: usize) -> Vec<ItemId> {
    (0..count).map(|i| ItemId::new(format!("item-{i}"))).collect()
}

/// Loads the list into a fresh engine and optionally navigates.
fn simulate(args: &Args, settings: Settings) -> Result<(ListEngine, SimulatedHost), SimError> {
    let heights = random_heights(args.items, args.min_height, args.max_height, args.seed);
    let mut engine = ListEngine::new(settings);
    let mut host = SimulatedHost::new(engine.settings().container_id(), heights, args.viewport);

    let mut commands = engine.start();
    commands.extend(engine.set_items(item_ids(args.items)));
    host.run(&mut engine, commands)?;
    info!(
        elapsed_ms = host.now().as_millis() as u64,
        "initial load settled"
    );

    if let Some(index) = args.jump_to {
        let target = ItemId::new(format!("item-{index}"));
        let commands = engine.scroll_to_item(target, args.align.into());
        host.run(&mut engine, commands)?;
        info!(
            index,
            scroll_top = host.scroll_top(),
            elapsed_ms = host.now().as_millis() as u64,
            "navigation settled"
        );
    }
    Ok((engine, host))
}

fn build_report(args: &Args, engine: &ListEngine, host: &SimulatedHost) -> Report {
    let target_screen_offset = args
        .jump_to
        .filter(|&index| index < engine.items().len())
        .and_then(|index| engine.heights().row_start(index))
        .map(|top| top - host.scroll_top());
    Report {
        items: args.items,
        seed: args.seed,
        elapsed_ms: host.now().as_millis() as u64,
        target: args.jump_to,
        target_screen_offset,
        scroll_top: host.scroll_top(),
        engine: engine.snapshot(),
        host: host.stats(),
    }
}

fn draw(engine: &ListEngine, viewport: f64) -> String {
    let list = engine.render(|id| Line::from(id.to_string()));
    let lines = viewport.clamp(1.0, MAX_DRAW_LINES).ceil() as u16;
    let mut buf = Buffer::empty(Rect::new(0, 0, DRAW_WIDTH, lines));
    ListView::new(&list, engine.viewport().scroll_top())
        .placeholder("(hidden while measuring)")
        .render(buf.area, &mut buf);
    buffer_to_string(&buf)
}

fn write_report(out: &mut impl Write, report: &Report, json: bool) -> Result<(), AppError> {
    if json {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
        return Ok(());
    }
    writeln!(out, "items:         {}", report.items)?;
    writeln!(out, "elapsed:       {} ms", report.elapsed_ms)?;
    writeln!(
        out,
        "range:         {}..{}",
        report.engine.range.start, report.engine.range.end
    )?;
    writeln!(
        out,
        "measured:      {} of {} rows",
        report.engine.measured_rows, report.engine.item_count
    )?;
    writeln!(out, "total height:  {:.0}", report.engine.total_height)?;
    writeln!(out, "scroll top:    {:.0}", report.scroll_top)?;
    writeln!(out, "revealed:      {}", report.engine.revealed)?;
    if let (Some(target), Some(offset)) = (report.target, report.target_screen_offset) {
        writeln!(out, "target:        item-{target} at {offset:.0} from viewport top")?;
    }
    writeln!(
        out,
        "host:          {} events, {} row reads ({} not found), {} scrolls",
        report.host.events,
        report.host.row_measurements,
        report.host.rows_not_found,
        report.host.scroll_commands
    )?;
    Ok(())
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let file = vlist::config::load_config_with_precedence(args.config.clone())?
            .unwrap_or_default();
        let with_env = vlist::config::apply_env_overrides(file);
        let overrides = CliOverrides {
            default_item_height: args.item_height,
            buffer: args.buffer,
            initial_viewport_height: Some(args.viewport),
            ..CliOverrides::default()
        };
        vlist::config::resolve(vlist::config::apply_cli_overrides(with_env, overrides))
    };

    vlist::logging::init(&config.log_file_path)?;
    info!(settings = ?config.settings, "Configuration loaded and resolved");

    let (engine, host) = simulate(&args, config.settings)?;
    let report = build_report(&args, &engine, &host);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &report, args.json)?;
    if args.draw {
        writeln!(out)?;
        writeln!(out, "{}", draw(&engine, args.viewport))?;
    }
    Ok(())
}
