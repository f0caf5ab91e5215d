//! Colorful console output for rotation solves.
//!
//! Provides a custom `tracing` layer that formats planner and solver events
//! with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (plan/solve start and end, decoded rotation)
//! - **WARN**: Suboptimal or infeasible outcomes
//! - **DEBUG**: Encoder summaries and every improving solution
//! - **TRACE**: Individual search conflicts

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static PLAN_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "rotaforge=info,rotaforge_solver=info";

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and sets up tracing. Output goes to stderr so that
/// stdout stays free for the rotation itself.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(RotaforgeConsoleLayer)
            .try_init();
    });
}

// Marks the start of planning for elapsed time tracking.
fn mark_plan_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    PLAN_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Returns elapsed time since the plan started.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = PLAN_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 ____       _        _____
|  _ \ ___ | |_ __ _|  ___|__  _ __ __ _  ___
| |_) / _ \| __/ _` | |_ / _ \| '__/ _` |/ _ \
|  _ < (_) | || (_| |  _| (_) | | | (_| |  __/
|_| \_\___/ \__\__,_|_|  \___/|_|  \__, |\___|
                                   |___/
"#;

    let version_line = format!("            v{} - Ability Rotation Planner\n", VERSION);

    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{}", banner.bright_cyan());
    let _ = writeln!(stderr, "{}", version_line.bright_white().bold());
    let _ = stderr.flush();
}

/// A tracing layer that formats rotation events with colors.
pub struct RotaforgeConsoleLayer;

impl<S: Subscriber> Layer<S> for RotaforgeConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        // Accept events from planner and solver crates
        if !metadata.target().starts_with("rotaforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    status: Option<String>,
    objective: Option<String>,
    reason: Option<String>,
    diagnostics: Option<String>,
    ticks: Option<u64>,
    abilities: Option<u64>,
    start_resource: Option<u64>,
    variables: Option<u64>,
    constraints: Option<u64>,
    constraint: Option<u64>,
    depth: Option<u64>,
    nodes: Option<u64>,
    conflicts: Option<u64>,
    solutions: Option<u64>,
    entries: Option<u64>,
    total_damage: Option<u64>,
    requests: Option<u64>,
    duration_ms: Option<u64>,
    elapsed_ms: Option<u64>,
    time_limit_secs: Option<f64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "status" => self.status = Some(s),
            "objective" => self.objective = Some(s),
            "reason" => self.reason = Some(s),
            "diagnostics" => self.diagnostics = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "ticks" => self.ticks = Some(value),
            "abilities" => self.abilities = Some(value),
            "start_resource" => self.start_resource = Some(value),
            "variables" => self.variables = Some(value),
            "constraints" => self.constraints = Some(value),
            "constraint" => self.constraint = Some(value),
            "depth" => self.depth = Some(value),
            "nodes" => self.nodes = Some(value),
            "conflicts" => self.conflicts = Some(value),
            "solutions" => self.solutions = Some(value),
            "entries" => self.entries = Some(value),
            "total_damage" => self.total_damage = Some(value),
            "requests" => self.requests = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "elapsed_ms" => self.elapsed_ms = Some(value),
            "objective" => self.objective = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            "objective" => self.objective = Some(value.to_string()),
            _ => self.record_u64(field, value.max(0) as u64),
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "time_limit_secs" {
            self.time_limit_secs = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            "objective" => self.objective = Some(value.to_string()),
            "reason" => self.reason = Some(value.to_string()),
            "diagnostics" => self.diagnostics = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "plan_start" => format_plan_start(v),
        "solve_start" => format_solve_start(v),
        "incumbent" => format_incumbent(v),
        "solve_end" => format_solve_end(v),
        "decode_end" => format_decode_end(v),
        "suboptimal" | "infeasible" | "rejected_solution" => format_warning(v, event),
        "batch_start" => format_batch_start(v),
        "conflict" if level == Level::TRACE => format_conflict(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_plan_start(v: &EventVisitor) -> String {
    mark_plan_start();
    format!(
        "{} {} Planning │ {} ticks │ {} abilities │ start resource {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.ticks).bright_yellow(),
        count(v.abilities).bright_yellow(),
        count(v.start_resource).bright_yellow(),
    )
}

fn format_batch_start(v: &EventVisitor) -> String {
    mark_plan_start();
    format!(
        "{} {} Batch │ {} requests",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.requests).bright_yellow(),
    )
}

fn format_solve_start(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} Solving │ {} variables │ {} constraints",
        format_elapsed(),
        "▶".bright_blue(),
        count(v.variables).bright_yellow(),
        count(v.constraints).bright_yellow(),
    );

    if let Some(limit) = v.time_limit_secs.filter(|&l| l > 0.0) {
        output.push_str(&format!(" │ {}s limit", format!("{:.0}", limit).bright_yellow()));
    }

    output
}

fn format_incumbent(v: &EventVisitor) -> String {
    format!(
        "{} {} New best {} │ {} nodes",
        format_elapsed(),
        "⚡".bright_cyan(),
        v.objective
            .as_deref()
            .unwrap_or("?")
            .bright_green()
            .bold(),
        count(v.nodes).white(),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("UNKNOWN");
    let objective = v.objective.as_deref().unwrap_or("none");

    format!(
        "{} {} Solving complete │ {} │ objective {} │ {} nodes │ {} conflicts │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_status(status),
        objective.white().bold(),
        count(v.nodes).white(),
        count(v.conflicts).white(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
    )
}

fn format_decode_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("UNKNOWN");
    let damage = count(v.total_damage);

    let mut output = format!(
        "{} {} Rotation │ {} casts │ {} damage │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        count(v.entries).white(),
        damage.bright_magenta().bold(),
        format_status(status),
    );

    output.push_str("\n\n");
    output.push_str(
        &"╔══════════════════════════════════════════════════════════╗"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');
    output.push_str(&format!(
        "{}  {:<18}{:>36}  {}",
        "║".bright_cyan(),
        "Total damage:",
        damage,
        "║".bright_cyan()
    ));
    output.push('\n');
    output.push_str(&format!(
        "{}  {:<18}{:>36}  {}",
        "║".bright_cyan(),
        "Solver status:",
        status,
        "║".bright_cyan()
    ));
    output.push('\n');
    output.push_str(
        &"╚══════════════════════════════════════════════════════════╝"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    output
}

fn format_warning(v: &EventVisitor, event: &str) -> String {
    let detail = v
        .diagnostics
        .as_deref()
        .or(v.reason.as_deref())
        .or(v.status.as_deref())
        .unwrap_or("");
    format!(
        "{} {} {} │ {}",
        format_elapsed(),
        "!".bright_yellow().bold(),
        event.replace('_', " ").yellow(),
        detail,
    )
}

fn format_conflict(v: &EventVisitor) -> String {
    format!(
        "{} {} Conflict │ constraint {} │ depth {} │ {} nodes",
        format_elapsed(),
        "✗".bright_red(),
        count(v.constraint).bright_black(),
        count(v.depth).bright_black(),
        count(v.nodes).bright_black(),
    )
}

fn format_status(status: &str) -> String {
    match status {
        "OPTIMAL" => status.bright_green().bold().to_string(),
        "FEASIBLE" => status.green().to_string(),
        "TIMEOUT" => status.bright_yellow().bold().to_string(),
        "INFEASIBLE" => status.bright_red().bold().to_string(),
        _ => status.white().to_string(),
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
