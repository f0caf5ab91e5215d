//! Per-invocation planning.
//!
//! A [`RotationPlanner`] holds only settings and a solver. Every call to
//! [`RotationPlanner::plan`] builds its own [`RotationContext`] (timeline,
//! model and variable handles), so concurrent plans never share state.

use std::path::Path;
use std::time::{Duration, Instant};

use rotaforge_config::{RotaforgeConfig, DEFAULT_TIME_LIMIT_SECS};
use rotaforge_core::{
    AbilityCatalog, CombatStyle, ResourceModel, Result, RotaforgeError, Timeline,
    DEFAULT_TICK_LENGTH,
};
use rotaforge_solver::{BranchAndBound, BranchAndBoundConfig, SolveResponse, SolveStatus, Solver};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::decoder::SolutionDecoder;
use crate::encoder::{ConstraintEncoder, EncodedRotation, Pin};
use crate::report::RotationReport;

/// Length of the fight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Horizon {
    /// Real time, discretized with the planner's tick length.
    Seconds(f64),
    /// An exact number of ticks.
    Ticks(usize),
}

/// What to plan: horizon, starting meter and optional pinned starts.
///
/// # Example
///
/// ```
/// use rotaforge::RotationRequest;
///
/// let request = RotationRequest::new(20.0, 100)
///     .pin(0, "Assault")
///     .labeled("melee");
/// assert_eq!(request.pins().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationRequest {
    horizon: Horizon,
    start_resource: i64,
    pins: Vec<Pin>,
    label: Option<String>,
}

impl RotationRequest {
    pub fn new(seconds: f64, start_resource: i64) -> Self {
        Self::with_horizon(Horizon::Seconds(seconds), start_resource)
    }

    pub fn ticks(ticks: usize, start_resource: i64) -> Self {
        Self::with_horizon(Horizon::Ticks(ticks), start_resource)
    }

    fn with_horizon(horizon: Horizon, start_resource: i64) -> Self {
        Self {
            horizon,
            start_resource,
            pins: Vec::new(),
            label: None,
        }
    }

    /// Forces `ability` to start on `tick`.
    pub fn pin(mut self, tick: usize, ability: impl Into<String>) -> Self {
        self.pins.push(Pin::new(tick, ability));
        self
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    pub fn start_resource(&self) -> i64 {
        self.start_resource
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Validates the request and builds its timeline.
    pub fn timeline(&self, tick_length: f64) -> Result<Timeline> {
        ResourceModel::check_start_level(self.start_resource)?;
        match self.horizon {
            Horizon::Seconds(seconds) => Timeline::discretize(seconds, tick_length),
            Horizon::Ticks(ticks) => Timeline::from_ticks(ticks),
        }
    }
}

/// Rules and limits shared by every plan of a planner.
#[derive(Debug, Clone)]
pub struct PlannerSettings {
    pub resource: ResourceModel,
    pub tick_length: f64,
    pub time_limit: Duration,
    /// Reject catalogs without an Ultimate.
    pub buff_required: bool,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            resource: ResourceModel::default(),
            tick_length: DEFAULT_TICK_LENGTH,
            time_limit: Duration::from_secs(DEFAULT_TIME_LIMIT_SECS),
            buff_required: false,
        }
    }
}

impl PlannerSettings {
    pub fn from_config(config: &RotaforgeConfig) -> Result<Self> {
        Ok(Self {
            resource: config.resource.to_model()?,
            tick_length: config.timeline.tick_length,
            time_limit: config.time_limit(),
            buff_required: config.resource.buff_required(),
        })
    }
}

/// Everything one solve owns: the timeline, the encoded model and its
/// variable handles. Built fresh for each request.
#[derive(Debug)]
pub struct RotationContext<'a> {
    catalog: &'a AbilityCatalog,
    settings: &'a PlannerSettings,
    request: &'a RotationRequest,
    timeline: Timeline,
    encoded: EncodedRotation,
}

impl<'a> RotationContext<'a> {
    pub fn new(
        catalog: &'a AbilityCatalog,
        settings: &'a PlannerSettings,
        request: &'a RotationRequest,
    ) -> Result<Self> {
        let timeline = request.timeline(settings.tick_length)?;
        let encoded = ConstraintEncoder::new(
            catalog,
            &settings.resource,
            timeline,
            request.start_resource(),
        )
        .with_pins(request.pins())
        .require_buff(settings.buff_required)
        .encode()?;
        Ok(Self {
            catalog,
            settings,
            request,
            timeline,
            encoded,
        })
    }

    pub fn timeline(&self) -> Timeline {
        self.timeline
    }

    pub fn encoded(&self) -> &EncodedRotation {
        &self.encoded
    }

    pub fn decoder(&self) -> SolutionDecoder<'_> {
        SolutionDecoder::new(
            self.catalog,
            &self.settings.resource,
            &self.encoded,
            self.request.start_resource(),
        )
    }

    /// Runs `solver` on the model and decodes its answer.
    pub fn solve<S: Solver + ?Sized>(&self, solver: &S, started: Instant) -> Result<RotationReport> {
        let response = solver
            .solve(self.encoded.model(), self.settings.time_limit)
            .map_err(|err| RotaforgeError::Schema(err.to_string()))?;
        log_status(&response);

        let decoded = self.decoder().decode(&response)?;
        let report = RotationReport {
            label: self.request.label().map(str::to_string),
            entries: decoded.entries,
            resource_trace: decoded.resource_trace,
            multipliers: decoded.multipliers,
            total_damage: decoded.total_damage,
            status: response.status,
            wall_time: started.elapsed(),
            ticks: self.timeline.ticks(),
            tick_length: self.timeline.tick_length(),
            stats: response.stats,
        };

        info!(
            event = "decode_end",
            entries = report.entries.len(),
            total_damage = report.total_damage,
            status = %report.status,
        );
        Ok(report)
    }
}

fn log_status(response: &SolveResponse) {
    match response.status {
        SolveStatus::Infeasible => warn!(
            event = "infeasible",
            diagnostics = %response.diagnostics,
        ),
        SolveStatus::Timeout if response.has_solution() => warn!(
            event = "suboptimal",
            reason = "time limit reached, returning best rotation found",
        ),
        SolveStatus::Timeout => warn!(
            event = "suboptimal",
            reason = "time limit reached before any rotation was found",
        ),
        SolveStatus::Optimal | SolveStatus::Feasible => {}
    }
}

/// Plans rotations with a fixed solver and settings.
///
/// # Example
///
/// ```
/// use rotaforge::{RotationPlanner, RotationRequest};
/// use rotaforge_core::{Ability, AbilityCatalog};
///
/// let catalog = AbilityCatalog::new(vec![Ability::basic("Slice", 10, 1, 0)]).unwrap();
/// let report = RotationPlanner::new()
///     .plan(&catalog, &RotationRequest::ticks(5, 100))
///     .unwrap();
///
/// assert_eq!(report.total_damage, 50);
/// assert!(report.is_optimal());
/// ```
#[derive(Debug, Clone)]
pub struct RotationPlanner<S: Solver = BranchAndBound> {
    settings: PlannerSettings,
    solver: S,
}

impl RotationPlanner<BranchAndBound> {
    pub fn new() -> Self {
        Self {
            settings: PlannerSettings::default(),
            solver: BranchAndBound::default(),
        }
    }

    /// Builds settings and the branch-and-bound engine from configuration.
    pub fn from_config(config: &RotaforgeConfig) -> Result<Self> {
        let solver = BranchAndBound::new(BranchAndBoundConfig {
            node_limit: config.node_limit(),
            stop_at_first_solution: config.search.stop_at_first_solution,
            ..BranchAndBoundConfig::default()
        });
        Ok(Self {
            settings: PlannerSettings::from_config(config)?,
            solver,
        })
    }
}

impl Default for RotationPlanner<BranchAndBound> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Solver> RotationPlanner<S> {
    /// Swaps the solver, keeping the settings.
    pub fn with_solver<T: Solver>(self, solver: T) -> RotationPlanner<T> {
        RotationPlanner {
            settings: self.settings,
            solver,
        }
    }

    pub fn with_settings(mut self, settings: PlannerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.settings.time_limit = time_limit;
        self
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Encodes, solves and decodes one request.
    pub fn plan(&self, catalog: &AbilityCatalog, request: &RotationRequest) -> Result<RotationReport> {
        let started = Instant::now();
        let timeline = request.timeline(self.settings.tick_length)?;
        info!(
            event = "plan_start",
            ticks = timeline.ticks(),
            abilities = catalog.len(),
            start_resource = request.start_resource(),
            solver = self.solver.solver_name(),
        );
        let context = RotationContext::new(catalog, &self.settings, request)?;
        context.solve(&self.solver, started)
    }

    /// Loads `{data_dir}/{style}_data.csv` and plans on it.
    pub fn plan_style(
        &self,
        data_dir: impl AsRef<Path>,
        style: CombatStyle,
        request: &RotationRequest,
    ) -> Result<RotationReport> {
        let catalog = AbilityCatalog::load_style(data_dir, style)?;
        self.plan(&catalog, request)
    }
}
