//! Solution Decoder: reads a rotation back out of a solver response and
//! re-checks it against the rotation rules.
//!
//! The decoder never trusts the assignment. It replays the meter tick by tick
//! through [`ResourceModel::step`], recomputes every multiplier and the total
//! damage, and compares each with what the solver reported.

use rotaforge_core::{AbilityCatalog, ResourceModel, Result, RotaforgeError};
use rotaforge_solver::{Assignment, SolveResponse, SolveStatus};
use tracing::debug;

use crate::encoder::EncodedRotation;
use crate::report::RotationEntry;

/// A verified rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRotation {
    pub entries: Vec<RotationEntry>,
    /// `r[t]` for every tick.
    pub resource_trace: Vec<i64>,
    /// `m[t]` for every tick.
    pub multipliers: Vec<i64>,
    pub total_damage: i64,
}

/// Decodes responses for one encoded model.
#[derive(Debug, Clone, Copy)]
pub struct SolutionDecoder<'a> {
    catalog: &'a AbilityCatalog,
    resource: &'a ResourceModel,
    encoded: &'a EncodedRotation,
    start_resource: i64,
}

/// Ability currently occupying the actor.
#[derive(Debug, Clone, Copy)]
struct Busy {
    ability: usize,
    until: usize,
}

/// Open damage buff.
#[derive(Debug, Clone, Copy)]
struct OpenBuff {
    until: usize,
    multiplier: i64,
}

impl<'a> SolutionDecoder<'a> {
    pub fn new(
        catalog: &'a AbilityCatalog,
        resource: &'a ResourceModel,
        encoded: &'a EncodedRotation,
        start_resource: i64,
    ) -> Self {
        Self {
            catalog,
            resource,
            encoded,
            start_resource,
        }
    }

    /// Decodes `response`, failing when it holds no rotation or when the
    /// rotation breaks a rule.
    pub fn decode(&self, response: &SolveResponse) -> Result<DecodedRotation> {
        if response.status == SolveStatus::Infeasible {
            return Err(RotaforgeError::InfeasibleModel {
                diagnostics: response.diagnostics.to_string(),
            });
        }
        let Some(assignment) = &response.assignment else {
            return Err(RotaforgeError::NoSolution {
                status: response.status.to_string(),
                diagnostics: response.diagnostics.to_string(),
            });
        };

        let decoded = self.replay(assignment)?;
        let objective = response
            .objective
            .unwrap_or_else(|| assignment.value(self.encoded.total_damage()));
        if objective != decoded.total_damage {
            return Err(RotaforgeError::Verification {
                objective,
                recomputed: decoded.total_damage,
            });
        }

        debug!(
            event = "decode_verified",
            entries = decoded.entries.len(),
            total_damage = decoded.total_damage,
        );
        Ok(decoded)
    }

    /// Replays the assignment through the meter rules.
    pub fn replay(&self, assignment: &Assignment) -> Result<DecodedRotation> {
        let ticks = self.encoded.ticks();
        let mut entries = Vec::new();
        let mut resource_trace = Vec::with_capacity(ticks);
        let mut multipliers = Vec::with_capacity(ticks);
        let mut last_start: Vec<Option<usize>> = vec![None; self.catalog.len()];
        let mut busy: Option<Busy> = None;
        let mut buff: Option<OpenBuff> = None;
        let mut previous = self.start_resource;
        let mut total_damage = 0i64;

        for t in 0..ticks {
            let started = self.started_at(assignment, t)?;
            let reported = assignment.value(self.encoded.resource(t));
            let label = started.map_or("idle", |a| self.name(a));

            if let Some(a) = started {
                self.check_start(t, a, busy, last_start[a])?;
                last_start[a] = Some(t);
                busy = Some(Busy {
                    ability: a,
                    until: t + self.catalog.abilities()[a].duration() as usize,
                });
            }

            let category = started.map(|a| self.catalog.abilities()[a].category());
            let transition = self
                .resource
                .step(previous, category)
                .map_err(|err| inconsistent(t, label, err.to_string()))?;
            if transition.level != reported {
                return Err(inconsistent(
                    t,
                    label,
                    format!(
                        "solver reports resource {}, rules give {}",
                        reported, transition.level
                    ),
                ));
            }

            if let Some(window) = transition.buff {
                buff = Some(OpenBuff {
                    until: t + window.ticks as usize,
                    multiplier: window.multiplier,
                });
            }
            let multiplier = match buff {
                Some(open) if t < open.until => open.multiplier,
                _ => 1,
            };
            let reported_multiplier = assignment.value(self.encoded.multiplier(t));
            if multiplier != reported_multiplier {
                return Err(inconsistent(
                    t,
                    label,
                    format!(
                        "solver reports multiplier {}, buff window gives {}",
                        reported_multiplier, multiplier
                    ),
                ));
            }

            if let Some(a) = started {
                total_damage += self.catalog.abilities()[a].damage() as i64 * multiplier;
                entries.push(RotationEntry {
                    tick: t,
                    resource_after: transition.level,
                    ability_name: self.name(a).to_string(),
                });
            }
            resource_trace.push(transition.level);
            multipliers.push(multiplier);
            previous = transition.level;
        }

        Ok(DecodedRotation {
            entries,
            resource_trace,
            multipliers,
            total_damage,
        })
    }

    /// The single ability starting on `tick`, if any.
    fn started_at(&self, assignment: &Assignment, tick: usize) -> Result<Option<usize>> {
        let mut started = self
            .encoded
            .starts_at(tick)
            .iter()
            .enumerate()
            .filter(|&(_, &x)| assignment.value(x) != 0)
            .map(|(a, _)| a);
        let first = started.next();
        if let Some(second) = started.next() {
            let first_name = first.map_or("", |a| self.name(a));
            return Err(inconsistent(
                tick,
                first_name,
                format!("{} starts on the same tick", self.name(second)),
            ));
        }
        Ok(first)
    }

    fn check_start(
        &self,
        tick: usize,
        ability: usize,
        busy: Option<Busy>,
        last_start: Option<usize>,
    ) -> Result<()> {
        let name = self.name(ability);
        if let Some(active) = busy.filter(|b| tick < b.until) {
            return Err(inconsistent(
                tick,
                name,
                format!(
                    "starts while {} is active until tick {}",
                    self.name(active.ability),
                    active.until
                ),
            ));
        }
        let cooldown = self.catalog.abilities()[ability].cooldown() as usize;
        if let Some(last) = last_start.filter(|&last| tick - last < cooldown) {
            return Err(inconsistent(
                tick,
                name,
                format!(
                    "restarted {} ticks after tick {}, cooldown is {}",
                    tick - last,
                    last,
                    cooldown
                ),
            ));
        }
        Ok(())
    }

    fn name(&self, ability: usize) -> &'a str {
        self.catalog.abilities()[ability].name()
    }
}

fn inconsistent(tick: usize, ability: &str, reason: String) -> RotaforgeError {
    RotaforgeError::InconsistentSolution {
        tick,
        ability: ability.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rotaforge_core::{Ability, Timeline};
    use rotaforge_solver::{BranchAndBound, Diagnostics, Solver, SolverStats};

    use super::*;
    use crate::encoder::ConstraintEncoder;

    const LIMIT: Duration = Duration::from_secs(10);

    struct Fixture {
        catalog: AbilityCatalog,
        resource: ResourceModel,
        encoded: EncodedRotation,
    }

    impl Fixture {
        fn new(abilities: Vec<Ability>, ticks: usize, start: i64) -> Self {
            let catalog = AbilityCatalog::new(abilities).unwrap();
            let resource = ResourceModel::default();
            let encoded = ConstraintEncoder::new(
                &catalog,
                &resource,
                Timeline::from_ticks(ticks).unwrap(),
                start,
            )
            .encode()
            .unwrap();
            Self {
                catalog,
                resource,
                encoded,
            }
        }

        fn decoder(&self, start: i64) -> SolutionDecoder<'_> {
            SolutionDecoder::new(&self.catalog, &self.resource, &self.encoded, start)
        }

        fn solve(&self) -> SolveResponse {
            BranchAndBound::default()
                .solve(self.encoded.model(), LIMIT)
                .unwrap()
        }
    }

    fn with_value(assignment: &Assignment, var: rotaforge_solver::VarId, value: i64) -> Assignment {
        let mut values = assignment.values().to_vec();
        values[var.index()] = value;
        Assignment::from_values(values)
    }

    fn response(status: SolveStatus, assignment: Option<Assignment>) -> SolveResponse {
        SolveResponse {
            status,
            assignment,
            objective: None,
            diagnostics: Diagnostics::default(),
            stats: SolverStats::default(),
        }
    }

    #[test]
    fn test_decodes_solver_rotation() {
        let fixture = Fixture::new(vec![Ability::basic("Slice", 10, 1, 0)], 3, 0);
        let decoded = fixture.decoder(0).decode(&fixture.solve()).unwrap();

        assert_eq!(decoded.entries.len(), 3);
        assert_eq!(decoded.resource_trace, vec![9, 18, 27]);
        assert_eq!(decoded.multipliers, vec![1, 1, 1]);
        assert_eq!(decoded.total_damage, 30);
    }

    #[test]
    fn test_double_start_is_inconsistent() {
        let fixture = Fixture::new(
            vec![
                Ability::basic("Slice", 10, 1, 0),
                Ability::basic("Stab", 10, 1, 0),
            ],
            2,
            0,
        );
        let solved = fixture.solve().assignment.unwrap();
        let mut broken = with_value(&solved, fixture.encoded.start(0, 0), 1);
        broken = with_value(&broken, fixture.encoded.start(0, 1), 1);

        let err = fixture.decoder(0).replay(&broken).unwrap_err();
        assert!(matches!(err, RotaforgeError::InconsistentSolution { tick: 0, .. }));
    }

    #[test]
    fn test_start_during_busy_window_is_inconsistent() {
        let fixture = Fixture::new(vec![Ability::basic("Slam", 10, 3, 0)], 3, 0);
        let solved = fixture.solve().assignment.unwrap();
        assert_eq!(solved.value(fixture.encoded.start(0, 0)), 1);

        let broken = with_value(&solved, fixture.encoded.start(1, 0), 1);
        let err = fixture.decoder(0).replay(&broken).unwrap_err();
        match err {
            RotaforgeError::InconsistentSolution { tick, reason, .. } => {
                assert_eq!(tick, 1);
                assert!(reason.contains("active"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cooldown_violation_is_inconsistent() {
        let fixture = Fixture::new(vec![Ability::basic("Slice", 10, 1, 3)], 3, 0);
        let solved = fixture.solve().assignment.unwrap();

        let mut broken = with_value(&solved, fixture.encoded.start(1, 0), 1);
        broken = with_value(&broken, fixture.encoded.resource(1), 18);
        let err = fixture.decoder(0).replay(&broken).unwrap_err();
        match err {
            RotaforgeError::InconsistentSolution { tick, reason, .. } => {
                assert_eq!(tick, 1);
                assert!(reason.contains("cooldown"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resource_mismatch_is_inconsistent() {
        let fixture = Fixture::new(vec![Ability::basic("Slice", 10, 1, 0)], 2, 0);
        let solved = fixture.solve().assignment.unwrap();

        let broken = with_value(&solved, fixture.encoded.resource(0), 50);
        let err = fixture.decoder(0).replay(&broken).unwrap_err();
        assert!(matches!(err, RotaforgeError::InconsistentSolution { tick: 0, .. }));
    }

    #[test]
    fn test_threshold_below_minimum_is_inconsistent() {
        let fixture = Fixture::new(vec![Ability::threshold("Smash", 100, 1, 0)], 1, 40);
        let forced = with_value(
            &fixture.solve().assignment.unwrap(),
            fixture.encoded.start(0, 0),
            1,
        );

        let err = fixture.decoder(40).replay(&forced).unwrap_err();
        match err {
            RotaforgeError::InconsistentSolution { ability, reason, .. } => {
                assert_eq!(ability, "Smash");
                assert!(reason.contains("50"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_objective_mismatch_is_verification_error() {
        let fixture = Fixture::new(vec![Ability::basic("Slice", 10, 1, 0)], 2, 0);
        let mut solved = fixture.solve();
        solved.objective = solved.objective.map(|o| o + 1);

        let err = fixture.decoder(0).decode(&solved).unwrap_err();
        assert!(matches!(
            err,
            RotaforgeError::Verification {
                objective: 21,
                recomputed: 20
            }
        ));
    }

    #[test]
    fn test_total_damage_checked_without_reported_objective() {
        let fixture = Fixture::new(vec![Ability::basic("Slice", 10, 1, 0)], 2, 0);
        let solved = fixture.solve().assignment.unwrap();
        assert_eq!(solved.value(fixture.encoded.total_damage()), 20);

        let accepted = fixture
            .decoder(0)
            .decode(&response(SolveStatus::Feasible, Some(solved.clone())))
            .unwrap();
        assert_eq!(accepted.total_damage, 20);

        let inflated = with_value(&solved, fixture.encoded.total_damage(), 25);
        let err = fixture
            .decoder(0)
            .decode(&response(SolveStatus::Feasible, Some(inflated)))
            .unwrap_err();
        assert!(matches!(
            err,
            RotaforgeError::Verification {
                objective: 25,
                recomputed: 20
            }
        ));
    }

    #[test]
    fn test_multiplier_mismatch_is_inconsistent() {
        let fixture = Fixture::new(vec![Ability::ultimate("Overpower", 300, 1, 0)], 1, 100);
        let solved = fixture.solve().assignment.unwrap();
        assert_eq!(solved.value(fixture.encoded.start(0, 0)), 1);
        assert_eq!(solved.value(fixture.encoded.multiplier(0)), 2);

        let broken = with_value(&solved, fixture.encoded.multiplier(0), 1);
        let err = fixture.decoder(100).replay(&broken).unwrap_err();
        match err {
            RotaforgeError::InconsistentSolution { tick, reason, .. } => {
                assert_eq!(tick, 0);
                assert!(reason.contains("multiplier"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_infeasible_status_surfaces_diagnostics() {
        let fixture = Fixture::new(vec![Ability::basic("Slice", 10, 1, 0)], 1, 0);
        let mut infeasible = response(SolveStatus::Infeasible, None);
        infeasible.diagnostics.root_conflict = Some("t0 Slice: pinned start".to_string());

        let err = fixture.decoder(0).decode(&infeasible).unwrap_err();
        match err {
            RotaforgeError::InfeasibleModel { diagnostics } => {
                assert!(diagnostics.contains("pinned start"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_timeout_without_assignment_is_no_solution() {
        let fixture = Fixture::new(vec![Ability::basic("Slice", 10, 1, 0)], 1, 0);
        let err = fixture
            .decoder(0)
            .decode(&response(SolveStatus::Timeout, None))
            .unwrap_err();
        assert!(matches!(err, RotaforgeError::NoSolution { .. }));
    }
}
