//! Constraint Encoder: turns a catalog, a timeline and the meter rules into
//! an integer model.
//!
//! Per tick `t` and ability `a` the model holds
//! - `x[t,a]`: ability `a` starts on tick `t`
//! - `started[t]`: some ability starts on tick `t` (equal to `Σ_a x[t,a]`,
//!   which also caps the starts per tick at one)
//! - `r[t]`: meter level after tick `t`, with `r[-1]` fixed to the start level
//! - `cap[t]`: `r[t-1]` is at or above the Basic saturation level
//! - `buff[t]`, `m[t]`: buff window open on `t` and the resulting multiplier
//! - `damage[t]`: damage dealt by the start on `t`, multiplier included
//!
//! and the objective maximizes `Σ_t damage[t]`.

use rotaforge_core::{
    Ability, AbilityCatalog, BuffWindow, Category, ResourceModel, Result, RotaforgeError,
    Timeline, UltimateRequirement, METER_MAX, METER_MIN,
};
use rotaforge_solver::{LinearExpr, Literal, Model, VarId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An ability forced to start on a given tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    pub tick: usize,
    pub ability: String,
}

impl Pin {
    pub fn new(tick: usize, ability: impl Into<String>) -> Self {
        Self {
            tick,
            ability: ability.into(),
        }
    }
}

/// An encoded model plus the handles the decoder reads back.
#[derive(Debug, Clone)]
pub struct EncodedRotation {
    model: Model,
    starts: Vec<Vec<VarId>>,
    resource: Vec<VarId>,
    multiplier: Vec<VarId>,
    total_damage: VarId,
}

impl EncodedRotation {
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn ticks(&self) -> usize {
        self.starts.len()
    }

    /// `x[tick, ability]`.
    pub fn start(&self, tick: usize, ability: usize) -> VarId {
        self.starts[tick][ability]
    }

    /// Start variables of one tick, in catalog order.
    pub fn starts_at(&self, tick: usize) -> &[VarId] {
        &self.starts[tick]
    }

    /// `r[tick]`, the level after the tick resolves.
    pub fn resource(&self, tick: usize) -> VarId {
        self.resource[tick]
    }

    /// `m[tick]`.
    pub fn multiplier(&self, tick: usize) -> VarId {
        self.multiplier[tick]
    }

    pub fn total_damage(&self) -> VarId {
        self.total_damage
    }
}

/// Builds the model for one solve.
///
/// # Example
///
/// ```
/// use rotaforge::ConstraintEncoder;
/// use rotaforge_core::{Ability, AbilityCatalog, ResourceModel, Timeline};
///
/// let catalog = AbilityCatalog::new(vec![Ability::basic("Slice", 60, 3, 5)]).unwrap();
/// let resource = ResourceModel::default();
/// let timeline = Timeline::from_ticks(10).unwrap();
///
/// let encoded = ConstraintEncoder::new(&catalog, &resource, timeline, 0)
///     .encode()
///     .unwrap();
/// assert_eq!(encoded.ticks(), 10);
/// assert!(encoded.model().objective().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ConstraintEncoder<'a> {
    catalog: &'a AbilityCatalog,
    resource: &'a ResourceModel,
    timeline: Timeline,
    start_resource: i64,
    pins: &'a [Pin],
    buff_required: bool,
}

impl<'a> ConstraintEncoder<'a> {
    pub fn new(
        catalog: &'a AbilityCatalog,
        resource: &'a ResourceModel,
        timeline: Timeline,
        start_resource: i64,
    ) -> Self {
        Self {
            catalog,
            resource,
            timeline,
            start_resource,
            pins: &[],
            buff_required: false,
        }
    }

    pub fn with_pins(mut self, pins: &'a [Pin]) -> Self {
        self.pins = pins;
        self
    }

    /// Rejects catalogs without an Ultimate to open the buff window.
    pub fn require_buff(mut self, required: bool) -> Self {
        self.buff_required = required;
        self
    }

    pub fn encode(&self) -> Result<EncodedRotation> {
        self.check_schema()?;
        let start = ResourceModel::check_start_level(self.start_resource)?;

        let ticks = self.timeline.ticks();
        let abilities = self.catalog.abilities();
        let buff = self
            .resource
            .ultimate()
            .buff
            .filter(|_| self.catalog.has_category(Category::Ultimate));
        let max_multiplier = buff.map_or(1, |window| window.multiplier);
        let max_tick_damage = i64::from(self.catalog.max_damage())
            .checked_mul(max_multiplier)
            .ok_or_else(|| {
                RotaforgeError::InvalidParameter(format!(
                    "damage {} times buff multiplier {} overflows",
                    self.catalog.max_damage(),
                    max_multiplier
                ))
            })?;

        let mut model = Model::new();
        let initial = model.new_constant(start, "r[-1]");
        let mut starts: Vec<Vec<VarId>> = Vec::with_capacity(ticks);
        let mut started = Vec::with_capacity(ticks);
        let mut resource = Vec::with_capacity(ticks);
        for t in 0..ticks {
            starts.push(
                abilities
                    .iter()
                    .map(|a| model.new_bool_var(format!("x[{},{}]", t, a.name())))
                    .collect(),
            );
            started.push(model.new_bool_var(format!("started[{}]", t)));
            resource.push(model.new_int_var(METER_MIN, METER_MAX, format!("r[{}]", t)));
        }

        // Pins come first so a broken pin is reported against the rule it breaks.
        for pin in self.pins {
            let (t, a) = self.resolve_pin(pin, ticks)?;
            model
                .add_eq(starts[t][a], 1)
                .named(format!("t{} {}: pinned start", t, pin.ability));
        }

        let mut damage = Vec::with_capacity(ticks);
        let mut multiplier = Vec::with_capacity(ticks);
        for t in 0..ticks {
            let previous = if t == 0 { initial } else { resource[t - 1] };

            model
                .add_eq(
                    LinearExpr::sum(starts[t].iter().copied()).term(started[t], -1),
                    0,
                )
                .named(format!("t{}: at most one start", t));

            for (a, ability) in abilities.iter().enumerate() {
                let x = starts[t][a];
                encode_busy_window(&mut model, ability, x, t, &started);
                encode_cooldown(&mut model, ability, x, t, a, &starts);
            }

            self.encode_resource(&mut model, t, previous, resource[t], &starts[t]);
            model
                .add_eq(
                    LinearExpr::new().term(resource[t], 1).term(previous, -1),
                    0,
                )
                .only_enforce_if([!Literal::from(started[t])])
                .named(format!("t{}: idle keeps resource", t));

            let dmg = model.new_int_var(0, max_tick_damage, format!("damage[{}]", t));
            let m = match buff {
                Some(window) => self.encode_buffed_damage(&mut model, t, dmg, window, &starts),
                None => {
                    model
                        .add_eq(self.damage_expr(dmg, &starts[t], 1), 0)
                        .named(format!("t{}: damage", t));
                    model.new_constant(1, format!("m[{}]", t))
                }
            };
            damage.push(dmg);
            multiplier.push(m);
        }

        let total_damage = model.new_int_var(
            0,
            max_tick_damage.saturating_mul(ticks as i64),
            "total_damage",
        );
        model
            .add_eq(
                LinearExpr::sum(damage.iter().copied()).term(total_damage, -1),
                0,
            )
            .named("total damage");
        model.maximize(total_damage);

        // Branch tick by tick, strongest ability first.
        let mut order: Vec<usize> = (0..abilities.len()).collect();
        order.sort_by_key(|&a| std::cmp::Reverse(abilities[a].damage()));
        for row in &starts {
            model.add_decision_order(order.iter().map(|&a| row[a]));
        }

        debug!(
            event = "encode_end",
            ticks = ticks,
            abilities = abilities.len(),
            variables = model.num_vars(),
            constraints = model.num_constraints(),
        );

        Ok(EncodedRotation {
            model,
            starts,
            resource,
            multiplier,
            total_damage,
        })
    }

    fn check_schema(&self) -> Result<()> {
        if self.catalog.is_empty() {
            return Err(RotaforgeError::Schema(
                "the ability catalog is empty".to_string(),
            ));
        }
        if self.buff_required && !self.catalog.has_category(Category::Ultimate) {
            return Err(RotaforgeError::Schema(
                "a buff window is required but the catalog has no Ultimate ability".to_string(),
            ));
        }
        Ok(())
    }

    fn resolve_pin(&self, pin: &Pin, ticks: usize) -> Result<(usize, usize)> {
        if pin.tick >= ticks {
            return Err(RotaforgeError::InvalidParameter(format!(
                "pin tick {} is outside the horizon of {} ticks",
                pin.tick, ticks
            )));
        }
        let ability = self.catalog.position(&pin.ability).ok_or_else(|| {
            RotaforgeError::InvalidParameter(format!(
                "pinned ability '{}' is not in the catalog",
                pin.ability
            ))
        })?;
        Ok((pin.tick, ability))
    }

    /// Meter transition on tick `t` for each category that can start.
    fn encode_resource(
        &self,
        model: &mut Model,
        t: usize,
        previous: VarId,
        current: VarId,
        starts: &[VarId],
    ) {
        let abilities = self.catalog.abilities();
        let delta = |model: &mut Model, amount: i64, x: VarId, extra: Option<Literal>, name: String| {
            let mut lits = vec![Literal::from(x)];
            lits.extend(extra);
            model
                .add_eq(
                    LinearExpr::new().term(current, 1).term(previous, -1),
                    amount,
                )
                .only_enforce_if(lits)
                .named(name);
        };

        if self.catalog.has_category(Category::Basic) {
            let rule = self.resource.basic();
            let saturation = rule.saturation_level();
            let cap = model.new_bool_var(format!("cap[{}]", t));
            model
                .add_ge(previous, saturation)
                .only_enforce_if([Literal::from(cap)])
                .named(format!("t{}: meter at cap", t));
            model
                .add_le(previous, saturation - 1)
                .only_enforce_if([!Literal::from(cap)])
                .named(format!("t{}: meter below cap", t));

            for a in self.catalog.indices_of(Category::Basic) {
                let x = starts[a];
                model
                    .add_eq(current, METER_MAX)
                    .only_enforce_if([Literal::from(x), Literal::from(cap)])
                    .named(format!("t{} {}: basic saturates", t, abilities[a].name()));
                delta(
                    model,
                    rule.gain,
                    x,
                    Some(!Literal::from(cap)),
                    format!("t{} {}: basic gains {}", t, abilities[a].name(), rule.gain),
                );
            }
        }

        let threshold = self.resource.threshold();
        for a in self.catalog.indices_of(Category::Threshold) {
            let x = starts[a];
            model
                .add_ge(previous, threshold.min_level)
                .only_enforce_if([Literal::from(x)])
                .named(format!(
                    "t{} {}: threshold needs resource >= {}",
                    t,
                    abilities[a].name(),
                    threshold.min_level
                ));
            delta(
                model,
                -threshold.cost,
                x,
                None,
                format!("t{} {}: threshold spends {}", t, abilities[a].name(), threshold.cost),
            );
        }

        let ultimate = self.resource.ultimate();
        for a in self.catalog.indices_of(Category::Ultimate) {
            let x = starts[a];
            let name = format!(
                "t{} {}: ultimate needs resource {}",
                t,
                abilities[a].name(),
                ultimate.requirement
            );
            match ultimate.requirement {
                UltimateRequirement::Exactly(level) => model.add_eq(previous, level),
                UltimateRequirement::AtLeast(level) => model.add_ge(previous, level),
            }
            .only_enforce_if([Literal::from(x)])
            .named(name);
            model
                .add_eq(current, ultimate.reset_to)
                .only_enforce_if([Literal::from(x)])
                .named(format!("t{} {}: ultimate resets resource", t, abilities[a].name()));
        }
    }

    /// `damage[t]` under a buff window opened by any Ultimate started in
    /// the last `window.ticks` ticks. Returns `m[t]`.
    fn encode_buffed_damage(
        &self,
        model: &mut Model,
        t: usize,
        dmg: VarId,
        window: BuffWindow,
        starts: &[Vec<VarId>],
    ) -> VarId {
        let on = model.new_bool_var(format!("buff[{}]", t));
        let from = (t + 1).saturating_sub(window.ticks as usize);
        let ultimates: Vec<usize> = self.catalog.indices_of(Category::Ultimate).collect();
        let openers: Vec<VarId> = starts[from..=t]
            .iter()
            .flat_map(|row| ultimates.iter().map(move |&u| row[u]))
            .collect();

        for &opener in &openers {
            model
                .add_ge(LinearExpr::new().term(on, 1).term(opener, -1), 0)
                .named(format!("t{}: ultimate opens buff", t));
        }
        let mut closed = LinearExpr::new().term(on, 1);
        for &opener in &openers {
            closed.add_term(opener, -1);
        }
        model
            .add_le(closed, 0)
            .named(format!("t{}: buff needs a recent ultimate", t));

        let m = model.new_int_var(1, window.multiplier, format!("m[{}]", t));
        model
            .add_eq(
                LinearExpr::new()
                    .term(m, 1)
                    .term(on, -(window.multiplier - 1)),
                1,
            )
            .named(format!("t{}: multiplier", t));

        model
            .add_eq(self.damage_expr(dmg, &starts[t], 1), 0)
            .only_enforce_if([!Literal::from(on)])
            .named(format!("t{}: damage", t));
        model
            .add_eq(self.damage_expr(dmg, &starts[t], window.multiplier), 0)
            .only_enforce_if([Literal::from(on)])
            .named(format!("t{}: buffed damage", t));
        m
    }

    /// `damage - scale * Σ_a damage_a * x[t,a]`.
    fn damage_expr(&self, dmg: VarId, starts: &[VarId], scale: i64) -> LinearExpr {
        let mut expr = LinearExpr::new().term(dmg, 1);
        for (ability, &x) in self.catalog.iter().zip(starts) {
            expr.add_term(x, -scale * ability.damage() as i64);
        }
        expr
    }
}

/// No start on the ticks an ability keeps the actor busy.
fn encode_busy_window(model: &mut Model, ability: &Ability, x: VarId, t: usize, started: &[VarId]) {
    let end = (t + ability.duration() as usize).min(started.len());
    if t + 1 >= end {
        return;
    }
    model
        .add_le(LinearExpr::sum(started[t + 1..end].iter().copied()), 0)
        .only_enforce_if([Literal::from(x)])
        .named(format!("t{} {}: busy window", t, ability.name()));
}

/// No earlier start of the same ability within `cooldown - 1` ticks.
fn encode_cooldown(
    model: &mut Model,
    ability: &Ability,
    x: VarId,
    t: usize,
    a: usize,
    starts: &[Vec<VarId>],
) {
    let from = (t + 1).saturating_sub(ability.cooldown() as usize);
    if from >= t {
        return;
    }
    model
        .add_le(LinearExpr::sum((from..t).map(|s| starts[s][a])), 0)
        .only_enforce_if([Literal::from(x)])
        .named(format!("t{} {}: cooldown", t, ability.name()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotaforge_core::{BasicRule, ThresholdRule, UltimateRule};

    fn catalog(abilities: Vec<Ability>) -> AbilityCatalog {
        AbilityCatalog::new(abilities).unwrap()
    }

    #[test]
    fn test_empty_catalog_is_schema_error() {
        let empty = AbilityCatalog::new(Vec::new()).unwrap();
        let resource = ResourceModel::default();
        let err = ConstraintEncoder::new(&empty, &resource, Timeline::from_ticks(3).unwrap(), 0)
            .encode()
            .unwrap_err();
        assert!(matches!(err, RotaforgeError::Schema(_)));
    }

    #[test]
    fn test_required_buff_without_ultimate_is_schema_error() {
        let catalog = catalog(vec![Ability::basic("Slice", 60, 1, 0)]);
        let resource = ResourceModel::default();
        let err = ConstraintEncoder::new(&catalog, &resource, Timeline::from_ticks(3).unwrap(), 0)
            .require_buff(true)
            .encode()
            .unwrap_err();
        assert!(matches!(err, RotaforgeError::Schema(_)));
    }

    #[test]
    fn test_start_resource_out_of_range() {
        let catalog = catalog(vec![Ability::basic("Slice", 60, 1, 0)]);
        let resource = ResourceModel::default();
        let err = ConstraintEncoder::new(&catalog, &resource, Timeline::from_ticks(3).unwrap(), 101)
            .encode()
            .unwrap_err();
        assert!(matches!(err, RotaforgeError::InvalidParameter(_)));
    }

    #[test]
    fn test_pin_outside_horizon() {
        let catalog = catalog(vec![Ability::basic("Slice", 60, 1, 0)]);
        let resource = ResourceModel::default();
        let pins = [Pin::new(5, "Slice")];
        let err = ConstraintEncoder::new(&catalog, &resource, Timeline::from_ticks(3).unwrap(), 0)
            .with_pins(&pins)
            .encode()
            .unwrap_err();
        assert!(matches!(err, RotaforgeError::InvalidParameter(_)));
    }

    #[test]
    fn test_pin_unknown_ability() {
        let catalog = catalog(vec![Ability::basic("Slice", 60, 1, 0)]);
        let resource = ResourceModel::default();
        let pins = [Pin::new(0, "Smash")];
        let err = ConstraintEncoder::new(&catalog, &resource, Timeline::from_ticks(3).unwrap(), 0)
            .with_pins(&pins)
            .encode()
            .unwrap_err();
        assert!(matches!(err, RotaforgeError::InvalidParameter(_)));
    }

    #[test]
    fn test_pin_is_first_constraint() {
        let catalog = catalog(vec![Ability::threshold("Smash", 100, 1, 0)]);
        let resource = ResourceModel::default();
        let pins = [Pin::new(0, "Smash")];
        let encoded =
            ConstraintEncoder::new(&catalog, &resource, Timeline::from_ticks(2).unwrap(), 40)
                .with_pins(&pins)
                .encode()
                .unwrap();
        assert_eq!(
            encoded.model().constraint_label(0),
            "t0 Smash: pinned start"
        );
    }

    #[test]
    fn test_handles_cover_every_tick() {
        let catalog = catalog(vec![
            Ability::basic("Slice", 60, 1, 0),
            Ability::threshold("Smash", 100, 2, 3),
            Ability::ultimate("Overpower", 300, 2, 10),
        ]);
        let resource = ResourceModel::default();
        let encoded =
            ConstraintEncoder::new(&catalog, &resource, Timeline::from_ticks(4).unwrap(), 0)
                .encode()
                .unwrap();

        assert_eq!(encoded.ticks(), 4);
        assert_eq!(encoded.starts_at(2).len(), 3);
        assert!(encoded.model().validate().is_ok());

        let total = encoded.model().variable(encoded.total_damage()).unwrap();
        // 4 ticks * 300 damage * 2x buff
        assert_eq!(total.hi(), 2400);

        let m = encoded.model().variable(encoded.multiplier(0)).unwrap();
        assert_eq!((m.lo(), m.hi()), (1, 2));
    }

    #[test]
    fn test_no_buff_fixes_multiplier() {
        let catalog = catalog(vec![Ability::ultimate("Overpower", 300, 1, 0)]);
        let resource = ResourceModel::new(
            BasicRule::default(),
            ThresholdRule::default(),
            UltimateRule {
                buff: None,
                ..UltimateRule::default()
            },
        )
        .unwrap();
        let encoded =
            ConstraintEncoder::new(&catalog, &resource, Timeline::from_ticks(3).unwrap(), 100)
                .encode()
                .unwrap();

        let m = encoded.model().variable(encoded.multiplier(1)).unwrap();
        assert_eq!((m.lo(), m.hi()), (1, 1));
    }

    #[test]
    fn test_decision_order_prefers_damage() {
        let catalog = catalog(vec![
            Ability::basic("Weak", 10, 1, 0),
            Ability::basic("Strong", 90, 1, 0),
        ]);
        let resource = ResourceModel::default();
        let encoded =
            ConstraintEncoder::new(&catalog, &resource, Timeline::from_ticks(2).unwrap(), 0)
                .encode()
                .unwrap();

        let order = encoded.model().decision_order();
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], encoded.start(0, 1));
        assert_eq!(order[1], encoded.start(0, 0));
        assert_eq!(order[2], encoded.start(1, 1));
    }
}
