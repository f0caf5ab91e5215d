//! Resource State Model: how the bounded meter moves from tick to tick.
//!
//! The meter level after tick `t` depends only on the level after `t-1` and
//! on which category of ability (if any) starts at `t`. The constraint
//! encoder emits these rules as conditional linear constraints and the
//! solution decoder replays them with [`ResourceModel::step`], so both sides
//! share one derivation.

mod rule;


use crate::ability::Category;
use crate::error::{Result, RotaforgeError};

pub use rule::{
    BasicRule, BuffWindow, ResourceRule, ThresholdRule, TransitionError, UltimateRequirement,
    UltimateRule,
};

/// Lowest meter level.
pub const METER_MIN: i64 = 0;

/// Highest meter level.
pub const METER_MAX: i64 = 100;

/// Largest damage multiplier a buff window may apply.
pub const MAX_BUFF_MULTIPLIER: i64 = 3;

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Meter level after the tick resolves.
    pub level: i64,
    /// Buff window opened on this tick, if any.
    pub buff: Option<BuffWindow>,
}

/// The complete set of meter rules, one per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceModel {
    basic: BasicRule,
    threshold: ThresholdRule,
    ultimate: UltimateRule,
}

impl Default for ResourceModel {
    fn default() -> Self {
        Self {
            basic: BasicRule::default(),
            threshold: ThresholdRule::default(),
            ultimate: UltimateRule::default(),
        }
    }
}

impl ResourceModel {
    /// Creates a model, validating every level against the meter range.
    pub fn new(basic: BasicRule, threshold: ThresholdRule, ultimate: UltimateRule) -> Result<Self> {
        check_level("basic cap threshold", basic.cap_threshold)?;
        check_amount("basic gain", basic.gain)?;
        check_level("threshold minimum level", threshold.min_level)?;
        check_amount("threshold cost", threshold.cost)?;
        check_level("ultimate required level", ultimate.requirement.level())?;
        check_level("ultimate reset level", ultimate.reset_to)?;
        if let Some(buff) = ultimate.buff {
            if buff.ticks == 0 {
                return Err(RotaforgeError::InvalidParameter(
                    "buff window must last at least one tick".to_string(),
                ));
            }
            if !(2..=MAX_BUFF_MULTIPLIER).contains(&buff.multiplier) {
                return Err(RotaforgeError::InvalidParameter(format!(
                    "buff multiplier must be between 2 and {} (got {})",
                    MAX_BUFF_MULTIPLIER, buff.multiplier
                )));
            }
        }
        Ok(Self {
            basic,
            threshold,
            ultimate,
        })
    }

    #[inline]
    pub fn basic(&self) -> &BasicRule {
        &self.basic
    }

    #[inline]
    pub fn threshold(&self) -> &ThresholdRule {
        &self.threshold
    }

    #[inline]
    pub fn ultimate(&self) -> &UltimateRule {
        &self.ultimate
    }

    /// Returns the rule that applies when an ability of `category` starts.
    pub fn rule(&self, category: Category) -> ResourceRule {
        match category {
            Category::Basic => ResourceRule::Basic(self.basic),
            Category::Threshold => ResourceRule::Threshold(self.threshold),
            Category::Ultimate => ResourceRule::Ultimate(self.ultimate),
        }
    }

    /// Resolves one tick. `started` is the category of the ability that
    /// starts on the tick, or `None` when the tick is idle or busy.
    pub fn step(
        &self,
        previous: i64,
        started: Option<Category>,
    ) -> std::result::Result<Transition, TransitionError> {
        if !(METER_MIN..=METER_MAX).contains(&previous) {
            return Err(TransitionError::OutOfRange { level: previous });
        }
        match started {
            None => Ok(Transition {
                level: previous,
                buff: None,
            }),
            Some(category) => self.rule(category).apply(previous),
        }
    }

    /// Largest damage multiplier any tick can carry.
    pub fn max_multiplier(&self) -> i64 {
        self.ultimate.buff.map_or(1, |b| b.multiplier)
    }

    /// Validates a caller-supplied starting level.
    pub fn check_start_level(level: i64) -> Result<i64> {
        if (METER_MIN..=METER_MAX).contains(&level) {
            Ok(level)
        } else {
            Err(RotaforgeError::InvalidParameter(format!(
                "start resource must be an integer in [{}, {}] (got {})",
                METER_MIN, METER_MAX, level
            )))
        }
    }
}

fn check_level(what: &str, level: i64) -> Result<()> {
    if (METER_MIN..=METER_MAX).contains(&level) {
        Ok(())
    } else {
        Err(RotaforgeError::InvalidParameter(format!(
            "{} must be in [{}, {}] (got {})",
            what, METER_MIN, METER_MAX, level
        )))
    }
}

fn check_amount(what: &str, amount: i64) -> Result<()> {
    if (0..=METER_MAX).contains(&amount) {
        Ok(())
    } else {
        Err(RotaforgeError::InvalidParameter(format!(
            "{} must be in [0, {}] (got {})",
            what, METER_MAX, amount
        )))
    }
}
