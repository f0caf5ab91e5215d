//! Per-category meter rules.

use std::fmt;

use super::{Transition, METER_MAX, METER_MIN};

/// Basic abilities build the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicRule {
    /// At or above this level the meter saturates to the maximum.
    pub cap_threshold: i64,
    /// Gain below the cap.
    pub gain: i64,
}

impl Default for BasicRule {
    fn default() -> Self {
        Self {
            cap_threshold: 91,
            gain: 9,
        }
    }
}

impl BasicRule {
    /// Lowest previous level that ends at the maximum.
    ///
    /// Covers both the explicit cap and the clamp at the meter maximum:
    /// any level from which `level + gain` would overflow also saturates.
    pub fn saturation_level(&self) -> i64 {
        self.cap_threshold.min(METER_MAX + 1 - self.gain)
    }

    pub fn apply(&self, previous: i64) -> i64 {
        if previous >= self.saturation_level() {
            METER_MAX
        } else {
            previous + self.gain
        }
    }
}

/// Threshold abilities spend the meter and need a minimum level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdRule {
    pub min_level: i64,
    pub cost: i64,
}

impl Default for ThresholdRule {
    fn default() -> Self {
        Self {
            min_level: 50,
            cost: 15,
        }
    }
}

/// Precondition an Ultimate places on the level before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UltimateRequirement {
    Exactly(i64),
    AtLeast(i64),
}

impl Default for UltimateRequirement {
    fn default() -> Self {
        UltimateRequirement::Exactly(METER_MAX)
    }
}

impl UltimateRequirement {
    pub fn level(&self) -> i64 {
        match *self {
            UltimateRequirement::Exactly(level) | UltimateRequirement::AtLeast(level) => level,
        }
    }

    pub fn is_met(&self, previous: i64) -> bool {
        match *self {
            UltimateRequirement::Exactly(level) => previous == level,
            UltimateRequirement::AtLeast(level) => previous >= level,
        }
    }
}

impl fmt::Display for UltimateRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UltimateRequirement::Exactly(level) => write!(f, "== {}", level),
            UltimateRequirement::AtLeast(level) => write!(f, ">= {}", level),
        }
    }
}

/// Damage buff opened by an Ultimate.
///
/// Covers the activation tick and the following `ticks - 1` ticks.
/// Re-activating inside an open window refreshes it; windows never stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuffWindow {
    pub ticks: u32,
    pub multiplier: i64,
}

impl Default for BuffWindow {
    fn default() -> Self {
        Self {
            ticks: 20,
            multiplier: 2,
        }
    }
}

/// Ultimate abilities reset the meter and may open a buff window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UltimateRule {
    pub requirement: UltimateRequirement,
    pub reset_to: i64,
    pub buff: Option<BuffWindow>,
}

impl Default for UltimateRule {
    fn default() -> Self {
        Self {
            requirement: UltimateRequirement::default(),
            reset_to: 10,
            buff: Some(BuffWindow::default()),
        }
    }
}

/// The rule selected by an ability's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRule {
    Basic(BasicRule),
    Threshold(ThresholdRule),
    Ultimate(UltimateRule),
}

impl ResourceRule {
    /// Applies the rule to the level before the tick.
    pub fn apply(&self, previous: i64) -> Result<Transition, TransitionError> {
        let transition = match *self {
            ResourceRule::Basic(rule) => Transition {
                level: rule.apply(previous),
                buff: None,
            },
            ResourceRule::Threshold(rule) => {
                if previous < rule.min_level {
                    return Err(TransitionError::BelowThreshold {
                        min_level: rule.min_level,
                        level: previous,
                    });
                }
                Transition {
                    level: previous - rule.cost,
                    buff: None,
                }
            }
            ResourceRule::Ultimate(rule) => {
                if !rule.requirement.is_met(previous) {
                    return Err(TransitionError::UltimateNotReady {
                        requirement: rule.requirement,
                        level: previous,
                    });
                }
                Transition {
                    level: rule.reset_to,
                    buff: rule.buff,
                }
            }
        };
        if !(METER_MIN..=METER_MAX).contains(&transition.level) {
            return Err(TransitionError::OutOfRange {
                level: transition.level,
            });
        }
        Ok(transition)
    }
}

/// Why a tick's transition is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    BelowThreshold { min_level: i64, level: i64 },
    UltimateNotReady {
        requirement: UltimateRequirement,
        level: i64,
    },
    OutOfRange { level: i64 },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::BelowThreshold { min_level, level } => {
                write!(f, "needs at least {} resource, had {}", min_level, level)
            }
            TransitionError::UltimateNotReady { requirement, level } => {
                write!(f, "needs resource {}, had {}", requirement, level)
            }
            TransitionError::OutOfRange { level } => {
                write!(
                    f,
                    "resource {} leaves [{}, {}]",
                    level, METER_MIN, METER_MAX
                )
            }
        }
    }
}

impl std::error::Error for TransitionError {}
