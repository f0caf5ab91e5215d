//! Resource meter rule configuration.

use rotaforge_core::{
    BasicRule, BuffWindow, ResourceModel, ThresholdRule, UltimateRequirement, UltimateRule,
};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Resource meter rules, one table per ability category.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ResourceConfig {
    #[serde(default)]
    pub basic: BasicConfig,

    #[serde(default)]
    pub threshold: ThresholdConfig,

    #[serde(default)]
    pub ultimate: UltimateConfig,
}

impl ResourceConfig {
    /// Builds the validated resource model.
    pub fn to_model(&self) -> Result<ResourceModel, ConfigError> {
        let basic = BasicRule {
            cap_threshold: self.basic.cap_threshold,
            gain: self.basic.gain,
        };
        let threshold = ThresholdRule {
            min_level: self.threshold.min_level,
            cost: self.threshold.cost,
        };
        let requirement = match self.ultimate.requirement {
            RequirementKind::Exactly => UltimateRequirement::Exactly(self.ultimate.level),
            RequirementKind::AtLeast => UltimateRequirement::AtLeast(self.ultimate.level),
        };
        let buff = self
            .ultimate
            .buff
            .as_ref()
            .filter(|b| b.enabled)
            .map(|b| BuffWindow {
                ticks: b.window,
                multiplier: b.multiplier,
            });
        let ultimate = UltimateRule {
            requirement,
            reset_to: self.ultimate.reset_to,
            buff,
        };
        ResourceModel::new(basic, threshold, ultimate)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Whether the catalog must contain an Ultimate to drive the buff window.
    pub fn buff_required(&self) -> bool {
        self.ultimate
            .buff
            .as_ref()
            .is_some_and(|b| b.enabled && b.required)
    }
}

/// Basic ability rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BasicConfig {
    /// Previous level at which the meter saturates.
    #[serde(default = "default_cap_threshold")]
    pub cap_threshold: i64,

    /// Gain per Basic ability below the cap.
    #[serde(default = "default_gain")]
    pub gain: i64,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            cap_threshold: default_cap_threshold(),
            gain: default_gain(),
        }
    }
}

/// Threshold ability rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ThresholdConfig {
    /// Minimum previous level to start a Threshold ability.
    #[serde(default = "default_min_level")]
    pub min_level: i64,

    /// Resource spent per Threshold ability.
    #[serde(default = "default_cost")]
    pub cost: i64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_level: default_min_level(),
            cost: default_cost(),
        }
    }
}

/// How the Ultimate level requirement is compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    /// The previous level must equal `level`.
    #[default]
    Exactly,

    /// The previous level must be at least `level`.
    AtLeast,
}

/// Ultimate ability rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UltimateConfig {
    #[serde(default)]
    pub requirement: RequirementKind,

    #[serde(default = "default_ultimate_level")]
    pub level: i64,

    /// Level the meter resets to after an Ultimate.
    #[serde(default = "default_reset_to")]
    pub reset_to: i64,

    #[serde(default = "default_buff")]
    pub buff: Option<BuffConfig>,
}

impl Default for UltimateConfig {
    fn default() -> Self {
        Self {
            requirement: RequirementKind::default(),
            level: default_ultimate_level(),
            reset_to: default_reset_to(),
            buff: default_buff(),
        }
    }
}

/// Damage buff opened by an Ultimate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BuffConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Ticks covered, starting on the activation tick.
    #[serde(default = "default_window")]
    pub window: u32,

    #[serde(default = "default_multiplier")]
    pub multiplier: i64,

    /// Reject catalogs without an Ultimate.
    #[serde(default)]
    pub required: bool,
}

impl Default for BuffConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: default_window(),
            multiplier: default_multiplier(),
            required: false,
        }
    }
}

fn default_cap_threshold() -> i64 {
    91
}

fn default_gain() -> i64 {
    9
}

fn default_min_level() -> i64 {
    50
}

fn default_cost() -> i64 {
    15
}

fn default_ultimate_level() -> i64 {
    100
}

fn default_reset_to() -> i64 {
    10
}

fn default_buff() -> Option<BuffConfig> {
    Some(BuffConfig::default())
}

fn default_true() -> bool {
    true
}

fn default_window() -> u32 {
    20
}

fn default_multiplier() -> i64 {
    2
}
