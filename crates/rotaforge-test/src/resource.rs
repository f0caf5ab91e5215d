//! Resource model fixtures.

use rotaforge_core::{
    BasicRule, BuffWindow, ResourceModel, ThresholdRule, UltimateRequirement, UltimateRule,
};

fn build(ultimate: UltimateRule) -> ResourceModel {
    match ResourceModel::new(BasicRule::default(), ThresholdRule::default(), ultimate) {
        Ok(model) => model,
        Err(err) => panic!("invalid fixture resource model: {err}"),
    }
}

/// Default rules with an Ultimate that needs exactly `level`.
pub fn ultimate_exactly(level: i64) -> ResourceModel {
    build(UltimateRule {
        requirement: UltimateRequirement::Exactly(level),
        ..UltimateRule::default()
    })
}

/// Default rules without a buff window.
pub fn no_buff() -> ResourceModel {
    build(UltimateRule {
        buff: None,
        ..UltimateRule::default()
    })
}

/// Default rules with a double-damage buff lasting `ticks`.
pub fn short_buff(ticks: u32) -> ResourceModel {
    build(UltimateRule {
        buff: Some(BuffWindow {
            ticks,
            multiplier: 2,
        }),
        ..UltimateRule::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_buff_keeps_multiplier_at_one() {
        assert_eq!(no_buff().max_multiplier(), 1);
    }

    #[test]
    fn test_short_buff() {
        let model = short_buff(2);
        assert_eq!(model.ultimate().buff.map(|b| b.ticks), Some(2));
        assert_eq!(model.max_multiplier(), 2);
    }

    #[test]
    fn test_ultimate_exactly() {
        let model = ultimate_exactly(90);
        assert_eq!(model.ultimate().requirement, UltimateRequirement::Exactly(90));
    }
}
