//! Tests for termination conditions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::scope::SearchScope;

#[test]
fn test_node_count_termination() {
    let mut scope = SearchScope::new();
    let term = NodeCountTermination::new(3);

    assert!(!term.is_terminated(&scope));
    scope.stats_mut().record_node();
    scope.stats_mut().record_node();
    assert!(!term.is_terminated(&scope));
    scope.stats_mut().record_node();
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_time_termination_zero_limit() {
    let scope = SearchScope::new();
    assert!(TimeTermination::new(Duration::ZERO).is_terminated(&scope));
    assert!(!TimeTermination::seconds(3600).is_terminated(&scope));
}

#[test]
fn test_external_termination() {
    let scope = SearchScope::new();
    let flag = Arc::new(AtomicBool::new(false));
    let term = ExternalTermination::new(flag.clone());

    assert!(!term.is_terminated(&scope));
    flag.store(true, Ordering::SeqCst);
    assert!(term.is_terminated(&scope));
    assert_eq!(term.stop_kind(), StopKind::External);
}

#[test]
fn test_or_termination_reports_first_kind() {
    let mut scope = SearchScope::new();
    let flag = Arc::new(AtomicBool::new(false));
    let term = OrTermination::new()
        .with(NodeCountTermination::new(1))
        .with(ExternalTermination::new(flag.clone()));

    assert_eq!(term.len(), 2);
    assert_eq!(term.check(&scope), None);

    flag.store(true, Ordering::SeqCst);
    assert_eq!(term.check(&scope), Some(StopKind::External));

    flag.store(false, Ordering::SeqCst);
    scope.stats_mut().record_node();
    assert_eq!(term.check(&scope), Some(StopKind::Budget));
}
