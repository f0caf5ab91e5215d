use super::*;

#[test]
fn test_literal_negation() {
    let mut model = Model::new();
    let b = model.new_bool_var("b");
    let lit = Literal::from(b);

    assert!(lit.holds(1));
    assert!(!lit.holds(0));
    assert!((!lit).holds(0));
    assert!((!lit).is_negated());
    assert_eq!(!!lit, lit);
}

#[test]
fn test_expression_normalization() {
    let mut model = Model::new();
    let a = model.new_bool_var("a");
    let b = model.new_bool_var("b");

    let expr = LinearExpr::new()
        .term(b, 2)
        .term(a, 1)
        .term(b, -2)
        .term(a, 3)
        .plus(4);
    model.add_le(expr, 10);

    let c = &model.constraints()[0];
    assert_eq!(c.terms(), &[(a, 4)]);
    assert_eq!(c.rhs(), 6);
    assert_eq!(c.relation(), Relation::Le);
}

#[test]
fn test_enforced_constraint_satisfaction() {
    let mut model = Model::new();
    let on = model.new_bool_var("on");
    let level = model.new_int_var(0, 100, "level");
    model
        .add_ge(level, 50)
        .only_enforce_if([Literal::from(on)])
        .named("min level");

    let c = &model.constraints()[0];
    assert_eq!(c.name(), Some("min level"));

    // Inactive: anything goes.
    assert!(c.is_satisfied(&Assignment::from_values(vec![0, 10])));
    // Active.
    assert!(!c.is_satisfied(&Assignment::from_values(vec![1, 10])));
    assert!(c.is_satisfied(&Assignment::from_values(vec![1, 50])));
}

#[test]
fn test_check_reports_first_violation() {
    let mut model = Model::new();
    let a = model.new_bool_var("a");
    let b = model.new_bool_var("b");
    model.add_le(LinearExpr::sum([a, b]), 1).named("exclusive");

    assert!(model.check(&Assignment::from_values(vec![1, 0])).is_ok());
    assert_eq!(
        model.check(&Assignment::from_values(vec![1, 1])),
        Err(Violation::Constraint {
            constraint: "exclusive".to_string()
        })
    );
    assert!(matches!(
        model.check(&Assignment::from_values(vec![2, 0])),
        Err(Violation::OutOfDomain { .. })
    ));
    assert!(matches!(
        model.check(&Assignment::from_values(vec![1])),
        Err(Violation::Length {
            expected: 2,
            actual: 1
        })
    ));
}

#[test]
fn test_unnamed_constraint_label() {
    let mut model = Model::new();
    let a = model.new_bool_var("a");
    model.add_eq(a, 1);
    assert_eq!(model.constraint_label(0), "constraint #0");
}

#[test]
fn test_validate_empty_domain() {
    let mut model = Model::new();
    model.new_int_var(5, 4, "broken");
    assert!(matches!(
        model.validate(),
        Err(ModelError::EmptyDomain { lo: 5, hi: 4, .. })
    ));
}

#[test]
fn test_validate_non_boolean_literal() {
    let mut model = Model::new();
    let level = model.new_int_var(0, 100, "level");
    let other = model.new_int_var(0, 100, "other");
    model
        .add_le(other, 10)
        .only_enforce_if([Literal::from(level)]);
    assert!(matches!(
        model.validate(),
        Err(ModelError::NonBooleanLiteral { .. })
    ));
}

#[test]
fn test_validate_unknown_variable() {
    let mut foreign = Model::new();
    foreign.new_bool_var("a");
    let stray = foreign.new_bool_var("b");

    let mut model = Model::new();
    model.new_bool_var("a");
    model.add_le(stray, 0);
    assert!(matches!(
        model.validate(),
        Err(ModelError::UnknownVariable { var: 1, .. })
    ));
}

#[test]
fn test_objective_value() {
    let mut model = Model::new();
    let a = model.new_bool_var("a");
    let b = model.new_bool_var("b");
    model.maximize(LinearExpr::weighted_sum([(a, 3), (b, 2)]).plus(1));

    let value = model.objective_value(&Assignment::from_values(vec![1, 1]));
    assert_eq!(value, Some(6));

    let objective = model.objective().unwrap();
    assert!(objective.improves(7, 6));
    assert!(!objective.improves(6, 6));
}
