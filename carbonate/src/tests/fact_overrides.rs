use crate::catalog::Catalog;
use crate::{automobile, CarbonateError, Entity, FactStore, Value};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn parse(facts: &[&str]) -> Result<FactStore, CarbonateError> {
    let registry = automobile::registry().unwrap();
    let catalog = Catalog::bundled().unwrap();
    FactStore::parse(facts, &registry, &catalog)
}

#[test]
fn test_parse_number_fact() {
    let facts = parse(&["daily_distance=40"]).unwrap();
    assert_eq!(
        facts.get("daily_distance"),
        Some(&Value::Number(Decimal::from(40)))
    );
}

#[test]
fn test_parse_date_and_boolean_facts() {
    let facts = parse(&["acquisition=2009-06-01", "hybridity=true"]).unwrap();
    assert_eq!(
        facts.get("acquisition"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2009, 6, 1).unwrap()))
    );
    assert_eq!(facts.get("hybridity"), Some(&Value::Boolean(true)));
}

#[test]
fn test_parse_entity_facts_case_insensitively() {
    let facts = parse(&["make=toyota", "make_model_year=TOYOTA/prius/2010"]).unwrap();

    match facts.get("make") {
        Some(Value::Entity(Entity::Make(make))) => assert_eq!(make.name, "Toyota"),
        other => panic!("Expected a make, got {:?}", other),
    }
    match facts.get("make_model_year") {
        Some(Value::Entity(Entity::MakeModelYear(mmy))) => {
            assert_eq!(mmy.model, "Prius");
            assert_eq!(mmy.year, 2010);
        }
        other => panic!("Expected a make model year, got {:?}", other),
    }
}

#[test]
fn test_unknown_entity_is_invalid() {
    let err = parse(&["make=Trabant"]).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Invalid fact 'make': no make matches 'Trabant'");
}

#[test]
fn test_undeclared_fact_rejected() {
    let err = parse(&["colour=red"]).unwrap_err();
    assert_eq!(
        err,
        CarbonateError::invalid_fact("colour", "not a declared input")
    );
}

#[test]
fn test_missing_equals_sign() {
    let err = parse(&["daily_distance"]).unwrap_err();
    assert!(matches!(err, CarbonateError::InvalidFact { .. }));
}

#[test]
fn test_parse_errors_are_collected() {
    let err = parse(&["year=soon", "urbanity=high"]).unwrap_err();
    match err {
        CarbonateError::MultipleErrors(errors) => assert_eq!(errors.len(), 2),
        other => panic!("Expected MultipleErrors, got {:?}", other),
    }
}

#[test]
fn test_later_fact_replaces_earlier() {
    let facts = parse(&["urbanity=0.2", "urbanity=0.8"]).unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(
        facts.get("urbanity"),
        Some(&Value::Number(Decimal::new(8, 1)))
    );
}
