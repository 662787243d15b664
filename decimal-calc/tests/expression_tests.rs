use common::decimal::Rounding;
use common::Error;
use decimal_calc::{evaluate_tokens, parse_expression, rescale_literal, CalcConfig, Evaluation};

fn config(precision: u32) -> CalcConfig {
    CalcConfig::new(precision, Rounding::TowardZero, false)
}

fn eval(tokens: &[&str], precision: u32) -> String {
    evaluate_tokens(tokens, &config(precision)).unwrap().to_decimal_string()
}

#[test]
fn test_single_value() {
    assert_eq!(eval(&["42.5"], 6), "42.5");
}

#[test]
fn test_left_to_right_chain() {
    assert_eq!(eval(&["100", "add", "50", "mul", "2"], 6), "300");
    assert_eq!(eval(&["100", "+", "50", "x", "2"], 6), "300");
}

#[test]
fn test_division_truncates_at_precision() {
    assert_eq!(eval(&["100", "div", "3"], 6), "33.333333");
    assert_eq!(eval(&["100", "/", "3"], 2), "33.33");
}

#[test]
fn test_operators_after_div_extend_denominator() {
    // 100 / (10 + 5)
    assert_eq!(eval(&["100", "div", "10", "add", "5"], 4), "6.6666");
}

#[test]
fn test_mixed_precisions() {
    assert_eq!(eval(&["45.67", "add", "1.2345"], 4), "46.9045");
    assert_eq!(eval(&["1@18", "mul", "45000@18"], 15), "45000");
}

#[test]
fn test_negative_values_and_subtraction() {
    assert_eq!(eval(&["50", "sub", "100"], 6), "-50");
    assert_eq!(eval(&["-50", "-", "-100"], 6), "50");
}

#[test]
fn test_rounding_from_config() {
    let rounded = CalcConfig::new(6, Rounding::HalfAwayFromZero, false);
    let value = evaluate_tokens(&["2", "div", "3"], &rounded).unwrap();
    assert_eq!(value.to_decimal_string(), "0.666667");
}

#[test]
fn test_second_division_fails() {
    let err = parse_expression(&["1", "div", "2", "div", "3"]).unwrap_err();
    assert!(matches!(err, Error::ConsecutiveDenominator));
}

#[test]
fn test_malformed_expressions() {
    let empty: [&str; 0] = [];
    assert!(matches!(parse_expression(&empty), Err(Error::InvalidExpression(_))));
    assert!(matches!(parse_expression(&["1", "add"]), Err(Error::InvalidExpression(_))));
    assert!(matches!(parse_expression(&["1", "2"]), Err(Error::InvalidExpression(_))));

    let err = parse_expression(&["1", "add", "abc"]).unwrap_err();
    assert_eq!(err.to_string(), "Invalid decimal: argument 3: abc");
}

#[test]
fn test_division_by_zero() {
    let result = evaluate_tokens(&["1", "div", "5", "sub", "5"], &config(6));
    assert!(matches!(result, Err(Error::DivisionByZero)));
}

#[test]
fn test_rescale_literal() {
    let value = rescale_literal("12.345", &config(2)).unwrap();
    assert_eq!(value.to_decimal_string(), "12.34");

    let value = rescale_literal("12.345", &CalcConfig::new(2, Rounding::HalfEven, false)).unwrap();
    assert_eq!(value.to_decimal_string(), "12.34");

    let value = rescale_literal("12.345", &CalcConfig::new(2, Rounding::HalfAwayFromZero, false)).unwrap();
    assert_eq!(value.to_decimal_string(), "12.35");

    let value = rescale_literal("1.5", &config(4)).unwrap();
    assert_eq!(value.magnitude().to_string(), "15000");
}

#[test]
fn test_evaluation_json_shape() {
    let value = evaluate_tokens(&["10", "div", "4"], &config(3)).unwrap();
    let json = serde_json::to_value(Evaluation::from(&value)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "magnitude": "2500", "precision": 3, "decimal": "2.5" })
    );
}

#[test]
fn test_config_overrides() {
    let base = config(6);
    let merged = base.clone().with_overrides(Some(18), None, true);
    assert_eq!(merged.precision, 18);
    assert_eq!(merged.rounding, Rounding::TowardZero);
    assert!(merged.json_output);

    assert_eq!(base.clone().with_overrides(None, None, false), base);
}
