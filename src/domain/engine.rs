//! Calculator engine orchestrating validation, evaluation and output
//! formatting.
//!
//! This is the single entry point the application layer talks to. A raw
//! expression string goes in; a formatted decimal string or the first
//! failure encountered comes out. The engine performs no recovery of
//! its own and holds no angle state beyond what it forwards to the
//! evaluator.

use super::evaluator::SafeEvaluator;
use super::models::{AngleMode, CalculationResult};
use super::validator::InputValidator;

/// Validate -> evaluate -> format pipeline.
///
/// # Examples
///
/// ```
/// use scicalc::domain::CalculatorEngine;
///
/// let engine = CalculatorEngine::new();
///
/// let result = engine.calculate("0.1+0.2");
/// assert_eq!(result.result.unwrap(), "0.3");
///
/// let result = engine.calculate("5/0");
/// assert!(!result.success);
/// ```
pub struct CalculatorEngine {
    validator: InputValidator,
    evaluator: SafeEvaluator,
}

impl CalculatorEngine {
    pub fn new() -> Self {
        Self {
            validator: InputValidator::new(),
            evaluator: SafeEvaluator::new(),
        }
    }

    /// Sets the angle mode for trigonometric functions. Forwards to the
    /// evaluator; persists until changed again.
    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        self.evaluator.set_angle_mode(mode);
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.evaluator.angle_mode()
    }

    /// Calculates an expression end to end.
    ///
    /// Validation failures preempt evaluation; either failure is passed
    /// through unchanged. Successful values are normalized (trailing
    /// zeros stripped) and rendered without scientific notation.
    pub fn calculate(&self, expression: &str) -> CalculationResult {
        let validation = self.validator.validate(expression);
        if let Some(error) = validation.error {
            return CalculationResult::failure(error);
        }

        match self.evaluator.evaluate(expression) {
            Ok(value) => CalculationResult::success(value.normalize().to_string()),
            Err(error) => CalculationResult::failure(error),
        }
    }
}

impl Default for CalculatorEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::CalcError;

    fn result_of(expression: &str) -> String {
        let engine = CalculatorEngine::new();
        let result = engine.calculate(expression);
        assert!(result.success, "expected success for: {}", expression);
        result.result.unwrap()
    }

    #[test]
    fn test_basic_pipeline() {
        assert_eq!(result_of("2+3"), "5");
        assert_eq!(result_of("10-4"), "6");
        assert_eq!(result_of("3*7"), "21");
        assert_eq!(result_of("8/2"), "4");
    }

    #[test]
    fn test_decimal_exactness() {
        assert_eq!(result_of("0.1+0.2"), "0.3");
        assert_eq!(result_of("0.1+0.1+0.1"), "0.3");
        assert_eq!(result_of("1.0+2.0"), "3");
        assert_eq!(result_of("1/2"), "0.5");
    }

    #[test]
    fn test_high_precision_round_trip() {
        assert_eq!(result_of("1/3*3"), "1");
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(result_of("(2+3)*4"), "20");
        assert_eq!(result_of("((1+2)*(3+4))"), "21");
        assert_eq!(result_of("(2+3)*(4-1)"), "15");
    }

    #[test]
    fn test_complex_expression() {
        assert_eq!(result_of("(2+3)*4-8/2+1"), "17");
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(result_of("-5+3"), "-2");
        assert_eq!(result_of("(-5)+3"), "-2");
    }

    #[test]
    fn test_no_scientific_notation_for_large_results() {
        assert_eq!(result_of("999999*2"), "1999998");
        assert_eq!(result_of("2^10"), "1024");

        let huge = result_of("2^200");
        assert!(!huge.contains('e') && !huge.contains('E'));
        assert_eq!(huge.len(), 61);
    }

    #[test]
    fn test_empty_expression_error() {
        let engine = CalculatorEngine::new();
        let result = engine.calculate("");
        assert!(!result.success);
        assert!(result.result.is_none());
        assert_eq!(result.error.unwrap(), CalcError::EmptyExpression.to_string());
    }

    #[test]
    fn test_division_by_zero_error() {
        let engine = CalculatorEngine::new();
        let result = engine.calculate("5/0");
        assert!(!result.success);
        assert_eq!(result.error.unwrap(), CalcError::DivisionByZero.to_string());
    }

    #[test]
    fn test_validation_preempts_evaluation() {
        let engine = CalculatorEngine::new();

        // Unbalanced parens would also choke the parser; the reported
        // error must be the validator's, position included.
        let result = engine.calculate("(2+3");
        assert_eq!(
            result.error.unwrap(),
            CalcError::MissingClosingParenthesis(0).to_string()
        );

        let result = engine.calculate("2+3)");
        assert_eq!(
            result.error.unwrap(),
            CalcError::MissingOpeningParenthesis(3).to_string()
        );

        assert!(!engine.calculate("2++3").success);
        assert!(!engine.calculate("2+3+").success);
    }

    #[test]
    fn test_factorial_limit_error() {
        let engine = CalculatorEngine::new();
        let result = engine.calculate("factorial(171)");
        assert!(!result.success);
        assert_eq!(
            result.error.unwrap(),
            CalcError::FactorialTooLarge.to_string()
        );
    }

    #[test]
    fn test_angle_mode_forwarding() {
        let mut engine = CalculatorEngine::new();
        assert_eq!(engine.angle_mode(), AngleMode::Degrees);

        let degrees: f64 = result_of("sin(90)").parse().unwrap();
        assert!((degrees - 1.0).abs() < 1e-4);

        engine.set_angle_mode(AngleMode::Radians);
        let radians: f64 = engine
            .calculate("sin(90)")
            .result
            .unwrap()
            .parse()
            .unwrap();
        assert!((radians - degrees).abs() > 0.01);
    }

    #[test]
    fn test_accepted_expressions_never_crash_the_evaluator() {
        // Everything validation accepts must come back as a result or a
        // classified error, never a panic.
        let engine = CalculatorEngine::new();
        for expr in [
            "2^-3", "2--3", "sqrt(-1)", "log(0)", "unknown(1)", "pi*e",
            "1e3*2", "2^3^2", "0^0", "tan(90)", "factorial(0)",
        ] {
            let validation = InputValidator::new().validate(expr);
            assert!(validation.valid, "validator should accept: {}", expr);
            let result = engine.calculate(expr);
            assert!(result.success || result.error.is_some());
        }
    }
}
