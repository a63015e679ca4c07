//! Structural pre-check of raw expression strings.
//!
//! The validator runs before any parsing: it checks parenthesis balance
//! with position tracking, the accepted character set, and operator
//! placement. It never evaluates anything; expressions that pass here
//! can still fail in the evaluator (unknown names, domain errors).

use super::errors::CalcError;
use super::models::ValidationResult;

/// Operators participating in the trailing/consecutive checks. `^` and
/// `%` are excluded on purpose; misuse of those surfaces in the parser.
const ADJACENCY_OPERATORS: [char; 4] = ['+', '-', '*', '/'];

pub struct InputValidator;

impl InputValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates an expression, short-circuiting on the first failure.
    ///
    /// Reported positions are 0-based indices into the trimmed
    /// expression (for parenthesis errors) or into the
    /// whitespace-stripped expression (for operator placement errors).
    pub fn validate(&self, expression: &str) -> ValidationResult {
        let expr = expression.trim();

        if expr.is_empty() {
            return ValidationResult::fail(CalcError::EmptyExpression, None);
        }

        let parens = self.validate_parentheses(expr);
        if !parens.valid {
            return parens;
        }

        self.validate_syntax(expr)
    }

    /// Stack-based parenthesis matching with position tracking.
    fn validate_parentheses(&self, expression: &str) -> ValidationResult {
        let mut stack: Vec<usize> = Vec::new();

        for (i, ch) in expression.chars().enumerate() {
            match ch {
                '(' => stack.push(i),
                ')' => {
                    if stack.pop().is_none() {
                        return ValidationResult::fail(
                            CalcError::MissingOpeningParenthesis(i),
                            Some(i),
                        );
                    }
                }
                _ => {}
            }
        }

        // Report the most recently opened unmatched parenthesis, not
        // the outermost one.
        if let Some(&position) = stack.last() {
            return ValidationResult::fail(
                CalcError::MissingClosingParenthesis(position),
                Some(position),
            );
        }

        ValidationResult::ok()
    }

    /// Character set and operator placement rules.
    fn validate_syntax(&self, expression: &str) -> ValidationResult {
        // Digits, arithmetic operators, parentheses, decimal point,
        // letters (function and constant names, exponent marker) and
        // whitespace. Anything else is rejected outright.
        let allowed = |c: char| {
            c.is_ascii_digit()
                || c.is_ascii_alphabetic()
                || c.is_whitespace()
                || matches!(c, '+' | '-' | '*' | '/' | '^' | '%' | '(' | ')' | '.')
        };
        if !expression.chars().all(allowed) {
            return ValidationResult::fail(CalcError::InvalidExpression, None);
        }

        let stripped: Vec<char> = expression.chars().filter(|c| !c.is_whitespace()).collect();

        if let Some(&last) = stripped.last() {
            if ADJACENCY_OPERATORS.contains(&last) {
                return ValidationResult::fail(
                    CalcError::InvalidExpression,
                    Some(stripped.len() - 1),
                );
            }
        }

        for i in 0..stripped.len().saturating_sub(1) {
            let current = stripped[i];
            let next = stripped[i + 1];
            if ADJACENCY_OPERATORS.contains(&current) && ADJACENCY_OPERATORS.contains(&next) {
                // Unary minus is allowed right after another operator.
                if next == '-' {
                    continue;
                }
                return ValidationResult::fail(CalcError::InvalidExpression, Some(i + 1));
            }
        }

        ValidationResult::ok()
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new()
    }
}
