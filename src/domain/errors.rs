/// Errors produced by the validation and evaluation pipeline.
///
/// Each variant maps to exactly one user-facing message. Parenthesis
/// errors carry the 0-based index into the trimmed expression where the
/// problem was detected.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    EmptyExpression,
    MissingOpeningParenthesis(usize),
    MissingClosingParenthesis(usize),
    InvalidExpression,
    DivisionByZero,
    UndefinedVariable(String),
    UndefinedFunction(String),
    MathDomain,
    Overflow,
    FactorialNotInteger,
    FactorialNegative,
    FactorialTooLarge,
    InvalidAngleMode(String),
}

impl std::fmt::Display for CalcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalcError::EmptyExpression => {
                write!(f, "Expression is empty")
            }
            CalcError::MissingOpeningParenthesis(position) => {
                write!(f, "Missing opening parenthesis at position {}", position)
            }
            CalcError::MissingClosingParenthesis(position) => {
                write!(f, "Missing closing parenthesis at position {}", position)
            }
            CalcError::InvalidExpression => {
                write!(f, "Invalid expression")
            }
            CalcError::DivisionByZero => {
                write!(f, "Cannot divide by zero")
            }
            CalcError::UndefinedVariable(name) => {
                write!(f, "Undefined variable: {}", name)
            }
            CalcError::UndefinedFunction(name) => {
                write!(f, "Undefined function: {}", name)
            }
            CalcError::MathDomain => {
                write!(f, "Value outside function domain")
            }
            CalcError::Overflow => {
                write!(f, "Result too large")
            }
            CalcError::FactorialNotInteger => {
                write!(f, "Factorial requires an integer")
            }
            CalcError::FactorialNegative => {
                write!(f, "Factorial is not defined for negative numbers")
            }
            CalcError::FactorialTooLarge => {
                write!(f, "Factorial: number too large (max 170)")
            }
            CalcError::InvalidAngleMode(mode) => {
                write!(f, "Invalid angle mode: {}", mode)
            }
        }
    }
}

impl std::error::Error for CalcError {}

pub type CalcResult<T> = Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthesis_errors_carry_position() {
        let err = CalcError::MissingClosingParenthesis(3);
        assert!(err.to_string().contains('3'));

        let err = CalcError::MissingOpeningParenthesis(7);
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_messages_are_distinct_per_kind() {
        let messages = [
            CalcError::EmptyExpression.to_string(),
            CalcError::InvalidExpression.to_string(),
            CalcError::DivisionByZero.to_string(),
            CalcError::MathDomain.to_string(),
            CalcError::Overflow.to_string(),
            CalcError::FactorialNotInteger.to_string(),
            CalcError::FactorialNegative.to_string(),
            CalcError::FactorialTooLarge.to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
