use std::str::FromStr;
use serde::{Deserialize, Serialize};

use super::errors::CalcError;

/// Unit convention used to interpret trigonometric function arguments.
///
/// The mode is held by the evaluator and persists until changed. Only
/// `sin`, `cos` and `tan` are affected; their argument is converted to
/// radians before the native function is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
    Gradians,
}

impl AngleMode {
    /// Converts an angle expressed in this mode to radians.
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleMode::Degrees => angle * std::f64::consts::PI / 180.0,
            AngleMode::Radians => angle,
            AngleMode::Gradians => angle * std::f64::consts::PI / 200.0,
        }
    }

    /// Short indicator used in the UI header.
    pub fn label(self) -> &'static str {
        match self {
            AngleMode::Degrees => "DEG",
            AngleMode::Radians => "RAD",
            AngleMode::Gradians => "GRAD",
        }
    }

    /// The next mode in the DEG -> RAD -> GRAD cycle.
    pub fn next(self) -> AngleMode {
        match self {
            AngleMode::Degrees => AngleMode::Radians,
            AngleMode::Radians => AngleMode::Gradians,
            AngleMode::Gradians => AngleMode::Degrees,
        }
    }
}

impl std::fmt::Display for AngleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AngleMode::Degrees => "degrees",
            AngleMode::Radians => "radians",
            AngleMode::Gradians => "gradians",
        };
        write!(f, "{}", name)
    }
}

/// String contract for the mode names (`"degrees"`, `"radians"`,
/// `"gradians"`). The TUI cycles the enum directly via [`AngleMode::next`];
/// this impl exists for external callers configuring the mode by name and
/// is the sole producer of [`CalcError::InvalidAngleMode`].
impl FromStr for AngleMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "degrees" => Ok(AngleMode::Degrees),
            "radians" => Ok(AngleMode::Radians),
            "gradians" => Ok(AngleMode::Gradians),
            other => Err(CalcError::InvalidAngleMode(other.to_string())),
        }
    }
}

/// Outcome of the structural pre-check performed by the validator.
///
/// `position` is a 0-based index into the trimmed expression and is set
/// for parenthesis and operator-placement errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub error: Option<CalcError>,
    pub position: Option<usize>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
            position: None,
        }
    }

    pub fn fail(error: CalcError, position: Option<usize>) -> Self {
        Self {
            valid: false,
            error: Some(error),
            position,
        }
    }
}

/// The externally visible contract of the calculator engine.
///
/// On success `result` holds the formatted decimal string, rendered
/// without scientific notation and with trailing zeros stripped. On
/// failure `error` holds the user-facing message for the failure kind.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    pub success: bool,
    pub result: Option<String>,
    pub error: Option<String>,
}

impl CalculationResult {
    pub fn success(result: String) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: CalcError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

/// A single completed calculation, as recorded in the history panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: String,
}
