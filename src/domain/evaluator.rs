//! Safe evaluation of pre-validated expressions.
//!
//! The evaluator walks the parser's AST against a closed function and
//! constant table. Arithmetic over integer operands uses exact big
//! integers so results like `999999*999999` or `factorial(170)` keep
//! every digit; anything involving a fractional value drops to `f64`
//! and is pushed through the decimal rounding fence on the way out.

use std::collections::HashMap;

use num_bigint::BigInt;
use num_traits::{Pow, Signed, ToPrimitive, Zero};

use super::decimal::ExactDecimal;
use super::errors::{CalcError, CalcResult};
use super::models::AngleMode;
use super::parser::{BinaryOp, Expr, Parser, UnaryOp};

/// Largest factorial argument; 171! overflows the double range the
/// float paths operate in.
pub const MAX_FACTORIAL_INPUT: u32 = 170;

/// Size cap for integer power results, in bits. Keeps a stray
/// `9^9999999` from eating the process.
const MAX_POWER_RESULT_BITS: u64 = 1 << 16;

/// Intermediate numeric value: exact integer or native float.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(BigInt),
    Float(f64),
}

impl Value {
    fn to_f64(&self) -> f64 {
        match self {
            Value::Integer(i) => i.to_f64().unwrap_or(f64::NAN),
            Value::Float(f) => *f,
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Value::Integer(i) => i.is_zero(),
            Value::Float(f) => *f == 0.0,
        }
    }
}

/// Wraps a float computation, mapping the IEEE escape values onto the
/// error taxonomy.
fn float_result(value: f64) -> CalcResult<Value> {
    if value.is_nan() {
        Err(CalcError::MathDomain)
    } else if value.is_infinite() {
        Err(CalcError::Overflow)
    } else {
        Ok(Value::Float(value))
    }
}

/// Function signature for built-in calculator functions.
///
/// The current angle mode is passed in as a value; trig functions use
/// it, everything else ignores it. No per-mode closure rebuilding.
pub type FunctionImpl = fn(Value, AngleMode) -> CalcResult<Value>;

/// Closed registry of built-in functions.
pub struct FunctionRegistry {
    functions: HashMap<&'static str, FunctionImpl>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register_builtin_functions();
        registry
    }

    fn register(&mut self, name: &'static str, func: FunctionImpl) {
        self.functions.insert(name, func);
    }

    /// Gets a function by name. Lookups are case-sensitive.
    pub fn get(&self, name: &str) -> Option<&FunctionImpl> {
        self.functions.get(name)
    }

    fn register_builtin_functions(&mut self) {
        self.register("sin", |v, mode| float_result(mode.to_radians(v.to_f64()).sin()));
        self.register("cos", |v, mode| float_result(mode.to_radians(v.to_f64()).cos()));
        self.register("tan", |v, mode| float_result(mode.to_radians(v.to_f64()).tan()));

        // Inverse trig always answers in radians; the angle mode only
        // governs how direct trig arguments are read.
        self.register("asin", |v, _| {
            let x = v.to_f64();
            if !(-1.0..=1.0).contains(&x) {
                return Err(CalcError::MathDomain);
            }
            float_result(x.asin())
        });
        self.register("acos", |v, _| {
            let x = v.to_f64();
            if !(-1.0..=1.0).contains(&x) {
                return Err(CalcError::MathDomain);
            }
            float_result(x.acos())
        });
        self.register("atan", |v, _| float_result(v.to_f64().atan()));

        self.register("sinh", |v, _| float_result(v.to_f64().sinh()));
        self.register("cosh", |v, _| float_result(v.to_f64().cosh()));
        self.register("tanh", |v, _| float_result(v.to_f64().tanh()));

        self.register("sqrt", |v, _| {
            let x = v.to_f64();
            if x < 0.0 {
                return Err(CalcError::MathDomain);
            }
            float_result(x.sqrt())
        });

        self.register("log", |v, _| {
            let x = v.to_f64();
            if x <= 0.0 {
                return Err(CalcError::MathDomain);
            }
            float_result(x.log10())
        });
        self.register("ln", |v, _| {
            let x = v.to_f64();
            if x <= 0.0 {
                return Err(CalcError::MathDomain);
            }
            float_result(x.ln())
        });

        self.register("abs", |v, _| match v {
            Value::Integer(i) => Ok(Value::Integer(i.abs())),
            Value::Float(f) => float_result(f.abs()),
        });

        self.register("factorial", |v, _| {
            let n = match v {
                Value::Integer(i) => i,
                Value::Float(f) => {
                    if f.fract() != 0.0 {
                        return Err(CalcError::FactorialNotInteger);
                    }
                    BigInt::from(f as i64)
                }
            };
            if n.is_negative() {
                return Err(CalcError::FactorialNegative);
            }
            if n > BigInt::from(MAX_FACTORIAL_INPUT) {
                return Err(CalcError::FactorialTooLarge);
            }
            let n = n.to_u32().unwrap_or(0);
            let mut acc = BigInt::from(1u32);
            for k in 2..=n {
                acc *= k;
            }
            Ok(Value::Integer(acc))
        });
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn constant_table() -> HashMap<&'static str, f64> {
    let mut constants = HashMap::new();
    constants.insert("pi", std::f64::consts::PI);
    constants.insert("e", std::f64::consts::E);
    constants
}

/// Evaluator for the restricted calculator grammar.
///
/// Owns the angle-mode state for trigonometric functions; everything
/// else is stateless. One in-flight evaluation per instance.
///
/// # Examples
///
/// ```
/// use scicalc::domain::SafeEvaluator;
///
/// let evaluator = SafeEvaluator::new();
/// let value = evaluator.evaluate("(2+3)*4").unwrap();
/// assert_eq!(value.normalize().to_string(), "20");
/// ```
pub struct SafeEvaluator {
    angle_mode: AngleMode,
    functions: FunctionRegistry,
    constants: HashMap<&'static str, f64>,
}

impl SafeEvaluator {
    pub fn new() -> Self {
        Self {
            angle_mode: AngleMode::default(),
            functions: FunctionRegistry::new(),
            constants: constant_table(),
        }
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// Sets the angle mode for all subsequent evaluations.
    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        self.angle_mode = mode;
    }

    /// Parses and evaluates an expression to an exact decimal.
    pub fn evaluate(&self, expression: &str) -> CalcResult<ExactDecimal> {
        let mut parser = Parser::new(expression)?;
        let ast = parser.parse()?;
        let value = self.evaluate_expr(&ast)?;

        match value {
            Value::Integer(i) => Ok(ExactDecimal::from_bigint(i)),
            Value::Float(f) => ExactDecimal::from_f64(f),
        }
    }

    fn evaluate_expr(&self, expr: &Expr) -> CalcResult<Value> {
        match expr {
            Expr::Integer(value) => Ok(Value::Integer(value.clone())),

            Expr::Float(value) => Ok(Value::Float(*value)),

            Expr::Constant(name) => self
                .constants
                .get(name.as_str())
                .map(|&value| Value::Float(value))
                .ok_or_else(|| CalcError::UndefinedVariable(name.clone())),

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left_val = self.evaluate_expr(left)?;
                let right_val = self.evaluate_expr(right)?;
                self.apply_binary(left_val, *operator, right_val)
            }

            Expr::Unary { operator, operand } => {
                let value = self.evaluate_expr(operand)?;
                match operator {
                    UnaryOp::Plus => Ok(value),
                    UnaryOp::Minus => match value {
                        Value::Integer(i) => Ok(Value::Integer(-i)),
                        Value::Float(f) => Ok(Value::Float(-f)),
                    },
                }
            }

            Expr::FunctionCall { name, arg } => {
                let func = self
                    .functions
                    .get(name)
                    .ok_or_else(|| CalcError::UndefinedFunction(name.clone()))?;
                let value = self.evaluate_expr(arg)?;
                func(value, self.angle_mode)
            }
        }
    }

    fn apply_binary(&self, left: Value, operator: BinaryOp, right: Value) -> CalcResult<Value> {
        match operator {
            BinaryOp::Add => match (left, right) {
                (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
                (a, b) => float_result(a.to_f64() + b.to_f64()),
            },

            BinaryOp::Subtract => match (left, right) {
                (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a - b)),
                (a, b) => float_result(a.to_f64() - b.to_f64()),
            },

            BinaryOp::Multiply => match (left, right) {
                (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a * b)),
                (a, b) => float_result(a.to_f64() * b.to_f64()),
            },

            // Division is always true division; integer operands do not
            // truncate.
            BinaryOp::Divide => {
                if right.is_zero() {
                    return Err(CalcError::DivisionByZero);
                }
                float_result(left.to_f64() / right.to_f64())
            }

            // Floored modulo: the result follows the sign of the
            // divisor, as in the source semantics.
            BinaryOp::Modulo => {
                if right.is_zero() {
                    return Err(CalcError::DivisionByZero);
                }
                match (left, right) {
                    (Value::Integer(a), Value::Integer(b)) => {
                        let r = ((&a % &b) + &b) % &b;
                        Ok(Value::Integer(r))
                    }
                    (a, b) => {
                        let (a, b) = (a.to_f64(), b.to_f64());
                        float_result(a - b * (a / b).floor())
                    }
                }
            }

            BinaryOp::Power => self.apply_power(left, right),
        }
    }

    fn apply_power(&self, base: Value, exponent: Value) -> CalcResult<Value> {
        if let (Value::Integer(a), Value::Integer(b)) = (&base, &exponent) {
            if b.is_negative() {
                if a.is_zero() {
                    return Err(CalcError::DivisionByZero);
                }
            } else {
                // Bases of magnitude <= 1 are exact at any exponent
                // height and must bypass the size guard.
                if b.is_zero() {
                    return Ok(Value::Integer(BigInt::from(1)));
                }
                if a.is_zero() {
                    return Ok(Value::Integer(BigInt::from(0)));
                }
                if a.abs() == BigInt::from(1) {
                    let negative = a.is_negative() && !(b % 2u32).is_zero();
                    return Ok(Value::Integer(BigInt::from(if negative { -1 } else { 1 })));
                }
                let exp = b.to_u64().ok_or(CalcError::Overflow)?;
                if a.bits().saturating_mul(exp) > MAX_POWER_RESULT_BITS {
                    return Err(CalcError::Overflow);
                }
                let exp = u32::try_from(exp).map_err(|_| CalcError::Overflow)?;
                return Ok(Value::Integer(Pow::pow(a, exp)));
            }
        }
        float_result(base.to_f64().powf(exponent.to_f64()))
    }
}

impl Default for SafeEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
