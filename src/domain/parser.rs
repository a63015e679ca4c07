//! Expression parser for the calculator's restricted grammar.
//!
//! A hand-written lexer and recursive descent parser produce a small
//! AST that the evaluator walks. The grammar is closed: numbers, six
//! binary operators, unary sign, parentheses, single-argument function
//! calls and bare named constants. There is no attribute access, no
//! general identifier resolution and no escape hatch into anything
//! resembling an interpreter; everything outside the grammar is an
//! `InvalidExpression`.
//!
//! # BNF Grammar
//!
//! ```bnf
//! Expression ::= Addition
//! Addition   ::= Multiplication ( ( "+" | "-" ) Multiplication )*
//! Multiplication ::= Unary ( ( "*" | "/" | "%" ) Unary )*
//! Unary      ::= ( "+" | "-" ) Unary | Power
//! Power      ::= Primary ( "^" Unary )?
//! Primary    ::= Number | Constant | FunctionCall | "(" Expression ")"
//! FunctionCall ::= Identifier "(" Expression ")"
//! Number     ::= Digits ( "." Digits )? ( ( "e" | "E" ) Sign? Digits )?
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus on the
//! left (`-2^2` is `-(2^2)`), while still accepting a signed exponent
//! (`2^-3`). Integer literals without a point or exponent stay exact
//! big integers; everything else lexes as a float.

use num_bigint::BigInt;

use super::errors::{CalcError, CalcResult};

/// Represents a token in the expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Integer(BigInt),
    Float(f64),
    Identifier(String),

    // Operators
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Power,

    // Delimiters
    LeftParen,
    RightParen,

    // End of input
    Eof,
}

/// Abstract syntax tree for calculator expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer(BigInt),
    Float(f64),
    /// A bare name (`pi`, `e`); resolved against the constant table at
    /// evaluation time.
    Constant(String),

    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },

    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
    },

    FunctionCall {
        name: String,
        arg: Box<Expr>,
    },
}

/// Binary operators, standard arithmetic precedence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

/// Unary sign operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

/// Lexical analyzer for tokenizing expressions.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            input: chars,
            position: 0,
            current_char,
        }
    }

    /// Advances to the next character in the input.
    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    /// Looks ahead without consuming.
    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Reads a numeric literal (integer, decimal or exponent form).
    fn read_number(&mut self) -> CalcResult<Token> {
        let mut text = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if self.current_char == Some('.') {
            is_float = true;
            text.push('.');
            self.advance();

            while let Some(ch) = self.current_char {
                if ch.is_ascii_digit() {
                    text.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        // An 'e' here is only an exponent marker if digits (optionally
        // signed) follow; otherwise it lexes separately, as the Euler
        // constant in `2*e`.
        if matches!(self.current_char, Some('e') | Some('E')) {
            let exponent_follows = match self.peek(1) {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => matches!(self.peek(2), Some(c) if c.is_ascii_digit()),
                _ => false,
            };
            if exponent_follows {
                is_float = true;
                text.push('e');
                self.advance();
                if matches!(self.current_char, Some('+') | Some('-')) {
                    text.push(self.current_char.unwrap_or('+'));
                    self.advance();
                }
                while let Some(ch) = self.current_char {
                    if ch.is_ascii_digit() {
                        text.push(ch);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| CalcError::InvalidExpression)
        } else {
            BigInt::parse_bytes(text.as_bytes(), 10)
                .map(Token::Integer)
                .ok_or(CalcError::InvalidExpression)
        }
    }

    /// Reads a function or constant name.
    fn read_identifier(&mut self) -> String {
        let mut identifier = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_ascii_alphabetic() {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        identifier
    }

    /// Gets the next token from the input.
    pub fn next_token(&mut self) -> CalcResult<Token> {
        self.skip_whitespace();

        match self.current_char {
            None => Ok(Token::Eof),

            Some(ch) => match ch {
                '0'..='9' | '.' => self.read_number(),

                'a'..='z' | 'A'..='Z' => Ok(Token::Identifier(self.read_identifier())),

                '+' => {
                    self.advance();
                    Ok(Token::Plus)
                }

                '-' => {
                    self.advance();
                    Ok(Token::Minus)
                }

                '*' => {
                    self.advance();
                    Ok(Token::Multiply)
                }

                '/' => {
                    self.advance();
                    Ok(Token::Divide)
                }

                '%' => {
                    self.advance();
                    Ok(Token::Modulo)
                }

                '^' => {
                    self.advance();
                    Ok(Token::Power)
                }

                '(' => {
                    self.advance();
                    Ok(Token::LeftParen)
                }

                ')' => {
                    self.advance();
                    Ok(Token::RightParen)
                }

                _ => Err(CalcError::InvalidExpression),
            },
        }
    }
}

/// Recursive descent parser for calculator expressions.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

impl Parser {
    /// Creates a new parser for the given expression.
    pub fn new(input: &str) -> CalcResult<Self> {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token()?;

        Ok(Self {
            lexer,
            current_token,
        })
    }

    /// Advances to the next token.
    fn advance(&mut self) -> CalcResult<()> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    /// Consumes the expected token or fails.
    fn expect(&mut self, expected: Token) -> CalcResult<()> {
        if std::mem::discriminant(&self.current_token) == std::mem::discriminant(&expected) {
            self.advance()
        } else {
            Err(CalcError::InvalidExpression)
        }
    }

    /// Parses the top-level expression.
    pub fn parse(&mut self) -> CalcResult<Expr> {
        let expr = self.parse_addition()?;

        if self.current_token != Token::Eof {
            return Err(CalcError::InvalidExpression);
        }

        Ok(expr)
    }

    /// Parses addition and subtraction expressions.
    fn parse_addition(&mut self) -> CalcResult<Expr> {
        let mut left = self.parse_multiplication()?;

        while matches!(self.current_token, Token::Plus | Token::Minus) {
            let op = match self.current_token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Subtract,
                _ => unreachable!(),
            };
            self.advance()?;
            let right = self.parse_multiplication()?;
            left = Expr::Binary {
                left: Box::new(left),
                operator: op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parses multiplication, division, and modulo expressions.
    fn parse_multiplication(&mut self) -> CalcResult<Expr> {
        let mut left = self.parse_unary()?;

        while matches!(
            self.current_token,
            Token::Multiply | Token::Divide | Token::Modulo
        ) {
            let op = match self.current_token {
                Token::Multiply => BinaryOp::Multiply,
                Token::Divide => BinaryOp::Divide,
                Token::Modulo => BinaryOp::Modulo,
                _ => unreachable!(),
            };
            self.advance()?;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                left: Box::new(left),
                operator: op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parses unary sign expressions. Sits between multiplication and
    /// power so that `-2^2` parses as `-(2^2)`.
    fn parse_unary(&mut self) -> CalcResult<Expr> {
        match self.current_token {
            Token::Plus => {
                self.advance()?;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    operator: UnaryOp::Plus,
                    operand: Box::new(operand),
                })
            }
            Token::Minus => {
                self.advance()?;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    operator: UnaryOp::Minus,
                    operand: Box::new(operand),
                })
            }
            _ => self.parse_power(),
        }
    }

    /// Parses power expressions (right-associative). The exponent goes
    /// back through `parse_unary` so `2^-3` is accepted.
    fn parse_power(&mut self) -> CalcResult<Expr> {
        let left = self.parse_primary()?;

        if self.current_token == Token::Power {
            self.advance()?;
            let right = self.parse_unary()?;
            Ok(Expr::Binary {
                left: Box::new(left),
                operator: BinaryOp::Power,
                right: Box::new(right),
            })
        } else {
            Ok(left)
        }
    }

    /// Parses primary expressions (highest precedence).
    fn parse_primary(&mut self) -> CalcResult<Expr> {
        match &self.current_token {
            Token::Integer(value) => {
                let value = value.clone();
                self.advance()?;
                Ok(Expr::Integer(value))
            }

            Token::Float(value) => {
                let value = *value;
                self.advance()?;
                Ok(Expr::Float(value))
            }

            Token::Identifier(name) => {
                let name = name.clone();
                self.advance()?;

                if self.current_token == Token::LeftParen {
                    self.advance()?;
                    let arg = self.parse_addition()?;
                    self.expect(Token::RightParen)?;
                    Ok(Expr::FunctionCall {
                        name,
                        arg: Box::new(arg),
                    })
                } else {
                    Ok(Expr::Constant(name))
                }
            }

            Token::LeftParen => {
                self.advance()?;
                let expr = self.parse_addition()?;
                self.expect(Token::RightParen)?;
                Ok(expr)
            }

            _ => Err(CalcError::InvalidExpression),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i64) -> Expr {
        Expr::Integer(BigInt::from(value))
    }

    #[test]
    fn test_lexer_numbers() {
        let mut lexer = Lexer::new("42 3.14 0.5");

        assert_eq!(lexer.next_token().unwrap(), Token::Integer(BigInt::from(42)));
        assert_eq!(lexer.next_token().unwrap(), Token::Float(3.14));
        assert_eq!(lexer.next_token().unwrap(), Token::Float(0.5));
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn test_lexer_exponent_numbers() {
        let mut lexer = Lexer::new("1e3 2.5E-2 7e+1");

        assert_eq!(lexer.next_token().unwrap(), Token::Float(1000.0));
        assert_eq!(lexer.next_token().unwrap(), Token::Float(0.025));
        assert_eq!(lexer.next_token().unwrap(), Token::Float(70.0));
    }

    #[test]
    fn test_lexer_euler_constant_not_exponent() {
        // '2*e' must lex as number, operator, identifier.
        let mut lexer = Lexer::new("2*e");

        assert_eq!(lexer.next_token().unwrap(), Token::Integer(BigInt::from(2)));
        assert_eq!(lexer.next_token().unwrap(), Token::Multiply);
        assert_eq!(lexer.next_token().unwrap(), Token::Identifier("e".to_string()));

        // '2e' with nothing after the marker is two tokens as well.
        let mut lexer = Lexer::new("2e");
        assert_eq!(lexer.next_token().unwrap(), Token::Integer(BigInt::from(2)));
        assert_eq!(lexer.next_token().unwrap(), Token::Identifier("e".to_string()));
    }

    #[test]
    fn test_lexer_operators_and_delimiters() {
        let mut lexer = Lexer::new("+ - * / % ^ ( )");

        assert_eq!(lexer.next_token().unwrap(), Token::Plus);
        assert_eq!(lexer.next_token().unwrap(), Token::Minus);
        assert_eq!(lexer.next_token().unwrap(), Token::Multiply);
        assert_eq!(lexer.next_token().unwrap(), Token::Divide);
        assert_eq!(lexer.next_token().unwrap(), Token::Modulo);
        assert_eq!(lexer.next_token().unwrap(), Token::Power);
        assert_eq!(lexer.next_token().unwrap(), Token::LeftParen);
        assert_eq!(lexer.next_token().unwrap(), Token::RightParen);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn test_lexer_large_integers_stay_exact() {
        let mut lexer = Lexer::new("123456789012345678901234567890");
        let expected = BigInt::parse_bytes(b"123456789012345678901234567890", 10).unwrap();
        assert_eq!(lexer.next_token().unwrap(), Token::Integer(expected));
    }

    #[test]
    fn test_lexer_rejects_foreign_characters() {
        let mut lexer = Lexer::new("@#$");
        assert_eq!(lexer.next_token(), Err(CalcError::InvalidExpression));

        let mut lexer = Lexer::new("'os'");
        assert_eq!(lexer.next_token(), Err(CalcError::InvalidExpression));
    }

    #[test]
    fn test_parser_operator_precedence() {
        // 2 + 3 * 4 parses as 2 + (3 * 4)
        let mut parser = Parser::new("2 + 3 * 4").unwrap();
        let expr = parser.parse().unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                left: Box::new(int(2)),
                operator: BinaryOp::Add,
                right: Box::new(Expr::Binary {
                    left: Box::new(int(3)),
                    operator: BinaryOp::Multiply,
                    right: Box::new(int(4)),
                }),
            }
        );
    }

    #[test]
    fn test_parser_power_right_associative() {
        // 2 ^ 3 ^ 2 parses as 2 ^ (3 ^ 2)
        let mut parser = Parser::new("2^3^2").unwrap();
        let expr = parser.parse().unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                left: Box::new(int(2)),
                operator: BinaryOp::Power,
                right: Box::new(Expr::Binary {
                    left: Box::new(int(3)),
                    operator: BinaryOp::Power,
                    right: Box::new(int(2)),
                }),
            }
        );
    }

    #[test]
    fn test_parser_unary_minus_binds_looser_than_power() {
        // -2^2 parses as -(2^2)
        let mut parser = Parser::new("-2^2").unwrap();
        let expr = parser.parse().unwrap();
        assert_eq!(
            expr,
            Expr::Unary {
                operator: UnaryOp::Minus,
                operand: Box::new(Expr::Binary {
                    left: Box::new(int(2)),
                    operator: BinaryOp::Power,
                    right: Box::new(int(2)),
                }),
            }
        );
    }

    #[test]
    fn test_parser_signed_exponent() {
        // 2^-3 is power with a unary-minus exponent
        let mut parser = Parser::new("2^-3").unwrap();
        let expr = parser.parse().unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                left: Box::new(int(2)),
                operator: BinaryOp::Power,
                right: Box::new(Expr::Unary {
                    operator: UnaryOp::Minus,
                    operand: Box::new(int(3)),
                }),
            }
        );
    }

    #[test]
    fn test_parser_parentheses_override_precedence() {
        let mut parser = Parser::new("(2 + 3) * 4").unwrap();
        let expr = parser.parse().unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                left: Box::new(Expr::Binary {
                    left: Box::new(int(2)),
                    operator: BinaryOp::Add,
                    right: Box::new(int(3)),
                }),
                operator: BinaryOp::Multiply,
                right: Box::new(int(4)),
            }
        );
    }

    #[test]
    fn test_parser_function_call() {
        let mut parser = Parser::new("sin(90)").unwrap();
        let expr = parser.parse().unwrap();
        assert_eq!(
            expr,
            Expr::FunctionCall {
                name: "sin".to_string(),
                arg: Box::new(int(90)),
            }
        );
    }

    #[test]
    fn test_parser_nested_function_call() {
        let mut parser = Parser::new("sqrt(log(100))").unwrap();
        let expr = parser.parse().unwrap();
        assert_eq!(
            expr,
            Expr::FunctionCall {
                name: "sqrt".to_string(),
                arg: Box::new(Expr::FunctionCall {
                    name: "log".to_string(),
                    arg: Box::new(int(100)),
                }),
            }
        );
    }

    #[test]
    fn test_parser_bare_constant() {
        let mut parser = Parser::new("2*pi").unwrap();
        let expr = parser.parse().unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                left: Box::new(int(2)),
                operator: BinaryOp::Multiply,
                right: Box::new(Expr::Constant("pi".to_string())),
            }
        );
    }

    #[test]
    fn test_parser_error_handling() {
        let mut parser = Parser::new("2 +").unwrap();
        assert_eq!(parser.parse(), Err(CalcError::InvalidExpression));

        let mut parser = Parser::new("(2 + 3").unwrap();
        assert_eq!(parser.parse(), Err(CalcError::InvalidExpression));

        let mut parser = Parser::new("sin()").unwrap();
        assert_eq!(parser.parse(), Err(CalcError::InvalidExpression));

        let mut parser = Parser::new("2 3").unwrap();
        assert_eq!(parser.parse(), Err(CalcError::InvalidExpression));
    }

    #[test]
    fn test_parser_rejects_argument_lists() {
        // The grammar has single-argument calls only.
        let mut parser = Parser::new("log(100, 10)");
        match parser {
            Ok(ref mut p) => assert!(p.parse().is_err()),
            Err(err) => assert_eq!(err, CalcError::InvalidExpression),
        }
    }
}
