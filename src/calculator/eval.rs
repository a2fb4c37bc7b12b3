//! Closed-grammar expression evaluation.
//!
//! Grammar: decimal numbers, the constants `π` and `e`, binary
//! `+ - * / ^` (with the typography variants `× ÷ −`), unary sign,
//! postfix `%` (divide by 100) and `²`, parentheses, `√(expr)`, and the
//! named functions `sin cos tan asin acos atan log ln`. Nothing outside
//! this grammar evaluates; there is no identifier resolution beyond the
//! fixed function set.

use std::f64::consts::{E, PI};

use crate::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
}

impl AngleMode {
    /// Anything other than an explicit "deg" means radians; a missing
    /// value defaults to degrees.
    pub fn parse(value: Option<&str>) -> AngleMode {
        match value {
            None | Some("deg") => AngleMode::Degrees,
            Some(_) => AngleMode::Radians,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("Empty expression")]
    EmptyExpression,
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Math domain error")]
    DomainError,
    #[error("Math error")]
    MathError,
    #[error("Invalid syntax")]
    InvalidSyntax,
    #[error("Invalid expression")]
    InvalidExpression,
}

impl From<EvalError> for AppError {
    fn from(err: EvalError) -> AppError {
        AppError::BadRequest(err.to_string())
    }
}

pub fn evaluate(expression: &str, angle_mode: AngleMode) -> Result<f64, EvalError> {
    if expression.is_empty() {
        return Err(EvalError::EmptyExpression);
    }

    let tokens = tokenize(expression)?;
    let mut parser = Parser { tokens: &tokens, pos: 0, angle_mode };
    let value = parser.expression(0)?;
    if parser.pos != tokens.len() {
        return Err(EvalError::InvalidSyntax);
    }
    if !value.is_finite() {
        return Err(EvalError::MathError);
    }
    Ok(value)
}

/// Integral results render without a decimal point; everything else is
/// rounded to 10 decimal places.
pub fn format_result(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let rounded = (value * 1e10).round() / 1e10;
        format!("{rounded}")
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Percent,
    Squared,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut text = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        text.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = text.parse().map_err(|_| EvalError::InvalidSyntax)?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphabetic() {
                        word.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if word == "e" {
                    tokens.push(Token::Number(E));
                } else {
                    tokens.push(Token::Ident(word));
                }
            }
            'π' => {
                chars.next();
                tokens.push(Token::Number(PI));
            }
            '√' => {
                chars.next();
                tokens.push(Token::Ident("sqrt".to_owned()));
            }
            '²' => {
                chars.next();
                tokens.push(Token::Squared);
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' | '−' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' | '×' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' | '÷' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '^' => {
                chars.next();
                tokens.push(Token::Caret);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            _ => return Err(EvalError::InvalidSyntax),
        }
    }

    Ok(tokens)
}

// binding powers: additive 1, multiplicative 3, unary sign 4, power 5
// (right-associative); postfix % and ² bind tightest
const BP_ADDITIVE: u8 = 1;
const BP_MULTIPLICATIVE: u8 = 3;
const BP_UNARY: u8 = 4;
const BP_POWER: u8 = 5;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    angle_mode: AngleMode,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_rparen(&mut self) -> Result<(), EvalError> {
        match self.advance() {
            Some(Token::RParen) => Ok(()),
            _ => Err(EvalError::InvalidSyntax),
        }
    }

    fn expression(&mut self, min_bp: u8) -> Result<f64, EvalError> {
        let mut lhs = self.prefix()?;

        loop {
            match self.peek() {
                Some(Token::Percent) => {
                    self.advance();
                    lhs /= 100.0;
                    continue;
                }
                Some(Token::Squared) => {
                    self.advance();
                    lhs *= lhs;
                    continue;
                }
                _ => {}
            }

            let (token, bp, right_assoc) = match self.peek() {
                Some(Token::Plus) => (Token::Plus, BP_ADDITIVE, false),
                Some(Token::Minus) => (Token::Minus, BP_ADDITIVE, false),
                Some(Token::Star) => (Token::Star, BP_MULTIPLICATIVE, false),
                Some(Token::Slash) => (Token::Slash, BP_MULTIPLICATIVE, false),
                Some(Token::Caret) => (Token::Caret, BP_POWER, true),
                _ => break,
            };
            if bp < min_bp {
                break;
            }
            self.advance();

            let rhs = self.expression(if right_assoc { bp } else { bp + 1 })?;
            lhs = match token {
                Token::Plus => lhs + rhs,
                Token::Minus => lhs - rhs,
                Token::Star => lhs * rhs,
                Token::Slash => {
                    if rhs == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    lhs / rhs
                }
                Token::Caret => {
                    if lhs < 0.0 && rhs.fract() != 0.0 {
                        return Err(EvalError::DomainError);
                    }
                    lhs.powf(rhs)
                }
                _ => unreachable!(),
            };
        }

        Ok(lhs)
    }

    fn prefix(&mut self) -> Result<f64, EvalError> {
        match self.advance().ok_or(EvalError::InvalidSyntax)? {
            Token::Number(value) => Ok(value),
            Token::Plus => self.expression(BP_UNARY),
            Token::Minus => Ok(-self.expression(BP_UNARY)?),
            Token::LParen => {
                let value = self.expression(0)?;
                self.expect_rparen()?;
                Ok(value)
            }
            Token::Ident(name) => {
                if !matches!(self.peek(), Some(Token::LParen)) {
                    return Err(EvalError::InvalidExpression);
                }
                self.advance();
                let arg = self.expression(0)?;
                self.expect_rparen()?;
                self.apply_function(&name, arg)
            }
            _ => Err(EvalError::InvalidSyntax),
        }
    }

    fn apply_function(&self, name: &str, arg: f64) -> Result<f64, EvalError> {
        let deg = self.angle_mode == AngleMode::Degrees;
        match name {
            "sqrt" => {
                if arg < 0.0 {
                    return Err(EvalError::DomainError);
                }
                Ok(arg.sqrt())
            }
            "sin" => Ok(if deg { arg.to_radians() } else { arg }.sin()),
            "cos" => Ok(if deg { arg.to_radians() } else { arg }.cos()),
            "tan" => Ok(if deg { arg.to_radians() } else { arg }.tan()),
            "asin" | "acos" => {
                if !(-1.0..=1.0).contains(&arg) {
                    return Err(EvalError::DomainError);
                }
                let value = if name == "asin" { arg.asin() } else { arg.acos() };
                Ok(if deg { value.to_degrees() } else { value })
            }
            "atan" => {
                let value = arg.atan();
                Ok(if deg { value.to_degrees() } else { value })
            }
            "log" => {
                if arg <= 0.0 {
                    return Err(EvalError::DomainError);
                }
                Ok(arg.log10())
            }
            "ln" => {
                if arg <= 0.0 {
                    return Err(EvalError::DomainError);
                }
                Ok(arg.ln())
            }
            _ => Err(EvalError::InvalidExpression),
        }
    }
}
