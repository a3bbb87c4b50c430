//! Expression text parser.
//!
//! Turns C-like infix condition text into an [`Expression`] tree. The
//! grammar, lowest precedence first:
//!
//! - `||`
//! - `&&`
//! - `==` `!=` `<` `<=` `>` `>=`
//! - `+` `-`
//! - `*` `/` `%`
//! - unary `!` `-`
//! - parenthesized groups, identifiers and literals
//!
//! The parser is purely syntactic. It accepts operators and literal kinds
//! the evaluator later rejects, so that such conditions fail with a
//! precise evaluation error instead of a generic syntax error.
//!
//! Nesting is bounded by [`MAX_NESTING`] and [`MAX_HEIGHT`]; deeper input is
//! a [`ConditionError::ParseError`].

use crate::ast::{BinaryOperator, Expression, LiteralKind, UnaryOperator};
use crate::error::{ConditionError, Result};
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_while};
use nom::character::complete::{anychar, char, digit1, hex_digit1, multispace0, one_of, satisfy};
use nom::combinator::{all_consuming, map, not, opt, recognize, value};
use nom::error::{Error as NomError, ErrorKind};
use nom::multi::many0_count;
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::{Err as NomErr, IResult, Parser};
use std::str::FromStr;

/// Maximum nesting of parenthesized groups and unary operators.
pub const MAX_NESTING: usize = 64;

/// Maximum height of a binary operator chain, nested operands included.
pub const MAX_HEIGHT: usize = 256;

/// Parses a complete expression, rejecting trailing input.
pub fn parse_expression(text: &str) -> Result<Expression> {
    match all_consuming(terminated(at_depth(expression, 0), multispace0)).parse(text) {
        Ok((_, expr)) => Ok(expr),
        Err(NomErr::Error(e)) | Err(NomErr::Failure(e)) => {
            Err(ConditionError::ParseError(describe_failure(text, &e)))
        }
        Err(NomErr::Incomplete(_)) => Err(ConditionError::ParseError(
            "unexpected end of expression".to_string(),
        )),
    }
}

impl FromStr for Expression {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self> {
        parse_expression(s)
    }
}

impl Expression {
    /// Parses expression text into a tree.
    pub fn parse(text: &str) -> Result<Self> {
        parse_expression(text)
    }
}

fn describe_failure(text: &str, error: &NomError<&str>) -> String {
    let remaining = error.input.trim_start();
    let offset = text.len() - remaining.len();
    if error.code == ErrorKind::TooLarge {
        format!("expression nested too deeply at offset {}", offset)
    } else if remaining.is_empty() {
        format!("unexpected end of expression at offset {}", offset)
    } else {
        let fragment: String = remaining.chars().take(16).collect();
        format!("unexpected input at offset {}: {:?}", offset, fragment)
    }
}

fn too_deep(input: &str) -> NomErr<NomError<&str>> {
    NomErr::Failure(NomError::new(input, ErrorKind::TooLarge))
}

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = NomError<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = NomError<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

type Level = for<'a> fn(&'a str, usize) -> IResult<&'a str, Expression>;
type OperatorParser = for<'a> fn(&'a str) -> IResult<&'a str, BinaryOperator>;

/// Binds a precedence level to the nesting depth it is parsed at.
fn at_depth(level: Level, depth: usize) -> impl Fn(&str) -> IResult<&str, Expression> {
    move |input| level(input, depth)
}

/// Parses `operand (operator operand)*` and folds it left-associatively.
fn binary_level<'a>(
    input: &'a str,
    depth: usize,
    operand: Level,
    operator: OperatorParser,
) -> IResult<&'a str, Expression> {
    let (mut input, mut expr) = operand(input, depth)?;
    let mut height = expr.height();
    loop {
        let (rest, (op, right)) = match pair(ws(operator), at_depth(operand, depth)).parse(input) {
            Ok(parsed) => parsed,
            Err(NomErr::Error(_)) => return Ok((input, expr)),
            Err(err) => return Err(err),
        };
        height = height.max(right.height()) + 1;
        if height > MAX_HEIGHT {
            return Err(too_deep(input));
        }
        expr = Expression::binary(op, expr, right);
        input = rest;
    }
}

fn expression(input: &str, depth: usize) -> IResult<&str, Expression> {
    logical_or(input, depth)
}

fn logical_or(input: &str, depth: usize) -> IResult<&str, Expression> {
    binary_level(input, depth, logical_and, or_operator)
}

fn logical_and(input: &str, depth: usize) -> IResult<&str, Expression> {
    binary_level(input, depth, relational, and_operator)
}

fn relational(input: &str, depth: usize) -> IResult<&str, Expression> {
    binary_level(input, depth, additive, relational_operator)
}

fn additive(input: &str, depth: usize) -> IResult<&str, Expression> {
    binary_level(input, depth, multiplicative, additive_operator)
}

fn multiplicative(input: &str, depth: usize) -> IResult<&str, Expression> {
    binary_level(input, depth, unary, multiplicative_operator)
}

fn or_operator(input: &str) -> IResult<&str, BinaryOperator> {
    value(BinaryOperator::Or, tag("||")).parse(input)
}

fn and_operator(input: &str) -> IResult<&str, BinaryOperator> {
    value(BinaryOperator::And, tag("&&")).parse(input)
}

fn relational_operator(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::Equal, tag("==")),
        value(BinaryOperator::NotEqual, tag("!=")),
        value(BinaryOperator::LessEqual, tag("<=")),
        value(BinaryOperator::GreaterEqual, tag(">=")),
        value(BinaryOperator::Less, char('<')),
        value(BinaryOperator::Greater, char('>')),
    ))
    .parse(input)
}

fn additive_operator(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::Add, char('+')),
        value(BinaryOperator::Sub, char('-')),
    ))
    .parse(input)
}

fn multiplicative_operator(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::Mul, char('*')),
        value(BinaryOperator::Div, char('/')),
        value(BinaryOperator::Rem, char('%')),
    ))
    .parse(input)
}

fn unary(input: &str, depth: usize) -> IResult<&str, Expression> {
    let (input, _) = multispace0::<_, NomError<&str>>(input)?;
    match unary_operator(input) {
        Ok(_) if depth >= MAX_NESTING => Err(too_deep(input)),
        Ok((rest, op)) => {
            let (rest, operand) = unary(rest, depth + 1)?;
            Ok((rest, Expression::unary(op, operand)))
        }
        Err(_) => primary(input, depth),
    }
}

fn unary_operator(input: &str) -> IResult<&str, UnaryOperator> {
    alt((
        value(UnaryOperator::Not, char('!')),
        value(UnaryOperator::Neg, char('-')),
    ))
    .parse(input)
}

fn primary(input: &str, depth: usize) -> IResult<&str, Expression> {
    alt((at_depth(group, depth), literal, identifier)).parse(input)
}

fn group(input: &str, depth: usize) -> IResult<&str, Expression> {
    if depth >= MAX_NESTING && input.starts_with('(') {
        return Err(too_deep(input));
    }
    map(
        delimited(
            char('('),
            at_depth(expression, depth + 1),
            preceded(multispace0, char(')')),
        ),
        Expression::group,
    )
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, Expression> {
    map(
        recognize(pair(
            satisfy(|c| c.is_alphabetic() || c == '_'),
            take_while(|c: char| c.is_alphanumeric() || c == '_'),
        )),
        |name: &str| Expression::identifier(name),
    )
    .parse(input)
}

fn literal(input: &str) -> IResult<&str, Expression> {
    alt((number, char_literal, string_literal, raw_string_literal)).parse(input)
}

fn number(input: &str) -> IResult<&str, Expression> {
    let (rest, text) = recognize(pair(
        alt((prefixed_integer, decimal_number)),
        opt(char('i')),
    ))
    .parse(input)?;
    // `200abc` is one malformed token, not a number followed by a name.
    let (rest, _) = not(identifier_char).parse(rest)?;

    let kind = if text.ends_with('i') {
        LiteralKind::Imaginary
    } else if is_prefixed(text) {
        LiteralKind::Int
    } else if text.contains(['.', 'e', 'E']) {
        LiteralKind::Float
    } else {
        LiteralKind::Int
    };
    Ok((rest, Expression::literal(kind, text)))
}

fn identifier_char(input: &str) -> IResult<&str, char> {
    satisfy(|c| c.is_alphanumeric() || c == '_').parse(input)
}

fn is_prefixed(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() > 2 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
}

/// `_` may follow the base prefix or sit between digits, never trail.
fn prefixed_integer(input: &str) -> IResult<&str, &str> {
    recognize((
        char('0'),
        one_of("xXoObB"),
        opt(char('_')),
        hex_digit1,
        many0_count(preceded(char('_'), hex_digit1)),
    ))
    .parse(input)
}

fn decimal_digits(input: &str) -> IResult<&str, &str> {
    recognize(pair(digit1, many0_count(preceded(char('_'), digit1)))).parse(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize((one_of("eE"), opt(one_of("+-")), decimal_digits)).parse(input)
}

fn decimal_number(input: &str) -> IResult<&str, &str> {
    alt((
        recognize((
            decimal_digits,
            opt(pair(char('.'), opt(decimal_digits))),
            opt(exponent),
        )),
        recognize((char('.'), decimal_digits, opt(exponent))),
    ))
    .parse(input)
}

fn escape_sequence(input: &str) -> IResult<&str, &str> {
    recognize(preceded(char('\\'), anychar)).parse(input)
}

fn char_literal(input: &str) -> IResult<&str, Expression> {
    map(
        recognize(delimited(
            char('\''),
            many0_count(alt((escape_sequence, is_not("'\\\n")))),
            char('\''),
        )),
        |text: &str| Expression::literal(LiteralKind::Char, text),
    )
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, Expression> {
    map(
        recognize(delimited(
            char('"'),
            many0_count(alt((escape_sequence, is_not("\"\\\n")))),
            char('"'),
        )),
        |text: &str| Expression::literal(LiteralKind::String, text),
    )
    .parse(input)
}

fn raw_string_literal(input: &str) -> IResult<&str, Expression> {
    map(
        recognize(delimited(char('`'), take_while(|c: char| c != '`'), char('`'))),
        |text: &str| Expression::literal(LiteralKind::String, text),
    )
    .parse(input)
}
