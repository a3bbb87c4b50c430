//! Identifier and literal resolution.

use crate::ast::{Expression, LiteralKind};
use crate::context::Context;
use crate::error::{ConditionError, Result};
use crate::value::Value;

/// Resolves an identifier or literal node to a value.
///
/// Any other node kind is not a value on its own and yields
/// [`ConditionError::UnsupportedExpression`].
pub fn resolve(expr: &Expression, context: &Context) -> Result<Value> {
    match expr {
        Expression::Identifier { name } => resolve_identifier(name, context),
        Expression::Literal { kind, text } => resolve_literal(*kind, text),
        other => Err(ConditionError::UnsupportedExpression(other.kind())),
    }
}

/// Resolves a name. The keywords `true`, `false` and `nil` shadow the context.
pub fn resolve_identifier(name: &str, context: &Context) -> Result<Value> {
    match name {
        "_" => Err(ConditionError::BlankIdentifierUsed),
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        "nil" => Ok(Value::Nil),
        _ => context
            .get(name)
            .cloned()
            .ok_or_else(|| ConditionError::UndefinedVariable(name.to_string())),
    }
}

/// Converts literal source text to a value.
pub fn resolve_literal(kind: LiteralKind, text: &str) -> Result<Value> {
    match kind {
        LiteralKind::Int => parse_int(text).map(Value::SignedInt),
        LiteralKind::Float => parse_float(text).map(Value::Float),
        LiteralKind::Char => parse_char(text).map(Value::Byte),
        LiteralKind::String => parse_string(text).map(Value::String),
        LiteralKind::Imaginary => Err(ConditionError::UnsupportedLiteralKind(kind)),
    }
}

/// Parses a 64-bit signed integer, detecting the base from its prefix.
fn parse_int(text: &str) -> Result<i64> {
    let cleaned = text.replace('_', "");
    let (digits, radix) = match cleaned.get(..2) {
        Some("0x") | Some("0X") => (&cleaned[2..], 16),
        Some("0o") | Some("0O") => (&cleaned[2..], 8),
        Some("0b") | Some("0B") => (&cleaned[2..], 2),
        _ if cleaned.len() > 1 && cleaned.starts_with('0') => (&cleaned[1..], 8),
        _ => (cleaned.as_str(), 10),
    };
    i64::from_str_radix(digits, radix).map_err(|e| ConditionError::malformed(text, e.to_string()))
}

fn parse_float(text: &str) -> Result<f64> {
    text.replace('_', "")
        .parse::<f64>()
        .map_err(|e| ConditionError::malformed(text, e.to_string()))
}

/// Character literals resolve to a single byte; code points above U+00FF
/// are rejected.
fn parse_char(text: &str) -> Result<u8> {
    let body = strip_quotes(text, '\'').ok_or_else(|| ConditionError::malformed(text, "missing quotes"))?;
    let content = unescape(body).map_err(|message| ConditionError::malformed(text, message))?;

    let mut chars = content.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => u8::try_from(u32::from(c))
            .map_err(|_| ConditionError::malformed(text, "character does not fit in a byte")),
        (None, _) => Err(ConditionError::malformed(text, "empty character literal")),
        (Some(_), Some(_)) => Err(ConditionError::malformed(text, "more than one character in character literal")),
    }
}

fn parse_string(text: &str) -> Result<String> {
    if let Some(raw) = strip_quotes(text, '`') {
        return Ok(raw.to_string());
    }
    let body = strip_quotes(text, '"').ok_or_else(|| ConditionError::malformed(text, "missing quotes"))?;
    unescape(body).map_err(|message| ConditionError::malformed(text, message))
}

fn strip_quotes(text: &str, quote: char) -> Option<&str> {
    text.strip_prefix(quote)?.strip_suffix(quote)
}

/// Expands backslash escapes.
///
/// `\xHH` and three-digit octal escapes denote code points U+0000..U+00FF,
/// not raw bytes: in a string `"\xff"` is `"ÿ"`, two bytes once encoded as
/// UTF-8. A character literal holding such a code point still resolves to
/// the single byte.
fn unescape(body: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = chars.next().ok_or("trailing backslash")?;
        let decoded = match escaped {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'x' => hex_escape(&mut chars, 2)?,
            'u' => hex_escape(&mut chars, 4)?,
            'U' => hex_escape(&mut chars, 8)?,
            '0'..='7' => {
                let rest: String = chars.by_ref().take(2).collect();
                let digits = format!("{}{}", escaped, rest);
                let code = u32::from_str_radix(&digits, 8)
                    .ok()
                    .filter(|code| digits.len() == 3 && *code <= 0xFF)
                    .ok_or_else(|| format!("invalid octal escape \\{}", digits))?;
                char::from_u32(code).ok_or_else(|| format!("octal escape \\{} out of range", digits))?
            }
            other => return Err(format!("unknown escape sequence \\{}", other)),
        };
        out.push(decoded);
    }

    Ok(out)
}

fn hex_escape(chars: &mut std::str::Chars<'_>, len: usize) -> std::result::Result<char, String> {
    let digits: String = chars.by_ref().take(len).collect();
    if digits.len() != len {
        return Err(format!("escape needs {} hex digits", len));
    }
    let code = u32::from_str_radix(&digits, 16).map_err(|_| format!("invalid hex escape {}", digits))?;
    char::from_u32(code).ok_or_else(|| format!("escape {} is not a valid code point", digits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn create_test_context() -> Context {
        Context::new()
            .with("active", true)
            .with("kind", "admin")
            .with("true", false)
    }

    #[test]
    fn test_identifier_lookup() {
        let ctx = create_test_context();
        assert_eq!(resolve_identifier("kind", &ctx).unwrap(), Value::from("admin"));
        assert_eq!(
            resolve_identifier("missing", &ctx).unwrap_err(),
            ConditionError::UndefinedVariable("missing".to_string())
        );
    }

    #[test]
    fn test_keywords_shadow_context() {
        let ctx = create_test_context();
        assert_eq!(resolve_identifier("true", &ctx).unwrap(), Value::Bool(true));
        assert_eq!(resolve_identifier("false", &ctx).unwrap(), Value::Bool(false));
        assert_eq!(resolve_identifier("nil", &ctx).unwrap(), Value::Nil);
    }

    #[test]
    fn test_blank_identifier() {
        let ctx = Context::new().with("_", true);
        assert_eq!(
            resolve_identifier("_", &ctx).unwrap_err(),
            ConditionError::BlankIdentifierUsed
        );
    }

    #[rstest]
    #[case("200", 200)]
    #[case("0x1F", 31)]
    #[case("0XfF", 255)]
    #[case("0o17", 15)]
    #[case("017", 15)]
    #[case("0b101", 5)]
    #[case("1_000_000", 1_000_000)]
    #[case("0x_1F", 31)]
    #[case("0", 0)]
    #[case("9223372036854775807", i64::MAX)]
    fn test_int_literals(#[case] text: &str, #[case] expected: i64) {
        assert_eq!(
            resolve_literal(LiteralKind::Int, text).unwrap(),
            Value::SignedInt(expected)
        );
    }

    #[rstest]
    #[case("9223372036854775808")]
    #[case("09")]
    #[case("0b102")]
    fn test_malformed_int_literals(#[case] text: &str) {
        let err = resolve_literal(LiteralKind::Int, text).unwrap_err();
        assert!(matches!(err, ConditionError::MalformedLiteral { .. }), "{:?}", err);
    }

    #[rstest]
    #[case("42.314", 42.314)]
    #[case(".5", 0.5)]
    #[case("1.", 1.0)]
    #[case("1e3", 1000.0)]
    #[case("2.5E-3", 0.0025)]
    fn test_float_literals(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(
            resolve_literal(LiteralKind::Float, text).unwrap(),
            Value::Float(expected)
        );
    }

    #[rstest]
    #[case("'a'", b'a')]
    #[case("'\\n'", b'\n')]
    #[case("'\\''", b'\'')]
    #[case("'\\x41'", b'A')]
    #[case("'\\101'", b'A')]
    #[case("'\\xff'", 0xFF)]
    #[case("'é'", 0xE9)]
    fn test_char_literals(#[case] text: &str, #[case] expected: u8) {
        assert_eq!(
            resolve_literal(LiteralKind::Char, text).unwrap(),
            Value::Byte(expected)
        );
    }

    #[rstest]
    #[case("''")]
    #[case("'ab'")]
    #[case("'世'")]
    #[case("'\\q'")]
    fn test_malformed_char_literals(#[case] text: &str) {
        let err = resolve_literal(LiteralKind::Char, text).unwrap_err();
        assert!(matches!(err, ConditionError::MalformedLiteral { .. }), "{:?}", err);
    }

    #[rstest]
    #[case("\"admin\"", "admin")]
    #[case("\"\"", "")]
    #[case("\"say \\\"hi\\\"\"", "say \"hi\"")]
    #[case("\"tab\\there\"", "tab\there")]
    #[case("\"\\u00e9\"", "é")]
    #[case("`raw \\n`", "raw \\n")]
    #[case("\"\\xff\"", "\u{ff}")]
    #[case("\"\\377\"", "\u{ff}")]
    fn test_string_literals(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(
            resolve_literal(LiteralKind::String, text).unwrap(),
            Value::from(expected)
        );
    }

    #[test]
    fn test_imaginary_unsupported() {
        assert_eq!(
            resolve_literal(LiteralKind::Imaginary, "2i").unwrap_err(),
            ConditionError::UnsupportedLiteralKind(LiteralKind::Imaginary)
        );
    }

    #[test]
    fn test_resolve_rejects_compound_nodes() {
        let ctx = create_test_context();
        let expr = Expression::group(Expression::identifier("active"));
        assert!(matches!(
            resolve(&expr, &ctx),
            Err(ConditionError::UnsupportedExpression(_))
        ));
    }
}
