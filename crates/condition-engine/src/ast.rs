//! Expression tree types.

use std::fmt;

/// Binary operators recognized by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    And,
    Or,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Rem => "%",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary operators recognized by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Neg,
}

impl UnaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Neg => "-",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lexical kind of a literal, as written in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    Imaginary,
    Char,
    String,
}

impl LiteralKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiteralKind::Int => "INT",
            LiteralKind::Float => "FLOAT",
            LiteralKind::Imaginary => "IMAG",
            LiteralKind::Char => "CHAR",
            LiteralKind::String => "STRING",
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node kind tag, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    BinaryOp,
    UnaryOp,
    Identifier,
    Literal,
    Group,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::BinaryOp => "binary expression",
            NodeKind::UnaryOp => "unary expression",
            NodeKind::Identifier => "identifier",
            NodeKind::Literal => "literal",
            NodeKind::Group => "parenthesized expression",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed expression.
///
/// Literals keep their source text verbatim (quotes, prefixes and
/// separators included); turning text into a value is the resolver's job.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    Identifier {
        name: String,
    },
    Literal {
        kind: LiteralKind,
        text: String,
    },
    Group {
        inner: Box<Expression>,
    },
}

impl Expression {
    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier { name: name.into() }
    }

    pub fn literal(kind: LiteralKind, text: impl Into<String>) -> Self {
        Expression::Literal {
            kind,
            text: text.into(),
        }
    }

    pub fn group(inner: Expression) -> Self {
        Expression::Group {
            inner: Box::new(inner),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::BinaryOp { .. } => NodeKind::BinaryOp,
            Expression::UnaryOp { .. } => NodeKind::UnaryOp,
            Expression::Identifier { .. } => NodeKind::Identifier,
            Expression::Literal { .. } => NodeKind::Literal,
            Expression::Group { .. } => NodeKind::Group,
        }
    }

    /// Strips any chain of nested groups, returning the innermost node.
    pub fn ungrouped(&self) -> &Expression {
        let mut expr = self;
        while let Expression::Group { inner } = expr {
            expr = inner;
        }
        expr
    }

    /// Number of nodes on the longest path from this node down to a leaf.
    pub fn height(&self) -> usize {
        match self {
            Expression::BinaryOp { left, right, .. } => 1 + left.height().max(right.height()),
            Expression::UnaryOp { operand, .. } => 1 + operand.height(),
            Expression::Group { inner } => 1 + inner.height(),
            Expression::Identifier { .. } | Expression::Literal { .. } => 1,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::BinaryOp { op, left, right } => write!(f, "{} {} {}", left, op, right),
            Expression::UnaryOp { op, operand } => write!(f, "{}{}", op, operand),
            Expression::Identifier { name } => f.write_str(name),
            Expression::Literal { text, .. } => f.write_str(text),
            Expression::Group { inner } => write!(f, "({})", inner),
        }
    }
}
