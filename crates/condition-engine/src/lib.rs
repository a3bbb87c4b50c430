//! Condition Engine
//!
//! Evaluates boolean conditions written in C-like infix syntax, such as
//! `kind == "admin" || organization == "dariocc" && !active`, against a
//! context of named values. Conditions can live in configuration files
//! without embedding a scripting language.
//!
//! Evaluation is strict about types: operands of a comparison must share a
//! kind or a numeric family, identifiers used as conditions must hold
//! booleans, and `&&`/`||` short-circuit.

pub mod ast;
pub mod compare;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod resolver;
pub mod value;

pub use ast::Expression;
pub use context::Context;
pub use error::{ConditionError, Result};
pub use evaluator::{evaluate, evaluate_expression};
pub use value::{Value, ValueKind};

/// Version of the condition engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::Expression;
    pub use crate::context::Context;
    pub use crate::error::{ConditionError, Result};
    pub use crate::evaluator::{evaluate, evaluate_expression};
    pub use crate::value::{Value, ValueKind};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    fn scenario_context() -> Context {
        Context::new()
            .with("active", true)
            .with("kind", "admin")
            .with("organization", "imdario")
            .with("uid", 200)
    }

    #[test]
    fn test_end_to_end_scenario() {
        let ctx = scenario_context();
        assert!(evaluate(r#"kind == "admin" || organization == "dariocc" && !active"#, &ctx).unwrap());
        assert!(!evaluate(
            r#"kind == "user" || kind == "operator" && !active || organization != "imdario""#,
            &ctx
        )
        .unwrap());
        assert!(evaluate("uid <= 200", &ctx).unwrap());
        assert_eq!(evaluate("_", &ctx).unwrap_err(), ConditionError::BlankIdentifierUsed);
    }

    #[test]
    fn test_context_from_configuration() {
        let ctx = Context::from_yaml(
            r#"
active: true
kind: admin
organization: imdario
uid: 200
"#,
        )
        .unwrap();
        assert_eq!(ctx, scenario_context());
        assert_eq!(
            evaluate("uid == \"200\"", &ctx).unwrap_err(),
            ConditionError::MismatchedTypes(ValueKind::SignedInt, ValueKind::String)
        );
    }

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
