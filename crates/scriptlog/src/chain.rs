//! Chain expressions
//!
//! A chain expression names the property reads and method calls to apply, left
//! to right, to a logged value before it is rendered:
//!
//! ```text
//! transform.getWorldPosition().toString()
//! items.slice(0, 2).join(' | ')
//! ```
//!
//! Call arguments are a JSON-like literal list; single quotes are accepted for
//! strings.

use crate::value::{Fault, Value};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors in the text of a chain expression
///
/// These are programmer errors at the call site and abort the logging call.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Failed to parse arguments of `{method}`: {source}")]
    InvalidArguments {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unclosed call in `{segment}`")]
    UnclosedCall { segment: String },
}

/// One step of a chain
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// `name`
    Property { name: String },

    /// `name(args...)`
    Call { name: String, args: Vec<Value> },
}

impl Step {
    pub fn name(&self) -> &str {
        match self {
            Step::Property { name } | Step::Call { name, .. } => name,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Step::Call { .. })
    }

    pub fn args(&self) -> &[Value] {
        match self {
            Step::Property { .. } => &[],
            Step::Call { args, .. } => args,
        }
    }
}

/// The step at which evaluation stopped, and why
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{fault} on {step}")]
pub struct StepFault {
    pub step: String,
    pub fault: Fault,
}

/// A parsed chain expression
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chain {
    steps: Vec<Step>,
}

impl Chain {
    /// Parse an expression such as `foo.bar(1, 'x').baz`
    pub fn parse(expr: &str) -> Result<Self, ChainError> {
        let steps = split_chain(expr)
            .into_iter()
            .map(parse_segment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Step names in order, without arguments
    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(Step::name).collect()
    }

    /// Evaluate against `value`, stopping at the first failing step
    ///
    /// A property that reads as `undefined` counts as a failure.
    pub fn try_apply(&self, value: &Value) -> Result<Value, StepFault> {
        self.steps.iter().try_fold(value.clone(), |current, step| {
            let result = match step {
                Step::Property { name } => match current.get(name) {
                    Ok(Value::Undefined) => {
                        Err(Fault::Type(format!("{} is undefined", name)))
                    }
                    other => other,
                },
                Step::Call { name, args } => current.call_method(name, args),
            };
            result.map_err(|fault| StepFault {
                step: step.name().to_string(),
                fault,
            })
        })
    }

    /// Evaluate against `value`; a failure yields its description as a string
    pub fn apply(&self, value: &Value) -> Value {
        self.try_apply(value)
            .unwrap_or_else(|fault| Value::String(fault.to_string()))
    }
}

/// Split on `.` outside of parentheses and quotes
///
/// A single pass over the whole expression; segments are not re-scanned.
pub fn split_chain(expr: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in expr.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                '.' if depth == 0 => {
                    segments.push(&expr[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    segments.push(&expr[start..]);
    segments
}

/// Parse one segment into a property or call step
pub fn parse_segment(segment: &str) -> Result<Step, ChainError> {
    static CALL_REGEX: OnceLock<Regex> = OnceLock::new();

    let re = CALL_REGEX.get_or_init(|| {
        // Identifier followed by an opening parenthesis
        Regex::new(r"^(\w+)\s*\(").unwrap()
    });

    let Some(captures) = re.captures(segment) else {
        return Ok(Step::Property {
            name: segment.to_string(),
        });
    };

    let name = captures[1].to_string();
    let opening = captures.get(0).map_or(0, |m| m.end());
    let Some(inner) = segment[opening..].strip_suffix(')') else {
        return Err(ChainError::UnclosedCall {
            segment: segment.to_string(),
        });
    };

    let inner = inner.trim();
    if inner.is_empty() {
        return Ok(Step::Call {
            name,
            args: Vec::new(),
        });
    }

    let literal = format!("[{}]", inner.replace('\'', "\""));
    let args = serde_json::from_str::<Vec<JsonValue>>(&literal)
        .map_err(|source| ChainError::InvalidArguments {
            method: name.clone(),
            source,
        })?
        .into_iter()
        .map(Value::from)
        .collect();

    Ok(Step::Call { name, args })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;
    use pretty_assertions::assert_eq;

    fn property(name: &str) -> Step {
        Step::Property {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_parse_property_and_call_steps() {
        let chain = Chain::parse("a.b('x,y').c").unwrap();
        assert_eq!(
            chain.steps(),
            &[
                property("a"),
                Step::Call {
                    name: "b".to_string(),
                    args: vec![Value::from("x,y")],
                },
                property("c"),
            ]
        );
        assert_eq!(chain.names(), vec!["a", "b", "c"]);
        assert!(chain.steps()[1].is_call());
        assert!(!chain.steps()[0].is_call());
    }

    #[test]
    fn test_split_ignores_dots_in_quotes_and_calls() {
        assert_eq!(split_chain("foo('a.b').bar"), vec!["foo('a.b')", "bar"]);
        assert_eq!(split_chain("f(1.5, \"x.y\").g"), vec!["f(1.5, \"x.y\")", "g"]);
        assert_eq!(split_chain("plain"), vec!["plain"]);
        assert_eq!(Chain::parse("foo('a.b').bar").unwrap().steps().len(), 2);
    }

    #[test]
    fn test_parse_segment_arguments() {
        let step = parse_segment("slice(0, -2)").unwrap();
        assert_eq!(step.args(), &[Value::from(0), Value::from(-2)]);

        let step = parse_segment("find ('key', true, null)").unwrap();
        assert_eq!(step.name(), "find");
        assert_eq!(
            step.args(),
            &[Value::from("key"), Value::from(true), Value::Null]
        );

        let step = parse_segment("update()").unwrap();
        assert!(step.is_call());
        assert!(step.args().is_empty());
    }

    #[test]
    fn test_malformed_arguments_fail() {
        let err = parse_segment("f(1,)").unwrap_err();
        assert!(matches!(err, ChainError::InvalidArguments { ref method, .. } if method == "f"));
        assert!(Chain::parse("ok.f(1,)").is_err());
    }

    #[test]
    fn test_unclosed_call_fails() {
        let err = parse_segment("f(1").unwrap_err();
        assert!(matches!(err, ChainError::UnclosedCall { .. }));
    }

    #[test]
    fn test_apply_matches_direct_access() {
        let inner = Object::new();
        inner.set("c", 42);
        let a = Object::new();
        let returned = inner.clone();
        a.define_method("b", move |_, args| {
            assert_eq!(args, &[Value::from("x,y")]);
            Ok(Value::from(&returned))
        });
        let root = Object::new();
        root.set("a", &a);
        let root = Value::from(&root);

        let direct = root
            .get("a")
            .unwrap()
            .call_method("b", &[Value::from("x,y")])
            .unwrap()
            .get("c")
            .unwrap();

        let chain = Chain::parse("a.b('x,y').c").unwrap();
        assert_eq!(chain.apply(&root), direct);
        assert_eq!(chain.apply(&root), Value::from(42));
    }

    #[test]
    fn test_apply_with_builtins() {
        let chain = Chain::parse("name.toUpperCase().slice(0, 3)").unwrap();
        let value = Value::from(serde_json::json!({"name": "camera"}));
        assert_eq!(chain.apply(&value), Value::from("CAM"));
    }

    #[test]
    fn test_missing_member_becomes_error_text() {
        let chain = Chain::parse("a.missing.deeper").unwrap();
        let value = Value::from(serde_json::json!({"a": {}}));
        let err = chain.try_apply(&value).unwrap_err();
        assert_eq!(err.step, "missing");
        assert_eq!(
            chain.apply(&value),
            Value::from("TypeError: missing is undefined on missing")
        );
    }

    #[test]
    fn test_throwing_method_becomes_error_text() {
        let obj = Object::new();
        obj.define_method("explode", |_, _| Err(Fault::Thrown("kaboom".into())));
        let chain = Chain::parse("explode()").unwrap();
        assert_eq!(
            chain.apply(&Value::from(&obj)),
            Value::from("Error: kaboom on explode")
        );
    }

    #[test]
    fn test_calling_a_property_fails_at_that_step() {
        let chain = Chain::parse("length()").unwrap();
        assert_eq!(
            chain.apply(&Value::from("abc")),
            Value::from("TypeError: length is not a function on length")
        );
    }
}
