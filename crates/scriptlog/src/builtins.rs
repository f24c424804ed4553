//! Built-in members of primitives, arrays and objects
//!
//! These are never enumerated; they only answer member reads that no own
//! property satisfies.

use crate::value::{format_number, Fault, Function, Object, Value};

type StrMethod = fn(&str, &[Value]) -> Result<Value, Fault>;
type ArrayMethod = fn(&Object, &[Value]) -> Result<Value, Fault>;
type NumberMethod = fn(f64, &[Value]) -> Result<Value, Fault>;

/// Resolve a built-in member of `this`
pub(crate) fn member(this: &Value, key: &str) -> Option<Value> {
    match (this, key) {
        (Value::String(s), "length") => Some(Value::from(s.chars().count())),
        (Value::Object(obj), "length") if obj.is_array() => Some(Value::from(obj.len())),
        (Value::Function(func), "name") => Some(Value::from(func.name())),
        (Value::String(_), _) => string_method(key),
        (Value::Object(obj), _) if obj.is_array() => array_method(key),
        (Value::Object(_), _) => object_method(key),
        (Value::Number(_), _) => number_method(key),
        (Value::Bool(_), "toString") => Some(Value::from(Function::new(key, |this, _| {
            Ok(Value::from(this.to_string()))
        }))),
        _ => None,
    }
}

fn string_method(name: &str) -> Option<Value> {
    let method: StrMethod = match name {
        "toString" => |s, _| Ok(Value::from(s)),
        "toUpperCase" => |s, _| Ok(Value::from(s.to_uppercase())),
        "toLowerCase" => |s, _| Ok(Value::from(s.to_lowercase())),
        "trim" => |s, _| Ok(Value::from(s.trim())),
        "includes" => |s, args| Ok(Value::from(s.contains(arg_text(args, 0).as_str()))),
        "startsWith" => |s, args| Ok(Value::from(s.starts_with(arg_text(args, 0).as_str()))),
        "endsWith" => |s, args| Ok(Value::from(s.ends_with(arg_text(args, 0).as_str()))),
        "charAt" => |s, args| {
            let index = arg_number(args, 0).unwrap_or(0.0);
            let c = if index < 0.0 {
                None
            } else {
                s.chars().nth(index as usize)
            };
            Ok(Value::from(c.map(String::from).unwrap_or_default()))
        },
        "slice" => |s, args| {
            let chars: Vec<char> = s.chars().collect();
            let (start, end) = slice_bounds(args, chars.len());
            Ok(Value::from(chars[start..end].iter().collect::<String>()))
        },
        "split" => |s, args| {
            let parts: Vec<Value> = match args.first() {
                None | Some(Value::Undefined) => vec![Value::from(s)],
                Some(sep) => {
                    let sep = sep.to_string();
                    if sep.is_empty() {
                        s.chars().map(|c| Value::from(c.to_string())).collect()
                    } else {
                        s.split(sep.as_str()).map(Value::from).collect()
                    }
                }
            };
            Ok(Value::from(parts))
        },
        _ => return None,
    };

    Some(Value::from(Function::new(name, move |this, args| match this {
        Value::String(s) => method(s, args),
        other => Err(receiver_mismatch("String", other)),
    })))
}

fn array_method(name: &str) -> Option<Value> {
    let method: ArrayMethod = match name {
        "toString" => |array, _| Ok(Value::from(Value::join(array, ","))),
        "join" => |array, args| {
            let separator = match args.first() {
                None | Some(Value::Undefined) => ",".to_string(),
                Some(sep) => sep.to_string(),
            };
            Ok(Value::from(Value::join(array, &separator)))
        },
        "includes" => |array, args| {
            let needle = args.first().cloned().unwrap_or_default();
            Ok(Value::from(array.values().contains(&needle)))
        },
        "indexOf" => |array, args| {
            let needle = args.first().cloned().unwrap_or_default();
            let index = array
                .values()
                .iter()
                .position(|v| *v == needle)
                .map_or(-1.0, |i| i as f64);
            Ok(Value::from(index))
        },
        "slice" => |array, args| {
            let values = array.values();
            let (start, end) = slice_bounds(args, values.len());
            Ok(Value::from(values[start..end].to_vec()))
        },
        _ => return None,
    };

    Some(Value::from(Function::new(name, move |this, args| match this {
        Value::Object(obj) if obj.is_array() => method(obj, args),
        other => Err(receiver_mismatch("Array", other)),
    })))
}

fn object_method(name: &str) -> Option<Value> {
    let func = match name {
        "toString" => Function::new(name, |_, _| Ok(Value::from("[object Object]"))),
        "hasOwnProperty" => Function::new(name, |this, args| {
            let key = arg_text(args, 0);
            Ok(Value::from(match this {
                Value::Object(obj) => obj.property(&key).is_some(),
                _ => false,
            }))
        }),
        _ => return None,
    };
    Some(Value::from(func))
}

fn number_method(name: &str) -> Option<Value> {
    let method: NumberMethod = match name {
        "toString" => |n, _| Ok(Value::from(format_number(n))),
        "toFixed" => |n, args| {
            let digits = arg_number(args, 0).unwrap_or(0.0);
            if !(0.0..=100.0).contains(&digits) {
                return Err(Fault::Range(
                    "toFixed() digits argument must be between 0 and 100".to_string(),
                ));
            }
            Ok(Value::from(format!("{:.*}", digits as usize, n)))
        },
        _ => return None,
    };

    Some(Value::from(Function::new(name, move |this, args| match this {
        Value::Number(n) => method(*n, args),
        other => Err(receiver_mismatch("Number", other)),
    })))
}

fn receiver_mismatch(expected: &str, actual: &Value) -> Fault {
    Fault::Type(format!(
        "{} method called on incompatible receiver {}",
        expected,
        actual.type_name()
    ))
}

fn arg_text(args: &[Value], index: usize) -> String {
    args.get(index).cloned().unwrap_or_default().to_string()
}

fn arg_number(args: &[Value], index: usize) -> Option<f64> {
    match args.get(index)? {
        Value::Number(n) => Some(*n),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Resolve `slice(start, end)` arguments; negative positions count from the end
fn slice_bounds(args: &[Value], len: usize) -> (usize, usize) {
    let resolve = |arg: Option<f64>, default: usize| match arg {
        None => default,
        Some(n) if n < 0.0 => len.saturating_sub((-n) as usize),
        Some(n) => (n as usize).min(len),
    };
    let start = resolve(arg_number(args, 0), 0);
    let end = resolve(arg_number(args, 1), len);
    (start, end.max(start))
}
