//! Dynamic script values
//!
//! Values handed to the logger come from a scripting host and carry no static
//! shape. A [`Value`] exposes enumerable named members ([`Value::keys`]),
//! member reads ([`Value::get`]) and method calls ([`Value::call_method`]);
//! absent members and failing getters are reported at runtime as [`Fault`]s.
//!
//! Objects are shared by reference, so graphs may contain cycles. Identity is
//! exposed through [`Object::id`].

use crate::builtins;
use serde_json::Value as JsonValue;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// A fault raised by a value's own behavior (a getter, a method, a missing member)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Fault {
    #[error("TypeError: {0}")]
    Type(String),

    #[error("RangeError: {0}")]
    Range(String),

    /// Anything a host function throws
    #[error("Error: {0}")]
    Thrown(String),
}

/// Signature of native functions: `(this, arguments) -> result`
pub type NativeFn = dyn Fn(&Value, &[Value]) -> Result<Value, Fault>;

/// A named callable member
#[derive(Clone)]
pub struct Function {
    name: Rc<str>,
    func: Rc<NativeFn>,
}

impl Function {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, Fault> + 'static,
    {
        Self {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with `this` bound to the value the function was read from
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value, Fault> {
        (self.func)(this, args)
    }

    fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

/// A single own property of an object
#[derive(Debug, Clone)]
pub enum Property {
    /// Plain stored value
    Data(Value),

    /// Computed on every read; may fail
    Getter(Function),
}

/// Whether an object behaves as a plain object or as an array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Plain,
    Array,
}

/// Reference identity of an object, stable for the object's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

struct ObjectData {
    kind: ObjectKind,
    /// Own properties in insertion order
    properties: Vec<(String, Property)>,
}

/// Shared, mutable bag of properties with reference identity
#[derive(Clone)]
pub struct Object(Rc<RefCell<ObjectData>>);

impl Object {
    /// Create an empty plain object
    pub fn new() -> Self {
        Self::with_kind(ObjectKind::Plain)
    }

    /// Create an array holding `items` at indices `0..n`
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        let array = Self::with_kind(ObjectKind::Array);
        for item in items {
            array.push(item);
        }
        array
    }

    fn with_kind(kind: ObjectKind) -> Self {
        Self(Rc::new(RefCell::new(ObjectData {
            kind,
            properties: Vec::new(),
        })))
    }

    pub fn kind(&self) -> ObjectKind {
        self.0.borrow().kind
    }

    pub fn is_array(&self) -> bool {
        self.kind() == ObjectKind::Array
    }

    pub fn id(&self) -> ObjectId {
        ObjectId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Set a data property, replacing an existing one in place
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.define(key.into(), Property::Data(value.into()));
        self
    }

    /// Define a computed property
    pub fn define_getter(&self, key: impl Into<String>, getter: Function) -> &Self {
        self.define(key.into(), Property::Getter(getter));
        self
    }

    /// Define a method, stored as a data property holding a function
    pub fn define_method<F>(&self, name: &str, func: F) -> &Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, Fault> + 'static,
    {
        self.set(name, Function::new(name, func))
    }

    /// Append at the next index
    pub fn push(&self, value: impl Into<Value>) {
        let index = self.len();
        self.set(index.to_string(), value);
    }

    fn define(&self, key: String, property: Property) {
        let mut data = self.0.borrow_mut();
        match data.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = property,
            None => data.properties.push((key, property)),
        }
    }

    /// Own property names in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.0
            .borrow()
            .properties
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone out an own property
    ///
    /// The borrow is released before returning so a getter may touch the
    /// object it belongs to.
    pub fn property(&self, key: &str) -> Option<Property> {
        self.0
            .borrow()
            .properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, p)| p.clone())
    }

    /// Stored data values in order; getters read as `undefined`
    pub fn values(&self) -> Vec<Value> {
        self.0
            .borrow()
            .properties
            .iter()
            .map(|(_, p)| match p {
                Property::Data(v) => v.clone(),
                Property::Getter(_) => Value::Undefined,
            })
            .collect()
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never recurse: objects may be cyclic
        f.debug_struct("Object")
            .field("id", &self.id().0)
            .field("kind", &self.kind())
            .field("keys", &self.keys())
            .finish()
    }
}

/// A script value
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(Object),
    Function(Function),
}

impl Value {
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Name reported by the script `typeof` operator
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Object(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
        }
    }

    /// Enumerable member names
    ///
    /// Objects enumerate their own properties, strings their character
    /// indices; every other value has none.
    pub fn keys(&self) -> Vec<String> {
        match self {
            Value::Object(obj) => obj.keys(),
            Value::String(s) => (0..s.chars().count()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Enumerable members paired with the result of reading each one
    ///
    /// Same order as [`Value::keys`]. Strings are walked in a single pass.
    pub fn entries(&self) -> Vec<(String, Result<Value, Fault>)> {
        match self {
            Value::String(s) => s
                .chars()
                .enumerate()
                .map(|(i, c)| (i.to_string(), Ok(Value::String(c.to_string()))))
                .collect(),
            _ => self
                .keys()
                .into_iter()
                .map(|key| {
                    let member = self.get(&key);
                    (key, member)
                })
                .collect(),
        }
    }

    /// Read a member, own properties first, then built-ins
    ///
    /// An absent member reads as `undefined`. Reading from `undefined` or
    /// `null` is a [`Fault::Type`].
    pub fn get(&self, key: &str) -> Result<Value, Fault> {
        match self {
            Value::Undefined | Value::Null => Err(Fault::Type(format!(
                "Cannot read properties of {} (reading '{}')",
                self, key
            ))),
            Value::Object(obj) => match obj.property(key) {
                Some(Property::Data(value)) => Ok(value),
                Some(Property::Getter(getter)) => getter.call(self, &[]),
                None => Ok(builtins::member(self, key).unwrap_or_default()),
            },
            Value::String(s) => match key.parse::<usize>() {
                Ok(index) => Ok(s
                    .chars()
                    .nth(index)
                    .map(|c| Value::String(c.to_string()))
                    .unwrap_or_default()),
                Err(_) => Ok(builtins::member(self, key).unwrap_or_default()),
            },
            _ => Ok(builtins::member(self, key).unwrap_or_default()),
        }
    }

    /// Read `name` and invoke it with `this` bound to `self`
    pub fn call_method(&self, name: &str, args: &[Value]) -> Result<Value, Fault> {
        match self.get(name)? {
            Value::Function(func) => func.call(self, args),
            _ => Err(Fault::Type(format!("{} is not a function", name))),
        }
    }

    /// Join array elements with `separator`, rendering nullish elements empty
    pub(crate) fn join(array: &Object, separator: &str) -> String {
        let mut out = String::new();
        write_elements(array, separator, &mut out, &mut HashSet::new());
        out
    }

    fn write_text(&self, out: &mut String, seen: &mut HashSet<ObjectId>) {
        match self {
            Value::Undefined => out.push_str("undefined"),
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => out.push_str(&format_number(*n)),
            Value::String(s) => out.push_str(s),
            Value::Object(obj) if obj.is_array() => write_elements(obj, ",", out, seen),
            Value::Object(_) => out.push_str("[object Object]"),
            Value::Function(func) => {
                out.push_str("function ");
                out.push_str(func.name());
                out.push_str("() { [native code] }");
            }
        }
    }
}

fn write_elements(array: &Object, separator: &str, out: &mut String, seen: &mut HashSet<ObjectId>) {
    // An array nested inside itself renders empty at the back-edge
    if !seen.insert(array.id()) {
        return;
    }
    for (i, element) in array.values().iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        if !element.is_nullish() {
            element.write_text(out, seen);
        }
    }
    seen.remove(&array.id());
}

/// Render a number the way script string conversion does
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.abs() >= 1e21 {
        let text = format!("{:e}", n);
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        };
    }
    if n.abs() < 1e-6 {
        return format!("{:e}", n);
    }
    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_text(&mut out, &mut HashSet::new());
        f.write_str(&out)
    }
}

impl PartialEq for Value {
    /// Primitives compare by value, objects and functions by identity
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl From<&Object> for Value {
    fn from(obj: &Object) -> Self {
        Value::Object(obj.clone())
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Object(Object::array(items))
    }
}

impl From<JsonValue> for Value {
    /// Decode JSON data; objects keep their key order
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => {
                Value::Object(Object::array(items.into_iter().map(Value::from)))
            }
            JsonValue::Object(map) => {
                let obj = Object::new();
                for (key, value) in map {
                    obj.set(key, Value::from(value));
                }
                Value::Object(obj)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(1e21), "1e+21");
    }

    #[test]
    fn test_format_small_numbers() {
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(-2.5e-8), "-2.5e-8");
    }

    #[test]
    fn test_entries_pair_keys_with_reads() {
        let obj = Object::new();
        obj.set("a", 1);
        obj.define_getter(
            "b",
            Function::new("b", |_, _| Err(Fault::Thrown("nope".into()))),
        );
        let entries = Value::from(&obj).entries();
        assert_eq!(entries[0], ("a".to_string(), Ok(Value::from(1))));
        assert_eq!(entries[1], ("b".to_string(), Err(Fault::Thrown("nope".into()))));

        let chars = Value::from("hé").entries();
        assert_eq!(chars[1], ("1".to_string(), Ok(Value::from("é"))));
        assert!(Value::from(3).entries().is_empty());
    }

    #[test]
    fn test_display_matches_script_conversion() {
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::from(json!({"a": 1})).to_string(), "[object Object]");
        assert_eq!(Value::from(json!([1, null, "x", [2, 3]])).to_string(), "1,,x,2,3");

        let func = Function::new("update", |_, _| Ok(Value::Undefined));
        assert_eq!(
            Value::from(func).to_string(),
            "function update() { [native code] }"
        );
    }

    #[test]
    fn test_self_containing_array_renders() {
        let array = Object::array(vec![Value::from(1)]);
        array.push(&array);
        assert_eq!(Value::from(&array).to_string(), "1,");
    }

    #[test]
    fn test_json_keeps_key_order() {
        let value = Value::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        assert_eq!(value.keys(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_keys_of_primitives() {
        assert_eq!(Value::from("ab").keys(), vec!["0", "1"]);
        assert!(Value::from(3).keys().is_empty());
        assert!(Value::Null.keys().is_empty());
    }

    #[test]
    fn test_get_reads_own_then_builtin_members() {
        let value = Value::from(json!({"name": "cube", "tags": ["a", "b"]}));
        assert_eq!(value.get("name").unwrap(), Value::from("cube"));
        assert_eq!(value.get("missing").unwrap(), Value::Undefined);

        let tags = value.get("tags").unwrap();
        assert_eq!(tags.get("length").unwrap(), Value::from(2));
        assert_eq!(tags.get("1").unwrap(), Value::from("b"));
        assert_eq!(Value::from("xyz").get("1").unwrap(), Value::from("y"));
    }

    #[test]
    fn test_get_from_nullish_faults() {
        let err = Value::Undefined.get("x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "TypeError: Cannot read properties of undefined (reading 'x')"
        );
    }

    #[test]
    fn test_getter_faults_propagate() {
        let obj = Object::new();
        obj.define_getter(
            "broken",
            Function::new("broken", |_, _| Err(Fault::Thrown("boom".into()))),
        );
        let err = Value::from(&obj).get("broken").unwrap_err();
        assert_eq!(err, Fault::Thrown("boom".into()));
    }

    #[test]
    fn test_getter_may_read_its_own_object() {
        let obj = Object::new();
        obj.set("width", 4);
        obj.define_getter(
            "area",
            Function::new("area", |this, _| {
                let width = match this.get("width")? {
                    Value::Number(n) => n,
                    _ => 0.0,
                };
                Ok(Value::from(width * width))
            }),
        );
        assert_eq!(Value::from(&obj).get("area").unwrap(), Value::from(16));
    }

    #[test]
    fn test_call_method_binds_this() {
        let obj = Object::new();
        obj.set("label", "door");
        obj.define_method("describe", |this, args| {
            Ok(Value::from(format!("{}:{}", this.get("label")?, args.len())))
        });
        let value = Value::from(&obj);
        assert_eq!(
            value.call_method("describe", &[Value::Null]).unwrap(),
            Value::from("door:1")
        );

        let err = value.call_method("label", &[]).unwrap_err();
        assert_eq!(err, Fault::Type("label is not a function".into()));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let obj = Object::new();
        obj.set("a", 1).set("b", 2).set("a", 3);
        assert_eq!(obj.keys(), vec!["a", "b"]);
        assert_eq!(Value::from(&obj).get("a").unwrap(), Value::from(3));
    }

    #[test]
    fn test_equality_is_identity_for_objects() {
        let a = Object::new();
        let b = Object::new();
        assert_eq!(Value::from(&a), Value::from(&a));
        assert_ne!(Value::from(&a), Value::from(&b));
        assert_ne!(a.id(), b.id());
    }
}
