//! Log records and print modes

use crate::settings::SettingsError;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Group appended to every record; matched by the default filter set
pub const CATCH_ALL_GROUP: &str = "_any";

/// Rendering strategy for a record's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintMode {
    /// Suppress all output
    None,
    /// The value's own string conversion
    #[default]
    Default,
    /// One line per enumerable top-level member
    Props,
    /// Recursive outline of the whole structure
    Deep,
}

impl PrintMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrintMode::None => "NONE",
            PrintMode::Default => "DEFAULT",
            PrintMode::Props => "PROPS",
            PrintMode::Deep => "DEEP",
        }
    }
}

impl FromStr for PrintMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NONE" => Ok(PrintMode::None),
            "DEFAULT" => Ok(PrintMode::Default),
            "PROPS" => Ok(PrintMode::Props),
            "DEEP" => Ok(PrintMode::Deep),
            _ => Err(SettingsError::UnknownPrintMode(s.to_string())),
        }
    }
}

impl fmt::Display for PrintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything passed to the engine for one logging call
///
/// The note may contain the placeholders `~source`, `~groupIds` and
/// `~properties`, substituted when the record is formatted.
#[derive(Debug, Clone, Default)]
pub struct LogRecord {
    /// The item being logged
    pub value: Value,
    /// Raw stack trace captured at the call site
    pub callstack: String,
    pub note: String,
    /// Tags matched against the group filters
    pub group_ids: Vec<String>,
    /// Chain expression applied to the value before rendering
    pub properties: Option<String>,
}

impl LogRecord {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_callstack(mut self, callstack: impl Into<String>) -> Self {
        self.callstack = callstack.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_ids = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_properties(mut self, expr: impl Into<String>) -> Self {
        self.properties = Some(expr.into());
        self
    }
}

/// Optional arguments of a call-site `print`
#[derive(Debug, Clone, Default)]
pub struct LogArgs {
    pub note: String,
    pub groups: Vec<String>,
    pub properties: Option<String>,
}

impl LogArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn properties(mut self, expr: impl Into<String>) -> Self {
        self.properties = Some(expr.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_mode_from_name() {
        assert_eq!("DEEP".parse::<PrintMode>().unwrap(), PrintMode::Deep);
        assert_eq!(" props ".parse::<PrintMode>().unwrap(), PrintMode::Props);
        assert_eq!("None".parse::<PrintMode>().unwrap(), PrintMode::None);
        assert!("VERBOSE".parse::<PrintMode>().is_err());
        assert_eq!(PrintMode::default().to_string(), "DEFAULT");
    }

    #[test]
    fn test_record_builder() {
        let record = LogRecord::new("hello")
            .with_note("greeting")
            .with_groups(["ui", "net"])
            .with_properties("length");
        assert_eq!(record.value, Value::from("hello"));
        assert_eq!(record.group_ids, vec!["ui", "net"]);
        assert_eq!(record.properties.as_deref(), Some("length"));
        assert!(record.callstack.is_empty());
    }
}
