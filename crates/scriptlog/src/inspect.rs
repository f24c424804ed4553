//! Recursive inspection of a value's structure
//!
//! Produces an indented outline, one line per member:
//!
//! ```text
//! name - player
//! transform - {
//!   position - {
//!     x - 1
//!   }
//! }
//! ```

use crate::value::{Object, ObjectId, Value};
use std::collections::HashMap;

/// Nesting level past which objects are rendered as leaves
pub const DEFAULT_MAX_DEPTH: usize = 4;

pub const DEFAULT_INDENT: &str = "  ";

pub const CIRCULAR_REFERENCE: &str = "Circular reference detected";

#[derive(Debug, Clone)]
pub struct Inspector {
    indent: String,
    max_depth: usize,
}

impl Inspector {
    pub fn new(indent: impl Into<String>, max_depth: usize) -> Self {
        Self {
            indent: indent.into(),
            max_depth,
        }
    }

    /// Walk the members of `item`, handing each rendered line to `emit`
    ///
    /// `visited` holds every object entered so far, keyed by identity, and is
    /// shared by siblings and descendants, so an object reached a second time
    /// is reported instead of descended. Entries own a handle to their object
    /// so that an identity cannot be reused by a new object during the walk. A member whose read fails is
    /// rendered as an error line and the walk moves on.
    pub fn inspect(
        &self,
        item: &Value,
        depth: usize,
        visited: &mut HashMap<ObjectId, Object>,
        emit: &mut dyn FnMut(String),
    ) {
        let pad = self.indent.repeat(depth);

        if let Value::Object(obj) = item {
            if visited.contains_key(&obj.id()) {
                emit(format!("{}{}", pad, CIRCULAR_REFERENCE));
                return;
            }
            visited.insert(obj.id(), obj.clone());
        }

        for (key, member) in item.entries() {
            match member {
                Err(fault) => emit(format!("{}{} - ERROR: {}", pad, key, fault)),
                Ok(member @ Value::Object(_)) if depth <= self.max_depth => {
                    emit(format!("{}{} - {{", pad, key));
                    self.inspect(&member, depth + 1, visited, emit);
                    emit(format!("{}}}", pad));
                }
                Ok(member) => emit(format!("{}{} - {}", pad, key, member)),
            }
        }
    }

    /// Inspect from the top with a fresh visited set, collecting the lines
    pub fn outline(&self, item: &Value) -> Vec<String> {
        let mut lines = Vec::new();
        self.inspect(item, 0, &mut HashMap::new(), &mut |line| lines.push(line));
        lines
    }
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT, DEFAULT_MAX_DEPTH)
    }
}
