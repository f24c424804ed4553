//! Call-stack analysis
//!
//! Stack traces arrive as free text in whatever shape the host produces, e.g.
//!
//! ```text
//! Error
//!     at print (scriptlog.js:12:9)
//!     at apply (native)
//!     at onUpdate (Scripts/Player.js:40:13)
//! ```
//!
//! The analyzer finds the script file of the logical caller and removes the
//! logger's own frames. It never fails: anything unrecognized is passed through
//! or reported as `None`.

use regex::Regex;
use std::sync::OnceLock;

/// Frames produced by the host when a function is invoked through `apply`
pub const NATIVE_APPLY_MARKER: &str = "at apply (native)";

/// Script extensions recognized when no others are configured
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &[".js", ".ts"];

#[derive(Debug, Clone)]
pub struct StackAnalyzer {
    /// Script file of the logger itself, identified once at construction
    source_file: Option<String>,
    /// Lowercased extensions, each with its leading dot
    extensions: Vec<String>,
}

impl StackAnalyzer {
    /// Create an analyzer and identify the logger's own file from a stack
    /// captured where the logger was constructed
    pub fn new<I, S>(call_site_stack: &str, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| ext.len() > 1)
            .collect();

        let mut analyzer = Self {
            source_file: None,
            extensions,
        };
        analyzer.source_file = analyzer.extract_source_name(call_site_stack, true);

        log::debug!("Logger source file: {:?}", analyzer.source_file);
        analyzer
    }

    pub fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    /// Find the script file of the first eligible frame
    ///
    /// Unless `include_own_frame` is set, frames from the logger's own file
    /// are skipped. Returns `None` when no frame names a recognized script.
    pub fn extract_source_name(&self, stack: &str, include_own_frame: bool) -> Option<String> {
        stack
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter(|line| include_own_frame || !self.is_own_frame(line))
            .filter_map(frame_path)
            .map(strip_position)
            .find(|path| self.is_script(path))
            .map(str::to_string)
    }

    /// Drop blank lines, the logger's own frames and native `apply` frames
    pub fn filter_stack(&self, stack: &str) -> String {
        stack
            .lines()
            .filter(|line| !line.is_empty())
            .filter(|line| !self.is_own_frame(line) && !line.contains(NATIVE_APPLY_MARKER))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn is_own_frame(&self, line: &str) -> bool {
        self.source_file
            .as_deref()
            .is_some_and(|own| line.contains(own))
    }

    fn is_script(&self, path: &str) -> bool {
        let path = path.to_lowercase();
        self.extensions.iter().any(|ext| path.ends_with(ext.as_str()))
    }
}

impl Default for StackAnalyzer {
    fn default() -> Self {
        Self::new("", DEFAULT_SOURCE_EXTENSIONS.iter().copied())
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Locate the path-like part of a frame
///
/// `at fn (path:1:2)` yields the parenthesized text; a frame without
/// parentheses, `at path:1:2`, yields the token after `at`.
fn frame_path(line: &str) -> Option<&str> {
    static PAREN_REGEX: OnceLock<Regex> = OnceLock::new();
    static BARE_REGEX: OnceLock<Regex> = OnceLock::new();

    let paren = PAREN_REGEX.get_or_init(|| Regex::new(r"\((.*?)\)").unwrap());
    if let Some(inner) = paren.captures(line).and_then(|c| c.get(1)) {
        return Some(inner.as_str()).filter(|s| !s.is_empty());
    }

    let bare = BARE_REGEX.get_or_init(|| Regex::new(r"^\s*at\s+(\S+)\s*$").unwrap());
    bare.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Remove a trailing `:line` or `:line:col`
fn strip_position(path: &str) -> &str {
    static POSITION_REGEX: OnceLock<Regex> = OnceLock::new();

    let re = POSITION_REGEX.get_or_init(|| Regex::new(r"(?::\d+)+$").unwrap());
    match re.find(path) {
        Some(m) => &path[..m.start()],
        None => path,
    }
}
