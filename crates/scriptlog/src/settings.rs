//! Engine configuration and the raw output sink

use crate::record::{PrintMode, CATCH_ALL_GROUP};
use crate::stack::DEFAULT_SOURCE_EXTENSIONS;
use scriptlog_config::LoggerConfig;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Number of history entries handed to a display sink
pub const DEFAULT_HISTORY_TAIL: usize = 500;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Unknown print mode `{0}` (expected NONE, DEFAULT, PROPS or DEEP)")]
    UnknownPrintMode(String),
}

/// Where rendered lines go; the engine never interprets what it writes
pub trait RawOutput {
    fn write_line(&mut self, line: &str);
}

impl<F: FnMut(&str)> RawOutput for F {
    fn write_line(&mut self, line: &str) {
        self(line)
    }
}

/// Writes every line to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdout;

impl RawOutput for Stdout {
    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Forwards every line to the `log` facade at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacade;

impl RawOutput for LogFacade {
    fn write_line(&mut self, line: &str) {
        log::info!(target: "scriptlog", "{}", line);
    }
}

/// Process-wide engine settings, fixed once the engine is built
pub struct Settings {
    pub(crate) print_mode: PrintMode,
    pub(crate) group_filters: HashSet<String>,
    /// Whether the host configured any filter at all
    filtered: bool,
    pub(crate) show_stack: bool,
    pub(crate) show_errors: bool,
    /// Consumed by the display sink only
    pub(crate) log_to_screen: bool,
    pub(crate) source_extensions: Vec<String>,
    pub(crate) history_tail: usize,
    /// Stack captured where the engine is created
    pub(crate) call_site_stack: String,
    pub(crate) output: Box<dyn RawOutput>,
}

impl Settings {
    pub fn new(output: impl RawOutput + 'static) -> Self {
        Self {
            print_mode: PrintMode::default(),
            group_filters: catch_all(),
            filtered: false,
            show_stack: false,
            show_errors: false,
            log_to_screen: false,
            source_extensions: DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            history_tail: DEFAULT_HISTORY_TAIL,
            call_site_stack: String::new(),
            output: Box::new(output),
        }
    }

    /// Build settings from host configuration
    pub fn from_config(
        config: &LoggerConfig,
        output: impl RawOutput + 'static,
    ) -> Result<Self, SettingsError> {
        let print_mode = config.print_mode.parse()?;
        Ok(Self::new(output)
            .with_print_mode(print_mode)
            .with_group_filters(config.group_filters.iter().cloned())
            .with_show_stack(config.show_stack)
            .with_show_errors(config.show_errors)
            .with_log_to_screen(config.log_to_screen)
            .with_source_extensions(config.source_extensions.iter().cloned())
            .with_history_tail(config.history_tail))
    }

    pub fn with_print_mode(mut self, mode: PrintMode) -> Self {
        self.print_mode = mode;
        self
    }

    /// Accept only records tagged with one of `groups`; none means everything
    pub fn with_group_filters<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filters: HashSet<String> = groups
            .into_iter()
            .map(Into::into)
            .filter(|g: &String| !g.is_empty())
            .collect();
        self.filtered = !filters.is_empty();
        self.group_filters = if filters.is_empty() {
            catch_all()
        } else {
            filters
        };
        self
    }

    pub fn with_show_stack(mut self, show: bool) -> Self {
        self.show_stack = show;
        self
    }

    pub fn with_show_errors(mut self, show: bool) -> Self {
        self.show_errors = show;
        self
    }

    pub fn with_log_to_screen(mut self, enabled: bool) -> Self {
        self.log_to_screen = enabled;
        self
    }

    pub fn with_source_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_history_tail(mut self, tail: usize) -> Self {
        self.history_tail = tail;
        self
    }

    pub fn with_call_site_stack(mut self, stack: impl Into<String>) -> Self {
        self.call_site_stack = stack.into();
        self
    }

    pub fn print_mode(&self) -> PrintMode {
        self.print_mode
    }

    pub fn group_filters(&self) -> &HashSet<String> {
        &self.group_filters
    }

    /// Whether the host configured group filters, even just the catch-all
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    pub fn show_stack(&self) -> bool {
        self.show_stack
    }

    pub fn show_errors(&self) -> bool {
        self.show_errors
    }

    pub fn log_to_screen(&self) -> bool {
        self.log_to_screen
    }

    pub fn source_extensions(&self) -> &[String] {
        &self.source_extensions
    }

    pub fn history_tail(&self) -> usize {
        self.history_tail
    }

    pub fn call_site_stack(&self) -> &str {
        &self.call_site_stack
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("print_mode", &self.print_mode)
            .field("group_filters", &self.group_filters)
            .field("filtered", &self.filtered)
            .field("show_stack", &self.show_stack)
            .field("show_errors", &self.show_errors)
            .field("log_to_screen", &self.log_to_screen)
            .field("source_extensions", &self.source_extensions)
            .field("history_tail", &self.history_tail)
            .finish_non_exhaustive()
    }
}

fn catch_all() -> HashSet<String> {
    HashSet::from([CATCH_ALL_GROUP.to_string()])
}
