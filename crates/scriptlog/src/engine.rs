//! The logging engine
//!
//! [`Logger::log`] filters a record by group, resolves its note placeholders,
//! renders the value according to the print mode and emits every line through
//! the configured [`RawOutput`](crate::RawOutput). Persisted lines are kept in
//! an append-only history.

use crate::chain::{Chain, ChainError};
use crate::inspect::Inspector;
use crate::record::{LogRecord, PrintMode, CATCH_ALL_GROUP};
use crate::settings::Settings;
use crate::stack::StackAnalyzer;
use crate::value::Value;
use std::collections::HashMap;

/// Transient notice emitted at construction when group filters are active
pub const FILTERED_NOTICE: &str = "🗿 FILTERED BY GROUPS!";

/// Separates a rendered line from the stack trace appended to it
const STACK_ARROW: &str = " ➜\n";

pub struct Logger {
    settings: Settings,
    analyzer: StackAnalyzer,
    inspector: Inspector,
    history: Vec<String>,
}

impl Logger {
    pub fn new(settings: Settings) -> Self {
        let analyzer =
            StackAnalyzer::new(&settings.call_site_stack, &settings.source_extensions);

        let mut logger = Self {
            settings,
            analyzer,
            inspector: Inspector::default(),
            history: Vec::new(),
        };

        if logger.settings.is_filtered() {
            logger.emit(FILTERED_NOTICE.to_string(), true);
        }

        log::debug!("Logger ready: {:?}", logger.settings);
        logger
    }

    /// Log one record
    ///
    /// Records whose groups miss every filter are dropped silently. Faults
    /// raised by the value itself are rendered as text; only a malformed chain
    /// expression is returned as an error, before anything is emitted.
    pub fn log(&mut self, mut record: LogRecord) -> Result<(), ChainError> {
        let mode = self.settings.print_mode;
        if mode == PrintMode::None {
            return Ok(());
        }

        record.group_ids.push(CATCH_ALL_GROUP.to_string());
        if !self.accepts(&record.group_ids) {
            log::trace!("Dropped record tagged {:?}", record.group_ids);
            return Ok(());
        }

        let chain = match record.properties.as_deref() {
            Some(expr) if !expr.is_empty() => Some(self.parse_chain(expr)?),
            _ => None,
        };

        let stack = if self.settings.show_stack {
            format!(
                "{}{}",
                STACK_ARROW,
                self.analyzer.filter_stack(&record.callstack)
            )
        } else {
            String::new()
        };

        let note = self.format_note(&record, chain.as_ref());

        match mode {
            PrintMode::None => {}
            PrintMode::Default => {
                let rendered = render(&record.value, chain.as_ref());
                self.emit(format!("{}{}{}", note, rendered, stack), false);
            }
            PrintMode::Props => {
                if self.settings.show_stack {
                    self.emit(stack, true);
                }

                let entries = record.value.entries();
                if entries.is_empty() {
                    self.emit_plain(&note, &record.value, chain.as_ref());
                }
                for (key, member) in entries {
                    let rendered = match member {
                        Ok(member) => render(&member, chain.as_ref()),
                        Err(fault) => format!("{} on {}", fault, key),
                    };
                    self.emit(format!("{}{} - {}", note, key, rendered), false);
                }
            }
            PrintMode::Deep => {
                if self.settings.show_stack {
                    self.emit(stack, true);
                }

                let Logger {
                    settings,
                    inspector,
                    history,
                    ..
                } = self;
                let before = history.len();
                inspector.inspect(&record.value, 0, &mut HashMap::new(), &mut |line| {
                    emit_line(settings, history, line, false)
                });

                if self.history.len() == before {
                    self.emit_plain(&note, &record.value, None);
                }
            }
        }

        Ok(())
    }

    /// Every line persisted so far, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Script file the engine identified as its own
    pub fn source_file(&self) -> Option<&str> {
        self.analyzer.source_file()
    }

    /// Toggle handing history to a display sink; inert to the engine itself
    pub fn set_log_to_screen(&mut self, enabled: bool) {
        self.settings.log_to_screen = enabled;
    }

    /// Tear the engine down, keeping the accumulated history
    pub fn into_history(self) -> Vec<String> {
        log::debug!("Logger shut down with {} lines", self.history.len());
        self.history
    }

    fn accepts(&self, groups: &[String]) -> bool {
        groups
            .iter()
            .any(|group| self.settings.group_filters.contains(group))
    }

    fn parse_chain(&mut self, expr: &str) -> Result<Chain, ChainError> {
        match Chain::parse(expr) {
            Ok(chain) => Ok(chain),
            Err(err) => {
                log::debug!("Rejected chain expression `{}`: {}", expr, err);
                if self.settings.show_errors {
                    self.emit(format!("⚠ {}", err), true);
                }
                Err(err)
            }
        }
    }

    /// Resolve note placeholders; a non-empty note gets a `" - "` separator
    fn format_note(&self, record: &LogRecord, chain: Option<&Chain>) -> String {
        let mut note = record.note.clone();

        if note.contains("~source") {
            let source = self
                .analyzer
                .extract_source_name(&record.callstack, false)
                .unwrap_or_else(|| "null".to_string());
            note = note.replacen("~source", &source, 1);
        }
        if note.contains("~groupIds") {
            let groups = format!("[{}]", record.group_ids.join(","));
            note = note.replacen("~groupIds", &groups, 1);
        }
        if note.contains("~properties") {
            let names = chain.map(|c| c.names().join(",")).unwrap_or_default();
            note = note.replacen("~properties", &format!("[{}]", names), 1);
        }

        if note.is_empty() {
            note
        } else {
            note + " - "
        }
    }

    /// Fallback for values without members, so an accepted record is never silent
    fn emit_plain(&mut self, note: &str, value: &Value, chain: Option<&Chain>) {
        let rendered = render(value, chain);
        self.emit(format!("{}{}", note, rendered), false);
    }

    fn emit(&mut self, line: String, transient: bool) {
        emit_line(&mut self.settings, &mut self.history, line, transient);
    }
}

/// Write through the raw output; persist unless `transient`
fn emit_line(settings: &mut Settings, history: &mut Vec<String>, line: String, transient: bool) {
    settings.output.write_line(&line);
    if !transient {
        history.push(line);
    }
}

fn render(value: &Value, chain: Option<&Chain>) -> String {
    match chain {
        Some(chain) => chain.apply(value).to_string(),
        None => value.to_string(),
    }
}
