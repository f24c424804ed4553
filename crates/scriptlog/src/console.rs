//! Call-site facade
//!
//! [`Console`] is what script bindings call instead of the host's own print:
//! it captures a fresh stack for every call, builds the [`LogRecord`], runs it
//! through the [`Logger`] and hands the newest history to a [`DisplaySink`]
//! when on-screen logging is enabled.

use crate::chain::ChainError;
use crate::engine::Logger;
use crate::record::{LogArgs, LogRecord};
use crate::settings::Settings;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Produces the current call stack as text
pub trait StackCapture {
    fn capture(&self) -> String;
}

impl<F: Fn() -> String> StackCapture for F {
    fn capture(&self) -> String {
        self()
    }
}

/// Presentation layer for accumulated log lines
///
/// Receives the newest lines, oldest first, after every call that added to
/// the history. A sink owns its presentation state and never calls back into
/// the engine.
pub trait DisplaySink {
    fn render(&mut self, lines: &[String]);
}

impl<S: DisplaySink> DisplaySink for Rc<RefCell<S>> {
    fn render(&mut self, lines: &[String]) {
        self.borrow_mut().render(lines);
    }
}

pub struct Console {
    logger: Logger,
    stack: Box<dyn StackCapture>,
    sink: Option<Box<dyn DisplaySink>>,
}

impl Console {
    /// Build the engine; without an explicit call-site stack, the stack
    /// captured here identifies the logger's own frames
    pub fn new(settings: Settings, stack: impl StackCapture + 'static) -> Self {
        let settings = if settings.call_site_stack().is_empty() {
            let own = stack.capture();
            settings.with_call_site_stack(own)
        } else {
            settings
        };

        Self {
            logger: Logger::new(settings),
            stack: Box::new(stack),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: impl DisplaySink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Log `value` from the current call site
    pub fn print(&mut self, value: impl Into<Value>, args: LogArgs) -> Result<(), ChainError> {
        let record = LogRecord {
            value: value.into(),
            callstack: self.stack.capture(),
            note: args.note,
            group_ids: args.groups,
            properties: args.properties,
        };

        let before = self.logger.history().len();
        self.logger.log(record)?;
        if self.logger.history().len() > before {
            self.refresh_sink();
        }
        Ok(())
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn history(&self) -> &[String] {
        self.logger.history()
    }

    /// Enable or disable handing history to the sink
    pub fn set_log_to_screen(&mut self, enabled: bool) {
        self.logger.set_log_to_screen(enabled);
        if enabled {
            self.refresh_sink();
        }
    }

    pub fn into_history(self) -> Vec<String> {
        self.logger.into_history()
    }

    fn refresh_sink(&mut self) {
        if !self.logger.settings().log_to_screen() {
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let history = self.logger.history();
        if history.is_empty() {
            return;
        }
        let start = history
            .len()
            .saturating_sub(self.logger.settings().history_tail());
        sink.render(&history[start..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PrintMode;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[derive(Default)]
    struct RecordingSink {
        renders: Vec<Vec<String>>,
    }

    impl DisplaySink for RecordingSink {
        fn render(&mut self, lines: &[String]) {
            self.renders.push(lines.to_vec());
        }
    }

    fn script_stack() -> impl Fn() -> String {
        let calls = Cell::new(0);
        move || {
            calls.set(calls.get() + 1);
            format!(
                "Error\n    at theLogger (Scripts/scriptlog.js:150:17)\n    at onTap (Scripts/Menu.js:{}:9)",
                calls.get()
            )
        }
    }

    #[test]
    fn test_print_captures_call_site() {
        let mut console = Console::new(Settings::new(|_: &str| {}), script_stack());
        assert_eq!(console.logger().source_file(), Some("Scripts/scriptlog.js"));

        console
            .print("tapped", LogArgs::new().note("~source").groups(["ui"]))
            .unwrap();
        assert_eq!(console.history(), &["Scripts/Menu.js - tapped"]);
    }

    #[test]
    fn test_sink_receives_tail_when_enabled() {
        let sink = Rc::new(RefCell::new(RecordingSink::default()));
        let settings = Settings::new(|_: &str| {})
            .with_log_to_screen(true)
            .with_history_tail(2);
        let mut console = Console::new(settings, script_stack()).with_sink(Rc::clone(&sink));

        for i in 0..3 {
            console.print(i, LogArgs::new()).unwrap();
        }

        let sink = sink.borrow();
        let renders = &sink.renders;
        assert_eq!(renders.len(), 3);
        assert_eq!(renders[0], vec!["0"]);
        assert_eq!(renders[2], vec!["1", "2"]);
        assert_eq!(console.history().len(), 3);
    }

    #[test]
    fn test_sink_idle_when_disabled_or_filtered() {
        let sink = Rc::new(RefCell::new(RecordingSink::default()));
        let settings = Settings::new(|_: &str| {}).with_group_filters(["net"]);
        let mut console = Console::new(settings, script_stack()).with_sink(Rc::clone(&sink));

        console.print("hidden", LogArgs::new().groups(["net"])).unwrap();
        assert!(sink.borrow().renders.is_empty());

        console.set_log_to_screen(true);
        console.print("filtered", LogArgs::new().groups(["ui"])).unwrap();
        assert_eq!(sink.borrow().renders, vec![vec!["hidden".to_string()]]);
    }

    #[test]
    fn test_print_propagates_chain_errors() {
        let settings = Settings::new(|_: &str| {}).with_print_mode(PrintMode::Props);
        let mut console = Console::new(settings, script_stack());
        assert!(console
            .print(1, LogArgs::new().properties("bad(1,)"))
            .is_err());
        assert!(console.history().is_empty());
    }
}
