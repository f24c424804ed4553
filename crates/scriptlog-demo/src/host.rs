//! Simulated script host
//!
//! Keeps a call stack of script functions and renders it the way a
//! JavaScript engine formats `new Error().stack`, topped by the logger
//! binding's own frames.

use std::cell::RefCell;
use std::rc::Rc;

/// Script file the logger binding lives in
pub const BINDING_FILE: &str = "Scripts/scriptlog.js";

#[derive(Debug, Clone, PartialEq)]
struct Frame {
    function: String,
    file: String,
    line: u32,
}

#[derive(Debug, Default)]
pub struct ScriptHost {
    frames: RefCell<Vec<Frame>>,
}

impl ScriptHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Run `body` as if called from `function` at `file:line`
    pub fn call<R>(&self, function: &str, file: &str, line: u32, body: impl FnOnce() -> R) -> R {
        self.frames.borrow_mut().push(Frame {
            function: function.to_string(),
            file: file.to_string(),
            line,
        });
        let result = body();
        self.frames.borrow_mut().pop();
        result
    }

    /// Stack as seen from inside the logger binding, innermost first
    pub fn stack_trace(&self) -> String {
        let mut trace = format!(
            "Error\n    at theLogger ({}:150:17)\n    at apply (native)\n    at print ({}:137:20)",
            BINDING_FILE, BINDING_FILE
        );
        for frame in self.frames.borrow().iter().rev() {
            trace.push_str(&format!(
                "\n    at {} ({}:{}:5)",
                frame.function, frame.file, frame.line
            ));
        }
        trace
    }

    /// Stack capture for [`scriptlog::Console`]
    pub fn capture(self: &Rc<Self>) -> impl Fn() -> String + 'static {
        let host = Rc::clone(self);
        move || host.stack_trace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scriptlog::StackAnalyzer;

    #[test]
    fn test_stack_without_script_frames() {
        let host = ScriptHost::new();
        assert_eq!(
            host.stack_trace(),
            "Error\n    at theLogger (Scripts/scriptlog.js:150:17)\n    at apply (native)\n    at print (Scripts/scriptlog.js:137:20)"
        );
    }

    #[test]
    fn test_nested_calls_innermost_first() {
        let host = ScriptHost::new();
        let trace = host.call("onStart", "Scripts/Game.js", 4, || {
            host.call("spawn", "Scripts/Enemy.ts", 20, || host.stack_trace())
        });
        let lines: Vec<&str> = trace.lines().collect();
        assert_eq!(lines[4], "    at spawn (Scripts/Enemy.ts:20:5)");
        assert_eq!(lines[5], "    at onStart (Scripts/Game.js:4:5)");
        assert_eq!(host.stack_trace().lines().count(), 4);
    }

    #[test]
    fn test_analyzer_finds_calling_script() {
        let host = ScriptHost::new();
        let analyzer = StackAnalyzer::new(&host.stack_trace(), [".js", ".ts"]);
        assert_eq!(analyzer.source_file(), Some(BINDING_FILE));

        let trace = host.call("spawn", "Scripts/Enemy.ts", 20, || host.stack_trace());
        assert_eq!(
            analyzer.extract_source_name(&trace, false).as_deref(),
            Some("Scripts/Enemy.ts")
        );
    }
}
