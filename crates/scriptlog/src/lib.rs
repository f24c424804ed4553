//! scriptlog
//!
//! A structured logging engine for embedded scripting environments where the
//! host console is limited. Records are filtered by group tags and rendered in
//! one of four print modes:
//!
//! - `NONE`: nothing is printed
//! - `DEFAULT`: the value's string conversion, after an optional chain
//!   expression (`name.toUpperCase()`) has been applied
//! - `PROPS`: one line per enumerable member, each run through the chain
//! - `DEEP`: a recursive, cycle-safe outline bounded at depth 4
//!
//! Stack traces are trimmed of the logger's own frames and the caller's script
//! file can be spliced into the note with `~source`.
//!
//! # Example
//!
//! ```
//! use scriptlog::{Console, LogArgs, PrintMode, Settings, Value};
//!
//! let settings = Settings::new(|line: &str| println!("{}", line))
//!     .with_print_mode(PrintMode::Default);
//! let mut console = Console::new(settings, || {
//!     "Error\n    at print (scriptlog.js:1:1)\n    at onStart (main.js:3:5)".to_string()
//! });
//!
//! let player = Value::from(serde_json::json!({"name": "ada", "hp": 12}));
//! console.print(player, LogArgs::new().note("~source").properties("name.toUpperCase()"))?;
//!
//! assert_eq!(console.history(), &["main.js - ADA"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builtins;
mod chain;
mod console;
mod engine;
mod inspect;
mod record;
mod settings;
mod stack;
mod value;

pub use chain::{parse_segment, split_chain, Chain, ChainError, Step, StepFault};
pub use console::{Console, DisplaySink, StackCapture};
pub use engine::{Logger, FILTERED_NOTICE};
pub use inspect::{Inspector, CIRCULAR_REFERENCE, DEFAULT_INDENT, DEFAULT_MAX_DEPTH};
pub use record::{LogArgs, LogRecord, PrintMode, CATCH_ALL_GROUP};
pub use settings::{LogFacade, RawOutput, Settings, SettingsError, Stdout, DEFAULT_HISTORY_TAIL};
pub use stack::{StackAnalyzer, DEFAULT_SOURCE_EXTENSIONS, NATIVE_APPLY_MARKER};
pub use value::{Fault, Function, NativeFn, Object, ObjectId, ObjectKind, Property, Value};
