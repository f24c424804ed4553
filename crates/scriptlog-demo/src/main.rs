use anyhow::{bail, Context, Result};
use scriptlog::{Console, LogFacade, Settings, Stdout};
use scriptlog_config::LoggerConfig;
use scriptlog_overlay::Overlay;
use std::cell::RefCell;
use std::rc::Rc;

mod host;
mod logger;
mod samples;
mod screen;

use host::ScriptHost;

const USAGE: &str = "usage: scriptlog-demo [--screen] [--mode NONE|DEFAULT|PROPS|DEEP] [--groups a,b] [--stack]";

/// Command line overrides on top of the loaded config
#[derive(Debug, Default, PartialEq)]
struct DemoArgs {
    screen: bool,
    mode: Option<String>,
    groups: Option<Vec<String>>,
    stack: bool,
}

impl DemoArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--screen" => parsed.screen = true,
                "--stack" => parsed.stack = true,
                "--mode" => parsed.mode = Some(args.next().context("--mode needs a value")?),
                "--groups" => {
                    let list = args.next().context("--groups needs a value")?;
                    parsed.groups = Some(
                        list.split(',')
                            .map(str::trim)
                            .filter(|g| !g.is_empty())
                            .map(str::to_string)
                            .collect(),
                    );
                }
                other => bail!("unknown argument {:?}\n{}", other, USAGE),
            }
        }
        Ok(parsed)
    }

    fn apply(&self, config: &mut LoggerConfig) {
        if let Some(mode) = &self.mode {
            config.print_mode = mode.clone();
        }
        if let Some(groups) = &self.groups {
            config.group_filters = groups.clone();
        }
        if self.stack {
            config.show_stack = true;
        }
        config.log_to_screen = self.screen;
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = DemoArgs::parse(std::env::args().skip(1))?;

    if args.screen {
        let log_file = logger::init_file()?;
        eprintln!("Logging to {}", log_file.display());
    } else {
        logger::init_terminal();
    }

    let mut config = LoggerConfig::load();
    args.apply(&mut config);
    log::info!(
        "Starting scriptlog-demo in {} mode",
        config.print_mode.to_uppercase()
    );

    let host = ScriptHost::new();

    if args.screen {
        let settings = Settings::from_config(&config, LogFacade)?;
        let overlay = Rc::new(RefCell::new(Overlay::with_capacity(settings.history_tail())));
        let mut console = Console::new(settings, host.capture()).with_sink(Rc::clone(&overlay));
        samples::run(&mut console, &host)?;
        screen::run(&mut console, overlay, &host)?;
    } else {
        let settings = Settings::from_config(&config, Stdout)?;
        let mut console = Console::new(settings, host.capture());
        samples::run(&mut console, &host)?;
    }

    log::info!("Exiting scriptlog-demo");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Result<DemoArgs> {
        DemoArgs::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["--screen", "--mode", "deep", "--groups", "ui, player,"]).unwrap();
        assert_eq!(
            parsed,
            DemoArgs {
                screen: true,
                mode: Some("deep".to_string()),
                groups: Some(vec!["ui".to_string(), "player".to_string()]),
                stack: false,
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_missing_values() {
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&["--mode"]).is_err());
    }

    #[test]
    fn test_apply_overrides_config() {
        let mut config = LoggerConfig {
            log_to_screen: true,
            ..LoggerConfig::default()
        };
        args(&["--mode", "PROPS", "--stack"]).unwrap().apply(&mut config);
        assert_eq!(config.print_mode, "PROPS");
        assert!(config.show_stack);
        assert!(!config.log_to_screen);
        assert!(config.group_filters.is_empty());
    }

    #[test]
    fn test_unknown_mode_is_rejected_by_settings() {
        let mut config = LoggerConfig::default();
        args(&["--mode", "LOUD"]).unwrap().apply(&mut config);
        assert!(Settings::from_config(&config, Stdout).is_err());
    }
}
