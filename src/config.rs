//! Command-line configuration: parses process arguments with `argh` and
//! resolves them into the values `main` needs to construct an engine.

use crate::messages::DebugLevel;
use argh::FromArgs;

#[derive(FromArgs)]
/// A small interactive Forth-style programming environment.
struct Args {
    /// vocabulary/source file to LOAD before entering the REPL
    #[argh(option, short = 'f')]
    file: Option<String>,

    /// log file to write diagnostics to (silent if omitted)
    #[argh(option, short = 'l')]
    log: Option<String>,

    /// initial diagnostic verbosity: error, warning, info, debug
    #[argh(option, short = 'd', default = "String::from(\"error\")")]
    debug_level: String,
}

pub struct Config {
    pub debug_level: DebugLevel,
    pub loaded_file: Option<String>,
    pub log_file: Option<String>,
}

impl Config {
    /// Parses `std::env::args`. On malformed arguments `argh` prints usage
    /// and exits the process itself (a fatal host error, per SPEC_FULL.md §4.7).
    pub fn from_env() -> Config {
        let args: Args = argh::from_env();
        let debug_level = match args.debug_level.as_str() {
            "debug" => DebugLevel::Debug,
            "info" => DebugLevel::Info,
            "warning" => DebugLevel::Warning,
            _ => DebugLevel::Error,
        };
        Config {
            debug_level,
            loaded_file: args.file,
            log_file: args.log,
        }
    }
}
