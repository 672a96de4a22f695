//! threadforth: a small interactive Forth-style programming environment.

mod config;
mod dictionary;
mod errors;
mod files;
mod internals;
mod memory;
mod messages;
mod runtime;
#[cfg(test)]
mod scenarios;
mod value;

use config::Config;
use files::FileHandle;
use runtime::LineSource;
use std::io::Write;
use std::path::Path;

struct StdinSource {
    handle: FileHandle,
}

impl LineSource for StdinSource {
    fn next_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = std::io::stdout().flush();
        self.handle.get_line()
    }
}

fn main() {
    let config = Config::from_env();

    if let Some(log_path) = &config.log_file {
        if let Err(e) = messages::init_subscriber(Some(Path::new(log_path))) {
            eprintln!("cannot open log file '{}': {}", log_path, e);
            std::process::exit(1);
        }
    } else {
        let _ = messages::init_subscriber(None);
    }

    let mut engine = runtime::Engine::new_engine();
    engine.set_debug_level(config.debug_level);

    if let Some(path) = &config.loaded_file {
        if let Err(e) = internals::builtins::io::load_file(&mut engine, path) {
            eprintln!("{}", e);
        }
    }

    let mut source = StdinSource {
        handle: FileHandle::stdin(),
    };
    engine.run(&mut source);

    std::process::exit(0);
}
