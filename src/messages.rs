//! Diagnostic facade: gates engine-internal logging behind a verbosity level
//! and forwards to `tracing`. Never touches stdout directly; word-level
//! output goes through the engine's own output sink instead.

use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord)]
pub enum DebugLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl DebugLevel {
    pub fn from_int(n: i64) -> DebugLevel {
        match n {
            n if n <= 0 => DebugLevel::Error,
            1 => DebugLevel::Warning,
            2 => DebugLevel::Info,
            _ => DebugLevel::Debug,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Msg {
    level: DebugLevel,
}

impl Default for Msg {
    fn default() -> Self {
        Msg::new()
    }
}

impl Msg {
    pub fn new() -> Msg {
        Msg {
            level: DebugLevel::Warning,
        }
    }

    pub fn set_level(&mut self, level: DebugLevel) {
        self.level = level;
    }

    pub fn get_level(&self) -> DebugLevel {
        self.level
    }

    pub fn error<T: Debug>(&self, caller: &str, message: &str, detail: Option<T>) {
        match detail {
            Some(d) => tracing::error!(caller, message, ?d),
            None => tracing::error!(caller, message),
        }
    }

    pub fn warning<T: Debug>(&self, caller: &str, message: &str, detail: Option<T>) {
        if self.level < DebugLevel::Warning {
            return;
        }
        match detail {
            Some(d) => tracing::warn!(caller, message, ?d),
            None => tracing::warn!(caller, message),
        }
    }

    pub fn info<T: Debug>(&self, caller: &str, message: &str, detail: Option<T>) {
        if self.level < DebugLevel::Info {
            return;
        }
        match detail {
            Some(d) => tracing::info!(caller, message, ?d),
            None => tracing::info!(caller, message),
        }
    }

    pub fn debug<T: Debug>(&self, caller: &str, message: &str, detail: Option<T>) {
        if self.level < DebugLevel::Debug {
            return;
        }
        match detail {
            Some(d) => tracing::debug!(caller, message, ?d),
            None => tracing::debug!(caller, message),
        }
    }
}

/// Installs a `tracing-subscriber` fmt layer writing to `path`, or falls back
/// to a silent (never-emitting) subscriber when no path is given.
pub fn init_subscriber(path: Option<&std::path::Path>) -> std::io::Result<()> {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::new("warn");
    match path {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_warning() {
        let msg = Msg::new();
        assert_eq!(msg.get_level(), DebugLevel::Warning);
    }

    #[test]
    fn level_from_int() {
        assert_eq!(DebugLevel::from_int(0), DebugLevel::Error);
        assert_eq!(DebugLevel::from_int(1), DebugLevel::Warning);
        assert_eq!(DebugLevel::from_int(2), DebugLevel::Info);
        assert_eq!(DebugLevel::from_int(3), DebugLevel::Debug);
    }

    #[test]
    fn ordering_gates_verbosity() {
        assert!(DebugLevel::Debug > DebugLevel::Info);
        assert!(DebugLevel::Info > DebugLevel::Warning);
        assert!(DebugLevel::Warning > DebugLevel::Error);
    }
}
