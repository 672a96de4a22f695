//! Diagnostics and introspection words: `.S`, `DBG <n>`, `RESET`, `BYE`
//! (SPEC_FULL.md §4.6, "Diagnostics (`messages`)", and §4.7's exit path).

use crate::dictionary::{Dictionary, WordEntry};
use crate::errors::ForthError;
use crate::messages::DebugLevel;
use crate::runtime::Engine;

pub fn register(dict: &mut Dictionary) {
    dict.install_core(".S", WordEntry::new_primitive(".S", f_dot_s));
    dict.install_core("DBG", WordEntry::new_primitive("DBG", f_dbg));
    dict.install_core("RESET", WordEntry::new_primitive("RESET", f_reset));
    dict.install_core("BYE", WordEntry::new_primitive("BYE", f_bye));
}

/// Prints the data stack bottom-to-top without consuming it.
fn f_dot_s(e: &mut Engine) -> Result<(), ForthError> {
    for v in e.stack() {
        e.output(&format!("{} ", v));
    }
    e.output("\n");
    Ok(())
}

/// Sets the verbosity the `messages` facade consults (SPEC_FULL.md §4.6).
fn f_dbg(e: &mut Engine) -> Result<(), ForthError> {
    let n = e.pop_int("DBG")?;
    e.set_debug_level(DebugLevel::from_int(n));
    Ok(())
}

fn f_reset(e: &mut Engine) -> Result<(), ForthError> {
    e.reset();
    Ok(())
}

/// Ends the REPL loop: `interpret`/`read_from`/`run` all check `should_exit`.
fn f_bye(e: &mut Engine) -> Result<(), ForthError> {
    e.f_bye()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Engine;
    use crate::value::Value;

    #[test]
    fn dot_s_does_not_consume_the_stack() {
        let mut e = Engine::new_engine();
        e.interpret("1 2 3 .S");
        assert_eq!(e.stack(), &[Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn reset_clears_the_stack() {
        let mut e = Engine::new_engine();
        e.interpret("1 2 3 RESET");
        assert!(e.stack().is_empty());
    }

    #[test]
    fn dbg_accepts_a_numeric_level() {
        let mut e = Engine::new_engine();
        e.interpret("2 DBG");
        assert!(e.last_error().is_none());
    }

    #[test]
    fn bye_sets_should_exit() {
        let mut e = Engine::new_engine();
        assert!(!e.should_exit());
        e.interpret("BYE");
        assert!(e.should_exit());
    }
}
