//! Word reflection: `'` (tick) and `EXECUTE` (SPEC_FULL.md §4.4, §9 "`'` lookup scope").

use crate::dictionary::{Dictionary, WordEntry};
use crate::errors::ForthError;
use crate::internals::compiler::read_raw_name;
use crate::runtime::Engine;
use crate::value::Value;

pub fn register(dict: &mut Dictionary) {
    dict.install_core("'", WordEntry::new_primitive("'", f_tick));
    dict.install_core("EXECUTE", WordEntry::new_primitive("EXECUTE", f_execute));
}

/// Reads the next raw name and pushes the `WordId` `find_word` resolves it
/// to -- the same context-first, then-reverse-insertion-order rule the
/// outer interpreter itself uses, so `'` never sees a word the interpreter
/// couldn't also reach by typing its name.
fn f_tick(e: &mut Engine) -> Result<(), ForthError> {
    let name = read_raw_name(e)
        .map_err(|_| ForthError::execution("'", "expected a name but found end of input"))?;
    let id = e
        .dictionary()
        .find_word(&name)
        .ok_or_else(|| ForthError::word_not_found(&name))?;
    e.push(Value::Word(id));
    Ok(())
}

fn f_execute(e: &mut Engine) -> Result<(), ForthError> {
    let id = match e.pop("EXECUTE")? {
        Value::Word(id) => id,
        other => {
            return Err(ForthError::execution(
                "EXECUTE",
                format!("expected a word reference, found {}", other),
            ))
        }
    };
    e.execute_word(id)
}
