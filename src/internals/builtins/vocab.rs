//! Definition and vocabulary words: `:` `;` `VARIABLE` `CONSTANT`
//! `VOCABULARY` `DEFINITIONS` (SPEC_FULL.md §4.2, §9 "Definitions vocabulary").

use crate::dictionary::{Dictionary, WordEntry};
use crate::errors::ForthError;
use crate::internals::compiler::read_raw_name;
use crate::runtime::Engine;
use crate::value::Value;

pub fn register(dict: &mut Dictionary) {
    dict.install_core(":", WordEntry::new_primitive(":", f_colon));
    dict.install_core(
        ";",
        WordEntry::new_primitive(";", f_semicolon).immediate().colon_only(),
    );
    dict.install_core("VARIABLE", WordEntry::new_primitive("VARIABLE", f_variable));
    dict.install_core("CONSTANT", WordEntry::new_primitive("CONSTANT", f_constant));
    dict.install_core(
        "VOCABULARY",
        WordEntry::new_primitive("VOCABULARY", f_vocabulary).immediate(),
    );
    dict.install_core("DEFINITIONS", WordEntry::new_primitive("DEFINITIONS", f_definitions));
    dict.install_core("(SET-VOCAB)", WordEntry::new_primitive("(SET-VOCAB)", p_set_vocab).execute_only());
}

fn f_colon(e: &mut Engine) -> Result<(), ForthError> {
    if e.is_compiling() {
        return Err(ForthError::control_flow(":", "already compiling a definition"));
    }
    let name = read_raw_name(e)?;
    e.current_def = Some(WordEntry::new_threaded(&name));
    e.is_compiling = true;
    Ok(())
}

fn f_semicolon(e: &mut Engine) -> Result<(), ForthError> {
    let entry = e
        .current_def
        .take()
        .ok_or_else(|| ForthError::control_flow(";", "no definition in progress"))?;
    let name = entry.name.clone();
    let voc_idx = e.dictionary.definitions;
    e.dictionary.install(voc_idx, &name, entry);
    e.is_compiling = false;
    Ok(())
}

/// Builds a one-slot `Threaded` body holding `value` and installs it under
/// `name` in the current definitions vocabulary. Shared by `VARIABLE` and
/// `CONSTANT`, which differ only in where `value` comes from.
fn install_inline_word(e: &mut Engine, name: &str, value: Value) -> Result<(), ForthError> {
    e.current_def = Some(WordEntry::new_threaded(name));
    e.emit_inline(value)?;
    let entry = e.current_def.take().expect("current_def set above");
    let voc_idx = e.dictionary.definitions;
    e.dictionary.install(voc_idx, name, entry);
    Ok(())
}

fn f_variable(e: &mut Engine) -> Result<(), ForthError> {
    let init = e.pop("VARIABLE")?;
    let name = read_raw_name(e)?;
    let addr = e.mem_append(init);
    install_inline_word(e, &name, Value::Int(addr as i64))
}

fn f_constant(e: &mut Engine) -> Result<(), ForthError> {
    let value = e.pop("CONSTANT")?;
    let name = read_raw_name(e)?;
    install_inline_word(e, &name, value)
}

/// Creates an empty vocabulary and a word that, when run, sets `context`
/// to it and leaves its own name on the stack for an optional following
/// `DEFINITIONS` (the classic `VOCABULARY FOO   FOO DEFINITIONS` idiom).
fn f_vocabulary(e: &mut Engine) -> Result<(), ForthError> {
    let name = read_raw_name(e)?;
    let voc_idx = e.dictionary.create_vocabulary(&name);
    e.current_def = Some(WordEntry::new_threaded(&name));
    e.emit_inline(Value::Int(voc_idx as i64))?;
    e.emit_inline(Value::Str(name.clone()))?;
    e.emit_core("(SET-VOCAB)")?;
    let entry = e.current_def.take().expect("current_def set above");
    let install_idx = e.dictionary.definitions;
    e.dictionary.install(install_idx, &name, entry);
    Ok(())
}

fn p_set_vocab(e: &mut Engine) -> Result<(), ForthError> {
    let name_v = e.pop("(SET-VOCAB)")?;
    let idx_v = e.pop("(SET-VOCAB)")?;
    let idx = idx_v
        .as_int()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| ForthError::execution("(SET-VOCAB)", "bad vocabulary index"))?;
    e.dictionary.context = idx;
    e.push(name_v);
    Ok(())
}

fn f_definitions(e: &mut Engine) -> Result<(), ForthError> {
    let v = e.pop("DEFINITIONS")?;
    let name = match v {
        Value::Str(s) => s,
        other => {
            return Err(ForthError::execution(
                "DEFINITIONS",
                format!("expected a vocabulary name, found {}", other),
            ))
        }
    };
    let idx = e
        .dictionary
        .vocabulary_index(&name)
        .ok_or_else(|| ForthError::execution("DEFINITIONS", format!("no such vocabulary: {}", name)))?;
    e.dictionary.definitions = idx;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Engine;

    #[test]
    fn colon_definition_is_callable() {
        let mut e = Engine::new_engine();
        e.interpret(": SQUARE DUP * ;");
        assert!(e.last_error().is_none());
        e.interpret("5 SQUARE");
        assert_eq!(e.stack(), &[Value::Int(25)]);
    }

    #[test]
    fn variable_pushes_its_address() {
        let mut e = Engine::new_engine();
        e.interpret("1234 VARIABLE BUU BUU @");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(1234)]);
    }

    #[test]
    fn constant_pushes_its_value_every_time() {
        let mut e = Engine::new_engine();
        e.interpret("99 CONSTANT HUNDO HUNDO HUNDO");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(99), Value::Int(99)]);
    }

    #[test]
    fn semicolon_outside_colon_is_control_flow_error() {
        let mut e = Engine::new_engine();
        e.interpret(";");
        assert!(e.last_error().is_some());
    }

    #[test]
    fn vocabulary_switches_context_and_leaves_name_for_definitions() {
        let mut e = Engine::new_engine();
        e.interpret("VOCABULARY EXTRA EXTRA DEFINITIONS");
        assert!(e.last_error().is_none());
        let extra_idx = e.dictionary().vocabulary_index("EXTRA").unwrap();
        assert_eq!(e.dictionary().definitions, extra_idx);
        assert_eq!(e.dictionary().context, extra_idx);
        assert!(e.stack().is_empty());
    }
}
