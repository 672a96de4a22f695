//! Outer interpreter: dispatches each token to execute or compile per the
//! current mode (SPEC_FULL.md §4.2).

use super::tokenizer::{next_word, Token};
use crate::errors::ForthError;
use crate::runtime::Engine;
use crate::value::Value;

pub fn dispatch(engine: &mut Engine, token: Token) -> Result<(), ForthError> {
    match token {
        Token::Number(v) => emit_or_push(engine, v),
        Token::Str(s) => emit_or_push(engine, Value::Str(s)),
        Token::Word(name) => dispatch_word(engine, &name),
    }
}

fn emit_or_push(engine: &mut Engine, v: Value) -> Result<(), ForthError> {
    if engine.is_compiling() {
        engine.emit_inline(v)?;
    } else {
        engine.push(v);
    }
    Ok(())
}

fn dispatch_word(engine: &mut Engine, name: &str) -> Result<(), ForthError> {
    let id = engine
        .dictionary()
        .find_word(name)
        .ok_or_else(|| ForthError::word_not_found(name))?;
    let entry = engine.dictionary().get(id);
    let immediate = entry.immediate;
    let colon_only = entry.colon_only;
    let execute_only = entry.execute_only;

    if engine.is_compiling() && !immediate {
        engine.emit_ref(id)?;
        return Ok(());
    }

    if colon_only && !engine.is_compiling() {
        return Err(ForthError::execution(name, "word is only legal inside a colon definition"));
    }
    if execute_only && !engine.is_compiling() {
        return Err(ForthError::execution(name, "word is only legal inside a compiled body"));
    }
    engine.execute_word(id)
}

/// Reads the next token as a raw name, without executing or number-parsing
/// it. Used by `:`, `VARIABLE`, `CONSTANT`, and `VOCABULARY`.
pub fn read_raw_name(engine: &mut Engine) -> Result<String, ForthError> {
    match next_word(engine) {
        Some(Token::Word(w)) => Ok(w),
        Some(Token::Number(Value::Int(n))) => Ok(n.to_string()),
        Some(Token::Number(Value::Float(f))) => Ok(f.to_string()),
        Some(Token::Str(s)) => Ok(s),
        _ => Err(ForthError::compilation("<name>", "expected a name but found end of input")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Engine;

    #[test]
    fn unknown_word_is_word_not_found() {
        let mut engine = Engine::new_engine();
        let err = dispatch_word(&mut engine, "NOSUCHWORD").unwrap_err();
        assert!(matches!(err, ForthError::WordNotFound { .. }));
    }

    #[test]
    fn number_pushes_when_executing() {
        let mut engine = Engine::new_engine();
        dispatch(&mut engine, Token::Number(Value::Int(7))).unwrap();
        assert_eq!(engine.stack(), &[Value::Int(7)]);
    }
}
