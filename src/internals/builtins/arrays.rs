//! Array construction and traversal: `[` `]` `MAP` `UNPACK` `PACK` `LEN`
//! (SPEC_FULL.md §4.4).

use crate::dictionary::{Dictionary, WordEntry};
use crate::errors::ForthError;
use crate::runtime::Engine;
use crate::value::Value;

const ARRAY_MARKER: &str = "LABEL[";

pub fn register(dict: &mut Dictionary) {
    dict.install_core("[", WordEntry::new_primitive("[", f_lbracket));
    dict.install_core("]", WordEntry::new_primitive("]", f_rbracket));
    dict.install_core("MAP", WordEntry::new_primitive("MAP", f_map));
    dict.install_core("UNPACK", WordEntry::new_primitive("UNPACK", f_unpack));
    dict.install_core("PACK", WordEntry::new_primitive("PACK", f_pack));
    dict.install_core("LEN", WordEntry::new_primitive("LEN", f_len));
}

fn f_lbracket(e: &mut Engine) -> Result<(), ForthError> {
    e.push(Value::Str(ARRAY_MARKER.to_string()));
    Ok(())
}

/// Pops back to the nearest `[` marker, reversing the collected items into
/// original order. An exhausted stack before the marker turns up is
/// reported as the ordinary data-stack-underflow `ExecutionError`.
fn f_rbracket(e: &mut Engine) -> Result<(), ForthError> {
    let mut items = Vec::new();
    loop {
        let v = e.pop("]")?;
        if matches!(&v, Value::Str(s) if s == ARRAY_MARKER) {
            break;
        }
        items.push(v);
    }
    items.reverse();
    e.push(Value::Array(items));
    Ok(())
}

/// `( arr word -- )`: runs `word` once per element, in original order, with
/// the element on top of stack each time.
fn f_map(e: &mut Engine) -> Result<(), ForthError> {
    let word = match e.pop("MAP")? {
        Value::Word(id) => id,
        other => {
            return Err(ForthError::execution(
                "MAP",
                format!("expected a word reference, found {}", other),
            ))
        }
    };
    let items = match e.pop("MAP")? {
        Value::Array(items) => items,
        other => return Err(ForthError::execution("MAP", format!("expected an array, found {}", other))),
    };
    for item in items {
        e.push(item);
        e.execute_word(word)?;
    }
    Ok(())
}

fn f_unpack(e: &mut Engine) -> Result<(), ForthError> {
    let items = match e.pop("UNPACK")? {
        Value::Array(items) => items,
        other => return Err(ForthError::execution("UNPACK", format!("expected an array, found {}", other))),
    };
    for item in items {
        e.push(item);
    }
    Ok(())
}

/// `( v1 .. vn n -- arr )`: the inverse of `UNPACK` on arrays of equal length.
fn f_pack(e: &mut Engine) -> Result<(), ForthError> {
    let n = e.pop_int("PACK")?;
    let count = usize::try_from(n).map_err(|_| ForthError::execution("PACK", "count must not be negative"))?;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(e.pop("PACK")?);
    }
    items.reverse();
    e.push(Value::Array(items));
    Ok(())
}

/// Peeks the length of TOS (array or string) without consuming it.
fn f_len(e: &mut Engine) -> Result<(), ForthError> {
    let top = e.stack().last().cloned().ok_or_else(|| ForthError::execution("LEN", "data stack underflow"))?;
    let len = top
        .len_value()
        .ok_or_else(|| ForthError::execution("LEN", format!("{} has no length", top)))?;
    e.push(Value::Int(len as i64));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Engine;

    #[test]
    fn bracket_literal_builds_array_in_order() {
        let mut e = Engine::new_engine();
        e.interpret("[ 1 2 3 ]");
        assert_eq!(
            e.stack(),
            &[Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])]
        );
    }

    #[test]
    fn pack_and_unpack_round_trip() {
        let mut e = Engine::new_engine();
        e.interpret("1 2 3 3 PACK UNPACK");
        assert_eq!(e.stack(), &[Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn len_peeks_without_consuming() {
        let mut e = Engine::new_engine();
        e.interpret("[ 1 2 3 ] LEN");
        assert_eq!(
            e.stack(),
            &[Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]), Value::Int(3)]
        );
    }

    #[test]
    fn unmatched_close_bracket_is_execution_error() {
        let mut e = Engine::new_engine();
        e.interpret("]");
        assert!(e.last_error().is_some());
    }
}
