//! RAM access words (SPEC_FULL.md §4.4).

use crate::dictionary::{Dictionary, WordEntry};
use crate::errors::ForthError;
use crate::runtime::Engine;
use crate::value::Value;

pub fn register(dict: &mut Dictionary) {
    dict.install_core("@", WordEntry::new_primitive("@", f_fetch));
    dict.install_core("!", WordEntry::new_primitive("!", f_store));
    dict.install_core("+!", WordEntry::new_primitive("+!", f_plus_store));
    dict.install_core("?", WordEntry::new_primitive("?", f_question));
    dict.install_core("FILL", WordEntry::new_primitive("FILL", f_fill));
    dict.install_core("MOVE", WordEntry::new_primitive("MOVE", f_move));
    dict.install_core("ERASE", WordEntry::new_primitive("ERASE", f_erase));
    dict.install_core("BLANKS", WordEntry::new_primitive("BLANKS", f_blanks));
    dict.install_core("TOGGLE", WordEntry::new_primitive("TOGGLE", f_toggle));
}

fn addr_of(e: &mut Engine, word: &str) -> Result<usize, ForthError> {
    let v = e.pop(word)?;
    let n = v.as_int().ok_or_else(|| ForthError::execution(word, "expected an address"))?;
    usize::try_from(n).map_err(|_| ForthError::execution(word, "address out of range"))
}

fn count_of(e: &mut Engine, word: &str) -> Result<usize, ForthError> {
    let v = e.pop(word)?;
    let n = v.as_int().ok_or_else(|| ForthError::execution(word, "expected a count"))?;
    usize::try_from(n).map_err(|_| ForthError::execution(word, "count out of range"))
}

fn f_fetch(e: &mut Engine) -> Result<(), ForthError> {
    let addr = addr_of(e, "@")?;
    e.push(e.mem_get(addr));
    Ok(())
}

fn f_store(e: &mut Engine) -> Result<(), ForthError> {
    let addr = addr_of(e, "!")?;
    let v = e.pop("!")?;
    e.mem_set(addr, v);
    Ok(())
}

fn f_plus_store(e: &mut Engine) -> Result<(), ForthError> {
    let addr = addr_of(e, "+!")?;
    let n = e.pop_int("+!")?;
    let cur = e
        .mem_get(addr)
        .as_int()
        .ok_or_else(|| ForthError::execution("+!", "cell does not hold an integer"))?;
    e.mem_set(addr, Value::Int(cur + n));
    Ok(())
}

fn f_question(e: &mut Engine) -> Result<(), ForthError> {
    let addr = addr_of(e, "?")?;
    e.output(&format!("{} ", e.mem_get(addr)));
    Ok(())
}

fn f_fill(e: &mut Engine) -> Result<(), ForthError> {
    let v = e.pop("FILL")?;
    let count = count_of(e, "FILL")?;
    let addr = addr_of(e, "FILL")?;
    e.mem_fill(addr, count, v);
    Ok(())
}

fn f_move(e: &mut Engine) -> Result<(), ForthError> {
    let count = count_of(e, "MOVE")?;
    let dst = addr_of(e, "MOVE")?;
    let src = addr_of(e, "MOVE")?;
    e.mem_move(src, dst, count);
    Ok(())
}

fn f_erase(e: &mut Engine) -> Result<(), ForthError> {
    let count = count_of(e, "ERASE")?;
    let addr = addr_of(e, "ERASE")?;
    e.mem_fill(addr, count, Value::Nil);
    Ok(())
}

fn f_blanks(e: &mut Engine) -> Result<(), ForthError> {
    let count = count_of(e, "BLANKS")?;
    let addr = addr_of(e, "BLANKS")?;
    e.mem_fill(addr, count, Value::Str(" ".to_string()));
    Ok(())
}

fn f_toggle(e: &mut Engine) -> Result<(), ForthError> {
    let b = e.pop_int("TOGGLE")?;
    let addr = addr_of(e, "TOGGLE")?;
    let cur = e
        .mem_get(addr)
        .as_int()
        .ok_or_else(|| ForthError::execution("TOGGLE", "cell does not hold an integer"))?;
    e.mem_set(addr, Value::Int(cur ^ b));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Engine;

    #[test]
    fn store_then_fetch_round_trips() {
        let mut e = Engine::new_engine();
        e.interpret("42 0 ! 0 @");
        assert_eq!(e.stack(), &[Value::Int(42)]);
    }

    #[test]
    fn plus_store_accumulates() {
        let mut e = Engine::new_engine();
        e.interpret("10 0 ! 5 0 +! 0 @");
        assert_eq!(e.stack(), &[Value::Int(15)]);
    }

    #[test]
    fn move_vacates_source_with_nil() {
        let mut e = Engine::new_engine();
        e.interpret("1 0 ! 2 1 ! 0 5 2 MOVE 0 @ 5 @ 6 @");
        assert_eq!(
            e.stack(),
            &[Value::Nil, Value::Int(1), Value::Int(2)]
        );
    }

    #[test]
    fn toggle_requires_integer_cell() {
        let mut e = Engine::new_engine();
        e.interpret("\"x\" 0 ! 1 0 TOGGLE");
        assert!(e.last_error().is_some());
    }
}
