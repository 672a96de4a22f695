//! Control-flow immediates and their runtime branch primitives
//! (SPEC_FULL.md §4.2, §4.3).
//!
//! Compile-time state rides on the ordinary data stack: each construct
//! pushes integer slot/address markers and a `Value::Str` flag sentinel,
//! popped in reverse order by the matching closer. This is the same
//! stack the rest of the interpreter uses, not a separate structure.

use crate::dictionary::{Dictionary, WordEntry};
use crate::errors::ForthError;
use crate::internals::inner;
use crate::runtime::{flag, Engine};
use crate::value::Value;

pub fn register(dict: &mut Dictionary) {
    dict.install_core("IF", WordEntry::new_primitive("IF", w_if).immediate());
    dict.install_core("ELSE", WordEntry::new_primitive("ELSE", w_else).immediate());
    dict.install_core("ENDIF", WordEntry::new_primitive("ENDIF", w_endif).immediate());

    dict.install_core("BEGIN", WordEntry::new_primitive("BEGIN", w_begin).immediate());
    dict.install_core("UNTIL", WordEntry::new_primitive("UNTIL", w_until).immediate());
    dict.install_core("WHILE", WordEntry::new_primitive("WHILE", w_while).immediate());
    dict.install_core("REPEAT", WordEntry::new_primitive("REPEAT", w_repeat).immediate());

    dict.install_core("DO", WordEntry::new_primitive("DO", w_do).immediate());
    dict.install_core("LOOP", WordEntry::new_primitive("LOOP", w_loop).immediate());
    dict.install_core("+LOOP", WordEntry::new_primitive("+LOOP", w_plus_loop).immediate());
    dict.install_core("LEAVE", WordEntry::new_primitive("LEAVE", w_leave).immediate());

    dict.install_core("BRANCH", WordEntry::new_primitive("BRANCH", p_branch));
    dict.install_core("0BRANCH", WordEntry::new_primitive("0BRANCH", p_branch0));
    dict.install_core(
        "(DO)",
        WordEntry::new_primitive("(DO)", p_paren_do),
    );
    dict.install_core(
        "(LOOP)",
        WordEntry::new_primitive("(LOOP)", p_paren_loop).execute_only(),
    );
    dict.install_core(
        "(+LOOP)",
        WordEntry::new_primitive("(+LOOP)", p_paren_plus_loop).execute_only(),
    );
    dict.install_core(
        "(LEAVE)",
        WordEntry::new_primitive("(LEAVE)", p_paren_leave).execute_only(),
    );
}

// ---- shared compile-time helpers ----

/// Emits a reference to `name` followed by a zeroed inline offset slot,
/// returning the index of that offset slot (the back-patch target).
fn emit_branch(e: &mut Engine, name: &str) -> Result<usize, ForthError> {
    e.emit_core(name)?;
    e.emit_inline(Value::Int(0))
}

/// Back-patches the offset at `slot_idx` to land at `target`.
fn patch_to(e: &mut Engine, slot_idx: usize, target: i64) -> Result<(), ForthError> {
    e.patch_slot(slot_idx, target - slot_idx as i64)
}

fn pop_flag(e: &mut Engine, word: &str, expected: &str) -> Result<(), ForthError> {
    match e.pop(word)? {
        Value::Str(s) if s == expected => Ok(()),
        other => Err(ForthError::control_flow(
            word,
            format!("expected a {} marker on the stack, found {}", expected, other),
        )),
    }
}

fn pop_marker(e: &mut Engine, word: &str) -> Result<i64, ForthError> {
    e.pop(word)?
        .as_int()
        .ok_or_else(|| ForthError::control_flow(word, "expected a compile-time address marker"))
}

// ---- IF / ELSE / ENDIF ----

fn w_if(e: &mut Engine) -> Result<(), ForthError> {
    let slot_idx = emit_branch(e, "0BRANCH")?;
    e.push(Value::Int(slot_idx as i64));
    e.push(Value::Str(flag::DOIF.to_string()));
    Ok(())
}

fn w_else(e: &mut Engine) -> Result<(), ForthError> {
    pop_flag(e, "ELSE", flag::DOIF)?;
    let if_slot = pop_marker(e, "ELSE")? as usize;
    let else_slot = emit_branch(e, "BRANCH")?;
    patch_to(e, if_slot, e.compile_len() as i64)?;
    e.push(Value::Int(else_slot as i64));
    e.push(Value::Str(flag::DOIF.to_string()));
    Ok(())
}

fn w_endif(e: &mut Engine) -> Result<(), ForthError> {
    pop_flag(e, "ENDIF", flag::DOIF)?;
    let slot_idx = pop_marker(e, "ENDIF")? as usize;
    patch_to(e, slot_idx, e.compile_len() as i64)
}

// ---- BEGIN / UNTIL / WHILE / REPEAT ----

fn w_begin(e: &mut Engine) -> Result<(), ForthError> {
    let start = e.compile_len();
    e.start_loop();
    e.push(Value::Int(start as i64));
    e.push(Value::Str(flag::BEGINFLAG.to_string()));
    Ok(())
}

fn w_until(e: &mut Engine) -> Result<(), ForthError> {
    pop_flag(e, "UNTIL", flag::BEGINFLAG)?;
    let start = pop_marker(e, "UNTIL")?;
    let slot_idx = emit_branch(e, "0BRANCH")?;
    patch_to(e, slot_idx, start)?;
    e.end_loop(e.compile_len())
}

fn w_while(e: &mut Engine) -> Result<(), ForthError> {
    pop_flag(e, "WHILE", flag::BEGINFLAG)?;
    let start = pop_marker(e, "WHILE")?;
    let slot_idx = emit_branch(e, "0BRANCH")?;
    e.push(Value::Int(start));
    e.push(Value::Int(slot_idx as i64));
    e.push(Value::Str(flag::WHILEFLAG.to_string()));
    Ok(())
}

fn w_repeat(e: &mut Engine) -> Result<(), ForthError> {
    pop_flag(e, "REPEAT", flag::WHILEFLAG)?;
    let while_slot = pop_marker(e, "REPEAT")? as usize;
    let start = pop_marker(e, "REPEAT")?;
    let branch_slot = emit_branch(e, "BRANCH")?;
    patch_to(e, branch_slot, start)?;
    patch_to(e, while_slot, e.compile_len() as i64)?;
    e.end_loop(e.compile_len())
}

// ---- DO / LOOP / +LOOP / LEAVE ----

fn w_do(e: &mut Engine) -> Result<(), ForthError> {
    e.start_loop();
    // Data stack arrives as ( index limit -- ), limit on top; the first >R
    // stows the limit and the second stows the index, leaving the index on
    // top of the return stack where I/J/(DO)/(LOOP) expect it.
    e.emit_core(">R")?;
    e.emit_core(">R")?;
    let do_addr = e.compile_len();
    e.push(Value::Int(do_addr as i64));
    e.push(Value::Str(flag::DOFLAG.to_string()));
    e.emit_core("(DO)")?;
    emit_branch(e, "0BRANCH")?;
    Ok(())
}

fn close_loop(e: &mut Engine, closer_name: &str) -> Result<(), ForthError> {
    pop_flag(e, "LOOP", flag::DOFLAG)?;
    let do_addr = pop_marker(e, "LOOP")? as usize;
    let loop_slot = emit_branch(e, closer_name)?;
    patch_to(e, loop_slot, do_addr as i64)?;
    patch_to(e, do_addr + 2, e.compile_len() as i64)?;
    // LEAVE must land here, at the start of the cleanup, and fall through it --
    // not past it -- so the return stack is popped on an early exit too.
    e.end_loop(e.compile_len())?;
    e.emit_core("R>")?;
    e.emit_core("R>")?;
    e.emit_core("DROP")?;
    e.emit_core("DROP")
}

fn w_loop(e: &mut Engine) -> Result<(), ForthError> {
    close_loop(e, "(LOOP)")
}

fn w_plus_loop(e: &mut Engine) -> Result<(), ForthError> {
    close_loop(e, "(+LOOP)")
}

fn w_leave(e: &mut Engine) -> Result<(), ForthError> {
    if e.leave_stack.is_empty() {
        return Err(ForthError::control_flow("LEAVE", "LEAVE outside any active loop"));
    }
    let slot_idx = emit_branch(e, "(LEAVE)")?;
    e.mark_leave(slot_idx)
}

// ---- runtime primitives ----

fn p_branch(e: &mut Engine) -> Result<(), ForthError> {
    inner::branch(e)
}

fn p_branch0(e: &mut Engine) -> Result<(), ForthError> {
    inner::branch0(e)
}

/// `( index limit -- )` on the return stack via the two prior `>R`s;
/// pushes a truthy flag for "keep looping" onto the data stack for the
/// `0BRANCH` that immediately follows.
fn p_paren_do(e: &mut Engine) -> Result<(), ForthError> {
    let index = e
        .rp_peek(0)
        .and_then(Value::as_int)
        .ok_or_else(|| ForthError::execution("(DO)", "return stack underflow"))?;
    let limit = e
        .rp_peek(1)
        .and_then(Value::as_int)
        .ok_or_else(|| ForthError::execution("(DO)", "return stack underflow"))?;
    e.push(Value::truthy_value(index < limit));
    Ok(())
}

fn p_paren_loop(e: &mut Engine) -> Result<(), ForthError> {
    let index = e
        .rp_peek(0)
        .and_then(Value::as_int)
        .ok_or_else(|| ForthError::execution("(LOOP)", "return stack underflow"))?;
    e.rp_set_top(Value::Int(index + 1))?;
    inner::branch(e)
}

fn p_paren_plus_loop(e: &mut Engine) -> Result<(), ForthError> {
    let step = e.pop_int("(+LOOP)")?;
    let index = e
        .rp_peek(0)
        .and_then(Value::as_int)
        .ok_or_else(|| ForthError::execution("(+LOOP)", "return stack underflow"))?;
    e.rp_set_top(Value::Int(index + step))?;
    inner::branch(e)
}

fn p_paren_leave(e: &mut Engine) -> Result<(), ForthError> {
    inner::branch(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Engine;

    #[test]
    fn if_else_endif_picks_the_right_branch() {
        let mut e = Engine::new_engine();
        e.interpret(": SIGN DUP 0 > IF DROP 1 ELSE 0 < IF DROP -1 ELSE DROP 0 ENDIF ENDIF ;");
        assert!(e.last_error().is_none());
        e.interpret("5 SIGN -5 SIGN 0 SIGN");
        assert_eq!(
            e.stack(),
            &[Value::Int(1), Value::Int(-1), Value::Int(0)]
        );
    }

    #[test]
    fn begin_until_counts_down() {
        let mut e = Engine::new_engine();
        e.interpret(": CDOWN BEGIN DUP 1 - DUP 0 = UNTIL ;");
        e.interpret("3 CDOWN");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(3), Value::Int(2), Value::Int(1), Value::Int(0)]);
    }

    #[test]
    fn begin_while_repeat_accumulates() {
        let mut e = Engine::new_engine();
        e.interpret(": SUMTO 0 SWAP BEGIN DUP 0 > WHILE DUP ROT + SWAP 1 - REPEAT DROP ;");
        e.interpret("4 SUMTO");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(10)]);
    }

    #[test]
    fn do_loop_runs_limit_minus_index_times() {
        let mut e = Engine::new_engine();
        e.interpret(": FILLUP 0 5 DO I LOOP ;");
        e.interpret("FILLUP");
        assert!(e.last_error().is_none());
        assert_eq!(
            e.stack(),
            &[Value::Int(0), Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]
        );
    }

    #[test]
    fn leave_exits_a_do_loop_early() {
        let mut e = Engine::new_engine();
        e.interpret(": FIRSTTWO 0 10 DO I DUP 2 = IF LEAVE ENDIF LOOP ;");
        e.interpret("FIRSTTWO");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(0), Value::Int(1), Value::Int(2)]);
        assert!(e.rp().is_empty());
    }

    #[test]
    fn leave_outside_a_loop_is_a_control_flow_error() {
        let mut e = Engine::new_engine();
        e.interpret(": BAD LEAVE ;");
        assert!(e.last_error().is_some());
    }

    #[test]
    fn paren_loop_is_execute_only() {
        let mut e = Engine::new_engine();
        e.interpret("(LOOP)");
        assert!(matches!(e.last_error(), Some(ForthError::ExecutionError { .. })));
    }
}
