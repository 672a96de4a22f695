//! Data-stack shuffling and return-stack words (SPEC_FULL.md §4.4).

use crate::dictionary::{Dictionary, WordEntry};
use crate::errors::ForthError;
use crate::runtime::Engine;
use crate::value::Value;

pub fn register(dict: &mut Dictionary) {
    dict.install_core("DUP", WordEntry::new_primitive("DUP", f_dup));
    dict.install_core("DROP", WordEntry::new_primitive("DROP", f_drop));
    dict.install_core("SWAP", WordEntry::new_primitive("SWAP", f_swap));
    dict.install_core("OVER", WordEntry::new_primitive("OVER", f_over));
    dict.install_core("ROT", WordEntry::new_primitive("ROT", f_rot));
    dict.install_core("-DUP", WordEntry::new_primitive("-DUP", f_dash_dup));

    dict.install_core(">R", WordEntry::new_primitive(">R", f_to_r));
    dict.install_core("R>", WordEntry::new_primitive("R>", f_r_from));
    dict.install_core("R", WordEntry::new_primitive("R", f_r));
    dict.install_core("I", WordEntry::new_primitive("I", f_i));
    dict.install_core("J", WordEntry::new_primitive("J", f_j));
}

fn f_dup(e: &mut Engine) -> Result<(), ForthError> {
    let v = e.pop("DUP")?;
    e.push(v.clone());
    e.push(v);
    Ok(())
}

fn f_drop(e: &mut Engine) -> Result<(), ForthError> {
    e.pop("DROP")?;
    Ok(())
}

fn f_swap(e: &mut Engine) -> Result<(), ForthError> {
    let b = e.pop("SWAP")?;
    let a = e.pop("SWAP")?;
    e.push(b);
    e.push(a);
    Ok(())
}

fn f_over(e: &mut Engine) -> Result<(), ForthError> {
    let b = e.pop("OVER")?;
    let a = e.pop("OVER")?;
    e.push(a.clone());
    e.push(b);
    e.push(a);
    Ok(())
}

fn f_rot(e: &mut Engine) -> Result<(), ForthError> {
    let c = e.pop("ROT")?;
    let b = e.pop("ROT")?;
    let a = e.pop("ROT")?;
    e.push(b);
    e.push(c);
    e.push(a);
    Ok(())
}

/// Duplicates only if the top of stack is nonzero/truthy.
fn f_dash_dup(e: &mut Engine) -> Result<(), ForthError> {
    let v = e.pop("-DUP")?;
    e.push(v.clone());
    if v.is_truthy() {
        e.push(v);
    }
    Ok(())
}

fn f_to_r(e: &mut Engine) -> Result<(), ForthError> {
    let v = e.pop(">R")?;
    e.rpush(v);
    Ok(())
}

fn f_r_from(e: &mut Engine) -> Result<(), ForthError> {
    let v = e.rpop("R>")?;
    e.push(v);
    Ok(())
}

/// Copies the top of the return stack without popping it.
fn f_r(e: &mut Engine) -> Result<(), ForthError> {
    let v = e
        .rp()
        .last()
        .cloned()
        .ok_or_else(|| ForthError::execution("R", "return stack underflow"))?;
    e.push(v);
    Ok(())
}

/// The current loop index: the top of the return stack.
fn f_i(e: &mut Engine) -> Result<(), ForthError> {
    let v = e
        .rp()
        .last()
        .cloned()
        .ok_or_else(|| ForthError::execution("I", "return stack underflow"))?;
    e.push(v);
    Ok(())
}

/// The outer loop's index: `rp[-3]`.
fn f_j(e: &mut Engine) -> Result<(), ForthError> {
    let rp = e.rp();
    let idx = rp
        .len()
        .checked_sub(3)
        .ok_or_else(|| ForthError::execution("J", "no outer loop active"))?;
    let v = rp[idx].clone();
    e.push(v);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Engine;

    #[test]
    fn rot_cycles_third_to_top() {
        let mut e = Engine::new_engine();
        e.interpret("1 2 3 ROT");
        assert_eq!(e.stack(), &[Value::Int(2), Value::Int(3), Value::Int(1)]);
    }

    #[test]
    fn to_r_and_r_from_round_trip() {
        let mut e = Engine::new_engine();
        e.interpret("9 >R R>");
        assert_eq!(e.stack(), &[Value::Int(9)]);
        assert!(e.rp().is_empty());
    }

    #[test]
    fn dash_dup_skips_falsy_top() {
        let mut e = Engine::new_engine();
        e.interpret("0 -DUP");
        assert_eq!(e.stack(), &[Value::Int(0)]);
    }
}
