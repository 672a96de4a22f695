//! Arithmetic, comparison, and logic words (SPEC_FULL.md §4.4).

use crate::dictionary::{Dictionary, WordEntry};
use crate::errors::ForthError;
use crate::runtime::Engine;
use crate::value::{numeric_binop, NumOp, Value};

pub fn register(dict: &mut Dictionary) {
    dict.install_core("+", WordEntry::new_primitive("+", f_add));
    dict.install_core("-", WordEntry::new_primitive("-", f_sub));
    dict.install_core("*", WordEntry::new_primitive("*", f_mul));
    dict.install_core("/", WordEntry::new_primitive("/", f_div));
    dict.install_core("*/", WordEntry::new_primitive("*/", f_star_slash));
    dict.install_core("MOD", WordEntry::new_primitive("MOD", f_mod));
    dict.install_core("/MOD", WordEntry::new_primitive("/MOD", f_slash_mod));
    dict.install_core("*/MOD", WordEntry::new_primitive("*/MOD", f_star_slash_mod));
    dict.install_core("MIN", WordEntry::new_primitive("MIN", f_min));
    dict.install_core("MAX", WordEntry::new_primitive("MAX", f_max));
    dict.install_core("ABS", WordEntry::new_primitive("ABS", f_abs));
    dict.install_core("MINUS", WordEntry::new_primitive("MINUS", f_minus));
    dict.install_core("1+", WordEntry::new_primitive("1+", f_1plus));
    dict.install_core("2+", WordEntry::new_primitive("2+", f_2plus));
    dict.install_core("+-", WordEntry::new_primitive("+-", f_plus_minus));

    dict.install_core("<", WordEntry::new_primitive("<", f_lt));
    dict.install_core(">", WordEntry::new_primitive(">", f_gt));
    dict.install_core("<=", WordEntry::new_primitive("<=", f_le));
    dict.install_core(">=", WordEntry::new_primitive(">=", f_ge));
    dict.install_core("=", WordEntry::new_primitive("=", f_eq));
    dict.install_core("0<", WordEntry::new_primitive("0<", f_0lt));
    dict.install_core("0=", WordEntry::new_primitive("0=", f_0eq));

    dict.install_core("AND", WordEntry::new_primitive("AND", f_and));
    dict.install_core("OR", WordEntry::new_primitive("OR", f_or));
    dict.install_core("XOR", WordEntry::new_primitive("XOR", f_xor));
}

fn pop2(engine: &mut Engine, word: &str) -> Result<(Value, Value), ForthError> {
    let b = engine.pop(word)?;
    let a = engine.pop(word)?;
    Ok((a, b))
}

fn numeric(engine: &mut Engine, word: &str, op: NumOp) -> Result<(), ForthError> {
    let (a, b) = pop2(engine, word)?;
    let r = numeric_binop(&a, &b, op)
        .ok_or_else(|| ForthError::execution(word, "expected numeric operands"))?;
    engine.push(r);
    Ok(())
}

fn f_add(e: &mut Engine) -> Result<(), ForthError> {
    numeric(e, "+", NumOp::Add)
}
fn f_sub(e: &mut Engine) -> Result<(), ForthError> {
    numeric(e, "-", NumOp::Sub)
}
fn f_mul(e: &mut Engine) -> Result<(), ForthError> {
    numeric(e, "*", NumOp::Mul)
}
fn f_div(e: &mut Engine) -> Result<(), ForthError> {
    numeric(e, "/", NumOp::Div)
}

/// Python-style divmod: remainder takes the sign of the divisor.
fn py_divmod(a: i64, b: i64) -> (i64, i64) {
    let mut q = a / b;
    let mut r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q -= 1;
        r += b;
    }
    (q, r)
}

fn require_ints(word: &str, a: &Value, b: &Value) -> Result<(i64, i64), ForthError> {
    match (a.as_int(), b.as_int()) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(ForthError::execution(word, "expected integer operands")),
    }
}

fn f_mod(e: &mut Engine) -> Result<(), ForthError> {
    let (a, b) = pop2(e, "MOD")?;
    let (x, y) = require_ints("MOD", &a, &b)?;
    if y == 0 {
        return Err(ForthError::execution("MOD", "division by zero"));
    }
    let (_, r) = py_divmod(x, y);
    e.push(Value::Int(r));
    Ok(())
}

/// `( n1 n2 -- remainder quotient )`
fn f_slash_mod(e: &mut Engine) -> Result<(), ForthError> {
    let (a, b) = pop2(e, "/MOD")?;
    let (x, y) = require_ints("/MOD", &a, &b)?;
    if y == 0 {
        return Err(ForthError::execution("/MOD", "division by zero"));
    }
    let (q, r) = py_divmod(x, y);
    e.push(Value::Int(r));
    e.push(Value::Int(q));
    Ok(())
}

fn f_star_slash(e: &mut Engine) -> Result<(), ForthError> {
    let c = e.pop("*/")?;
    let b = e.pop("*/")?;
    let a = e.pop("*/")?;
    let prod = numeric_binop(&a, &b, NumOp::Mul)
        .ok_or_else(|| ForthError::execution("*/", "expected numeric operands"))?;
    let r = numeric_binop(&prod, &c, NumOp::Div)
        .ok_or_else(|| ForthError::execution("*/", "expected numeric operands"))?;
    e.push(r);
    Ok(())
}

fn f_star_slash_mod(e: &mut Engine) -> Result<(), ForthError> {
    let c = e.pop("*/MOD")?;
    let b = e.pop("*/MOD")?;
    let a = e.pop("*/MOD")?;
    let (x, y) = require_ints("*/MOD", &a, &b)?;
    let prod = x * y;
    let divisor = c
        .as_int()
        .ok_or_else(|| ForthError::execution("*/MOD", "expected integer operands"))?;
    if divisor == 0 {
        return Err(ForthError::execution("*/MOD", "division by zero"));
    }
    let (q, r) = py_divmod(prod, divisor);
    e.push(Value::Int(r));
    e.push(Value::Int(q));
    Ok(())
}

fn f_min(e: &mut Engine) -> Result<(), ForthError> {
    let (a, b) = pop2(e, "MIN")?;
    let (x, y) = (
        a.as_f64().ok_or_else(|| ForthError::execution("MIN", "expected numeric operands"))?,
        b.as_f64().ok_or_else(|| ForthError::execution("MIN", "expected numeric operands"))?,
    );
    e.push(if x <= y { a } else { b });
    Ok(())
}

fn f_max(e: &mut Engine) -> Result<(), ForthError> {
    let (a, b) = pop2(e, "MAX")?;
    let (x, y) = (
        a.as_f64().ok_or_else(|| ForthError::execution("MAX", "expected numeric operands"))?,
        b.as_f64().ok_or_else(|| ForthError::execution("MAX", "expected numeric operands"))?,
    );
    e.push(if x >= y { a } else { b });
    Ok(())
}

fn f_abs(e: &mut Engine) -> Result<(), ForthError> {
    let a = e.pop("ABS")?;
    let r = match a {
        Value::Int(n) => Value::Int(n.abs()),
        Value::Float(f) => Value::Float(f.abs()),
        _ => return Err(ForthError::execution("ABS", "expected a numeric operand")),
    };
    e.push(r);
    Ok(())
}

fn f_minus(e: &mut Engine) -> Result<(), ForthError> {
    let a = e.pop("MINUS")?;
    let r = match a {
        Value::Int(n) => Value::Int(-n),
        Value::Float(f) => Value::Float(-f),
        _ => return Err(ForthError::execution("MINUS", "expected a numeric operand")),
    };
    e.push(r);
    Ok(())
}

fn f_1plus(e: &mut Engine) -> Result<(), ForthError> {
    let a = e.pop("1+")?;
    let r = numeric_binop(&a, &Value::Int(1), NumOp::Add)
        .ok_or_else(|| ForthError::execution("1+", "expected a numeric operand"))?;
    e.push(r);
    Ok(())
}

fn f_2plus(e: &mut Engine) -> Result<(), ForthError> {
    let a = e.pop("2+")?;
    let r = numeric_binop(&a, &Value::Int(2), NumOp::Add)
        .ok_or_else(|| ForthError::execution("2+", "expected a numeric operand"))?;
    e.push(r);
    Ok(())
}

/// `( n1 n2 -- n3 )`: if n2 < 0, negate n1; else leave n1.
fn f_plus_minus(e: &mut Engine) -> Result<(), ForthError> {
    let (a, b) = pop2(e, "+-")?;
    let negative = match &b {
        Value::Int(n) => *n < 0,
        Value::Float(f) => *f < 0.0,
        _ => return Err(ForthError::execution("+-", "expected a numeric operand")),
    };
    let r = if negative {
        match a {
            Value::Int(n) => Value::Int(-n),
            Value::Float(f) => Value::Float(-f),
            other => other,
        }
    } else {
        a
    };
    e.push(r);
    Ok(())
}

fn compare(e: &mut Engine, word: &str, f: impl Fn(f64, f64) -> bool) -> Result<(), ForthError> {
    let (a, b) = pop2(e, word)?;
    let x = a.as_f64().ok_or_else(|| ForthError::execution(word, "expected numeric operands"))?;
    let y = b.as_f64().ok_or_else(|| ForthError::execution(word, "expected numeric operands"))?;
    e.push(Value::truthy_value(f(x, y)));
    Ok(())
}

fn f_lt(e: &mut Engine) -> Result<(), ForthError> {
    compare(e, "<", |x, y| x < y)
}
fn f_gt(e: &mut Engine) -> Result<(), ForthError> {
    compare(e, ">", |x, y| x > y)
}
fn f_le(e: &mut Engine) -> Result<(), ForthError> {
    compare(e, "<=", |x, y| x <= y)
}
fn f_ge(e: &mut Engine) -> Result<(), ForthError> {
    compare(e, ">=", |x, y| x >= y)
}

fn f_eq(e: &mut Engine) -> Result<(), ForthError> {
    let (a, b) = pop2(e, "=")?;
    e.push(Value::truthy_value(a == b));
    Ok(())
}

fn f_0lt(e: &mut Engine) -> Result<(), ForthError> {
    let a = e.pop("0<")?;
    let x = a.as_f64().ok_or_else(|| ForthError::execution("0<", "expected a numeric operand"))?;
    e.push(Value::truthy_value(x < 0.0));
    Ok(())
}

fn f_0eq(e: &mut Engine) -> Result<(), ForthError> {
    let a = e.pop("0=")?;
    e.push(Value::truthy_value(!a.is_truthy()));
    Ok(())
}

fn f_and(e: &mut Engine) -> Result<(), ForthError> {
    let (a, b) = pop2(e, "AND")?;
    let (x, y) = require_ints("AND", &a, &b)?;
    e.push(Value::Int(x & y));
    Ok(())
}

/// Bitwise on integers; raises on non-integer operands (SPEC_FULL.md §9).
fn f_or(e: &mut Engine) -> Result<(), ForthError> {
    let (a, b) = pop2(e, "OR")?;
    let (x, y) = require_ints("OR", &a, &b)?;
    e.push(Value::Int(x | y));
    Ok(())
}

fn f_xor(e: &mut Engine) -> Result<(), ForthError> {
    let (a, b) = pop2(e, "XOR")?;
    let (x, y) = require_ints("XOR", &a, &b)?;
    e.push(Value::Int(x ^ y));
    Ok(())
}
