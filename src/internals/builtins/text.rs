//! String words: `SPLIT` and `FORMAT` (SPEC_FULL.md §4.4).

use crate::dictionary::{Dictionary, WordEntry};
use crate::errors::ForthError;
use crate::runtime::Engine;
use crate::value::Value;

pub fn register(dict: &mut Dictionary) {
    dict.install_core("SPLIT", WordEntry::new_primitive("SPLIT", f_split));
    dict.install_core("FORMAT", WordEntry::new_primitive("FORMAT", f_format));
}

/// `( s d -- arr )`: splits `s` on delimiter `d`, pushing an array of strings.
/// An empty delimiter splits into individual characters.
fn f_split(e: &mut Engine) -> Result<(), ForthError> {
    let d = e.pop("SPLIT")?;
    let s = e.pop("SPLIT")?;
    let (d, s) = match (d, s) {
        (Value::Str(d), Value::Str(s)) => (d, s),
        _ => return Err(ForthError::execution("SPLIT", "expected two strings")),
    };
    let parts: Vec<Value> = if d.is_empty() {
        s.chars().map(|c| Value::Str(c.to_string())).collect()
    } else {
        s.split(d.as_str()).map(|p| Value::Str(p.to_string())).collect()
    };
    e.push(Value::Array(parts));
    Ok(())
}

/// `( v1 .. vk fmt -- s )`: `k` is the number of `{}` placeholders in `fmt`.
/// Arguments are popped in reverse stack order, then substituted left-to-right.
fn f_format(e: &mut Engine) -> Result<(), ForthError> {
    let fmt = match e.pop("FORMAT")? {
        Value::Str(s) => s,
        other => {
            return Err(ForthError::execution(
                "FORMAT",
                format!("expected a format string, found {}", other),
            ))
        }
    };
    let k = fmt.matches("{}").count();
    let mut args = Vec::with_capacity(k);
    for _ in 0..k {
        args.push(e.pop("FORMAT")?);
    }
    args.reverse();

    let mut result = String::new();
    let mut rest = fmt.as_str();
    for arg in args {
        let pos = rest.find("{}").expect("k counted this many placeholders");
        result.push_str(&rest[..pos]);
        result.push_str(&arg.to_string());
        rest = &rest[pos + 2..];
    }
    result.push_str(rest);
    e.push(Value::Str(result));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Engine;

    #[test]
    fn split_on_space_collects_words_in_order() {
        let mut e = Engine::new_engine();
        e.interpret("\"CONSTANT BUU xyz\" \" \" SPLIT");
        assert_eq!(
            e.stack(),
            &[Value::Array(vec![
                Value::Str("CONSTANT".into()),
                Value::Str("BUU".into()),
                Value::Str("xyz".into()),
            ])]
        );
    }

    #[test]
    fn format_substitutes_placeholders_left_to_right() {
        let mut e = Engine::new_engine();
        e.interpret("2 4 8 \"{} x {} = {}\" FORMAT");
        assert_eq!(e.stack(), &[Value::Str("2 x 4 = 8".into())]);
    }

    #[test]
    fn split_on_empty_delimiter_yields_characters() {
        let mut e = Engine::new_engine();
        e.interpret("\"ab\" \"\" SPLIT");
        assert_eq!(
            e.stack(),
            &[Value::Array(vec![Value::Str("a".into()), Value::Str("b".into())])]
        );
    }
}
