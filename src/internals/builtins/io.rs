//! Text output and file loading: `.` `."` `(` `EXPECT` `LOAD` `WORDS`
//! (SPEC_FULL.md §4.4, §6).

use crate::dictionary::{Dictionary, WordEntry};
use crate::errors::ForthError;
use crate::files::FileHandle;
use crate::internals::tokenizer::get_input_till;
use crate::runtime::Engine;
use crate::value::Value;
use std::path::Path;

pub fn register(dict: &mut Dictionary) {
    dict.install_core(".", WordEntry::new_primitive(".", f_dot));
    dict.install_core(".\"", WordEntry::new_primitive(".\"", f_dot_quote).immediate());
    dict.install_core("(", WordEntry::new_primitive("(", f_paren_comment).immediate());
    dict.install_core("EXPECT", WordEntry::new_primitive("EXPECT", f_expect));
    dict.install_core("LOAD", WordEntry::new_primitive("LOAD", f_load));
    dict.install_core("WORDS", WordEntry::new_primitive("WORDS", f_words));
}

fn f_dot(e: &mut Engine) -> Result<(), ForthError> {
    let v = e.pop(".")?;
    e.output(&format!("{} ", v));
    Ok(())
}

/// Consumes raw text up to the next `"` and either prints it immediately
/// (executing) or compiles it as a string literal followed by `.`
/// (compiling) -- see `get_input_till`'s doc comment.
fn f_dot_quote(e: &mut Engine) -> Result<(), ForthError> {
    let text = get_input_till(e, "\"");
    if e.is_compiling() {
        e.emit_inline(Value::Str(text))?;
        e.emit_core(".")?;
    } else {
        e.output(&text);
    }
    Ok(())
}

/// A parenthesized comment: consumes up to `)` and discards it.
fn f_paren_comment(e: &mut Engine) -> Result<(), ForthError> {
    let _ = get_input_till(e, ")");
    Ok(())
}

/// Reads one line from the innermost active `LOAD` or, if none, from stdin.
fn f_expect(e: &mut Engine) -> Result<(), ForthError> {
    let line = match e.readers.last_mut() {
        Some(handle) => handle.get_line(),
        None => FileHandle::stdin().get_line(),
    };
    e.push(Value::Str(line.unwrap_or_default()));
    Ok(())
}

fn f_load(e: &mut Engine) -> Result<(), ForthError> {
    let v = e.pop("LOAD")?;
    let path = match v {
        Value::Str(s) => s,
        other => {
            return Err(ForthError::execution(
                "LOAD",
                format!("expected a filename string, found {}", other),
            ))
        }
    };
    load_file(e, &path)
}

/// Opens `path`, feeds it through `interpret` line by line, and releases
/// the handle before returning -- including when the open itself fails.
pub fn load_file(e: &mut Engine, path: &str) -> Result<(), ForthError> {
    let handle =
        FileHandle::open_for_load(Path::new(path)).map_err(|err| ForthError::io(path, err.to_string()))?;
    e.readers.push(handle);
    run_loaded_lines(e);
    e.readers.pop();
    Ok(())
}

fn run_loaded_lines(e: &mut Engine) {
    loop {
        let line = match e.readers.last_mut() {
            Some(handle) => handle.get_line(),
            None => return,
        };
        match line {
            Some(l) => {
                e.interpret(&l);
                if e.should_exit() {
                    return;
                }
            }
            None => return,
        }
    }
}

fn f_words(e: &mut Engine) -> Result<(), ForthError> {
    let idx = e.dictionary().context;
    for name in e.dictionary().words_in(idx) {
        e.output(&format!("{} ", name));
    }
    e.output("\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Engine;
    use std::fs::File;
    use std::io::Write as _;

    #[test]
    fn load_missing_file_is_io_error() {
        let mut e = Engine::new_engine();
        let err = load_file(&mut e, "/nonexistent/path/zzz.fs").unwrap_err();
        assert!(matches!(err, ForthError::IoError { .. }));
    }

    #[test]
    fn load_runs_each_line_through_interpret() {
        let mut tmp = std::env::temp_dir();
        tmp.push("threadforth_io_test_load.fs");
        {
            let mut f = File::create(&tmp).unwrap();
            writeln!(f, ": DOUBLE DUP + ;").unwrap();
            writeln!(f, "21 DOUBLE").unwrap();
        }
        let mut e = Engine::new_engine();
        load_file(&mut e, tmp.to_str().unwrap()).unwrap();
        assert_eq!(e.stack(), &[Value::Int(42)]);
        assert!(e.readers.is_empty());
        let _ = std::fs::remove_file(&tmp);
    }

    #[test]
    fn dot_quote_compiles_a_string_literal_then_dot() {
        let mut e = Engine::new_engine();
        e.interpret(": GREET .\" hi\" ;");
        assert!(e.last_error().is_none());
        assert!(e.stack().is_empty());
    }
}
