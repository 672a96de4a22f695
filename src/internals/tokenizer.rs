//! Outer-interpreter front end: turns the mutable input buffer into a stream
//! of tokens (SPEC_FULL.md §4.1).

use crate::runtime::Engine;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Word(String),
    Number(Value),
    Str(String),
}

const DOC_QUOTE: &str = "\"\"\"";

/// Skips characters until `delim` is matched or the buffer ends, advancing
/// past the delimiter when found. Exposed for `."`, `(`, and `LOAD`.
pub fn get_input_till(engine: &mut Engine, delim: &str) -> String {
    if engine.cli_idx >= engine.cli.len() {
        return String::new();
    }
    let start = engine.cli_idx;
    while engine.cli_idx < engine.cli.len() && !engine.cli[engine.cli_idx..].starts_with(delim) {
        let next = engine.cli[engine.cli_idx..].chars().next().map(|c| c.len_utf8()).unwrap_or(1);
        engine.cli_idx += next;
    }
    let word = engine.cli[start..engine.cli_idx].to_string();
    if engine.cli[engine.cli_idx..].starts_with(delim) {
        engine.cli_idx += delim.len();
    }
    word
}

pub fn next_word(engine: &mut Engine) -> Option<Token> {
    while engine.in_doc_quote {
        let text = get_input_till(engine, DOC_QUOTE);
        if engine.is_compiling {
            if let Some(def) = engine.current_def.as_mut() {
                def.docstring.push(text);
            }
        }
        if engine.cli_idx >= engine.cli.len() {
            engine.in_doc_quote = true;
            return None;
        }
        engine.in_doc_quote = false;
    }

    let mut idx = engine.cli_idx;
    let chars: Vec<char> = engine.cli.chars().collect();
    while idx < chars.len() && chars[idx].is_whitespace() {
        idx += 1;
    }
    if idx >= chars.len() {
        engine.cli_idx = idx;
        return None;
    }

    let rest: String = chars[idx..].iter().collect();
    if rest.starts_with(DOC_QUOTE) {
        engine.cli_idx = byte_index(&chars, idx) + DOC_QUOTE.len();
        engine.in_doc_quote = true;
        return next_word(engine);
    }

    if chars[idx] == '"' {
        engine.cli_idx = byte_index(&chars, idx + 1);
        let text = get_input_till(engine, "\"");
        return Some(Token::Str(text));
    }

    let start = idx;
    idx += 1;
    while idx < chars.len() && !chars[idx].is_whitespace() {
        idx += 1;
    }
    let word: String = chars[start..idx].iter().collect();
    engine.cli_idx = byte_index(&chars, idx);

    match parse_number(&word) {
        Some(v) => Some(Token::Number(v)),
        None => Some(Token::Word(word)),
    }
}

fn byte_index(chars: &[char], char_idx: usize) -> usize {
    chars[..char_idx].iter().map(|c| c.len_utf8()).sum()
}

fn parse_number(word: &str) -> Option<Value> {
    if word.contains('.') {
        word.parse::<f64>().ok().map(Value::Float)
    } else {
        word.parse::<i64>().ok().map(Value::Int)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Engine;

    fn tokens(line: &str) -> Vec<Token> {
        let mut engine = Engine::new_engine();
        engine.cli = line.to_string();
        engine.cli_idx = 0;
        let mut out = Vec::new();
        while let Some(tok) = next_word(&mut engine) {
            out.push(tok);
        }
        out
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(
            tokens("DUP 1 2"),
            vec![
                Token::Word("DUP".into()),
                Token::Number(Value::Int(1)),
                Token::Number(Value::Int(2)),
            ]
        );
    }

    #[test]
    fn floats_prefer_when_dot_present() {
        assert_eq!(tokens("3.5"), vec![Token::Number(Value::Float(3.5))]);
    }

    #[test]
    fn quoted_string_strips_quotes() {
        assert_eq!(tokens("\"hi there\""), vec![Token::Str("hi there".into())]);
    }

    #[test]
    fn doc_quote_spans_are_consumed_not_emitted() {
        assert_eq!(tokens("\"\"\" hello \"\"\" DUP"), vec![Token::Word("DUP".into())]);
    }
}
