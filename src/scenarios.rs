//! Top-level scenario tests exercising the full pipeline (tokenize ->
//! compile -> execute) against the concrete scenarios of SPEC_FULL.md §8.
//! Each test builds a fresh engine and asserts on its read-only accessors.

#[cfg(test)]
mod tests {
    use crate::runtime::Engine;
    use crate::value::Value;

    #[test]
    fn scenario_1_multiply_dup_dot() {
        let mut e = Engine::new_engine();
        e.interpret("12 3 * DUP .");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(36)]);
    }

    #[test]
    fn scenario_2_colon_definition() {
        let mut e = Engine::new_engine();
        e.interpret(": beta 3 4 * ; beta");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(12)]);
    }

    #[test]
    fn scenario_3_do_loop_runs_full_range() {
        let mut e = Engine::new_engine();
        e.interpret(": t 0 0 5 DO I . 1 + LOOP ; t");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(5)]);
        assert!(e.rp().is_empty());
    }

    #[test]
    fn scenario_4_do_loop_empty_range_skips_body() {
        let mut e = Engine::new_engine();
        e.interpret(": t 0 6 5 DO I . 1 + LOOP ; t");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(0)]);
        assert!(e.rp().is_empty());
    }

    #[test]
    fn scenario_5_if_else_endif() {
        let mut e = Engine::new_engine();
        e.interpret(": t 1 IF 5 ELSE 3 ENDIF ; t");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(5)]);

        let mut e = Engine::new_engine();
        e.interpret(": t 0 IF 2 ELSE 3 ENDIF ; t");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(3)]);
    }

    #[test]
    fn scenario_6_begin_until() {
        let mut e = Engine::new_engine();
        e.interpret(": t 3 BEGIN 1 - DUP 0 = UNTIL ; t");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(0)]);
    }

    #[test]
    fn scenario_7_begin_while_repeat() {
        let mut e = Engine::new_engine();
        e.interpret(": t 7 BEGIN 1 - DUP WHILE DUP . REPEAT ; t");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(0)]);
    }

    #[test]
    fn scenario_8_variable_round_trip() {
        let mut e = Engine::new_engine();
        e.interpret("1234 VARIABLE BUU BUU @");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(1234)]);
    }

    #[test]
    fn scenario_9_split_on_space() {
        let mut e = Engine::new_engine();
        e.interpret("\"CONSTANT BUU xyz\" \" \" SPLIT");
        assert!(e.last_error().is_none());
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
    fn scenario_10_format_substitutes_placeholders() {
        let mut e = Engine::new_engine();
        e.interpret("2 4 8 \"{} x {} = {}\" FORMAT");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Str("2 x 4 = 8".into())]);
    }

    #[test]
    fn scenario_11_slash_mod_remainder_below_quotient() {
        let mut e = Engine::new_engine();
        e.interpret("17 4 /MOD");
        assert!(e.last_error().is_none());
        assert_eq!(e.stack(), &[Value::Int(1), Value::Int(4)]);
    }

    #[test]
    fn scenario_12_leave_terminates_loop_with_clean_return_stack() {
        let mut e = Engine::new_engine();
        e.interpret(": t 0 10 DO I DUP 3 = IF LEAVE ENDIF LOOP ; t");
        assert!(e.last_error().is_none());
        assert_eq!(
            e.stack(),
            &[Value::Int(0), Value::Int(1), Value::Int(2), Value::Int(3)]
        );
        assert!(e.rp().is_empty());
    }
}
