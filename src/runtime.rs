//! The engine: ties together the dictionary, the stacks, memory, and the
//! compile/run state into the single object the outer and inner
//! interpreters operate on.

use crate::dictionary::{Dictionary, Slot, WordEntry, WordId};
use crate::errors::ForthError;
use crate::files::FileHandle;
use crate::internals::builtins;
use crate::memory::Ram;
use crate::messages::Msg;
use crate::value::Value;

/// One activation of a `Threaded` body: a reference to the body being
/// walked, plus the instruction pointer into its `code`.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub word: WordId,
    pub xp: usize,
}

/// Flag sentinels pushed (as `Value::Str`) onto the data stack during
/// compilation to pair control-flow openers with their closers.
pub mod flag {
    pub const DOIF: &str = "DOIF";
    pub const BEGINFLAG: &str = "BEGINFLAG";
    pub const WHILEFLAG: &str = "WHILEFLAG";
    pub const DOFLAG: &str = "DOFLAG";
}

/// Something `engine.run()` can pull prompted lines from. The interactive
/// read-loop is an external collaborator; this is the seam it plugs into.
pub trait LineSource {
    fn next_line(&mut self, prompt: &str) -> Option<String>;
}

pub struct Engine {
    pub(crate) dictionary: Dictionary,
    pub(crate) stack: Vec<Value>,
    pub(crate) rp: Vec<Value>,
    pub(crate) mem: Ram,
    pub(crate) frames: Vec<Frame>,

    pub(crate) is_compiling: bool,
    pub(crate) current_def: Option<WordEntry>,
    pub(crate) leave_stack: Vec<Vec<usize>>,

    pub(crate) cli: String,
    pub(crate) cli_idx: usize,
    pub(crate) in_doc_quote: bool,

    pub(crate) last_error: Option<ForthError>,
    pub(crate) msg: Msg,
    pub(crate) readers: Vec<FileHandle>,
    pub(crate) should_exit: bool,
}

impl Engine {
    pub fn new_engine() -> Engine {
        let mut engine = Engine {
            dictionary: Dictionary::new(),
            stack: Vec::new(),
            rp: Vec::new(),
            mem: Ram::new(),
            frames: Vec::new(),
            is_compiling: false,
            current_def: None,
            leave_stack: Vec::new(),
            cli: String::new(),
            cli_idx: 0,
            in_doc_quote: false,
            last_error: None,
            msg: Msg::new(),
            readers: Vec::new(),
            should_exit: false,
        };
        engine.cold_start();
        engine
    }

    fn cold_start(&mut self) {
        builtins::register_all(&mut self.dictionary);
        crate::internals::debug::register(&mut self.dictionary);
    }

    // ---- read-only accessors (§6) ----

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn rp(&self) -> &[Value] {
        &self.rp
    }

    pub fn mem(&self) -> &Ram {
        &self.mem
    }

    pub fn mem_get(&self, addr: usize) -> Value {
        self.mem.get(addr)
    }

    pub fn mem_set(&mut self, addr: usize, v: Value) {
        self.mem.set(addr, v);
    }

    pub fn mem_append(&mut self, v: Value) -> usize {
        self.mem.append(v)
    }

    pub fn mem_fill(&mut self, addr: usize, count: usize, v: Value) {
        self.mem.fill(addr, count, v);
    }

    pub fn mem_move(&mut self, src: usize, dst: usize, count: usize) {
        self.mem.move_cells(src, dst, count);
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn last_error(&self) -> Option<&ForthError> {
        self.last_error.as_ref()
    }

    pub fn is_compiling(&self) -> bool {
        self.is_compiling
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn msg(&self) -> &Msg {
        &self.msg
    }

    pub fn set_debug_level(&mut self, level: crate::messages::DebugLevel) {
        self.msg.set_level(level);
    }

    pub fn f_bye(&mut self) -> Result<(), ForthError> {
        self.should_exit = true;
        Ok(())
    }

    pub fn output(&self, s: &str) {
        print!("{}", s);
        use std::io::Write;
        let _ = std::io::stdout().flush();
    }

    // ---- stack helpers shared by builtins ----

    pub fn push(&mut self, v: Value) {
        self.stack.push(v);
    }

    pub fn pop(&mut self, expr: &str) -> Result<Value, ForthError> {
        self.stack
            .pop()
            .ok_or_else(|| ForthError::execution(expr, "data stack underflow"))
    }

    pub fn pop_int(&mut self, expr: &str) -> Result<i64, ForthError> {
        let v = self.pop(expr)?;
        v.as_int()
            .ok_or_else(|| ForthError::execution(expr, "expected an integer"))
    }

    pub fn rpush(&mut self, v: Value) {
        self.rp.push(v);
    }

    pub fn rpop(&mut self, expr: &str) -> Result<Value, ForthError> {
        self.rp
            .pop()
            .ok_or_else(|| ForthError::execution(expr, "return stack underflow"))
    }

    /// Peeks the return stack `from_top` cells below the top (0 = top itself).
    pub fn rp_peek(&self, from_top: usize) -> Option<&Value> {
        let n = self.rp.len();
        if from_top >= n {
            None
        } else {
            Some(&self.rp[n - 1 - from_top])
        }
    }

    pub fn rp_set_top(&mut self, v: Value) -> Result<(), ForthError> {
        let n = self.rp.len();
        if n == 0 {
            return Err(ForthError::execution("<loop>", "return stack underflow"));
        }
        self.rp[n - 1] = v;
        Ok(())
    }

    // ---- compile state ----

    pub fn start_loop(&mut self) {
        self.leave_stack.push(Vec::new());
    }

    /// Pops the active loop's pending `LEAVE` slots and back-patches each to
    /// land at `landing_slot` -- the slot immediately following the
    /// closer's own cleanup code (see SPEC_FULL.md §9, "LEAVE offset
    /// correctness with cleanup").
    pub fn end_loop(&mut self, landing_slot: usize) -> Result<(), ForthError> {
        let leaves = self
            .leave_stack
            .pop()
            .ok_or_else(|| ForthError::control_flow("LOOP", "no active loop to close"))?;
        for slot_idx in leaves {
            let dest = landing_slot as isize - slot_idx as isize;
            self.patch_slot(slot_idx, dest as i64)?;
        }
        Ok(())
    }

    pub fn mark_leave(&mut self, slot_idx: usize) -> Result<(), ForthError> {
        self.leave_stack
            .last_mut()
            .ok_or_else(|| ForthError::control_flow("LEAVE", "LEAVE outside any loop"))?
            .push(slot_idx);
        Ok(())
    }

    /// Current length of the body under compilation (the index the next
    /// emitted slot will occupy).
    pub fn compile_len(&self) -> usize {
        self.current_def
            .as_ref()
            .map(|d| d.code().map(|c| c.len()).unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn emit_ref(&mut self, id: WordId) -> Result<usize, ForthError> {
        self.emit_slot(Slot::Ref(id))
    }

    pub fn emit_inline(&mut self, v: Value) -> Result<usize, ForthError> {
        self.emit_slot(Slot::Inline(v))
    }

    fn emit_slot(&mut self, slot: Slot) -> Result<usize, ForthError> {
        let def = self
            .current_def
            .as_mut()
            .ok_or_else(|| ForthError::compilation("<emit>", "not compiling"))?;
        match &mut def.kind {
            crate::dictionary::WordKind::Threaded(code) => {
                code.push(slot);
                Ok(code.len() - 1)
            }
            _ => Err(ForthError::compilation("<emit>", "current_def is not threaded")),
        }
    }

    /// Emits a reference to the core word named `name`. Used so control-flow
    /// immediates always bind to the canonical primitive, never a user
    /// redefinition (SPEC_FULL.md §4.2).
    pub fn emit_core(&mut self, name: &str) -> Result<usize, ForthError> {
        let id = self
            .dictionary
            .find_core(name)
            .ok_or_else(|| ForthError::compilation(name, "core word missing at cold start"))?;
        self.emit_ref(id)
    }

    pub fn patch_slot(&mut self, slot_idx: usize, offset: i64) -> Result<(), ForthError> {
        let def = self
            .current_def
            .as_mut()
            .ok_or_else(|| ForthError::compilation("<patch>", "not compiling"))?;
        match &mut def.kind {
            crate::dictionary::WordKind::Threaded(code) => match code.get_mut(slot_idx) {
                Some(Slot::Inline(Value::Int(n))) => {
                    *n = offset;
                    Ok(())
                }
                _ => Err(ForthError::compilation("<patch>", "slot is not a back-patch target")),
            },
            _ => Err(ForthError::compilation("<patch>", "current_def is not threaded")),
        }
    }

    // ---- embedding API (§6) ----

    /// Tokenizes and executes/compiles one chunk of input, preserving any
    /// prior buffer state across nested calls (e.g. `LOAD` re-entering via
    /// `interpret` while the outer call is still mid-buffer).
    pub fn interpret(&mut self, line: &str) {
        let saved_cli = std::mem::replace(&mut self.cli, line.to_string());
        let saved_idx = std::mem::replace(&mut self.cli_idx, 0);
        self.process_cli();
        self.cli = saved_cli;
        self.cli_idx = saved_idx;
    }

    fn process_cli(&mut self) {
        loop {
            if self.should_exit {
                return;
            }
            match crate::internals::tokenizer::next_word(self) {
                Some(tok) => {
                    if let Err(e) = crate::internals::compiler::dispatch(self, tok) {
                        self.msg
                            .error("process_cli", "dispatch failed", Some(e.to_string()));
                        self.postmortem();
                        println!("{}", e);
                        self.reset();
                        self.last_error = Some(e);
                        return;
                    }
                }
                None => return,
            }
        }
    }

    /// Feeds a line-oriented stream into `interpret`, one line at a time.
    pub fn read_from<R: std::io::BufRead>(&mut self, reader: R) -> std::io::Result<()> {
        for line in reader.lines() {
            let line = line?;
            self.interpret(&line);
            if self.should_exit {
                break;
            }
        }
        Ok(())
    }

    /// The REPL loop: pulls lines from `source` and interprets each until
    /// the source is exhausted or the engine is told to exit (`BYE`).
    pub fn run(&mut self, source: &mut dyn LineSource) {
        let prompt = "> ";
        while !self.should_exit {
            match source.next_line(prompt) {
                Some(line) => self.interpret(&line),
                None => break,
            }
        }
    }

    /// Clears runtime state: stacks, compile state, and input buffer. Used
    /// both by the `RESET` word and internally after any error.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.rp.clear();
        self.frames.clear();
        self.is_compiling = false;
        self.current_def = None;
        self.leave_stack.clear();
        self.cli.clear();
        self.cli_idx = 0;
        self.in_doc_quote = false;
        self.last_error = None;
        self.msg.info("reset", "Reset", None::<&str>);
    }

    fn postmortem(&self) {
        self.msg
            .debug("postmortem", "data stack", Some(format!("{:?}", self.stack)));
        self.msg
            .debug("postmortem", "return stack", Some(format!("{:?}", self.rp)));
        let depth = self.frames.len().min(10);
        for frame in self.frames.iter().rev().take(depth) {
            self.msg.debug(
                "postmortem",
                "frame",
                Some(format!("word={:?} xp={}", frame.word, frame.xp)),
            );
        }
    }

    // ---- execution entry point used by the outer interpreter and EXECUTE (§4.3) ----

    pub fn execute_word(&mut self, id: WordId) -> Result<(), ForthError> {
        crate::internals::inner::execute_word(self, id)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new_engine()
    }
}

pub fn new_engine() -> Engine {
    Engine::new_engine()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_start_installs_core_words() {
        let engine = Engine::new_engine();
        assert!(engine.dictionary.find_word("DUP").is_some());
        assert!(engine.dictionary.find_word(":").is_some());
    }

    #[test]
    fn reset_clears_stacks_and_compile_state() {
        let mut engine = Engine::new_engine();
        engine.push(Value::Int(1));
        engine.rpush(Value::Int(2));
        engine.is_compiling = true;
        engine.reset();
        assert!(engine.stack().is_empty());
        assert!(engine.rp().is_empty());
        assert!(!engine.is_compiling());
    }

    #[test]
    fn interpret_restores_buffer_across_nested_calls() {
        let mut engine = Engine::new_engine();
        engine.cli = "OUTER".to_string();
        engine.cli_idx = 3;
        engine.interpret("1 2 +");
        assert_eq!(engine.cli, "OUTER");
        assert_eq!(engine.cli_idx, 3);
        assert_eq!(engine.stack(), &[Value::Int(3)]);
    }
}
