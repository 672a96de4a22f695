//! Inner interpreter: walks a `Threaded` body's slots via a call-frame
//! stack (SPEC_FULL.md §4.3).

use crate::dictionary::{Slot, WordId, WordKind};
use crate::errors::ForthError;
use crate::runtime::{Engine, Frame};

pub fn execute_word(engine: &mut Engine, id: WordId) -> Result<(), ForthError> {
    let kind_is_threaded = matches!(engine.dictionary().get(id).kind, WordKind::Threaded(_));

    if !kind_is_threaded {
        return match engine.dictionary().get(id).kind {
            WordKind::Constant(ref v) => {
                let v = v.clone();
                engine.push(v);
                Ok(())
            }
            WordKind::Primitive(f) => f(engine),
            WordKind::Threaded(_) => unreachable!(),
        };
    }

    engine.frames.push(Frame { word: id, xp: 0 });
    let result = run_frame(engine);
    engine.frames.pop();
    result
}

fn run_frame(engine: &mut Engine) -> Result<(), ForthError> {
    loop {
        let frame_idx = engine.frames.len() - 1;
        let word = engine.frames[frame_idx].word;
        let xp = engine.frames[frame_idx].xp;

        let code_len = match &engine.dictionary().get(word).kind {
            WordKind::Threaded(code) => code.len(),
            _ => return Err(ForthError::execution("<inner>", "frame word is not threaded")),
        };
        if xp >= code_len {
            return Ok(());
        }

        let slot = match &engine.dictionary().get(word).kind {
            WordKind::Threaded(code) => code[xp].clone(),
            _ => unreachable!(),
        };
        engine.frames[frame_idx].xp += 1;

        match slot {
            Slot::Inline(v) => engine.push(v),
            Slot::Ref(id) => execute_word(engine, id)?,
        }
    }
}

/// Reads the inline offset at the parent frame's `xp` and advances `xp` by
/// it. The offset is measured from the slot *holding* the offset.
pub fn branch(engine: &mut Engine) -> Result<(), ForthError> {
    let frame_idx = engine
        .frames
        .len()
        .checked_sub(1)
        .ok_or_else(|| ForthError::execution("BRANCH", "no active frame to branch in"))?;
    let word = engine.frames[frame_idx].word;
    let xp = engine.frames[frame_idx].xp;
    let offset = match &engine.dictionary().get(word).kind {
        WordKind::Threaded(code) => match code.get(xp) {
            Some(Slot::Inline(v)) => v
                .as_int()
                .ok_or_else(|| ForthError::execution("BRANCH", "branch offset is not an integer"))?,
            _ => return Err(ForthError::execution("BRANCH", "missing branch offset slot")),
        },
        _ => return Err(ForthError::execution("BRANCH", "frame word is not threaded")),
    };
    engine.frames[frame_idx].xp = (xp as i64 + offset) as usize;
    Ok(())
}

/// Pops the data stack; if falsy, branches like `BRANCH`; else skips the offset slot.
pub fn branch0(engine: &mut Engine) -> Result<(), ForthError> {
    let cond = engine.pop("0BRANCH")?;
    if cond.is_truthy() {
        let frame_idx = engine.frames.len() - 1;
        engine.frames[frame_idx].xp += 1;
        Ok(())
    } else {
        branch(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn threaded_word_pushes_inline_constants_in_order() {
        let mut engine = Engine::new_engine();
        engine.current_def = Some(crate::dictionary::WordEntry::new_threaded("T"));
        engine.is_compiling = true;
        engine.emit_inline(Value::Int(10)).unwrap();
        engine.emit_inline(Value::Int(20)).unwrap();
        let entry = engine.current_def.take().unwrap();
        let id = engine
            .dictionary
            .install(engine.dictionary.core_index(), "T-TEST", entry);
        engine.is_compiling = false;
        execute_word(&mut engine, id).unwrap();
        assert_eq!(engine.stack(), &[Value::Int(10), Value::Int(20)]);
    }
}
