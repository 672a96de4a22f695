//! Linear RAM: a dense, auto-extending vector of `Value`.

use crate::value::Value;

/// Randomly addressable memory. Reads past the end yield `NIL`; writes past
/// the end extend the vector with `NIL` fillers.
#[derive(Debug, Default)]
pub struct Ram {
    cells: Vec<Value>,
}

impl Ram {
    pub fn new() -> Self {
        Ram { cells: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, idx: usize) -> Value {
        self.cells.get(idx).cloned().unwrap_or(Value::Nil)
    }

    pub fn set(&mut self, idx: usize, val: Value) {
        while idx >= self.cells.len() {
            self.cells.push(Value::Nil);
        }
        self.cells[idx] = val;
    }

    /// Adds a cell and returns its index.
    pub fn append(&mut self, val: Value) -> usize {
        let idx = self.cells.len();
        self.cells.push(val);
        idx
    }

    pub fn fill(&mut self, addr: usize, count: usize, val: Value) {
        for a in addr..addr + count {
            self.set(a, val.clone());
        }
    }

    /// Moves `count` cells from `src` to `dst`; vacated source cells become `NIL`.
    pub fn move_cells(&mut self, src: usize, dst: usize, count: usize) {
        let copied: Vec<Value> = (src..src + count).map(|a| self.get(a)).collect();
        self.fill(src, count, Value::Nil);
        for (i, v) in copied.into_iter().enumerate() {
            self.set(dst + i, v);
        }
    }

    pub fn snapshot(&self) -> &[Value] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_past_end_is_nil() {
        let ram = Ram::new();
        assert_eq!(ram.get(42), Value::Nil);
    }

    #[test]
    fn write_extends_with_nil_fillers() {
        let mut ram = Ram::new();
        ram.set(3, Value::Int(9));
        assert_eq!(ram.len(), 4);
        assert_eq!(ram.get(0), Value::Nil);
        assert_eq!(ram.get(3), Value::Int(9));
    }

    #[test]
    fn append_returns_index() {
        let mut ram = Ram::new();
        assert_eq!(ram.append(Value::Int(1)), 0);
        assert_eq!(ram.append(Value::Int(2)), 1);
    }

    #[test]
    fn move_cells_vacates_source() {
        let mut ram = Ram::new();
        ram.set(0, Value::Int(1));
        ram.set(1, Value::Int(2));
        ram.move_cells(0, 5, 2);
        assert_eq!(ram.get(0), Value::Nil);
        assert_eq!(ram.get(1), Value::Nil);
        assert_eq!(ram.get(5), Value::Int(1));
        assert_eq!(ram.get(6), Value::Int(2));
    }
}
