//! The dictionary: a stable-ID arena of word entries, grouped into ordered
//! vocabularies. Redefinition updates the name→ID binding without breaking
//! slots compiled against the old ID (see SPEC_FULL.md §9, "Dictionary as graph").

use crate::errors::ForthError;
use crate::runtime::Engine;
use crate::value::Value;
use std::collections::BTreeMap;

pub type PrimitiveFn = fn(&mut Engine) -> Result<(), ForthError>;

/// Stable handle into the word arena. Never reused or invalidated by redefinition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordId(pub usize);

/// One slot of a threaded body: either a reference to another word, or an
/// inline constant. Inline constants double as mutable back-patch targets
/// for control-flow offsets.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Ref(WordId),
    Inline(Value),
}

#[derive(Debug, Clone)]
pub enum WordKind {
    Primitive(PrimitiveFn),
    Threaded(Vec<Slot>),
    Constant(Value),
}

#[derive(Debug, Clone)]
pub struct WordEntry {
    pub name: String,
    pub kind: WordKind,
    pub immediate: bool,
    pub execute_only: bool,
    pub colon_only: bool,
    pub docstring: Vec<String>,
}

impl WordEntry {
    pub fn new_primitive(name: &str, f: PrimitiveFn) -> Self {
        WordEntry {
            name: name.to_string(),
            kind: WordKind::Primitive(f),
            immediate: false,
            execute_only: false,
            colon_only: false,
            docstring: Vec::new(),
        }
    }

    pub fn new_threaded(name: &str) -> Self {
        WordEntry {
            name: name.to_string(),
            kind: WordKind::Threaded(Vec::new()),
            immediate: false,
            execute_only: false,
            colon_only: false,
            docstring: Vec::new(),
        }
    }

    pub fn new_constant(name: &str, value: Value) -> Self {
        WordEntry {
            name: name.to_string(),
            kind: WordKind::Constant(value),
            immediate: false,
            execute_only: false,
            colon_only: false,
            docstring: Vec::new(),
        }
    }

    pub fn immediate(mut self) -> Self {
        self.immediate = true;
        self
    }

    pub fn execute_only(mut self) -> Self {
        self.execute_only = true;
        self
    }

    pub fn colon_only(mut self) -> Self {
        self.colon_only = true;
        self
    }

    pub fn code(&self) -> Option<&[Slot]> {
        match &self.kind {
            WordKind::Threaded(code) => Some(code),
            _ => None,
        }
    }
}

/// An ordered name→word mapping. Names are kept in a `BTreeMap` so `WORDS`
/// can list them sorted with no extra work.
#[derive(Debug, Default)]
pub struct Vocabulary {
    pub name: String,
    pub words: BTreeMap<String, WordId>,
}

impl Vocabulary {
    pub fn new(name: &str) -> Self {
        Vocabulary {
            name: name.to_string(),
            words: BTreeMap::new(),
        }
    }
}

pub const FORTH_VOCABULARY: &str = "FORTH";

/// The arena of all word entries plus the ordered collection of vocabularies.
pub struct Dictionary {
    arena: Vec<WordEntry>,
    vocabularies: Vec<Vocabulary>,
    pub context: usize,
    pub definitions: usize,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary {
            arena: Vec::new(),
            vocabularies: vec![Vocabulary::new(FORTH_VOCABULARY)],
            context: 0,
            definitions: 0,
        }
    }

    pub fn get(&self, id: WordId) -> &WordEntry {
        &self.arena[id.0]
    }

    pub fn get_mut(&mut self, id: WordId) -> &mut WordEntry {
        &mut self.arena[id.0]
    }

    /// Core vocabulary: index 0, created at startup, never removed.
    pub fn core_index(&self) -> usize {
        0
    }

    pub fn vocabularies(&self) -> &[Vocabulary] {
        &self.vocabularies
    }

    pub fn vocabulary_index(&self, name: &str) -> Option<usize> {
        self.vocabularies.iter().position(|v| v.name == name)
    }

    /// Creates a new empty vocabulary (used by `VOCABULARY <name>`), returning its index.
    pub fn create_vocabulary(&mut self, name: &str) -> usize {
        self.vocabularies.push(Vocabulary::new(name));
        self.vocabularies.len() - 1
    }

    /// Installs `entry` into vocabulary `voc_idx` under `name`, allocating a
    /// fresh arena slot. Redefinition replaces the name→ID binding in that
    /// vocabulary; previously compiled slots that still carry the old ID
    /// keep resolving to the old entry.
    pub fn install(&mut self, voc_idx: usize, name: &str, entry: WordEntry) -> WordId {
        self.arena.push(entry);
        let id = WordId(self.arena.len() - 1);
        self.vocabularies[voc_idx].words.insert(name.to_string(), id);
        id
    }

    /// Installs into the core (`FORTH`) vocabulary. Used for builtin registration.
    pub fn install_core(&mut self, name: &str, entry: WordEntry) -> WordId {
        let core = self.core_index();
        self.install(core, name, entry)
    }

    /// Looks up `name` by resolution rule: context vocabulary first, then
    /// all vocabularies in reverse insertion order.
    pub fn find_word(&self, name: &str) -> Option<WordId> {
        if let Some(id) = self.vocabularies[self.context].words.get(name) {
            return Some(*id);
        }
        self.vocabularies
            .iter()
            .rev()
            .find_map(|v| v.words.get(name).copied())
    }

    /// Resolves a name strictly against the core vocabulary, bypassing
    /// context/definitions. Used by the compiler to emit primitive
    /// references to control-flow words that a user redefinition must not shadow.
    pub fn find_core(&self, name: &str) -> Option<WordId> {
        let core = self.core_index();
        self.vocabularies[core].words.get(name).copied()
    }

    pub fn words_in(&self, voc_idx: usize) -> impl Iterator<Item = &str> {
        self.vocabularies[voc_idx].words.keys().map(|s| s.as_str())
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Dictionary::new()
    }
}
