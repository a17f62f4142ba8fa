//! The dictionary shared in shape, but never in memory, by encoder and decoder.
use std::collections::HashMap;
use std::rc::Rc;

use crate::{Code, MAX_ENTRIES};

/// A table of learned byte strings.
///
/// Strings are numbered in insertion order starting at code `0`. Each string is stored once and
/// is reachable both by its code and by its content. The table only ever grows: inserting a
/// string that is already present, or inserting into a full table, does nothing.
pub struct Dictionary {
    /// The strings, indexed by code.
    entries: Vec<Rc<[u8]>>,
    /// The reverse view of `entries`.
    lookup: HashMap<Rc<[u8]>, Code>,
    /// Upper bound for the length of `entries`.
    capacity: usize,
}

impl Dictionary {
    /// Create an empty dictionary that holds at most `capacity` strings.
    ///
    /// # Panics
    ///
    /// If `capacity` exceeds [`MAX_ENTRIES`], since larger codes could not be told apart from
    /// escaped literals.
    ///
    /// [`MAX_ENTRIES`]: ../constant.MAX_ENTRIES.html
    pub fn new(capacity: usize) -> Self {
        crate::assert_capacity(capacity);
        Dictionary {
            entries: Vec::new(),
            lookup: HashMap::new(),
            capacity,
        }
    }

    /// Find the code of a string.
    pub fn lookup_code(&self, string: &[u8]) -> Option<Code> {
        self.lookup.get(string).copied()
    }

    pub fn contains(&self, string: &[u8]) -> bool {
        self.lookup.contains_key(string)
    }

    /// Retrieve the string stored under a code.
    pub fn get(&self, code: Code) -> Option<&[u8]> {
        self.entries.get(usize::from(code)).map(|entry| &**entry)
    }

    /// Add a string under the next free code.
    ///
    /// Returns the new code, or `None` when the string is empty, was already present, or the
    /// dictionary is full. None of these is an error, the dictionary just does not grow.
    pub fn insert(&mut self, string: &[u8]) -> Option<Code> {
        if string.is_empty() || self.is_full() || self.contains(string) {
            return None;
        }

        let code = self.next_code();
        let entry: Rc<[u8]> = Rc::from(string);
        self.lookup.insert(Rc::clone(&entry), code);
        self.entries.push(entry);

        if self.is_full() {
            tracing::debug!(capacity = self.capacity, "dictionary full, growth stopped");
        }

        Some(code)
    }

    /// The code the next inserted string will receive.
    pub fn next_code(&self) -> Code {
        // Fits, the length is bounded by `MAX_ENTRIES`.
        self.entries.len() as Code
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Dictionary::new(MAX_ENTRIES)
    }
}
