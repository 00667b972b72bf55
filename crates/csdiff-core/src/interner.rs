/// Session-scoped string interning for relation and property codes.
///
/// Relation codes repeat on every edge of both graphs. [`CodeInterner`] maps
/// each distinct code to a small [`Symbol`] in first-seen order, giving
/// presentation layers a stable id per relation (legend order, colour slot)
/// without any process-wide table.
use std::collections::HashMap;

use serde::Serialize;

/// Interned id of a code. Ids are dense and start at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Symbol(u32);

impl Symbol {
    /// Position of the code in first-seen order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Maps codes to [`Symbol`]s and back.
#[derive(Debug, Clone, Default)]
pub struct CodeInterner {
    ids: HashMap<String, Symbol>,
    codes: Vec<String>,
}

impl CodeInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the symbol for `code`, assigning the next one if unseen.
    pub fn intern(&mut self, code: &str) -> Symbol {
        if let Some(&sym) = self.ids.get(code) {
            return sym;
        }
        let sym = Symbol(u32::try_from(self.codes.len()).unwrap_or(u32::MAX));
        self.codes.push(code.to_owned());
        self.ids.insert(code.to_owned(), sym);
        sym
    }

    /// Returns the symbol for `code` without interning it.
    pub fn get(&self, code: &str) -> Option<Symbol> {
        self.ids.get(code).copied()
    }

    /// Returns the code behind `sym`.
    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        self.codes.get(sym.index()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// All interned codes with their symbols, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.codes
            .iter()
            .enumerate()
            .map(|(i, code)| (Symbol(u32::try_from(i).unwrap_or(u32::MAX)), code.as_str()))
    }
}
