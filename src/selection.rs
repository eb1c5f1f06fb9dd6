use std::collections::{BTreeSet, VecDeque};

use crate::catalog::PageCatalog;
use crate::page_range::parse_range_set;

/// An immutable record of which page ids were selected after a mutating
/// operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot(BTreeSet<u32>);

impl SelectionSnapshot {
    pub fn ids(&self) -> &BTreeSet<u32> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

const HISTORY_CAPACITY: usize = 10;

/// Bounded log of selection snapshots: a FIFO ring that keeps the 10 most
/// recent entries, evicting the oldest once full.
#[derive(Debug)]
pub struct SelectionHistory {
    snapshots: VecDeque<SelectionSnapshot>,
}

impl SelectionHistory {
    /// A fresh history holding a single empty snapshot, matching the state
    /// right after a document load.
    fn new() -> Self {
        let mut snapshots = VecDeque::with_capacity(HISTORY_CAPACITY);
        snapshots.push_back(SelectionSnapshot(BTreeSet::new()));
        SelectionHistory { snapshots }
    }

    fn record(&mut self, snapshot: SelectionSnapshot) {
        if self.snapshots.len() == HISTORY_CAPACITY {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn latest(&self) -> &SelectionSnapshot {
        // Non-empty by construction: created with one snapshot, never drained.
        self.snapshots.back().expect("history is never empty")
    }

    /// Snapshots from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &SelectionSnapshot> {
        self.snapshots.iter()
    }
}

/// Which page ids a parity selection targets, evaluated on the 1-based id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    fn matches(self, id: u32) -> bool {
        match self {
            Parity::Odd => id % 2 == 1,
            Parity::Even => id % 2 == 0,
        }
    }
}

/// Selection operators layered over a [`PageCatalog`].
///
/// Every operation mutates the catalog's selected flags and then appends a
/// snapshot of the resulting selection to the bounded history.
#[derive(Debug)]
pub struct SelectionEngine {
    history: SelectionHistory,
}

impl SelectionEngine {
    pub fn new() -> Self {
        SelectionEngine {
            history: SelectionHistory::new(),
        }
    }

    pub fn history(&self) -> &SelectionHistory {
        &self.history
    }

    /// Flip the selection state of a single page.
    pub fn toggle(&mut self, catalog: &mut PageCatalog, id: u32) {
        catalog.toggle(id);
        self.record(catalog);
    }

    pub fn select_all(&mut self, catalog: &mut PageCatalog) {
        for page in catalog.pages_mut() {
            page.selected = true;
        }
        self.record(catalog);
    }

    pub fn deselect_all(&mut self, catalog: &mut PageCatalog) {
        for page in catalog.pages_mut() {
            page.selected = false;
        }
        self.record(catalog);
    }

    /// Complement the selection against all current page ids.
    pub fn invert(&mut self, catalog: &mut PageCatalog) {
        for page in catalog.pages_mut() {
            page.selected = !page.selected;
        }
        self.record(catalog);
    }

    /// Replace the selection with the pages whose 1-based id matches
    /// `parity`.
    pub fn select_by_parity(&mut self, catalog: &mut PageCatalog, parity: Parity) {
        for page in catalog.pages_mut() {
            page.selected = parity.matches(page.id);
        }
        self.record(catalog);
    }

    /// Add the pages named by `expr` to the current selection.
    ///
    /// This is additive: ids already selected stay selected, and the parsed
    /// set is unioned in rather than replacing the selection. Ids outside the
    /// document are ignored; malformed tokens in `expr` are skipped (see
    /// [`parse_range_set`]).
    pub fn apply_range(&mut self, catalog: &mut PageCatalog, expr: &str) {
        let ids = parse_range_set(expr);
        for page in catalog.pages_mut() {
            if ids.contains(&page.id) {
                page.selected = true;
            }
        }
        self.record(catalog);
    }

    fn record(&mut self, catalog: &PageCatalog) {
        self.history
            .record(SelectionSnapshot(catalog.selected_ids()));
    }
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new()
    }
}
