//! Caller-owned flags for one analysis pass over a feature graph.
//!
//! Graph algorithms never store transient state on the features themselves.
//! Each pass owns a `PathMarks` sized to the arena, so several analyses of the
//! same graph can keep independent markings. Within a pass flags are only ever
//! raised; [`PathMarks::clear`] starts a new pass.

use serde::Serialize;

#[derive(Clone, Debug, Default, Serialize)]
pub struct PathMarks {
    selected: Vec<bool>,
    touched: Vec<bool>,
    garbage: Vec<bool>,
}

impl PathMarks {
    pub fn new(len: usize) -> Self {
        Self {
            selected: vec![false; len],
            touched: vec![false; len],
            garbage: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Grow to cover at least `len` features; existing flags are kept.
    pub fn ensure_len(&mut self, len: usize) {
        if len > self.selected.len() {
            self.selected.resize(len, false);
            self.touched.resize(len, false);
            self.garbage.resize(len, false);
        }
    }

    /// Reset every flag, keeping the size.
    pub fn clear(&mut self) {
        self.selected.fill(false);
        self.touched.fill(false);
        self.garbage.fill(false);
    }

    pub fn select(&mut self, id: usize) {
        self.ensure_len(id + 1);
        self.selected[id] = true;
    }

    pub fn is_selected(&self, id: usize) -> bool {
        self.selected.get(id).copied().unwrap_or(false)
    }

    pub fn touch(&mut self, id: usize) {
        self.ensure_len(id + 1);
        self.touched[id] = true;
    }

    pub fn is_touched(&self, id: usize) -> bool {
        self.touched.get(id).copied().unwrap_or(false)
    }

    /// Flag a feature for discard by the collection owner.
    pub fn mark_garbage(&mut self, id: usize) {
        self.ensure_len(id + 1);
        self.garbage[id] = true;
    }

    pub fn is_garbage(&self, id: usize) -> bool {
        self.garbage.get(id).copied().unwrap_or(false)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|&&s| s).count()
    }

    pub fn selected_ids(&self) -> Vec<usize> {
        flagged(&self.selected)
    }

    pub fn garbage_ids(&self) -> Vec<usize> {
        flagged(&self.garbage)
    }
}

fn flagged(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(i, &f)| f.then_some(i))
        .collect()
}
