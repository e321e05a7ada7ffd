//! The cascading selection controller.
//!
//! `SelectionForm` is a pure state machine: it decides which fetches are
//! needed and applies their results, but never performs IO itself. The
//! [`CascadeDriver`](super::CascadeDriver) executes the returned
//! [`FetchTicket`]s and feeds the results back through [`SelectionForm::resolve`].
//!
//! # Invariants
//!
//! - Selecting or clearing a level resets every descendant (selection and
//!   options) before any new child fetch is issued.
//! - A level's selection, when present, is always one of its current items.
//! - A resolution is applied only if its ticket's epoch still matches the
//!   level; results for an abandoned parent value are dropped.

use std::collections::BTreeMap;
use std::sync::Arc;

use fastman_client::{ApiResponse, ChoiceId};
use thiserror::Error;
use tracing::{debug, warn};

use super::level::{FetchTicket, FieldKey, Level, LevelKey, LevelSpec, LevelStatus, TextSpec};
use super::source::{ErasedSource, OptionEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown level: {0}")]
    UnknownLevel(String),

    #[error("option {id} is not available for {level}")]
    UnknownOption { level: &'static str, id: ChoiceId },

    #[error("{level} cannot load before {parent} is selected")]
    ParentUnresolved {
        level: &'static str,
        parent: &'static str,
    },

    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// What happened to a fetch result handed to [`SelectionForm::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

/// A forest of dependent selector levels plus free-text fields.
pub struct SelectionForm {
    levels: Vec<Level>,
    texts: Vec<TextSpec>,
    values: BTreeMap<FieldKey, String>,
}

impl Default for SelectionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionForm {
    pub fn new() -> Self {
        Self {
            levels: Vec::new(),
            texts: Vec::new(),
            values: BTreeMap::new(),
        }
    }

    /// Add a level. Parents must be declared before their children.
    ///
    /// # Panics
    ///
    /// On a duplicate key or an undeclared parent; both are definition bugs.
    pub fn with_level(mut self, spec: LevelSpec) -> Self {
        assert!(
            self.index_of(spec.key).is_none(),
            "duplicate level key: {}",
            spec.key
        );
        if let Some(parent) = spec.parent {
            assert!(
                self.index_of(parent).is_some(),
                "level {} declared before its parent {}",
                spec.key,
                parent
            );
        }
        self.levels.push(Level::new(spec));
        self
    }

    /// Add a free-text field.
    ///
    /// # Panics
    ///
    /// On a duplicate key.
    pub fn with_text(mut self, spec: TextSpec) -> Self {
        assert!(
            !self.texts.iter().any(|t| t.key == spec.key),
            "duplicate field key: {}",
            spec.key
        );
        self.values.insert(spec.key, String::new());
        self.texts.push(spec);
        self
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn texts(&self) -> &[TextSpec] {
        &self.texts
    }

    pub fn level(&self, key: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.key() == key)
    }

    pub fn selected(&self, key: &str) -> Option<ChoiceId> {
        self.level(key).and_then(Level::selected)
    }

    /// Typed record behind the selection of `key`.
    pub fn selected_record<T: 'static>(&self, key: &str) -> Option<&T> {
        self.level(key)?.selected_entry()?.record::<T>()
    }

    pub fn options(&self, key: &str) -> &[OptionEntry] {
        self.level(key).map(Level::items).unwrap_or(&[])
    }

    pub fn status(&self, key: &str) -> Option<&LevelStatus> {
        self.level(key).map(Level::status)
    }

    pub(crate) fn source(&self, key: &str) -> Option<Arc<dyn ErasedSource>> {
        self.level(key).map(|l| l.spec.source.clone())
    }

    /// Issue fetches for every root level.
    pub fn mount(&mut self) -> Vec<FetchTicket> {
        self.levels
            .iter_mut()
            .filter(|l| l.parent().is_none())
            .map(|l| l.begin_fetch(None))
            .collect()
    }

    /// Pick `id` on level `key`.
    ///
    /// Every descendant is reset and each direct child gets a new fetch
    /// scoped to `id`. Re-selecting the current option changes nothing.
    pub fn select(&mut self, key: &str, id: ChoiceId) -> Result<Vec<FetchTicket>, SelectionError> {
        let idx = self.require_index(key)?;
        let level = &self.levels[idx];
        if !level.contains(id) {
            return Err(SelectionError::UnknownOption {
                level: level.key(),
                id,
            });
        }
        if level.selected == Some(id) {
            return Ok(Vec::new());
        }

        let level = &mut self.levels[idx];
        level.selected = Some(id);
        let derived = level.spec.derives.and_then(|field| {
            level
                .selected_entry()
                .map(|e| (field, e.canonical_text.clone().unwrap_or_else(|| e.label.clone())))
        });
        let level_key = level.key();
        if let Some((field, text)) = derived {
            self.values.insert(field, text);
        }

        debug!(level = level_key, id, "Option selected");
        self.reset_descendants(level_key);
        Ok(self.fetch_children(level_key, id))
    }

    /// Drop the selection on `key` and reset every descendant.
    pub fn clear(&mut self, key: &str) -> Result<(), SelectionError> {
        let idx = self.require_index(key)?;
        let level_key = self.levels[idx].key();
        self.levels[idx].selected = None;
        self.reset_descendants(level_key);
        Ok(())
    }

    /// Re-issue the fetch for `key`: a retry after an error or a reload.
    ///
    /// The current selection survives if the new options still contain it.
    pub fn refresh(&mut self, key: &str) -> Result<FetchTicket, SelectionError> {
        let idx = self.require_index(key)?;
        let parent = match self.levels[idx].parent() {
            None => None,
            Some(parent_key) => match self.selected(parent_key) {
                Some(id) => Some(id),
                None => {
                    return Err(SelectionError::ParentUnresolved {
                        level: self.levels[idx].key(),
                        parent: parent_key,
                    })
                }
            },
        };
        Ok(self.levels[idx].begin_fetch(parent))
    }

    /// Apply a fetch result.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        result: ApiResponse<Vec<OptionEntry>>,
    ) -> Resolution {
        let Some(idx) = self.index_of(ticket.level) else {
            warn!(level = ticket.level, "Resolution for unknown level dropped");
            return Resolution::Stale;
        };

        let level = &mut self.levels[idx];
        if level.epoch != ticket.epoch || level.status != LevelStatus::Loading {
            debug!(
                level = ticket.level,
                ticket_epoch = ticket.epoch,
                current_epoch = level.epoch,
                "Stale option fetch discarded"
            );
            return Resolution::Stale;
        }

        match result {
            ApiResponse::Success(items) => {
                level.items = items;
                level.status = LevelStatus::Ready;
                if let Some(id) = level.selected {
                    if !level.contains(id) {
                        debug!(level = ticket.level, id, "Selection no longer offered, cleared");
                        level.selected = None;
                        let key = level.key();
                        self.reset_descendants(key);
                    }
                }
            }
            ApiResponse::Failure(message) => {
                warn!(level = ticket.level, error = %message, "Option fetch failed");
                level.items.clear();
                level.status = LevelStatus::Error(message);
                if level.selected.take().is_some() {
                    let key = level.key();
                    self.reset_descendants(key);
                }
            }
        }
        Resolution::Applied
    }

    pub fn text(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// Trimmed text, `None` when blank.
    pub fn optional_text(&self, field: &str) -> Option<String> {
        let text = self.text(field).trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// User edit of a free-text field. A later selection on a deriving
    /// level overwrites it again.
    pub fn set_text(&mut self, field: &str, value: impl Into<String>) -> Result<(), SelectionError> {
        let key = self
            .texts
            .iter()
            .find(|t| t.key == field)
            .map(|t| t.key)
            .ok_or_else(|| SelectionError::UnknownField(field.to_string()))?;
        self.values.insert(key, value.into());
        Ok(())
    }

    /// Labels of required levels without a selection and required fields
    /// left blank, in declaration order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let levels = self
            .levels
            .iter()
            .filter(|l| l.is_required() && l.selected.is_none())
            .map(|l| l.label());
        let texts = self
            .texts
            .iter()
            .filter(|t| t.required && self.text(t.key).trim().is_empty())
            .map(|t| t.label);
        levels.chain(texts).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Clear every selection and field after a submit; root options stay.
    pub fn clear_all(&mut self) {
        let roots: Vec<LevelKey> = self
            .levels
            .iter()
            .filter(|l| l.parent().is_none())
            .map(|l| l.key())
            .collect();
        for key in roots {
            if let Some(idx) = self.index_of(key) {
                self.levels[idx].selected = None;
            }
            self.reset_descendants(key);
        }
        for value in self.values.values_mut() {
            value.clear();
        }
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.key() == key)
    }

    fn require_index(&self, key: &str) -> Result<usize, SelectionError> {
        self.index_of(key)
            .ok_or_else(|| SelectionError::UnknownLevel(key.to_string()))
    }

    /// Children are declared after their parents, so one forward pass
    /// covers the whole subtree.
    fn reset_descendants(&mut self, key: LevelKey) {
        let mut cleared = vec![key];
        for level in self.levels.iter_mut() {
            if let Some(parent) = level.parent() {
                if cleared.contains(&parent) {
                    level.reset();
                    cleared.push(level.key());
                }
            }
        }
    }

    fn fetch_children(&mut self, key: LevelKey, parent_id: ChoiceId) -> Vec<FetchTicket> {
        self.levels
            .iter_mut()
            .filter(|l| l.parent() == Some(key))
            .map(|l| l.begin_fetch(Some(parent_id)))
            .collect()
    }
}
