//! Selector levels and free-text fields of a cascading form.

use std::sync::Arc;

use fastman_client::ChoiceId;

use super::source::{ErasedSource, OptionEntry, OptionSource};

/// Stable name of a level within its form.
pub type LevelKey = &'static str;

/// Stable name of a free-text field within its form.
pub type FieldKey = &'static str;

/// Lifecycle of a level's option set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelStatus {
    /// No fetch issued: a root before mount, or a child without a parent
    /// selection.
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Fetch issued for a level, tagged with the generation it belongs to.
///
/// Resolutions whose `epoch` no longer matches the level are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub level: LevelKey,
    pub parent: Option<ChoiceId>,
    pub epoch: u64,
}

/// Declaration of a selector level.
pub struct LevelSpec {
    pub(crate) key: LevelKey,
    pub(crate) label: &'static str,
    pub(crate) parent: Option<LevelKey>,
    pub(crate) required: bool,
    pub(crate) derives: Option<FieldKey>,
    pub(crate) source: Arc<dyn ErasedSource>,
}

impl LevelSpec {
    /// A required root level.
    pub fn new<S: OptionSource + 'static>(key: LevelKey, label: &'static str, source: S) -> Self {
        Self {
            key,
            label,
            parent: None,
            required: true,
            derives: None,
            source: Arc::new(source),
        }
    }

    /// Scope this level's options by `parent`'s selection.
    pub fn child_of(mut self, parent: LevelKey) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Overwrite `field` with the picked option's canonical text.
    pub fn derives(mut self, field: FieldKey) -> Self {
        self.derives = Some(field);
        self
    }
}

/// Declaration of a free-text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpec {
    pub key: FieldKey,
    pub label: &'static str,
    pub required: bool,
}

impl TextSpec {
    pub fn required(key: FieldKey, label: &'static str) -> Self {
        Self {
            key,
            label,
            required: true,
        }
    }

    pub fn optional(key: FieldKey, label: &'static str) -> Self {
        Self {
            key,
            label,
            required: false,
        }
    }
}

/// Runtime state of one level.
pub struct Level {
    pub(crate) spec: LevelSpec,
    pub(crate) items: Vec<OptionEntry>,
    pub(crate) status: LevelStatus,
    pub(crate) selected: Option<ChoiceId>,
    pub(crate) epoch: u64,
}

impl Level {
    pub(crate) fn new(spec: LevelSpec) -> Self {
        Self {
            spec,
            items: Vec::new(),
            status: LevelStatus::Idle,
            selected: None,
            epoch: 0,
        }
    }

    pub fn key(&self) -> LevelKey {
        self.spec.key
    }

    pub fn label(&self) -> &'static str {
        self.spec.label
    }

    pub fn parent(&self) -> Option<LevelKey> {
        self.spec.parent
    }

    pub fn is_required(&self) -> bool {
        self.spec.required
    }

    pub fn items(&self) -> &[OptionEntry] {
        &self.items
    }

    pub fn status(&self) -> &LevelStatus {
        &self.status
    }

    pub fn selected(&self) -> Option<ChoiceId> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&OptionEntry> {
        let id = self.selected?;
        self.items.iter().find(|e| e.id == id)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LevelStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    pub(crate) fn contains(&self, id: ChoiceId) -> bool {
        self.items.iter().any(|e| e.id == id)
    }

    /// Back to `Idle`; any in-flight fetch becomes stale.
    pub(crate) fn reset(&mut self) {
        self.epoch += 1;
        self.items.clear();
        self.selected = None;
        self.status = LevelStatus::Idle;
    }

    pub(crate) fn begin_fetch(&mut self, parent: Option<ChoiceId>) -> FetchTicket {
        self.epoch += 1;
        self.status = LevelStatus::Loading;
        FetchTicket {
            level: self.spec.key,
            parent,
            epoch: self.epoch,
        }
    }
}
