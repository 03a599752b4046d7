use std::collections::BTreeMap;

/// Lifecycle of a staged-edit set. `Saved` is the transient confirmation the
/// UI times; the next edit or re-initialization settles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveState {
    Initialized,
    Edited,
    Saving,
    Saved,
    Failed(String),
}

impl SaveState {
    /// Wire label the UI switches on.
    pub fn label(&self) -> &'static str {
        match self {
            SaveState::Initialized => "initialized",
            SaveState::Edited => "edited",
            SaveState::Saving => "saving",
            SaveState::Saved => "saved",
            SaveState::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    SaveInProgress,
    UnknownRow(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    SaveInProgress,
    Commit(String),
}

/// Where a committed set lands. The daemon's sink writes into the in-memory
/// store; tests substitute counting or failing sinks.
pub trait CommitSink<V> {
    fn commit(&mut self, key: &str, rows: &[(String, V)]) -> Result<(), String>;
}

/// A locally held, mutable-until-saved copy of records, keyed by a scope key
/// (attendance date, payroll month). Edits stage in place; `save` commits
/// all-or-nothing through a sink. At most one save may be outstanding; a
/// failed commit keeps the staged edits for retry.
#[derive(Debug, Clone)]
pub struct EditableSet<V> {
    key: String,
    rows: BTreeMap<String, V>,
    state: SaveState,
}

impl<V: Clone> EditableSet<V> {
    /// Builds the set for a scope key. Switching keys always goes through
    /// here again: staged edits for the previous key are discarded.
    pub fn initialize(key: impl Into<String>, rows: impl IntoIterator<Item = (String, V)>) -> Self {
        Self {
            key: key.into(),
            rows: rows.into_iter().collect(),
            state: SaveState::Initialized,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> &SaveState {
        &self.state
    }

    pub fn get(&self, id: &str) -> Option<&V> {
        self.rows.get(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.rows.values()
    }

    /// Stages one row. Rejected while a save is in flight.
    pub fn set(&mut self, id: &str, value: V) -> Result<(), EditError> {
        if self.state == SaveState::Saving {
            return Err(EditError::SaveInProgress);
        }
        let Some(slot) = self.rows.get_mut(id) else {
            return Err(EditError::UnknownRow(id.to_string()));
        };
        *slot = value;
        self.state = SaveState::Edited;
        Ok(())
    }

    /// Stages every row at once (the "mark all" affordance).
    pub fn set_all(&mut self, value: V) -> Result<(), EditError> {
        if self.state == SaveState::Saving {
            return Err(EditError::SaveInProgress);
        }
        for slot in self.rows.values_mut() {
            *slot = value.clone();
        }
        self.state = SaveState::Edited;
        Ok(())
    }

    /// Takes a snapshot of the staged rows and enters `Saving`. A second
    /// attempt while one is outstanding is rejected, not queued.
    pub fn begin_save(&mut self) -> Result<Vec<(String, V)>, SaveError> {
        if self.state == SaveState::Saving {
            return Err(SaveError::SaveInProgress);
        }
        self.state = SaveState::Saving;
        Ok(self
            .rows
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    pub fn complete_save(&mut self) {
        self.state = SaveState::Saved;
    }

    /// The commit failed: the staged edits stay as they are for retry.
    pub fn fail_save(&mut self, message: impl Into<String>) {
        self.state = SaveState::Failed(message.into());
    }

    /// Full commit cycle against a sink. All-or-nothing: the sink sees the
    /// whole snapshot or nothing, and a sink error leaves the edits staged.
    pub fn save<S: CommitSink<V>>(&mut self, sink: &mut S) -> Result<(), SaveError> {
        let snapshot = self.begin_save()?;
        match sink.commit(&self.key, &snapshot) {
            Ok(()) => {
                self.complete_save();
                Ok(())
            }
            Err(message) => {
                self.fail_save(message.clone());
                Err(SaveError::Commit(message))
            }
        }
    }
}
