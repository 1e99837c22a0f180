use crate::core::components::module::{ModuleKind, ModuleState};
use crate::core::errors::{SimResult, SimulationError};
use crate::core::types::{ModuleId, BUTTON, BUTTON_NAME};
use std::collections::HashMap;

/// Arena holding the name and mutable state of every module
///
/// The registry is the only thing a press mutates. Ids are handed out in
/// registration order and never change.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    names: Vec<String>,
    states: Vec<ModuleState>,
    index: HashMap<String, ModuleId>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module and return its id
    pub fn register(&mut self, name: &str, state: ModuleState) -> SimResult<ModuleId> {
        if self.index.contains_key(name) {
            return Err(SimulationError::DuplicateModule(name.to_string()));
        }

        let id = ModuleId::new(self.states.len());
        self.names.push(name.to_string());
        self.states.push(state);
        self.index.insert(name.to_string(), id);
        Ok(id)
    }

    /// Resolve a module name to its id
    pub fn id_of(&self, name: &str) -> Option<ModuleId> {
        self.index.get(name).copied()
    }

    /// Resolve a module name, failing with `UnknownModule`
    pub fn require(&self, name: &str) -> SimResult<ModuleId> {
        self.id_of(name)
            .ok_or_else(|| SimulationError::UnknownModule(name.to_string()))
    }

    /// Name of a module; the button resolves to `"button"`
    pub fn name(&self, id: ModuleId) -> &str {
        if id == BUTTON {
            return BUTTON_NAME;
        }
        self.names.get(id.index()).map(String::as_str).unwrap_or("?")
    }

    pub fn state(&self, id: ModuleId) -> Option<&ModuleState> {
        self.states.get(id.index())
    }

    pub fn state_mut(&mut self, id: ModuleId) -> Option<&mut ModuleState> {
        self.states.get_mut(id.index())
    }

    pub fn kind(&self, id: ModuleId) -> Option<ModuleKind> {
        self.state(id).map(ModuleState::kind)
    }

    /// All ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        (0..self.states.len()).map(ModuleId::new)
    }

    /// Ids of every module of one kind, in registration order
    pub fn ids_of_kind(&self, kind: ModuleKind) -> Vec<ModuleId> {
        self.ids().filter(|&id| self.kind(id) == Some(kind)).collect()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Whether every module is back at its initial state
    pub fn is_initial(&self) -> bool {
        self.states.iter().all(ModuleState::is_initial)
    }

    /// Reset all flip-flops and conjunction memories
    pub fn reset(&mut self) {
        for state in self.states.iter_mut() {
            state.reset();
        }
    }
}
