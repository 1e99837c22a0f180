use crate::core::errors::{SimResult, SimulationError};
use crate::core::types::ModuleId;

/// Immutable adjacency of the pulse network
///
/// `destinations[i]` keeps the declared order, which is the order pulses are
/// enqueued in. `predecessors[i]` lists every module that names `i` as a
/// destination, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkGraph {
    destinations: Vec<Vec<ModuleId>>,
    predecessors: Vec<Vec<ModuleId>>,
    broadcaster: Option<ModuleId>,
}

impl NetworkGraph {
    /// Build a graph from per-module destination lists indexed by `ModuleId`.
    /// Every destination and the broadcaster must index into `destinations`.
    pub fn from_destinations(
        destinations: Vec<Vec<ModuleId>>,
        broadcaster: Option<ModuleId>,
    ) -> SimResult<Self> {
        let count = destinations.len();
        if let Some(root) = broadcaster.filter(|root| root.index() >= count) {
            return Err(SimulationError::UnknownModule(root.to_string()));
        }

        let mut predecessors = vec![Vec::new(); count];
        for (index, targets) in destinations.iter().enumerate() {
            let source = ModuleId::new(index);
            for target in targets {
                let incoming = predecessors
                    .get_mut(target.index())
                    .ok_or_else(|| SimulationError::UnknownModule(target.to_string()))?;
                if !incoming.contains(&source) {
                    incoming.push(source);
                }
            }
        }

        Ok(Self {
            destinations,
            predecessors,
            broadcaster,
        })
    }

    /// Destinations of a module in declared order
    pub fn destinations(&self, id: ModuleId) -> &[ModuleId] {
        self.destinations
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Modules that send to `id`
    pub fn predecessors(&self, id: ModuleId) -> &[ModuleId] {
        self.predecessors
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Entry module of every press
    pub fn broadcaster(&self) -> Option<ModuleId> {
        self.broadcaster
    }

    pub fn module_count(&self) -> usize {
        self.destinations.len()
    }

    pub fn edge_count(&self) -> usize {
        self.destinations.iter().map(Vec::len).sum()
    }
}
