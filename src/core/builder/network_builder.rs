use crate::core::components::module::{ModuleKind, ModuleState};
use crate::core::components::registry::ModuleRegistry;
use crate::core::connections::connection_validator::ConnectionValidator;
use crate::core::connections::graph::NetworkGraph;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::types::ModuleId;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One decoded declaration: a name, its type and ordered destinations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub name: String,
    pub kind: ModuleKind,
    pub destinations: Vec<String>,
}

impl ModuleSpec {
    pub fn new(name: &str, kind: ModuleKind, destinations: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind,
            destinations: destinations.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// Turns module declarations into a registry and a graph
///
/// Destinations that are never declared become implicit sinks unless strict
/// mode is on, in which case they are reported as dangling edges.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    specs: Vec<ModuleSpec>,
    strict_destinations: bool,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject destinations that are not declared
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_destinations = strict;
        self
    }

    /// Add one declaration
    pub fn add_module(&mut self, spec: ModuleSpec) -> &mut Self {
        self.specs.push(spec);
        self
    }

    /// Add several declarations in order
    pub fn add_modules<I: IntoIterator<Item = ModuleSpec>>(&mut self, specs: I) -> &mut Self {
        self.specs.extend(specs);
        self
    }

    /// Resolve names, derive conjunction memories and validate the result
    pub fn build(&self) -> SimResult<(ModuleRegistry, NetworkGraph)> {
        let mut ids: HashMap<&str, ModuleId> = HashMap::new();
        let mut kinds: Vec<ModuleKind> = Vec::new();
        let mut names: Vec<&str> = Vec::new();

        // Declared modules take the first ids, in declaration order
        for spec in &self.specs {
            if ids.contains_key(spec.name.as_str()) {
                return Err(SimulationError::DuplicateModule(spec.name.clone()));
            }
            if spec.kind == ModuleKind::Sink && !spec.destinations.is_empty() {
                return Err(SimulationError::SinkHasDestinations(spec.name.clone()));
            }
            ids.insert(spec.name.as_str(), ModuleId::new(kinds.len()));
            kinds.push(spec.kind);
            names.push(spec.name.as_str());
        }

        // Undeclared destinations follow, in first-seen order
        for spec in &self.specs {
            for destination in &spec.destinations {
                if ids.contains_key(destination.as_str()) {
                    continue;
                }
                if self.strict_destinations {
                    return Err(SimulationError::DanglingEdge {
                        source: spec.name.clone(),
                        destination: destination.clone(),
                    });
                }
                warn!(
                    "Module '{}' sends to undeclared '{}', treating it as a sink",
                    spec.name, destination
                );
                ids.insert(destination.as_str(), ModuleId::new(kinds.len()));
                kinds.push(ModuleKind::Sink);
                names.push(destination.as_str());
            }
        }

        let mut destinations: Vec<Vec<ModuleId>> = vec![Vec::new(); kinds.len()];
        for spec in &self.specs {
            let source = ids[spec.name.as_str()];
            destinations[source.index()] = spec
                .destinations
                .iter()
                .map(|destination| ids[destination.as_str()])
                .collect();
        }

        let broadcaster = kinds
            .iter()
            .position(|kind| *kind == ModuleKind::Broadcaster)
            .map(ModuleId::new);
        let graph = NetworkGraph::from_destinations(destinations, broadcaster)?;

        let mut registry = ModuleRegistry::new();
        for (index, (name, kind)) in names.iter().zip(kinds.iter()).enumerate() {
            let id = ModuleId::new(index);
            registry.register(name, ModuleState::initial(*kind, graph.predecessors(id)))?;
        }

        ConnectionValidator::validate(&registry, &graph)?;

        info!(
            "Built pulse network: {} modules ({} declared), {} edges",
            registry.len(),
            self.specs.len(),
            graph.edge_count()
        );

        Ok((registry, graph))
    }
}
