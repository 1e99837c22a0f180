use crate::core::components::module::ModuleKind;
use crate::core::components::registry::ModuleRegistry;
use crate::core::connections::graph::NetworkGraph;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::types::ModuleId;

/// Structural checks run once on a freshly built network
pub struct ConnectionValidator;

impl ConnectionValidator {
    /// Run every structural check
    pub fn validate(registry: &ModuleRegistry, graph: &NetworkGraph) -> SimResult<()> {
        let broadcaster = Self::check_single_broadcaster(registry)?;
        Self::check_broadcaster_has_no_inputs(registry, graph, broadcaster)?;
        Self::check_conjunction_inputs(registry, graph)?;
        Ok(())
    }

    /// Exactly one broadcaster must exist
    pub fn check_single_broadcaster(registry: &ModuleRegistry) -> SimResult<ModuleId> {
        let broadcasters = registry.ids_of_kind(ModuleKind::Broadcaster);
        match broadcasters.as_slice() {
            [] => Err(SimulationError::MissingBroadcaster),
            [only] => Ok(*only),
            many => Err(SimulationError::MultipleBroadcasters(
                many.iter().map(|&id| registry.name(id).to_string()).collect(),
            )),
        }
    }

    /// The broadcaster is the root of every press and cannot be fed
    pub fn check_broadcaster_has_no_inputs(
        registry: &ModuleRegistry,
        graph: &NetworkGraph,
        broadcaster: ModuleId,
    ) -> SimResult<()> {
        if let Some(&source) = graph.predecessors(broadcaster).first() {
            return Err(SimulationError::BroadcasterHasInputs(
                registry.name(source).to_string(),
            ));
        }
        Ok(())
    }

    /// Every conjunction must remember exactly the modules that feed it
    pub fn check_conjunction_inputs(registry: &ModuleRegistry, graph: &NetworkGraph) -> SimResult<()> {
        for id in registry.ids_of_kind(ModuleKind::Conjunction) {
            let remembered = registry
                .state(id)
                .map(|state| state.input_senders())
                .unwrap_or_default();
            let feeding = graph.predecessors(id);

            let same_set = remembered.len() == feeding.len()
                && feeding.iter().all(|source| remembered.contains(source));
            if !same_set {
                return Err(SimulationError::ConjunctionInputMismatch(format!(
                    "'{}' remembers {} inputs but is fed by {}",
                    registry.name(id),
                    remembered.len(),
                    feeding.len()
                )));
            }
        }
        Ok(())
    }
}
