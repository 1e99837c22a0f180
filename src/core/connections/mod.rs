pub mod connection_validator;
pub mod graph;

pub use connection_validator::ConnectionValidator;
pub use graph::NetworkGraph;
