// Domain layer: core models and ports (interfaces). No external dependencies
// beyond std/serde and the async traits the ports need.

pub mod model;
pub mod ports;
