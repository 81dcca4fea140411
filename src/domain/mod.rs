// Domain layer: value objects and the backend port.

pub mod model;
pub mod ports;
