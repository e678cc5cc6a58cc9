// Domain layer: listing model and the ports every backend service is injected through.

pub mod model;
pub mod ports;
