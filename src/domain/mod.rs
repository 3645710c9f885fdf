// Domain layer: canonical review model and ports (interfaces) to providers and stores.

pub mod model;
pub mod ports;
