// Domain layer: table model and ports. Depends only on std, serde and chrono.

pub mod model;
pub mod ports;
