// Domain layer: observation/prediction models and the ports the engine is assembled from.

pub mod model;
pub mod ports;
pub mod settings;
