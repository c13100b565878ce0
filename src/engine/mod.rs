//! Core engine: heuristic estimation, suitability ranking, the optional
//! trained-model path, and the service that ties them together.

pub mod estimator;
pub mod ranker;
pub mod regressor;
pub mod service;
