//! Prediction
//!
//! The heuristic engine, its labels and the provider-backed predictor.

pub mod engine;
pub mod narrative;
pub mod service;

pub use engine::{predict, predict_with_policy, PredictionInput, PredictionPolicy};
pub use service::{MatchPrediction, MatchPredictor};
