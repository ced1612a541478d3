pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod eval;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::Layer;
pub use network::{Network, NetworkSpec};
pub use loss::nll::NegativeLogLikelihood;
pub use optim::sgd::Sgd;
pub use train::{train_loop, EpochStats, TrainConfig};
pub use data::{Dataset, Record};
pub use eval::Evaluation;
pub use config::PipelineConfig;
pub use error::{Error, Result};
