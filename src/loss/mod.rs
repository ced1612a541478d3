pub mod nll;

pub use nll::NegativeLogLikelihood;
