pub mod evaluation;

pub use evaluation::{argmax, Evaluation};
