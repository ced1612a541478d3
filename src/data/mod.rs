//! Dataset acquisition, parsing, splitting and normalization.

pub mod acquire;
pub mod normalize;
pub mod parser;
pub mod record;
pub mod split;

pub use acquire::{ensure_iris_data, IRIS_FILE_NAME};
pub use normalize::{NormalizationStats, NormalizerStandardize};
pub use parser::RecordReader;
pub use record::{Dataset, Record};
pub use split::{shuffle, shuffle_and_split, split_test_and_train, SplitTestAndTrain};
