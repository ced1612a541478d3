use serde::{Serialize, Deserialize};
use crate::activation::activation::ActivationFunction;
use crate::error::ConfigError;

/// Which variant a layer is built as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKind {
    Dense { activation: ActivationFunction },
    /// Softmax output paired with negative log-likelihood.
    Output,
}

/// Describes one layer in a network specification.
///
/// Fields:
/// - `input_size` — number of neurons feeding into this layer (the output
///                  size of the previous layer, or the raw input dimension for
///                  the first layer)
/// - `size`       — number of neurons in this layer
/// - `kind`       — dense hidden layer or softmax output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub input_size: usize,
    pub size: usize,
    pub kind: LayerKind,
}

/// Ordered list of layer descriptions (input → output).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    /// A multilayer perceptron: `hidden` dense layers sharing `activation`,
    /// then a softmax output with `num_outputs` classes.
    pub fn mlp(
        num_inputs: usize,
        hidden: &[usize],
        activation: ActivationFunction,
        num_outputs: usize,
    ) -> NetworkSpec {
        let mut layers = Vec::with_capacity(hidden.len() + 1);
        let mut input_size = num_inputs;
        for &size in hidden {
            layers.push(LayerSpec { input_size, size, kind: LayerKind::Dense { activation } });
            input_size = size;
        }
        layers.push(LayerSpec { input_size, size: num_outputs, kind: LayerKind::Output });
        NetworkSpec { layers }
    }

    /// Checks that the layers form a chain ending in exactly one output layer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let last = self.layers.len().checked_sub(1).ok_or(ConfigError::MisplacedOutputLayer)?;

        for (index, layer) in self.layers.iter().enumerate() {
            if layer.size == 0 || layer.input_size == 0 {
                return Err(ConfigError::ZeroLayerSize { index });
            }
            let is_output = layer.kind == LayerKind::Output;
            if is_output != (index == last) {
                return Err(ConfigError::MisplacedOutputLayer);
            }
            if index > 0 {
                let previous = self.layers[index - 1].size;
                if layer.input_size != previous {
                    return Err(ConfigError::LayerWidthMismatch {
                        index,
                        expected: layer.input_size,
                        got: previous,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }
}
