use std::fmt;

use burn::{
    nn::{Initializer, Linear, LinearConfig},
    prelude::*,
    tensor::activation,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Tanh,
}

impl Activation {
    pub fn apply<B: Backend, const D: usize>(self, x: Tensor<B, D>) -> Tensor<B, D> {
        match self {
            Self::Relu => activation::relu(x),
            Self::Tanh => activation::tanh(x),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Solver {
    Adam,
    Sgd,
}

/// One point of the hyperparameter grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperParams {
    pub hidden_layer_sizes: Vec<usize>,
    pub activation:         Activation,
    /// L2 penalty strength.
    pub alpha:              f64,
    pub learning_rate_init: f64,
    pub solver:             Solver,
    /// Upper bound on training epochs; early stopping may end sooner.
    pub max_epochs:         usize,
}

impl fmt::Display for HyperParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hidden={:?} activation={:?} alpha={} lr={} solver={:?} epochs={}",
            self.hidden_layer_sizes,
            self.activation,
            self.alpha,
            self.learning_rate_init,
            self.solver,
            self.max_epochs,
        )
    }
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct MlpConfig {
    pub input_size:   usize,
    pub hidden_sizes: Vec<usize>,
}

impl MlpConfig {
    /// Hidden layers followed by a single-output linear head, all
    /// Xavier-uniform initialised.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Mlp<B> {
        let mut layers = Vec::with_capacity(self.hidden_sizes.len() + 1);
        let mut fan_in = self.input_size;
        for &width in self.hidden_sizes.iter().chain(std::iter::once(&1)) {
            layers.push(
                LinearConfig::new(fan_in, width)
                    .with_initializer(Initializer::XavierUniform { gain: 1.0 })
                    .init(device),
            );
            fan_in = width;
        }
        Mlp { layers }
    }
}

#[derive(Module, Debug)]
pub struct Mlp<B: Backend> {
    pub layers: Vec<Linear<B>>,
}

impl<B: Backend> Mlp<B> {
    /// x: [batch, features] → [batch, 1]
    pub fn forward(&self, x: Tensor<B, 2>, act: Activation) -> Tensor<B, 2> {
        let last = self.layers.len().saturating_sub(1);
        let mut x = x;
        for (i, layer) in self.layers.iter().enumerate() {
            x = layer.forward(x);
            if i < last {
                x = act.apply(x);
            }
        }
        x
    }

    /// Σ‖W‖² over every layer's weight matrix (biases excluded).
    pub fn weight_norm_sq(&self) -> Tensor<B, 1> {
        let device = self.layers[0].weight.val().device();
        self.layers
            .iter()
            .map(|l| l.weight.val().powf_scalar(2.0).sum())
            .fold(Tensor::<B, 1>::zeros([1], &device), |acc, s| acc + s)
    }
}
