//! Small dense feed-forward network used as the evolved controller.

use super::controller::{Controller, Observation};
use crate::core::error::{ControllerFault, SimError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inputs fed to every network: bird y and the two gap distances.
pub const INPUT_SIZE: usize = 3;
/// Single output: the flap decision.
pub const OUTPUT_SIZE: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Tanh,
    Sigmoid,
    Relu,
    Identity,
}

impl Activation {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Tanh => x.tanh(),
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Relu => x.max(0.0),
            Self::Identity => x,
        }
    }
}

/// One fully connected layer. `weights` is row-major `[outputs][inputs]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub inputs: usize,
    pub outputs: usize,
    pub weights: Vec<f64>,
    pub biases: Vec<f64>,
    pub activation: Activation,
}

impl Layer {
    pub fn random<R: Rng + ?Sized>(
        inputs: usize,
        outputs: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        Self {
            inputs,
            outputs,
            weights: (0..inputs * outputs)
                .map(|_| rng.gen_range(-1.0..1.0))
                .collect(),
            biases: (0..outputs).map(|_| rng.gen_range(-1.0..1.0)).collect(),
            activation,
        }
    }

    fn forward(&self, input: &[f64], out: &mut Vec<f64>) {
        out.clear();
        for o in 0..self.outputs {
            let row = &self.weights[o * self.inputs..(o + 1) * self.inputs];
            let sum: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum();
            out.push(self.activation.apply(sum + self.biases[o]));
        }
    }
}

/// Layered network mapping an observation to one decision value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedForwardNetwork {
    layers: Vec<Layer>,
}

impl FeedForwardNetwork {
    /// Build from explicit layers, checking that their shapes chain.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self, SimError> {
        if layers.is_empty() {
            return Err(SimError::invalid("network needs at least one layer"));
        }
        let mut expected = INPUT_SIZE;
        for (index, layer) in layers.iter().enumerate() {
            if layer.inputs != expected {
                return Err(SimError::InvalidConfiguration(format!(
                    "layer {index} takes {} inputs, previous layer produces {expected}",
                    layer.inputs
                )));
            }
            if layer.weights.len() != layer.inputs * layer.outputs
                || layer.biases.len() != layer.outputs
            {
                return Err(SimError::InvalidConfiguration(format!(
                    "layer {index} parameter count does not match its shape"
                )));
            }
            expected = layer.outputs;
        }
        if expected != OUTPUT_SIZE {
            return Err(SimError::InvalidConfiguration(format!(
                "network produces {expected} outputs, expected {OUTPUT_SIZE}"
            )));
        }
        Ok(Self { layers })
    }

    /// Random network with the given hidden layer sizes (tanh throughout).
    pub fn random<R: Rng + ?Sized>(hidden: &[usize], rng: &mut R) -> Self {
        let mut layers = Vec::with_capacity(hidden.len() + 1);
        let mut inputs = INPUT_SIZE;
        for &size in hidden.iter().filter(|s| **s > 0) {
            layers.push(Layer::random(inputs, size, Activation::Tanh, rng));
            inputs = size;
        }
        layers.push(Layer::random(inputs, OUTPUT_SIZE, Activation::Tanh, rng));
        Self { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.biases.len())
            .sum()
    }

    pub fn activate(&self, inputs: [f64; INPUT_SIZE]) -> f64 {
        let mut current = inputs.to_vec();
        let mut next = Vec::new();
        for layer in &self.layers {
            layer.forward(&current, &mut next);
            std::mem::swap(&mut current, &mut next);
        }
        current[0]
    }

    /// Visit every weight and bias mutably.
    pub fn parameters_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        self.layers
            .iter_mut()
            .flat_map(|l| l.weights.iter_mut().chain(l.biases.iter_mut()))
    }
}

impl Controller for FeedForwardNetwork {
    fn decide(&mut self, observation: &Observation) -> Result<f64, ControllerFault> {
        let output = self.activate(observation.as_array());
        if output.is_finite() {
            Ok(output)
        } else {
            Err(ControllerFault::NonFinite(output))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn single_layer(weights: [f64; 3], bias: f64) -> FeedForwardNetwork {
        FeedForwardNetwork::from_layers(vec![Layer {
            inputs: 3,
            outputs: 1,
            weights: weights.to_vec(),
            biases: vec![bias],
            activation: Activation::Tanh,
        }])
        .unwrap()
    }

    #[test]
    fn test_activation_functions() {
        assert!((Activation::Sigmoid.apply(0.0) - 0.5).abs() < 1e-12);
        assert!((Activation::Relu.apply(-2.0)).abs() < f64::EPSILON);
        assert!((Activation::Tanh.apply(0.0)).abs() < f64::EPSILON);
        assert!((Activation::Identity.apply(3.5) - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_layer_output() {
        let net = single_layer([0.0, -1.0, 1.0], 0.0);
        // bottom_distance > top_distance -> positive sum -> flap.
        let out = net.activate([350.0, 50.0, 150.0]);
        assert!((out - 100f64.tanh()).abs() < 1e-12);
        assert!(out > 0.5);
    }

    #[test]
    fn test_hidden_layers_chain() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let net = FeedForwardNetwork::random(&[4, 2], &mut rng);
        assert_eq!(net.layers().len(), 3);
        assert_eq!(net.parameter_count(), (3 * 4 + 4) + (4 * 2 + 2) + (2 + 1));
        let out = net.activate([350.0, 10.0, 190.0]);
        assert!((-1.0..=1.0).contains(&out));
    }

    #[test]
    fn test_from_layers_rejects_bad_shapes() {
        let bad_inputs = Layer {
            inputs: 2,
            outputs: 1,
            weights: vec![0.0; 2],
            biases: vec![0.0],
            activation: Activation::Tanh,
        };
        assert!(FeedForwardNetwork::from_layers(vec![bad_inputs]).is_err());
        assert!(FeedForwardNetwork::from_layers(Vec::new()).is_err());

        let bad_count = Layer {
            inputs: 3,
            outputs: 1,
            weights: vec![0.0; 2],
            biases: vec![0.0],
            activation: Activation::Tanh,
        };
        assert!(FeedForwardNetwork::from_layers(vec![bad_count]).is_err());
    }

    #[test]
    fn test_non_finite_output_is_a_fault() {
        let mut net = single_layer([f64::NAN, 0.0, 0.0], 0.0);
        let err = net.decide(&Observation::new(1.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, ControllerFault::NonFinite(_)));
    }

    #[test]
    fn test_parameters_mut_covers_everything() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut net = FeedForwardNetwork::random(&[2], &mut rng);
        let count = net.parameter_count();
        for p in net.parameters_mut() {
            *p = 0.0;
        }
        assert_eq!(net.parameters_mut().count(), count);
        assert!((net.activate([1.0, 2.0, 3.0])).abs() < f64::EPSILON);
    }
}
