// ABOUTME: Small fully-connected regression network with Adam and mean-squared error
// ABOUTME: Dense layers over ndarray matrices, batch forward/backward, and weight snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Feed-forward network.
//!
//! Activations and gradients live only inside the call that computes them and
//! are dropped on return; nothing is cached between batches except the Adam
//! moments owned by the running fit.

use crate::config::TrainingConfig;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Layer activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// `max(0, x)`
    Relu,
    /// Identity
    Linear,
}

impl Activation {
    /// Activation of layer `index` in a stack of `count`: ReLU, linear last
    const fn for_layer(index: usize, count: usize) -> Self {
        if index + 1 == count {
            Self::Linear
        } else {
            Self::Relu
        }
    }

    fn apply(self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Self::Relu => z.mapv(|v| v.max(0.0)),
            Self::Linear => z.clone(),
        }
    }

    fn derivative(self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Self::Relu => z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Self::Linear => Array2::ones(z.raw_dim()),
        }
    }
}

/// One dense layer: `activation(x . W + b)`
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    weights: Array2<f64>,
    biases: Array1<f64>,
    activation: Activation,
}

impl DenseLayer {
    /// Glorot-uniform weights and zero biases
    fn glorot<R: Rng + ?Sized>(
        inputs: usize,
        outputs: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let limit = (6.0 / (inputs + outputs) as f64).sqrt();
        let weights = Array2::from_shape_fn((inputs, outputs), |_| rng.gen_range(-limit..limit));
        Self {
            weights,
            biases: Array1::zeros(outputs),
            activation,
        }
    }

    /// Input width
    #[must_use]
    pub fn inputs(&self) -> usize {
        self.weights.nrows()
    }

    /// Output width
    #[must_use]
    pub fn outputs(&self) -> usize {
        self.weights.ncols()
    }
}

/// Stack of dense layers trained for mean-squared error
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<DenseLayer>,
}

/// Outcome of one fit
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    /// Mean-squared error over the dataset after each epoch
    pub epoch_losses: Vec<f64>,
}

impl FitReport {
    /// Loss after the last epoch
    #[must_use]
    pub fn final_loss(&self) -> Option<f64> {
        self.epoch_losses.last().copied()
    }
}

impl Network {
    /// Build a network with ReLU hidden layers and a linear output.
    ///
    /// `sizes` lists layer widths from input to output, e.g. `[7, 16, 8, 1]`.
    pub fn new<R: Rng + ?Sized>(sizes: &[usize], rng: &mut R) -> Self {
        let count = sizes.len().saturating_sub(1);
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(index, pair)| {
                DenseLayer::glorot(pair[0], pair[1], Activation::for_layer(index, count), rng)
            })
            .collect();
        Self { layers }
    }

    /// Layer widths from input to output
    #[must_use]
    pub fn topology(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.layers.first().map(DenseLayer::inputs).into_iter().collect();
        sizes.extend(self.layers.iter().map(DenseLayer::outputs));
        sizes
    }

    /// Forward pass over a batch (rows are samples)
    #[must_use]
    pub fn forward(&self, inputs: ArrayView2<'_, f64>) -> Array2<f64> {
        let mut activations = inputs.to_owned();
        for layer in &self.layers {
            let z = activations.dot(&layer.weights) + &layer.biases;
            activations = layer.activation.apply(&z);
        }
        activations
    }

    /// Forward pass for a single sample with one output
    #[must_use]
    pub fn predict_one(&self, input: &[f64]) -> Option<f64> {
        let row = Array2::from_shape_vec((1, input.len()), input.to_vec()).ok()?;
        if self.layers.first()?.inputs() != input.len() {
            return None;
        }
        self.forward(row.view()).get((0, 0)).copied()
    }

    /// Mean-squared error over a dataset
    #[must_use]
    pub fn mse(&self, inputs: ArrayView2<'_, f64>, targets: &Array1<f64>) -> f64 {
        let predictions = self.forward(inputs).column(0).to_owned();
        let diff = predictions - targets;
        diff.mapv(|d| d * d).mean().unwrap_or(0.0)
    }

    /// Fit with mini-batch Adam, shuffling the sample order every epoch
    pub fn fit<R: Rng + ?Sized>(
        &mut self,
        inputs: &Array2<f64>,
        targets: &Array1<f64>,
        config: &TrainingConfig,
        rng: &mut R,
    ) -> FitReport {
        let mut optimizer = AdamState::for_network(self);
        let mut order: Vec<usize> = (0..inputs.nrows()).collect();
        let mut epoch_losses = Vec::with_capacity(config.epochs);

        for _ in 0..config.epochs {
            order.shuffle(rng);
            for batch in order.chunks(config.batch_size.max(1)) {
                let x = inputs.select(Axis(0), batch);
                let y = targets.select(Axis(0), batch);
                let (weight_grads, bias_grads) = self.gradients(&x, &y);
                optimizer.step(self, &weight_grads, &bias_grads, config);
            }
            epoch_losses.push(self.mse(inputs.view(), targets));
        }

        FitReport { epoch_losses }
    }

    /// Backpropagate the MSE gradient for one batch
    fn gradients(&self, x: &Array2<f64>, y: &Array1<f64>) -> (Vec<Array2<f64>>, Vec<Array1<f64>>) {
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        let mut activations = vec![x.clone()];
        for layer in &self.layers {
            let z = activations[activations.len() - 1].dot(&layer.weights) + &layer.biases;
            activations.push(layer.activation.apply(&z));
            pre_activations.push(z);
        }

        let batch = x.nrows().max(1) as f64;
        let output = &activations[activations.len() - 1];
        let targets = y.view().insert_axis(Axis(1));
        let mut upstream = (output - &targets) * (2.0 / batch);

        let mut weight_grads = vec![Array2::zeros((0, 0)); self.layers.len()];
        let mut bias_grads = vec![Array1::zeros(0); self.layers.len()];
        for (index, layer) in self.layers.iter().enumerate().rev() {
            let delta = upstream * layer.activation.derivative(&pre_activations[index]);
            weight_grads[index] = activations[index].t().dot(&delta);
            bias_grads[index] = delta.sum_axis(Axis(0));
            upstream = delta.dot(&layer.weights.t());
        }
        (weight_grads, bias_grads)
    }

    /// Serializable copy of the weights
    #[must_use]
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            layers: self
                .layers
                .iter()
                .map(|layer| LayerSnapshot {
                    inputs: layer.inputs(),
                    outputs: layer.outputs(),
                    activation: layer.activation,
                    weights: layer.weights.iter().copied().collect(),
                    biases: layer.biases.to_vec(),
                })
                .collect(),
        }
    }

    /// Rebuild a network from a snapshot
    ///
    /// # Errors
    ///
    /// Returns a description of the first layer whose shapes do not line up,
    /// whose values are not finite, or whose activation breaks the
    /// ReLU-hidden, linear-output pattern
    pub fn from_snapshot(snapshot: &NetworkSnapshot) -> Result<Self, String> {
        let count = snapshot.layers.len();
        if count == 0 {
            return Err("snapshot has no layers".to_owned());
        }
        let mut layers = Vec::with_capacity(count);
        for (index, layer) in snapshot.layers.iter().enumerate() {
            let expected = Activation::for_layer(index, count);
            if layer.activation != expected {
                return Err(format!(
                    "layer {index}: activation {:?}, expected {expected:?}",
                    layer.activation
                ));
            }
            if layer.biases.len() != layer.outputs {
                return Err(format!("layer {index}: bias length does not match width"));
            }
            if layer
                .weights
                .iter()
                .chain(&layer.biases)
                .any(|v| !v.is_finite())
            {
                return Err(format!("layer {index}: non-finite parameter"));
            }
            let weights =
                Array2::from_shape_vec((layer.inputs, layer.outputs), layer.weights.clone())
                    .map_err(|e| format!("layer {index}: {e}"))?;
            layers.push(DenseLayer {
                weights,
                biases: Array1::from(layer.biases.clone()),
                activation: layer.activation,
            });
        }
        if layers
            .windows(2)
            .any(|pair| pair[0].outputs() != pair[1].inputs())
        {
            return Err("adjacent layer widths do not match".to_owned());
        }
        Ok(Self { layers })
    }
}

/// Adam first/second moments for every parameter
struct AdamState {
    weight_m: Vec<Array2<f64>>,
    weight_v: Vec<Array2<f64>>,
    bias_m: Vec<Array1<f64>>,
    bias_v: Vec<Array1<f64>>,
    step: i32,
}

impl AdamState {
    fn for_network(network: &Network) -> Self {
        let weight_zeros: Vec<Array2<f64>> = network
            .layers
            .iter()
            .map(|l| Array2::zeros(l.weights.raw_dim()))
            .collect();
        let bias_zeros: Vec<Array1<f64>> = network
            .layers
            .iter()
            .map(|l| Array1::zeros(l.biases.raw_dim()))
            .collect();
        Self {
            weight_m: weight_zeros.clone(),
            weight_v: weight_zeros,
            bias_m: bias_zeros.clone(),
            bias_v: bias_zeros,
            step: 0,
        }
    }

    fn step(
        &mut self,
        network: &mut Network,
        weight_grads: &[Array2<f64>],
        bias_grads: &[Array1<f64>],
        config: &TrainingConfig,
    ) {
        self.step = self.step.saturating_add(1);
        let (b1, b2, eps) = (config.beta1, config.beta2, config.epsilon);
        let m_correction = 1.0 - b1.powi(self.step);
        let v_correction = 1.0 - b2.powi(self.step);
        let lr = config.learning_rate;

        for (index, layer) in network.layers.iter_mut().enumerate() {
            let g = &weight_grads[index];
            self.weight_m[index] = &self.weight_m[index] * b1 + g * (1.0 - b1);
            self.weight_v[index] = &self.weight_v[index] * b2 + g.mapv(|x| x * x) * (1.0 - b2);
            let update = (&self.weight_m[index] / m_correction)
                / (self.weight_v[index].mapv(|v| (v / v_correction).sqrt()) + eps);
            layer.weights = &layer.weights - &(update * lr);

            let g = &bias_grads[index];
            self.bias_m[index] = &self.bias_m[index] * b1 + g * (1.0 - b1);
            self.bias_v[index] = &self.bias_v[index] * b2 + g.mapv(|x| x * x) * (1.0 - b2);
            let update = (&self.bias_m[index] / m_correction)
                / (self.bias_v[index].mapv(|v| (v / v_correction).sqrt()) + eps);
            layer.biases = &layer.biases - &(update * lr);
        }
    }
}

/// Serialized layer weights (row-major, `inputs x outputs`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    /// Input width
    pub inputs: usize,
    /// Output width
    pub outputs: usize,
    /// Activation function
    pub activation: Activation,
    /// Row-major weights
    pub weights: Vec<f64>,
    /// Biases
    pub biases: Vec<f64>,
}

/// Serialized network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// Layers from input to output
    pub layers: Vec<LayerSnapshot>,
}
