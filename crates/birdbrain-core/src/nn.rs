use rand::Rng;

/// Layered feedforward perceptron with no activation function: each
/// non-input neuron outputs `bias + Σ weight_i * prev_i`. Topology is
/// fixed at construction; mutation touches weights and biases only.
///
/// There is no training signal here beyond `mutate` plus selection in the
/// evolution loop.

#[derive(Clone, Debug, PartialEq)]
pub struct Neuron {
    /// One weight per neuron in the previous layer. Empty for input neurons.
    pub weights: Vec<f32>,
    pub bias: f32,
    /// Injected scalar, only meaningful for input neurons. Overwritten on
    /// every `Network::evaluate` call.
    pub value: f32,
    pub is_input: bool,
}

impl Neuron {
    pub fn input() -> Self {
        Self {
            weights: Vec::new(),
            bias: 0.0,
            value: 0.0,
            is_input: true,
        }
    }

    /// Random hidden/output neuron fully connected to `fan_in` sources,
    /// weights and bias uniform in [-1, 1].
    pub fn random<R: Rng + ?Sized>(fan_in: usize, rng: &mut R) -> Self {
        Self {
            weights: (0..fan_in).map(|_| rng.random_range(-1.0f32..=1.0)).collect(),
            bias: rng.random_range(-1.0f32..=1.0),
            value: 0.0,
            is_input: false,
        }
    }

    /// Output of this neuron given the previous layer's outputs.
    pub fn out(&self, prev: &[f32]) -> f32 {
        if self.is_input {
            return self.value;
        }
        debug_assert_eq!(self.weights.len(), prev.len());
        let mut sum = self.bias;
        for (w, p) in self.weights.iter().zip(prev) {
            sum += w * p;
        }
        sum
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    /// Layer 0 is all input neurons; every later layer is fully connected
    /// to the one before it.
    pub layers: Vec<Vec<Neuron>>,
}

impl Network {
    /// Build a randomly initialized network with the given layer widths.
    /// Widths must be validated by `SimConfig::validate` beforehand.
    pub fn random<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Self {
        assert!(layer_sizes.len() >= 2, "network needs at least 2 layers");
        assert!(
            layer_sizes.iter().all(|&w| w > 0),
            "network layers must be non-empty"
        );
        let mut layers = Vec::with_capacity(layer_sizes.len());
        layers.push((0..layer_sizes[0]).map(|_| Neuron::input()).collect());
        for window in layer_sizes.windows(2) {
            let (fan_in, width) = (window[0], window[1]);
            layers.push((0..width).map(|_| Neuron::random(fan_in, rng)).collect());
        }
        Self { layers }
    }

    /// Forward pass. Assigns `inputs[i]` to input neuron `i`, then returns
    /// the final layer's outputs in layer order. Deterministic; the only
    /// side effect is the transient input-value assignment.
    pub fn evaluate(&mut self, inputs: &[f32]) -> Vec<f32> {
        assert_eq!(
            inputs.len(),
            self.layers[0].len(),
            "input count must match the input layer width"
        );
        for (neuron, &value) in self.layers[0].iter_mut().zip(inputs) {
            neuron.value = value;
        }
        let mut prev: Vec<f32> = inputs.to_vec();
        for layer in &self.layers[1..] {
            prev = layer.iter().map(|n| n.out(&prev)).collect();
        }
        prev
    }

    /// Add an independent uniform perturbation in [-range, range] to every
    /// weight and bias of every non-input neuron. In place; topology is
    /// untouched.
    pub fn mutate<R: Rng + ?Sized>(&mut self, range: f32, rng: &mut R) {
        for layer in &mut self.layers {
            for neuron in layer {
                if neuron.is_input {
                    continue;
                }
                for w in &mut neuron.weights {
                    *w += rng.random_range(-range..=range);
                }
                neuron.bias += rng.random_range(-range..=range);
            }
        }
    }

    /// Layer widths, input to output.
    pub fn topology(&self) -> Vec<usize> {
        self.layers.iter().map(|layer| layer.len()).collect()
    }

    /// Total trainable parameters (weights + biases of non-input neurons).
    pub fn parameter_count(&self) -> usize {
        self.layers[1..]
            .iter()
            .flatten()
            .map(|n| n.weights.len() + 1)
            .sum()
    }
}
