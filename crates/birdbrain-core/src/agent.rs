use crate::nn::Network;
use rand::Rng;

/// One simulated bird: a network plus transient physical state. Fitness is
/// the horizontal distance traveled before death, nothing else.
#[derive(Clone, Debug)]
pub struct Bird {
    pub network: Network,
    pub x: f64,
    pub y: f64,
    pub y_velocity: f64,
    pub dead: bool,
}

impl Bird {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            x: 0.0,
            y: 0.0,
            y_velocity: 0.0,
            dead: false,
        }
    }

    /// Fresh bird with a freshly randomized network.
    pub fn random<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Self {
        Self::new(Network::random(layer_sizes, rng))
    }

    /// Back to the start state for the next epoch. The network survives.
    pub fn reset(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
        self.y_velocity = 0.0;
        self.dead = false;
    }

    pub fn fitness(&self) -> f64 {
        self.x
    }
}
