//! Exploration strategy of DQN.
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy explorer for DQN.
///
/// Epsilon starts at `eps_start` and is multiplied by `decay` after every
/// episode, never going below `eps_final`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    pub eps_start: f64,
    pub eps_final: f64,
    pub decay: f64,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self {
            eps_start: 1.0,
            eps_final: 0.1,
            decay: 0.995,
        }
    }
}

impl EpsilonGreedy {
    /// Constructs epsilon-greedy explorer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(mut self, v: f64) -> Self {
        self.eps_start = v;
        self
    }

    /// Set the lower bound of epsilon.
    pub fn eps_final(mut self, v: f64) -> Self {
        self.eps_final = v;
        self
    }

    /// Set the decay rate per episode.
    pub fn decay(mut self, v: f64) -> Self {
        self.decay = v;
        self
    }

    /// Returns epsilon after one more episode.
    pub fn next_eps(&self, eps: f64) -> f64 {
        (eps * self.decay).max(self.eps_final)
    }

    /// Returns `true` if the action should be random.
    pub fn is_random(&self, eps: f64, rng: &mut impl Rng) -> bool {
        rng.gen::<f64>() < eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_decay_closed_form() {
        let explorer = EpsilonGreedy::default();
        let mut eps = explorer.eps_start;
        for n in 1..=1000 {
            eps = explorer.next_eps(eps);
            let expected = (explorer.eps_start * explorer.decay.powi(n)).max(explorer.eps_final);
            assert!((eps - expected).abs() < 1e-9, "n = {}", n);
        }
        assert_eq!(eps, 0.1);
    }

    #[test]
    fn test_is_random() {
        let explorer = EpsilonGreedy::default();
        let mut rng = SmallRng::seed_from_u64(42);
        assert!((0..100).all(|_| explorer.is_random(1.0, &mut rng)));
        assert!((0..100).all(|_| !explorer.is_random(0.0, &mut rng)));
    }
}
