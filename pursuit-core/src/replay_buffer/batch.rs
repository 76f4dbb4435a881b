//! Transitions and batches of transitions.
use crate::{Env, Step};

/// A transition `(o_t, a_t, r_t, o_t+1, terminal_t)`.
///
/// Created by the [`Trainer`](crate::Trainer) after each environment step and
/// owned by the replay buffer afterwards.
#[derive(Clone, Debug)]
pub struct Transition<O, A> {
    /// Observation before the action.
    pub obs: O,

    /// The action taken.
    pub act: A,

    /// Reward.
    pub reward: f32,

    /// Observation after the action.
    pub next_obs: O,

    /// `true` if the episode terminated with this transition.
    pub is_terminated: bool,
}

impl<O, A> Transition<O, A> {
    /// Constructs a transition from the observation preceding `step`.
    pub fn from_step<E>(prev_obs: O, step: Step<E>) -> Self
    where
        E: Env<Obs = O, Act = A>,
    {
        Self {
            obs: prev_obs,
            act: step.act,
            reward: step.reward,
            next_obs: step.obs,
            is_terminated: step.is_terminated,
        }
    }
}

/// A batch of transitions, stored field by field.
#[derive(Clone, Debug)]
pub struct TransitionBatch<O, A> {
    /// Observations `o_t`.
    pub obs: Vec<O>,

    /// Actions `a_t`.
    pub act: Vec<A>,

    /// Next observations `o_t+1`.
    pub next_obs: Vec<O>,

    /// Rewards `r_t`.
    pub reward: Vec<f32>,

    /// Termination flags.
    pub is_terminated: Vec<bool>,
}

impl<O, A> TransitionBatch<O, A> {
    /// Constructs an empty batch with reserved capacity.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            obs: Vec::with_capacity(n),
            act: Vec::with_capacity(n),
            next_obs: Vec::with_capacity(n),
            reward: Vec::with_capacity(n),
            is_terminated: Vec::with_capacity(n),
        }
    }

    /// Appends a transition.
    pub fn push(&mut self, tr: Transition<O, A>) {
        self.obs.push(tr.obs);
        self.act.push(tr.act);
        self.next_obs.push(tr.next_obs);
        self.reward.push(tr.reward);
        self.is_terminated.push(tr.is_terminated);
    }

    /// Returns the number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }
}
