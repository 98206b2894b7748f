use rand::SeedableRng;

/// A tick-stepped environment: something a frame loop (or a test) can feed
/// input into and read state back from.
pub trait Env {
    type State;
    type Action;
    type Input;
    type Status;

    // start a fresh episode and return its initial state
    fn reset(&mut self) -> Self::State;
    // advance one tick with the given input and elapsed seconds
    fn step(&mut self, input: Self::Input, dt: f32) -> (Self::State, Self::Status);
    // get the current state of the environment
    fn current_state(&self) -> Self::State;
    // actions that would change the state if applied right now
    fn legal_actions(&self) -> Vec<Self::Action>;
}

pub use rand;
pub use rand_pcg;

/// Random source shared by everything that needs reproducible randomness.
pub type GameRng = rand_pcg::Pcg64;

/// Builds the random source from `seed`, or from a fresh random seed when none
/// is given. The seed actually used is returned so runs can be replayed.
pub fn seeded_rng(seed: Option<u64>) -> (GameRng, u64) {
    let seed = seed.unwrap_or_else(rand::random::<u64>);
    (GameRng::seed_from_u64(seed), seed)
}
