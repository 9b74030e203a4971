// DrawRng implementations
//
// SystemRng is the production source: thread-local, non-deterministic, not
// reproducible from a fixed seed. SeededRng exists for tests.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Mutex;
use uuid::Uuid;

use crate::traits::DrawRng;

/// Production RNG backed by the thread-local generator
#[derive(Debug, Default, Clone)]
pub struct SystemRng;

impl SystemRng {
    pub fn new() -> Self {
        Self
    }
}

impl DrawRng for SystemRng {
    fn shuffle(&self, ids: &mut Vec<Uuid>) {
        ids.shuffle(&mut rand::thread_rng());
    }
}

/// Deterministic RNG for tests
#[derive(Debug)]
pub struct SeededRng {
    inner: Mutex<StdRng>,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DrawRng for SeededRng {
    fn shuffle(&self, ids: &mut Vec<Uuid>) {
        let mut rng = self.inner.lock().unwrap();
        ids.shuffle(&mut *rng);
    }
}
