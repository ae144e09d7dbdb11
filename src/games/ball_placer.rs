use crate::games::types::{Outcome, MAX_POSITION};
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of pockets on the wheel (0..=36)
const POCKETS: u8 = MAX_POSITION + 1;

/// Largest multiple of the pocket count that fits in a byte. Bytes at or above
/// it are rejected so every pocket keeps the same probability.
const ACCEPT_BELOW: u8 = (u8::MAX / POCKETS) * POCKETS;

/// Decides where the ball lands
pub trait BallPlacer: Send + Sync {
    /// Draw a fresh outcome.
    ///
    /// Panics if no randomness can be obtained.
    fn get_position(&self) -> Outcome;
}

/// Ball placer backed by the operating system's CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptoBallPlacer;

impl CryptoBallPlacer {
    pub fn new() -> Self {
        Self
    }

    /// Draw a uniform outcome from `rng`, surfacing randomness failures
    pub fn draw<R: RngCore + ?Sized>(rng: &mut R) -> Result<Outcome, rand::Error> {
        let mut byte = [0u8; 1];
        loop {
            rng.try_fill_bytes(&mut byte)?;
            if byte[0] < ACCEPT_BELOW {
                let position = byte[0] % POCKETS;
                // every position below POCKETS is on the wheel
                if let Some(outcome) = Outcome::at(position) {
                    return Ok(outcome);
                }
            }
        }
    }
}

impl BallPlacer for CryptoBallPlacer {
    fn get_position(&self) -> Outcome {
        match Self::draw(&mut OsRng) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "random number failed to generate");
                panic!("unable to obtain randomness for roulette outcome: {}", e);
            }
        }
    }
}
