//! Flavor message pools shown after each drop.

use rand::seq::SliceRandom;
use rand::Rng;

pub const CORRECT_MESSAGES: &[&str] = &[
    "Great focus!",
    "Honey sweet pick!",
    "Bear-y good choice!",
    "Nailed it!",
];

pub const WRONG_MESSAGES: &[&str] = &[
    "Oops, honey trap!",
    "Try again, cub!",
    "Close! Think urgency + importance.",
];

/// Pick a message for a correct or wrong drop.
pub fn pick<R: Rng + ?Sized>(correct: bool, rng: &mut R) -> &'static str {
    let pool = if correct {
        CORRECT_MESSAGES
    } else {
        WRONG_MESSAGES
    };
    pool.choose(rng).copied().unwrap_or_default()
}
