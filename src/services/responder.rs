use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const GREETING_REPLY: &str = "Hello! Great to chat with you. What can I do for you?";
pub const THANKS_REPLY: &str = "You're welcome! Let me know if anything else comes up.";

pub const RESPONSE_POOL: &[&str] = &[
    "That's an interesting question! Let me think...",
    "I see what you mean, that's worth thinking through.",
    "From what I understand, I'd say...",
    "This is a nuanced topic, and there are several angles to it...",
    "You raise a good point!",
    "Let me break this down for you...",
    "I'd be glad to help you work through this.",
    "That reminds me of a few related ideas...",
];

/// Shortest and longest simulated thinking time, in milliseconds.
pub const MIN_DELAY_MS: u64 = 1000;
pub const MAX_DELAY_MS: u64 = 3000;

/// Canned reply generator standing in for a real model.
pub struct Responder {
    rng: StdRng,
}

impl Responder {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Same seed, same sequence of replies and delays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn reply(&mut self, input: &str) -> String {
        let lowered = input.to_lowercase();

        if lowered.contains("hello") || lowered.contains("你好") {
            return GREETING_REPLY.to_string();
        }

        if lowered.contains("thank") || lowered.contains("谢谢") {
            return THANKS_REPLY.to_string();
        }

        let opener = RESPONSE_POOL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(RESPONSE_POOL[0]);
        format!(
            "{} As for \"{}\", that's a topic worth exploring. Would you like more specific details?",
            opener, input
        )
    }

    pub fn delay(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(MIN_DELAY_MS..MAX_DELAY_MS))
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}
