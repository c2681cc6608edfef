//! Typo simulator draws.

use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypoSimulator {
    /// Chance per typed character.
    pub probability: f64,
}

impl TypoSimulator {
    pub fn new(probability: f64) -> Self {
        TypoSimulator { probability }
    }

    /// Decide whether to inject a typo before typing the next character.
    ///
    /// No draw is consumed while typos are disabled.
    pub fn should_inject(
        &self,
        enabled: bool,
        char_index: usize,
        len: usize,
        rng: &mut dyn RandomSource,
    ) -> bool {
        if !enabled {
            return false;
        }
        rng.next_f64() < self.probability && char_index < len
    }

    /// A wrong character, uniform over `A..=Z`.
    pub fn wrong_letter(rng: &mut dyn RandomSource) -> char {
        (b'A' + rng.index(26) as u8) as char
    }
}
