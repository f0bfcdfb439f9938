//! Dice sources.
//!
//! All randomness in a resolution is drawn through [`Dice`] in a fixed call
//! order, so a seeded source replays a battle exactly and a scripted source
//! pins every roll in tests.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// A source of six-sided dice.
pub trait Dice {
    /// Rolls `n` six-sided dice and returns the sum.
    fn roll_d6(&mut self, n: u32) -> u32;

    /// Rolls two six-sided dice.
    fn roll_2d6(&mut self) -> u32 {
        self.roll_d6(2)
    }
}

impl<D: Dice + ?Sized> Dice for &mut D {
    fn roll_d6(&mut self, n: u32) -> u32 {
        (**self).roll_d6(n)
    }
}

/// Deterministic dice backed by ChaCha8.
///
/// # Example
///
/// ```
/// use gunline_core::dice::{Dice, SeededDice};
///
/// let mut a = SeededDice::new(42);
/// let mut b = SeededDice::new(42);
/// assert_eq!(a.roll_2d6(), b.roll_2d6());
/// ```
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: ChaCha8Rng,
    seed: u64,
    faces_rolled: u64,
}

impl SeededDice {
    /// Creates dice from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            faces_rolled: 0,
        }
    }

    /// The seed these dice were created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of individual dice rolled so far.
    #[must_use]
    pub fn faces_rolled(&self) -> u64 {
        self.faces_rolled
    }
}

impl Dice for SeededDice {
    fn roll_d6(&mut self, n: u32) -> u32 {
        let total = (0..n).map(|_| self.rng.gen_range(1..=6u32)).sum();
        self.faces_rolled += u64::from(n);
        trace!(n, total, "dice");
        total
    }
}

/// Dice that replay a fixed list of faces.
///
/// Each requested die consumes one face; `roll_d6(2)` consumes two.
///
/// # Panics
///
/// Rolling past the end of the script panics: a test asked for more dice
/// than it scripted.
///
/// # Example
///
/// ```
/// use gunline_core::dice::{Dice, ScriptedDice};
///
/// let mut dice = ScriptedDice::new([3, 4, 6]);
/// assert_eq!(dice.roll_2d6(), 7);
/// assert_eq!(dice.roll_d6(1), 6);
/// assert!(dice.is_exhausted());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
}

impl ScriptedDice {
    /// Dice that will return `faces` in order.
    ///
    /// # Panics
    ///
    /// Panics if any face is outside 1-6.
    #[must_use]
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        let faces: VecDeque<u32> = faces.into_iter().collect();
        assert!(
            faces.iter().all(|f| (1..=6).contains(f)),
            "scripted die face out of range: {faces:?}"
        );
        Self { faces }
    }

    /// Faces not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }

    /// Whether every scripted face has been used.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.faces.is_empty()
    }
}

impl Dice for ScriptedDice {
    fn roll_d6(&mut self, n: u32) -> u32 {
        (0..n)
            .map(|_| {
                self.faces
                    .pop_front()
                    .unwrap_or_else(|| panic!("scripted dice exhausted"))
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod seeded_tests {
        use super::*;

        #[test]
        fn same_seed_same_sequence() {
            let mut a = SeededDice::new(7);
            let mut b = SeededDice::new(7);
            let xs: Vec<_> = (0..50).map(|_| a.roll_2d6()).collect();
            let ys: Vec<_> = (0..50).map(|_| b.roll_2d6()).collect();
            assert_eq!(xs, ys);
        }

        #[test]
        fn rolls_stay_in_range() {
            let mut dice = SeededDice::new(1);
            for _ in 0..500 {
                let r = dice.roll_2d6();
                assert!((2..=12).contains(&r));
            }
            assert_eq!(dice.faces_rolled(), 1000);
        }

        #[test]
        fn zero_dice_is_zero() {
            let mut dice = SeededDice::new(1);
            assert_eq!(dice.roll_d6(0), 0);
        }
    }

    mod scripted_tests {
        use super::*;

        #[test]
        fn replays_in_order() {
            let mut dice = ScriptedDice::new([1, 2, 3]);
            assert_eq!(dice.roll_d6(1), 1);
            assert_eq!(dice.roll_d6(2), 5);
            assert!(dice.is_exhausted());
        }

        #[test]
        #[should_panic(expected = "scripted dice exhausted")]
        fn exhaustion_panics() {
            let mut dice = ScriptedDice::new([6]);
            dice.roll_2d6();
        }

        #[test]
        #[should_panic(expected = "out of range")]
        fn rejects_bad_faces() {
            let _ = ScriptedDice::new([7]);
        }

        #[test]
        fn works_through_mut_ref() {
            let mut dice = ScriptedDice::new([4, 4]);
            let by_ref: &mut dyn Dice = &mut dice;
            assert_eq!(by_ref.roll_2d6(), 8);
        }
    }
}
