use rand::Rng;

mod flubber;

pub use flubber::*;

/// Source of randomness for the flub engine.
pub trait Dice {
    /// A uniform draw in `[0, 1)`.
    fn draw(&mut self) -> f64;
}

/// Adapts any `rand` generator into [`Dice`].
#[derive(Debug, Clone)]
pub struct RngDice<R: Rng>(pub R);

impl<R: Rng> Dice for RngDice<R> {
    fn draw(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}
