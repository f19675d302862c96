pub mod gaussian;
pub mod rotate;

pub use gaussian::GaussianFilter;
pub use rotate::rotate_quarter_turns;
