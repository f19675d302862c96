pub mod error;
pub mod filter;
pub mod position;
pub mod residue;

pub use error::CoreError;
pub use filter::{rotate_quarter_turns, GaussianFilter};
pub use position::{same_position, Position};
pub use residue::residue;
