use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Default rotation, in degrees.
pub const DEFAULT_ROTATION_DEGREES: i32 = 180;

/// Convert a rotation angle in degrees to a quarter-turn count.
///
/// Angles that are not multiples of 90 truncate toward the next lower
/// multiple, so 95 degrees is one quarter turn and -95 degrees is minus two.
pub fn quarter_turns_for_degrees(degrees: i32) -> i32 {
    degrees.div_euclid(90)
}

/// Rotate a 2-D grid counter-clockwise by the given number of quarter turns.
///
/// Follows the usual array-rotation convention: one counter-clockwise
/// quarter turn maps `input[i][j]` to `output[cols - 1 - j][i]`, swapping
/// width and height. Negative counts rotate clockwise; four turns restore
/// the input.
pub fn rotate_quarter_turns<B: Backend>(grid: Tensor<B, 2>, quarter_turns: i32) -> Tensor<B, 2> {
    let turns = quarter_turns.rem_euclid(4);
    let mut rotated = grid;
    for _ in 0..turns {
        // One CCW quarter turn: transpose, then reverse the rows
        rotated = rotated.swap_dims(0, 1).flip([0]);
    }
    rotated
}
