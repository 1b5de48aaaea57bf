/// Axis swap from earth-centred coordinates (Z through the north pole) to the
/// engine's Y-up world (row-major: [x_new, y_new, z_new]).
/// -90° X rotation (Z→Y, -Y→Z, X→X)
pub const COORDINATE_TRANSFORM: [[f64; 3]; 3] = [
    [1.0, 0.0, 0.0],  // X = X
    [0.0, 0.0, 1.0],  // Y = Z
    [0.0, -1.0, 0.0], // Z = -Y
];

/// Apply the transformation matrix to earth-centred coordinates.
pub fn transform_coordinates(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    apply(&COORDINATE_TRANSFORM, [x, y, z], false)
}

/// Undo `transform_coordinates`. The matrix is a rotation, so its inverse is
/// its transpose.
pub fn inverse_transform_coordinates(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    apply(&COORDINATE_TRANSFORM, [x, y, z], true)
}

fn apply(matrix: &[[f64; 3]; 3], input: [f64; 3], transpose: bool) -> (f64, f64, f64) {
    let mut output = [0.0; 3];

    for i in 0..3 {
        for j in 0..3 {
            let m = if transpose { matrix[j][i] } else { matrix[i][j] };
            output[i] += m * input[j];
        }
    }

    (output[0], output[1], output[2])
}
