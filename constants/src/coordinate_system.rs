/// World axes used when a surface descriptor omits its placement plane.
/// Right-handed, Z up, matching the host modelling environment.
pub const WORLD_ORIGIN: [f64; 3] = [0.0, 0.0, 0.0];
pub const WORLD_X_AXIS: [f64; 3] = [1.0, 0.0, 0.0];
pub const WORLD_Y_AXIS: [f64; 3] = [0.0, 1.0, 0.0];
pub const WORLD_Z_AXIS: [f64; 3] = [0.0, 0.0, 1.0];

/// Largest |x·y| accepted between normalised plane axes
pub const PLANE_ORTHOGONALITY_EPSILON: f64 = 1e-9;
