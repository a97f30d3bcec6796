/// Output file names written per converted picture
pub const LAS_FILE_NAME: &str = "cloud.las";
pub const LAZ_FILE_NAME: &str = "cloud.laz";
pub const POSITION_TEXTURE_NAME: &str = "position.dds";
pub const COLOUR_TEXTURE_NAME: &str = "colour.dds";

/// Unified manifest written to the root of the output directory
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// LAS point format carrying GPS-less XYZ + RGB
pub const LAS_POINT_FORMAT: u8 = 2;

/// Finest LAS coordinate quantum, as a power of ten, in model units.
/// Wider clouds coarsen per axis until their extent fits the i32 record range.
pub const LAS_FINEST_SCALE_EXPONENT: i32 = -4;
