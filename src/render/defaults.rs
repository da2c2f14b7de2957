//! Fixed sizes and styling (dial units; the outer boundary is at radius 100)

use crate::types::Length;

/// Radius of the dial's outer boundary; ring offsets count inward from here
pub const OUTER_RADIUS: Length = Length(100.0);

/// Spacing margin around an occupied angular range, as a fraction of the
/// shape's own angular width
pub const BORDER_FACTOR: f64 = 0.1;

/// Stroke colour for line-based marks
pub const STROKE: &str = "#000000";
/// Fill for dots
pub const DOT_FILL: &str = "rgb(0, 0, 0)";
/// Border circles are stroked, never filled
pub const BORDER_STROKE: &str = "rgb(0,0,0)";
pub const BORDER_FILL: &str = "rgba(0,0,0,0)";

/// Numeral text styling
pub const TEXT_FILL: &str = "#111111";
pub const TEXT_OPACITY: f64 = 0.9;
pub const TEXT_WEIGHT: &str = "bold";
pub const TEXT_CLASS: &str = "title";

/// Hour labels for roman numerals, 1 through 12 (four is written `IIII`, as
/// on most watch faces)
pub const ROMAN: [&str; 12] = [
    "I", "II", "III", "IIII", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII",
];

/// Decimal places kept when writing coordinates
pub const DECIMALS: usize = 4;

/// Scale applied by the document wrapper, and its canvas size in pixels
pub const DOCUMENT_SCALE: f64 = 0.75;
pub const DOCUMENT_SIZE: u32 = 300;
