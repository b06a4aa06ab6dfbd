//! Core geometry and style types.
//!
//! These are the scalars that flow through the whole engine: positions and
//! dimensions computed by layout, colors carried into the draw list, and
//! the justification policies the flex passes apply.

/// Lengths, coordinates and sizes are device-space floats.
pub type Length = f64;

// =============================================================================
// Geometry
// =============================================================================

/// A point in device space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pos {
    pub x: Length,
    pub y: Length,
}

impl Pos {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: Length, y: Length) -> Self {
        Self { x, y }
    }
}

/// A size: `w` is the main axis, `h` the cross axis.
///
/// The layout engine lays children out horizontally; the main axis is
/// always width and the cross axis height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dim {
    pub w: Length,
    pub h: Length,
}

impl Dim {
    pub const ZERO: Self = Self { w: 0.0, h: 0.0 };

    pub const fn new(w: Length, h: Length) -> Self {
        Self { w, h }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Pos,
    pub size: Dim,
}

impl Rect {
    pub const fn new(origin: Pos, size: Dim) -> Self {
        Self { origin, size }
    }
}

// =============================================================================
// Color
// =============================================================================

/// Opaque RGB color with 8-bit channels.
///
/// Integer channels give exact comparison in tests. "No color" (a
/// transparent container background, an invisible rectangle) is expressed
/// as `Option<Color>` at the use sites rather than a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` value. High bits beyond 24 are ignored.
    pub const fn from_rgb_u32(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// Pack back into a `0xRRGGBB` value.
    pub const fn to_rgb_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
}

// =============================================================================
// Justification
// =============================================================================

/// Policy for distributing leftover space among items along an axis.
///
/// Used three ways: a container's main-axis policy (per line), a
/// container's cross-axis policy (across lines), and a child's own
/// cross-axis policy within its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Start,
    End,
    Center,
    /// Equal spacing before, between and after items.
    Evenly,
    /// Equal spacing around each item (half-size gaps at the edges).
    Around,
    /// Items flush to the edges, equal spacing between.
    Between,
}
