//! Configuration constants for glyph delta computation.

use font_types::Tag;

/// Designspace axis names with a registered tag and display name.
pub const STANDARD_AXES: &[(&str, Tag, &str)] = &[
    ("weight", Tag::new(b"wght"), "Weight"),
    ("width", Tag::new(b"wdth"), "Width"),
    ("slant", Tag::new(b"slnt"), "Slant"),
    ("optical", Tag::new(b"opsz"), "Optical Size"),
    ("italic", Tag::new(b"ital"), "Italic"),
];

/// Phantom points appended to every glyph: left and right side bearing
/// origins, then top and bottom.
pub const PHANTOM_POINT_COUNT: usize = 4;
