//! Image-processing vocabulary shared by backends and nodes.

use std::fmt;

/// Color space of an image buffer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ColorSpace {
    #[default]
    Rgb,
    Rgba,
    Bgr,
    Hsv,
    YCrCb,
    Lab,
    Gray,
}

impl ColorSpace {
    pub const ALL: [ColorSpace; 7] = [
        ColorSpace::Rgb,
        ColorSpace::Rgba,
        ColorSpace::Bgr,
        ColorSpace::Hsv,
        ColorSpace::YCrCb,
        ColorSpace::Lab,
        ColorSpace::Gray,
    ];

    /// Upper-case name as used in OpenCV constants (`COLOR_RGB2HSV`).
    pub fn name(self) -> &'static str {
        match self {
            ColorSpace::Rgb => "RGB",
            ColorSpace::Rgba => "RGBA",
            ColorSpace::Bgr => "BGR",
            ColorSpace::Hsv => "HSV",
            ColorSpace::YCrCb => "YCrCb",
            ColorSpace::Lab => "LAB",
            ColorSpace::Gray => "GRAY",
        }
    }

    /// Number of channels in a buffer of this color space.
    pub fn channels(self) -> u8 {
        match self {
            ColorSpace::Gray => 1,
            ColorSpace::Rgba => 4,
            _ => 3,
        }
    }

    /// OpenCV conversion constant names for `self -> to`.
    ///
    /// There is no direct `RGBA -> X` conversion for most targets, so an RGBA
    /// side is spelled as RGB unless the other side is RGB. `LAB` is spelled
    /// `Lab` in OpenCV constants.
    pub fn conversion_names(self, to: ColorSpace) -> (&'static str, &'static str) {
        let mut from_name = self.name();
        let mut to_name = to.name();

        if self == ColorSpace::Rgba && to != ColorSpace::Rgb {
            from_name = "RGB";
        } else if self != ColorSpace::Rgb && to == ColorSpace::Rgba {
            to_name = "RGB";
        }

        if self == ColorSpace::Lab {
            from_name = "Lab";
        }
        if to == ColorSpace::Lab {
            to_name = "Lab";
        }

        (from_name, to_name)
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_names() {
        assert_eq!(ColorSpace::Rgb.conversion_names(ColorSpace::Hsv), ("RGB", "HSV"));
        assert_eq!(ColorSpace::Rgba.conversion_names(ColorSpace::Hsv), ("RGB", "HSV"));
        assert_eq!(ColorSpace::Rgba.conversion_names(ColorSpace::Rgb), ("RGBA", "RGB"));
        assert_eq!(ColorSpace::Hsv.conversion_names(ColorSpace::Rgba), ("HSV", "RGB"));
        assert_eq!(ColorSpace::Rgb.conversion_names(ColorSpace::Lab), ("RGB", "Lab"));
    }

    #[test]
    fn test_channels() {
        assert_eq!(ColorSpace::Gray.channels(), 1);
        assert_eq!(ColorSpace::Rgba.channels(), 4);
        assert_eq!(ColorSpace::Hsv.channels(), 3);
    }
}
