use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Backgrounds brighter than this get black text; everything else gets white
pub(crate) const CONTRAST_THRESHOLD: f64 = 130.0;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct Colour {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Colour {
    pub(crate) const BLACK: Colour = Colour::new(0, 0, 0);
    pub(crate) const WHITE: Colour = Colour::new(0xFF, 0xFF, 0xFF);

    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Colour {
        Colour { r, g, b }
    }

    /// Six lowercase hex digits with no leading `#`
    pub(crate) fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Colour {
    type Err = ColourError;

    fn from_str(s: &str) -> Result<Colour, ColourError> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if !hex.is_ascii() {
            return Err(ColourError(s.to_owned()));
        }
        let channel = |digits: &str| {
            u8::from_str_radix(digits, 16).map_err(|_| ColourError(s.to_owned()))
        };
        match hex.len() {
            6 => Ok(Colour::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Colour::new(r * 0x11, g * 0x11, b * 0x11))
            }
            _ => Err(ColourError(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Colour {
    type Error = ColourError;

    fn try_from(s: String) -> Result<Colour, ColourError> {
        s.parse()
    }
}

impl From<Colour> for String {
    fn from(c: Colour) -> String {
        c.to_hex()
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid RGB hex colour: {0:?}")]
pub(crate) struct ColourError(String);

/// Colour arithmetic used when deriving the palette for a week range
pub(crate) trait ColourOps {
    /// Mix `colour` with white, keeping `percent`% of the original
    fn tint(&self, colour: Colour, percent: u8) -> Colour;

    /// Mix `colour` with black, keeping `percent`% of the original
    fn shade(&self, colour: Colour, percent: u8) -> Colour;

    /// Perceived brightness on a 0-255 scale, unrounded
    fn brightness(&self, colour: Colour) -> f64;
}

impl<T: ColourOps + ?Sized> ColourOps for &T {
    fn tint(&self, colour: Colour, percent: u8) -> Colour {
        (**self).tint(colour, percent)
    }

    fn shade(&self, colour: Colour, percent: u8) -> Colour {
        (**self).shade(colour, percent)
    }

    fn brightness(&self, colour: Colour) -> f64 {
        (**self).brightness(colour)
    }
}

/// Linear channel blending with YIQ luma for brightness
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Blend;

impl ColourOps for Blend {
    fn tint(&self, colour: Colour, percent: u8) -> Colour {
        mix(colour, Colour::WHITE, percent)
    }

    fn shade(&self, colour: Colour, percent: u8) -> Colour {
        mix(colour, Colour::BLACK, percent)
    }

    fn brightness(&self, colour: Colour) -> f64 {
        let luma =
            u32::from(colour.r) * 299 + u32::from(colour.g) * 587 + u32::from(colour.b) * 114;
        f64::from(luma) / 1000.0
    }
}

/// Foreground colour to use on a background of the given brightness
pub(crate) fn contrast_foreground(brightness: f64) -> Colour {
    if brightness > CONTRAST_THRESHOLD {
        Colour::BLACK
    } else {
        Colour::WHITE
    }
}

fn mix(base: Colour, other: Colour, percent: u8) -> Colour {
    let keep = u32::from(percent.min(100));
    let channel = |a: u8, b: u8| {
        let v = (u32::from(a) * keep + u32::from(b) * (100 - keep) + 50) / 100;
        u8::try_from(v).unwrap_or(u8::MAX)
    };
    Colour::new(
        channel(base.r, other.r),
        channel(base.g, other.g),
        channel(base.b, other.b),
    )
}
