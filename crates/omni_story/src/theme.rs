//! Theme colors for rendered stories.

use image::{Rgb, Rgba};

/// Story themes with a dedicated palette.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    /// Warm ambers
    Adventure,
    /// Blues and cyans
    Discovery,
    /// Purples and pinks
    Transformation,
    /// Yellows and reds
    Celebration,
    /// Neutral grays, used for unrecognised themes
    #[default]
    Default,
}

impl Theme {
    /// Theme for a model-supplied theme word, falling back to [`Theme::Default`].
    ///
    /// # Examples
    ///
    /// ```
    /// use omni_story::Theme;
    ///
    /// assert_eq!(Theme::from_word(" Adventure "), Theme::Adventure);
    /// assert_eq!(Theme::from_word("nostalgia"), Theme::Default);
    /// ```
    pub fn from_word(word: &str) -> Self {
        word.trim().parse().unwrap_or_default()
    }

    /// Colors for this theme.
    pub fn palette(&self) -> ThemePalette {
        match self {
            Theme::Adventure => ThemePalette::new(0x78350f, 0x7c2d12, 0xf59e0b),
            Theme::Discovery => ThemePalette::new(0x1e3a8a, 0x164e63, 0x06b6d4),
            Theme::Transformation => ThemePalette::new(0x581c87, 0x831843, 0xa855f7),
            Theme::Celebration => ThemePalette::new(0x713f12, 0x7f1d1d, 0xeab308),
            Theme::Default => ThemePalette::new(0x111827, 0x0f172a, 0x7c3aed),
        }
    }
}

/// Gradient and accent colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    /// Top-left gradient stop
    pub gradient_from: Rgba<u8>,
    /// Bottom-right gradient stop
    pub gradient_to: Rgba<u8>,
    /// Accent for badges and highlights
    pub accent: Rgb<u8>,
}

/// Gradient stop opacity (80%).
const GRADIENT_ALPHA: u8 = 204;

/// Canvas color beneath the gradient.
pub const BACKDROP: Rgb<u8> = Rgb([0x11, 0x11, 0x11]);

fn rgb(hex: u32) -> Rgb<u8> {
    let [_, r, g, b] = hex.to_be_bytes();
    Rgb([r, g, b])
}

impl ThemePalette {
    fn new(from: u32, to: u32, accent: u32) -> Self {
        let with_alpha = |color: Rgb<u8>| {
            let [r, g, b] = color.0;
            Rgba([r, g, b, GRADIENT_ALPHA])
        };
        Self {
            gradient_from: with_alpha(rgb(from)),
            gradient_to: with_alpha(rgb(to)),
            accent: rgb(accent),
        }
    }

    /// Palette for a model-supplied theme word.
    pub fn for_theme(word: &str) -> Self {
        Theme::from_word(word).palette()
    }

    /// Opaque gradient color at `t` in `0.0..=1.0`, composited over [`BACKDROP`].
    pub fn gradient_at(&self, t: f32) -> Rgb<u8> {
        let t = t.clamp(0.0, 1.0);
        let channel = |i: usize| {
            let from = f32::from(self.gradient_from.0[i]);
            let to = f32::from(self.gradient_to.0[i]);
            let alpha = f32::from(GRADIENT_ALPHA) / 255.0;
            let color = from + (to - from) * t;
            let blended = color * alpha + f32::from(BACKDROP.0[i]) * (1.0 - alpha);
            blended.round().clamp(0.0, 255.0) as u8
        };
        Rgb([channel(0), channel(1), channel(2)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn theme_lookup_is_case_insensitive() {
        assert_eq!(ThemePalette::for_theme("DISCOVERY").accent, Rgb([0x06, 0xb6, 0xd4]));
        assert_eq!(ThemePalette::for_theme("unknown").accent, Rgb([0x7c, 0x3a, 0xed]));
    }

    #[test]
    fn every_theme_has_distinct_accent() {
        let accents: std::collections::HashSet<[u8; 3]> =
            Theme::iter().map(|t| t.palette().accent.0).collect();
        assert_eq!(accents.len(), 5);
    }

    #[test]
    fn gradient_endpoints_blend_over_backdrop() {
        let palette = Theme::Adventure.palette();
        let start = palette.gradient_at(0.0);
        let end = palette.gradient_at(1.0);
        assert_ne!(start, end);
        // 0x78 at 80% over 0x11 at 20%
        assert_eq!(start.0[0], 99);
        assert_eq!(palette.gradient_at(-1.0), start);
    }
}
