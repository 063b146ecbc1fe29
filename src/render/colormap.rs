//! Viridis colour mapping for scalar fields

use image::Rgb;

// Viridis sampled at 0.0, 0.1, ..., 1.0
const VIRIDIS: [[u8; 3]; 11] = [
    [68, 1, 84],
    [72, 36, 117],
    [65, 68, 135],
    [53, 95, 141],
    [42, 120, 142],
    [33, 145, 140],
    [34, 168, 132],
    [68, 191, 112],
    [122, 209, 81],
    [189, 223, 38],
    [253, 231, 37],
];

/// Map `t` in 0..=1 to viridis (out-of-range values are clamped)
pub fn viridis(t: f32) -> Rgb<u8> {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (VIRIDIS.len() - 1) as f32;
    let lo = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - lo as f32;
    let a = VIRIDIS[lo];
    let b = VIRIDIS[lo + 1];
    let mix = |i: usize| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * frac).round() as u8;
    Rgb([mix(0), mix(1), mix(2)])
}

/// Lowest colour of the map, used for blank backgrounds
pub fn background() -> Rgb<u8> {
    viridis(0.0)
}

/// Linear min..max normalization. A flat field maps to 0 everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    min: f32,
    span: f32,
}

impl Normalize {
    pub fn from_values(values: &[f32]) -> Self {
        let (min, max) = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min.is_finite() && max > min {
            Self {
                min,
                span: max - min,
            }
        } else {
            Self { min: 0.0, span: 0.0 }
        }
    }

    pub fn apply(&self, value: f32) -> f32 {
        if self.span > 0.0 {
            (value - self.min) / self.span
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(viridis(0.0), Rgb([68, 1, 84]));
        assert_eq!(viridis(1.0), Rgb([253, 231, 37]));
        assert_eq!(viridis(-3.0), viridis(0.0));
        assert_eq!(viridis(7.0), viridis(1.0));
        assert_eq!(viridis(f32::NAN), viridis(0.0));
    }

    #[test]
    fn test_midpoint_interpolates() {
        assert_eq!(viridis(0.5), Rgb([33, 145, 140]));
        let Rgb([r, g, _]) = viridis(0.55);
        assert!((33..=34).contains(&r));
        assert!(g > 145 && g < 168);
    }

    #[test]
    fn test_normalize_flat_field() {
        let norm = Normalize::from_values(&[2.0, 2.0, 2.0]);
        assert_eq!(norm.apply(2.0), 0.0);
        let norm = Normalize::from_values(&[]);
        assert_eq!(norm.apply(5.0), 0.0);
    }

    #[test]
    fn test_normalize_range() {
        let norm = Normalize::from_values(&[1.0, 3.0, 5.0]);
        assert_eq!(norm.apply(1.0), 0.0);
        assert_eq!(norm.apply(3.0), 0.5);
        assert_eq!(norm.apply(5.0), 1.0);
    }
}
