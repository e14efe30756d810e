use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

/// 8-bit sRGB colour shared by the egui view and the image exporter.
pub type Rgb = Srgb<u8>;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sequential colour scale for heatmaps
// ---------------------------------------------------------------------------

/// Anchor points of the Viridis scale, low to high.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Colour used for cells without a value (e.g. NaN correlations).
pub const MISSING: Rgb = Srgb::new(200, 200, 200);

/// Map `value` within `[min, max]` onto the Viridis scale.
pub fn viridis(value: f64, min: f64, max: f64) -> Rgb {
    if !value.is_finite() {
        return MISSING;
    }
    let span = max - min;
    let t = if span.abs() < f64::EPSILON {
        0.5
    } else {
        ((value - min) / span).clamp(0.0, 1.0)
    };

    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let lo = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = (scaled - lo as f64) as f32;

    let anchor = |(r, g, b): (u8, u8, u8)| -> LinSrgb { Srgb::new(r, g, b).into_format::<f32>().into_linear() };
    let mixed = anchor(VIRIDIS[lo]).mix(anchor(VIRIDIS[lo + 1]), frac);
    Srgb::<f32>::from_linear(mixed).into_format()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert_eq!(generate_palette(0).len(), 0);
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        assert_ne!(p[0], p[1]);
    }

    fn close(a: Rgb, b: (u8, u8, u8)) -> bool {
        let d = |x: u8, y: u8| (x as i16 - y as i16).abs() <= 1;
        d(a.red, b.0) && d(a.green, b.1) && d(a.blue, b.2)
    }

    #[test]
    fn viridis_ends_match_anchors() {
        assert!(close(viridis(-1.0, -1.0, 1.0), VIRIDIS[0]));
        assert!(close(viridis(1.0, -1.0, 1.0), VIRIDIS[4]));
        assert_eq!(viridis(f64::NAN, -1.0, 1.0), MISSING);
    }
}
