use formats::SourceCategory;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_u32(hex: u32) -> Self {
        Self::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fill for countries without data or with non-positive totals.
pub const UNKNOWN_COLOR: Rgb = Rgb::from_u32(0xcccccc);

/// Nine-class sequential Reds scheme, light to dark.
pub const REDS: [Rgb; 9] = [
    Rgb::from_u32(0xfff5f0),
    Rgb::from_u32(0xfee0d2),
    Rgb::from_u32(0xfcbba1),
    Rgb::from_u32(0xfc9272),
    Rgb::from_u32(0xfb6a4a),
    Rgb::from_u32(0xef3b2c),
    Rgb::from_u32(0xcb181d),
    Rgb::from_u32(0xa50f15),
    Rgb::from_u32(0x67000d),
];

/// Categorical palette used for emission sources.
pub const TABLEAU10: [Rgb; 10] = [
    Rgb::from_u32(0x4e79a7),
    Rgb::from_u32(0xf28e2c),
    Rgb::from_u32(0xe15759),
    Rgb::from_u32(0x76b7b2),
    Rgb::from_u32(0x59a14f),
    Rgb::from_u32(0xedc948),
    Rgb::from_u32(0xb07aa1),
    Rgb::from_u32(0xff9da7),
    Rgb::from_u32(0x9c755f),
    Rgb::from_u32(0xbab0ab),
];

/// Continuous Reds ramp: a uniform B-spline through `REDS`, per channel.
/// Clamped to `[0, 1]`; the endpoints are exactly the first and last stops.
pub fn interpolate_reds(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let n = REDS.len() - 1;
    let i = ((t * n as f64).floor() as usize).min(n - 1);
    let local = t * n as f64 - i as f64;
    let channel = |pick: fn(Rgb) -> u8| {
        let v1 = f64::from(pick(REDS[i]));
        let v2 = f64::from(pick(REDS[i + 1]));
        let v0 = if i > 0 { f64::from(pick(REDS[i - 1])) } else { 2.0 * v1 - v2 };
        let v3 = if i < n - 1 { f64::from(pick(REDS[i + 2])) } else { 2.0 * v2 - v1 };
        basis(local, v0, v1, v2, v3).round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(channel(|c| c.r), channel(|c| c.g), channel(|c| c.b))
}

fn basis(t: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    ((1.0 - 3.0 * t + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

pub fn category_color(category: SourceCategory) -> Rgb {
    TABLEAU10[category.index() % TABLEAU10.len()]
}

/// Country fill scale for one year: `log10(total)` over `[1, log10(max)]`
/// onto the Reds ramp.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChoroplethScale {
    max_value: f64,
    lo: f64,
    hi: f64,
}

impl ChoroplethScale {
    pub const DEFAULT_MAX: f64 = 10.0;

    /// `max_total` falls back to 10 when absent or non-positive.
    pub fn new(max_total: Option<f64>) -> Self {
        let max_value = max_total
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(Self::DEFAULT_MAX);
        Self {
            max_value,
            lo: 1.0,
            hi: max_value.log10(),
        }
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Ramp position of `value`, or `None` when it has no color.
    ///
    /// A collapsed domain (max <= 10) puts every positive value at the ramp
    /// midpoint.
    pub fn position(&self, value: Option<f64>) -> Option<f64> {
        let v = value.filter(|v| v.is_finite() && *v > 0.0)?;
        if self.hi <= self.lo {
            return Some(0.5);
        }
        Some(((v.log10() - self.lo) / (self.hi - self.lo)).clamp(0.0, 1.0))
    }

    pub fn color(&self, value: Option<f64>) -> Rgb {
        self.position(value)
            .map(interpolate_reds)
            .unwrap_or(UNKNOWN_COLOR)
    }
}
