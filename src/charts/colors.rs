//! Continuous color scales for value-colored charts.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    Viridis,
    Plasma,
    Turbo,
}

const VIRIDIS: [[u8; 3]; 5] = [
    [68, 1, 84],
    [59, 82, 139],
    [33, 145, 140],
    [94, 201, 98],
    [253, 231, 37],
];

const PLASMA: [[u8; 3]; 5] = [
    [13, 8, 135],
    [126, 3, 168],
    [204, 71, 120],
    [248, 149, 64],
    [240, 249, 33],
];

const TURBO: [[u8; 3]; 7] = [
    [48, 18, 59],
    [70, 134, 251],
    [27, 229, 181],
    [164, 252, 59],
    [251, 185, 56],
    [228, 70, 10],
    [122, 4, 3],
];

impl ColorScale {
    fn stops(self) -> &'static [[u8; 3]] {
        match self {
            ColorScale::Viridis => &VIRIDIS,
            ColorScale::Plasma => &PLASMA,
            ColorScale::Turbo => &TURBO,
        }
    }

    /// RGB for `value` placed linearly within `[min, max]`.
    /// A degenerate range maps everything to the middle of the scale.
    pub fn rgb(self, value: f64, min: f64, max: f64) -> [u8; 3] {
        let t = if max > min && value.is_finite() {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.at(t)
    }

    /// RGB at position `t` in `[0, 1]`.
    pub fn at(self, t: f64) -> [u8; 3] {
        let stops = self.stops();
        let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
        let lower = scaled.floor() as usize;
        let upper = (lower + 1).min(stops.len() - 1);
        let frac = scaled - lower as f64;

        let mut out = [0u8; 3];
        for (i, channel) in out.iter_mut().enumerate() {
            let a = f64::from(stops[lower][i]);
            let b = f64::from(stops[upper][i]);
            *channel = (a + (b - a) * frac).round() as u8;
        }
        out
    }
}
