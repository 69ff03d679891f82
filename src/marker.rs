use rand::Rng;

/// Markers are placed within `[0, MAX_OFFSET)` percent on each axis so the
/// badge never starts in the last tenth of the play area.
pub const MAX_OFFSET: f64 = 90.0;

/// A numbered target in the play area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub value: u32,
    /// horizontal offset, percent of the play area width
    pub x: f64,
    /// vertical offset, percent of the play area height
    pub y: f64,
}

impl Marker {
    pub fn new(value: u32, x: f64, y: f64) -> Self {
        Self { value, x, y }
    }

    /// Text drawn for this marker.
    pub fn label(&self) -> String {
        format!(" {} ", self.value)
    }
}

/// Lay out a fresh round: values `1..=count`, each at an independent uniform
/// position. Overlaps are allowed.
pub fn generate<R: Rng + ?Sized>(count: u32, rng: &mut R) -> Vec<Marker> {
    (1..=count)
        .map(|value| {
            Marker::new(
                value,
                rng.gen_range(0.0..MAX_OFFSET),
                rng.gen_range(0.0..MAX_OFFSET),
            )
        })
        .collect()
}
