use crate::config::LayoutConfig;
use crate::error::GlobeError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Largest position change of a single mutation, in layout units.
pub const POSITION_DELTA: i32 = 1000;
/// Largest scale change of a single mutation.
pub const SCALE_DELTA: i32 = 100;
/// Largest heading change of a single mutation, in degrees.
pub const HEADING_DELTA: i32 = 20;

/// One placed digit: glyph, position inside the globe, size and heading.
///
/// Persisted as the flat tuple `[digit, x, y, z, scale, heading]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GeneTuple", into = "GeneTuple")]
pub struct Gene {
    pub digit: u8,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub scale: i32,
    /// Degrees in `[0, 360)`.
    pub heading: i32,
}

type GeneTuple = (u8, i32, i32, i32, i32, i32);

impl From<Gene> for GeneTuple {
    fn from(gene: Gene) -> Self {
        (gene.digit, gene.x, gene.y, gene.z, gene.scale, gene.heading)
    }
}

impl TryFrom<GeneTuple> for Gene {
    type Error = GlobeError;

    fn try_from((digit, x, y, z, scale, heading): GeneTuple) -> Result<Self, Self::Error> {
        if digit > 9 {
            return Err(GlobeError::InvalidGene(format!("digit {} is not in 0..=9", digit)));
        }
        if !(0..360).contains(&heading) {
            return Err(GlobeError::InvalidGene(format!("heading {} is not in 0..360", heading)));
        }
        Ok(Self { digit, x, y, z, scale, heading })
    }
}

/// The mutable fields of a gene, each picked with equal probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneField {
    Digit,
    X,
    Y,
    Z,
    Scale,
    Heading,
}

impl GeneField {
    pub const ALL: [GeneField; 6] = [
        GeneField::Digit,
        GeneField::X,
        GeneField::Y,
        GeneField::Z,
        GeneField::Scale,
        GeneField::Heading,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl Gene {
    pub fn random<R: Rng + ?Sized>(layout: &LayoutConfig, rng: &mut R) -> Self {
        let (x, y, z) = random_point(layout, rng);
        Self {
            digit: rng.gen_range(0..=9),
            x,
            y,
            z,
            scale: rng.gen_range(layout.min_scale..=layout.max_scale),
            heading: rng.gen_range(0..360),
        }
    }

    /// Apply a small bounded change to one field.
    ///
    /// Positions move by whole quantization steps and are clamped to
    /// `[-radius, radius]`, scale is clamped to its range, heading wraps.
    pub fn perturb<R: Rng + ?Sized>(&mut self, field: GeneField, layout: &LayoutConfig, rng: &mut R) {
        match field {
            GeneField::Digit => self.digit = rng.gen_range(0..=9),
            GeneField::X => self.x = shift_coordinate(self.x, layout, rng),
            GeneField::Y => self.y = shift_coordinate(self.y, layout, rng),
            GeneField::Z => self.z = shift_coordinate(self.z, layout, rng),
            GeneField::Scale => {
                let delta = rng.gen_range(-SCALE_DELTA..=SCALE_DELTA);
                self.scale = (self.scale + delta).clamp(layout.min_scale, layout.max_scale);
            }
            GeneField::Heading => {
                let delta = rng.gen_range(-HEADING_DELTA..=HEADING_DELTA);
                self.heading = (self.heading + delta).rem_euclid(360);
            }
        }
    }

    /// Whether every field lies inside the ranges `layout` allows.
    pub fn is_within(&self, layout: &LayoutConfig) -> bool {
        self.digit <= 9
            && layout.contains_position(self.x, self.y, self.z)
            && (layout.min_scale..=layout.max_scale).contains(&self.scale)
            && (0..360).contains(&self.heading)
    }
}

fn shift_coordinate<R: Rng + ?Sized>(value: i32, layout: &LayoutConfig, rng: &mut R) -> i32 {
    let max_steps = (POSITION_DELTA / layout.quantization).max(1);
    let delta = rng.gen_range(-max_steps..=max_steps) * layout.quantization;
    (value + delta).clamp(-layout.radius, layout.radius)
}

/// Uniform point inside the ball, snapped to the quantization grid.
///
/// Rejection sampling in the enclosing cube; each draw is accepted with
/// probability pi/6, so the loop ends almost surely.
pub fn random_point<R: Rng + ?Sized>(layout: &LayoutConfig, rng: &mut R) -> (i32, i32, i32) {
    let steps = layout.steps() as f64;
    let snap = |v: f64| (v * steps) as i32 * layout.quantization;
    loop {
        let x = rng.gen::<f64>() * 2.0 - 1.0;
        let y = rng.gen::<f64>() * 2.0 - 1.0;
        let z = rng.gen::<f64>() * 2.0 - 1.0;
        if x * x + y * y + z * z <= 1.0 {
            return (snap(x), snap(y), snap(z));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_point_is_quantized_and_inside_ball() {
        let layout = LayoutConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let r2 = (layout.radius as i64).pow(2);
        for _ in 0..2000 {
            let (x, y, z) = random_point(&layout, &mut rng);
            assert!(layout.contains_position(x, y, z));
            let d2 = (x as i64).pow(2) + (y as i64).pow(2) + (z as i64).pow(2);
            assert!(d2 <= r2, "({}, {}, {}) outside ball", x, y, z);
        }
    }

    #[test]
    fn test_heading_wraps_below_zero() {
        let layout = LayoutConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut gene = Gene { digit: 1, x: 0, y: 0, z: 0, scale: 600, heading: 0 };
        for _ in 0..200 {
            gene.perturb(GeneField::Heading, &layout, &mut rng);
            assert!((0..360).contains(&gene.heading));
        }
    }

    #[test]
    fn test_coordinate_clamped_at_surface() {
        let layout = LayoutConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut gene = Gene { digit: 1, x: layout.radius, y: 0, z: 0, scale: 600, heading: 0 };
        for _ in 0..200 {
            gene.perturb(GeneField::X, &layout, &mut rng);
            assert!(gene.x <= layout.radius && gene.x >= -layout.radius);
            assert_eq!(gene.x % layout.quantization, 0);
        }
    }

    #[test]
    fn test_tuple_rejects_bad_digit() {
        assert!(Gene::try_from((10u8, 0, 0, 0, 600, 0)).is_err());
        assert!(Gene::try_from((3u8, 0, 0, 0, 600, 360)).is_err());
    }
}
