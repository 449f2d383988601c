//! The elliptic curve `y^2 = x^3 + 2x + 26z^5` over the septic extension.
use crate::septic_extension::SepticExtension;
use mips_air_primitives::{poseidon2_permute, POSEIDON2_WIDTH};
use p3_baby_bear::BabyBear;
use p3_field::{AbstractField, Field, PrimeField32};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg};

/// The number of hash offsets tried by [`SepticCurve::lift_x`].
pub const LIFT_X_MAX_OFFSETS: usize = 256;

/// An affine point on `y^2 = x^3 + 2x + 26z^5`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct SepticCurve<F> {
    /// The x-coordinate.
    pub x: SepticExtension<F>,
    /// The y-coordinate.
    pub y: SepticExtension<F>,
}

/// The x-coordinate of the point written into unused interaction columns, derived from `e`.
pub const CURVE_WITNESS_DUMMY_POINT_X: [u32; 7] =
    [0x2738281, 0x8284590, 0x4523536, 0x0287471, 0x3526624, 0x9775724, 0x7093699];

/// The y-coordinate of the point written into unused interaction columns, derived from `e`.
pub const CURVE_WITNESS_DUMMY_POINT_Y: [u32; 7] =
    [48041908, 550064556, 415267377, 1726976249, 1253299140, 209439863, 1302309485];

impl<F: Field> SepticCurve<F> {
    /// The padding witness point.
    #[must_use]
    pub fn dummy() -> Self {
        Self {
            x: SepticExtension::from_canonical_u32s(CURVE_WITNESS_DUMMY_POINT_X),
            y: SepticExtension::from_canonical_u32s(CURVE_WITNESS_DUMMY_POINT_Y),
        }
    }

    /// The all-zero pair. It is not on the curve, which lets trace columns use it for the
    /// identity.
    #[must_use]
    pub fn zero() -> Self {
        Self { x: SepticExtension::zero(), y: SepticExtension::zero() }
    }

    /// Whether both coordinates are zero.
    pub fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    /// Evaluates the right-hand side `x^3 + 2x + 26z^5`.
    pub fn curve_formula(x: SepticExtension<F>) -> SepticExtension<F> {
        let mut constant = SepticExtension::zero();
        constant.0[5] = F::from_canonical_u32(26);
        x.cube() + x * F::two() + constant
    }

    /// Whether the point satisfies the curve equation.
    pub fn check_on_point(&self) -> bool {
        self.y.square() == Self::curve_formula(self.x)
    }
}

impl<F: PrimeField32> SepticCurve<F> {
    /// Chord addition. The caller guarantees `self.x != other.x`.
    #[must_use]
    pub fn add_incomplete(&self, other: SepticCurve<F>) -> Self {
        let slope = (other.y - self.y) / (other.x - self.x);
        let x = slope.square() - self.x - other.x;
        let y = slope * (self.x - x) - self.y;
        Self { x, y }
    }

    /// Chord subtraction, `self + (-other)`, under the same precondition.
    #[must_use]
    pub fn sub_incomplete(&self, other: SepticCurve<F>) -> Self {
        self.add_incomplete(-other)
    }

    /// Tangent doubling, `slope = (3x^2 + 2) / 2y`. The caller guarantees `y != 0`.
    #[must_use]
    pub fn double(&self) -> Self {
        let slope = (self.x.square() * F::from_canonical_u32(3) + F::two()) / (self.y * F::two());
        let x = slope.square() - self.x * F::two();
        let y = slope * (self.x - x) - self.y;
        Self { x, y }
    }

    /// Hashes a message onto the curve.
    ///
    /// The hash input is `[m_0, ..., m_6, offset, 0, ..., 0]`. The first `offset` in `0..256` whose
    /// hash yields an x-coordinate on the curve, with a y-coordinate of non-zero top limb, wins.
    /// The returned point is always normalised to the receive half.
    pub fn lift_x(m: SepticExtension<F>) -> (Self, u8) {
        for offset in 0..=u8::MAX {
            let mut input = [BabyBear::zero(); POSEIDON2_WIDTH];
            for (slot, limb) in input.iter_mut().zip(m.0.iter()) {
                *slot = BabyBear::from_canonical_u32(limb.as_canonical_u32());
            }
            input[7] = BabyBear::from_canonical_u8(offset);

            let hash = poseidon2_permute(input);
            let x = SepticExtension::from_base_fn(|i| {
                F::from_canonical_u32(hash[i].as_canonical_u32())
            });

            let Some(y) = Self::curve_formula(x).sqrt() else {
                continue;
            };
            if y.is_exception() {
                continue;
            }
            let y = if y.is_send() { -y } else { y };
            return (Self { x, y }, offset);
        }
        panic!("curve point couldn't be found after {LIFT_X_MAX_OFFSETS} attempts");
    }
}

impl<F: Field> Neg for SepticCurve<F> {
    type Output = Self;

    fn neg(self) -> Self {
        Self { x: self.x, y: -self.y }
    }
}

impl<F: Field> SepticCurve<F> {
    /// Zero iff `p3.x == (p1 + p2).x`, outside the exceptional cases of the chord rule.
    pub fn sum_checker_x(
        p1: SepticCurve<F>,
        p2: SepticCurve<F>,
        p3: SepticCurve<F>,
    ) -> SepticExtension<F> {
        (p1.x + p2.x + p3.x) * (p2.x - p1.x).square() - (p2.y - p1.y).square()
    }

    /// Zero iff `p3.y == (p1 + p2).y`, outside the exceptional cases of the chord rule.
    pub fn sum_checker_y(
        p1: SepticCurve<F>,
        p2: SepticCurve<F>,
        p3: SepticCurve<F>,
    ) -> SepticExtension<F> {
        (p1.y + p3.y) * (p2.x - p1.x) - (p2.y - p1.y) * (p1.x - p3.x)
    }
}

impl<T> SepticCurve<T> {
    /// Converts coordinates one limb at a time.
    pub fn convert<S: Copy, G: FnMut(S) -> T>(point: SepticCurve<S>, mut f: G) -> Self {
        SepticCurve {
            x: SepticExtension(point.x.0.map(&mut f)),
            y: SepticExtension(point.y.0.map(&mut f)),
        }
    }
}

/// A curve point including the point at infinity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SepticCurveComplete<T> {
    /// The group identity.
    Infinity,
    /// A finite point.
    Affine(SepticCurve<T>),
}

impl<F: PrimeField32> Add for SepticCurveComplete<F> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Infinity, other) | (other, Self::Infinity) => other,
            (Self::Affine(p1), Self::Affine(p2)) => {
                if p1.x != p2.x {
                    Self::Affine(p1.add_incomplete(p2))
                } else if p1.y == p2.y && !p1.y.is_zero() {
                    Self::Affine(p1.double())
                } else {
                    Self::Infinity
                }
            }
        }
    }
}

impl<F: Field> Neg for SepticCurveComplete<F> {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Self::Infinity => Self::Infinity,
            Self::Affine(point) => Self::Affine(-point),
        }
    }
}

impl<F: Field> SepticCurveComplete<F> {
    /// Whether this is the point at infinity.
    pub fn is_infinity(&self) -> bool {
        matches!(self, Self::Infinity)
    }

    /// The affine point, or `None` at infinity.
    pub fn affine(&self) -> Option<SepticCurve<F>> {
        match self {
            Self::Infinity => None,
            Self::Affine(point) => Some(*point),
        }
    }

    /// The column encoding: the point itself, or the all-zero pair at infinity.
    pub fn to_encoded(&self) -> SepticCurve<F> {
        self.affine().unwrap_or_else(SepticCurve::zero)
    }

    /// Inverse of [`Self::to_encoded`].
    pub fn from_encoded(point: SepticCurve<F>) -> Self {
        if point.is_zero() {
            Self::Infinity
        } else {
            Self::Affine(point)
        }
    }
}

#[cfg(test)]
mod tests {
    use p3_baby_bear::BabyBear;
    use p3_maybe_rayon::prelude::{
        IndexedParallelIterator, IntoParallelIterator, ParallelIterator,
    };
    use rayon_scan::ScanParallelIterator;

    use super::*;

    fn message(i: u32) -> SepticExtension<BabyBear> {
        SepticExtension::from_canonical_u32s([
            i + 25,
            2 * i + 376,
            4 * i + 23,
            8 * i + 531,
            16 * i + 542,
            32 * i + 196,
            64 * i + 667,
        ])
    }

    fn lifted(i: u32) -> SepticCurve<BabyBear> {
        SepticCurve::lift_x(message(i)).0
    }

    #[test]
    fn test_lift_x() {
        let x = SepticExtension::from_canonical_u32s([
            0x2013, 0x2015, 0x2016, 0x2023, 0x2024, 0x2016, 0x2017,
        ]);
        let (point, offset) = SepticCurve::<BabyBear>::lift_x(x);
        assert!(point.check_on_point());
        assert!(point.y.is_receive());
        assert!(!point.y.is_exception());
        assert_eq!(SepticCurve::<BabyBear>::lift_x(x), (point, offset));
    }

    #[test]
    fn test_dummy_on_curve_and_zero_not() {
        assert!(SepticCurve::<BabyBear>::dummy().check_on_point());
        assert!(!SepticCurve::<BabyBear>::zero().check_on_point());
    }

    #[test]
    fn test_double() {
        let point = lifted(1);
        let doubled = point.double();
        assert!(doubled.check_on_point());
        assert_eq!(
            SepticCurveComplete::Affine(point) + SepticCurveComplete::Affine(point),
            SepticCurveComplete::Affine(doubled)
        );

        // 2P lies on the tangent at P: the line through P with slope dy/dx of the curve.
        let (two, three) = (BabyBear::from_canonical_u32(2), BabyBear::from_canonical_u32(3));
        let tangent = (point.x * point.x * three + two) / (point.y + point.y);
        assert_eq!(doubled.x, tangent * tangent - point.x - point.x);
        assert_eq!(point.y + doubled.y, tangent * (point.x - doubled.x));
    }

    #[test]
    fn test_double_against_chord_addition() {
        for i in 0..8 {
            let point = lifted(i);
            let doubled = point.double();
            assert_eq!(doubled.sub_incomplete(point), point);
            assert_eq!(doubled.add_incomplete(point).sub_incomplete(doubled), point);

            let p = SepticCurveComplete::Affine(point);
            let p2 = SepticCurveComplete::Affine(doubled);
            assert_eq!(p2 + (-p), p);
            assert_eq!((p2 + p) + (-p2), p);
            assert_eq!((p + p) + p, p + (p + p));
        }
    }

    #[test]
    fn test_sum_checkers() {
        for i in 0..8 {
            let (p1, p2) = (lifted(i), lifted(i + 100));
            let sum = p1.add_incomplete(p2);
            assert!(sum.check_on_point());
            assert!(SepticCurve::sum_checker_x(p1, p2, sum).is_zero());
            assert!(SepticCurve::sum_checker_y(p1, p2, sum).is_zero());
            assert!(!SepticCurve::sum_checker_x(p1, p2, p1).is_zero());
        }
    }

    #[test]
    fn test_complete_addition_identities() {
        let p = SepticCurveComplete::Affine(lifted(3));
        let q = SepticCurveComplete::Affine(lifted(4));
        let inf = SepticCurveComplete::<BabyBear>::Infinity;
        assert_eq!(p + inf, p);
        assert_eq!(inf + p, p);
        assert_eq!(p + (-p), inf);
        assert_eq!(p + q, q + p);
        assert_eq!((p + q) + (-q), p);
    }

    #[test]
    fn test_encoding() {
        let inf = SepticCurveComplete::<BabyBear>::Infinity;
        assert!(inf.to_encoded().is_zero());
        assert_eq!(SepticCurveComplete::from_encoded(inf.to_encoded()), inf);
        let p = SepticCurveComplete::Affine(lifted(5));
        assert_eq!(SepticCurveComplete::from_encoded(p.to_encoded()), p);
    }

    #[test]
    fn test_parallel_scan_matches_sequential() {
        let points = (0..64).map(|i| SepticCurveComplete::Affine(lifted(i))).collect::<Vec<_>>();
        let mut sequential = Vec::with_capacity(points.len());
        let mut acc = SepticCurveComplete::Infinity;
        for point in &points {
            acc = acc + *point;
            sequential.push(acc);
        }
        let parallel = points
            .into_par_iter()
            .with_min_len(4)
            .scan(|a, b| *a + *b, SepticCurveComplete::Infinity)
            .collect::<Vec<SepticCurveComplete<BabyBear>>>();
        assert_eq!(parallel, sequential);
    }
}
