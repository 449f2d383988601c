//! The degree-7 extension `F_{p^7} = F_p[z]/(z^7 - 2z - 5)` of BabyBear.
use p3_field::{Field, PrimeField32};
use serde::{Deserialize, Serialize};
use std::{
    array,
    fmt::Display,
    ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign},
};

/// The BabyBear modulus, which the Frobenius tables below are computed for.
const BABY_BEAR_ORDER: u32 = 0x7800_0001;

/// `z^(i * p)` for `i = 1..=6`.
const Z_POW_P: [[u32; 7]; 6] = [
    [954599710, 1359279693, 566669999, 1982781815, 1735718361, 1174868538, 1120871770],
    [862825265, 597046311, 978840770, 1790138282, 1044777201, 835869808, 1342179023],
    [596273169, 658837454, 1515468261, 367059247, 781278880, 1544222616, 155490465],
    [557608863, 1173670028, 1749546888, 1086464137, 803900099, 1288818584, 1184677604],
    [763416381, 1252567168, 628856225, 1771903394, 650712211, 19417363, 57990258],
    [1734711039, 1749813853, 1227235221, 1707730636, 424560395, 1007029514, 498034669],
];

/// `z^(i * p^2)` for `i = 1..=6`.
const Z_POW_P2: [[u32; 7]; 6] = [
    [1013489358, 1619071628, 304593143, 1949397349, 1564307636, 327761151, 415430835],
    [209824426, 1313900768, 38410482, 256593180, 1708830551, 1244995038, 1555324019],
    [1475628651, 777565847, 704492386, 1218528120, 1245363405, 475884575, 649166061],
    [550038364, 948935655, 68722023, 1251345762, 1692456177, 1177958698, 350232928],
    [882720258, 821925756, 199955840, 812002876, 1484951277, 1063138035, 491712810],
    [738287111, 1955364991, 552724293, 1175775744, 341623997, 1454022463, 408193320],
];

/// An element of the septic extension, stored as its seven coefficients in the basis
/// `1, z, ..., z^6`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct SepticExtension<F>(pub [F; 7]);

impl<F: Field> SepticExtension<F> {
    /// The additive identity.
    #[must_use]
    pub fn zero() -> Self {
        Self([F::zero(); 7])
    }

    /// The multiplicative identity.
    #[must_use]
    pub fn one() -> Self {
        Self::from_base(F::one())
    }

    /// Embeds a base field element.
    #[must_use]
    pub fn from_base(b: F) -> Self {
        let mut coeffs = [F::zero(); 7];
        coeffs[0] = b;
        Self(coeffs)
    }

    /// Builds an element coefficient by coefficient.
    pub fn from_base_fn<G: FnMut(usize) -> F>(f: G) -> Self {
        Self(array::from_fn(f))
    }

    /// Builds an element from canonical `u32` coefficients.
    #[must_use]
    pub fn from_canonical_u32s(coeffs: [u32; 7]) -> Self {
        Self(coeffs.map(F::from_canonical_u32))
    }

    /// `z`, a generator of the extension as an algebra.
    #[must_use]
    pub fn generator() -> Self {
        Self::from_base_fn(|i| match i {
            0 => F::two(),
            1 => F::one(),
            _ => F::zero(),
        })
    }

    /// Whether all coefficients are zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Field::is_zero)
    }

    /// `a * a`.
    #[must_use]
    pub fn square(&self) -> Self {
        *self * *self
    }

    /// `a * a * a`.
    #[must_use]
    pub fn cube(&self) -> Self {
        self.square() * *self
    }

    /// Square-and-multiply exponentiation.
    #[must_use]
    pub fn exp_u64(&self, mut power: u64) -> Self {
        let mut result = Self::one();
        let mut base = *self;
        while power > 0 {
            if power & 1 == 1 {
                result *= base;
            }
            base = base.square();
            power >>= 1;
        }
        result
    }
}

impl<F: PrimeField32> SepticExtension<F> {
    /// Evaluates `sum(c_i * T[i])` where `T[i - 1]` is the image of `z^i`.
    fn apply_power_table(&self, table: &[[u32; 7]; 6]) -> Self {
        debug_assert_eq!(F::ORDER_U32, BABY_BEAR_ORDER);
        let mut result = Self::from_base(self.0[0]);
        for (coeff, image) in self.0[1..].iter().zip(table.iter()) {
            result += Self::from_canonical_u32s(*image) * *coeff;
        }
        result
    }

    /// The Frobenius endomorphism `a -> a^p`.
    #[must_use]
    pub fn frobenius(&self) -> Self {
        self.apply_power_table(&Z_POW_P)
    }

    /// `a -> a^(p^2)`.
    #[must_use]
    pub fn double_frobenius(&self) -> Self {
        self.apply_power_table(&Z_POW_P2)
    }

    /// `a^(r - 1)` with `r = (p^7 - 1) / (p - 1)`, i.e. the product of all non-trivial conjugates.
    #[must_use]
    fn conjugate_product(&self) -> Self {
        let base = self.frobenius() * self.double_frobenius();
        let base_p2 = base.double_frobenius();
        let base_p4 = base_p2.double_frobenius();
        base * base_p2 * base_p4
    }

    /// The field norm down to `F_p`.
    pub fn norm(&self) -> F {
        (self.conjugate_product() * *self).0[0]
    }

    /// Returns `None` for zero.
    #[must_use]
    pub fn try_inverse(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        let conjugates = self.conjugate_product();
        let norm = (conjugates * *self).0[0];
        Some(conjugates * norm.inverse())
    }

    /// Panics on zero.
    #[must_use]
    pub fn inverse(&self) -> Self {
        self.try_inverse().expect("inverse of zero in the septic extension")
    }

    /// An element is a square iff its norm is a square in `F_p`, as the extension degree is odd.
    pub fn is_square(&self) -> bool {
        legendre_is_one(self.norm())
    }

    /// The square root, or `None` for a non-residue.
    ///
    /// With `N` the norm, `a^((p + 1) / 2 * (p + p^3 + p^5) + 1) / sqrt(N)` squares to `a`, so
    /// only one square root in the base field is needed.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_zero() || *self == Self::one() {
            return Some(*self);
        }

        let norm = self.norm();
        if !legendre_is_one(norm) {
            return None;
        }

        let half_power = self.exp_u64((u64::from(F::ORDER_U32) + 1) / 2);
        let mut conjugate = half_power.frobenius();
        let mut numerator = conjugate;
        conjugate = conjugate.double_frobenius();
        numerator *= conjugate;
        conjugate = conjugate.double_frobenius();
        numerator *= conjugate;
        numerator *= *self;

        let inv_norm_root = cipolla_sqrt(norm.inverse());
        Some(numerator * inv_norm_root)
    }

    /// Whether the element, read as the y-coordinate of an interaction point, marks a receive:
    /// `1 <= y6 <= ceil(p / 2)`.
    pub fn is_receive(&self) -> bool {
        let top = self.0[6].as_canonical_u32();
        1 <= top && top <= F::ORDER_U32.div_ceil(2)
    }

    /// Whether the element, read as the y-coordinate of an interaction point, marks a send:
    /// `ceil(p / 2) <= y6 <= p - 1`.
    pub fn is_send(&self) -> bool {
        let top = self.0[6].as_canonical_u32();
        F::ORDER_U32.div_ceil(2) <= top && top < F::ORDER_U32
    }

    /// A zero top coordinate encodes neither direction.
    pub fn is_exception(&self) -> bool {
        self.0[6].as_canonical_u32() == 0
    }
}

fn legendre_is_one<F: PrimeField32>(x: F) -> bool {
    x.exp_u64(u64::from(F::ORDER_U32 - 1) / 2) == F::one()
}

/// Square root in `F_p` of a quadratic residue, by Cipolla's algorithm.
fn cipolla_sqrt<F: PrimeField32>(n: F) -> F {
    let g = F::generator();
    let mut a = F::one();
    let mut nonresidue = a.square() - n;
    while legendre_is_one(nonresidue) {
        a *= g;
        nonresidue = a.square() - n;
    }

    // (a + w)^((p + 1) / 2) in F_p[w]/(w^2 - nonresidue) lies in F_p.
    let mul = |(r0, i0): (F, F), (r1, i1): (F, F)| {
        (r0 * r1 + nonresidue * i0 * i1, r0 * i1 + i0 * r1)
    };
    let mut result = (F::one(), F::zero());
    let mut base = (a, F::one());
    let mut power = (u64::from(F::ORDER_U32) + 1) / 2;
    while power > 0 {
        if power & 1 == 1 {
            result = mul(result, base);
        }
        base = mul(base, base);
        power >>= 1;
    }
    result.0
}

impl<F: Field> Add for SepticExtension<F> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl<F: Field> AddAssign for SepticExtension<F> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<F: Field> Sub for SepticExtension<F> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl<F: Field> SubAssign for SepticExtension<F> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<F: Field> Neg for SepticExtension<F> {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.map(|c| -c))
    }
}

impl<F: Field> Mul for SepticExtension<F> {
    type Output = Self;

    /// Schoolbook product, then reduction with `z^7 = 2z + 5`.
    fn mul(self, rhs: Self) -> Self {
        let mut wide = [F::zero(); 13];
        for (i, &a) in self.0.iter().enumerate() {
            for (j, &b) in rhs.0.iter().enumerate() {
                wide[i + j] += a * b;
            }
        }
        let two = F::two();
        let five = F::from_canonical_u32(5);
        for k in (7..13).rev() {
            let high = wide[k];
            wide[k - 7] += high * five;
            wide[k - 6] += high * two;
        }
        Self(array::from_fn(|i| wide[i]))
    }
}

impl<F: Field> MulAssign for SepticExtension<F> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<F: Field> Add<F> for SepticExtension<F> {
    type Output = Self;

    fn add(mut self, rhs: F) -> Self {
        self.0[0] += rhs;
        self
    }
}

impl<F: Field> Mul<F> for SepticExtension<F> {
    type Output = Self;

    fn mul(self, rhs: F) -> Self {
        Self(self.0.map(|c| c * rhs))
    }
}

impl<F: PrimeField32> Div for SepticExtension<F> {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, rhs: Self) -> Self {
        self * rhs.inverse()
    }
}

impl<F: Field> From<F> for SepticExtension<F> {
    fn from(f: F) -> Self {
        Self::from_base(f)
    }
}

impl<F: Display> Display for SepticExtension<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let coeffs = self.0.iter().map(ToString::to_string).collect::<Vec<_>>();
        write!(f, "[{}]", coeffs.join(", "))
    }
}

/// Seven consecutive trace columns holding one extension element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct SepticBlock<T>(pub [T; 7]);

impl<T> SepticBlock<T> {
    /// Maps every column through `f`.
    pub fn map<F, U>(self, f: F) -> SepticBlock<U>
    where
        F: FnMut(T) -> U,
    {
        SepticBlock(self.0.map(f))
    }

    /// Builds a block column by column.
    pub fn from_base_fn<G: FnMut(usize) -> T>(f: G) -> Self {
        Self(array::from_fn(f))
    }
}

impl<T: Copy> SepticBlock<T> {
    /// Reads the block back as an extension element.
    pub fn as_extension(&self) -> SepticExtension<T> {
        SepticExtension(self.0)
    }
}

impl<T> From<[T; 7]> for SepticBlock<T> {
    fn from(arr: [T; 7]) -> Self {
        Self(arr)
    }
}

impl<T> From<SepticExtension<T>> for SepticBlock<T> {
    fn from(ext: SepticExtension<T>) -> Self {
        Self(ext.0)
    }
}

impl<T, I> Index<I> for SepticBlock<T>
where
    [T]: Index<I>,
{
    type Output = <[T] as Index<I>>::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(&self.0, index)
    }
}

impl<T, I> IndexMut<I> for SepticBlock<T>
where
    [T]: IndexMut<I>,
{
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(&mut self.0, index)
    }
}

impl<T> IntoIterator for SepticBlock<T> {
    type Item = T;
    type IntoIter = std::array::IntoIter<T, 7>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
