//! 바깥쪽 반올림 구간 산술
//!
//! 끝점은 `f64`. 사칙연산과 sqrt 는 IEEE 에서 정확히 반올림되므로 한 ulp,
//! 초월함수는 libm 오차를 감안해 몇 ulp 씩 바깥으로 넓힌다.

use super::Real;
use num::traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// 초월함수 결과를 넓히는 ulp 수
const TRANSCENDENTAL_ULPS: u32 = 4;

/// 닫힌 구간 `[lo, hi]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

#[inline]
fn down(x: f64) -> f64 {
    if x.is_finite() {
        x.next_down()
    } else {
        x
    }
}

#[inline]
fn up(x: f64) -> f64 {
    if x.is_finite() {
        x.next_up()
    } else {
        x
    }
}

fn down_by(mut x: f64, ulps: u32) -> f64 {
    for _ in 0..ulps {
        x = down(x);
    }
    x
}

fn up_by(mut x: f64, ulps: u32) -> f64 {
    for _ in 0..ulps {
        x = up(x);
    }
    x
}

/// 0 * inf 를 0 으로 취급하는 곱
#[inline]
fn product(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else {
        a * b
    }
}

impl Interval {
    pub fn new(lo: f64, hi: f64) -> Self {
        debug_assert!(!(lo > hi), "빈 구간: [{lo}, {hi}]");
        Interval { lo, hi }
    }

    /// 한 점으로 이루어진 구간
    pub fn point(x: f64) -> Self {
        Interval { lo: x, hi: x }
    }

    /// 실수 전체
    pub fn entire() -> Self {
        Interval {
            lo: f64::NEG_INFINITY,
            hi: f64::INFINITY,
        }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn contains(&self, x: f64) -> bool {
        self.lo <= x && x <= self.hi
    }

    pub fn contains_zero(&self) -> bool {
        self.contains(0.0)
    }

    /// 단조 증가 함수를 끝점에 적용
    fn map_increasing(self, f: impl Fn(f64) -> f64) -> Self {
        Interval {
            lo: down_by(f(self.lo), TRANSCENDENTAL_ULPS),
            hi: up_by(f(self.hi), TRANSCENDENTAL_ULPS),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, other: Interval) -> Interval {
        Interval {
            lo: down(self.lo + other.lo),
            hi: up(self.hi + other.hi),
        }
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, other: Interval) -> Interval {
        Interval {
            lo: down(self.lo - other.hi),
            hi: up(self.hi - other.lo),
        }
    }
}

impl Mul for Interval {
    type Output = Interval;

    fn mul(self, other: Interval) -> Interval {
        let candidates = [
            product(self.lo, other.lo),
            product(self.lo, other.hi),
            product(self.hi, other.lo),
            product(self.hi, other.hi),
        ];
        let lo = candidates.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = candidates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Interval {
            lo: down(lo),
            hi: up(hi),
        }
    }
}

impl Div for Interval {
    type Output = Interval;

    fn div(self, other: Interval) -> Interval {
        if other.contains_zero() {
            return Interval::entire();
        }
        let candidates = [
            self.lo / other.lo,
            self.lo / other.hi,
            self.hi / other.lo,
            self.hi / other.hi,
        ];
        let lo = candidates.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = candidates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Interval {
            lo: down(lo),
            hi: up(hi),
        }
    }
}

impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        Interval {
            lo: -self.hi,
            hi: -self.lo,
        }
    }
}

impl Zero for Interval {
    fn zero() -> Self {
        Interval::point(0.0)
    }

    fn is_zero(&self) -> bool {
        self.lo == 0.0 && self.hi == 0.0
    }
}

impl One for Interval {
    fn one() -> Self {
        Interval::point(1.0)
    }
}

impl Real for Interval {
    const VERIFIED: bool = true;
    const PRECISION_BITS: u32 = f64::MANTISSA_DIGITS;

    fn from_f64(x: f64) -> Self {
        Interval::point(x)
    }

    fn center(self) -> f64 {
        match (self.lo.is_finite(), self.hi.is_finite()) {
            (true, true) => 0.5 * (self.lo + self.hi),
            (true, false) => self.hi,
            (false, true) => self.lo,
            (false, false) => {
                if self.lo == self.hi {
                    self.lo
                } else {
                    0.0
                }
            }
        }
    }

    fn lower(self) -> f64 {
        self.lo
    }

    fn upper(self) -> f64 {
        self.hi
    }

    /// 음수 부분은 버린다. 구간 전체가 음수이면 NaN
    fn sqrt(self) -> Self {
        if self.hi < 0.0 {
            return Interval::point(f64::NAN);
        }
        Interval {
            lo: down(self.lo.max(0.0).sqrt()).max(0.0),
            hi: up(self.hi.sqrt()),
        }
    }

    fn ln(self) -> Self {
        let lo = if self.lo <= 0.0 {
            f64::NEG_INFINITY
        } else {
            down_by(self.lo.ln(), TRANSCENDENTAL_ULPS)
        };
        Interval {
            lo,
            hi: up_by(self.hi.ln(), TRANSCENDENTAL_ULPS),
        }
    }

    fn asinh(self) -> Self {
        self.map_increasing(f64::asinh)
    }

    fn acosh(self) -> Self {
        let clipped = self.clip_below(1.0);
        let mut result = clipped.map_increasing(f64::acosh);
        result.lo = result.lo.max(0.0);
        result
    }

    fn cosh(self) -> Self {
        let (lo, hi) = if self.lo >= 0.0 {
            (self.lo, self.hi)
        } else if self.hi <= 0.0 {
            (-self.hi, -self.lo)
        } else {
            (0.0, self.hi.max(-self.lo))
        };
        Interval {
            lo: down_by(lo.cosh(), TRANSCENDENTAL_ULPS).max(1.0),
            hi: up_by(hi.cosh(), TRANSCENDENTAL_ULPS),
        }
    }

    fn abs(self) -> Self {
        if self.lo >= 0.0 {
            self
        } else if self.hi <= 0.0 {
            -self
        } else {
            Interval {
                lo: 0.0,
                hi: self.hi.max(-self.lo),
            }
        }
    }

    fn min(self, other: Self) -> Self {
        Interval {
            lo: self.lo.min(other.lo),
            hi: self.hi.min(other.hi),
        }
    }

    fn certainly_gt(self, other: Self) -> bool {
        self.lo > other.hi
    }

    fn is_exactly_zero(self) -> bool {
        self.lo == 0.0 && self.hi == 0.0
    }

    fn clip_below(self, bound: f64) -> Self {
        Interval {
            lo: self.lo.max(bound),
            hi: self.hi.max(bound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_encloses_exact_result() {
        let third = Interval::point(1.0) / Interval::point(3.0);
        assert!(third.lo() < third.hi());
        let one = third * Interval::point(3.0);
        assert!(one.contains(1.0));

        let tenth = Interval::point(0.1);
        let sum = tenth + tenth + tenth;
        assert!(sum.lo() <= 0.30000000000000004 && sum.hi() >= 0.3);
    }

    #[test]
    fn test_certain_comparisons() {
        let a = Interval::new(1.0, 2.0);
        let b = Interval::new(1.5, 3.0);
        assert!(!a.certainly_gt(b));
        assert!(!a.certainly_lt(b));
        assert!(Interval::point(4.0).certainly_gt(b));
        assert!(a.certainly_lt(Interval::point(2.5)));
    }

    #[test]
    fn test_division_by_zero_interval_is_entire() {
        let q = Interval::point(1.0) / Interval::new(-1.0, 1.0);
        assert_eq!(q.lo(), f64::NEG_INFINITY);
        assert_eq!(q.hi(), f64::INFINITY);
    }

    #[test]
    fn test_mul_with_signs() {
        let p = Interval::new(-2.0, 1.0) * Interval::new(-3.0, 4.0);
        assert!(p.lo() <= -8.0 && p.hi() >= 6.0);
        assert!(p.lo() > -8.0001 && p.hi() < 6.0001);
    }

    #[test]
    fn test_functions_enclose_values() {
        let x = Interval::point(2.0);
        assert!(x.sqrt().contains(2f64.sqrt()));
        assert!(x.ln().contains(2f64.ln()));
        assert!(x.asinh().contains(2f64.asinh()));
        assert!(x.acosh().contains(2f64.acosh()));
        assert!(Interval::new(-1.0, 0.5).cosh().contains(1.0));
        assert!(Interval::new(-1.0, 0.5).cosh().contains(1f64.cosh()));
    }

    #[test]
    fn test_log_of_interval_touching_zero() {
        let l = Interval::new(0.0, 1.0).ln();
        assert_eq!(l.lo(), f64::NEG_INFINITY);
        assert!(l.hi() >= 0.0);
    }

    #[test]
    fn test_clip_and_abs() {
        let c = Interval::new(-0.5, 2.0).clip_below(0.0);
        assert_eq!(c.lo(), 0.0);
        assert_eq!(c.hi(), 2.0);
        let a = Interval::new(-3.0, 2.0).abs();
        assert_eq!(a.lo(), 0.0);
        assert_eq!(a.hi(), 3.0);
        assert!(Interval::zero().is_exactly_zero());
        assert!(!Interval::new(0.0, 1e-300).is_exactly_zero());
    }
}
