//! 수치 기반 트레이트
//!
//! 같은 기하 공식을 부동소수점(`f64`)과 검증된 구간 산술(`Interval`) 위에서
//! 돌리기 위한 추상화. 어느 쪽을 쓸지는 최상위 호출에서 타입 매개변수로 한 번
//! 정하고 아래로 그대로 전달한다.

mod interval;

pub use interval::Interval;

use num::traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// 실수 또는 실수 구간
pub trait Real:
    Copy
    + Debug
    + Send
    + Sync
    + 'static
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// 구간 산술이면 true
    const VERIFIED: bool;

    /// 유효 비트 수
    const PRECISION_BITS: u32;

    fn from_f64(x: f64) -> Self;

    /// 중심값 (구간이면 중점)
    fn center(self) -> f64;

    /// 하한
    fn lower(self) -> f64;

    /// 상한
    fn upper(self) -> f64;

    fn sqrt(self) -> Self;
    fn ln(self) -> Self;
    fn asinh(self) -> Self;
    fn acosh(self) -> Self;
    fn cosh(self) -> Self;
    fn abs(self) -> Self;

    /// 두 값의 최솟값. 구간이면 양 끝점별 최솟값
    fn min(self, other: Self) -> Self;

    /// 확실히 `self > other` 인지
    fn certainly_gt(self, other: Self) -> bool;

    /// 확실히 `self < other` 인지
    fn certainly_lt(self, other: Self) -> bool {
        other.certainly_gt(self)
    }

    /// 정확히 0 인지 (구간이면 [0, 0])
    fn is_exactly_zero(self) -> bool;

    /// `[bound, ∞)` 와의 교집합. 부동소수점이면 `max(self, bound)`
    fn clip_below(self, bound: f64) -> Self;
}

impl Real for f64 {
    const VERIFIED: bool = false;
    const PRECISION_BITS: u32 = f64::MANTISSA_DIGITS;

    #[inline]
    fn from_f64(x: f64) -> Self {
        x
    }

    #[inline]
    fn center(self) -> f64 {
        self
    }

    #[inline]
    fn lower(self) -> f64 {
        self
    }

    #[inline]
    fn upper(self) -> f64 {
        self
    }

    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    #[inline]
    fn ln(self) -> Self {
        f64::ln(self)
    }

    #[inline]
    fn asinh(self) -> Self {
        f64::asinh(self)
    }

    #[inline]
    fn acosh(self) -> Self {
        f64::acosh(self)
    }

    #[inline]
    fn cosh(self) -> Self {
        f64::cosh(self)
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn min(self, other: Self) -> Self {
        f64::min(self, other)
    }

    #[inline]
    fn certainly_gt(self, other: Self) -> bool {
        self > other
    }

    #[inline]
    fn is_exactly_zero(self) -> bool {
        self == 0.0
    }

    #[inline]
    fn clip_below(self, bound: f64) -> Self {
        f64::max(self, bound)
    }
}
