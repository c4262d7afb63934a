//! 수치 계산 유틸리티 함수들
//!
//! 수학적으로 음이 아닌 양(예: 광원뿔 안 두 벡터의 내적에 -1 을 곱한 값)이
//! 부동소수점 오차로 살짝 음수가 되는 경우를 위한 안전 함수. 구간 산술에서는
//! 증명된 정의역과의 교집합을 취한다.

use crate::config::constants::Constants;
use crate::numeric::Real;

/// 음이 아님이 알려진 값의 제곱근
pub fn safe_sqrt<N: Real>(p: N) -> N {
    if N::VERIFIED {
        return p.clip_below(0.0).sqrt();
    }
    if p.certainly_lt(N::zero()) {
        return N::zero();
    }
    p.sqrt()
}

/// 음이 아님이 알려진 값의 로그. 부동소수점에서 0 이하이면 `LOG_SENTINEL`
pub fn safe_log<N: Real>(p: N) -> N {
    if N::VERIFIED {
        return p.clip_below(0.0).ln();
    }
    if !p.certainly_gt(N::zero()) {
        return N::from_f64(Constants::LOG_SENTINEL);
    }
    p.ln()
}

/// 음이 아닌 값의 로그. 정확히 0 이면 -∞ (부동소수점은 `LOG_SENTINEL`)
pub fn safe_log_non_neg<N: Real>(p: N) -> N {
    if p.is_exactly_zero() {
        if N::VERIFIED {
            return N::from_f64(f64::NEG_INFINITY);
        }
        return N::from_f64(Constants::LOG_SENTINEL);
    }
    p.ln()
}

/// 1 이상임이 알려진 값의 arccosh
pub fn safe_arccosh<N: Real>(p: N) -> N {
    if N::VERIFIED {
        return p.clip_below(1.0).acosh();
    }
    if p.certainly_lt(N::one()) {
        return N::zero();
    }
    p.acosh()
}

/// 삼각형 경계 판정에 쓰는 허용 오차: 검증 모드 0, 아니면 `0.5^(prec/2 - offset)`
pub fn compute_epsilon<N: Real>(bits_offset: u32) -> N {
    if N::VERIFIED {
        return N::zero();
    }
    let exponent = (N::PRECISION_BITS / 2).saturating_sub(bits_offset);
    N::from_f64(0.5f64.powi(exponent as i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::Interval;

    #[test]
    fn test_safe_sqrt_clamps_negative_float() {
        assert_eq!(safe_sqrt(-1e-17), 0.0);
        assert_eq!(safe_sqrt(4.0), 2.0);
    }

    #[test]
    fn test_safe_sqrt_intersects_interval() {
        let r = safe_sqrt(Interval::new(-1e-17, 4.0));
        assert_eq!(r.lo(), 0.0);
        assert!(r.contains(2.0));
    }

    #[test]
    fn test_safe_log_sentinel() {
        assert_eq!(safe_log(0.0), Constants::LOG_SENTINEL);
        assert_eq!(safe_log(-3.0), Constants::LOG_SENTINEL);
        assert!((safe_log(std::f64::consts::E) - 1.0).abs() < 1e-15);
        assert_eq!(safe_log(Interval::new(-1.0, 1.0)).lo(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_safe_log_non_neg_at_zero() {
        assert_eq!(safe_log_non_neg(0.0), Constants::LOG_SENTINEL);
        assert_eq!(
            safe_log_non_neg(Interval::point(0.0)).hi(),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn test_safe_arccosh_below_one() {
        assert_eq!(safe_arccosh(1.0 - 1e-15), 0.0);
        let r = safe_arccosh(Interval::new(0.9, 1.0));
        assert_eq!(r.lo(), 0.0);
        assert!(r.hi() >= 0.0 && r.hi() < 1e-10);
    }

    #[test]
    fn test_epsilon_by_mode() {
        assert_eq!(compute_epsilon::<f64>(0), 0.5f64.powi(26));
        assert_eq!(compute_epsilon::<f64>(8), 0.5f64.powi(18));
        assert!(compute_epsilon::<Interval>(0).is_exactly_zero());
    }
}
