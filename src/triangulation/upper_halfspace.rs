//! 상반공간 모델과 PGL(2,C)
//!
//! 이상점은 사영 좌표 `(z1 : z2)` 로 다룬다. 무한원점은 `(1 : 0)`.
//! 쌍곡면 모델과는 에르미트 행렬 `H = [[x0 + x3, x1 + i x2], [x1 - i x2, x0 - x3]]`
//! 로 이어진다. `g` 는 `H -> g H g*` 로 작용한다.

use num::complex::Complex64;
use num::traits::{One, Zero};
use ndarray::{Array1, Array2};
use std::f64::consts::PI;
use std::ops::Mul;

/// 사영 좌표로 쓴 이상점
pub type IdealPoint = [Complex64; 2];

pub fn infinity() -> IdealPoint {
    [Complex64::one(), Complex64::zero()]
}

pub fn finite(z: Complex64) -> IdealPoint {
    [z, Complex64::one()]
}

/// 크기가 가장 큰 성분이 1 이 되도록 맞춘 이상점
pub fn normalise_ideal_point(p: IdealPoint) -> IdealPoint {
    let s = if p[0].norm() >= p[1].norm() { p[0] } else { p[1] };
    [p[0] / s, p[1] / s]
}

/// 2x2 복소 행렬 (PGL(2,C) 의 대표원)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pgl2c {
    pub m: [[Complex64; 2]; 2],
}

impl Pgl2c {
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Pgl2c { m: [[a, b], [c, d]] }
    }

    pub fn identity() -> Self {
        let (one, zero) = (Complex64::one(), Complex64::zero());
        Pgl2c::new(one, zero, zero, one)
    }

    pub fn det(&self) -> Complex64 {
        self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0]
    }

    pub fn trace(&self) -> Complex64 {
        self.m[0][0] + self.m[1][1]
    }

    /// 행렬식으로 나눈 역행렬
    pub fn inverse(&self) -> Self {
        let det = self.det();
        let [[a, b], [c, d]] = self.m;
        Pgl2c::new(d / det, -b / det, -c / det, a / det)
    }

    /// 행렬식이 1 이 되도록 나눈 대표원
    pub fn normalised(&self) -> Self {
        let s = self.det().sqrt();
        let [[a, b], [c, d]] = self.m;
        Pgl2c::new(a / s, b / s, c / s, d / s)
    }

    pub fn apply(&self, p: &IdealPoint) -> IdealPoint {
        let [[a, b], [c, d]] = self.m;
        normalise_ideal_point([a * p[0] + b * p[1], c * p[0] + d * p[1]])
    }

    /// 켤레 전치
    fn adjoint(&self) -> Self {
        let [[a, b], [c, d]] = self.m;
        Pgl2c::new(a.conj(), c.conj(), b.conj(), d.conj())
    }
}

impl Mul for Pgl2c {
    type Output = Pgl2c;

    fn mul(self, other: Pgl2c) -> Pgl2c {
        let (x, y) = (self.m, other.m);
        Pgl2c::new(
            x[0][0] * y[0][0] + x[0][1] * y[1][0],
            x[0][0] * y[0][1] + x[0][1] * y[1][1],
            x[1][0] * y[0][0] + x[1][1] * y[1][0],
            x[1][0] * y[0][1] + x[1][1] * y[1][1],
        )
    }
}

fn det2(p: &IdealPoint, q: &IdealPoint) -> Complex64 {
    p[0] * q[1] - p[1] * q[0]
}

/// 0, 1, ∞ 를 각각 `p`, `q`, `r` 로 보내는 뫼비우스 변환
pub fn matrix_taking_0_1_inf_to_given_points(
    p: &IdealPoint,
    q: &IdealPoint,
    r: &IdealPoint,
) -> Pgl2c {
    // g = [λ r | μ p], λ r + μ p = q
    let denominator = det2(r, p);
    let lambda = det2(q, p) / denominator;
    let mu = det2(r, q) / denominator;
    Pgl2c::new(lambda * r[0], mu * p[0], lambda * r[1], mu * p[1])
}

/// 세 이상점을 다른 세 이상점으로 순서대로 보내는 변환
pub fn matrix_taking_points_to_points(from: [&IdealPoint; 3], to: [&IdealPoint; 3]) -> Pgl2c {
    let m_from = matrix_taking_0_1_inf_to_given_points(from[0], from[1], from[2]);
    let m_to = matrix_taking_0_1_inf_to_given_points(to[0], to[1], to[2]);
    m_to * m_from.inverse()
}

fn hermitian_to_r13(h: &Pgl2c) -> [f64; 4] {
    let [[a, b], [_, d]] = h.m;
    [(a.re + d.re) / 2.0, b.re, b.im, (a.re - d.re) / 2.0]
}

fn r13_basis_hermitian(k: usize) -> Pgl2c {
    let (one, zero, i) = (Complex64::one(), Complex64::zero(), Complex64::i());
    match k {
        0 => Pgl2c::new(one, zero, zero, one),
        1 => Pgl2c::new(zero, one, one, zero),
        2 => Pgl2c::new(zero, i, -i, zero),
        _ => Pgl2c::new(one, zero, zero, -one),
    }
}

/// PGL(2,C) 원소에 대응하는 O(1,3) 행렬
pub fn pgl2c_to_o13(g: &Pgl2c) -> Array2<f64> {
    let g = g.normalised();
    let g_star = g.adjoint();
    let mut result = Array2::zeros((4, 4));
    for k in 0..4 {
        let column = hermitian_to_r13(&(g * r13_basis_hermitian(k) * g_star));
        for (i, x) in column.iter().enumerate() {
            result[[i, k]] = *x;
        }
    }
    result
}

/// 이상점의 빛꼴 벡터 (시간 성분이 1)
pub fn ideal_point_to_r13(p: &IdealPoint) -> Array1<f64> {
    let [z1, z2] = *p;
    let b = z1 * z2.conj();
    let (a, d) = (z1.norm_sqr(), z2.norm_sqr());
    let x0 = (a + d) / 2.0;
    Array1::from(vec![1.0, b.re / x0, b.im / x0, (a - d) / 2.0 / x0])
}

/// 허수부를 (-π, π] 로 옮긴 복소 길이
pub fn normalise_complex_length(l: Complex64) -> Complex64 {
    let mut im = l.im.rem_euclid(2.0 * PI);
    if im > PI {
        im -= 2.0 * PI;
    }
    Complex64::new(l.re, im)
}

/// SL(2,C) 원소의 대각합에서 복소 길이 `2 acosh(tr / 2)` (실수부 ≥ 0)
pub fn complex_length_from_trace(trace: Complex64) -> Complex64 {
    let l = (trace / 2.0).acosh() * 2.0;
    normalise_complex_length(if l.re < 0.0 { -l } else { l })
}

/// 록소드로믹 원소의 끌개, 밀개 고정점
pub fn fixed_points(g: &Pgl2c) -> (IdealPoint, IdealPoint) {
    let g = g.normalised();
    let [[a, b], [c, d]] = g.m;
    let t = g.trace();
    let root = (t * t - 4.0).sqrt();
    let (mut mu0, mut mu1) = ((t + root) / 2.0, (t - root) / 2.0);
    if mu0.norm() < mu1.norm() {
        std::mem::swap(&mut mu0, &mut mu1);
    }
    let eigenvector = |mu: Complex64| {
        let v0 = [b, mu - a];
        let v1 = [mu - d, c];
        let size = |v: &IdealPoint| v[0].norm() + v[1].norm();
        if size(&v0) >= size(&v1) {
            normalise_ideal_point(v0)
        } else {
            normalise_ideal_point(v1)
        }
    };
    (eigenvector(mu0), eigenvector(mu1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperboloid::{o13_inverse, r13_dot};
    use approx::assert_abs_diff_eq;

    fn sample() -> Pgl2c {
        Pgl2c::new(
            Complex64::new(1.2, 0.3),
            Complex64::new(-0.4, 1.0),
            Complex64::new(0.7, -0.2),
            Complex64::new(0.5, 0.9),
        )
    }

    #[test]
    fn test_takes_0_1_inf_to_points() {
        let p = finite(Complex64::new(0.3, 0.4));
        let q = finite(Complex64::new(-1.0, 2.0));
        let r = finite(Complex64::new(5.0, -1.0));
        let g = matrix_taking_0_1_inf_to_given_points(&p, &q, &r);
        for (from, to) in [
            (finite(Complex64::zero()), p),
            (finite(Complex64::one()), q),
            (infinity(), r),
        ] {
            let image = g.apply(&from);
            assert_abs_diff_eq!(det2(&image, &to).norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_o13_preserves_form_and_is_homomorphism() {
        let g = sample();
        let h = sample().inverse() * Pgl2c::new(
            Complex64::new(2.0, 0.0),
            Complex64::new(1.0, 1.0),
            Complex64::zero(),
            Complex64::new(0.5, 0.0),
        );
        let m = pgl2c_to_o13(&g);
        let identity = m.dot(&o13_inverse(&m));
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(identity[[i, j]], expected, epsilon = 1e-10);
            }
        }
        let product = pgl2c_to_o13(&(g * h));
        let composed = m.dot(&pgl2c_to_o13(&h));
        for i in 0..4 {
            for j in 0..4 {
                assert_abs_diff_eq!(product[[i, j]], composed[[i, j]], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_o13_moves_ideal_points_like_mobius() {
        let g = sample();
        let m = pgl2c_to_o13(&g);
        let p = finite(Complex64::new(0.25, -1.5));
        let moved = m.dot(&ideal_point_to_r13(&p));
        let expected = ideal_point_to_r13(&g.apply(&p));
        assert_abs_diff_eq!(r13_dot(&moved, &moved), 0.0, epsilon = 1e-10);
        for k in 0..4 {
            assert_abs_diff_eq!(moved[k] / moved[0], expected[k], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_complex_length_of_diagonal_matrix() {
        let l = Complex64::new(0.8, 2.5);
        let g = Pgl2c::new((l / 2.0).exp(), Complex64::zero(), Complex64::zero(), (-l / 2.0).exp());
        let computed = complex_length_from_trace(g.trace());
        assert_abs_diff_eq!(computed.re, 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(computed.im.abs(), 2.5, epsilon = 1e-12);

        let (attracting, repelling) = fixed_points(&g);
        assert!(attracting[1].norm() < 1e-12);
        assert!(repelling[0].norm() < 1e-12);
    }

    #[test]
    fn test_normalise_complex_length_wraps_rotation() {
        let l = normalise_complex_length(Complex64::new(1.0, 3.0 * PI / 2.0));
        assert_abs_diff_eq!(l.im, -PI / 2.0, epsilon = 1e-12);
    }
}
