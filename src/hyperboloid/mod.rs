//! 쌍곡면 모델 (R^{1,3}) 기본 연산
//!
//! 로렌츠 내적은 `<u, v> = -u0 v0 + u1 v1 + u2 v2 + u3 v3`.
//! 점(시간꼴)은 `<x, x> = -1`, 이상점(빛꼴)은 0, 평면(공간꼴)은 `+1`.
//! 벡터의 종류는 호출하는 쪽이 보장한다.

pub mod distances;
mod horoball;
mod line;
mod point;
mod triangle;

pub use horoball::R13Horoball;
pub use line::{R13Line, R13LineWithMatrix};
pub use point::R13Point;
pub use triangle::R13IdealTriangle;

use crate::numeric::Real;
use ndarray::{Array1, Array2};

/// R^{1,3} 의 벡터
pub type R13Vector<N> = Array1<N>;

/// O(1,3) 의 원소
pub type O13Matrix<N> = Array2<N>;

/// 로렌츠 내적
#[inline]
pub fn r13_dot<N: Real>(u: &Array1<N>, v: &Array1<N>) -> N {
    debug_assert_eq!(u.len(), 4);
    debug_assert_eq!(v.len(), 4);
    -(u[0] * v[0]) + u[1] * v[1] + u[2] * v[2] + u[3] * v[3]
}

/// 스칼라 곱 (ndarray 의 스칼라 연산은 기본 타입에만 열려 있다)
#[inline]
pub fn scale<N: Real>(s: N, v: &Array1<N>) -> Array1<N> {
    v.mapv(|x| s * x)
}

fn det3<N: Real>(m: [[N; 3]; 3]) -> N {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// 세 벡터에 로렌츠 직교하는 벡터 `w`: 모든 `x` 에 대해 `<w, x> = det[a; b; c; x]`
pub fn r13_cross<N: Real>(a: &Array1<N>, b: &Array1<N>, c: &Array1<N>) -> Array1<N> {
    let minor = |k: usize| {
        let mut m = [[N::zero(); 3]; 3];
        for (row, v) in [a, b, c].iter().enumerate() {
            let mut col = 0;
            for j in 0..4 {
                if j != k {
                    m[row][col] = v[j];
                    col += 1;
                }
            }
        }
        det3(m)
    };
    // e_k = (-1)^{k+1} minor_k, w = J e
    Array1::from(vec![minor(0), minor(1), -minor(2), minor(3)])
}

/// 공간꼴 벡터를 `<v, v> = 1` 로 정규화
pub fn normalise_space_like<N: Real>(v: &Array1<N>) -> Array1<N> {
    let norm = r13_dot(v, v).sqrt();
    v.mapv(|x| x / norm)
}

/// 시간꼴 벡터를 `<v, v> = -1` 로 정규화
pub fn normalise_time_like<N: Real>(v: &Array1<N>) -> Array1<N> {
    let norm = (-r13_dot(v, v)).sqrt();
    v.mapv(|x| x / norm)
}

/// O(1,3) 원소의 역행렬 `J m^T J`
pub fn o13_inverse<N: Real>(m: &Array2<N>) -> Array2<N> {
    Array2::from_shape_fn((4, 4), |(i, j)| {
        let entry = m[[j, i]];
        if (i == 0) != (j == 0) {
            -entry
        } else {
            entry
        }
    })
}

/// 4x4 단위행렬
pub fn o13_identity<N: Real>() -> Array2<N> {
    Array2::from_shape_fn((4, 4), |(i, j)| if i == j { N::one() } else { N::zero() })
}

/// f64 행렬을 수치 타입으로 옮긴다
pub fn matrix_from_f64<N: Real>(m: &Array2<f64>) -> Array2<N> {
    m.mapv(N::from_f64)
}

/// f64 벡터를 수치 타입으로 옮긴다
pub fn vector_from_f64<N: Real>(v: &Array1<f64>) -> Array1<N> {
    v.mapv(N::from_f64)
}

/// 열에 대한 로렌츠 그람-슈미트. 첫 열은 시간꼴, 나머지는 공간꼴이 된다
pub fn o13_orthonormalise<N: Real>(m: &Array2<N>) -> Array2<N> {
    let mut basis: Vec<Array1<N>> = Vec::with_capacity(4);
    for j in 0..4 {
        let mut v = m.column(j).to_owned();
        for (k, e) in basis.iter().enumerate() {
            let coefficient = r13_dot(&v, e);
            // <e0, e0> = -1 이므로 첫 기저에 대해서는 부호가 반대
            let projection = if k == 0 { -coefficient } else { coefficient };
            v = &v - &scale(projection, e);
        }
        let v = if j == 0 {
            normalise_time_like(&v)
        } else {
            normalise_space_like(&v)
        };
        basis.push(v);
    }
    Array2::from_shape_fn((4, 4), |(i, j)| basis[j][i])
}

/// 타일링 대상이 되는 기하 객체. 삼각형 거리 분기의 유일한 닫힌 집합
#[derive(Clone, Debug)]
pub enum GeometricObject<N: Real> {
    Horoball(R13Horoball<N>),
    Line(R13Line<N>),
    Point(R13Point<N>),
}

impl<N: Real> GeometricObject<N> {
    /// 행렬 `m` 으로 옮긴 객체
    pub fn transformed(&self, m: &Array2<N>) -> Self {
        match self {
            GeometricObject::Horoball(h) => GeometricObject::Horoball(h.transformed(m)),
            GeometricObject::Line(l) => GeometricObject::Line(l.transformed(m)),
            GeometricObject::Point(p) => GeometricObject::Point(p.transformed(m)),
        }
    }

    pub fn as_line(&self) -> Option<&R13Line<N>> {
        match self {
            GeometricObject::Line(l) => Some(l),
            _ => None,
        }
    }
}
