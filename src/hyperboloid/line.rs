use super::{o13_inverse, r13_dot};
use crate::numeric::Real;
use ndarray::{Array1, Array2};

/// 두 끝점(빛꼴 벡터)이 정하는 측지선
///
/// `inner_product` 는 두 끝점의 내적. 끝점의 크기를 바꾸면 함께 바뀐다.
#[derive(Clone, Debug)]
pub struct R13Line<N: Real> {
    pub points: [Array1<N>; 2],
    pub inner_product: N,
}

impl<N: Real> R13Line<N> {
    pub fn new(p0: Array1<N>, p1: Array1<N>) -> Self {
        let inner_product = r13_dot(&p0, &p1);
        R13Line {
            points: [p0, p1],
            inner_product,
        }
    }

    /// 등거리 변환은 내적을 보존하므로 캐시된 값을 그대로 쓴다
    pub fn transformed(&self, m: &Array2<N>) -> Self {
        R13Line {
            points: [m.dot(&self.points[0]), m.dot(&self.points[1])],
            inner_product: self.inner_product,
        }
    }
}

/// 측지선과 그 위를 평행이동하는 O(1,3) 행렬
#[derive(Clone, Debug)]
pub struct R13LineWithMatrix<N: Real> {
    pub r13_line: R13Line<N>,
    pub o13_matrix: Array2<N>,
}

impl<N: Real> R13LineWithMatrix<N> {
    pub fn new(r13_line: R13Line<N>, o13_matrix: Array2<N>) -> Self {
        R13LineWithMatrix {
            r13_line,
            o13_matrix,
        }
    }

    /// `m` 으로 옮긴 측지선. 행렬은 켤레 `m A m^-1`
    pub fn transformed(&self, m: &Array2<N>) -> Self {
        R13LineWithMatrix {
            r13_line: self.r13_line.transformed(m),
            o13_matrix: m.dot(&self.o13_matrix).dot(&o13_inverse(m)),
        }
    }
}
