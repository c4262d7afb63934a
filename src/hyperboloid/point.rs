use crate::numeric::Real;
use ndarray::{Array1, Array2};

/// 쌍곡 공간의 점 (`<x, x> = -1` 인 시간꼴 벡터)
#[derive(Clone, Debug)]
pub struct R13Point<N: Real> {
    pub point: Array1<N>,
}

impl<N: Real> R13Point<N> {
    pub fn new(point: Array1<N>) -> Self {
        R13Point { point }
    }

    pub fn transformed(&self, m: &Array2<N>) -> Self {
        R13Point {
            point: m.dot(&self.point),
        }
    }
}
