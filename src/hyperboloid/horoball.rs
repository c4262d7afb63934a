use crate::numeric::Real;
use ndarray::{Array1, Array2};

/// 빛꼴 벡터 하나로 정해지는 호로볼
///
/// 벡터의 방향이 중심(이상점), 크기가 반지름을 정한다. 벡터가 클수록 호로볼은 작다.
#[derive(Clone, Debug)]
pub struct R13Horoball<N: Real> {
    pub defining_vec: Array1<N>,
}

impl<N: Real> R13Horoball<N> {
    pub fn new(defining_vec: Array1<N>) -> Self {
        R13Horoball { defining_vec }
    }

    pub fn transformed(&self, m: &Array2<N>) -> Self {
        R13Horoball {
            defining_vec: m.dot(&self.defining_vec),
        }
    }
}
