use crate::hyperboloid::o13_identity;
use crate::numeric::Real;
use ndarray::Array2;

/// 범피복 공간에 놓인 사면체 하나: 사면체 번호와 그 좌표를 옮기는 O(1,3) 행렬
#[derive(Clone, Debug)]
pub struct LiftedTetrahedron<N: Real> {
    pub tet: usize,
    pub o13_matrix: Array2<N>,
}

impl<N: Real> LiftedTetrahedron<N> {
    pub fn new(tet: usize, o13_matrix: Array2<N>) -> Self {
        LiftedTetrahedron { tet, o13_matrix }
    }

    /// 항등 들어올림
    pub fn identity(tet: usize) -> Self {
        LiftedTetrahedron::new(tet, o13_identity())
    }
}
