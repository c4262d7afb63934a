use super::{normalise_space_like, r13_cross, r13_dot, R13Line};
use crate::numeric::Real;
use ndarray::Array1;

/// 이상 삼각형 (사면체의 한 면)
///
/// `bounding_planes[k]` 는 `edges[k]` 를 지나고 면에 수직인 평면. 삼각형 쪽이
/// 음의 반공간이 되도록 방향을 잡는다.
#[derive(Clone, Debug)]
pub struct R13IdealTriangle<N: Real> {
    /// 면을 포함하는 평면의 단위 법선 (사면체 바깥쪽)
    pub plane: Array1<N>,
    pub bounding_planes: [Array1<N>; 3],
    pub edges: [R13Line<N>; 3],
}

/// `inside` 가 음의 쪽에 오도록 부호를 맞춘 단위 평면
fn oriented_plane<N: Real>(normal: Array1<N>, inside: &Array1<N>) -> Array1<N> {
    let plane = normalise_space_like(&normal);
    if r13_dot(&plane, inside).center() > 0.0 {
        plane.mapv(|x| -x)
    } else {
        plane
    }
}

impl<N: Real> R13IdealTriangle<N> {
    /// 면의 세 꼭짓점과 맞은편 꼭짓점에서 삼각형을 만든다
    pub fn from_vertices(vertices: [&Array1<N>; 3], opposite: &Array1<N>) -> Self {
        let plane = oriented_plane(r13_cross(vertices[0], vertices[1], vertices[2]), opposite);

        let edge_ends = [(1, 2, 0), (2, 0, 1), (0, 1, 2)];
        let bounding_planes = edge_ends.map(|(a, b, c)| {
            oriented_plane(r13_cross(vertices[a], vertices[b], &plane), vertices[c])
        });
        let edges =
            edge_ends.map(|(a, b, _)| R13Line::new(vertices[a].clone(), vertices[b].clone()));

        R13IdealTriangle {
            plane,
            bounding_planes,
            edges,
        }
    }
}
