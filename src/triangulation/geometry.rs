//! 붙임 정보와 모양 매개변수에서 쌍곡 구조를 전개한다
//!
//! 사면체 0 을 표준 위치 (∞, 0, 1, z) 에 두고 신장 트리를 따라 이웃을 붙여
//! 상반공간에 기본 영역을 만든다. 트리에 속하지 않는 면 붙임마다 기본군의
//! 생성원이 하나씩 생긴다.

use super::upper_halfspace::{
    finite, infinity, ideal_point_to_r13, matrix_taking_points_to_points, pgl2c_to_o13,
    IdealPoint, Pgl2c,
};
use super::{Corner, Generator, GluingData, Mcomplex, Tetrahedron, Vertex};
use crate::error::{HyperbolicError, Result};
use crate::hyperboloid::{matrix_from_f64, r13_dot, vector_from_f64, R13IdealTriangle};
use crate::numeric::Real;
use ndarray::{Array1, Array2};
use num::complex::Complex64;
use num::traits::{One, Zero};
use std::collections::{BTreeMap, VecDeque};

fn standard_vertices(z: Complex64) -> [IdealPoint; 4] {
    [infinity(), finite(Complex64::zero()), finite(Complex64::one()), finite(z)]
}

fn validate(data: &GluingData) -> Result<()> {
    let n = data.num_tetrahedra();
    if n == 0 {
        return Err(HyperbolicError::InvalidGluing("no tetrahedra".into()));
    }
    if data.gluings.len() != n || data.shapes.len() != n {
        return Err(HyperbolicError::InvalidGluing(format!(
            "{n} tetrahedra but {} gluings and {} shapes",
            data.gluings.len(),
            data.shapes.len()
        )));
    }
    for (i, shape) in data.shapes.iter().enumerate() {
        if !(shape.im > 0.0) {
            return Err(HyperbolicError::InvalidGluing(format!(
                "tetrahedron {i} has non-positive shape {shape}"
            )));
        }
    }
    for i in 0..n {
        for f in 0..4 {
            let j = data.neighbors[i][f];
            if j >= n {
                return Err(HyperbolicError::TetrahedronIndex { index: j, count: n });
            }
            let perm = data.gluings[i][f];
            let g = perm.image(f);
            if data.neighbors[j][g] != i || data.gluings[j][g] != perm.inverse() {
                return Err(HyperbolicError::InvalidGluing(format!(
                    "face {f} of tetrahedron {i} and face {g} of tetrahedron {j} disagree"
                )));
            }
        }
    }
    Ok(())
}

/// 꼭짓점 동치류. 첫 모서리 순서대로 번호를 매긴다
fn find_cusps(data: &GluingData) -> Vec<Vec<Corner>> {
    let n = data.num_tetrahedra();
    let mut cusp_of = vec![[usize::MAX; 4]; n];
    let mut cusps = Vec::new();
    for start_tet in 0..n {
        for start_vertex in 0..4 {
            if cusp_of[start_tet][start_vertex] != usize::MAX {
                continue;
            }
            let index = cusps.len();
            let mut corners = Vec::new();
            let mut stack = vec![(start_tet, start_vertex)];
            cusp_of[start_tet][start_vertex] = index;
            while let Some((tet, vertex)) = stack.pop() {
                corners.push(Corner { tet, vertex });
                for f in (0..4).filter(|&f| f != vertex) {
                    let other = data.neighbors[tet][f];
                    let other_vertex = data.gluings[tet][f].image(vertex);
                    if cusp_of[other][other_vertex] == usize::MAX {
                        cusp_of[other][other_vertex] = index;
                        stack.push((other, other_vertex));
                    }
                }
            }
            corners.sort_by_key(|c| (c.tet, c.vertex));
            cusps.push(corners);
        }
    }
    cusps
}

/// 면 `(i, f)` 건너편 이웃의 꼭짓점 `σ(k)` 를 이 사면체의 꼭짓점 `k` 로 보내는 변환
fn face_pairing(data: &GluingData, placed: &[[IdealPoint; 4]], i: usize, f: usize) -> Pgl2c {
    let j = data.neighbors[i][f];
    let perm = data.gluings[i][f];
    let [a, b, c] = Tetrahedron::<f64>::face_vertices(f);
    let (own, other) = (&placed[i], &placed[j]);
    matrix_taking_points_to_points(
        [&other[perm.image(a)], &other[perm.image(b)], &other[perm.image(c)]],
        [&own[a], &own[b], &own[c]],
    )
    .normalised()
}

struct Development {
    ideal_vertices: Vec<[IdealPoint; 4]>,
    face_pairings: Vec<[Pgl2c; 4]>,
    generators: Vec<(char, usize, usize)>,
}

fn develop(data: &GluingData) -> Result<Development> {
    let n = data.num_tetrahedra();
    let mut placed: Vec<Option<[IdealPoint; 4]>> = vec![None; n];
    let mut tree = vec![[false; 4]; n];
    placed[0] = Some(standard_vertices(data.shapes[0]));

    let mut queue = VecDeque::from([0]);
    while let Some(i) = queue.pop_front() {
        let Some(own) = placed[i] else { continue };
        for f in 0..4 {
            let j = data.neighbors[i][f];
            if placed[j].is_some() {
                continue;
            }
            let perm = data.gluings[i][f];
            let standard = standard_vertices(data.shapes[j]);
            let [a, b, c] = Tetrahedron::<f64>::face_vertices(f);
            let m = matrix_taking_points_to_points(
                [&standard[perm.image(a)], &standard[perm.image(b)], &standard[perm.image(c)]],
                [&own[a], &own[b], &own[c]],
            );
            placed[j] = Some(standard.map(|p| m.apply(&p)));
            tree[i][f] = true;
            tree[j][perm.image(f)] = true;
            queue.push_back(j);
        }
    }

    let placed: Vec<[IdealPoint; 4]> = placed
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            p.ok_or_else(|| {
                HyperbolicError::InvalidGluing(format!("tetrahedron {i} is not connected"))
            })
        })
        .collect::<Result<_>>()?;

    let mut face_pairings = vec![[Pgl2c::identity(); 4]; n];
    let mut assigned = vec![[false; 4]; n];
    let mut generators = Vec::new();
    for i in 0..n {
        for f in 0..4 {
            if tree[i][f] || assigned[i][f] {
                continue;
            }
            let letter = char::from_u32('a' as u32 + generators.len() as u32)
                .filter(|c| c.is_ascii_lowercase())
                .ok_or_else(|| HyperbolicError::InvalidGluing("more than 26 generators".into()))?;
            let pairing = face_pairing(data, &placed, i, f);
            let j = data.neighbors[i][f];
            let g = data.gluings[i][f].image(f);
            face_pairings[i][f] = pairing;
            face_pairings[j][g] = pairing.inverse();
            assigned[i][f] = true;
            assigned[j][g] = true;
            generators.push((letter, i, f));
        }
    }

    Ok(Development {
        ideal_vertices: placed,
        face_pairings,
        generators,
    })
}

/// 4x4 연립방정식 (부분 피벗 가우스 소거)
fn solve4(mut a: [[f64; 4]; 4], mut b: [f64; 4]) -> Option<[f64; 4]> {
    for col in 0..4 {
        let pivot = (col..4).max_by(|&r, &s| a[r][col].abs().total_cmp(&a[s][col].abs()))?;
        if a[pivot][col].abs() < 1e-300 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..4 {
            let factor = a[row][col] / a[col][col];
            for k in col..4 {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = [0.0; 4];
    for row in (0..4).rev() {
        let tail: f64 = (row + 1..4).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

/// 바깥쪽 단위 법선 네 개로 둘러싸인 사면체의 내심과 내접구 반지름
fn in_center(planes: &[Array1<f64>; 4]) -> Result<(Array1<f64>, f64)> {
    // <y, n_f> = -1 을 모든 면에 대해 푼다
    let rows = [0, 1, 2, 3].map(|f| {
        let n = &planes[f];
        [-n[0], n[1], n[2], n[3]]
    });
    let y = solve4(rows, [-1.0; 4])
        .map(|x| Array1::from(x.to_vec()))
        .ok_or_else(|| HyperbolicError::InvalidGluing("degenerate base tetrahedron".into()))?;
    let norm = (-r13_dot(&y, &y)).sqrt();
    if !(norm > 0.0) {
        return Err(HyperbolicError::InvalidGluing("degenerate base tetrahedron".into()));
    }
    let center = y.mapv(|x| x / norm);
    Ok((center, (1.0 / norm).asinh()))
}

impl<N: Real> Mcomplex<N> {
    /// 완비 쌍곡 구조를 전개해 삼각분할을 만든다
    pub fn from_gluing_data(data: &GluingData) -> Result<Self> {
        validate(data)?;
        let development = develop(data)?;

        let r13_vertices: Vec<[Array1<f64>; 4]> = development
            .ideal_vertices
            .iter()
            .map(|vertices| vertices.map(|p| ideal_point_to_r13(&p)))
            .collect();

        let tetrahedra: Vec<Tetrahedron<N>> = (0..data.num_tetrahedra())
            .map(|i| Tetrahedron {
                index: i,
                neighbors: data.neighbors[i],
                gluings: data.gluings[i],
                shape: data.shapes[i],
                ideal_vertices: development.ideal_vertices[i],
                r13_vertices: r13_vertices[i].clone().map(|v| vector_from_f64(&v)),
                o13_matrices: [0, 1, 2, 3].map(|f| {
                    let m: Array2<f64> = pgl2c_to_o13(&development.face_pairings[i][f]);
                    matrix_from_f64(&m)
                }),
                triangles: None,
                core_curves: BTreeMap::new(),
            })
            .collect();

        let generators = development
            .generators
            .iter()
            .map(|&(letter, tet, face)| {
                let sl2c = development.face_pairings[tet][face];
                let generator = Generator {
                    letter,
                    face: (tet, face),
                    sl2c,
                    o13: matrix_from_f64(&pgl2c_to_o13(&sl2c)),
                };
                (letter, generator)
            })
            .collect();

        let vertices = find_cusps(data)
            .into_iter()
            .enumerate()
            .map(|(index, corners)| Vertex {
                index,
                corners,
                filling: None,
            })
            .collect();

        let base_planes: [Array1<f64>; 4] = {
            let v = &r13_vertices[0];
            [0, 1, 2, 3].map(|f| {
                let [a, b, c] = Tetrahedron::<f64>::face_vertices(f);
                R13IdealTriangle::from_vertices([&v[a], &v[b], &v[c]], &v[f]).plane
            })
        };
        let (center, radius) = in_center(&base_planes)?;

        let mut mcomplex = Mcomplex {
            tetrahedra,
            vertices,
            generators,
            base_tet_in_center: vector_from_f64(&center),
            base_tet_in_radius: N::from_f64(radius),
        };
        mcomplex.add_triangles_to_tetrahedra();

        tracing::debug!(
            tetrahedra = mcomplex.num_tetrahedra(),
            cusps = mcomplex.vertices.len(),
            generators = mcomplex.generators.len(),
            "developed triangulation"
        );

        Ok(mcomplex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::census;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_m004_has_one_cusp_with_eight_corners() {
        let m: Mcomplex<f64> = Mcomplex::from_gluing_data(&census::m004()).unwrap();
        assert_eq!(m.vertices.len(), 1);
        assert_eq!(m.vertices[0].corners.len(), 8);
        assert_eq!(m.generators.len(), 3);
    }

    #[test]
    fn test_face_pairings_match_vertices() {
        let m: Mcomplex<f64> = Mcomplex::from_gluing_data(&census::m004()).unwrap();
        for tet in &m.tetrahedra {
            for f in 0..4 {
                let other = &m.tetrahedra[tet.neighbors[f]];
                let perm = tet.gluings[f];
                for k in Tetrahedron::<f64>::face_vertices(f) {
                    let image = tet.o13_matrices[f].dot(&other.r13_vertices[perm.image(k)]);
                    let target = &tet.r13_vertices[k];
                    for c in 0..4 {
                        assert_abs_diff_eq!(
                            image[c] / image[0],
                            target[c] / target[0],
                            epsilon = 1e-9
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_in_center_is_equidistant_from_faces() {
        let m: Mcomplex<f64> = Mcomplex::from_gluing_data(&census::m004()).unwrap();
        let triangles = m.tetrahedra[0].triangles().unwrap();
        let center = &m.base_tet_in_center;
        assert_abs_diff_eq!(r13_dot(center, center), -1.0, epsilon = 1e-12);
        for triangle in triangles {
            let d = r13_dot(center, &triangle.plane);
            assert!(d < 0.0);
            assert_abs_diff_eq!((-d).asinh(), m.base_tet_in_radius, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rejects_inconsistent_gluing() {
        let mut data = census::m004();
        data.neighbors[0][0] = 0;
        assert!(Mcomplex::<f64>::from_gluing_data(&data).is_err());
    }

    #[test]
    fn test_solve4() {
        let a = [
            [2.0, 1.0, 0.0, 0.0],
            [1.0, 3.0, 1.0, 0.0],
            [0.0, 1.0, 4.0, 1.0],
            [0.0, 0.0, 1.0, 5.0],
        ];
        let x = solve4(a, [1.0, 2.0, 3.0, 4.0]).unwrap();
        for r in 0..4 {
            let lhs: f64 = (0..4).map(|k| a[r][k] * x[k]).sum();
            assert_abs_diff_eq!(lhs, [1.0, 2.0, 3.0, 4.0][r], epsilon = 1e-12);
        }
    }
}
