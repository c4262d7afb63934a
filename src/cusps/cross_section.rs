//! 커스프 단면
//!
//! 커스프마다 꼭짓점 호로볼을 면 붙임과 맞게 고르면, 호로볼과 사면체의 교집합이
//! 단면 위의 유클리드 삼각형(호로삼각형)이 된다.

use crate::error::{HyperbolicError, Result};
use crate::hyperboloid::{r13_dot, R13IdealTriangle};
use crate::numeric::Real;
use crate::triangulation::{Corner, Mcomplex, Tetrahedron};
use ndarray::{Array1, Array2};

/// 커스프 단면이 내주는 값들
pub trait CuspCrossSection {
    /// 커스프별 단면 넓이
    fn cusp_areas(&self) -> Vec<f64>;

    /// 단면을 이만큼까지 키워도 모든 사면체와 세 면에서만 만난다
    fn scale_for_std_form(&self, cusp: usize) -> f64;

    /// 커스프 `i`, `j` 를 잇는 모서리를 따라 잰 호로볼 거리의 exp 의 최솟값.
    /// 잇는 모서리가 없으면 `None`
    fn exp_distance_neighborhoods_measured_along_edges(&self, i: usize, j: usize) -> Option<f64>;

    /// 사면체 `tet` 의 꼭짓점 `vertex` 에 있는 호로삼각형에서 면 `face` 위의 변 길이
    fn horotriangle_edge_length(&self, tet: usize, vertex: usize, face: usize) -> f64;
}

/// 쌍곡면 모델의 호로볼 벡터로 계산하는 커스프 단면
///
/// 커스프마다 첫 호로삼각형의 첫 변 길이가 1 이 되게 잡는다.
#[derive(Clone, Debug)]
pub struct HoroballCrossSection {
    vertices: Vec<[Array1<f64>; 4]>,
    horoballs: Vec<[Array1<f64>; 4]>,
    face_planes: Vec<[Array1<f64>; 4]>,
    cusp_of_corner: Vec<[usize; 4]>,
    num_cusps: usize,
}

/// 꼭짓점 `v` 와 면 `f` 를 뺀 나머지 두 꼭짓점
fn edge_ends(v: usize, f: usize) -> (usize, usize) {
    let mut others = (0..4).filter(|&k| k != v && k != f);
    let a = others.next().unwrap_or(0);
    let b = others.next().unwrap_or(0);
    (a, b)
}

fn horosphere_length(h: &Array1<f64>, a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    (-2.0 * r13_dot(a, b) / (r13_dot(h, a) * r13_dot(h, b))).sqrt()
}

impl HoroballCrossSection {
    pub fn new<N: Real>(mcomplex: &Mcomplex<N>) -> Result<Self> {
        if let Some(v) = mcomplex.vertices.iter().find(|v| !v.is_complete()) {
            return Err(HyperbolicError::IncompleteCusp { cusp: v.index });
        }

        let vertices: Vec<[Array1<f64>; 4]> = mcomplex
            .tetrahedra
            .iter()
            .map(|tet| tet.r13_vertices.clone().map(|v| v.mapv(|x| x.center())))
            .collect();
        let face_planes = vertices
            .iter()
            .map(|v| {
                [0, 1, 2, 3].map(|f| {
                    let [a, b, c] = Tetrahedron::<f64>::face_vertices(f);
                    R13IdealTriangle::from_vertices([&v[a], &v[b], &v[c]], &v[f]).plane
                })
            })
            .collect();

        let n = mcomplex.num_tetrahedra();
        let mut cusp_of_corner = vec![[0; 4]; n];
        for vertex in &mcomplex.vertices {
            for corner in &vertex.corners {
                cusp_of_corner[corner.tet][corner.vertex] = vertex.index;
            }
        }

        let mut scales: Vec<[Option<f64>; 4]> = vec![[None; 4]; n];
        for vertex in &mcomplex.vertices {
            let Some(first) = vertex.corners.first() else {
                continue;
            };
            scales[first.tet][first.vertex] = Some(1.0);
            let mut stack = vec![*first];
            while let Some(corner) = stack.pop() {
                let (i, v) = (corner.tet, corner.vertex);
                let s_i = scales[i][v].unwrap_or(1.0);
                let tet = &mcomplex.tetrahedra[i];
                for f in (0..4).filter(|&f| f != v) {
                    let j = tet.neighbors[f];
                    let w = tet.gluings[f].image(v);
                    if scales[j][w].is_some() {
                        continue;
                    }
                    // O13[f] · V_j[w] = λ V_i[v]
                    let moved = tet.o13_matrices[f].mapv(|x| x.center()).dot(&vertices[j][w]);
                    let lambda = moved[0] / vertices[i][v][0];
                    scales[j][w] = Some(s_i / lambda);
                    stack.push(Corner { tet: j, vertex: w });
                }
            }
        }

        let horoballs = vertices
            .iter()
            .zip(&scales)
            .map(|(v, s)| [0, 1, 2, 3].map(|k| v[k].mapv(|x| x * s[k].unwrap_or(1.0))))
            .collect();

        let mut cross_section = HoroballCrossSection {
            vertices,
            horoballs,
            face_planes,
            cusp_of_corner,
            num_cusps: mcomplex.vertices.len(),
        };

        for vertex in &mcomplex.vertices {
            if let Some(first) = vertex.corners.first() {
                let face = (0..4).find(|&f| f != first.vertex).unwrap_or(0);
                let length = cross_section.horotriangle_edge_length(first.tet, first.vertex, face);
                cross_section.scale_cusp(vertex.index, 1.0 / length);
            }
        }

        tracing::debug!(areas = ?cross_section.cusp_areas(), "cusp cross section");
        Ok(cross_section)
    }

    pub fn num_cusps(&self) -> usize {
        self.num_cusps
    }

    /// 커스프 단면을 `factor` 배로 늘린다 (넓이는 제곱배)
    pub fn scale_cusp(&mut self, cusp: usize, factor: f64) {
        for (tet, cusps) in self.cusp_of_corner.iter().enumerate() {
            for (v, &c) in cusps.iter().enumerate() {
                if c == cusp {
                    self.horoballs[tet][v] = self.horoballs[tet][v].mapv(|x| x / factor);
                }
            }
        }
    }

    /// 모든 커스프를 표준형 경계까지 줄인다. `allow_scaling_up` 이면 키우기도 한다
    pub fn ensure_std_form(&mut self, allow_scaling_up: bool) {
        for cusp in 0..self.num_cusps {
            let scale = self.scale_for_std_form(cusp);
            if scale < 1.0 || allow_scaling_up {
                self.scale_cusp(cusp, scale);
            }
        }
    }

    /// 꼭짓점별 호로볼 벡터
    pub fn horoball(&self, tet: usize, vertex: usize) -> &Array1<f64> {
        &self.horoballs[tet][vertex]
    }

    fn corners(&self, cusp: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cusp_of_corner.iter().enumerate().flat_map(move |(tet, cusps)| {
            cusps
                .iter()
                .enumerate()
                .filter(move |&(_, &c)| c == cusp)
                .map(move |(v, _)| (tet, v))
        })
    }

    fn horotriangle_area(&self, tet: usize, vertex: usize) -> f64 {
        let sides: Vec<f64> = (0..4)
            .filter(|&f| f != vertex)
            .map(|f| self.horotriangle_edge_length(tet, vertex, f))
            .collect();
        let (a, b, c) = (sides[0], sides[1], sides[2]);
        let s = (a + b + c) / 2.0;
        (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt()
    }
}

impl CuspCrossSection for HoroballCrossSection {
    fn cusp_areas(&self) -> Vec<f64> {
        (0..self.num_cusps)
            .map(|cusp| {
                self.corners(cusp)
                    .map(|(tet, v)| self.horotriangle_area(tet, v))
                    .sum()
            })
            .collect()
    }

    fn scale_for_std_form(&self, cusp: usize) -> f64 {
        self.corners(cusp)
            .map(|(tet, v)| r13_dot(&self.horoballs[tet][v], &self.face_planes[tet][v]).abs())
            .fold(f64::INFINITY, f64::min)
    }

    fn exp_distance_neighborhoods_measured_along_edges(&self, i: usize, j: usize) -> Option<f64> {
        let mut result: Option<f64> = None;
        for (tet, cusps) in self.cusp_of_corner.iter().enumerate() {
            for a in 0..4 {
                for b in a + 1..4 {
                    let ends = (cusps[a], cusps[b]);
                    if ends != (i, j) && ends != (j, i) {
                        continue;
                    }
                    let p = -r13_dot(&self.horoballs[tet][a], &self.horoballs[tet][b]) / 2.0;
                    result = Some(result.map_or(p, |r| r.min(p)));
                }
            }
        }
        result
    }

    fn horotriangle_edge_length(&self, tet: usize, vertex: usize, face: usize) -> f64 {
        let (a, b) = edge_ends(vertex, face);
        let v = &self.vertices[tet];
        horosphere_length(&self.horoballs[tet][vertex], &v[a], &v[b])
    }
}

/// 커스프 넓이 행렬 (삼각분할에 따라 달라지는 상계)
///
/// 모든 커스프를 표준형 경계에 맞춘 뒤 `(i, j)` 성분은
/// `area_i · area_j · min(1, exp_distance(i, j))²`.
pub fn triangulation_dependent_cusp_area_matrix<N: Real>(
    mcomplex: &Mcomplex<N>,
) -> Result<Array2<f64>> {
    let mut cross_section = HoroballCrossSection::new(mcomplex)?;
    cross_section.ensure_std_form(true);

    let areas = cross_section.cusp_areas();
    let n = areas.len();
    Ok(Array2::from_shape_fn((n, n), |(i, j)| {
        let mut result = areas[i] * areas[j];
        if let Some(e) = cross_section.exp_distance_neighborhoods_measured_along_edges(i, j) {
            result *= e.min(1.0).powi(2);
        }
        result
    }))
}
