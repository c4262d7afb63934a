//! 이상 삼각분할과 그 쌍곡 구조
//!
//! 사면체의 면 `f` 는 꼭짓점 `f` 의 맞은편 면이다. `gluings[f]` 는 사면체의
//! 꼭짓점을 이웃 사면체의 꼭짓점으로 보내는 순열이고, 면 `f` 는 이웃의 면
//! `gluings[f].image(f)` 에 붙는다.

pub mod census;
mod geometry;
pub mod upper_halfspace;

use crate::error::{HyperbolicError, Result};
use crate::hyperboloid::{o13_identity, o13_inverse, R13IdealTriangle, R13Line};
use crate::numeric::Real;
use ndarray::{Array1, Array2};
use num::complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use upper_halfspace::{IdealPoint, Pgl2c};

/// {0, 1, 2, 3} 의 순열
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Perm4([usize; 4]);

impl Perm4 {
    pub fn new(images: [usize; 4]) -> Result<Self> {
        let mut seen = [false; 4];
        for &i in &images {
            if i > 3 || seen[i] {
                return Err(HyperbolicError::InvalidGluing(format!(
                    "{images:?} is not a permutation"
                )));
            }
            seen[i] = true;
        }
        Ok(Perm4(images))
    }

    pub fn identity() -> Self {
        Perm4([0, 1, 2, 3])
    }

    pub fn image(&self, i: usize) -> usize {
        self.0[i]
    }

    pub fn inverse(&self) -> Self {
        let mut images = [0; 4];
        for (i, &j) in self.0.iter().enumerate() {
            images[j] = i;
        }
        Perm4(images)
    }

    /// 홀순열이면 true
    pub fn is_odd(&self) -> bool {
        let mut inversions = 0;
        for i in 0..4 {
            for j in i + 1..4 {
                if self.0[i] > self.0[j] {
                    inversions += 1;
                }
            }
        }
        inversions % 2 == 1
    }
}

impl TryFrom<&str> for Perm4 {
    type Error = HyperbolicError;

    /// SnapPea 표기 "0132"
    fn try_from(s: &str) -> Result<Self> {
        let digits: Vec<usize> = s
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as usize))
            .collect::<Option<_>>()
            .ok_or_else(|| HyperbolicError::InvalidGluing(format!("bad permutation {s:?}")))?;
        let images: [usize; 4] = digits
            .try_into()
            .map_err(|_| HyperbolicError::InvalidGluing(format!("bad permutation {s:?}")))?;
        Perm4::new(images)
    }
}

impl TryFrom<String> for Perm4 {
    type Error = HyperbolicError;

    fn try_from(s: String) -> Result<Self> {
        Perm4::try_from(s.as_str())
    }
}

impl From<Perm4> for String {
    fn from(p: Perm4) -> String {
        p.to_string()
    }
}

impl fmt::Display for Perm4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in self.0 {
            write!(f, "{i}")?;
        }
        Ok(())
    }
}

/// 사면체 붙임 정보와 모양 매개변수
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GluingData {
    pub neighbors: Vec<[usize; 4]>,
    pub gluings: Vec<[Perm4; 4]>,
    /// 모서리 01 의 모양 매개변수
    pub shapes: Vec<Complex64>,
}

impl GluingData {
    pub fn num_tetrahedra(&self) -> usize {
        self.neighbors.len()
    }
}

/// 사면체의 한 꼭짓점
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corner {
    pub tet: usize,
    pub vertex: usize,
}

/// 커스프 (꼭짓점 동치류)
#[derive(Clone, Debug)]
pub struct Vertex {
    pub index: usize,
    pub corners: Vec<Corner>,
    /// 데흔 채움 계수. `None` 이면 완비
    pub filling: Option<(f64, f64)>,
}

impl Vertex {
    pub fn is_complete(&self) -> bool {
        self.filling.is_none()
    }
}

/// 기본군의 생성원
#[derive(Clone, Debug)]
pub struct Generator<N: Real> {
    pub letter: char,
    /// 생성원이 되는 면 붙임 `(사면체, 면)`
    pub face: (usize, usize),
    pub sl2c: Pgl2c,
    pub o13: Array2<N>,
}

#[derive(Clone, Debug)]
pub struct Tetrahedron<N: Real> {
    pub index: usize,
    pub neighbors: [usize; 4],
    pub gluings: [Perm4; 4],
    pub shape: Complex64,
    /// 상반공간에서 전개한 꼭짓점
    pub ideal_vertices: [IdealPoint; 4],
    /// 꼭짓점의 빛꼴 벡터
    pub r13_vertices: [Array1<N>; 4],
    /// 면 `f` 건너편 이웃의 좌표를 이 사면체의 좌표로 보내는 행렬
    pub o13_matrices: [Array2<N>; 4],
    pub triangles: Option<[R13IdealTriangle<N>; 4]>,
    /// 채워진 커스프 번호별 코어 곡선 (이 사면체 좌표)
    pub core_curves: BTreeMap<usize, R13Line<N>>,
}

impl<N: Real> Tetrahedron<N> {
    /// 면 `f` 를 이루는 세 꼭짓점 (오름차순)
    pub fn face_vertices(f: usize) -> [usize; 3] {
        let mut result = [0; 3];
        let mut k = 0;
        for v in 0..4 {
            if v != f {
                result[k] = v;
                k += 1;
            }
        }
        result
    }

    pub fn triangles(&self) -> Result<&[R13IdealTriangle<N>; 4]> {
        self.triangles
            .as_ref()
            .ok_or(HyperbolicError::MissingTriangles { tet: self.index })
    }
}

/// 쌍곡 구조를 가진 삼각분할
#[derive(Clone, Debug)]
pub struct Mcomplex<N: Real> {
    pub tetrahedra: Vec<Tetrahedron<N>>,
    pub vertices: Vec<Vertex>,
    pub generators: BTreeMap<char, Generator<N>>,
    /// 사면체 0 의 내심과 내접구 반지름
    pub base_tet_in_center: Array1<N>,
    pub base_tet_in_radius: N,
}

impl<N: Real> Mcomplex<N> {
    pub fn verified(&self) -> bool {
        N::VERIFIED
    }

    pub fn num_tetrahedra(&self) -> usize {
        self.tetrahedra.len()
    }

    pub fn tetrahedron(&self, index: usize) -> Result<&Tetrahedron<N>> {
        self.tetrahedra.get(index).ok_or(HyperbolicError::TetrahedronIndex {
            index,
            count: self.tetrahedra.len(),
        })
    }

    /// 각 사면체의 네 면에 이상 삼각형을 붙인다
    pub fn add_triangles_to_tetrahedra(&mut self) {
        for tet in &mut self.tetrahedra {
            let v = &tet.r13_vertices;
            tet.triangles = Some([0, 1, 2, 3].map(|f| {
                let [a, b, c] = Tetrahedron::<N>::face_vertices(f);
                R13IdealTriangle::from_vertices([&v[a], &v[b], &v[c]], &v[f])
            }));
        }
    }

    /// 생성원 문자열을 SL(2,C) 와 O(1,3) 행렬로 바꾼다. 대문자는 역원
    pub fn evaluate_word(&self, word: &str) -> Result<(Pgl2c, Array2<N>)> {
        let mut sl2c = Pgl2c::identity();
        let mut o13 = o13_identity::<N>();
        for letter in word.chars() {
            let generator = self
                .generators
                .get(&letter.to_ascii_lowercase())
                .ok_or_else(|| HyperbolicError::UnknownGenerator {
                    word: word.to_string(),
                    letter,
                })?;
            if letter.is_ascii_uppercase() {
                sl2c = sl2c * generator.sl2c.inverse();
                o13 = o13.dot(&o13_inverse(&generator.o13));
            } else {
                sl2c = sl2c * generator.sl2c;
                o13 = o13.dot(&generator.o13);
            }
        }
        Ok((sl2c, o13))
    }

    /// 커스프를 데흔 채움으로 표시한다
    pub fn set_filling(&mut self, cusp: usize, coefficients: (f64, f64)) -> Result<()> {
        let count = self.vertices.len();
        let vertex = self
            .vertices
            .get_mut(cusp)
            .ok_or(HyperbolicError::CuspIndex { index: cusp, count })?;
        vertex.filling = Some(coefficients);
        Ok(())
    }

    /// 채워진 커스프의 코어 곡선을 사면체 좌표로 붙인다
    pub fn add_core_curve(&mut self, cusp: usize, tet: usize, line: R13Line<N>) -> Result<()> {
        let count = self.tetrahedra.len();
        let tetrahedron = self
            .tetrahedra
            .get_mut(tet)
            .ok_or(HyperbolicError::TetrahedronIndex { index: tet, count })?;
        tetrahedron.core_curves.insert(cusp, line);
        Ok(())
    }
}
