use crate::config::constants::Constants;
use crate::error::{HyperbolicError, Result};
use crate::hyperboloid::{
    normalise_time_like, o13_identity, o13_inverse, r13_dot, scale, vector_from_f64, R13Line,
    R13LineWithMatrix,
};
use crate::numeric::Real;
use crate::tiling::LiftedTetrahedron;
use crate::triangulation::upper_halfspace::{
    complex_length_from_trace, fixed_points, ideal_point_to_r13,
};
use crate::triangulation::Mcomplex;
use ndarray::{Array1, Array2};
use num::complex::Complex64;

/// 기본군 원소 하나가 정하는 닫힌 측지선
#[derive(Clone, Debug)]
pub struct GeodesicInfo<N: Real> {
    pub word: String,
    pub trace: Complex64,
    pub complex_length: Complex64,
    /// 끌개에서 밀개로 가는 직선과 원소의 O(1,3) 행렬 (기준 좌표)
    pub line: Option<R13LineWithMatrix<N>>,
    /// 기준 사면체 내심을 직선에 사영한 점
    pub start_point: Option<Array1<N>>,
    /// 시작점을 담는 들어올린 사면체
    pub lifted_tetrahedra: Vec<LiftedTetrahedron<N>>,
}

impl<N: Real> GeodesicInfo<N> {
    /// 생성원 문자열에서 직선, 시작점, 시작 사면체를 구한다
    pub fn from_word(mcomplex: &Mcomplex<N>, word: &str) -> Result<Self> {
        let (sl2c, o13) = mcomplex.evaluate_word(word)?;
        let trace = sl2c.normalised().trace();
        let complex_length = complex_length_from_trace(trace);
        if complex_length.re < Constants::MIN_GEODESIC_LENGTH {
            return Err(HyperbolicError::NotLoxodromic {
                word: word.to_string(),
                trace: trace.to_string(),
            });
        }

        let (attracting, repelling) = fixed_points(&sl2c);
        let line = R13Line::new(
            vector_from_f64(&ideal_point_to_r13(&attracting)),
            vector_from_f64(&ideal_point_to_r13(&repelling)),
        );

        let mut info = GeodesicInfo {
            word: word.to_string(),
            trace,
            complex_length,
            line: Some(R13LineWithMatrix::new(line, o13)),
            start_point: None,
            lifted_tetrahedra: Vec::new(),
        };
        info.find_tet(mcomplex)?;
        Ok(info)
    }

    /// 면을 건너 걸으며 시작점을 담는 사면체를 찾는다
    pub fn find_tet(&mut self, mcomplex: &Mcomplex<N>) -> Result<()> {
        let Some(line) = &self.line else {
            return Err(HyperbolicError::MissingLine { word: self.word.clone() });
        };
        let point = project_to_line(&mcomplex.base_tet_in_center, &line.r13_line);

        let mut tet = 0;
        let mut matrix: Array2<N> = o13_identity();
        for _ in 0..Constants::POINT_LOCATION_MAX_STEPS {
            let tetrahedron = mcomplex.tetrahedron(tet)?;
            let local = o13_inverse(&matrix).dot(&point);
            let triangles = tetrahedron.triangles()?;

            let mut exit: Option<(usize, N)> = None;
            for (f, triangle) in triangles.iter().enumerate() {
                let p = r13_dot(&local, &triangle.plane);
                if !p.certainly_gt(N::zero()) {
                    continue;
                }
                if exit.map_or(true, |(_, best)| p.certainly_gt(best)) {
                    exit = Some((f, p));
                }
            }

            match exit {
                None => {
                    tracing::debug!(word = %self.word, tet, "located geodesic start point");
                    self.start_point = Some(point);
                    self.lifted_tetrahedra = vec![LiftedTetrahedron::new(tet, matrix)];
                    return Ok(());
                }
                Some((f, _)) => {
                    matrix = matrix.dot(&tetrahedron.o13_matrices[f]);
                    tet = tetrahedron.neighbors[f];
                }
            }
        }

        Err(HyperbolicError::PointLocation {
            word: self.word.clone(),
            steps: Constants::POINT_LOCATION_MAX_STEPS,
        })
    }
}

/// 직선 위에서 `point` 에 가장 가까운 점
pub fn project_to_line<N: Real>(point: &Array1<N>, line: &R13Line<N>) -> Array1<N> {
    let [p0, p1] = &line.points;
    let a = r13_dot(point, p1).abs();
    let b = r13_dot(point, p0).abs();
    normalise_time_like(&(scale(a, p0) + scale(b, p1)))
}
