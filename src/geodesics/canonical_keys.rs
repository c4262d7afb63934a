use crate::config::constants::Constants;
use crate::hyperboloid::{o13_inverse, r13_dot, R13LineWithMatrix};
use crate::numeric::Real;
use crate::tiling::CanonicalKeys;
use ndarray::{Array1, Array2};

/// 측지선 방향 평행이동 `g` 로 점을 기본 영역 하나로 모은다
///
/// 직선의 끝점 `p0` (끌개), `p1` (밀개) 에 대해
/// `t(x) = ln(<x, p1> / <x, p0>) / (2 ln μ)` 는 `t(g x) = t(x) + 1` 을 만족한다.
/// `t ∈ [0, 1)` 인 대표점으로 옮기고, 경계 가까이면 건너편 대표점도 돌려준다.
#[derive(Clone, Debug)]
pub struct LineCanonicalKeys<N: Real> {
    line: R13LineWithMatrix<N>,
    inverse_matrix: Array2<N>,
    /// `2 ln μ`. `μ` 는 `p0` 에 대한 고윳값
    period: f64,
}

impl<N: Real> LineCanonicalKeys<N> {
    pub fn new(line: R13LineWithMatrix<N>) -> Self {
        let [p0, p1] = &line.r13_line.points;
        let mu = (r13_dot(&line.o13_matrix.dot(p0), p1) / line.r13_line.inner_product).center();
        let inverse_matrix = o13_inverse(&line.o13_matrix);
        LineCanonicalKeys {
            line,
            inverse_matrix,
            period: 2.0 * mu.ln(),
        }
    }

    /// 직선 방향 좌표. 정수만큼 차이 나는 점은 `g` 의 거듭제곱으로 옮겨진다
    pub fn coordinate(&self, point: &Array1<N>) -> f64 {
        let [p0, p1] = &self.line.r13_line.points;
        let ratio = (r13_dot(point, p1) / r13_dot(point, p0)).center();
        ratio.ln() / self.period
    }

    fn translate(&self, point: &Array1<N>, power: i64) -> Array1<N> {
        let matrix = if power >= 0 {
            &self.line.o13_matrix
        } else {
            &self.inverse_matrix
        };
        let mut result = point.clone();
        for _ in 0..power.unsigned_abs() {
            result = matrix.dot(&result);
        }
        result
    }
}

impl<N: Real> CanonicalKeys<N> for LineCanonicalKeys<N> {
    fn representatives(&self, point: &Array1<N>) -> Vec<Array1<N>> {
        let t = self.coordinate(point);
        let floor = t.floor();
        let frac = t - floor;
        let representative = self.translate(point, -(floor as i64));

        let mut result = vec![representative];
        if frac < Constants::CANONICAL_KEY_BOUNDARY {
            result.push(self.translate(&result[0], 1));
        } else if frac > 1.0 - Constants::CANONICAL_KEY_BOUNDARY {
            result.push(self.translate(&result[0], -1));
        }
        result
    }
}

/// 측지선 타일의 중복 제거에 쓰는 대표점 함수
pub fn canonical_keys_function_for_line<N: Real>(
    line: &R13LineWithMatrix<N>,
) -> Box<dyn CanonicalKeys<N>> {
    Box::new(LineCanonicalKeys::new(line.clone()))
}
