//! 쌍곡면 모델에서의 거리와 거리 하한
//!
//! 모든 함수는 `f64` 와 `Interval` 위에서 똑같이 돈다. 구간이면 결과는 참값을
//! 포함하고, `lower_bound_*` 함수의 결과는 참 거리 이하임이 보장된다.

use super::{r13_dot, scale, GeometricObject, R13IdealTriangle, R13Line};
use crate::numeric::Real;
use crate::utils::numeric::{
    compute_epsilon, safe_arccosh, safe_log, safe_log_non_neg, safe_sqrt,
};
use ndarray::Array1;

/// 두 측지선 사이의 거리
pub fn distance_r13_lines<N: Real>(line0: &R13Line<N>, line1: &R13Line<N>) -> N {
    let p00 = r13_dot(&line0.points[0], &line1.points[0]);
    let p01 = r13_dot(&line0.points[0], &line1.points[1]);
    let p10 = r13_dot(&line0.points[1], &line1.points[0]);
    let p11 = r13_dot(&line0.points[1], &line1.points[1]);

    let pp = line0.inner_product * line1.inner_product;

    let t0 = safe_sqrt((p00 * p11) / pp);
    let t1 = safe_sqrt((p01 * p10) / pp);

    let two = N::from_f64(2.0);
    let p = (t0 + t1 - N::one()) / two;

    two * safe_sqrt(p).asinh()
}

/// 두 호로볼 사이의 부호 있는 거리 (겹치면 음수)
pub fn distance_r13_horoballs<N: Real>(
    horoball_defining_vec0: &Array1<N>,
    horoball_defining_vec1: &Array1<N>,
) -> N {
    let p = -r13_dot(horoball_defining_vec0, horoball_defining_vec1) / N::from_f64(2.0);
    safe_log(p)
}

/// 호로볼(빛꼴 벡터)과 측지선 사이의 부호 있는 거리
pub fn distance_r13_horoball_line<N: Real>(
    horoball_defining_vec: &Array1<N>,
    line: &R13Line<N>,
) -> N {
    let p = r13_dot(&line.points[0], horoball_defining_vec)
        * r13_dot(&line.points[1], horoball_defining_vec);
    let s = -(N::from_f64(2.0) * p) / line.inner_product;

    safe_log(s) / N::from_f64(2.0)
}

/// 호로볼(빛꼴 벡터)과 평면(공간꼴 단위 벡터) 사이의 부호 있는 거리
pub fn distance_r13_horoball_plane<N: Real>(
    horoball_defining_vec: &Array1<N>,
    plane_defining_vec: &Array1<N>,
) -> N {
    let p = r13_dot(horoball_defining_vec, plane_defining_vec);
    safe_log_non_neg(p.abs())
}

/// 점(시간꼴 단위 벡터)과 측지선 사이의 거리
pub fn distance_r13_point_line<N: Real>(pt: &Array1<N>, line: &R13Line<N>) -> N {
    let p = r13_dot(&line.points[0], pt) * r13_dot(&line.points[1], pt);
    let s = -(N::from_f64(2.0) * p) / line.inner_product;
    safe_arccosh(safe_sqrt(s))
}

/// 점(시간꼴 단위 벡터)과 평면(공간꼴 단위 벡터) 사이의 거리
pub fn distance_r13_point_plane<N: Real>(pt: &Array1<N>, plane_defining_vec: &Array1<N>) -> N {
    r13_dot(pt, plane_defining_vec).asinh().abs()
}

/// 기하 객체와 이상 삼각형 사이 거리의 하한
///
/// 객체 종류에 따른 분기는 여기 한 곳에서만 일어난다.
pub fn lower_bound_distance_to_r13_triangle<N: Real>(
    geometric_object: &GeometricObject<N>,
    triangle: &R13IdealTriangle<N>,
) -> N {
    match geometric_object {
        GeometricObject::Horoball(horoball) => {
            lower_bound_distance_r13_horoball_triangle(&horoball.defining_vec, triangle)
        }
        GeometricObject::Line(line) => lower_bound_distance_r13_line_triangle(line, triangle),
        GeometricObject::Point(point) => {
            lower_bound_distance_r13_point_triangle(&point.point, triangle)
        }
    }
}

pub fn lower_bound_distance_r13_horoball_triangle<N: Real>(
    horoball_defining_vec: &Array1<N>,
    triangle: &R13IdealTriangle<N>,
) -> N {
    let epsilon = compute_epsilon::<N>(0);

    for (bounding_plane, edge) in triangle.bounding_planes.iter().zip(&triangle.edges) {
        if r13_dot(horoball_defining_vec, bounding_plane).certainly_gt(epsilon) {
            return distance_r13_horoball_line(horoball_defining_vec, edge);
        }
    }

    distance_r13_horoball_plane(horoball_defining_vec, &triangle.plane)
}

pub fn lower_bound_distance_r13_line_triangle<N: Real>(
    line: &R13Line<N>,
    triangle: &R13IdealTriangle<N>,
) -> N {
    let epsilon = compute_epsilon::<N>(0);

    let a0 = r13_dot(&triangle.plane, &line.points[0]);
    let a1 = r13_dot(&triangle.plane, &line.points[1]);

    // 직선이 면의 평면과 만나는 점 (만나지 않으면 평면에 가장 가까운 점 쪽)
    let pt = &scale(a1.abs(), &line.points[0]) + &scale(a0.abs(), &line.points[1]);

    for (bounding_plane, edge) in triangle.bounding_planes.iter().zip(&triangle.edges) {
        if r13_dot(&pt, bounding_plane).certainly_gt(epsilon) {
            return distance_r13_lines(line, edge);
        }
    }

    let p = a0 * a1;
    if p.certainly_gt(N::zero()) {
        return (-(N::from_f64(2.0) * p) / line.inner_product).sqrt().asinh();
    }

    N::zero()
}

pub fn lower_bound_distance_r13_point_triangle<N: Real>(
    point: &Array1<N>,
    triangle: &R13IdealTriangle<N>,
) -> N {
    let epsilon = compute_epsilon::<N>(0);

    for (bounding_plane, edge) in triangle.bounding_planes.iter().zip(&triangle.edges) {
        if r13_dot(point, bounding_plane).certainly_gt(epsilon) {
            return distance_r13_point_line(point, edge);
        }
    }

    distance_r13_point_plane(point, &triangle.plane)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperboloid::{R13Horoball, R13Point};
    use crate::numeric::Interval;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use proptest::prelude::*;

    /// 단위 3-벡터 `d` 방향의 이상점
    fn ideal(d: [f64; 3]) -> Array1<f64> {
        let n = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
        array![1.0, d[0] / n, d[1] / n, d[2] / n]
    }

    /// 원점에서 `t` 만큼 떨어진 x 축 위의 점
    fn point_on_x_axis(t: f64) -> Array1<f64> {
        array![t.cosh(), t.sinh(), 0.0, 0.0]
    }

    fn sample_triangle() -> R13IdealTriangle<f64> {
        let v0 = ideal([1.0, 0.0, 0.0]);
        let v1 = ideal([-0.5, 0.75f64.sqrt(), 0.0]);
        let v2 = ideal([-0.5, -(0.75f64.sqrt()), 0.0]);
        let opposite = ideal([0.0, 0.0, 1.0]);
        R13IdealTriangle::from_vertices([&v0, &v1, &v2], &opposite)
    }

    #[test]
    fn test_point_line_distance_of_axis() {
        // z 축과 x 축 위의 점 사이 거리는 그 점의 원점 거리
        let line = R13Line::new(ideal([0.0, 0.0, 1.0]), ideal([0.0, 0.0, -1.0]));
        let d = distance_r13_point_line(&point_on_x_axis(0.8), &line);
        assert_abs_diff_eq!(d, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_point_plane_distance() {
        let plane = array![0.0, 1.0, 0.0, 0.0];
        let d = distance_r13_point_plane(&point_on_x_axis(-1.3), &plane);
        assert_abs_diff_eq!(d, 1.3, epsilon = 1e-12);
    }

    #[test]
    fn test_line_distance_of_perpendicular_lines() {
        // 원점을 지나는 z 축과, x 축 위 거리 t 인 점에서 y 방향으로 가는 직선
        let t: f64 = 0.6;
        let (c, s) = (t.cosh(), t.sinh());
        let boost = array![
            [c, s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0]
        ];
        let axis = R13Line::new(ideal([0.0, 0.0, 1.0]), ideal([0.0, 0.0, -1.0]));
        let other =
            R13Line::new(ideal([0.0, 1.0, 0.0]), ideal([0.0, -1.0, 0.0])).transformed(&boost);
        assert_abs_diff_eq!(distance_r13_lines(&axis, &other), t, epsilon = 1e-10);
    }

    #[test]
    fn test_horoball_distances() {
        // 중심이 평면 위에 있으면 거리는 -∞ (부동소수점에서는 sentinel)
        let h = array![1.0, 1.0, 0.0, 0.0];
        let plane = array![0.0, 0.0, 1.0, 0.0];
        assert!(distance_r13_horoball_plane(&h, &plane) <= -1e19);

        let line = R13Line::new(ideal([0.0, 0.0, 1.0]), ideal([0.0, 0.0, -1.0]));
        // 원점을 지나는 호로볼과 원점을 지나는 직선: 거리는 0
        assert_abs_diff_eq!(distance_r13_horoball_line(&h, &line), 0.0, epsilon = 1e-12);

        // 서로 반대쪽에서 원점에 닿는 두 호로볼
        let g = array![1.0, -1.0, 0.0, 0.0];
        assert_abs_diff_eq!(distance_r13_horoballs(&h, &g), 0.0, epsilon = 1e-12);
        // 벡터를 키우면 호로볼이 작아져 거리가 늘어난다
        let far = g.mapv(|x| x * std::f64::consts::E);
        assert_abs_diff_eq!(distance_r13_horoballs(&h, &far), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_point_inside_triangle_uses_plane() {
        let triangle = sample_triangle();
        let pt = array![(0.5f64).cosh(), 0.0, 0.0, (0.5f64).sinh()];
        let object = GeometricObject::Point(R13Point::new(pt.clone()));
        let d = lower_bound_distance_to_r13_triangle(&object, &triangle);
        assert_eq!(d, distance_r13_point_plane(&pt, &triangle.plane));
        assert_abs_diff_eq!(d, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_point_outside_edge_uses_edge() {
        let triangle = sample_triangle();
        // 꼭짓점 v0 의 반대쪽 (-x 방향) 으로 멀리 있는 점은 edges[0] 밖에 있다
        let pt = point_on_x_axis(-2.0);
        assert!(r13_dot(&pt, &triangle.bounding_planes[0]) > 1e-3);
        let object = GeometricObject::Point(R13Point::new(pt.clone()));
        let d = lower_bound_distance_to_r13_triangle(&object, &triangle);
        assert_eq!(d, distance_r13_point_line(&pt, &triangle.edges[0]));
    }

    #[test]
    fn test_horoball_triangle_dispatch() {
        let triangle = sample_triangle();
        let h = array![1.0, -1.0, 0.0, 0.0].mapv(|x| x * 5.0);
        let object = GeometricObject::Horoball(R13Horoball::new(h.clone()));
        let d = lower_bound_distance_to_r13_triangle(&object, &triangle);
        assert_eq!(d, distance_r13_horoball_line(&h, &triangle.edges[0]));
    }

    #[test]
    fn test_line_crossing_triangle_has_zero_distance() {
        let triangle = sample_triangle();
        let line = R13Line::new(ideal([0.0, 0.0, 1.0]), ideal([0.0, 0.0, -1.0]));
        let d = lower_bound_distance_to_r13_triangle(&GeometricObject::Line(line), &triangle);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_interval_encloses_float_distance() {
        let to_interval = |v: &Array1<f64>| v.mapv(Interval::point);
        let line = R13Line::new(ideal([0.0, 0.0, 1.0]), ideal([0.0, 0.0, -1.0]));
        let pt = point_on_x_axis(0.8);
        let float = distance_r13_point_line(&pt, &line);
        let interval_line =
            R13Line::new(to_interval(&line.points[0]), to_interval(&line.points[1]));
        let verified = distance_r13_point_line(&to_interval(&pt), &interval_line);
        assert!(verified.contains(float));
        assert!(verified.width() < 1e-10);
    }

    fn arbitrary_ideal() -> impl Strategy<Value = Array1<f64>> {
        (-1.0f64..1.0, 0.0f64..std::f64::consts::TAU).prop_map(|(z, phi)| {
            let r = (1.0 - z * z).sqrt();
            ideal([r * phi.cos(), r * phi.sin(), z])
        })
    }

    fn arbitrary_line() -> impl Strategy<Value = R13Line<f64>> {
        (arbitrary_ideal(), arbitrary_ideal(), 0.2f64..5.0, 0.2f64..5.0)
            .prop_filter("끝점이 구별되어야 한다", |(a, b, _, _)| r13_dot(a, b) < -1e-3)
            .prop_map(|(a, b, sa, sb)| R13Line::new(a.mapv(|x| x * sa), b.mapv(|x| x * sb)))
    }

    proptest! {
        #[test]
        fn test_line_distance_is_symmetric(l0 in arbitrary_line(), l1 in arbitrary_line()) {
            let d01 = distance_r13_lines(&l0, &l1);
            let d10 = distance_r13_lines(&l1, &l0);
            prop_assert!((d01 - d10).abs() <= 1e-9 * (1.0 + d01.abs()));
        }

        #[test]
        fn test_distances_are_non_negative(
            l0 in arbitrary_line(),
            l1 in arbitrary_line(),
            t in -3.0f64..3.0,
        ) {
            prop_assert!(distance_r13_lines(&l0, &l1) >= 0.0);
            let pt = point_on_x_axis(t);
            prop_assert!(distance_r13_point_line(&pt, &l0) >= 0.0);
            prop_assert!(distance_r13_point_plane(&pt, &array![0.0, 0.0, 1.0, 0.0]) >= 0.0);
            let interval_line = R13Line::new(
                l0.points[0].mapv(Interval::point),
                l0.points[1].mapv(Interval::point),
            );
            let verified = distance_r13_point_line(&pt.mapv(Interval::point), &interval_line);
            prop_assert!(verified.lo() >= 0.0);
        }

        #[test]
        fn test_triangle_dispatch_uses_edge_when_outside(t in 1.0f64..4.0, phi in -0.5f64..0.5) {
            let triangle = sample_triangle();
            let pt = array![t.cosh(), -t.sinh() * phi.cos(), t.sinh() * phi.sin(), 0.0];
            let epsilon: f64 = compute_epsilon(0);
            prop_assume!(r13_dot(&pt, &triangle.bounding_planes[0]) > epsilon);
            let object = GeometricObject::Point(R13Point::new(pt.clone()));
            prop_assert_eq!(
                lower_bound_distance_to_r13_triangle(&object, &triangle),
                distance_r13_point_line(&pt, &triangle.edges[0])
            );
        }
    }
}
