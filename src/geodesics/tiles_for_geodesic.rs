use super::canonical_keys::canonical_keys_function_for_line;
use super::core_curve::AwayFromCoreCurve;
use super::geodesic_info::GeodesicInfo;
use crate::config::constants::Constants;
use crate::error::{HyperbolicError, Result};
use crate::hyperboloid::GeometricObject;
use crate::numeric::Real;
use crate::tiling::{compute_tiles, TileStream};
use crate::triangulation::Mcomplex;
use crate::utils::numeric::compute_epsilon;
use std::sync::Arc;

/// 코어 곡선 근처를 걸러낸 측지선 타일 수열
pub type GeodesicTiles<N> = AwayFromCoreCurve<N, TileStream<N>>;

/// 닫힌 측지선 주위의 관을 덮는 타일
///
/// `geodesic` 은 직선과 시작 사면체가 정해져 있어야 한다.
/// 삼각분할에는 면 삼각형과 (채움이 있으면) 코어 곡선이 붙어 있어야 한다.
pub fn compute_tiles_for_geodesic<N: Real>(
    mcomplex: Arc<Mcomplex<N>>,
    geodesic: &GeodesicInfo<N>,
) -> Result<GeodesicTiles<N>> {
    let line = geodesic.line.as_ref().ok_or_else(|| HyperbolicError::MissingLine {
        word: geodesic.word.clone(),
    })?;
    if geodesic.lifted_tetrahedra.is_empty() {
        return Err(HyperbolicError::MissingLiftedTetrahedra {
            word: geodesic.word.clone(),
        });
    }

    let core_curve_epsilon = compute_epsilon::<N>(Constants::CORE_CURVE_EPSILON_BITS_OFFSET);
    let base_point = mcomplex.base_tet_in_center.clone();
    let min_inner_product = -(mcomplex.base_tet_in_radius / N::from_f64(2.0)).cosh();

    let tiles = compute_tiles(
        Arc::clone(&mcomplex),
        GeometricObject::Line(line.r13_line.clone()),
        base_point,
        Some(canonical_keys_function_for_line(line)),
        false,
        min_inner_product,
        geodesic.lifted_tetrahedra.clone(),
    )?;

    Ok(AwayFromCoreCurve::new(
        tiles,
        mcomplex,
        core_curve_epsilon,
        format!("Geodesic {}", geodesic.word),
    ))
}
