use super::geodesic_info::GeodesicInfo;
use super::tiles_for_geodesic::{compute_tiles_for_geodesic, GeodesicTiles};
use crate::config::constants::Constants;
use crate::error::Result;
use crate::hyperboloid::distances::{distance_r13_lines, distance_r13_point_line};
use crate::hyperboloid::o13_inverse;
use crate::numeric::Real;
use crate::tiling::{IterableCache, Tile};
use crate::triangulation::upper_halfspace::normalise_complex_length;
use crate::triangulation::Mcomplex;
use ndarray::Array1;
use num::complex::Complex64;
use std::cell::OnceCell;
use std::sync::Arc;

/// 관을 이루는 조각: 사면체 번호와 그 사면체 좌표의 직선 끝점 `[head, tail]`
pub type TubePiece<N> = (usize, [Array1<N>; 2]);

/// 렌더러에 넘길 측지선 관 하나
pub struct GeodesicTubeInfo<N: Real> {
    mcomplex: Arc<Mcomplex<N>>,
    /// 같은 측지선을 나타내는 문자열들. 첫 번째로 계산한다
    pub words: Vec<String>,
    pub index: usize,
    pub is_primitive: Option<bool>,
    pub geodesic_info: GeodesicInfo<N>,
    pub complex_length: Complex64,
    tiles: OnceCell<IterableCache<Tile<N>, GeodesicTiles<N>>>,
}

impl<N: Real> GeodesicTubeInfo<N> {
    pub fn new(
        mcomplex: Arc<Mcomplex<N>>,
        word: &str,
        index: usize,
        is_primitive: Option<bool>,
    ) -> Result<Self> {
        let geodesic_info = GeodesicInfo::from_word(&mcomplex, word)?;
        let complex_length = geodesic_info.complex_length;
        Ok(GeodesicTubeInfo {
            mcomplex,
            words: vec![word.to_string()],
            index,
            is_primitive,
            geodesic_info,
            complex_length,
            tiles: OnceCell::new(),
        })
    }

    fn tiles(&self) -> Result<&IterableCache<Tile<N>, GeodesicTiles<N>>> {
        if let Some(cache) = self.tiles.get() {
            return Ok(cache);
        }
        let stream = compute_tiles_for_geodesic(Arc::clone(&self.mcomplex), &self.geodesic_info)?;
        Ok(self.tiles.get_or_init(|| IterableCache::new(stream)))
    }

    /// 반지름 `radius` 의 관을 덮는 조각과, 코어 곡선에 닿지 않도록 줄인 반지름
    pub fn compute_tets_and_r13_endpoints_and_radius_for_tube(
        &self,
        radius: N,
    ) -> Result<(Vec<TubePiece<N>>, N)> {
        let mut safe_radius = radius;
        let mut pieces = Vec::new();

        for tile in self.tiles()? {
            if tile.lower_bound_distance.certainly_gt(safe_radius) {
                break;
            }
            let Some(line) = tile.inverse_lifted_geometric_object.as_line() else {
                continue;
            };
            let tet = tile.lifted_tetrahedron.tet;
            for core_curve in self.mcomplex.tetrahedron(tet)?.core_curves.values() {
                safe_radius = safe_radius.min(distance_r13_lines(core_curve, line));
            }
            pieces.push((tet, [line.points[0].clone(), line.points[1].clone()]));
        }

        // 걸러낸 타일도 코어 곡선에 닿은 것이므로 반지름에 반영한다
        let skipped = self
            .tiles()?
            .inspect_source(|tiles| tiles.closest_skipped_core_curve(safe_radius));
        if let Some(distance) = skipped {
            safe_radius = safe_radius.min(distance);
        }

        if safe_radius.certainly_lt(radius) {
            tracing::debug!(
                word = %self.words[0],
                radius = radius.center(),
                safe_radius = safe_radius.center(),
                "tube shrunk to avoid core curve"
            );
        }
        Ok((pieces, safe_radius))
    }

    /// `other` 의 시작점이 이 측지선의 들어올림 위에 있으면 같은 측지선
    pub fn is_same_geodesic(&self, other: &GeodesicTubeInfo<N>) -> Result<bool> {
        let difference = normalise_complex_length(self.complex_length - other.complex_length);
        if difference.norm() > Constants::COMPLEX_LENGTH_TOLERANCE {
            return Ok(false);
        }

        let (Some(start_point), Some(seed)) = (
            other.geodesic_info.start_point.as_ref(),
            other.geodesic_info.lifted_tetrahedra.first(),
        ) else {
            return Ok(false);
        };
        let point = o13_inverse(&seed.o13_matrix).dot(start_point);
        let tolerance = N::from_f64(Constants::SAME_GEODESIC_TOLERANCE);

        for tile in self.tiles()? {
            if tile.lower_bound_distance.certainly_gt(tolerance) {
                return Ok(false);
            }
            if tile.lifted_tetrahedron.tet != seed.tet {
                continue;
            }
            if let Some(line) = tile.inverse_lifted_geometric_object.as_line() {
                if distance_r13_point_line(&point, line).certainly_lt(tolerance) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl<N: Real> PartialEq for GeodesicTubeInfo<N> {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_geodesic(other).unwrap_or(false)
    }
}

impl<N: Real> std::fmt::Debug for GeodesicTubeInfo<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeodesicTubeInfo")
            .field("words", &self.words)
            .field("index", &self.index)
            .field("complex_length", &self.complex_length)
            .finish()
    }
}
