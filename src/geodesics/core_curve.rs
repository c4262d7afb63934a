use crate::hyperboloid::distances::distance_r13_lines;
use crate::numeric::Real;
use crate::tiling::Tile;
use crate::triangulation::Mcomplex;
use std::sync::Arc;

/// 사면체의 코어 곡선에 `epsilon` 이내로 다가가는 측지선 타일을 걸러낸다
///
/// 걸러낸 타일은 `tracing::warn!` 으로 남기고, 그 하한과 코어 곡선까지의
/// 거리를 기억한다.
pub struct AwayFromCoreCurve<N: Real, I> {
    tiles: I,
    mcomplex: Arc<Mcomplex<N>>,
    epsilon: N,
    obj_name: String,
    skipped: Vec<(N, N)>,
}

impl<N: Real, I> AwayFromCoreCurve<N, I> {
    pub fn new(
        tiles: I,
        mcomplex: Arc<Mcomplex<N>>,
        epsilon: N,
        obj_name: impl Into<String>,
    ) -> Self {
        AwayFromCoreCurve {
            tiles,
            mcomplex,
            epsilon,
            obj_name: obj_name.into(),
            skipped: Vec::new(),
        }
    }

    /// 지금까지 걸러낸 타일 수
    pub fn skipped(&self) -> usize {
        self.skipped.len()
    }

    /// 하한이 `radius` 를 확실히 넘지 않는 걸러낸 타일 중 코어 곡선까지의 최소 거리
    pub fn closest_skipped_core_curve(&self, radius: N) -> Option<N> {
        self.skipped
            .iter()
            .filter(|&&(lower_bound, _)| !lower_bound.certainly_gt(radius))
            .map(|&(_, distance)| distance)
            .reduce(|a, b| a.min(b))
    }

    fn near_core_curve(&self, tile: &Tile<N>) -> Option<(usize, N)> {
        let line = tile.inverse_lifted_geometric_object.as_line()?;
        let tet = self.mcomplex.tetrahedra.get(tile.lifted_tetrahedron.tet)?;
        tet.core_curves
            .iter()
            .map(|(&cusp, core)| (cusp, distance_r13_lines(core, line)))
            .find(|(_, distance)| !distance.certainly_gt(self.epsilon))
    }
}

impl<N: Real, I: Iterator<Item = Tile<N>>> Iterator for AwayFromCoreCurve<N, I> {
    type Item = Tile<N>;

    fn next(&mut self) -> Option<Tile<N>> {
        loop {
            let tile = self.tiles.next()?;
            match self.near_core_curve(&tile) {
                None => return Some(tile),
                Some((cusp, distance)) => {
                    self.skipped.push((tile.lower_bound_distance, distance));
                    tracing::warn!(
                        object = %self.obj_name,
                        tet = tile.lifted_tetrahedron.tet,
                        cusp,
                        "too close to core curve, skipping tile"
                    );
                }
            }
        }
    }
}
