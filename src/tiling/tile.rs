use super::{CanonicalKeys, LiftedTetrahedron, SpatialDict};
use crate::error::Result;
use crate::hyperboloid::distances::lower_bound_distance_to_r13_triangle;
use crate::hyperboloid::{o13_inverse, GeometricObject};
use crate::numeric::Real;
use crate::triangulation::Mcomplex;
use ndarray::Array1;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

/// 타일: 들어올린 사면체와, 사면체 좌표로 옮긴 기하 객체
#[derive(Clone, Debug)]
pub struct Tile<N: Real> {
    /// 객체와 이 사면체 사이 거리의 하한
    pub lower_bound_distance: N,
    pub inverse_lifted_geometric_object: GeometricObject<N>,
    pub lifted_tetrahedron: LiftedTetrahedron<N>,
}

struct PendingLiftedTetrahedron<N: Real> {
    lower_bound_distance: N,
    /// 정렬 키 (구간이면 하한)
    key: f64,
    sequence: u64,
    lifted_tetrahedron: LiftedTetrahedron<N>,
    /// 들어온 면. 시작 사면체는 `None`
    entry_face: Option<usize>,
}

impl<N: Real> PartialEq for PendingLiftedTetrahedron<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: Real> Eq for PendingLiftedTetrahedron<N> {}

impl<N: Real> PartialOrd for PendingLiftedTetrahedron<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: Real> Ord for PendingLiftedTetrahedron<N> {
    /// `BinaryHeap` 은 최대 힙이므로 작은 키, 먼저 들어온 것이 크다
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// 하한이 가장 작은 후보부터 펼치는 지연 타일 수열
///
/// 하한이 `R` 을 넘는 첫 타일에서 읽기를 그만두면, 그때까지 받은 타일이 시작
/// 사면체에서 거리 `R` 이내의 면만 지나 닿는 들어올림 전부이다. 무한 피복에서는
/// 끝나지 않는다.
pub struct TileStream<N: Real> {
    mcomplex: Arc<Mcomplex<N>>,
    geometric_object: GeometricObject<N>,
    base_point: Array1<N>,
    canonical_keys: Option<Box<dyn CanonicalKeys<N>>>,
    act_on_base_point_by_inverse: bool,
    visited: SpatialDict<N>,
    pending: BinaryHeap<PendingLiftedTetrahedron<N>>,
    sequence: u64,
}

impl<N: Real> TileStream<N> {
    fn push(
        &mut self,
        lower_bound_distance: N,
        lifted_tetrahedron: LiftedTetrahedron<N>,
        entry_face: Option<usize>,
    ) {
        let key = lower_bound_distance.lower();
        self.pending.push(PendingLiftedTetrahedron {
            lower_bound_distance,
            key,
            sequence: self.sequence,
            lifted_tetrahedron,
            entry_face,
        });
        self.sequence += 1;
    }
}

impl<N: Real> Iterator for TileStream<N> {
    type Item = Tile<N>;

    fn next(&mut self) -> Option<Tile<N>> {
        loop {
            let pending = self.pending.pop()?;
            let lifted = pending.lifted_tetrahedron;
            let m_inverse = o13_inverse(&lifted.o13_matrix);

            let lifted_base_point = if self.act_on_base_point_by_inverse {
                m_inverse.dot(&self.base_point)
            } else {
                lifted.o13_matrix.dot(&self.base_point)
            };
            let representatives = match &self.canonical_keys {
                Some(keys) => keys.representatives(&lifted_base_point),
                None => vec![lifted_base_point],
            };
            if !self.visited.insert_if_new(lifted.tet, representatives) {
                continue;
            }

            let inverse_lifted_geometric_object = self.geometric_object.transformed(&m_inverse);

            let mcomplex = Arc::clone(&self.mcomplex);
            let tet = &mcomplex.tetrahedra[lifted.tet];
            // 스트림을 만들 때 모든 사면체에 삼각형이 있음을 확인했다
            let triangles = tet.triangles.as_ref()?;
            for f in 0..4 {
                if pending.entry_face == Some(f) {
                    continue;
                }
                let lower_bound = lower_bound_distance_to_r13_triangle(
                    &inverse_lifted_geometric_object,
                    &triangles[f],
                );
                let neighbor = LiftedTetrahedron::new(
                    tet.neighbors[f],
                    lifted.o13_matrix.dot(&tet.o13_matrices[f]),
                );
                self.push(lower_bound, neighbor, Some(tet.gluings[f].image(f)));
            }

            tracing::trace!(
                tet = lifted.tet,
                lower_bound = pending.lower_bound_distance.lower(),
                frontier = self.pending.len(),
                "tile"
            );

            return Some(Tile {
                lower_bound_distance: pending.lower_bound_distance,
                inverse_lifted_geometric_object,
                lifted_tetrahedron: lifted,
            });
        }
    }
}

/// 기하 객체 주위를 덮는 타일 수열을 만든다
///
/// 들어올림 `(t, M)` 의 기준점은 `act_on_base_point_by_inverse` 이면 `M^-1 b`,
/// 아니면 `M b` 이다. 같은 사면체에서 기준점(의 대표점)이 같은 들어올림은 한 번만
/// 나온다. 시작 사면체의 하한은 -∞.
pub fn compute_tiles<N: Real>(
    mcomplex: Arc<Mcomplex<N>>,
    geometric_object: GeometricObject<N>,
    base_point: Array1<N>,
    canonical_keys_function: Option<Box<dyn CanonicalKeys<N>>>,
    act_on_base_point_by_inverse: bool,
    min_inner_product: N,
    initial_lifted_tetrahedra: Vec<LiftedTetrahedron<N>>,
) -> Result<TileStream<N>> {
    for tet in &mcomplex.tetrahedra {
        tet.triangles()?;
    }
    for lifted in &initial_lifted_tetrahedra {
        mcomplex.tetrahedron(lifted.tet)?;
    }
    if initial_lifted_tetrahedra.is_empty() {
        tracing::warn!("tile stream started without initial lifted tetrahedra");
    }

    tracing::debug!(
        seeds = initial_lifted_tetrahedra.len(),
        min_inner_product = min_inner_product.center(),
        by_inverse = act_on_base_point_by_inverse,
        deduplicate_by_keys = canonical_keys_function.is_some(),
        "computing tiles"
    );

    let mut stream = TileStream {
        mcomplex,
        geometric_object,
        base_point,
        canonical_keys: canonical_keys_function,
        act_on_base_point_by_inverse,
        visited: SpatialDict::new(min_inner_product),
        pending: BinaryHeap::new(),
        sequence: 0,
    };
    for lifted in initial_lifted_tetrahedra {
        stream.push(N::from_f64(f64::NEG_INFINITY), lifted, None);
    }
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HyperbolicError;
    use crate::hyperboloid::{r13_dot, R13Point};
    use crate::triangulation::census;

    fn m004() -> Arc<Mcomplex<f64>> {
        Arc::new(Mcomplex::from_gluing_data(&census::m004()).unwrap())
    }

    fn point_tiles(mcomplex: Arc<Mcomplex<f64>>) -> TileStream<f64> {
        let center = mcomplex.base_tet_in_center.clone();
        let min_inner_product = -(mcomplex.base_tet_in_radius / 2.0).cosh();
        compute_tiles(
            mcomplex,
            GeometricObject::Point(R13Point::new(center.clone())),
            center,
            None,
            false,
            min_inner_product,
            vec![LiftedTetrahedron::identity(0)],
        )
        .unwrap()
    }

    #[test]
    fn test_first_tile_is_seed() {
        let tiles: Vec<_> = point_tiles(m004()).take(200).collect();
        assert_eq!(tiles[0].lifted_tetrahedron.tet, 0);
        assert_eq!(tiles[0].lower_bound_distance, f64::NEG_INFINITY);
        // 점은 자기 사면체 밖의 면까지 거리가 음이 아니다
        assert!(tiles[1..].iter().all(|t| t.lower_bound_distance >= 0.0));
    }

    #[test]
    fn test_no_duplicate_lifts() {
        let mcomplex = m004();
        let center = mcomplex.base_tet_in_center.clone();
        let tiles: Vec<_> = point_tiles(Arc::clone(&mcomplex)).take(300).collect();
        let points: Vec<_> = tiles
            .iter()
            .map(|t| (t.lifted_tetrahedron.tet, t.lifted_tetrahedron.o13_matrix.dot(&center)))
            .collect();
        for (i, (tet_i, p)) in points.iter().enumerate() {
            for (tet_j, q) in &points[i + 1..] {
                if tet_i == tet_j {
                    assert!(r13_dot(p, q) < -1.0 - 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_missing_triangles_is_rejected() {
        let mut mcomplex = Mcomplex::<f64>::from_gluing_data(&census::m004()).unwrap();
        mcomplex.tetrahedra[1].triangles = None;
        let center = mcomplex.base_tet_in_center.clone();
        let result = compute_tiles(
            Arc::new(mcomplex),
            GeometricObject::Point(R13Point::new(center.clone())),
            center,
            None,
            false,
            -2.0,
            vec![LiftedTetrahedron::identity(0)],
        );
        assert!(matches!(result, Err(HyperbolicError::MissingTriangles { tet: 1 })));
    }

    #[test]
    fn test_bad_seed_index_is_rejected() {
        let mcomplex = m004();
        let center = mcomplex.base_tet_in_center.clone();
        let result = compute_tiles(
            mcomplex,
            GeometricObject::Point(R13Point::new(center.clone())),
            center,
            None,
            false,
            -2.0,
            vec![LiftedTetrahedron::identity(7)],
        );
        assert!(matches!(result, Err(HyperbolicError::TetrahedronIndex { index: 7, .. })));
    }
}
