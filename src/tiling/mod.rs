//! 범피복 공간에서 사면체 들어올림을 거리순으로 나열하는 타일링 엔진
//!
//! 기하 객체(호로볼, 측지선, 점)에 가까운 사면체부터 면 인접성을 따라 펼쳐
//! 나간다. 같은 들어올림은 기준점의 위치로 한 번만 내보낸다.

mod iterable_cache;
mod lifted_tetrahedron;
mod spatial_dict;
mod tile;

pub use iterable_cache::{Cursor, IterableCache};
pub use lifted_tetrahedron::LiftedTetrahedron;
pub use spatial_dict::SpatialDict;
pub use tile::{compute_tiles, Tile, TileStream};

use crate::numeric::Real;
use ndarray::Array1;

/// 타일 수열의 캐시
pub type TileCache<N> = IterableCache<Tile<N>, TileStream<N>>;

/// 들어올린 기준점의 대표점
///
/// 첫 번째 대표점을 저장하고, 모든 대표점으로 이미 저장된 점을 찾는다.
/// 대칭군으로 같은 점을 하나로 모으는 데 쓴다.
pub trait CanonicalKeys<N: Real>: Send + Sync {
    fn representatives(&self, point: &Array1<N>) -> Vec<Array1<N>>;
}
