//! hyperboloid_tiling: 쌍곡 3-다양체의 쌍곡면 모델 타일링 라이브러리
//!
//! 이상 삼각분할을 범피복 공간으로 들어올려, 호로볼이나 닫힌 측지선 같은 기하
//! 객체에 가까운 사면체부터 차례로 나열한다. 커스프 근방과 측지선 관의
//! 렌더링 데이터를 이 나열에서 만든다.
//!
//! 모든 계산은 수치 타입 `N: Real` 위에서 돈다. `f64` 는 부동소수점,
//! [`numeric::Interval`] 은 검증된 구간 산술이다.

pub mod config;
pub mod cusps;
pub mod error;
pub mod geodesics;
pub mod hyperboloid;
pub mod numeric;
pub mod tiling;
pub mod triangulation;
pub mod utils;

#[cfg(feature = "python")]
pub mod python;

pub use cusps::{
    mcomplex_for_tiling_cusp_neighborhoods, triangulation_dependent_cusp_area_matrix,
    CuspCrossSection, CuspNeighborhoods, HoroballCrossSection,
};
pub use error::{HyperbolicError, Result};
pub use geodesics::{
    compute_tiles_for_geodesic, GeodesicInfo, GeodesicTubeInfo, Geodesics, LengthSpectrum,
};
pub use hyperboloid::{r13_dot, GeometricObject, R13Horoball, R13IdealTriangle, R13Line, R13Point};
pub use numeric::{Interval, Real};
pub use tiling::{compute_tiles, IterableCache, LiftedTetrahedron, Tile, TileStream};
pub use triangulation::{GluingData, Mcomplex, Perm4};

/// 자주 사용되는 핵심 기능들을 쉽게 가져올 수 있는 prelude 모듈
pub mod prelude {
    pub use crate::{
        compute_tiles, compute_tiles_for_geodesic, mcomplex_for_tiling_cusp_neighborhoods, r13_dot,
        triangulation_dependent_cusp_area_matrix, GeodesicInfo, GeodesicTubeInfo, Geodesics,
        GeometricObject, GluingData, HyperbolicError, Interval, LiftedTetrahedron, Mcomplex, Real,
        Tile,
    };
}
