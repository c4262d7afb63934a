//! 크레이트 공통 에러 타입

use thiserror::Error;

/// 타일링, 커스프, 측지선 계산에서 생기는 에러
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HyperbolicError {
    /// 채워진(불완전한) 커스프에는 호로볼 근방이 없다
    #[error("cusp {cusp} is filled, only complete cusps have a horoball neighborhood")]
    IncompleteCusp { cusp: usize },

    #[error("geodesic {word:?} has no developed line")]
    MissingLine { word: String },

    #[error("geodesic {word:?} has no seed lifted tetrahedra")]
    MissingLiftedTetrahedra { word: String },

    /// 외부 길이 스펙트럼 계산 실패
    #[error("length spectrum up to {max_length} failed: {message}")]
    LengthSpectrum { max_length: f64, message: String },

    #[error("unknown generator {letter:?} in word {word:?}")]
    UnknownGenerator { word: String, letter: char },

    #[error("word {word:?} is not loxodromic (trace {trace})")]
    NotLoxodromic { word: String, trace: String },

    #[error("point location for geodesic {word:?} did not finish in {steps} steps")]
    PointLocation { word: String, steps: usize },

    #[error("invalid gluing data: {0}")]
    InvalidGluing(String),

    #[error("tetrahedron {tet} has no face triangles")]
    MissingTriangles { tet: usize },

    #[error("tetrahedron index {index} out of range ({count} tetrahedra)")]
    TetrahedronIndex { index: usize, count: usize },

    #[error("tet data {tet} for {prefix:?}: {message}")]
    PackData {
        prefix: String,
        tet: usize,
        message: String,
    },

    #[error("cusp index {index} out of range ({count} cusps)")]
    CuspIndex { index: usize, count: usize },

    #[error("geodesic index {index} out of range ({count} geodesics)")]
    GeodesicIndex { index: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, HyperbolicError>;
