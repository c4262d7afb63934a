//! 커스프 근방
//!
//! 완비 커스프의 호로볼 단면을 잡고, 그 호로볼을 덮는 타일을 만든다.

mod cross_section;
mod cusp_neighborhood;

pub use cross_section::{
    triangulation_dependent_cusp_area_matrix, CuspCrossSection, HoroballCrossSection,
};
pub use cusp_neighborhood::{
    compute_tiles_for_cusp_neighborhood, mcomplex_for_tiling_cusp_neighborhoods, CuspInfo,
    CuspNeighborhoods,
};
