use super::cross_section::{CuspCrossSection, HoroballCrossSection};
use crate::error::{HyperbolicError, Result};
use crate::hyperboloid::{r13_dot, scale, GeometricObject, R13Horoball};
use crate::numeric::Real;
use crate::tiling::{compute_tiles, IterableCache, LiftedTetrahedron, TileCache, TileStream};
use crate::triangulation::Mcomplex;
use std::cell::OnceCell;
use std::sync::Arc;

/// 커스프마다 단면에서 읽어 둔 값
#[derive(Clone, Debug)]
pub struct CuspInfo<N: Real> {
    pub cusp_area: N,
    pub scale_for_std_form: N,
    /// 자기 자신으로 가는 모서리가 없으면 `None`
    pub exp_self_distance_along_edges: Option<N>,
    /// 이 배율까지 키운 커스프 근방은 매장된다
    pub lower_bound_embedding_scale: N,
}

/// 커스프 근방 타일링에 맞게 꼭짓점을 스케일한 삼각분할과 커스프별 타일 캐시
pub struct CuspNeighborhoods<N: Real> {
    mcomplex: Arc<Mcomplex<N>>,
    cusp_infos: Vec<CuspInfo<N>>,
    tiles: Vec<OnceCell<TileCache<N>>>,
}

impl<N: Real> CuspNeighborhoods<N> {
    /// 꼭짓점 벡터를 단면의 호로볼 벡터로 바꾸고 면 삼각형을 다시 만든다
    pub fn new(mut mcomplex: Mcomplex<N>, cross_section: &impl CuspCrossSection) -> Result<Self> {
        if let Some(v) = mcomplex.vertices.iter().find(|v| !v.is_complete()) {
            return Err(HyperbolicError::IncompleteCusp { cusp: v.index });
        }

        let areas = cross_section.cusp_areas();
        let cusp_infos = mcomplex
            .vertices
            .iter()
            .map(|v| {
                let scale_for_std_form = cross_section.scale_for_std_form(v.index);
                let exp_self_distance =
                    cross_section.exp_distance_neighborhoods_measured_along_edges(v.index, v.index);
                let embedding_scale = match exp_self_distance {
                    Some(e) => scale_for_std_form.min(e.sqrt()),
                    None => scale_for_std_form,
                };
                CuspInfo {
                    cusp_area: N::from_f64(areas.get(v.index).copied().unwrap_or(0.0)),
                    scale_for_std_form: N::from_f64(scale_for_std_form),
                    exp_self_distance_along_edges: exp_self_distance.map(N::from_f64),
                    lower_bound_embedding_scale: N::from_f64(embedding_scale),
                }
            })
            .collect();

        scale_vertices(&mut mcomplex, cross_section);
        mcomplex.add_triangles_to_tetrahedra();

        let tiles = mcomplex.vertices.iter().map(|_| OnceCell::new()).collect();
        Ok(CuspNeighborhoods {
            mcomplex: Arc::new(mcomplex),
            cusp_infos,
            tiles,
        })
    }

    pub fn mcomplex(&self) -> &Arc<Mcomplex<N>> {
        &self.mcomplex
    }

    pub fn num_cusps(&self) -> usize {
        self.cusp_infos.len()
    }

    pub fn cusp_info(&self, vertex: usize) -> Result<&CuspInfo<N>> {
        self.cusp_infos.get(vertex).ok_or(HyperbolicError::CuspIndex {
            index: vertex,
            count: self.cusp_infos.len(),
        })
    }

    /// 커스프 `vertex` 의 호로볼을 덮는 타일 (처음 부를 때 만들고 재사용)
    pub fn tiles(&self, vertex: usize) -> Result<&TileCache<N>> {
        let info = self.cusp_info(vertex)?;
        let cell = &self.tiles[vertex];
        if let Some(cache) = cell.get() {
            return Ok(cache);
        }
        let stream = compute_tiles_for_cusp_neighborhood(
            Arc::clone(&self.mcomplex),
            vertex,
            info.lower_bound_embedding_scale,
        )?;
        Ok(cell.get_or_init(|| IterableCache::new(stream)))
    }
}

/// 꼭짓점 `v0` 의 벡터를, `v0` 과 다음 두 꼭짓점이 이루는 면 위의 호로삼각형 변 길이가
/// 단면의 길이와 같아지도록 스케일한다
fn scale_vertices<N: Real>(mcomplex: &mut Mcomplex<N>, cross_section: &impl CuspCrossSection) {
    for tet in &mut mcomplex.tetrahedra {
        let vertices = tet.r13_vertices.clone();
        for v0 in 0..4 {
            let others: Vec<usize> = (1..4).map(|k| (v0 + k) % 4).collect();
            let (v1, v2, face) = (others[0], others[1], others[2]);
            let length_on_horosphere = (N::from_f64(-2.0) * r13_dot(&vertices[v1], &vertices[v2])
                / (r13_dot(&vertices[v0], &vertices[v1]) * r13_dot(&vertices[v0], &vertices[v2])))
            .sqrt();
            let length_on_cusp = cross_section.horotriangle_edge_length(tet.index, v0, face);
            let s = length_on_horosphere / N::from_f64(length_on_cusp);
            tet.r13_vertices[v0] = scale(s, &vertices[v0]);
        }
    }
}

/// 커스프 근방 타일링용 삼각분할을 만든다. 채워진 커스프가 있으면 실패한다
pub fn mcomplex_for_tiling_cusp_neighborhoods<N: Real>(
    mcomplex: Mcomplex<N>,
) -> Result<CuspNeighborhoods<N>> {
    let cross_section = HoroballCrossSection::new(&mcomplex)?;
    CuspNeighborhoods::new(mcomplex, &cross_section)
}

/// 커스프 `vertex` 의 첫 꼭짓점 호로볼을 덮는 타일
///
/// 꼭짓점 벡터가 이미 호로볼 벡터로 스케일되어 있어야 한다.
pub fn compute_tiles_for_cusp_neighborhood<N: Real>(
    mcomplex: Arc<Mcomplex<N>>,
    vertex: usize,
    lower_bound_embedding_scale: N,
) -> Result<TileStream<N>> {
    let count = mcomplex.vertices.len();
    let corner = mcomplex
        .vertices
        .get(vertex)
        .and_then(|v| v.corners.first().copied())
        .ok_or(HyperbolicError::CuspIndex { index: vertex, count })?;
    let defining_vec = mcomplex.tetrahedron(corner.tet)?.r13_vertices[corner.vertex].clone();

    tracing::debug!(
        cusp = vertex,
        tet = corner.tet,
        embedding_scale = lower_bound_embedding_scale.center(),
        "cusp neighborhood tiles"
    );

    compute_tiles(
        mcomplex,
        GeometricObject::Horoball(R13Horoball::new(defining_vec.clone())),
        defining_vec,
        None,
        true,
        -(lower_bound_embedding_scale * lower_bound_embedding_scale),
        vec![LiftedTetrahedron::identity(corner.tet)],
    )
}
