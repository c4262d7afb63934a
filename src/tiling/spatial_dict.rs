use crate::config::constants::Constants;
use crate::hyperboloid::r13_dot;
use crate::numeric::Real;
use ndarray::Array1;
use std::collections::HashMap;

/// 사면체별로 쌍곡면의 점을 모아 두는 공간 해시
///
/// 두 점은 `<p, q>` 가 확실히 `min_inner_product` 보다 크면 같은 점이다.
/// 클라인 좌표를 격자로 나눠 저장하고, 찾을 때는 가까운 8 칸을 본다.
#[derive(Debug)]
pub struct SpatialDict<N: Real> {
    min_inner_product: N,
    cell: f64,
    buckets: HashMap<(usize, [i64; 3]), Vec<Array1<N>>>,
    len: usize,
}

impl<N: Real> SpatialDict<N> {
    pub fn new(min_inner_product: N) -> Self {
        SpatialDict {
            min_inner_product,
            cell: Constants::SPATIAL_HASH_CELL,
            buckets: HashMap::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn scaled_klein(&self, point: &Array1<N>) -> [f64; 3] {
        let w = point[0].center();
        [1, 2, 3].map(|i| point[i].center() / w / self.cell)
    }

    fn cell_of(&self, point: &Array1<N>) -> [i64; 3] {
        self.scaled_klein(point).map(|c| c.floor() as i64)
    }

    /// 같은 점이 이미 있는지
    pub fn contains(&self, tet: usize, point: &Array1<N>) -> bool {
        let coordinates = self.scaled_klein(point);
        let base = coordinates.map(|c| c.floor() as i64);
        // 각 좌표마다 자기 칸과 더 가까운 쪽 이웃 칸
        let step = coordinates.map(|c| if c - c.floor() < 0.5 { -1 } else { 1 });
        (0..8).any(|corner: usize| {
            let mut cell = base;
            for (axis, item) in cell.iter_mut().enumerate() {
                if corner & (1 << axis) != 0 {
                    *item += step[axis];
                }
            }
            self.buckets.get(&(tet, cell)).is_some_and(|points| {
                points
                    .iter()
                    .any(|q| r13_dot(point, q).certainly_gt(self.min_inner_product))
            })
        })
    }

    /// 대표점 중 어느 하나도 저장되어 있지 않으면 첫 대표점을 저장하고 true
    pub fn insert_if_new(&mut self, tet: usize, representatives: Vec<Array1<N>>) -> bool {
        if representatives.iter().any(|p| self.contains(tet, p)) {
            return false;
        }
        let Some(first) = representatives.into_iter().next() else {
            return false;
        };
        let cell = self.cell_of(&first);
        self.buckets.entry((tet, cell)).or_default().push(first);
        self.len += 1;
        true
    }
}
