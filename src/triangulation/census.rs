//! 작은 센서스 다양체의 붙임 정보

use super::{GluingData, Perm4};
use num::complex::Complex64;

fn perms(images: [[usize; 4]; 4]) -> [Perm4; 4] {
    images.map(Perm4)
}

/// 8자 매듭 여공간. 두 정칙 이상 사면체
pub fn m004() -> GluingData {
    let regular = Complex64::new(0.5, 0.75f64.sqrt());
    GluingData {
        neighbors: vec![[1, 1, 1, 1], [0, 0, 0, 0]],
        gluings: vec![
            perms([[0, 1, 3, 2], [1, 2, 3, 0], [2, 3, 1, 0], [2, 1, 0, 3]]),
            perms([[0, 1, 3, 2], [3, 2, 0, 1], [3, 0, 1, 2], [2, 1, 0, 3]]),
        ],
        shapes: vec![regular, regular],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_m004_round_trips_through_json() {
        let data = m004();
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"0132\""));
        let parsed: GluingData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_m004_gluings_are_permutations() {
        for tet in m004().gluings {
            for perm in tet {
                assert_eq!(Perm4::new(perm.0).unwrap(), perm);
            }
        }
    }

    #[test]
    fn test_m004_gluings_are_odd() {
        for tet in m004().gluings {
            assert!(tet.iter().all(Perm4::is_odd));
        }
    }
}
