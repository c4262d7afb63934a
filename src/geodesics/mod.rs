//! 닫힌 측지선 주위의 관
//!
//! 기본군 원소마다 측지선을 구하고, 관을 덮는 타일을 사면체별 조각으로 모아
//! 렌더러의 유니폼 배열로 묶는다.

mod canonical_keys;
mod core_curve;
mod geodesic_info;
mod pack;
mod registry;
mod tiles_for_geodesic;
mod tube_info;

pub use canonical_keys::{canonical_keys_function_for_line, LineCanonicalKeys};
pub use core_curve::AwayFromCoreCurve;
pub use geodesic_info::{project_to_line, GeodesicInfo};
pub use pack::{pack_tet_data, TetEntry, TypedValue, UniformBindings, UniformValue};
pub use registry::{Geodesics, LengthSpectrum, LengthSpectrumEntry, ViewState};
pub use tiles_for_geodesic::{compute_tiles_for_geodesic, GeodesicTiles};
pub use tube_info::{GeodesicTubeInfo, TubePiece};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::triangulation::upper_halfspace::complex_length_from_trace;
    use crate::triangulation::Mcomplex;

    /// 실수 길이가 0.1 보다 긴, 두 글자 이상의 짧은 문자열
    pub fn loxodromic_word(mcomplex: &Mcomplex<f64>) -> String {
        let letters: Vec<char> = mcomplex
            .generators
            .keys()
            .flat_map(|c| [*c, c.to_ascii_uppercase()])
            .collect();
        let mut words: Vec<String> = letters.iter().map(|c| c.to_string()).collect();
        for _ in 0..2 {
            let longer: Vec<String> = words
                .iter()
                .flat_map(|w| letters.iter().map(move |c| format!("{w}{c}")))
                .collect();
            words.extend(longer);
        }
        words
            .into_iter()
            .filter(|w| w.len() >= 2)
            .find(|w| {
                let Ok((sl2c, _)) = mcomplex.evaluate_word(w) else {
                    return false;
                };
                complex_length_from_trace(sl2c.normalised().trace()).re > 0.1
            })
            .expect("m004 has a short loxodromic word")
    }
}
