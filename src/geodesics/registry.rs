use super::pack::{pack_tet_data, TetEntry, TypedValue, UniformBindings};
use super::tube_info::{GeodesicTubeInfo, TubePiece};
use crate::config::constants::Constants;
use crate::error::{HyperbolicError, Result};
use crate::hyperboloid::o13_orthonormalise;
use crate::numeric::Real;
use crate::triangulation::Mcomplex;
use ndarray::{Array1, Array2};
use num::complex::Complex64;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 길이 스펙트럼의 항목 하나
#[derive(Clone, Debug, PartialEq)]
pub struct LengthSpectrumEntry {
    pub word: String,
    pub length: Complex64,
}

/// 외부에서 주어지는 길이 스펙트럼 계산
pub trait LengthSpectrum {
    /// 실수 길이가 `max_length` 이하인 닫힌 측지선들. 실패하면 원인 메시지
    fn length_spectrum(
        &self,
        max_length: f64,
    ) -> std::result::Result<Vec<LengthSpectrumEntry>, String>;
}

/// 카메라 자리: 시점 행렬, 사면체 번호, 시점 오프셋
pub type ViewState<N> = (Array2<N>, usize, f64);

type TubeResult<N> = Result<Option<(Vec<TubePiece<N>>, N)>>;

/// 측지선 관 목록과, 마지막으로 묶은 유니폼
pub struct Geodesics<N: Real> {
    mcomplex: Arc<Mcomplex<N>>,
    geodesic_tube_infos: Vec<GeodesicTubeInfo<N>>,
    uniform_bindings: UniformBindings,
    num: usize,
}

impl<N: Real> Geodesics<N> {
    /// 문자열마다 관 하나 (합치지 않는다)
    pub fn new(mut mcomplex: Mcomplex<N>, words: &[&str]) -> Result<Self> {
        mcomplex.add_triangles_to_tetrahedra();
        let mcomplex = Arc::new(mcomplex);
        let geodesic_tube_infos = words
            .iter()
            .enumerate()
            .map(|(index, word)| GeodesicTubeInfo::new(Arc::clone(&mcomplex), word, index, None))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(geodesics = geodesic_tube_infos.len(), "geodesics");

        Ok(Geodesics {
            mcomplex,
            geodesic_tube_infos,
            uniform_bindings: UniformBindings::new(),
            num: 0,
        })
    }

    pub fn mcomplex(&self) -> &Arc<Mcomplex<N>> {
        &self.mcomplex
    }

    pub fn geodesic_tube_infos(&self) -> &[GeodesicTubeInfo<N>] {
        &self.geodesic_tube_infos
    }

    pub fn len(&self) -> usize {
        self.geodesic_tube_infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geodesic_tube_infos.is_empty()
    }

    /// 관을 새로 계산해 유니폼을 묶는다. 코어 곡선 때문에 줄어든 관이 있으면 false
    ///
    /// `enables` 나 `radii` 가 짧으면 남은 측지선은 꺼진 것으로 본다.
    pub fn set_enables_and_radii_and_update(
        &mut self,
        enables: &[bool],
        radii: &[f64],
    ) -> Result<bool> {
        if self.geodesic_tube_infos.is_empty() {
            return Ok(true);
        }

        let tubes = compute_tubes(&mut self.geodesic_tube_infos, enables, radii);

        let mut success = true;
        let mut tets_to_data: Vec<Vec<TetEntry>> = vec![Vec::new(); self.mcomplex.num_tetrahedra()];
        for (i, tube) in tubes.into_iter().enumerate() {
            let Some((pieces, safe_radius)) = tube? else {
                continue;
            };
            if safe_radius.certainly_lt(N::from_f64(radii[i])) {
                success = false;
            }
            let cosh = safe_radius.cosh();
            let radius_param = (cosh * cosh / N::from_f64(2.0)).center();

            for (tet, [head, tail]) in pieces {
                tets_to_data[tet].push(BTreeMap::from([
                    ("Heads".to_string(), TypedValue::Vec4(to_vec4(&head))),
                    ("Tails".to_string(), TypedValue::Vec4(to_vec4(&tail))),
                    ("Index".to_string(), TypedValue::Int(i as i64)),
                    ("TubeRadiusParam".to_string(), TypedValue::Float(radius_param)),
                ]));
            }
        }

        let (bindings, num) = pack_tet_data(Constants::GEODESIC_UNIFORM_PREFIX, &tets_to_data)?;
        self.uniform_bindings = bindings;
        self.num = num;

        tracing::debug!(segments = num, success, "packed geodesic tubes");
        Ok(success)
    }

    pub fn get_uniform_bindings(&self) -> &UniformBindings {
        &self.uniform_bindings
    }

    pub fn get_compile_time_defs(&self) -> BTreeMap<String, usize> {
        let num = if self.num > 0 {
            self.num.max(Constants::MIN_GEODESIC_SEGMENTS)
        } else {
            0
        };
        BTreeMap::from([("num_geodesic_segments".to_string(), num)])
    }

    /// 길이 스펙트럼의 원시 측지선을 모두 넣는다. 새 관이 생겼으면 true
    ///
    /// 넣지 못한 항목은 로그로 남기고 나머지를 계속 넣은 뒤, 마지막 에러를 돌려준다.
    pub fn add_length_spectrum(
        &mut self,
        oracle: &impl LengthSpectrum,
        max_length: f64,
    ) -> Result<bool> {
        let entries = oracle
            .length_spectrum(max_length)
            .map_err(|message| HyperbolicError::LengthSpectrum { max_length, message })?;

        let num_original = self.geodesic_tube_infos.len();
        let mut last_error = None;
        for entry in entries {
            if let Err(e) = self.add_word(&entry.word, Some(true)) {
                tracing::warn!(
                    word = %entry.word,
                    length = %entry.length,
                    error = %e,
                    "failed to add geodesic"
                );
                last_error = Some(e);
            }
        }

        if let Some(e) = last_error {
            return Err(e);
        }
        Ok(self.geodesic_tube_infos.len() > num_original)
    }

    /// 측지선을 넣고 번호를 돌려준다. 이미 있는 측지선이면 그 번호
    pub fn add_word(&mut self, word: &str, is_primitive: Option<bool>) -> Result<usize> {
        let index = self.geodesic_tube_infos.len();
        let info = GeodesicTubeInfo::new(Arc::clone(&self.mcomplex), word, index, is_primitive)?;

        for (i, other) in self.geodesic_tube_infos.iter_mut().enumerate() {
            if other.is_same_geodesic(&info)? {
                if !other.words.iter().any(|w| w == word) {
                    other.words.push(word.to_string());
                }
                return Ok(i);
            }
        }

        self.geodesic_tube_infos.push(info);
        Ok(index)
    }

    /// 실수 길이, 회전각 크기 순. 켤레 길이는 음의 회전이 먼저
    pub fn geodesics_sorted_by_length(&self) -> Vec<&GeodesicTubeInfo<N>> {
        let mut result: Vec<_> = self.geodesic_tube_infos.iter().collect();
        result.sort_by_key(|info| length_key(info.complex_length, info.index));
        result
    }

    /// 측지선 위 한 점에서 측지선 방향을 보는 카메라
    pub fn view_state_for_geodesic(&self, index: usize) -> Result<ViewState<N>> {
        let info = self
            .geodesic_tube_infos
            .get(index)
            .ok_or(HyperbolicError::GeodesicIndex {
                index,
                count: self.geodesic_tube_infos.len(),
            })?;
        let line = info
            .geodesic_info
            .line
            .as_ref()
            .ok_or_else(|| HyperbolicError::MissingLine { word: info.words[0].clone() })?;
        let [p0, p1] = &line.r13_line.points;

        let zero = N::zero();
        let one = N::one();
        let columns: [Array1<N>; 4] = [
            p0 + p1,
            p0 - p1,
            Array1::from(vec![zero, one, zero, zero]),
            Array1::from(vec![zero, zero, one, zero]),
        ];
        let g = o13_orthonormalise(&Array2::from_shape_fn((4, 4), |(i, j)| columns[j][i]));

        // 카메라가 x 축을 보도록 돌린다
        let r = Array2::from_shape_fn((4, 4), |(i, j)| match (i, j) {
            (0, 0) | (1, 3) | (2, 1) | (3, 2) => one,
            _ => zero,
        });

        Ok((g.dot(&r), 0, 0.0))
    }
}

fn to_vec4<N: Real>(v: &Array1<N>) -> [f64; 4] {
    [v[0].center(), v[1].center(), v[2].center(), v[3].center()]
}

fn length_key(l: Complex64, index: usize) -> (i64, i64, bool, usize) {
    (
        (l.re * Constants::LENGTH_KEY_SCALE) as i64,
        (l.im * Constants::LENGTH_KEY_SCALE).abs() as i64,
        l.im > Constants::LENGTH_KEY_IMAG_EPS,
        index,
    )
}

fn compute_tube<N: Real>(
    i: usize,
    info: &mut GeodesicTubeInfo<N>,
    enables: &[bool],
    radii: &[f64],
) -> TubeResult<N> {
    match (enables.get(i), radii.get(i)) {
        (Some(true), Some(&radius)) => info
            .compute_tets_and_r13_endpoints_and_radius_for_tube(N::from_f64(radius))
            .map(Some),
        _ => Ok(None),
    }
}

#[cfg(feature = "parallel")]
fn compute_tubes<N: Real>(
    infos: &mut [GeodesicTubeInfo<N>],
    enables: &[bool],
    radii: &[f64],
) -> Vec<TubeResult<N>> {
    use rayon::prelude::*;

    infos
        .par_iter_mut()
        .enumerate()
        .map(|(i, info)| compute_tube(i, info, enables, radii))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn compute_tubes<N: Real>(
    infos: &mut [GeodesicTubeInfo<N>],
    enables: &[bool],
    radii: &[f64],
) -> Vec<TubeResult<N>> {
    infos
        .iter_mut()
        .enumerate()
        .map(|(i, info)| compute_tube(i, info, enables, radii))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesics::test_support::loxodromic_word;
    use crate::hyperboloid::r13_dot;
    use crate::triangulation::census;
    use approx::assert_abs_diff_eq;

    fn m004() -> Mcomplex<f64> {
        Mcomplex::from_gluing_data(&census::m004()).unwrap()
    }

    struct FixedSpectrum(std::result::Result<Vec<LengthSpectrumEntry>, String>);

    impl LengthSpectrum for FixedSpectrum {
        fn length_spectrum(
            &self,
            _max_length: f64,
        ) -> std::result::Result<Vec<LengthSpectrumEntry>, String> {
            self.0.clone()
        }
    }

    fn entry(word: &str) -> LengthSpectrumEntry {
        LengthSpectrumEntry {
            word: word.to_string(),
            length: Complex64::new(1.0, 0.0),
        }
    }

    #[test]
    fn test_update_packs_enabled_tubes() {
        let mcomplex = m004();
        let word = loxodromic_word(&mcomplex);
        let mut geodesics = Geodesics::new(mcomplex, &[word.as_str()]).unwrap();
        assert!(geodesics.set_enables_and_radii_and_update(&[true], &[0.2]).unwrap());

        let bindings = geodesics.get_uniform_bindings();
        let count = bindings["geodesics.geodesicHeads"].len();
        assert!(count > 0);
        assert_eq!(bindings["geodesics.geodesicTails"].len(), count);
        assert_eq!(bindings["geodesics.geodesicOffsets"].len(), 3);
        assert_eq!(geodesics.get_compile_time_defs()["num_geodesic_segments"], count.max(100));

        assert!(geodesics.set_enables_and_radii_and_update(&[false], &[0.2]).unwrap());
        assert_eq!(geodesics.get_compile_time_defs()["num_geodesic_segments"], 0);
    }

    #[test]
    fn test_add_word_merges_rotation() {
        let mcomplex = m004();
        let word = loxodromic_word(&mcomplex);
        let rotated: String = word.chars().skip(1).chain(word.chars().take(1)).collect();
        let mut geodesics = Geodesics::new(mcomplex, &[]).unwrap();
        assert_eq!(geodesics.add_word(&word, None).unwrap(), 0);
        assert_eq!(geodesics.add_word(&rotated, None).unwrap(), 0);
        assert_eq!(geodesics.len(), 1);
    }

    #[test]
    fn test_length_spectrum_failure_is_wrapped() {
        let mut geodesics = Geodesics::new(m004(), &[]).unwrap();
        let result = geodesics.add_length_spectrum(&FixedSpectrum(Err("no shapes".into())), 2.0);
        assert_eq!(
            result,
            Err(HyperbolicError::LengthSpectrum {
                max_length: 2.0,
                message: "no shapes".into()
            })
        );
    }

    #[test]
    fn test_length_spectrum_keeps_good_words() {
        let mcomplex = m004();
        let word = loxodromic_word(&mcomplex);
        let mut geodesics = Geodesics::new(mcomplex, &[]).unwrap();
        let oracle = FixedSpectrum(Ok(vec![entry(&word), entry("q")]));
        assert!(matches!(
            geodesics.add_length_spectrum(&oracle, 2.0),
            Err(HyperbolicError::UnknownGenerator { letter: 'q', .. })
        ));
        assert_eq!(geodesics.len(), 1);
        assert_eq!(geodesics.geodesic_tube_infos()[0].is_primitive, Some(true));
    }

    #[test]
    fn test_sort_key_pairs_conjugates() {
        let a = length_key(Complex64::new(1.0, 0.5), 0);
        let b = length_key(Complex64::new(1.0, -0.5), 1);
        let c = length_key(Complex64::new(0.9, 2.0), 2);
        let mut keys = vec![a, b, c];
        keys.sort();
        assert_eq!(keys.iter().map(|k| k.3).collect::<Vec<_>>(), vec![2, 1, 0]);
    }

    #[test]
    fn test_view_state_is_in_o13() {
        let mcomplex = m004();
        let word = loxodromic_word(&mcomplex);
        let geodesics = Geodesics::new(mcomplex, &[word.as_str()]).unwrap();
        let (m, tet, offset) = geodesics.view_state_for_geodesic(0).unwrap();
        assert_eq!((tet, offset), (0, 0.0));
        // 첫 열은 측지선 위의 점
        let origin = m.column(0).to_owned();
        assert_abs_diff_eq!(r13_dot(&origin, &origin), -1.0, epsilon = 1e-9);
        for i in 0..4 {
            for j in 0..4 {
                let expected = match (i, j) {
                    (0, 0) => -1.0,
                    _ if i == j => 1.0,
                    _ => 0.0,
                };
                let value = r13_dot(&m.column(i).to_owned(), &m.column(j).to_owned());
                assert_abs_diff_eq!(value, expected, epsilon = 1e-8);
            }
        }
        assert!(matches!(
            geodesics.view_state_for_geodesic(5),
            Err(HyperbolicError::GeodesicIndex { index: 5, count: 1 })
        ));
    }
}
