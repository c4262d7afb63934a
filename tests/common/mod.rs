//! 통합 테스트 공용 도우미

#![allow(dead_code)]

use hyperboloid_tiling::triangulation::census;
use hyperboloid_tiling::triangulation::upper_halfspace::complex_length_from_trace;
use hyperboloid_tiling::{Mcomplex, Real};

pub fn m004<N: Real>() -> Mcomplex<N> {
    Mcomplex::from_gluing_data(&census::m004()).expect("m004 develops")
}

fn words_up_to_length_3(mcomplex: &Mcomplex<f64>) -> Vec<String> {
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
}

/// 실수 길이가 0.1 보다 긴, 두 글자 이상이고 회전이 자기와 다른 문자열
pub fn loxodromic_word(mcomplex: &Mcomplex<f64>) -> String {
    words_up_to_length_3(mcomplex)
        .into_iter()
        .filter(|w| w.len() >= 2 && rotate(w) != *w)
        .find(|w| {
            mcomplex
                .evaluate_word(w)
                .map(|(g, _)| complex_length_from_trace(g.normalised().trace()).re > 0.1)
                .unwrap_or(false)
        })
        .expect("m004 has a short loxodromic word")
}

/// 첫 글자를 맨 뒤로 옮긴다 (켤레 원소)
pub fn rotate(word: &str) -> String {
    word.chars().skip(1).chain(word.chars().take(1)).collect()
}
