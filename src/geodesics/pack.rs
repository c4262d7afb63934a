//! 사면체별 데이터를 셰이더 유니폼 배열로 묶는다
//!
//! 사면체 `t` 의 항목은 `Offsets[t] .. Offsets[t + 1]` 에 놓인다.

use crate::error::{HyperbolicError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// 항목 하나의 값
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    Vec4([f64; 4]),
    Int(i64),
    Float(f64),
}

impl TypedValue {
    fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Vec4(_) => "vec4",
            TypedValue::Int(_) => "int",
            TypedValue::Float(_) => "float",
        }
    }
}

/// 유니폼 하나: GLSL 타입과 값 배열
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum UniformValue {
    #[serde(rename = "vec4[]")]
    Vec4Array(Vec<[f64; 4]>),
    #[serde(rename = "int[]")]
    IntArray(Vec<i64>),
    #[serde(rename = "float[]")]
    FloatArray(Vec<f64>),
}

impl UniformValue {
    fn empty_like(value: &TypedValue) -> Self {
        match value {
            TypedValue::Vec4(_) => UniformValue::Vec4Array(Vec::new()),
            TypedValue::Int(_) => UniformValue::IntArray(Vec::new()),
            TypedValue::Float(_) => UniformValue::FloatArray(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            UniformValue::Vec4Array(v) => v.len(),
            UniformValue::IntArray(v) => v.len(),
            UniformValue::FloatArray(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 같은 타입이면 덧붙이고 true
    fn push(&mut self, value: &TypedValue) -> bool {
        match (self, value) {
            (UniformValue::Vec4Array(v), TypedValue::Vec4(x)) => v.push(*x),
            (UniformValue::IntArray(v), TypedValue::Int(x)) => v.push(*x),
            (UniformValue::FloatArray(v), TypedValue::Float(x)) => v.push(*x),
            _ => return false,
        }
        true
    }
}

pub type UniformBindings = BTreeMap<String, UniformValue>;

/// 사면체 하나에 붙는 항목 (키별 값)
pub type TetEntry = BTreeMap<String, TypedValue>;

pub fn pack_tet_data(
    prefix: &str,
    tets_to_data: &[Vec<TetEntry>],
) -> Result<(UniformBindings, usize)> {
    let mut offsets = Vec::with_capacity(tets_to_data.len() + 1);
    let mut arrays: BTreeMap<String, UniformValue> = BTreeMap::new();
    let mut keys: Option<Vec<String>> = None;
    let mut count = 0;

    for (tet, entries) in tets_to_data.iter().enumerate() {
        offsets.push(count as i64);
        for entry in entries {
            let entry_keys: Vec<String> = entry.keys().cloned().collect();
            match &keys {
                None => keys = Some(entry_keys),
                Some(expected) if *expected != entry_keys => {
                    return Err(HyperbolicError::PackData {
                        prefix: prefix.to_string(),
                        tet,
                        message: format!("keys {entry_keys:?} differ from {expected:?}"),
                    });
                }
                Some(_) => {}
            }
            for (key, value) in entry {
                let array = arrays
                    .entry(key.clone())
                    .or_insert_with(|| UniformValue::empty_like(value));
                if !array.push(value) {
                    return Err(HyperbolicError::PackData {
                        prefix: prefix.to_string(),
                        tet,
                        message: format!("{key} is not of type {}", value.type_name()),
                    });
                }
            }
            count += 1;
        }
    }
    offsets.push(count as i64);

    let mut bindings: UniformBindings = arrays
        .into_iter()
        .map(|(key, value)| (format!("{prefix}{key}"), value))
        .collect();
    bindings.insert(format!("{prefix}Offsets"), UniformValue::IntArray(offsets));
    Ok((bindings, count))
}
