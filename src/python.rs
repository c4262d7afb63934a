//! 파이썬 바인딩 (`python` 기능)

use crate::cusps::{
    mcomplex_for_tiling_cusp_neighborhoods, triangulation_dependent_cusp_area_matrix,
};
use crate::error::HyperbolicError;
use crate::hyperboloid::{self, distances, R13Line};
use crate::triangulation::{census, Mcomplex};
use ndarray::Array1;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn hyperbolic_error(err: HyperbolicError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn vector4(v: PyReadonlyArray1<'_, f64>) -> PyResult<Array1<f64>> {
    let v = v.as_array();
    if v.len() != 4 {
        return Err(PyValueError::new_err("expected a vector of length 4"));
    }
    Ok(v.to_owned())
}

#[pyfunction]
fn r13_dot(u: PyReadonlyArray1<'_, f64>, v: PyReadonlyArray1<'_, f64>) -> PyResult<f64> {
    Ok(hyperboloid::r13_dot(&vector4(u)?, &vector4(v)?))
}

/// 끝점 `(a0, a1)`, `(b0, b1)` 인 두 직선의 거리
#[pyfunction]
fn distance_r13_lines(
    a0: PyReadonlyArray1<'_, f64>,
    a1: PyReadonlyArray1<'_, f64>,
    b0: PyReadonlyArray1<'_, f64>,
    b1: PyReadonlyArray1<'_, f64>,
) -> PyResult<f64> {
    let a = R13Line::new(vector4(a0)?, vector4(a1)?);
    let b = R13Line::new(vector4(b0)?, vector4(b1)?);
    Ok(distances::distance_r13_lines(&a, &b))
}

#[pyfunction]
fn distance_r13_point_line(
    pt: PyReadonlyArray1<'_, f64>,
    p0: PyReadonlyArray1<'_, f64>,
    p1: PyReadonlyArray1<'_, f64>,
) -> PyResult<f64> {
    let line = R13Line::new(vector4(p0)?, vector4(p1)?);
    Ok(distances::distance_r13_point_line(&vector4(pt)?, &line))
}

/// 8자 매듭 여공간의 커스프 근방에서 하한이 `radius` 이하인 타일 수
#[pyfunction]
fn m004_cusp_tile_count(radius: f64) -> PyResult<usize> {
    let mcomplex: Mcomplex<f64> =
        Mcomplex::from_gluing_data(&census::m004()).map_err(hyperbolic_error)?;
    let neighborhoods = mcomplex_for_tiling_cusp_neighborhoods(mcomplex).map_err(hyperbolic_error)?;
    let tiles = neighborhoods.tiles(0).map_err(hyperbolic_error)?;
    Ok(tiles
        .iter()
        .take_while(|tile| tile.lower_bound_distance <= radius)
        .count())
}

#[pyfunction]
fn m004_cusp_area_matrix(py: Python<'_>) -> PyResult<&PyArray2<f64>> {
    let mcomplex: Mcomplex<f64> =
        Mcomplex::from_gluing_data(&census::m004()).map_err(hyperbolic_error)?;
    let matrix = triangulation_dependent_cusp_area_matrix(&mcomplex).map_err(hyperbolic_error)?;
    Ok(matrix.into_pyarray(py))
}

#[pymodule]
fn hyperboloid_tiling(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(r13_dot, m)?)?;
    m.add_function(wrap_pyfunction!(distance_r13_lines, m)?)?;
    m.add_function(wrap_pyfunction!(distance_r13_point_line, m)?)?;
    m.add_function(wrap_pyfunction!(m004_cusp_tile_count, m)?)?;
    m.add_function(wrap_pyfunction!(m004_cusp_area_matrix, m)?)?;
    Ok(())
}
