// ─────────────────────────────────────────────────────────────────────
// StatKern — Python
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! PyO3 Python bindings for StatKern.
//!
//! Exposes linear convolution on numpy arrays and an explicit handle
//! registry of seeded uniform samplers.

use ndarray::Array1;
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::exceptions::{PyIOError, PyKeyError, PyMemoryError, PyValueError};
use pyo3::prelude::*;

use statkern_math::convolve::{contiguous, convolve_array, Convolver};
use statkern_math::handles::{Handle, SamplerRegistry};
use statkern_math::parallel::convolve_parallel;
use statkern_types::config::{EmptyInputPolicy, KernelConfig, SamplingConfig};
use statkern_types::error::{ErrorClass, KernelError};

fn to_py_err(err: KernelError) -> PyErr {
    let msg = err.to_string();
    match err.class() {
        ErrorClass::BadValue => PyValueError::new_err(msg),
        ErrorClass::OutOfMemory => PyMemoryError::new_err(msg),
        ErrorClass::MissingHandle => PyKeyError::new_err(msg),
        ErrorClass::Io => PyIOError::new_err(msg),
    }
}

// ─── Convolution ───

/// Linear convolution of two 1-D float64 arrays. Empty inputs raise ValueError.
#[pyfunction]
fn convolve<'py>(
    py: Python<'py>,
    a: PyReadonlyArray1<'py, f64>,
    b: PyReadonlyArray1<'py, f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let out = convolve_array(a.as_array(), b.as_array(), EmptyInputPolicy::Reject)
        .map_err(to_py_err)?;
    Ok(out.into_pyarray(py))
}

/// Rayon-parallel linear convolution; releases the GIL while computing.
#[pyfunction(name = "convolve_parallel")]
fn convolve_parallel_py<'py>(
    py: Python<'py>,
    a: PyReadonlyArray1<'py, f64>,
    b: PyReadonlyArray1<'py, f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let (a_view, b_view) = (a.as_array(), b.as_array());
    let (a, b) = (contiguous(&a_view), contiguous(&b_view));
    let out = py
        .allow_threads(|| convolve_parallel(&a, &b, EmptyInputPolicy::Reject))
        .map_err(to_py_err)?;
    Ok(out.into_pyarray(py))
}

/// Convolver configured from a JSON file (or defaults).
#[pyclass(name = "Convolver")]
struct PyConvolver {
    inner: Convolver,
}

#[pymethods]
impl PyConvolver {
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<&str>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => KernelConfig::from_file(path).map_err(to_py_err)?,
            None => KernelConfig::default(),
        };
        Ok(PyConvolver {
            inner: Convolver::new(config.convolution),
        })
    }

    fn convolve<'py>(
        &self,
        py: Python<'py>,
        a: PyReadonlyArray1<'py, f64>,
        b: PyReadonlyArray1<'py, f64>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let out = self
            .inner
            .convolve_array(a.as_array(), b.as_array())
            .map_err(to_py_err)?;
        Ok(out.into_pyarray(py))
    }

    /// Whether inputs of these lengths would take the parallel path.
    fn uses_parallel(&self, n1: usize, n2: usize) -> bool {
        self.inner.uses_parallel(n1, n2)
    }

    fn __repr__(&self) -> String {
        let cfg = self.inner.config();
        format!(
            "Convolver(empty_input={:?}, parallel_threshold={})",
            cfg.empty_input, cfg.parallel_threshold
        )
    }
}

// ─── Uniform sampling ───

/// Registry of uniform samplers addressed by integer handles.
///
/// Each session owns its generator; call `close` to release it.
#[pyclass(name = "SamplerRegistry")]
struct PySamplerRegistry {
    inner: SamplerRegistry,
}

#[pymethods]
impl PySamplerRegistry {
    #[new]
    #[pyo3(signature = (default_seed=None))]
    fn new(default_seed: Option<u64>) -> Self {
        PySamplerRegistry {
            inner: SamplerRegistry::new(SamplingConfig { default_seed }),
        }
    }

    /// Open a session drawing from [min, max). Returns its handle.
    #[pyo3(signature = (min, max, seed=None))]
    fn open(&mut self, min: f64, max: f64, seed: Option<u64>) -> PyResult<u64> {
        self.inner
            .open(min, max, seed)
            .map(Handle::raw)
            .map_err(to_py_err)
    }

    fn draw<'py>(
        &mut self,
        py: Python<'py>,
        handle: u64,
        n: usize,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let out = self
            .inner
            .draw(Handle::from_raw(handle), n)
            .map_err(to_py_err)?;
        Ok(Array1::from_vec(out).into_pyarray(py))
    }

    fn close(&mut self, handle: u64) -> PyResult<()> {
        self.inner
            .close(Handle::from_raw(handle))
            .map_err(to_py_err)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

// ─── Module registration ───

/// StatKern — native convolution and sampling kernels.
#[pymodule]
fn statkern(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyConvolver>()?;
    m.add_class::<PySamplerRegistry>()?;
    m.add_function(wrap_pyfunction!(convolve, m)?)?;
    m.add_function(wrap_pyfunction!(convolve_parallel_py, m)?)?;
    Ok(())
}
