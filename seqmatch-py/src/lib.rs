//! Python bindings for the seqmatch localizers.
//!
//! Poses stay Python objects; the Rust side only sees their reference index.

use numpy::{PyReadonlyArray1, PyReadonlyArray2, PyUntypedArrayMethods};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use seqmatch::{
    DescriptorView, Descriptors, Localizer, ReferenceMap, SeqMatchConfig as RustSeqMatchConfig,
    SeqMatchError, SeqMatcher, SingleImageMatcher,
};
use std::sync::Arc;

/// Convert a SeqMatchError to a Python exception.
fn to_py_err(err: SeqMatchError) -> PyErr {
    match err {
        SeqMatchError::InvalidConfiguration { .. } => PyValueError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Copies a 2D float32 array (rows x dim) into owned descriptors.
fn descriptors_from_array(array: &PyReadonlyArray2<'_, f32>) -> PyResult<Descriptors> {
    let shape = array.shape();
    let data: Vec<f32> = array.as_slice()?.to_vec();
    Descriptors::new(data, shape[0], shape[1]).map_err(to_py_err)
}

fn reference_map(
    py: Python<'_>,
    map_poses: &[Py<PyAny>],
    map_descriptors: &PyReadonlyArray2<'_, f32>,
) -> PyResult<(Vec<Py<PyAny>>, Arc<ReferenceMap<usize>>)> {
    let descriptors = descriptors_from_array(map_descriptors)?;
    let poses: Vec<Py<PyAny>> = map_poses.iter().map(|p| p.clone_ref(py)).collect();
    let map = ReferenceMap::new((0..poses.len()).collect(), descriptors).map_err(to_py_err)?;
    Ok((poses, Arc::new(map)))
}

/// Configuration for sequence matching.
#[pyclass]
#[derive(Clone)]
pub struct SeqMatchConfig {
    inner: RustSeqMatchConfig,
}

#[pymethods]
impl SeqMatchConfig {
    /// Create a new SeqMatchConfig.
    ///
    /// Args:
    ///     seq_len: Query sequence length L (default: 10)
    ///     contrast_window: Contrast enhancement window (default: 10)
    ///     num_velocities: Velocity steps; num_velocities + 1 are tested (default: 20)
    ///     v_min: Minimum velocity (default: 1.0)
    ///     v_max: Maximum velocity (default: 10.0)
    ///     match_window: Exclusion window for confidence (default: 20)
    ///     enhance: Apply contrast enhancement (default: False)
    ///     parallel: Parallel matrix and scoring stages (default: False)
    #[new]
    #[pyo3(signature = (
        seq_len = 10,
        contrast_window = 10,
        num_velocities = 20,
        v_min = 1.0,
        v_max = 10.0,
        match_window = 20,
        enhance = false,
        parallel = false
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        seq_len: usize,
        contrast_window: usize,
        num_velocities: usize,
        v_min: f64,
        v_max: f64,
        match_window: usize,
        enhance: bool,
        parallel: bool,
    ) -> PyResult<Self> {
        let inner = RustSeqMatchConfig {
            seq_len,
            contrast_window,
            num_velocities,
            v_min,
            v_max,
            match_window,
            enhance,
            parallel,
        };
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Number of candidate start indices for a reference of `num_refs` places.
    fn candidate_count(&self, num_refs: usize) -> i64 {
        self.inner.candidate_count(num_refs)
    }

    fn __repr__(&self) -> String {
        format!(
            "SeqMatchConfig(seq_len={}, contrast_window={}, num_velocities={}, v_min={}, v_max={}, match_window={}, enhance={})",
            self.inner.seq_len,
            self.inner.contrast_window,
            self.inner.num_velocities,
            self.inner.v_min,
            self.inner.v_max,
            self.inner.match_window,
            self.inner.enhance
        )
    }
}

/// Sequence-matching localizer over a reference traverse.
#[pyclass]
pub struct SeqMatching {
    poses: Vec<Py<PyAny>>,
    inner: SeqMatcher<usize>,
}

#[pymethods]
impl SeqMatching {
    /// Create a sequence matcher.
    ///
    /// Args:
    ///     map_poses: Sequence of reference poses (any Python objects)
    ///     map_descriptors: 2D float32 array (N x dim) of unit-norm descriptors
    ///     config: SeqMatchConfig (default: SeqMatchConfig())
    #[new]
    #[pyo3(signature = (map_poses, map_descriptors, config = None))]
    fn new(
        py: Python<'_>,
        map_poses: Vec<Py<PyAny>>,
        map_descriptors: PyReadonlyArray2<'_, f32>,
        config: Option<SeqMatchConfig>,
    ) -> PyResult<Self> {
        let (poses, map) = reference_map(py, &map_poses, &map_descriptors)?;
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        let inner = SeqMatcher::new(map, cfg).map_err(to_py_err)?;
        Ok(Self { poses, inner })
    }

    /// Localize a query window (most recent descriptor first).
    ///
    /// Returns:
    ///     (pose, score) where score is the match confidence
    fn localize(
        &self,
        py: Python<'_>,
        query_descriptors: PyReadonlyArray2<'_, f32>,
    ) -> PyResult<(Py<PyAny>, f32)> {
        let shape = query_descriptors.shape();
        let view = DescriptorView::from_slice(query_descriptors.as_slice()?, shape[0], shape[1])
            .map_err(to_py_err)?;
        let loc = self.inner.localize(view).map_err(to_py_err)?;
        Ok((self.poses[loc.index].clone_ref(py), loc.score))
    }

    /// Template score per candidate start index.
    fn template_scores(&self, query_descriptors: PyReadonlyArray2<'_, f32>) -> PyResult<Vec<f32>> {
        let shape = query_descriptors.shape();
        let view = DescriptorView::from_slice(query_descriptors.as_slice()?, shape[0], shape[1])
            .map_err(to_py_err)?;
        self.inner.template_scores(view).map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!("SeqMatching(refs={})", self.poses.len())
    }
}

/// Single-image nearest-neighbour baseline.
#[pyclass]
pub struct SingleImageMatching {
    poses: Vec<Py<PyAny>>,
    inner: SingleImageMatcher<usize>,
}

#[pymethods]
impl SingleImageMatching {
    /// Create a single-image matcher.
    ///
    /// Args:
    ///     map_poses: Sequence of reference poses (any Python objects)
    ///     map_descriptors: 2D float32 array (N x dim) of unit-norm descriptors
    #[new]
    fn new(
        py: Python<'_>,
        map_poses: Vec<Py<PyAny>>,
        map_descriptors: PyReadonlyArray2<'_, f32>,
    ) -> PyResult<Self> {
        let (poses, map) = reference_map(py, &map_poses, &map_descriptors)?;
        Ok(Self {
            poses,
            inner: SingleImageMatcher::new(map),
        })
    }

    /// Localize using only the first (most recent) query descriptor.
    ///
    /// Returns:
    ///     (pose, score) where score is the descriptor distance
    fn localize(
        &self,
        py: Python<'_>,
        query_descriptors: PyReadonlyArray2<'_, f32>,
    ) -> PyResult<(Py<PyAny>, f32)> {
        let shape = query_descriptors.shape();
        let view = DescriptorView::from_slice(query_descriptors.as_slice()?, shape[0], shape[1])
            .map_err(to_py_err)?;
        let loc = self.inner.localize(view).map_err(to_py_err)?;
        Ok((self.poses[loc.index].clone_ref(py), loc.score))
    }

    /// Localize a single descriptor vector.
    ///
    /// Returns:
    ///     (pose, score) where score is the descriptor distance
    fn localize_descriptor(
        &self,
        py: Python<'_>,
        query_descriptor: PyReadonlyArray1<'_, f32>,
    ) -> PyResult<(Py<PyAny>, f32)> {
        let loc = self
            .inner
            .localize_descriptor(query_descriptor.as_slice()?)
            .map_err(to_py_err)?;
        Ok((self.poses[loc.index].clone_ref(py), loc.score))
    }

    fn __repr__(&self) -> String {
        format!("SingleImageMatching(refs={})", self.poses.len())
    }
}

/// Python module for seqmatch localization.
#[pymodule]
fn _seqmatch(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<SeqMatchConfig>()?;
    m.add_class::<SeqMatching>()?;
    m.add_class::<SingleImageMatching>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
