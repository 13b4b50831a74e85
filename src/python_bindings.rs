use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList, PyTuple};
use std::io;
use std::path::PathBuf;

use crate::centrality::{Centrality, MetricKind};
use crate::edges::load_edges_from_tsv;
use crate::error::AnalysisError;
use crate::histogram::DegreeHistogram;
use crate::network::PpiNetwork;
use crate::pipeline::{run_with_output, AnalysisConfig};

fn to_py_err(e: AnalysisError) -> PyErr {
    match e {
        AnalysisError::Io { .. } => PyErr::new::<pyo3::exceptions::PyIOError, _>(e.to_string()),
        AnalysisError::Csv { .. } | AnalysisError::MissingColumn { .. } => {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
        }
        _ => PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()),
    }
}

fn parse_metric(metric: &str) -> PyResult<MetricKind> {
    metric
        .parse::<MetricKind>()
        .map_err(PyErr::new::<pyo3::exceptions::PyValueError, _>)
}

fn load_network_from(edge_file: &str) -> PyResult<PpiNetwork> {
    let edges = load_edges_from_tsv(edge_file).map_err(to_py_err)?;
    Ok(PpiNetwork::from_edges(&edges))
}

/// Python binding: node and edge counts of the network in `edge_file`
#[pyfunction]
fn load_network(edge_file: &str) -> PyResult<(usize, usize)> {
    let network = load_network_from(edge_file)?;
    Ok((network.node_count(), network.edge_count()))
}

/// Python binding: centrality scores as a dict in first-appearance order
#[pyfunction]
#[pyo3(signature = (edge_file, metric="betweenness"))]
fn compute_centrality(py: Python<'_>, edge_file: &str, metric: &str) -> PyResult<PyObject> {
    let kind = parse_metric(metric)?;
    let network = load_network_from(edge_file)?;
    let scores = kind
        .strategy(false)
        .compute(&network)
        .map_err(to_py_err)?;

    let py_scores = PyDict::new_bound(py);
    for (gene, score) in scores.iter() {
        py_scores.set_item(gene, score)?;
    }
    Ok(py_scores.into())
}

/// Python binding: degree histogram as a list of (lower, upper, count)
#[pyfunction]
#[pyo3(signature = (edge_file, bins=20))]
fn degree_histogram(py: Python<'_>, edge_file: &str, bins: usize) -> PyResult<PyObject> {
    let network = load_network_from(edge_file)?;
    let histogram = DegreeHistogram::from_network(&network, bins);

    let py_bins = PyList::empty_bound(py);
    for (lo, hi, count) in histogram.iter_bins() {
        let py_tuple = PyTuple::new_bound(py, &[lo.into_py(py), hi.into_py(py), count.into_py(py)]);
        py_bins.append(py_tuple)?;
    }
    Ok(py_bins.into())
}

/// Python binding: run the whole pipeline, returning the ranked (gene, score) list
#[pyfunction]
#[pyo3(signature = (edge_file, output_dir="results", metric="betweenness", top_n=10, plot=true))]
fn run_analysis(
    py: Python<'_>,
    edge_file: &str,
    output_dir: &str,
    metric: &str,
    top_n: usize,
    plot: bool,
) -> PyResult<PyObject> {
    let kind = parse_metric(metric)?;
    let config = AnalysisConfig {
        input: PathBuf::from(edge_file),
        output_dir: PathBuf::from(output_dir),
        top_n,
        skip_plot: !plot,
        ..AnalysisConfig::default()
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary =
        run_with_output(&config, kind.strategy(false).as_ref(), &mut out).map_err(to_py_err)?;

    let py_ranked = PyList::empty_bound(py);
    for ranked in &summary.ranked {
        let py_tuple = PyTuple::new_bound(py, &[ranked.gene.clone().into_py(py), ranked.score.into_py(py)]);
        py_ranked.append(py_tuple)?;
    }
    Ok(py_ranked.into())
}

/// Python module definition
#[pymodule]
fn ppi_network_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(load_network, m)?)?;
    m.add_function(wrap_pyfunction!(compute_centrality, m)?)?;
    m.add_function(wrap_pyfunction!(degree_histogram, m)?)?;
    m.add_function(wrap_pyfunction!(run_analysis, m)?)?;
    m.add("__doc__", "PPI network centrality analysis with Python bindings")?;
    Ok(())
}
