//! Logistics datasets: CSV loading and synthetic generation
//!
//! A dataset is a header line naming the `source`, `target` and `capacity`
//! columns (in any order) followed by one integer row per route. The node
//! count is one more than the largest node id mentioned.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use maxflow_core::{Capacity, FlowError, FlowNetwork};
use rand::Rng;
use thiserror::Error;

const COLUMNS: [&str; 3] = ["source", "target", "capacity"];

/// Capacity range of randomly generated routes
const RANDOM_CAPACITY: std::ops::RangeInclusive<Capacity> = 10..=100;

/// Capacity of the guaranteed source-to-sink chain
const CHAIN_CAPACITY: Capacity = 50;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to access dataset {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Dataset is empty")]
    Empty,

    #[error("Header is missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("Line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: {column} value '{value}' is not an integer")]
    NotAnInteger {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("Line {line}: {column} must be a non-negative node id, got {value}")]
    NegativeNode {
        line: usize,
        column: &'static str,
        value: i64,
    },

    #[error("Density {0} is outside [0, 1]")]
    InvalidDensity(f64),

    #[error("Cannot generate a dataset with zero nodes")]
    NoNodes,

    #[error(transparent)]
    Network(#[from] FlowError),
}

/// Route triples plus the node count they span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub node_count: usize,
    pub edges: Vec<(usize, usize, Capacity)>,
}

impl Dataset {
    /// Build the residual network; capacities are validated by the network.
    pub fn to_network(&self) -> Result<FlowNetwork, DatasetError> {
        Ok(FlowNetwork::from_edges(self.node_count, self.edges.iter().copied())?)
    }
}

/// Load a dataset from a CSV file
pub fn load_csv(path: &Path) -> Result<Dataset, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_csv(BufReader::new(file)).map_err(|err| match err {
        DatasetError::Io { source, .. } => DatasetError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    info!(
        "loaded {} routes over {} nodes from {}",
        dataset.edges.len(),
        dataset.node_count,
        path.display()
    );
    Ok(dataset)
}

/// Parse CSV text. Blank lines are skipped; line numbers in errors are 1-based.
pub fn parse_csv<R: BufRead>(reader: R) -> Result<Dataset, DatasetError> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !matches!(line, Ok(text) if text.trim().is_empty()));

    let header = match lines.next() {
        Some((_, line)) => line.map_err(io_error)?,
        None => return Err(DatasetError::Empty),
    };
    let names: Vec<&str> = header.split(',').map(str::trim).collect();
    let mut positions = [0usize; 3];
    for (slot, column) in positions.iter_mut().zip(COLUMNS) {
        *slot = names
            .iter()
            .position(|name| *name == column)
            .ok_or(DatasetError::MissingColumn(column))?;
    }

    let mut edges = Vec::new();
    let mut max_id = 0usize;
    for (line_number, line) in lines {
        let line = line.map_err(io_error)?;
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != names.len() {
            return Err(DatasetError::ColumnCount {
                line: line_number,
                expected: names.len(),
                found: fields.len(),
            });
        }

        let mut values = [0i64; 3];
        for ((value, &position), column) in values.iter_mut().zip(&positions).zip(COLUMNS) {
            *value = fields[position]
                .parse()
                .map_err(|_| DatasetError::NotAnInteger {
                    line: line_number,
                    column,
                    value: fields[position].to_string(),
                })?;
        }

        let [source, target, capacity] = values;
        let source = node_id(line_number, COLUMNS[0], source)?;
        let target = node_id(line_number, COLUMNS[1], target)?;
        max_id = max_id.max(source).max(target);
        edges.push((source, target, capacity));
    }

    if edges.is_empty() {
        return Err(DatasetError::Empty);
    }
    debug!("parsed {} routes, largest node id {}", edges.len(), max_id);

    Ok(Dataset {
        node_count: max_id + 1,
        edges,
    })
}

fn node_id(line: usize, column: &'static str, value: i64) -> Result<usize, DatasetError> {
    usize::try_from(value).map_err(|_| DatasetError::NegativeNode {
        line,
        column,
        value,
    })
}

fn io_error(source: io::Error) -> DatasetError {
    DatasetError::Io {
        path: PathBuf::new(),
        source,
    }
}

/// Generate a random logistics network.
///
/// Every ordered pair of distinct nodes becomes a route with probability
/// `density`; a chain of capacity-50 hops of one to three nodes then
/// guarantees a path from node `0` to node `num_nodes - 1`.
pub fn generate<R: Rng>(num_nodes: usize, density: f64, rng: &mut R) -> Result<Dataset, DatasetError> {
    if num_nodes == 0 {
        return Err(DatasetError::NoNodes);
    }
    if !(0.0..=1.0).contains(&density) {
        return Err(DatasetError::InvalidDensity(density));
    }

    let mut edges = Vec::new();
    for i in 0..num_nodes {
        for j in 0..num_nodes {
            if i != j && rng.random::<f64>() < density {
                edges.push((i, j, rng.random_range(RANDOM_CAPACITY)));
            }
        }
    }

    let sink = num_nodes - 1;
    let mut current = 0;
    while current < sink {
        let next = (current + rng.random_range(1..=3usize)).min(sink);
        edges.push((current, next, CHAIN_CAPACITY));
        current = next;
    }

    Ok(Dataset {
        node_count: num_nodes,
        edges,
    })
}

/// Write a dataset as CSV with the standard header
pub fn write_csv(path: &Path, dataset: &Dataset) -> Result<(), DatasetError> {
    let wrap = |source: io::Error| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(wrap)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", COLUMNS.join(",")).map_err(wrap)?;
    for (source, target, capacity) in &dataset.edges {
        writeln!(writer, "{},{},{}", source, target, capacity).map_err(wrap)?;
    }
    writer.flush().map_err(wrap)?;

    info!("generated {} with {} edges", path.display(), dataset.edges.len());
    Ok(())
}
