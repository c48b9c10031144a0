//! Loading graphs from edge-list style text.
//!
//! Three layouts are recognized from the first non-blank line:
//! - MatrixMarket coordinate files (`%%MatrixMarket` banner, then a
//!   `rows cols entries` size line, then 1-based `i j [value]` entries).
//! - DIMACS files (`c` comments, a `p edge N M` problem line, 1-based `e u v` lines).
//! - Plain edge lists: one 0-based `u v` pair per line, separated by whitespace
//!   or a comma; `#` and `%` start comment lines.

use super::Graph;
use crate::error::GraphError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Text layout of a graph file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphFormat {
    /// MatrixMarket coordinate format (1-based).
    MatrixMarket,
    /// DIMACS `p edge` / `e u v` format (1-based).
    Dimacs,
    /// Plain `u v` pairs (0-based).
    EdgeList,
}

impl GraphFormat {
    fn detect(line: &str) -> Self {
        if line.starts_with("%%MatrixMarket") {
            GraphFormat::MatrixMarket
        } else if matches!(line.split_whitespace().next(), Some("p" | "c" | "e")) {
            GraphFormat::Dimacs
        } else {
            GraphFormat::EdgeList
        }
    }
}

/// Loads a graph file, detecting its layout.
///
/// # Errors
/// Returns an error if the file cannot be read or a line is malformed.
pub fn read_graph(path: impl AsRef<Path>) -> Result<Graph, GraphError> {
    let file = File::open(path)?;
    read_from(BufReader::new(file))
}

/// Parses a graph held in memory.
///
/// # Errors
/// Returns an error if a line is malformed or an edge is out of range.
pub fn parse_graph(text: &str) -> Result<Graph, GraphError> {
    read_from(text.as_bytes())
}

/// Parses a graph from any buffered reader.
///
/// # Errors
/// Returns an error on I/O failure, malformed lines, or out-of-range edges.
pub fn read_from<R: BufRead>(reader: R) -> Result<Graph, GraphError> {
    let mut format = None;
    let mut declared: Option<usize> = None;
    let mut size_line_seen = false;
    let mut max_id: Option<usize> = None;
    let mut edges: Vec<(usize, usize)> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let fmt = *format.get_or_insert_with(|| GraphFormat::detect(trimmed));

        match fmt {
            GraphFormat::MatrixMarket => {
                if trimmed.starts_with('%') {
                    continue;
                }
                let fields = numbers(trimmed, lineno)?;
                if !size_line_seen {
                    let &[rows, cols, ..] = fields.as_slice() else {
                        return Err(malformed(lineno, "expected `rows cols entries` size line"));
                    };
                    declared = Some(rows.max(cols));
                    size_line_seen = true;
                    continue;
                }
                let (u, v) = endpoints(&fields, lineno)?;
                edges.push((one_based(u, lineno)?, one_based(v, lineno)?));
            }
            GraphFormat::Dimacs => {
                let mut parts = trimmed.split_whitespace();
                match parts.next() {
                    Some("c") => {}
                    Some("p") => {
                        let _kind = parts.next();
                        let n = parts
                            .next()
                            .and_then(|t| t.parse::<usize>().ok())
                            .ok_or_else(|| malformed(lineno, "expected `p edge N M`"))?;
                        declared = Some(n);
                    }
                    Some("e") => {
                        let rest: Vec<&str> = parts.collect();
                        let fields = numbers(&rest.join(" "), lineno)?;
                        let (u, v) = endpoints(&fields, lineno)?;
                        edges.push((one_based(u, lineno)?, one_based(v, lineno)?));
                    }
                    Some(other) => {
                        return Err(malformed(lineno, &format!("unknown DIMACS line type {other:?}")))
                    }
                    None => {}
                }
            }
            GraphFormat::EdgeList => {
                if trimmed.starts_with('#') || trimmed.starts_with('%') {
                    continue;
                }
                let fields = numbers(trimmed, lineno)?;
                let (u, v) = endpoints(&fields, lineno)?;
                edges.push((u, v));
            }
        }

        if let Some(&(u, v)) = edges.last() {
            let hi = u.max(v);
            max_id = Some(max_id.map_or(hi, |m| m.max(hi)));
        }
    }

    let n = match (declared, max_id) {
        (Some(n), _) => n,
        (None, Some(m)) => m + 1,
        (None, None) => 0,
    };
    Graph::from_edges(n, edges)
}

fn malformed(line: usize, reason: &str) -> GraphError {
    GraphError::Malformed {
        line,
        reason: reason.to_string(),
    }
}

/// Parses every separator-delimited token as an integer; trailing real-valued
/// weights (MatrixMarket `real` files) are tolerated after the first two fields.
fn numbers(text: &str, line: usize) -> Result<Vec<usize>, GraphError> {
    let mut out = Vec::with_capacity(3);
    for (i, tok) in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .enumerate()
    {
        match tok.parse::<usize>() {
            Ok(x) => out.push(x),
            Err(_) if i >= 2 && tok.parse::<f64>().is_ok() => {}
            Err(_) => return Err(malformed(line, &format!("invalid vertex id {tok:?}"))),
        }
    }
    Ok(out)
}

fn endpoints(fields: &[usize], line: usize) -> Result<(usize, usize), GraphError> {
    match fields {
        [u, v, ..] => Ok((*u, *v)),
        _ => Err(malformed(line, "expected two vertex ids")),
    }
}

fn one_based(id: usize, line: usize) -> Result<usize, GraphError> {
    id.checked_sub(1).ok_or(GraphError::ZeroIndex { line })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_edge_list_with_comments() {
        let g = parse_graph("# triangle\n0 1\n1,2\n\n2\t0\n% trailing comment\n").unwrap();
        assert_eq!(g.num_vertices(), 3);
        assert_eq!(g.num_edges(), 3);
        assert!(g.is_clique(&[0, 1, 2]));
    }

    #[test]
    fn matrix_market_is_one_based() {
        let text = "%%MatrixMarket matrix coordinate pattern symmetric\n% c\n4 4 3\n2 1\n3 1\n4 3\n";
        let g = parse_graph(text).unwrap();
        assert_eq!(g.num_vertices(), 4);
        assert_eq!(g.num_edges(), 3);
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(2, 3));
    }

    #[test]
    fn matrix_market_tolerates_weights() {
        let text = "%%MatrixMarket matrix coordinate real symmetric\n3 3 2\n2 1 0.5\n3 2 1e-3\n";
        let g = parse_graph(text).unwrap();
        assert_eq!(g.num_edges(), 2);
    }

    #[test]
    fn dimacs_declares_isolated_vertices() {
        let g = parse_graph("c sample\np edge 5 2\ne 1 2\ne 2 3\n").unwrap();
        assert_eq!(g.num_vertices(), 5);
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.degree(4), 0);
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_graph("0 1\n1 x\n").unwrap_err();
        assert!(matches!(err, GraphError::Malformed { line: 2, .. }));
        let err = parse_graph("0\n").unwrap_err();
        assert!(matches!(err, GraphError::Malformed { line: 1, .. }));
    }

    #[test]
    fn rejects_zero_in_one_based_formats() {
        let err = parse_graph("p edge 3 1\ne 0 1\n").unwrap_err();
        assert!(matches!(err, GraphError::ZeroIndex { line: 2 }));
    }

    #[test]
    fn rejects_edges_beyond_declared_size() {
        let err = parse_graph("p edge 2 1\ne 1 3\n").unwrap_err();
        assert!(matches!(err, GraphError::VertexOutOfRange { .. }));
    }

    #[test]
    fn empty_input_is_empty_graph() {
        let g = parse_graph("\n# nothing\n").unwrap();
        assert_eq!(g.num_vertices(), 0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_graph("/definitely/not/here.edges").unwrap_err();
        assert!(matches!(err, GraphError::Io(_)));
    }
}
