//! Per-column helpers. Each returns a new frame; the input is left untouched.

use std::collections::HashMap;

use uplift_core::{DataFrame, Result, UpliftError};

/// Add `binned_{col}`: 0-based indices of `n` equal-width bins spanning
/// `[xmin, xmax]`. Values outside the range clip to the first or last bin.
pub fn create_binned_column(
    frame: &DataFrame,
    col: &str,
    n: usize,
    xmin: f64,
    xmax: f64,
) -> Result<DataFrame> {
    let values = frame.numeric(col)?;

    if xmax <= xmin {
        return Err(UpliftError::InvalidData("xmax must be greater than xmin".to_string()));
    }
    if n == 0 {
        return Err(UpliftError::InvalidData("number of bins must be positive".to_string()));
    }

    let width = (xmax - xmin) / n as f64;
    let mut edges: Vec<f64> = (0..=n).map(|i| xmin + width * i as f64).collect();
    edges[n] = xmax;

    let last = (n - 1) as f64;
    let binned: Vec<f64> = values
        .iter()
        .map(|&x| {
            if x.is_nan() {
                return last;
            }
            // edges[i] <= x < edges[i + 1]
            let idx = edges.partition_point(|&e| e <= x) as f64 - 1.0;
            idx.clamp(0.0, last)
        })
        .collect();

    let mut out = frame.clone();
    out.insert_column(format!("binned_{col}"), binned)?;
    Ok(out)
}

/// Each distinct value of `col`, in order of first appearance, with the rows it occurs in.
pub fn get_value_positions(frame: &DataFrame, col: &str) -> Result<Vec<(String, Vec<usize>)>> {
    let column = frame.column(col)?;

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut positions: Vec<(String, Vec<usize>)> = Vec::new();

    for row in 0..column.len() {
        let value = column.display(row).unwrap_or_default();
        match index.get(&value) {
            Some(&slot) => positions[slot].1.push(row),
            None => {
                index.insert(value.clone(), positions.len());
                positions.push((value, vec![row]));
            }
        }
    }

    Ok(positions)
}

/// Add `fun_{col}` holding `fun` applied to every value of `col`.
pub fn apply_function_to_column<F>(frame: &DataFrame, col: &str, fun: F) -> Result<DataFrame>
where
    F: Fn(f64) -> f64,
{
    let values: Vec<f64> = frame.numeric(col)?.iter().map(|&x| fun(x)).collect();

    let mut out = frame.clone();
    out.insert_column(format!("fun_{col}"), values)?;
    Ok(out)
}
