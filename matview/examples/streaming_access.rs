//! Sequential versus random access over run-length encoded and CSC matrices

use matview::{CscMatrix, InputMatrix, RleMatrix};
use rand::seq::SliceRandom;
use std::time::Instant;

fn main() -> matview::Result<()> {
    env_logger::init();

    let (nrow, ncol) = (10_000, 50);

    // Runs of eight cells over the column-major flattening.
    let nruns = nrow * ncol / 8;
    let values: Vec<i32> = (0..nruns as i32).collect();
    let lengths = vec![8; nruns];
    let mut rle = RleMatrix::new(nrow, ncol, &values, &lengths)?;

    let start = Instant::now();
    for r in 0..nrow {
        rle.get(r, 0)?;
    }
    let sequential = start.elapsed();
    let stats = rle.cache_stats();
    println!(
        "RLE sequential: {:.3}ms ({} hits, {} lookups)",
        sequential.as_secs_f64() * 1000.0,
        stats.hits,
        stats.lookups
    );

    let mut order: Vec<usize> = (0..nrow).collect();
    order.shuffle(&mut rand::thread_rng());
    let start = Instant::now();
    for &r in &order {
        rle.get(r, 0)?;
    }
    let stats = rle.cache_stats();
    println!(
        "RLE random:     {:.3}ms ({} hits, {} lookups)",
        start.elapsed().as_secs_f64() * 1000.0,
        stats.hits,
        stats.lookups
    );

    // Banded CSC: every column stores every tenth row.
    let mut offsets = vec![0];
    let mut rows = Vec::new();
    for col in 0..ncol {
        rows.extend((col % 10..nrow).step_by(10));
        offsets.push(rows.len());
    }
    let csc_values = vec![1.0; rows.len()];
    let mut csc = CscMatrix::new(nrow, ncol, &offsets, &rows, &csc_values)?;

    let mut buffer = vec![0.0; ncol];
    let start = Instant::now();
    for r in 0..nrow {
        csc.get_row_full(r, &mut buffer)?;
    }
    println!(
        "CSC row scan:   {:.3}ms ({} re-seeks)",
        start.elapsed().as_secs_f64() * 1000.0,
        csc.row_reseeks()
    );
    Ok(())
}
