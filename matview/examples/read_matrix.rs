//! Read back a matrix written by the `write_matrix` example

use matview::{create_input, Backing, ChunkedDescriptor, InputMatrix};
use std::path::Path;
use std::time::Instant;

fn main() -> matview::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let descriptor_path = Path::new("example_store/descriptor.json");
    if !descriptor_path.exists() {
        println!("File '{}' not found!", descriptor_path.display());
        println!("   Run 'cargo run --example write_matrix' first");
        return Ok(());
    }

    let bytes = std::fs::read(descriptor_path)
        .map_err(|e| matview::MatrixError::Storage(e.to_string()))?;
    let descriptor: ChunkedDescriptor<f64> = serde_json::from_slice(&bytes)
        .map_err(|e| matview::MatrixError::MalformedInput(e.to_string()))?;

    println!("Matrix Information:");
    println!("   Dimensions: {} x {}", descriptor.nrow, descriptor.ncol);
    println!("   Kind: {}", descriptor.kind);
    println!("   Storage: {}", descriptor.storage);

    let mut matrix = create_input(Backing::ChunkedDisk {
        path: &descriptor.path,
        dataset: &descriptor.dataset,
        nrow: descriptor.nrow,
        ncol: descriptor.ncol,
    })?;

    let start = Instant::now();
    let first = matrix.get(0, 0)?;
    println!(
        "matrix[0, 0] = {first} in {:.3}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    let start = Instant::now();
    let mut nonzero = 0usize;
    for col in 0..matrix.ncol() {
        nonzero += matrix.col_values(col)?.iter().filter(|&&v| v != 0.0).count();
    }
    println!(
        "Column scan: {nonzero} non-zeros in {:.3}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    let start = Instant::now();
    let mut row = vec![0.0; matrix.ncol()];
    for r in 0..matrix.nrow().min(100) {
        matrix.get_row_full(r, &mut row)?;
    }
    println!(
        "Row scan (100 rows): {:.3}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}
