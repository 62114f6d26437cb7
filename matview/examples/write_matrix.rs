//! Write a matrix to a chunked dataset and save its descriptor

use matview::{
    create_output, InputFormat, OutputConfig, OutputMatrix, OutputPolicy, SequentialNamer,
};
use std::time::Instant;

fn main() -> matview::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let root = "example_store";
    let (nrow, ncol) = (2_000, 500);

    // A chunked source stays on disk unless simplified.
    let policy = OutputPolicy::Inferred {
        source: InputFormat::ChunkedDisk,
        simplify: false,
        sparsify: false,
        density: None,
    };
    let config = OutputConfig::default().with_chunk_dims(512, 64);
    let mut namer = SequentialNamer::new(root, "matrix");

    println!("Writing {nrow} x {ncol} matrix into '{root}'...");
    let start = Instant::now();
    let mut output = create_output::<f64>(nrow, ncol, &policy, &config, &mut namer)?;

    let mut column = vec![0.0; nrow];
    for col in 0..ncol {
        for (row, value) in column.iter_mut().enumerate() {
            *value = if (row + col) % 7 == 0 {
                (row * ncol + col) as f64
            } else {
                0.0
            };
        }
        output.fill_col_full(col, &column)?;
    }
    let finalized = output.finalize()?;
    println!("Written in {:.3}s", start.elapsed().as_secs_f64());

    if let matview::Finalized::Chunked(descriptor) = &finalized {
        let json = serde_json::to_string_pretty(descriptor)
            .map_err(|e| matview::MatrixError::Storage(e.to_string()))?;
        let path = format!("{root}/descriptor.json");
        std::fs::write(&path, json).map_err(|e| matview::MatrixError::Storage(e.to_string()))?;
        println!("Descriptor saved to '{path}'");
        println!("   Dataset: {}", descriptor.dataset);
        println!("   First value: {:?}", descriptor.first_value);
    }

    for record in namer.created() {
        println!(
            "Created {}/{} ({} x {}, {})",
            record.path.display(),
            record.dataset,
            record.nrow,
            record.ncol,
            record.kind
        );
    }
    Ok(())
}
