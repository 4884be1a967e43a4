/*

    Compute per-label bounding boxes of a chunked 3D label volume.

    Reads a small JSON descriptor pointing at a raw label file,
    scans the volume chunk by chunk in parallel, and writes the
    (max_label, 6) bounding box table as JSON.

    @date: 14 Dec, 2025
    @author: Bartu

*/

use std::{self, env, path::Path};
use tracing::{info, warn, error};
use tracing_subscriber;

use voxbound::executor::compute_bboxes;
use voxbound::json_parser::parse_descriptor;

fn main() -> Result<(), Box<dyn std::error::Error>> {

    // Logging on console
    tracing_subscriber::fmt::init();

    // Parse args
    let args: Vec<String> = env::args().collect();
    let descriptor_path: String = if args.len() == 1 {
        warn!("No arguments were provided, setting default descriptor path...");
        String::from("./inputs/volume.json")
    } else if args.len() == 2 {
        args[1].clone()
    } else {
        error!("Usage: {} <descriptor>.json", args[0]);
        std::process::exit(1);
    };

    // Parse descriptor JSON
    info!("Loading volume descriptor from {}...", descriptor_path);
    let root = parse_descriptor(&descriptor_path).map_err(|e| {
        error!("Failed to load descriptor: {}", e);
        e
    })?;

    // Raw label files are located relative to the descriptor
    let descriptor_path = Path::new(&descriptor_path).canonicalize()?;
    let base = descriptor_path.parent().unwrap_or(Path::new("."));
    let volume = root.volume.load_volume(base)?;

    // Scan all chunks and reduce into the global table
    let result = compute_bboxes(&volume, &root.config)?;

    // Write the table to .json file
    let output = root.output.as_deref().unwrap_or("./bboxes.json");
    result.table.save_json(output)?;

    info!("Finished execution.");
    Ok(())
}
