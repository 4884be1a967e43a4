/*

    Given a chunked label volume, compute the global bounding box
    table for every label.

    Each chunk is scanned by an independent worker into its own
    private table (no shared mutable state), and the tables are
    folded with rayon's try_reduce. That is a parallel tree
    reduction with the sentinel table as identity, so peak memory
    stays proportional to the worker count rather than the chunk
    count, and the first failing chunk short-circuits the remaining
    work instead of letting it run to completion.

    @date: 14 Dec, 2025
    @author: Bartu
*/

use rayon::prelude::*;
use std::time::Instant;

use crate::geometry::ChunkGrid;
use crate::scanner::{ChunkScan, scan_chunk};
use crate::table::BBoxTable;
use crate::volume::{LabelVolume, VolumeError, check_extent};
use crate::prelude::*;

#[derive(Debug, Clone, Copy, Deserialize)]
#[derive(SmartDefault)]
#[serde(default)]
pub struct BBoxConfig {
    /// Upper bound (exclusive) on label ids kept in the table. Must be
    /// chosen >= the true maximum label id of the volume, or the
    /// extents of higher labels are dropped (and counted).
    #[default = 10_000]
    #[serde(rename = "MaxLabel", deserialize_with = "crate::json_parser::deser_usize")]
    pub max_label: usize,
}

/// Final artifact of one computation.
#[derive(Debug, Clone)]
pub struct VolumeBBoxes {
    pub table: BBoxTable,
    /// Voxels whose label was >= max_label and therefore not recorded.
    pub dropped_voxels: u64,
}

pub fn compute_bboxes<V: LabelVolume>(
    volume: &V,
    config: &BBoxConfig,
) -> Result<VolumeBBoxes, VolumeError> {
    check_extent(volume.shape())?;

    let grid: ChunkGrid = volume.grid();
    let indices = grid.indices();
    info!(
        ">> Scanning {} chunks over a {:?} volume (max_label = {}).",
        indices.len(),
        grid.shape(),
        config.max_label
    );

    let start = Instant::now();

    // --- Rayon Multithreading ---
    let scan: ChunkScan = indices
        .par_iter()
        .map(|&index| -> Result<ChunkScan, VolumeError> {
            let voxels = volume.chunk(index)?;
            let offset = grid.offset_of(index);
            debug!("Scanning chunk {:?} at offset {:?}", index, offset);
            Ok(scan_chunk(voxels, config.max_label, offset))
        })
        .try_reduce(|| ChunkScan::identity(config.max_label), |a, b| Ok(a.merged(b)))?;
    // -----------------------------

    info!("Bounding box pass took: {:?}", start.elapsed());

    if scan.dropped > 0 {
        warn!(
            ">> {} voxels carried labels >= {} and were not recorded. Consider raising max_label.",
            scan.dropped, config.max_label
        );
    }

    Ok(VolumeBBoxes {
        table: scan.table,
        dropped_voxels: scan.dropped,
    })
}
