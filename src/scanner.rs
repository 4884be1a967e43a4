/*

    The hot kernel: scan one chunk's voxels into a per-chunk
    bounding box table.

    Iteration is x-outer / z-inner so the innermost loop walks the
    contiguous last axis of a standard-layout array; the z lane is
    pulled out as a plain slice when possible to keep bounds checks
    out of the inner loop. Single pass, no auxiliary memory beyond
    the fixed-size table, input is never mutated.

    Label 0 is background and skipped. Labels >= max_label are
    skipped too, but counted, so the caller can report how many
    voxels fell outside the table instead of losing them silently.

    @date: 13 Dec, 2025
    @author: bartu
*/

use ndarray::{ArrayView3, s};

use crate::numeric::{Coord, Label};
use crate::table::BBoxTable;

/// Result of scanning one chunk: the populated table plus the number
/// of voxels whose label did not fit below max_label.
#[derive(Debug, Clone)]
pub struct ChunkScan {
    pub table: BBoxTable,
    pub dropped: u64,
}

impl ChunkScan {
    /// Identity element of the reduction: all-sentinel table, zero drops.
    pub fn identity(max_label: usize) -> Self {
        ChunkScan { table: BBoxTable::empty(max_label), dropped: 0 }
    }

    pub fn merged(mut self, other: ChunkScan) -> Self {
        self.table.merge(&other.table);
        self.dropped += other.dropped;
        self
    }
}

#[inline]
fn scan_lane<'a>(
    lane: impl Iterator<Item = &'a Label>,
    gx: Coord,
    gy: Coord,
    z0: usize,
    max: Label,
    table: &mut BBoxTable,
    dropped: &mut u64,
) {
    for (z, &label) in lane.enumerate() {
        if label == 0 {
            continue; // background
        }
        if label >= max {
            *dropped += 1;
            continue;
        }
        let gz = (z + z0) as Coord;
        table.expand(label as usize, [gx, gy, gz]);
    }
}

/// Scan every voxel of a chunk, correcting chunk-local coordinates by
/// the chunk's global offset. O(voxel count), the dominant cost of the
/// whole computation.
pub fn scan_chunk(voxels: ArrayView3<'_, Label>, max_label: usize, offset: [usize; 3]) -> ChunkScan {
    let mut scan = ChunkScan::identity(max_label);
    let (nx, ny, _nz) = voxels.dim();
    let max = max_label as Label;

    for x in 0..nx {
        let gx = (x + offset[0]) as Coord;
        for y in 0..ny {
            let gy = (y + offset[1]) as Coord;
            let lane = voxels.slice(s![x, y, ..]);
            match lane.as_slice() {
                // Standard-layout input keeps the z lane contiguous.
                Some(zs) => scan_lane(
                    zs.iter(), gx, gy, offset[2], max,
                    &mut scan.table, &mut scan.dropped,
                ),
                None => scan_lane(
                    lane.iter(), gx, gy, offset[2], max,
                    &mut scan.table, &mut scan.dropped,
                ),
            }
        }
    }
    scan
}
