/*

    Declare the LabelVolume collaborator interface and an in-memory
    implementation of it.

    The actual assembly of a volume from stored files (multi-file
    concatenation, schema/variable selection) lives outside this
    crate; whatever does it only needs to hand us chunked access to
    one logical 3D label field with a stable chunk grid.

    @date: 13 Dec, 2025
    @author: Bartu
*/

use ndarray::{Array3, ArrayView3, s};
use thiserror::Error;

use crate::geometry::{ChunkGrid, ChunkIndex};
use crate::numeric::{Coord, Label};

#[derive(Debug, Error)]
pub enum VolumeError {
    /// A chunk could not be retrieved or decoded. Fatal for the whole
    /// computation: a dropped chunk would silently under-report extents.
    #[error("failed to read chunk {index:?}: {reason}")]
    ChunkReadFailure { index: ChunkIndex, reason: String },

    /// Some axis extent does not fit the Coord type; widen Coord in
    /// numeric.rs instead of letting coordinates wrap.
    #[error("volume extent {extent:?} exceeds the coordinate range (at most {max} voxels per axis)")]
    VolumeTooLarge { extent: [usize; 3], max: usize },
}

/// Read-only chunked access to a 3D label field. Sync so that all
/// workers may read concurrently without synchronization.
pub trait LabelVolume: Sync {
    /// Total voxel extent (X, Y, Z).
    fn shape(&self) -> [usize; 3];

    /// The chunk grid tiling this volume.
    fn grid(&self) -> ChunkGrid;

    /// Dense voxel data of one chunk.
    fn chunk(&self, index: ChunkIndex) -> Result<ArrayView3<'_, Label>, VolumeError>;
}

/// A label volume held as one dense array, chunked logically. Used by
/// the CLI adapter and by tests; large datasets come in through their
/// own LabelVolume implementations instead.
pub struct InMemoryVolume {
    labels: Array3<Label>,
    grid: ChunkGrid,
}

impl InMemoryVolume {
    pub fn new(labels: Array3<Label>, chunk_shape: [usize; 3]) -> Self {
        let dim = labels.dim();
        let grid = ChunkGrid::new([dim.0, dim.1, dim.2], chunk_shape);
        InMemoryVolume { labels, grid }
    }
}

impl LabelVolume for InMemoryVolume {
    fn shape(&self) -> [usize; 3] {
        self.grid.shape()
    }

    fn grid(&self) -> ChunkGrid {
        self.grid
    }

    fn chunk(&self, index: ChunkIndex) -> Result<ArrayView3<'_, Label>, VolumeError> {
        let off = self.grid.offset_of(index);
        let ext = self.grid.shape_of(index);
        Ok(self.labels.slice(s![
            off[0]..off[0] + ext[0],
            off[1]..off[1] + ext[1],
            off[2]..off[2] + ext[2],
        ]))
    }
}

/// Check the volume extent against the Coord range before any scan work.
pub fn check_extent(shape: [usize; 3]) -> Result<(), VolumeError> {
    if shape.iter().all(|&e| crate::numeric::coord_fits(e)) {
        Ok(())
    } else {
        Err(VolumeError::VolumeTooLarge {
            extent: shape,
            max: Coord::MAX as usize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_views_cover_offsets() {
        let mut labels = Array3::<Label>::zeros((4, 4, 4));
        labels[[3, 2, 0]] = 7;
        let volume = InMemoryVolume::new(labels, [2, 4, 4]);

        // voxel (3,2,0) lives in the second chunk along x, at local (1,2,0)
        let chunk = volume.chunk([1, 0, 0]).unwrap();
        assert_eq!(chunk.dim(), (2, 4, 4));
        assert_eq!(chunk[[1, 2, 0]], 7);

        let first = volume.chunk([0, 0, 0]).unwrap();
        assert_eq!(first[[1, 2, 0]], 0);
    }

    #[test]
    fn test_check_extent() {
        assert!(check_extent([100, 32767, 1]).is_ok());
        assert!(matches!(
            check_extent([100, 32768, 1]),
            Err(VolumeError::VolumeTooLarge { .. })
        ));
    }
}
