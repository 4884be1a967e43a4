/*

    Chunk grid arithmetic: translate a chunk's grid position into
    its shape and its global voxel offset.

    Chunks are regular along each axis except possibly the trailing
    one, which takes the remainder of the volume extent. Offsets are
    resolved per chunk at dispatch time rather than precomputed, so
    the grid metadata stays the single source of truth.

    Invalid grid indices are a contract violation and panic.

    @date: 12 Dec, 2025
    @author: bartu
*/

/// Position of a chunk in the chunk grid, one index per axis.
pub type ChunkIndex = [usize; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkGrid {
    shape: [usize; 3],       // total voxel extent of the volume
    chunk_shape: [usize; 3], // regular chunk extent; trailing chunks may be smaller
}

impl ChunkGrid {

    pub fn new(shape: [usize; 3], chunk_shape: [usize; 3]) -> Self {
        for axis in 0..3 {
            assert!(shape[axis] > 0, "volume extent must be positive on every axis");
            assert!(chunk_shape[axis] > 0, "chunk extent must be positive on every axis");
        }
        ChunkGrid { shape, chunk_shape }
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Number of chunks along each axis (trailing remainder counts as one).
    pub fn counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for axis in 0..3 {
            counts[axis] = self.shape[axis].div_ceil(self.chunk_shape[axis]);
        }
        counts
    }

    pub fn num_chunks(&self) -> usize {
        let c = self.counts();
        c[0] * c[1] * c[2]
    }

    /// Enumerate every chunk index of the grid.
    pub fn indices(&self) -> Vec<ChunkIndex> {
        let counts = self.counts();
        let mut indices = Vec::with_capacity(self.num_chunks());
        for i in 0..counts[0] {
            for j in 0..counts[1] {
                for k in 0..counts[2] {
                    indices.push([i, j, k]);
                }
            }
        }
        indices
    }

    /// Global coordinate of the chunk's first voxel.
    pub fn offset_of(&self, index: ChunkIndex) -> [usize; 3] {
        let counts = self.counts();
        let mut offset = [0; 3];
        for axis in 0..3 {
            assert!(
                index[axis] < counts[axis],
                "chunk index {:?} outside grid {:?}", index, counts
            );
            offset[axis] = index[axis] * self.chunk_shape[axis];
        }
        offset
    }

    /// Voxel extent of the chunk; trailing chunks are clipped to the volume.
    pub fn shape_of(&self, index: ChunkIndex) -> [usize; 3] {
        let offset = self.offset_of(index);
        let mut shape = [0; 3];
        for axis in 0..3 {
            shape[axis] = self.chunk_shape[axis].min(self.shape[axis] - offset[axis]);
        }
        shape
    }
}
