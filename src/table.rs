/*

    Dense label-id -> bounding box table.

    One table per chunk during the scan, one global table after
    reduction. Size is fixed at max_label so memory is bounded and
    lookups are a plain index, no hashing. Labels that never appear
    stay at BBox::EMPTY.

    @date: 12 Dec, 2025
    @author: Bartu
*/

use std::path::{Path, PathBuf};
use std::io::BufWriter;
use std::fs::File;

use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BBoxTable {
    boxes: Vec<BBox>,
}

impl BBoxTable {

    /// A table of max_label empty boxes, the identity of the reduction.
    pub fn empty(max_label: usize) -> Self {
        assert!(max_label > 0, "max_label must be at least 1");
        BBoxTable { boxes: vec![BBox::EMPTY; max_label] }
    }

    pub fn max_label(&self) -> usize {
        self.boxes.len()
    }

    /// Grow the entry of `label` to contain a global voxel coordinate.
    /// Caller guarantees label < max_label; the scanner filters before
    /// calling so this stays branch-free here.
    #[inline]
    pub fn expand(&mut self, label: usize, p: [Coord; 3]) {
        debug_assert!(label < self.boxes.len());
        self.boxes[label].expand(p);
    }

    pub fn get(&self, label: usize) -> &BBox {
        &self.boxes[label]
    }

    /// Fold another chunk's table into this one, entry by entry.
    pub fn merge(&mut self, other: &BBoxTable) {
        assert_eq!(
            self.max_label(), other.max_label(),
            "cannot merge tables built with different max_label"
        );
        for (mine, theirs) in self.boxes.iter_mut().zip(other.boxes.iter()) {
            mine.merge(theirs);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BBox> {
        self.boxes.iter()
    }

    /// Flatten to the (max_label, 6) row layout
    /// [x_min, y_min, z_min, x_max, y_max, z_max] per label.
    pub fn rows(&self) -> Vec<[Coord; 6]> {
        self.boxes.iter().map(|b| b.to_row()).collect()
    }

    pub fn save_json(&self, path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
        // Path is either a folder name or a full path including <name>.json;
        // if a folder is given the table lands in <folder>/bboxes.json.
        let path = Path::new(path);
        let mut finalpath: PathBuf = path.to_path_buf();
        if path.is_dir() {
            finalpath = path.join("bboxes.json");
        }

        let file = File::create(finalpath.clone())?;
        let w = BufWriter::new(file);
        serde_json::to_writer(w, &self.rows())?;
        info!("Bounding box table saved to {}", finalpath.display());
        Ok(finalpath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_entries_stay_sentinel() {
        let mut table = BBoxTable::empty(4);
        table.expand(2, [1, 2, 3]);

        assert_eq!(*table.get(0), BBox::EMPTY);
        assert_eq!(*table.get(1), BBox::EMPTY);
        assert_eq!(*table.get(3), BBox::EMPTY);
        assert_eq!(table.get(2).to_row(), [1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_merge_folds_per_label() {
        let mut a = BBoxTable::empty(3);
        a.expand(1, [0, 0, 0]);
        a.expand(2, [5, 5, 5]);

        let mut b = BBoxTable::empty(3);
        b.expand(1, [4, 2, 9]);

        a.merge(&b);
        assert_eq!(a.get(1).to_row(), [0, 0, 0, 4, 2, 9]);
        assert_eq!(a.get(2).to_row(), [5, 5, 5, 5, 5, 5]);
        assert_eq!(*a.get(0), BBox::EMPTY);
    }

    #[test]
    #[should_panic]
    fn test_merge_rejects_mismatched_sizes() {
        let mut a = BBoxTable::empty(3);
        let b = BBoxTable::empty(4);
        a.merge(&b);
    }
}
