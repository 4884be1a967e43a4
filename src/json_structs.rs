/*

    Declare data structs needed to parse volume descriptor JSON.

    - RootDescriptor: whole descriptor file
    - VolumeDescriptor: shape, chunking and raw label file of the volume
    - LabelDtype: element type of the raw label file

    A descriptor points at a single raw little-endian label file; the
    heavy multi-file assembly (NetCDF concatenation and friends) is the
    job of an external loader, not this crate. The label field is
    accepted under either of its two historical names, "Labels" or
    "Tomo", whichever convention produced the files.

    @date: 14 Dec, 2025
    @author: Bartu
*/

use std::path::{Path, PathBuf};

use ndarray::Array3;

use crate::executor::BBoxConfig;
use crate::json_parser::{deser_triple};
use crate::volume::InMemoryVolume;
use crate::prelude::*;

#[derive(Debug, Deserialize)]
pub struct RootDescriptor {
    #[serde(rename = "Volume")]
    pub volume: VolumeDescriptor,

    #[serde(flatten)]
    pub config: BBoxConfig,

    #[serde(rename = "Output", default)]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VolumeDescriptor {
    #[serde(rename = "Shape", deserialize_with = "deser_triple")]
    pub shape: [usize; 3],

    #[serde(rename = "ChunkShape", deserialize_with = "deser_triple")]
    pub chunk_shape: [usize; 3],

    #[serde(rename = "Labels", alias = "Tomo")]
    pub labels_relative_path: String,

    #[serde(rename = "Dtype", default)]
    pub dtype: LabelDtype,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[derive(SmartDefault)]
pub enum LabelDtype {
    #[serde(rename = "u8")]
    U8,
    #[default]
    #[serde(rename = "u16")]
    U16,
    #[serde(rename = "u32")]
    U32,
}

impl LabelDtype {
    pub fn size_bytes(&self) -> usize {
        match self {
            LabelDtype::U8 => 1,
            LabelDtype::U16 => 2,
            LabelDtype::U32 => 4,
        }
    }
}

impl VolumeDescriptor {

    pub fn num_voxels(&self) -> usize {
        self.shape[0] * self.shape[1] * self.shape[2]
    }

    /// Read the raw label file (little-endian, x-major layout) into an
    /// in-memory volume. `base` is the descriptor's folder; label paths
    /// are resolved relative to the descriptor file.
    pub fn load_volume(&self, base: &Path) -> Result<InMemoryVolume, Box<dyn std::error::Error>> {
        let path: PathBuf = base.join(&self.labels_relative_path);
        info!("Reading labels from {:?}", path);

        let bytes = std::fs::read(&path)?;
        let expected = self.num_voxels() * self.dtype.size_bytes();
        if bytes.len() != expected {
            return Err(format!(
                "Label file {:?} holds {} bytes but Shape {:?} with Dtype {:?} needs {}",
                path, bytes.len(), self.shape, self.dtype, expected
            ).into());
        }

        let data: Vec<Label> = match self.dtype {
            LabelDtype::U8 => bytes.iter().map(|&b| b as Label).collect(),
            LabelDtype::U16 => bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]) as Label)
                .collect(),
            LabelDtype::U32 => bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]) as Label)
                .collect(),
        };

        let labels = Array3::from_shape_vec(
            (self.shape[0], self.shape[1], self.shape[2]),
            data,
        )?;
        Ok(InMemoryVolume::new(labels, self.chunk_shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_accepts_both_field_names() {
        let with_labels = r#"{
            "Volume": {
                "Shape": "8 8 8",
                "ChunkShape": [4, 4, 4],
                "Labels": "labels.raw"
            },
            "MaxLabel": "128"
        }"#;
        let root: RootDescriptor = serde_json::from_str(with_labels).unwrap();
        assert_eq!(root.volume.shape, [8, 8, 8]);
        assert_eq!(root.volume.chunk_shape, [4, 4, 4]);
        assert_eq!(root.volume.labels_relative_path, "labels.raw");
        assert_eq!(root.volume.dtype, LabelDtype::U16);
        assert_eq!(root.config.max_label, 128);
        assert!(root.output.is_none());

        let with_tomo = r#"{
            "Volume": {
                "Shape": [8, 8, 8],
                "ChunkShape": "4 4 4",
                "Tomo": "tomo.raw",
                "Dtype": "u32"
            },
            "Output": "out.json"
        }"#;
        let root: RootDescriptor = serde_json::from_str(with_tomo).unwrap();
        assert_eq!(root.volume.labels_relative_path, "tomo.raw");
        assert_eq!(root.volume.dtype, LabelDtype::U32);
        assert_eq!(root.config.max_label, 10_000); // default
        assert_eq!(root.output.as_deref(), Some("out.json"));
    }

    #[test]
    fn test_load_volume_from_raw_u16() {
        let dir = std::env::temp_dir().join(format!("voxbound_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        // 2x2x2 volume, voxel (1,0,1) = 7, rest background
        let mut raw = vec![0u8; 16];
        let flat_index = 5; // (x * ny + y) * nz + z for voxel (1,0,1)
        raw[flat_index * 2..flat_index * 2 + 2].copy_from_slice(&7u16.to_le_bytes());
        std::fs::write(dir.join("labels.raw"), &raw).unwrap();

        let descriptor = VolumeDescriptor {
            shape: [2, 2, 2],
            chunk_shape: [1, 2, 2],
            labels_relative_path: "labels.raw".to_string(),
            dtype: LabelDtype::U16,
        };
        let volume = descriptor.load_volume(&dir).unwrap();
        let chunk = crate::volume::LabelVolume::chunk(&volume, [1, 0, 0]).unwrap();
        assert_eq!(chunk[[0, 0, 1]], 7);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_volume_rejects_size_mismatch() {
        let dir = std::env::temp_dir().join(format!("voxbound_test_short_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("short.raw"), [0u8; 3]).unwrap();

        let descriptor = VolumeDescriptor {
            shape: [2, 2, 2],
            chunk_shape: [2, 2, 2],
            labels_relative_path: "short.raw".to_string(),
            dtype: LabelDtype::U8,
        };
        assert!(descriptor.load_volume(&dir).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
