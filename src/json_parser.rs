/*

    Provide utilities to parse volume descriptor JSON files.

    The parser is somewhat robust, integer fields can be given both
    in quotes (string) or as is:

    e.g. In JSON file both
    "MaxLabel": "10000" and "MaxLabel": 10000
    works as max_label: usize in source code.

    Triples (Shape, ChunkShape) are accepted either as "<x> <y> <z>"
    strings or as plain [x, y, z] arrays.

    @date: 14 Dec, 2025
    @author: bartu
*/

use std::fs::File;
use std::io::BufReader;

use serde_json::{self, Value};
use serde::{Deserialize, Deserializer};
use serde::de::{self};

use crate::json_structs::RootDescriptor;
use crate::prelude::*;

pub fn parse_descriptor(path: &str) -> Result<RootDescriptor, Box<dyn std::error::Error>> {

    let span = tracing::span!(tracing::Level::INFO, "load_descriptor");
    let _enter = span.enter();

    // Open file
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    debug!("Reading descriptor from {}", path);

    // Parse JSON into descriptor structs
    let root: RootDescriptor = serde_json::from_reader(reader)?;
    Ok(root)
}

pub(crate) fn deser_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    /*
        Deserialize usize type given as either string or number in JSON
    */
    let s: Value = Deserialize::deserialize(deserializer)?;
    match s {
        Value::Number(n) => n.as_u64()
            .map(|v| v as usize)
            .ok_or_else(|| de::Error::custom("Invalid non-negative integer")),
        Value::String(s) => s.parse::<usize>()
            .map_err(|_| de::Error::custom("Failed to parse integer from string")),
        t => Err(de::Error::custom(format!("Expected int or string, found {t}"))),
    }
}

pub(crate) fn deser_triple<'de, D>(deserializer: D) -> Result<[usize; 3], D::Error>
where
    D: Deserializer<'de>,
{
    /*
        Deserialize a per-axis triple given as either "<x> <y> <z>"
        string or [x, y, z] array in JSON
    */
    let v: Value = Deserialize::deserialize(deserializer)?;
    let parts: Vec<usize> = match v {
        Value::String(s) => s
            .split_whitespace()
            .map(|tok| tok.parse::<usize>()
                .map_err(|_| de::Error::custom(format!("Failed to parse extent '{tok}'"))))
            .collect::<Result<_, _>>()?,
        Value::Array(arr) => arr
            .iter()
            .map(|n| n.as_u64()
                .map(|u| u as usize)
                .ok_or_else(|| de::Error::custom("Extents must be non-negative integers")))
            .collect::<Result<_, _>>()?,
        t => return Err(de::Error::custom(format!("Expected \"x y z\" or [x, y, z], found {t}"))),
    };
    if parts.len() != 3 {
        return Err(de::Error::custom(format!("Expected 3 extents, found {}", parts.len())));
    }
    Ok([parts[0], parts[1], parts[2]])
}
