//! Seed data loaders for data-driven world initialization
//!
//! Operators can describe their own exploration graph in a JSON file
//! (see `data/seeds/world.json`) instead of relying on the built-in starter world.

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::world::types::{NodeRecord, RegionRecord};
use crate::world::GameError;

#[derive(Debug, Serialize, Deserialize)]
struct WorldSeed {
    #[serde(default)]
    regions: Vec<RegionSeed>,
    #[serde(default)]
    nodes: Vec<NodeSeed>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RegionSeed {
    key: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeSeed {
    region: String,
    key: String,
    name: String,
    #[serde(default)]
    description: String,
}

/// Parse a world seed document into region and node records.
pub fn parse_world_seed(contents: &str) -> Result<(Vec<RegionRecord>, Vec<NodeRecord>), GameError> {
    let seed: WorldSeed = serde_json::from_str(contents)?;
    let now = Utc::now();

    let regions = seed
        .regions
        .into_iter()
        .map(|r| {
            RegionRecord::new(&r.key, &r.name)
                .with_description(&r.description)
                .with_created_at(now)
        })
        .collect();

    let nodes = seed
        .nodes
        .into_iter()
        .map(|n| {
            NodeRecord::new(&n.region, &n.key, &n.name)
                .with_description(&n.description)
                .with_created_at(now)
        })
        .collect();

    Ok((regions, nodes))
}

/// Load regions and nodes from a JSON seed file such as `data/seeds/world.json`.
pub fn load_world_from_json<P: AsRef<Path>>(
    path: P,
) -> Result<(Vec<RegionRecord>, Vec<NodeRecord>), GameError> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_world_seed(&contents)
}
