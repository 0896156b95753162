use chrono::{DateTime, Utc};

use crate::world::types::{NodeRecord, RegionRecord};

/// Node where new characters start when no other location is configured.
pub const DEFAULT_START_LOCATION: &str = "town:square";

/// Region keys of the starter world inserted into a fresh store.
pub const STARTER_REGION_KEYS: &[&str] = &["town", "forest", "coast"];

/// Location keys of every node in the starter world.
pub const STARTER_NODE_KEYS: &[&str] = &[
    DEFAULT_START_LOCATION,
    "town:lab",
    "town:gate",
    "forest:trailhead",
    "forest:clearing",
    "forest:hollow_log",
    "coast:boardwalk",
    "coast:tide_pools",
];

/// Regions and nodes of the starter world, stamped with `now`.
pub fn canonical_world_seed(now: DateTime<Utc>) -> (Vec<RegionRecord>, Vec<NodeRecord>) {
    let regions = vec![
        RegionRecord::new("town", "Brindle Town")
            .with_description("A quiet town where every journey begins.")
            .with_created_at(now),
        RegionRecord::new("forest", "Whisperwood")
            .with_description("Dense woods full of bug-type monsters.")
            .with_created_at(now),
        RegionRecord::new("coast", "Saltmarsh Coast")
            .with_description("Wind-swept dunes and rock pools.")
            .with_created_at(now),
    ];

    let nodes = vec![
        NodeRecord::new("town", "square", "Town Square")
            .with_description("A fountain burbles beside the notice board.")
            .with_created_at(now),
        NodeRecord::new("town", "lab", "Professor's Lab")
            .with_description("Shelves of capture spheres line the walls.")
            .with_created_at(now),
        NodeRecord::new("town", "gate", "North Gate")
            .with_description("The road out of town leads toward the trees.")
            .with_created_at(now),
        NodeRecord::new("forest", "trailhead", "Trailhead")
            .with_description("A worn path disappears into the canopy.")
            .with_created_at(now),
        NodeRecord::new("forest", "clearing", "Sunlit Clearing")
            .with_description("Tall grass rustles though there is no wind.")
            .with_created_at(now),
        NodeRecord::new("forest", "hollow_log", "Hollow Log")
            .with_description("Something small is sleeping inside.")
            .with_created_at(now),
        NodeRecord::new("coast", "boardwalk", "Boardwalk")
            .with_description("Weathered planks creak over the sand.")
            .with_created_at(now),
        NodeRecord::new("coast", "tide_pools", "Tide Pools")
            .with_description("Shells glint in the shallow water.")
            .with_created_at(now),
    ];

    (regions, nodes)
}
