use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Entity, MediaSource, missing};
use crate::Result;
use crate::config::QueryHashes;
use crate::json::{lookup, opt_bool, opt_str, opt_u64};

/// Latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Location identified by numeric id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub has_public_page: Option<bool>,
    pub coordinates: Option<Coordinates>,
    pub media_count: Option<u64>,
}

impl Location {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

fn as_f64(value: &Value, path: &str) -> Option<f64> {
    lookup(value, path).and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    })
}

impl Entity for Location {
    const KIND: &'static str = "location";
    const PAYLOAD_PATH: &'static str = "graphql.location";

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn page_path(&self) -> String {
        format!("/explore/locations/{}/", self.id)
    }

    fn populate(&mut self, node: &Value) -> Result<()> {
        let mut next = self.clone();
        if let Some(slug) = opt_str(node, "slug") {
            next.slug = Some(slug);
        }
        if let Some(name) = opt_str(node, "name") {
            next.name = Some(name);
        }
        if let Some(flag) = opt_bool(node, "has_public_page") {
            next.has_public_page = Some(flag);
        }
        if let (Some(latitude), Some(longitude)) = (as_f64(node, "lat"), as_f64(node, "lng")) {
            next.coordinates = Some(Coordinates { latitude, longitude });
        }
        if let Some(count) = opt_u64(node, "edge_location_to_media.count") {
            next.media_count = Some(count);
        }

        let checks = [
            ("slug", next.slug.is_some()),
            ("name", next.name.is_some()),
            ("has_public_page", next.has_public_page.is_some()),
            ("lat/lng", next.coordinates.is_some()),
            ("edge_location_to_media", next.media_count.is_some()),
        ];
        if let Some((field, _)) = checks.iter().find(|(_, present)| !present) {
            return Err(missing(Self::KIND, &self.key(), field));
        }

        *self = next;
        Ok(())
    }
}

impl MediaSource for Location {
    const MEDIA_EDGE_PATH: &'static str = "data.location.edge_location_to_media";

    fn media_query_hash(hashes: &QueryHashes) -> &str {
        &hashes.location_media
    }

    fn media_variables(&self) -> Option<Map<String, Value>> {
        let mut vars = Map::new();
        vars.insert("id".to_string(), Value::String(self.id.to_string()));
        Some(vars)
    }

    fn media_count(&self) -> Option<u64> {
        self.media_count
    }

    fn set_media_count(&mut self, count: u64) {
        self.media_count = Some(count);
    }
}
