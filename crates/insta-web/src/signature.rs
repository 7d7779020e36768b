//! Request signing
//!
//! The web API expects an `X-Instagram-GIS` header holding
//! `md5("{rhx_gis}:{signed}")`, where `signed` is the page path for entity
//! pages and the `variables` string for GraphQL queries.

use md5::{Digest, Md5};

/// Header carrying the request signature
pub const GIS_HEADER: &str = "X-Instagram-GIS";

/// Compute the signature for `signed` under the session's `rhx_gis`
pub fn gis(rhx_gis: &str, signed: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(rhx_gis.as_bytes());
    hasher.update(b":");
    hasher.update(signed.as_bytes());
    hex::encode(hasher.finalize())
}
