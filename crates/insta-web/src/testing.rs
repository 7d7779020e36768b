//! Fixtures shared by the unit tests

use serde_json::{Map, Value, json};
use wiremock::{Request, Respond, ResponseTemplate};

pub const RHX_GIS: &str = "rhx-secret";
pub const CSRF_TOKEN: &str = "csrf-token-123";

/// Home page embedding `window._sharedData`
pub fn homepage_html(rhx_gis: Option<&str>, csrf_token: &str) -> String {
    let mut data = json!({
        "config": {"csrf_token": csrf_token, "viewer": null},
        "country_code": "US",
    });
    if let Some(rhx) = rhx_gis {
        data["rhx_gis"] = json!(rhx);
    }
    format!(
        "<!DOCTYPE html><html><body>\
         <script type=\"text/javascript\">window._sharedData = {};</script>\
         </body></html>",
        data
    )
}

pub fn user_payload(username: &str, id: &str, media_count: usize) -> Value {
    json!({"graphql": {"user": {
        "id": id,
        "username": username,
        "full_name": "Test Account",
        "biography": "bio",
        "profile_pic_url": "https://cdn.example/p.jpg",
        "profile_pic_url_hd": "https://cdn.example/p_hd.jpg",
        "edge_follow": {"count": 10},
        "edge_followed_by": {"count": 20},
        "edge_owner_to_timeline_media": {"count": media_count, "edges": []},
        "is_private": false,
        "is_verified": false,
        "country_block": false
    }}})
}

pub fn media_payload(code: &str, likes: usize, comments: usize) -> Value {
    json!({"graphql": {"shortcode_media": {
        "__typename": "GraphImage",
        "id": "1900000000000000001",
        "shortcode": code,
        "taken_at_timestamp": 1543000000,
        "edge_media_preview_like": {"count": likes},
        "edge_media_to_parent_comment": {"count": comments},
        "comments_disabled": false,
        "is_video": false,
        "display_url": "https://cdn.example/photo.jpg",
        "display_resources": [{"src": "https://cdn.example/photo_640.jpg"}],
        "owner": {"id": "25025320", "username": "instagram"}
    }}})
}

pub fn location_payload(id: u64, media_count: usize) -> Value {
    json!({"graphql": {"location": {
        "id": id.to_string(),
        "name": "Test Place",
        "slug": "test-place",
        "has_public_page": true,
        "lat": 55.75,
        "lng": 37.61,
        "edge_location_to_media": {"count": media_count}
    }}})
}

pub fn tag_payload(name: &str, media_count: usize) -> Value {
    json!({"graphql": {"hashtag": {
        "name": name,
        "edge_hashtag_to_media": {"count": media_count},
        "edge_hashtag_to_top_posts": {"edges": [{"node": media_node(0)}]}
    }}})
}

pub fn media_node(i: usize) -> Value {
    json!({
        "__typename": "GraphImage",
        "id": format!("{}", 1000 + i),
        "shortcode": format!("M{}", i),
        "taken_at_timestamp": 1543000000 + i,
        "edge_media_preview_like": {"count": i},
        "edge_media_to_comment": {"count": 0},
        "is_video": false,
        "display_url": format!("https://cdn.example/{}.jpg", i)
    })
}

pub fn liker_node(i: usize) -> Value {
    json!({"id": format!("{}", i), "username": format!("liker{}", i), "is_verified": false})
}

pub fn comment_node(i: usize) -> Value {
    json!({
        "id": format!("{}", 5000 + i),
        "text": format!("comment {}", i),
        "created_at": 1543000000 + i,
        "owner": {"id": "7", "username": "commenter"}
    })
}

/// Serves `total` generated nodes paged by the `first`/`after` query variables.
///
/// Cursors are `cursor-{offset}`; `edge_path` is relative to `data`.
pub struct FeedResponder {
    pub edge_path: &'static str,
    pub total: usize,
    pub node: fn(usize) -> Value,
}

impl Respond for FeedResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let variables: Value = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "variables")
            .and_then(|(_, value)| serde_json::from_str(&value).ok())
            .unwrap_or(Value::Null);

        let first = variables["first"].as_u64().unwrap_or(12) as usize;
        let offset = variables["after"]
            .as_str()
            .and_then(|cursor| cursor.strip_prefix("cursor-"))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0)
            .min(self.total);
        let end = (offset + first).min(self.total);
        let has_next = end < self.total;

        let edges: Vec<Value> = (offset..end).map(|i| json!({"node": (self.node)(i)})).collect();
        let mut connection = json!({
            "count": self.total,
            "page_info": {
                "has_next_page": has_next,
                "end_cursor": if has_next { json!(format!("cursor-{}", end)) } else { Value::Null },
            },
            "edges": edges,
        });
        for key in self.edge_path.rsplit('.') {
            let mut wrapper = Map::new();
            wrapper.insert(key.to_string(), connection);
            connection = Value::Object(wrapper);
        }

        ResponseTemplate::new(200).set_body_json(json!({"data": connection, "status": "ok"}))
    }
}
