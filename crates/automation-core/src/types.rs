use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Push payload key that asks the engine to look for a screen.
pub const PICK_SCREEN_KEY: &str = "pick_screen";
/// Namespaced form of [`PICK_SCREEN_KEY`] sent by the hosted push service.
pub const PICK_SCREEN_NAMESPACED_KEY: &str = "qonv.pick_screen";
pub const PICK_SCREEN_YES: &str = "1";

pub const SCREEN_VIEW_POINT_TYPE: &str = "screen_view";
pub const ACTIVE_POINT_STATUS: i32 = 1;

// ---------------------------------------------------------------------------
// ActionPoint
// ---------------------------------------------------------------------------

/// One server-defined automation trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPoint {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: i32,
    pub data: ActionPointTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPointTarget {
    #[serde(rename = "screen", alias = "screen_id")]
    pub screen_id: String,
}

impl ActionPoint {
    pub fn new(kind: impl Into<String>, status: i32, screen_id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            status,
            data: ActionPointTarget {
                screen_id: screen_id.into(),
            },
        }
    }

    pub fn screen_id(&self) -> &str {
        &self.data.screen_id
    }
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    pub id: String,
    /// Opaque renderable document; the wire name is `body`.
    #[serde(rename = "body")]
    pub html_page: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub background: String,
    #[serde(rename = "object", default)]
    pub object: String,
}

/// Everything a host display surface needs to present one screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRequest {
    pub screen_id: String,
    pub html_page: String,
}

impl DisplayRequest {
    pub fn new(screen_id: impl Into<String>, html_page: impl Into<String>) -> Self {
        Self {
            screen_id: screen_id.into(),
            html_page: html_page.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// PushPayload
// ---------------------------------------------------------------------------

/// Typed view of an inbound push's data map. Unrecognized keys are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushPayload {
    pub pick_screen: bool,
}

impl PushPayload {
    /// `pick_screen` is set when either the plain or the namespaced key
    /// carries `"1"`.
    pub fn from_map(data: &HashMap<String, String>) -> Self {
        let pick_screen = [PICK_SCREEN_KEY, PICK_SCREEN_NAMESPACED_KEY]
            .iter()
            .any(|key| data.get(*key).is_some_and(|v| v == PICK_SCREEN_YES));
        Self { pick_screen }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn pick_screen_one_is_flagged() {
        assert!(PushPayload::from_map(&payload(&[("pick_screen", "1")])).pick_screen);
        assert!(PushPayload::from_map(&payload(&[("qonv.pick_screen", "1")])).pick_screen);
    }

    #[test]
    fn either_key_can_flag() {
        let both = payload(&[("pick_screen", "0"), ("qonv.pick_screen", "1")]);
        assert!(PushPayload::from_map(&both).pick_screen);
        let both = payload(&[("pick_screen", "1"), ("qonv.pick_screen", "0")]);
        assert!(PushPayload::from_map(&both).pick_screen);
    }

    #[test]
    fn other_values_are_not_flagged() {
        for value in ["0", "true", "", " 1", "01"] {
            let p = PushPayload::from_map(&payload(&[("pick_screen", value)]));
            assert!(!p.pick_screen, "value {value:?} must not trigger");
        }
        assert!(!PushPayload::from_map(&payload(&[("title", "hi")])).pick_screen);
        assert!(!PushPayload::from_map(&HashMap::new()).pick_screen);
    }

    #[test]
    fn parse_action_point_json() {
        let json = r#"{"type":"screen_view","status":1,"data":{"screen":"s1"}}"#;
        let point: ActionPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point, ActionPoint::new("screen_view", 1, "s1"));
        assert_eq!(point.screen_id(), "s1");
    }

    #[test]
    fn parse_screen_json_maps_body_to_html_page() {
        let json = r##"{"id":"s1","body":"<html>A</html>","lang":"en","background":"#fff","object":"screen"}"##;
        let screen: Screen = serde_json::from_str(json).unwrap();
        assert_eq!(screen.id, "s1");
        assert_eq!(screen.html_page, "<html>A</html>");
        assert_eq!(screen.background, "#fff");
        assert_eq!(screen.object, "screen");
    }
}
