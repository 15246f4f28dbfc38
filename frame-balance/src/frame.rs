use serde::{Deserialize, Serialize};

/// A rendered frame: a visual tree for the image layer plus an ordered
/// list of intents (buttons/links) driving the next request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResponse {
    pub image: VisualNode,
    pub intents: Vec<Intent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisualNode {
    Container {
        style: Style,
        children: Vec<VisualNode>,
    },
    Text {
        style: Style,
        content: String,
    },
    Image {
        url: String,
        width: u32,
        height: u32,
        style: Style,
    },
}

impl VisualNode {
    pub fn container(style: Style, children: Vec<VisualNode>) -> VisualNode {
        VisualNode::Container { style, children }
    }

    pub fn text(content: impl Into<String>, style: Style) -> VisualNode {
        VisualNode::Text {
            style,
            content: content.into(),
        }
    }

    pub fn image(url: impl Into<String>, width: u32, height: u32, style: Style) -> VisualNode {
        VisualNode::Image {
            url: url.into(),
            width,
            height,
            style,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Start,
    Center,
    End,
}

/// A single frame action. `Post` triggers a follow-up render of an
/// internal route, `Link` opens an external URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Intent {
    Post { label: String, route: String },
    Link { label: String, url: String },
}

impl Intent {
    pub fn post(label: impl Into<String>, route: impl Into<String>) -> Intent {
        Intent::Post {
            label: label.into(),
            route: route.into(),
        }
    }

    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Intent {
        Intent::Link {
            label: label.into(),
            url: url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn intents_serialize_with_action_tag() {
        let intents = vec![
            Intent::post("Refresh", "/check"),
            Intent::link("View on explorer", "https://etherscan.io/address/0x00"),
        ];
        let json = serde_json::to_value(&intents).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"action": "post", "label": "Refresh", "route": "/check"},
                {"action": "link", "label": "View on explorer", "url": "https://etherscan.io/address/0x00"},
            ])
        );
    }

    #[test]
    fn style_skips_absent_fields() {
        let node = VisualNode::text(
            "hello",
            Style {
                color: Some("white".into()),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "text", "content": "hello", "style": {"color": "white"}})
        );
    }
}
