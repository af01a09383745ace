// Per node-type styling, built once and handed to the registry

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const SOURCE_DOMAIN_STYLE: &str = "source_domain";
pub const BTC_ADDRESS_STYLE: &str = "btc_address";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Square => "square",
            Shape::Triangle => "triangle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub size: u32,
    pub color: String,
    pub stroke_color: String,
    pub stroke_width: u32,
    pub shape: Shape,
    pub label_size: u32,
    pub label_color: String,
    pub opacity: f32,
}

impl NodeStyle {
    fn new(
        size: u32,
        color: &str,
        stroke_color: &str,
        stroke_width: u32,
        shape: Shape,
        label_size: u32,
        opacity: f32,
    ) -> Self {
        Self {
            size,
            color: color.to_string(),
            stroke_color: stroke_color.to_string(),
            stroke_width,
            shape,
            label_size,
            label_color: "#2c3e50".to_string(),
            opacity,
        }
    }

    /// The secondary attributes the renderer reads from a node's `style` object.
    pub fn stroke(&self) -> StrokeStyle {
        StrokeStyle {
            stroke_color: self.stroke_color.clone(),
            stroke_width: self.stroke_width,
            label_size: self.label_size,
            label_color: self.label_color.clone(),
            opacity: self.opacity,
        }
    }
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            size: 20,
            color: "#666666".to_string(),
            stroke_color: "#333333".to_string(),
            stroke_width: 2,
            shape: Shape::Circle,
            label_size: 14,
            label_color: "#333333".to_string(),
            opacity: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub stroke_color: String,
    pub stroke_width: u32,
    pub label_size: u32,
    pub label_color: String,
    pub opacity: f32,
}

/// Immutable lookup from node-type tag to style.
#[derive(Debug, Clone)]
pub struct StyleTable {
    styles: IndexMap<String, NodeStyle>,
    fallback: NodeStyle,
}

impl StyleTable {
    pub fn new(styles: IndexMap<String, NodeStyle>) -> Self {
        Self {
            styles,
            fallback: NodeStyle::default(),
        }
    }

    pub fn get(&self, node_type: &str) -> Option<&NodeStyle> {
        self.styles.get(node_type)
    }

    /// Style for `node_type`, else the style registered as `fallback_type`,
    /// else the built-in default.
    pub fn resolve(&self, node_type: &str, fallback_type: &str) -> &NodeStyle {
        self.styles
            .get(node_type)
            .or_else(|| self.styles.get(fallback_type))
            .unwrap_or(&self.fallback)
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.styles.contains_key(node_type)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        let mut styles = IndexMap::new();
        styles.insert(
            SOURCE_DOMAIN_STYLE.to_string(),
            NodeStyle::new(30, "#e74c3c", "#c0392b", 3, Shape::Circle, 16, 0.9),
        );
        styles.insert(
            "lookalike_domain".to_string(),
            NodeStyle::new(25, "#3498db", "#2980b9", 2, Shape::Circle, 14, 0.8),
        );
        styles.insert(
            "same_ip_domain".to_string(),
            NodeStyle::new(25, "#1abc9c", "#16a085", 2, Shape::Circle, 14, 0.8),
        );
        styles.insert(
            BTC_ADDRESS_STYLE.to_string(),
            NodeStyle::new(35, "#f39c12", "#e67e22", 3, Shape::Square, 12, 0.9),
        );
        styles.insert(
            "eth_address".to_string(),
            NodeStyle::new(30, "#9b59b6", "#8e44ad", 2, Shape::Circle, 12, 0.9),
        );
        styles.insert(
            "tron_address".to_string(),
            NodeStyle::new(30, "#e74c3c", "#c0392b", 2, Shape::Triangle, 12, 0.9),
        );
        Self::new(styles)
    }
}
