use crate::models::outputs::RenderOutputs;
use crate::KatanaError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Node type tag of nodes that produce renders.
pub const RENDER_KIND: &str = "Render";

/// Snapshot of one selected node as the host reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub outputs: RenderOutputs,
}

impl NodeInfo {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            outputs: RenderOutputs::default(),
        }
    }

    pub fn with_outputs(mut self, outputs: RenderOutputs) -> Self {
        self.outputs = outputs;
        self
    }
}

/// A selected node eligible for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTarget {
    name: String,
    outputs: RenderOutputs,
}

impl RenderTarget {
    pub fn from_node(node: &NodeInfo) -> Option<Self> {
        (node.kind == RENDER_KIND).then(|| Self {
            name: node.name.clone(),
            outputs: node.outputs.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_output(&self) -> Result<&Path, KatanaError> {
        self.outputs
            .primary()
            .ok_or_else(|| KatanaError::LookupExhausted {
                node: self.name.clone(),
                name: crate::models::outputs::PRIMARY.to_owned(),
            })
    }
}

/// Keep only render nodes, in the order the host reported them.
pub fn eligible_targets(nodes: &[NodeInfo]) -> Vec<RenderTarget> {
    nodes.iter().filter_map(RenderTarget::from_node).collect()
}
