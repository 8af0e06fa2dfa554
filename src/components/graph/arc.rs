use super::node::NodeId;

/// Separator used in arc names, `"A<-->B"`.
pub const ARC_SEPARATOR: &str = "<-->";

/// An undirected connection between two distinct nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    nodes: [NodeId; 2],
    names: [String; 2],
    pub cost: u32,
}

impl Arc {
    pub(crate) fn new(a: NodeId, a_name: &str, b: NodeId, b_name: &str) -> Self {
        Self {
            nodes: [a, b],
            names: [a_name.to_string(), b_name.to_string()],
            cost: 1,
        }
    }

    pub fn name(&self) -> String {
        format!("{}{}{}", self.names[0], ARC_SEPARATOR, self.names[1])
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.nodes[0], self.nodes[1])
    }

    pub fn endpoint_names(&self) -> (&str, &str) {
        (&self.names[0], &self.names[1])
    }

    /// True if the arc joins `a` and `b`, in either order.
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.names[0] == a && self.names[1] == b) || (self.names[0] == b && self.names[1] == a)
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// The endpoint opposite to `id`.
    pub fn other(&self, id: NodeId) -> Option<NodeId> {
        match self.nodes {
            [a, b] if a == id => Some(b),
            [a, b] if b == id => Some(a),
            _ => None,
        }
    }
}

/// Splits `"A<-->B"` into its endpoint names.
pub fn split_arc_name(name: &str) -> Option<(&str, &str)> {
    let (a, b) = name.split_once(ARC_SEPARATOR)?;
    if a.is_empty() || b.is_empty() {
        return None;
    }
    Some((a, b))
}
