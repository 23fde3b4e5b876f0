use serde::Deserialize;
use serde::Serialize;

/// One aggregation bucket produced by a transformer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub key: String,
    pub value: f64,
    /// Named sub-values that add up to `value`, kept for drill-down.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
}

impl NormalizedItem {
    pub fn new(key: impl Into<String>, value: f64) -> NormalizedItem {
        Self {
            key: key.into(),
            value,
            components: Vec::new(),
        }
    }

    pub fn with_components(key: impl Into<String>, components: Vec<Component>) -> NormalizedItem {
        let value = components.iter().map(|c| c.value).sum();

        Self {
            key: key.into(),
            value,
            components,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub value: f64,
}

impl Component {
    pub fn new(name: impl Into<String>, value: f64) -> Component {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A node of a value tree, the unit of layout for treemaps and grids.
///
/// Leaves carry the value used for sizing, internal nodes sum their leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchicalNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchicalNode>,
}

impl HierarchicalNode {
    pub fn leaf(name: impl Into<String>, value: f64) -> HierarchicalNode {
        Self {
            name: name.into(),
            value: Some(value),
            children: Vec::new(),
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<HierarchicalNode>) -> HierarchicalNode {
        Self {
            name: name.into(),
            value: None,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The leaf's own value, or the sum of the descendant leaves.
    pub fn effective_value(&self) -> f64 {
        if self.is_leaf() {
            self.value.unwrap_or(0.0)
        } else {
            self.children.iter().map(HierarchicalNode::effective_value).sum()
        }
    }

    /// Names of all valued leaves, depth first.
    pub fn leaf_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_leaves(&mut |leaf| names.push(leaf.name.as_str()));
        names
    }

    /// All leaves, depth first.
    pub fn leaves(&self) -> Vec<&HierarchicalNode> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut |leaf| leaves.push(leaf));
        leaves
    }

    fn collect_leaves<'a>(&'a self, visit: &mut impl FnMut(&'a HierarchicalNode)) {
        if self.is_leaf() {
            if self.value.is_some() && !self.name.is_empty() {
                visit(self);
            }
        } else {
            for child in &self.children {
                child.collect_leaves(visit);
            }
        }
    }
}

/// The output of a transformer.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Items(Vec<NormalizedItem>),
    Tree(HierarchicalNode),
}

impl Normalized {
    pub fn is_empty(&self) -> bool {
        match self {
            Normalized::Items(items) => items.is_empty(),
            Normalized::Tree(root) => root.leaves().is_empty(),
        }
    }

    /// Flat view of the data: the items, or the leaves of the tree.
    pub fn items(&self) -> Vec<NormalizedItem> {
        match self {
            Normalized::Items(items) => items.clone(),
            Normalized::Tree(root) => root
                .leaves()
                .into_iter()
                .map(|leaf| NormalizedItem::new(leaf.name.clone(), leaf.effective_value()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> HierarchicalNode {
        HierarchicalNode::branch(
            "root",
            vec![
                HierarchicalNode::leaf("banana", 3.0),
                HierarchicalNode::branch(
                    "meals",
                    vec![
                        HierarchicalNode::leaf("burger", 2.0),
                        HierarchicalNode::leaf("", 10.0),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn internal_nodes_sum_their_leaves() {
        assert_eq!(tree().effective_value(), 15.0);
    }

    #[test]
    fn leaf_names_skip_unnamed_leaves() {
        assert_eq!(tree().leaf_names(), vec!["banana", "burger"]);
    }

    #[test]
    fn components_define_the_total() {
        let item = NormalizedItem::with_components(
            "beef",
            vec![Component::new("farm", 39.4), Component::new("transport", 0.6)],
        );

        assert!((item.value - 40.0).abs() < 1e-9);
    }

    #[test]
    fn empty_tree_is_empty() {
        let normalized = Normalized::Tree(HierarchicalNode::branch("root", Vec::new()));

        assert!(normalized.is_empty());
        assert!(Normalized::Items(Vec::new()).is_empty());
    }
}
