use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::{ChildNode, Node};

/// A fully resolved grammar: every kind, in flattened declaration order.
///
/// Built once by the loader and only read afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Grammar {
    root_class: String,
    nodes: Vec<Node>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Grammar {
    pub(crate) fn new(root_class: String, nodes: Vec<Node>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.class_name.clone(), i))
            .collect();
        Self {
            root_class,
            nodes,
            index,
        }
    }

    /// Name of the class every top-level kind derives from.
    pub fn root_class(&self) -> &str {
        &self.root_class
    }

    /// All kinds, abstract and concrete, in flattened declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, class_name: &str) -> Option<&Node> {
        self.index.get(class_name).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.index.contains_key(class_name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Kinds that can be instantiated and must be handled by every concrete visitor.
    pub fn concrete(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.is_abstract)
    }

    pub fn abstract_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_abstract)
    }

    /// Kinds whose `base_class` is `class_name`.
    pub fn derived_from<'a>(&'a self, class_name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| n.base_class == class_name)
    }

    /// First declaration of each overriding getter, in declaration order.
    ///
    /// The root class declares one virtual per entry.
    pub fn override_getters(&self) -> Vec<&ChildNode> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .flat_map(|n| n.children.iter())
            .filter(|c| c.getter.is_override && seen.insert(c.getter_name()))
            .collect()
    }

    /// Kinds ordered so every base precedes the kinds deriving from it.
    ///
    /// Declaration order is kept wherever it already satisfies that, so the result is
    /// stable for an unchanged grammar.
    pub fn in_dependency_order(&self) -> Vec<&Node> {
        let mut placed: HashSet<&str> = HashSet::with_capacity(self.nodes.len());
        let mut ordered = Vec::with_capacity(self.nodes.len());

        for node in &self.nodes {
            let mut chain = Vec::new();
            let mut current = Some(node);
            while let Some(n) = current {
                if placed.contains(n.class_name.as_str()) || chain.iter().any(|c: &&Node| c.class_name == n.class_name) {
                    break;
                }
                chain.push(n);
                current = self.get(&n.base_class);
            }
            for n in chain.into_iter().rev() {
                placed.insert(n.class_name.as_str());
                ordered.push(n);
            }
        }

        ordered
    }
}
