//! Declarative traversal descriptions from a table's root node to a property.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `(a)-[:REL]->(b)`
    Outgoing,
    /// `(a)<-[:REL]-(b)`
    Incoming,
}

/// One relationship hop ending on a labelled node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hop {
    pub relationship: &'static str,
    pub direction: Direction,
    pub label: &'static str,
}

impl Hop {
    pub const fn outgoing(relationship: &'static str, label: &'static str) -> Self {
        Hop {
            relationship,
            direction: Direction::Outgoing,
            label,
        }
    }

    pub const fn incoming(relationship: &'static str, label: &'static str) -> Self {
        Hop {
            relationship,
            direction: Direction::Incoming,
            label,
        }
    }
}

/// Zero or more hops followed by the property read on the last node reached.
///
/// An empty hop list reads the property on the root node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphPath {
    pub hops: &'static [Hop],
    pub property: &'static str,
}

impl GraphPath {
    pub const fn own(property: &'static str) -> Self {
        GraphPath { hops: &[], property }
    }

    pub const fn via(hops: &'static [Hop], property: &'static str) -> Self {
        GraphPath { hops, property }
    }

    pub fn is_traversal(&self) -> bool {
        !self.hops.is_empty()
    }

    /// Renders the MATCH pattern starting at `root`; the last node is bound
    /// to `target`. Intermediate nodes stay anonymous.
    pub fn pattern(&self, root: &str, target: &str) -> String {
        let mut out = format!("({})", root);
        let last = self.hops.len().saturating_sub(1);
        for (i, hop) in self.hops.iter().enumerate() {
            let rel = match hop.direction {
                Direction::Outgoing => format!("-[:{}]->", hop.relationship),
                Direction::Incoming => format!("<-[:{}]-", hop.relationship),
            };
            out.push_str(&rel);
            if i == last {
                out.push_str(&format!("({}:{})", target, hop.label));
            } else {
                out.push_str(&format!("(:{})", hop.label));
            }
        }
        out
    }
}

impl fmt::Display for GraphPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hops.is_empty() {
            return write!(f, "e.{}", self.property);
        }
        write!(f, "{}.{}", self.pattern("e", "n"), self.property)
    }
}
