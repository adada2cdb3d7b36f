use crate::api::{ChainLink, EvolutionDetail};

/// The condition under which one creature evolves into another
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvolutionCondition {
    pub trigger: Option<String>,
    pub min_level: Option<i64>,
    pub item: Option<String>,
}

impl From<&EvolutionDetail> for EvolutionCondition {
    fn from(detail: &EvolutionDetail) -> Self {
        Self {
            trigger: detail.trigger.as_ref().map(|t| t.name.clone()),
            min_level: detail.min_level,
            item: detail.item.as_ref().map(|i| i.name.clone()),
        }
    }
}

/// A direct parent -> child edge of an evolution tree
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionEdge {
    pub from: String,
    pub to: String,
    /// The child's own details; may be empty
    pub conditions: Vec<EvolutionCondition>,
}

/// Flatten an evolution tree into its edges.
///
/// For each child, in order, the parent -> child edge is emitted before the
/// edges of the child's subtree.
pub fn flatten_chain(node: &ChainLink) -> Vec<EvolutionEdge> {
    let mut edges = Vec::new();

    for child in &node.evolves_to {
        edges.push(EvolutionEdge {
            from: node.species.name.clone(),
            to: child.species.name.clone(),
            conditions: child
                .evolution_details
                .iter()
                .map(EvolutionCondition::from)
                .collect(),
        });
        edges.extend(flatten_chain(child));
    }

    edges
}
