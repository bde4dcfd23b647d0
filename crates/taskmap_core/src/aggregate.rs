use serde::{Deserialize, Serialize};

use crate::{Completion, Node, ParseAggregationPolicyError};

/// How an internal node turns its children's completions into a percentage.
///
/// The two policies disagree whenever sibling subtrees hold different leaf
/// counts. A board picks one and keeps it for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// `round(100 * completed_leaves / total_leaves)`.
    #[default]
    LeafWeighted,
    /// `round(mean(child percentages))`; every child weighs the same.
    MeanOfChildren,
}

impl AggregationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            AggregationPolicy::LeafWeighted => "leaf_weighted",
            AggregationPolicy::MeanOfChildren => "mean_of_children",
        }
    }

    fn combine(self, children: &[Completion]) -> Completion {
        let total = children.iter().map(|c| c.total).sum();
        let completed = children.iter().map(|c| c.completed).sum();
        let percentage = match self {
            AggregationPolicy::LeafWeighted => round_ratio(100 * u64::from(completed), u64::from(total)),
            AggregationPolicy::MeanOfChildren => {
                let sum: u64 = children.iter().map(|c| u64::from(c.percentage)).sum();
                round_ratio(sum, children.len() as u64)
            }
        };
        Completion {
            total,
            completed,
            percentage,
        }
    }
}

impl std::str::FromStr for AggregationPolicy {
    type Err = ParseAggregationPolicyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "leaf_weighted" | "leaves" => Ok(AggregationPolicy::LeafWeighted),
            "mean_of_children" | "mean" => Ok(AggregationPolicy::MeanOfChildren),
            _ => Err(ParseAggregationPolicyError(raw.to_string())),
        }
    }
}

/// Half-up rounding of `num / den`, clamped to a percentage.
fn round_ratio(num: u64, den: u64) -> u8 {
    if den == 0 {
        return 0;
    }
    let rounded = (2 * num + den) / (2 * den);
    rounded.min(100) as u8
}

/// Post-order aggregation over the whole subtree. Every visited node caches
/// its result; the root's completion is returned.
pub fn aggregate(node: &mut Node, policy: AggregationPolicy) -> Completion {
    let completion = if node.is_leaf() {
        Completion::leaf(node.checked)
    } else {
        let children: Vec<Completion> = node
            .children
            .iter_mut()
            .map(|child| aggregate(child, policy))
            .collect();
        policy.combine(&children)
    };
    node.completion = Some(completion);
    completion
}

/// Same result as [`aggregate`] without touching any cache.
pub fn completion_of(node: &Node, policy: AggregationPolicy) -> Completion {
    if node.is_leaf() {
        return Completion::leaf(node.checked);
    }
    let children: Vec<Completion> = node
        .children
        .iter()
        .map(|child| completion_of(child, policy))
        .collect();
    policy.combine(&children)
}
