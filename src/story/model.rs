use std::collections::BTreeSet;

use crate::foundation::error::{PlotlineError, PlotlineResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Whether a group denotes a synchronous meeting or mere co-presence.
pub enum GroupKind {
    /// All members interact at this layer.
    #[default]
    Active,
    /// Members are co-located or in transit, not meeting.
    Inactive,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// An ordered, non-empty set of characters appearing together at one layer.
pub struct Group {
    /// Meeting vs. co-presence marker.
    pub kind: GroupKind,
    /// Members in their fixed top-to-bottom order.
    pub characters: Vec<String>,
}

impl Group {
    /// Build an active (meeting) group.
    pub fn active(characters: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            kind: GroupKind::Active,
            characters: characters.into_iter().map(Into::into).collect(),
        }
    }

    /// Build an inactive (co-presence) group.
    pub fn inactive(characters: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            kind: GroupKind::Inactive,
            characters: characters.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of members.
    pub fn size(&self) -> usize {
        self.characters.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One discrete time step: an ordered sequence of groups.
pub struct Layer {
    /// Groups in top-to-bottom order.
    pub groups: Vec<Group>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A realized storyline: ordered layers of ordered, fixed-membership groups.
///
/// This is the contract boundary with the upstream parser: a pure data model
/// that can be built programmatically or deserialized via Serde (JSON).
pub struct Storyline {
    /// Layers in time order.
    pub layers: Vec<Layer>,
}

impl Storyline {
    /// Build a storyline from layers.
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// Check structural invariants: every group is non-empty and no character
    /// appears in two groups of the same layer.
    pub fn validate(&self) -> PlotlineResult<()> {
        for (i, layer) in self.layers.iter().enumerate() {
            let mut seen = BTreeSet::new();
            for group in &layer.groups {
                if group.characters.is_empty() {
                    return Err(PlotlineError::structural(format!(
                        "layer {i} has an empty group"
                    )));
                }
                for c in &group.characters {
                    if !seen.insert(c.as_str()) {
                        return Err(PlotlineError::structural(format!(
                            "character '{c}' appears twice in layer {i}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A group annotated with its solved vertical anchor.
///
/// Member `k` of the group sits at `at_y + k`.
pub struct AlignedGroup {
    /// Meeting vs. co-presence marker.
    pub kind: GroupKind,
    /// Members in their fixed top-to-bottom order.
    pub characters: Vec<String>,
    /// Vertical coordinate of the first (topmost) member.
    pub at_y: f64,
}

impl AlignedGroup {
    /// Number of members.
    pub fn size(&self) -> usize {
        self.characters.len()
    }

    /// Vertical coordinates of the members, in order.
    pub fn member_positions(&self) -> impl Iterator<Item = (&str, f64)> {
        self.characters
            .iter()
            .enumerate()
            .map(|(k, c)| (c.as_str(), self.at_y + k as f64))
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A layer whose groups carry solved anchors.
pub struct AlignedLayer {
    /// Groups in top-to-bottom order.
    pub groups: Vec<AlignedGroup>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A storyline whose groups carry solved anchors, ready for justification.
pub struct AlignedStoryline {
    /// Layers in time order.
    pub layers: Vec<AlignedLayer>,
}

#[cfg(test)]
#[path = "../../tests/unit/story/model.rs"]
mod tests;
