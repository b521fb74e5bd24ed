use std::cmp::Ordering;

use crate::fragment::TextFragment;
use crate::normalize::collapse_horizontal_whitespace;

/// A group of fragments that sit on the same text line.
///
/// The anchor is the `y` of the first fragment assigned to the cluster and is
/// never recomputed as members join. Membership is always tested against the
/// anchor, not against other members, so a slowly drifting sequence can give
/// a cluster a vertical extent larger than the tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCluster {
    anchor_y: f64,
    fragments: Vec<TextFragment>,
}

impl LineCluster {
    /// Open a cluster anchored on `first`.
    pub fn new(first: TextFragment) -> Self {
        Self {
            anchor_y: first.y,
            fragments: vec![first],
        }
    }

    /// The fixed anchor y-coordinate.
    pub fn anchor_y(&self) -> f64 {
        self.anchor_y
    }

    /// Members in insertion (y-sorted) order.
    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    /// Whether `fragment` lies within `tolerance` of the anchor (inclusive).
    pub fn accepts(&self, fragment: &TextFragment, tolerance: f64) -> bool {
        (self.anchor_y - fragment.y).abs() <= tolerance
    }

    fn push(&mut self, fragment: TextFragment) {
        self.fragments.push(fragment);
    }

    /// Join the members into one line string.
    ///
    /// Members are re-sorted by `x` ascending (stable), joined with a single
    /// space, and any run of spaces or tabs is collapsed.
    pub fn assemble(&self) -> String {
        let mut members: Vec<&TextFragment> = self.fragments.iter().collect();
        members.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
        let joined = members
            .iter()
            .map(|f| f.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        collapse_horizontal_whitespace(&joined).trim().to_string()
    }
}

/// Group sorted fragments into lines.
///
/// Expects fragments in reading order (see
/// [`sort_fragments`](crate::fragment::sort_fragments)). A single cluster is
/// kept open; each fragment either joins it (when within `tolerance` of the
/// anchor) or closes it and opens a new one. Clusters are returned in input
/// order, i.e. top-to-bottom.
pub fn cluster_fragments(sorted: Vec<TextFragment>, tolerance: f64) -> Vec<LineCluster> {
    let mut clusters = Vec::new();
    let mut current: Option<LineCluster> = None;

    for fragment in sorted {
        if let Some(cluster) = current.as_mut() {
            if cluster.accepts(&fragment, tolerance) {
                cluster.push(fragment);
                continue;
            }
        }
        if let Some(done) = current.replace(LineCluster::new(fragment)) {
            clusters.push(done);
        }
    }

    clusters.extend(current);
    clusters
}
