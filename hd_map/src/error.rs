use std::{error, fmt};

/// Fatal problems with the input annotations. Each names the offending entity by the id it was
/// authored with, so somebody can go fix it.
#[derive(Clone, PartialEq)]
pub enum MapError {
    /// A lane, boundary curve, stop line, or speed bump without at least 2 distinct points, so
    /// it has no direction.
    MalformedSegment { id: String, reason: String },
    /// A neighbor pointer that isn't mirrored by the neighbor.
    InconsistentAdjacency { lane: String, reason: String },
    /// A stop line or speed bump crosses one lane at several points that aren't clustered
    /// together.
    AmbiguousIntersection {
        feature: String,
        lane: String,
        num_points: usize,
    },
    /// A signal without a stop line, or a stop line touching no lane.
    MissingAssociation { feature: String, reason: String },
    /// Something refers to an id that doesn't exist.
    UnknownReference { from: String, to: String },
}

impl MapError {
    /// The authored id of the entity to fix.
    pub fn offending_id(&self) -> &str {
        match self {
            MapError::MalformedSegment { id, .. } => id,
            MapError::InconsistentAdjacency { lane, .. } => lane,
            MapError::AmbiguousIntersection { feature, .. } => feature,
            MapError::MissingAssociation { feature, .. } => feature,
            MapError::UnknownReference { from, .. } => from,
        }
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MapError::MalformedSegment { id, reason } => {
                write!(f, "malformed segment {}: {}", id, reason)
            }
            MapError::InconsistentAdjacency { lane, reason } => {
                write!(f, "inconsistent adjacency at lane {}: {}", lane, reason)
            }
            MapError::AmbiguousIntersection {
                feature,
                lane,
                num_points,
            } => write!(
                f,
                "{} crosses lane {} at {} points that don't form one cluster",
                feature, lane, num_points
            ),
            MapError::MissingAssociation { feature, reason } => {
                write!(f, "missing association for {}: {}", feature, reason)
            }
            MapError::UnknownReference { from, to } => {
                write!(f, "{} refers to unknown id {}", from, to)
            }
        }
    }
}

impl fmt::Debug for MapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Do the same thing as the Display trait
        write!(f, "{}", self)
    }
}

impl error::Error for MapError {}
