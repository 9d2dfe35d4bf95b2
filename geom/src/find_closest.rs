use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::{Bounds, Distance, Line, PolyLine, Pt3D};

/// A quick way to find the closest polyline to a point. Each polyline is indexed segment by
/// segment in an R-tree.
pub struct FindClosest<K> {
    tree: RTree<KeyedLine<K>>,
}

struct KeyedLine<K> {
    key: K,
    line: Line,
}

impl<K> RTreeObject for KeyedLine<K> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        Bounds::from(&[self.line.pt1(), self.line.pt2()]).as_aabb()
    }
}

impl<K> PointDistance for KeyedLine<K> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dist = self
            .line
            .project_pt(Pt3D::new(point[0], point[1], 0.0))
            .1
            .inner_meters();
        dist * dist
    }
}

impl<K> FindClosest<K>
where
    K: Clone + Ord + std::fmt::Debug,
{
    pub fn new() -> FindClosest<K> {
        FindClosest { tree: RTree::new() }
    }

    pub fn add(&mut self, key: K, pl: &PolyLine) {
        for line in pl.lines() {
            self.tree.insert(KeyedLine {
                key: key.clone(),
                line,
            });
        }
    }

    /// Finds the closest geometry within `max_dist_away` of the query point, returning its key,
    /// the closest point on it, and the distance. Ties go to the lowest key.
    pub fn closest_pt(
        &self,
        query_pt: Pt3D,
        max_dist_away: Distance,
    ) -> Option<(K, Pt3D, Distance)> {
        let query = [query_pt.x(), query_pt.y()];
        let mut best: Option<(K, Pt3D, Distance)> = None;
        for candidate in self.tree.nearest_neighbor_iter(&query) {
            let (pt, dist) = candidate.line.project_pt(query_pt);
            if dist > max_dist_away {
                break;
            }
            let replace = match &best {
                None => true,
                Some((best_key, _, best_dist)) => {
                    if dist > *best_dist {
                        break;
                    }
                    dist < *best_dist || candidate.key < *best_key
                }
            };
            if replace {
                best = Some((candidate.key.clone(), pt, dist));
            }
        }
        best
    }
}

impl<K> Default for FindClosest<K>
where
    K: Clone + Ord + std::fmt::Debug,
{
    fn default() -> Self {
        FindClosest::new()
    }
}
