//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree built by median split: sort surfaces by centroid along the
//! longest axis of their bounds and cut the list in half. Every surface ends
//! up in exactly one leaf. The tree is immutable after construction, so
//! queries can run from any number of threads.

use std::sync::Arc;

use lumen_math::{Aabb, Ray};

use crate::surface::{IntersectionRecord, Surface};

/// Lists shorter than this become leaves.
pub const DEFAULT_LEAF_SIZE: usize = 10;

/// BVH node - either a branch with two children or a leaf with surfaces.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of surfaces.
    Leaf {
        surfaces: Vec<Arc<dyn Surface>>,
        bbox: Aabb,
    },
    /// Empty tree.
    Empty,
}

/// Shape of a built tree, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BvhStats {
    pub surfaces: usize,
    pub nodes: usize,
    pub leaves: usize,
    pub depth: usize,
    pub largest_leaf: usize,
}

/// Median-split BVH over a scene's surfaces.
pub struct Bvh {
    root: BvhNode,
    stats: BvhStats,
}

impl Bvh {
    /// Build with the default leaf size.
    pub fn new(surfaces: Vec<Arc<dyn Surface>>) -> Self {
        Self::with_leaf_size(surfaces, DEFAULT_LEAF_SIZE)
    }

    /// Build with a custom leaf size, clamped to at least 2.
    pub fn with_leaf_size(surfaces: Vec<Arc<dyn Surface>>, leaf_size: usize) -> Self {
        let leaf_size = leaf_size.max(2);
        let root = if surfaces.is_empty() {
            BvhNode::Empty
        } else {
            BvhNode::build(surfaces, leaf_size)
        };
        let stats = root.stats();
        log::debug!(
            "Built BVH over {} surfaces: {} nodes, {} leaves, depth {}, largest leaf {}",
            stats.surfaces,
            stats.nodes,
            stats.leaves,
            stats.depth,
            stats.largest_leaf
        );
        Self { root, stats }
    }

    pub fn stats(&self) -> BvhStats {
        self.stats
    }

    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    pub fn bounding_box(&self) -> Aabb {
        self.root.bounding_box()
    }

    /// Find the closest hit along `ray`.
    ///
    /// `ray.end` is narrowed to the hit distance as closer hits are found.
    pub fn first_intersection<'a>(&'a self, ray: &mut Ray, rec: &mut IntersectionRecord<'a>) -> bool {
        self.root.first_intersection(ray, rec)
    }

    /// Report whether anything blocks `ray`. Stops at the first hit found.
    pub fn any_intersection(&self, ray: &Ray) -> bool {
        self.root.any_intersection(ray)
    }
}

impl BvhNode {
    /// Recursive median-split construction.
    fn build(mut surfaces: Vec<Arc<dyn Surface>>, leaf_size: usize) -> Self {
        let mut bbox = Aabb::EMPTY;
        for surface in &surfaces {
            surface.add_to_bounding_box(&mut bbox);
        }

        if surfaces.len() < leaf_size {
            return BvhNode::Leaf { surfaces, bbox };
        }

        let axis = bbox.longest_axis();
        surfaces.sort_by(|a, b| a.centroid()[axis].total_cmp(&b.centroid()[axis]));

        let mid = surfaces.len() / 2;
        let right = surfaces.split_off(mid);
        let left = surfaces;

        BvhNode::Branch {
            left: Box::new(Self::build(left, leaf_size)),
            right: Box::new(Self::build(right, leaf_size)),
            bbox,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    fn first_intersection<'a>(&'a self, ray: &mut Ray, rec: &mut IntersectionRecord<'a>) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { surfaces, bbox } => {
                if !bbox.intersect(ray) {
                    return false;
                }

                let mut hit_anything = false;
                for surface in surfaces {
                    if surface.intersect(ray, rec) {
                        hit_anything = true;
                        ray.end = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.intersect(ray) {
                    return false;
                }

                // A left hit narrows ray.end, so the right child only
                // reports strictly closer hits.
                let hit_left = left.first_intersection(ray, rec);
                let hit_right = right.first_intersection(ray, rec);
                hit_left || hit_right
            }
        }
    }

    fn any_intersection(&self, ray: &Ray) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { surfaces, bbox } => {
                if !bbox.intersect(ray) {
                    return false;
                }
                let mut scratch = IntersectionRecord::default();
                surfaces.iter().any(|s| s.intersect(ray, &mut scratch))
            }

            BvhNode::Branch { left, right, bbox } => {
                bbox.intersect(ray) && (left.any_intersection(ray) || right.any_intersection(ray))
            }
        }
    }

    fn stats(&self) -> BvhStats {
        match self {
            BvhNode::Empty => BvhStats::default(),
            BvhNode::Leaf { surfaces, .. } => BvhStats {
                surfaces: surfaces.len(),
                nodes: 1,
                leaves: 1,
                depth: 1,
                largest_leaf: surfaces.len(),
            },
            BvhNode::Branch { left, right, .. } => {
                let l = left.stats();
                let r = right.stats();
                BvhStats {
                    surfaces: l.surfaces + r.surfaces,
                    nodes: l.nodes + r.nodes + 1,
                    leaves: l.leaves + r.leaves,
                    depth: l.depth.max(r.depth) + 1,
                    largest_leaf: l.largest_leaf.max(r.largest_leaf),
                }
            }
        }
    }
}
