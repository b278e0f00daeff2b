//! Convex collider shapes exposed to GJK/EPA as world-space vertex sets.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec3};

/// Default latitude bands used when discretizing round shapes.
pub const DEFAULT_RINGS: u32 = 8;
/// Default longitude segments used when discretizing round shapes.
pub const DEFAULT_SEGMENTS: u32 = 16;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from a set of points.
    ///
    /// An empty set yields an inverted box that overlaps nothing.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for p in points {
            min = min.min(p);
            max = max.max(p);
        }

        Self { min, max }
    }

    /// Get the center of the AABB.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the AABB.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Merge two AABBs.
    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Test whether two AABBs overlap (touching counts).
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// Capability the narrowphase needs from a collider.
///
/// The vertex set must describe a convex shape; concave geometry has to be
/// decomposed by the caller first. Vertices are read-only for the duration
/// of a query.
pub trait Collider: Send + Sync {
    /// World-space vertices of the convex shape.
    fn vertices(&self) -> &[Vec3];

    /// World-space bounding box.
    fn aabb(&self) -> Aabb;
}

/// Collider shape in local space.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    Box {
        half_extents: Vec3,
    },
    /// UV sphere with a vertex at each pole.
    Sphere {
        radius: f32,
        rings: u32,
        segments: u32,
    },
    /// Capsule along Y: two hemispherical caps joined by a cylinder.
    Capsule {
        radius: f32,
        half_height: f32,
        rings: u32,
        segments: u32,
    },
    /// Cylinder along Y.
    Cylinder {
        radius: f32,
        half_height: f32,
        segments: u32,
    },
    ConvexHull {
        points: Vec<Vec3>,
    },
}

impl ColliderShape {
    /// Axis-aligned box with the given half extents.
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Box { half_extents }
    }

    /// Sphere with the default tessellation.
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere {
            radius,
            rings: DEFAULT_RINGS,
            segments: DEFAULT_SEGMENTS,
        }
    }

    /// Capsule with the default tessellation.
    pub fn capsule(radius: f32, half_height: f32) -> Self {
        Self::Capsule {
            radius,
            half_height,
            rings: DEFAULT_RINGS,
            segments: DEFAULT_SEGMENTS,
        }
    }

    /// Cylinder with the default tessellation.
    pub fn cylinder(radius: f32, half_height: f32) -> Self {
        Self::Cylinder {
            radius,
            half_height,
            segments: DEFAULT_SEGMENTS,
        }
    }

    /// Discretize the shape into its local-space vertex set.
    pub fn local_vertices(&self) -> Vec<Vec3> {
        match self {
            ColliderShape::Box { half_extents } => {
                let h = *half_extents;
                vec![
                    Vec3::new(-h.x, -h.y, -h.z),
                    Vec3::new(h.x, -h.y, -h.z),
                    Vec3::new(-h.x, h.y, -h.z),
                    Vec3::new(h.x, h.y, -h.z),
                    Vec3::new(-h.x, -h.y, h.z),
                    Vec3::new(h.x, -h.y, h.z),
                    Vec3::new(-h.x, h.y, h.z),
                    Vec3::new(h.x, h.y, h.z),
                ]
            }
            ColliderShape::Sphere {
                radius,
                rings,
                segments,
            } => uv_sphere(*radius, *rings, *segments),
            ColliderShape::Capsule {
                radius,
                half_height,
                rings,
                segments,
            } => {
                let offset = Vec3::new(0.0, *half_height, 0.0);
                let mut points = Vec::new();
                for p in uv_sphere(*radius, *rings, *segments) {
                    // Equator points belong to both caps
                    let on_equator = p.y.abs() <= 1e-6;
                    if p.y > 0.0 || on_equator {
                        points.push(p + offset);
                    }
                    if p.y < 0.0 || on_equator {
                        points.push(p - offset);
                    }
                }
                points
            }
            ColliderShape::Cylinder {
                radius,
                half_height,
                segments,
            } => {
                let segments = (*segments).max(3);
                let mut points = Vec::with_capacity(segments as usize * 2);
                for y in [*half_height, -*half_height] {
                    for s in 0..segments {
                        let phi = TAU * s as f32 / segments as f32;
                        points.push(Vec3::new(radius * phi.cos(), y, radius * phi.sin()));
                    }
                }
                points
            }
            ColliderShape::ConvexHull { points } => points.clone(),
        }
    }
}

fn uv_sphere(radius: f32, rings: u32, segments: u32) -> Vec<Vec3> {
    let rings = rings.max(2);
    let segments = segments.max(3);

    let mut points = Vec::with_capacity(((rings - 1) * segments + 2) as usize);
    points.push(Vec3::new(0.0, radius, 0.0));
    for r in 1..rings {
        let theta = PI * r as f32 / rings as f32;
        let y = radius * theta.cos();
        let ring_radius = radius * theta.sin();
        for s in 0..segments {
            let phi = TAU * s as f32 / segments as f32;
            points.push(Vec3::new(ring_radius * phi.cos(), y, ring_radius * phi.sin()));
        }
    }
    points.push(Vec3::new(0.0, -radius, 0.0));
    points
}

/// A [`ColliderShape`] placed in the world.
///
/// World-space vertices and bounds are cached and refreshed whenever the
/// transform changes.
#[derive(Debug, Clone)]
pub struct ShapeCollider {
    shape: ColliderShape,
    transform: Mat4,
    local: Vec<Vec3>,
    world: Vec<Vec3>,
    aabb: Aabb,
}

impl ShapeCollider {
    pub fn new(shape: ColliderShape, transform: Mat4) -> Self {
        let local = shape.local_vertices();
        let mut collider = Self {
            shape,
            transform,
            local,
            world: Vec::new(),
            aabb: Aabb::new(Vec3::ZERO, Vec3::ZERO),
        };
        collider.refresh();
        collider
    }

    /// Shape placed at `position` with no rotation.
    pub fn at(shape: ColliderShape, position: Vec3) -> Self {
        Self::new(shape, Mat4::from_translation(position))
    }

    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        self.refresh();
    }

    /// Move the collider by `offset` in world space.
    pub fn translate(&mut self, offset: Vec3) {
        self.set_transform(Mat4::from_translation(offset) * self.transform);
    }

    fn refresh(&mut self) {
        let mat = self.transform;
        self.world.clear();
        self.world
            .extend(self.local.iter().map(|p| mat.transform_point3(*p)));

        self.aabb = if self.world.is_empty() {
            let center = mat.transform_point3(Vec3::ZERO);
            Aabb::new(center, center)
        } else {
            Aabb::from_points(self.world.iter().copied())
        };
    }
}

impl Collider for ShapeCollider {
    fn vertices(&self) -> &[Vec3] {
        &self.world
    }

    fn aabb(&self) -> Aabb {
        self.aabb
    }
}
