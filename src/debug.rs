//! Wireframe line lists for editor overlays
//!
//! Produces position/color vertex pairs; each consecutive pair is one line
//! segment, ready to upload as a line-list vertex buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::physics::collider::Aabb;
use crate::physics::epa::Polytope;
use crate::physics::simplex::Simplex;

/// Vertex with position and color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DebugVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl DebugVertex {
    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

fn push_line(vertices: &mut Vec<DebugVertex>, start: Vec3, end: Vec3, color: [f32; 4]) {
    vertices.push(DebugVertex::new(start.to_array(), color));
    vertices.push(DebugVertex::new(end.to_array(), color));
}

/// Every edge between the simplex's points: 1 for a segment, 3 for a
/// triangle, 6 for a tetrahedron.
pub fn simplex_wireframe(simplex: &Simplex, color: [f32; 4]) -> Vec<DebugVertex> {
    let points = simplex.points();
    let mut vertices = Vec::with_capacity(12);
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            push_line(&mut vertices, points[i], points[j], color);
        }
    }
    vertices
}

/// Three edges per face. Shared edges are drawn twice.
pub fn polytope_wireframe(polytope: &Polytope, color: [f32; 4]) -> Vec<DebugVertex> {
    let points = polytope.vertices();
    let mut vertices = Vec::with_capacity(polytope.faces().len() * 6);
    for face in polytope.faces() {
        for (i, j) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
            push_line(&mut vertices, points[i], points[j], color);
        }
    }
    vertices
}

/// The 12 edges of a bounding box.
pub fn aabb_wireframe(aabb: &Aabb, color: [f32; 4]) -> Vec<DebugVertex> {
    let min = aabb.min;
    let max = aabb.max;

    // 8 corners of the box
    let corners = [
        Vec3::new(min.x, min.y, min.z), // 0: ---
        Vec3::new(max.x, min.y, min.z), // 1: +--
        Vec3::new(min.x, max.y, min.z), // 2: -+-
        Vec3::new(max.x, max.y, min.z), // 3: ++-
        Vec3::new(min.x, min.y, max.z), // 4: --+
        Vec3::new(max.x, min.y, max.z), // 5: +-+
        Vec3::new(min.x, max.y, max.z), // 6: -++
        Vec3::new(max.x, max.y, max.z), // 7: +++
    ];

    let edges = [
        (0, 1),
        (1, 3),
        (3, 2),
        (2, 0),
        (4, 5),
        (5, 7),
        (7, 6),
        (6, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    let mut vertices = Vec::with_capacity(24);
    for (i, j) in edges {
        push_line(&mut vertices, corners[i], corners[j], color);
    }
    vertices
}
