use anyhow::Context;
use glam::Vec3;
use rein_collide::physics::epa::resolve_with_polytope;
use rein_collide::physics::gjk::intersects_with_config;
use rein_collide::{
    polytope_wireframe, simplex_wireframe, ColliderShape, CollisionConfig, ShapeCollider,
};

const SIMPLEX_COLOR: [f32; 4] = [1.0, 0.8, 0.1, 1.0];
const POLYTOPE_COLOR: [f32; 4] = [0.2, 0.6, 1.0, 1.0];

/// Parse `[offset_x] [offset_y] [offset_z]`, defaulting to (0.5, 0, 0).
fn parse_offset() -> anyhow::Result<Vec3> {
    let mut offset = Vec3::new(0.5, 0.0, 0.0);
    for (i, arg) in std::env::args().skip(1).take(3).enumerate() {
        offset[i] = arg
            .parse()
            .with_context(|| format!("offset component {i} is not a number: {arg:?}"))?;
    }
    Ok(offset)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let offset = parse_offset()?;
    let config = CollisionConfig::default();
    let a = ShapeCollider::at(ColliderShape::cuboid(Vec3::splat(0.5)), Vec3::ZERO);
    let b = ShapeCollider::at(ColliderShape::cuboid(Vec3::splat(0.5)), offset);

    let gjk = intersects_with_config(&a, &b, &config).context("GJK query failed")?;
    log::info!(
        "unit boxes at {:?} and {:?}: intersecting = {} after {} iterations",
        Vec3::ZERO,
        offset,
        gjk.intersecting,
        gjk.iterations
    );
    log::info!(
        "terminal simplex: {} points, {} wireframe vertices",
        gjk.simplex.len(),
        simplex_wireframe(&gjk.simplex, SIMPLEX_COLOR).len()
    );

    if gjk.intersecting {
        let (epa, polytope) =
            resolve_with_polytope(&gjk.simplex, &a, &b, &config).context("EPA query failed")?;
        log::info!(
            "mtv = {:?} (depth {:.4}, {:?} after {} iterations)",
            epa.mtv,
            epa.depth,
            epa.status,
            epa.iterations
        );
        log::info!(
            "polytope: {} vertices, {} faces, {} wireframe vertices",
            polytope.vertices().len(),
            polytope.faces().len(),
            polytope_wireframe(&polytope, POLYTOPE_COLOR).len()
        );
    }

    Ok(())
}
