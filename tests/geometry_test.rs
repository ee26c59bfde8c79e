use approx::assert_relative_eq;
use bonsai::geometry::{Aabb, Ray};
use bonsai::math::{Point3, Vector3};
use bonsai::voxel::{CellIndex, VoxelOccupancy};
use std::f64::consts::PI;

fn unit_cube() -> Aabb {
    Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
}

#[test]
fn ray_from_cube_center_is_inside_in_every_direction() {
    let cube = unit_cube();
    let center = cube.center();
    for i in 0..=12 {
        for j in 0..24 {
            let theta = PI * i as f64 / 12.0;
            let phi = 2.0 * PI * j as f64 / 24.0;
            let dir = Vector3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
            let ray = Ray::new(center, dir);

            let iv = cube.slab_interval(&ray);
            assert!(iv.contains(0.0), "theta={theta} phi={phi}: {iv:?}");

            let hit = cube.intersect_ray(&ray).unwrap();
            assert_eq!(hit.entry, 0.0);
            assert!(hit.exit >= 0.5 - 1e-12);
        }
    }
}

#[test]
fn axis_ray_enters_at_face_distance() {
    let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), Vector3::x());
    let hit = unit_cube().intersect_ray(&ray).unwrap();
    assert_relative_eq!(hit.entry, 5.0);
    assert_relative_eq!(hit.exit, 6.0);
}

#[test]
fn parallel_ray_outside_slab_misses() {
    let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), Vector3::y());
    assert!(unit_cube().intersect_ray(&ray).is_none());
}

#[test]
fn box_behind_origin_is_not_hit() {
    let ray = Ray::new(Point3::new(3.0, 0.5, 0.5), Vector3::x());
    assert!(unit_cube().slab_interval(&ray).exit < 0.0);
    assert!(unit_cube().intersect_ray(&ray).is_none());
}

#[test]
fn diagonal_ray_through_corner_region() {
    let dir = Vector3::new(1.0, 1.0, 1.0).normalize();
    let ray = Ray::new(Point3::new(-1.0, -1.0, -1.0), dir);
    let hit = unit_cube().intersect_ray(&ray).unwrap();
    assert_relative_eq!(hit.entry, 3.0f64.sqrt(), epsilon = 1e-12);
    assert_relative_eq!(ray.at(hit.entry), Point3::origin(), epsilon = 1e-12);
}

#[test]
fn cell_index_uses_floor() {
    assert_eq!(
        CellIndex::containing(&Point3::new(0.0015, -0.0005, 0.0), 0.001),
        CellIndex::new(1, -1, 0)
    );
    let b = CellIndex::new(-1, 2, 0).bounds(0.5);
    assert_relative_eq!(b.min, Point3::new(-0.5, 1.0, 0.0));
    assert_relative_eq!(b.max, Point3::new(0.0, 1.5, 0.5));
    assert_relative_eq!(CellIndex::new(0, 0, 0).center(2.0), Point3::new(1.0, 1.0, 1.0));
}

#[test]
fn occupancy_ignores_insertion_order() {
    let cells = [
        CellIndex::new(3, 0, 0),
        CellIndex::new(-2, 1, 0),
        CellIndex::new(0, 0, 7),
    ];
    let forward: VoxelOccupancy<bool> = cells.iter().map(|&c| (c, true)).collect();
    let backward: VoxelOccupancy<bool> = cells.iter().rev().map(|&c| (c, true)).collect();
    assert_eq!(forward, backward);
    assert_eq!(
        forward.cells().collect::<Vec<_>>(),
        vec![cells[1], cells[2], cells[0]]
    );
}

#[test]
fn occupancy_insert_replaces_payload() {
    let mut occ = VoxelOccupancy::new();
    let c = CellIndex::new(1, 2, 3);
    assert_eq!(occ.insert(c, 1u8), None);
    assert_eq!(occ.insert(c, 2u8), Some(1));
    assert_eq!(occ.len(), 1);
    assert_eq!(occ.get(&c), Some(&2));
    assert_eq!(occ.remove(&c), Some(2));
    assert!(occ.is_empty());
}
