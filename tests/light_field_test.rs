use approx::assert_relative_eq;
use bonsai::light::{default_escaped_radiance, LightField, LightVoxel};
use bonsai::math::{Point3, Radiance, Vector3};
use bonsai::voxel::{CellIndex, VoxelOccupancy};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn single_voxel_field() -> (LightField, Radiance) {
    let radiance = Radiance::new(1.0, 2.0, 3.0);
    let mut field = LightField::new(1.0).unwrap();
    field.insert(CellIndex::new(0, 0, 0), LightVoxel::new(radiance));
    (field, radiance)
}

#[test]
fn ray_toward_voxel_returns_its_radiance() {
    let (field, radiance) = single_voxel_field();
    let origin = Point3::new(-5.0, 0.5, 0.5);

    let hit = field.nearest_hit(origin, Vector3::x()).unwrap();
    assert_eq!(hit.cell, CellIndex::new(0, 0, 0));
    assert_relative_eq!(hit.t, 5.0);
    assert_eq!(field.sample(origin, Vector3::x()), radiance);
}

#[test]
fn ray_missing_voxel_escapes() {
    let (field, _) = single_voxel_field();
    let origin = Point3::new(-5.0, 0.5, 0.5);
    assert!(field.nearest_hit(origin, Vector3::y()).is_none());
    assert_eq!(field.sample(origin, Vector3::y()), default_escaped_radiance());
}

#[test]
fn empty_field_always_escapes() {
    let escaped = Radiance::new(7.0, 8.0, 9.0);
    let field = LightField::new(0.001).unwrap().with_escaped(escaped);
    for dir in [Vector3::x(), -Vector3::y(), Vector3::new(1.0, 1.0, 1.0).normalize()] {
        assert_eq!(field.sample(Point3::origin(), dir), escaped);
    }
}

#[test]
fn nearest_of_several_voxels_wins() {
    let near = Radiance::new(1.0, 0.0, 0.0);
    let far = Radiance::new(0.0, 1.0, 0.0);
    let mut field = LightField::new(1.0).unwrap();
    // Insert the far one first: order must not matter.
    field.insert(CellIndex::new(5, 0, 0), LightVoxel::new(far));
    field.insert(CellIndex::new(2, 0, 0), LightVoxel::new(near));

    let hit = field.nearest_hit(Point3::new(-1.0, 0.5, 0.5), Vector3::x()).unwrap();
    assert_eq!(hit.radiance, near);
    assert_relative_eq!(hit.t, 3.0);
}

#[test]
fn voxels_behind_the_origin_are_ignored() {
    let (field, _) = single_voxel_field();
    let origin = Point3::new(10.0, 0.5, 0.5);
    assert_eq!(field.sample(origin, Vector3::x()), field.escaped());
}

#[test]
fn origin_inside_voxel_hits_at_zero() {
    let (field, radiance) = single_voxel_field();
    let hit = field.nearest_hit(Point3::new(0.5, 0.5, 0.5), -Vector3::z()).unwrap();
    assert_eq!(hit.t, 0.0);
    assert_eq!(hit.radiance, radiance);
}

#[test]
fn placeholder_cells_are_transparent() {
    let behind = Radiance::new(4.0, 4.0, 4.0);
    let mut field = LightField::new(1.0).unwrap();
    field.insert_placeholder(CellIndex::new(0, 0, 0));
    field.insert(CellIndex::new(3, 0, 0), LightVoxel::new(behind));

    assert_eq!(field.len(), 2);
    let hit = field.nearest_hit(Point3::new(-5.0, 0.5, 0.5), Vector3::x()).unwrap();
    assert_eq!(hit.cell, CellIndex::new(3, 0, 0));
}

#[test]
fn equal_entry_resolves_to_smallest_cell_index() {
    let low = Radiance::new(1.0, 0.0, 0.0);
    let high = Radiance::new(0.0, 0.0, 1.0);
    let mut field = LightField::new(1.0).unwrap();
    field.insert(CellIndex::new(0, 1, 0), LightVoxel::new(high));
    field.insert(CellIndex::new(0, 0, 0), LightVoxel::new(low));

    // Grazes the shared face y = 1 of both cells.
    let hit = field.nearest_hit(Point3::new(-5.0, 1.0, 0.5), Vector3::x()).unwrap();
    assert_relative_eq!(hit.t, 5.0);
    assert_eq!(hit.cell, CellIndex::new(0, 0, 0));
    assert_eq!(hit.radiance, low);
}

#[test]
fn populate_uses_radiance_per_cell() {
    let mut occ = VoxelOccupancy::new();
    occ.insert(CellIndex::new(0, 0, 0), true);
    occ.insert(CellIndex::new(4, 0, 0), true);

    let mut field = LightField::new(1.0).unwrap();
    field.populate(&occ, |cell| Radiance::from_element(cell.x as f64));

    assert_eq!(field.len(), 2);
    let far = field.voxels().get(&CellIndex::new(4, 0, 0)).unwrap().unwrap();
    assert_eq!(far.radiance, Radiance::from_element(4.0));
}

#[test]
fn random_fixture_is_reproducible_and_bounded() {
    let a = LightField::random(&mut ChaCha8Rng::seed_from_u64(7), 100, 50, 0.001).unwrap();
    let b = LightField::random(&mut ChaCha8Rng::seed_from_u64(7), 100, 50, 0.001).unwrap();
    let c = LightField::random(&mut ChaCha8Rng::seed_from_u64(8), 100, 50, 0.001).unwrap();

    let cells = |f: &LightField| f.voxels().cells().collect::<Vec<_>>();
    assert_eq!(cells(&a), cells(&b));
    assert_ne!(cells(&a), cells(&c));
    assert!(a.len() <= 100 && a.len() > 90);
    assert!(a
        .voxels()
        .cells()
        .all(|c| [c.x, c.y, c.z].iter().all(|v| (-50..=50).contains(v))));
}
