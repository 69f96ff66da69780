use platformer_core::Tile;
use platformer_level_builder::{audit, Edge, LevelBlueprint, SurfaceKind};
use platformer_system_level_generation::{GenerationRequest, LevelGenerator};

#[test]
fn generated_levels_pass_the_audit() {
    let generator = LevelGenerator::default();
    for seed in 0..48 {
        let level = generator
            .generate(&GenerationRequest::default().with_seed(seed))
            .expect("valid request");
        let violations = audit(level.rows().as_slice(), Some(level.pits()));
        assert!(violations.is_empty(), "seed {seed}: {violations:?}");
    }
}

#[test]
fn generated_levels_build_complete_blueprints() {
    let tile_size = generator_tile_size();
    for seed in 0..16 {
        let level = LevelGenerator::default()
            .generate(&GenerationRequest::default().with_seed(seed))
            .expect("valid request");
        let rows = level.rows();
        let blueprint = LevelBlueprint::from_rows(rows.as_slice(), tile_size).expect("blueprint");

        assert!(blueprint.has_spawn_tile());
        assert_eq!(blueprint.exits().len(), 1);
        assert_eq!(blueprint.collectibles().len(), level.gems().len());
        assert_eq!(
            blueprint.solids().len(),
            level.grid().count(Tile::Solid),
            "seed {seed}"
        );

        let spawn = level.spawn();
        assert_eq!(blueprint.spawn().x, spawn.x() as f32 * tile_size);
        assert_eq!(blueprint.spawn().y, spawn.y() as f32 * tile_size);

        let ground = level.grid().ground_row();
        for block in blueprint.solids() {
            let above = level.grid().get(block.cell.x(), block.cell.y() - 1);
            let open_above = above != Some(Tile::Solid);
            if open_above {
                assert_eq!(block.surface, SurfaceKind::Grass, "seed {seed}: {block:?}");
            } else {
                assert_eq!(block.surface, SurfaceKind::Dirt, "seed {seed}: {block:?}");
            }
        }
        let leftmost = blueprint
            .solids()
            .iter()
            .find(|block| block.cell.x() == 0 && block.cell.y() == ground)
            .expect("ground starts solid");
        assert_eq!(leftmost.edge, Edge::CornerLeft);
    }
}

fn generator_tile_size() -> f32 {
    LevelGenerator::default().physics().tile_size as f32
}
