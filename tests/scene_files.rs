use camino::Utf8Path;
use isoworld::occlusion::front_block;
use isoworld::types::Front;
use isoworld::{BlockId, Direction, RenderedBlock, scene};

/// Every draw-list property that must hold regardless of scene content.
fn check_draw_list(path: &Utf8Path, list: &[RenderedBlock], exact: bool, block_count: usize) {
    assert_eq!(list.len(), block_count, "{path}: draw list is not a permutation");

    let mut ids: Vec<BlockId> = list.iter().map(|r| r.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), block_count, "{path}: duplicate ids in draw list");

    if exact {
        for (i, behind) in list.iter().enumerate() {
            for front in &list[..i] {
                assert_ne!(
                    front_block(&behind.block, &front.block),
                    Some(Front::Second),
                    "{path}: {} is in front of {} but drawn first",
                    front.id,
                    behind.id
                );
            }
        }
    }

    for rendered in list {
        let geometry = &rendered.geometry;
        assert_eq!(geometry.silhouette.points().count(), 6, "{path}: {}", rendered.id);
        for face in &geometry.faces {
            assert_eq!(face.points().count(), 4, "{path}: {}", rendered.id);
        }
        if rendered.adjacent.is_isolated() {
            assert_eq!(geometry.edge.subpath_count(), 6, "{path}: {}", rendered.id);
        }
        if Direction::ALL.iter().all(|&d| rendered.adjacent.has(d)) {
            assert!(geometry.edge.is_empty(), "{path}: {}", rendered.id);
        }
    }
}

/// Expected tail of the draw list, read from a sibling `.order` file.
fn expected_order(path: &Utf8Path) -> datatest_stable::Result<Option<Vec<BlockId>>> {
    let order_path = path.with_extension("order");
    if !order_path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(&order_path)?;
    let mut ids = Vec::new();
    for line in text.lines().filter(|l| !l.trim_start().starts_with('#')) {
        for word in line.split_whitespace() {
            ids.push(BlockId(word.parse()?));
        }
    }
    Ok(Some(ids))
}

fn test_scene_file(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;
    let parsed = scene::parse_named(path.as_str(), &source);

    if path.components().any(|c| c.as_str() == "invalid") {
        assert!(parsed.is_err(), "{path}: expected a scene error");
        return Ok(());
    }

    let desc = parsed.map_err(miette::Report::new).unwrap_or_else(|e| panic!("{e:?}"));
    let block_count = desc.blocks.len();
    let world = desc.into_world()?;
    let list = world.sorted();
    check_draw_list(path, list, world.forced().is_empty(), block_count);

    if let Some(expected) = expected_order(path)? {
        let ids: Vec<BlockId> = list.iter().map(|r| r.id).collect();
        assert!(
            ids.ends_with(&expected),
            "{path}: draw list {ids:?} does not end with {expected:?}"
        );
    }

    Ok(())
}

datatest_stable::harness! {
    { test = test_scene_file, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/scenes"), pattern = r"\.scene$" },
}
