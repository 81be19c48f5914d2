use std::collections::BTreeSet;

use blastgrid_core::{CellCoord, CellKind, LevelLayout};
use blastgrid_system_bootstrap::{Bootstrap, Config, DOOR_COUNT};
use blastgrid_world::query;

fn checkerboard() -> LevelLayout {
    let columns = 20;
    let rows = 10;
    let mut cells = Vec::new();
    for row in 1..=rows {
        for column in 0..columns {
            let wall = (column + row) % 2 == 0 && row > 2;
            cells.push(if wall { CellKind::Wall } else { CellKind::Empty });
        }
    }
    LevelLayout::new(columns, rows, cells, CellCoord::new(1, 1), Vec::new())
        .expect("valid layout")
}

fn placement(seed: u64) -> Vec<CellCoord> {
    let mut layout = checkerboard();
    Bootstrap::new(Config::new(seed)).place_doors(&mut layout)
}

#[test]
fn doors_replace_distinct_walls() {
    let original = checkerboard();
    let mut layout = original.clone();
    let mut bootstrap = Bootstrap::new(Config::new(7));

    let doors = bootstrap.place_doors(&mut layout);

    assert_eq!(doors.len(), DOOR_COUNT);
    assert_eq!(doors.iter().collect::<BTreeSet<_>>().len(), DOOR_COUNT);
    for door in &doors {
        assert_eq!(original.view().cell(*door), Some(CellKind::Wall));
        assert_eq!(layout.view().cell(*door), Some(CellKind::DoorClosed));
    }
}

#[test]
fn placement_is_deterministic_per_seed() {
    assert_eq!(placement(42), placement(42));

    let distinct = (0..8).map(placement).collect::<BTreeSet<_>>();
    assert!(distinct.len() > 1, "seeds should vary the placement");
}

#[test]
fn built_world_hides_doors_behind_the_grid() {
    let walls_before = checkerboard()
        .view()
        .rows()
        .flat_map(|(_, cells)| cells.iter())
        .filter(|cell| **cell == CellKind::Wall)
        .count();

    let world = Bootstrap::new(Config::with_doors(5, 3)).build(checkerboard());

    let view = query::grid_view(&world);
    let count = |kind: CellKind| {
        view.rows()
            .flat_map(|(_, cells)| cells.iter())
            .filter(|cell| **cell == kind)
            .count()
    };
    assert_eq!(count(CellKind::DoorClosed), 5);
    assert_eq!(count(CellKind::Wall), walls_before - 5);
    assert_eq!(query::player_cell(&world), CellCoord::new(1, 1));
}
