// Property-based tests for the grid store and column labels.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use opsgrid_engine::col_label::{index_to_label, label_to_index};
use opsgrid_engine::grid::{Grid, GridError};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum StructuralOp {
    InsertRow(usize),
    DeleteRow(usize),
    InsertColumn(usize),
    DeleteColumn(usize),
}

/// Indices are drawn wider than any grid here so rejected ops are exercised too.
fn arb_op() -> impl Strategy<Value = StructuralOp> {
    prop_oneof![
        (0usize..12).prop_map(StructuralOp::InsertRow),
        (0usize..12).prop_map(StructuralOp::DeleteRow),
        (0usize..12).prop_map(StructuralOp::InsertColumn),
        (0usize..12).prop_map(StructuralOp::DeleteColumn),
    ]
}

fn apply(grid: &mut Grid, op: &StructuralOp) -> Result<(), GridError> {
    match op {
        StructuralOp::InsertRow(i) => grid.insert_row(*i),
        StructuralOp::DeleteRow(i) => grid.delete_row(*i),
        StructuralOp::InsertColumn(i) => grid.insert_column(*i),
        StructuralOp::DeleteColumn(i) => grid.delete_column(*i),
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn rectangular_after_every_structural_op(
        rows in 1usize..6,
        cols in 1usize..6,
        ops in prop::collection::vec(arb_op(), 0..40),
    ) {
        let mut grid = Grid::new(rows, cols);
        for op in &ops {
            let before = (grid.rows(), grid.cols());
            let result = apply(&mut grid, op);

            prop_assert!(grid.is_rectangular());
            prop_assert!(grid.rows() >= 1);
            prop_assert!(grid.cols() >= 1);
            for row in grid.iter_rows() {
                prop_assert_eq!(row.len(), grid.cols());
            }

            // A rejected op leaves the shape alone
            if result.is_err() {
                prop_assert_eq!((grid.rows(), grid.cols()), before);
            }
        }
    }

    #[test]
    fn deletes_never_go_below_one(rows in 1usize..5, cols in 1usize..5, extra in 0usize..5) {
        let mut grid = Grid::new(rows, cols);
        for _ in 0..rows + extra {
            let _ = grid.delete_row(0);
        }
        for _ in 0..cols + extra {
            let _ = grid.delete_column(0);
        }
        prop_assert_eq!((grid.rows(), grid.cols()), (1, 1));
    }

    #[test]
    fn label_round_trip(n in 0usize..100_000) {
        prop_assert_eq!(label_to_index(&index_to_label(n)), Some(n));
    }
}

#[test]
fn label_round_trip_first_thousand() {
    for n in 0..=1000 {
        assert_eq!(label_to_index(&index_to_label(n)), Some(n), "column {}", n);
    }
}

#[test]
fn label_anchors() {
    assert_eq!(index_to_label(0), "A");
    assert_eq!(index_to_label(25), "Z");
    assert_eq!(index_to_label(26), "AA");
    assert_eq!(index_to_label(701), "ZZ");
}
