// End-to-end sheet sessions driven only through the public event API.

use std::cell::RefCell;
use std::rc::Rc;

use opsgrid_core::keys::{KeyIntent, Modifiers};
use opsgrid_core::selection::CellPos;
use opsgrid_engine::events::{EventCollector, GridChange};
use opsgrid_engine::grid::Grid;
use opsgrid_sheet::{InputEvent, MenuCommand, SheetEngine, SheetState};

fn engine(rows: usize, cols: usize) -> (SheetEngine, Rc<RefCell<EventCollector>>) {
    let events = Rc::new(RefCell::new(EventCollector::new()));
    let sink = Rc::clone(&events);
    let engine = SheetEngine::new(Grid::new(rows, cols))
        .on_change(move |change, grid| sink.borrow_mut().push(change, grid));
    (engine, events)
}

fn enter(engine: &mut SheetEngine, row: usize, col: usize, text: &str) {
    engine.handle(InputEvent::Click { row, col, shift: false });
    for c in text.chars() {
        engine.handle(InputEvent::Key(KeyIntent::Insert(c)));
    }
    engine.handle(InputEvent::Key(KeyIntent::Enter));
}

#[test]
fn deleting_a_row_removes_its_formula_cell() {
    let (mut e, events) = engine(3, 3);
    enter(&mut e, 0, 0, "10");
    enter(&mut e, 1, 0, "20");
    enter(&mut e, 0, 1, "=SUM(A1:A2)");
    assert_eq!(e.grid().display(0, 1), "30");

    e.handle(InputEvent::OpenContextMenu { row: 0, col: 0 });
    e.handle(InputEvent::Menu(MenuCommand::DeleteRow));

    assert_eq!(e.grid().rows(), 2);
    // Row 0 (and the SUM cell in it) is gone; A2's row moved up
    assert_eq!(e.grid().display(0, 0), "20");
    assert_eq!(e.grid().display(0, 1), "");
    assert_eq!(e.grid().cell(0, 1).unwrap().formula, None);

    let events = events.borrow();
    assert_eq!(events.events().last(), Some(&GridChange::RowDeleted { index: 0 }));
    assert_eq!(events.shapes().last(), Some(&(2, 3)));
}

#[test]
fn formula_result_survives_structural_edit_unchanged() {
    let (mut e, _) = engine(3, 3);
    enter(&mut e, 0, 0, "10");
    enter(&mut e, 1, 0, "20");
    enter(&mut e, 1, 1, "=SUM(A1:A2)");
    assert_eq!(e.grid().display(1, 1), "30");

    assert!(e.delete_row(0));
    assert_eq!(e.grid().display(0, 1), "30");
    assert_eq!(e.grid().cell(0, 1).unwrap().formula.as_deref(), Some("=SUM(A1:A2)"));
}

#[test]
fn every_commit_is_reported_with_the_updated_grid() {
    let (mut e, events) = engine(2, 2);
    enter(&mut e, 0, 0, "1");
    enter(&mut e, 0, 1, "=1/0");

    let events = events.borrow();
    assert_eq!(
        events.events(),
        &[
            GridChange::CellCommitted { row: 0, col: 0 },
            GridChange::CellCommitted { row: 0, col: 1 },
        ]
    );
    assert_eq!(e.grid().display(0, 1), "#ERROR");
}

#[test]
fn keyboard_only_session() {
    let (mut e, _) = engine(3, 3);
    let none = Modifiers::none();

    e.handle_key("ArrowDown", none);
    assert_eq!(e.state(), &SheetState::CellSelected(CellPos::new(0, 0)));

    for key in ["4", "2", "Tab"] {
        e.handle_key(key, none);
    }
    for key in ["=", "(", "4", "+", "2", ")", "*", "2", "Enter"] {
        e.handle_key(key, none);
    }
    assert_eq!(e.grid().display(0, 0), "42");
    assert_eq!(e.grid().display(0, 1), "12");

    e.handle_key("c", Modifiers::ctrl());
    e.handle_key("ArrowDown", none);
    e.handle_key("v", Modifiers::ctrl());
    assert_eq!(e.grid().display(1, 1), "12");
    assert_eq!(e.grid().cell(1, 1).unwrap().formula.as_deref(), Some("=(4+2)*2"));
}

#[test]
fn copy_block_is_a_snapshot() {
    let (mut e, _) = engine(4, 4);
    enter(&mut e, 0, 0, "a");
    enter(&mut e, 0, 1, "b");
    e.handle(InputEvent::Click { row: 0, col: 0, shift: false });
    e.handle(InputEvent::Click { row: 0, col: 1, shift: true });
    e.handle(InputEvent::Key(KeyIntent::Copy));

    enter(&mut e, 0, 0, "changed");
    e.handle(InputEvent::Click { row: 3, col: 2, shift: false });
    e.handle(InputEvent::Key(KeyIntent::Paste));

    assert_eq!(e.grid().display(3, 2), "a");
    assert_eq!(e.grid().display(3, 3), "b");
    assert_eq!(e.grid().display(0, 0), "changed");
}

#[test]
fn deleting_down_to_one_cell() {
    let (mut e, events) = engine(2, 2);
    e.handle(InputEvent::Click { row: 1, col: 1, shift: false });

    assert!(e.delete_row(1));
    assert!(!e.delete_row(0));
    assert!(e.delete_column(1));
    assert!(!e.delete_column(0));

    assert_eq!((e.grid().rows(), e.grid().cols()), (1, 1));
    assert_eq!(e.state(), &SheetState::CellSelected(CellPos::new(0, 0)));
    assert_eq!(events.borrow().len(), 2);
}

#[test]
fn escape_discards_edit() {
    let (mut e, events) = engine(2, 2);
    enter(&mut e, 0, 0, "5");
    events.borrow_mut().clear();

    e.handle_key("F2", Modifiers::none());
    e.handle_key("Backspace", Modifiers::none());
    e.handle_key("9", Modifiers::none());
    e.handle_key("Escape", Modifiers::none());

    assert_eq!(e.grid().display(0, 0), "5");
    assert!(events.borrow().is_empty());
}
