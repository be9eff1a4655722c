//! Score area tests: click routing, caret scrolling, redraw and SVG export.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use scoreview::{
    BarType, Barline, Document, Hit, KeySignature, LayoutConfig, MemoryScene, MemoryViewport,
    NotificationChannel, Note, Score, ScoreArea, ScoreLocation, Scene, StaffLocation, Staff, System,
    SystemLocation, TimeSignature, ViewType,
};

fn system_with_signatures() -> System {
    let mut system = System::new();
    let mut staff = Staff::guitar();
    staff.insert_note(Note::new(1, 0, 3));
    staff.insert_note(Note::new(5, 2, 0));
    system.insert_staff(staff);
    system.insert_barline(
        Barline::new(4, BarType::Single)
            .with_key_signature(KeySignature { accidentals: 2 })
            .with_time_signature(TimeSignature { beats: 3, beat_value: 4 }),
    );
    system
}

fn rendered_area(systems: usize) -> ScoreArea {
    let mut area = ScoreArea::new(MemoryScene::new(), LayoutConfig::default().with_workers(2));
    let score = Score::from(vec![system_with_signatures(); systems]);
    area.render_document(Document::new(score), ViewType::Guitar)
        .expect("render");
    area
}

fn record<T: Copy + 'static>(channel: &NotificationChannel<T>) -> Rc<RefCell<Vec<T>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    channel.subscribe(move |value: &T| sink.borrow_mut().push(*value));
    seen
}

#[test]
fn clicks_are_routed_to_their_channels() {
    let area = rendered_area(2);
    let barlines = record(area.barline_clicked());
    let keys = record(area.key_signature_clicked());
    let times = record(area.time_signature_clicked());
    let clefs = record(area.clef_clicked());
    let selection = record(area.selection_changed().expect("document"));

    // Staff notation starts 20 below the system top; the barline at
    // position 4 sits at x = 34 + 4 * 20 with its signatures to the right.
    let second = area.layout().systems()[1].offset();
    assert_eq!(area.click(114.0, 50.0), Some(Hit::Barline { position: 4 }));
    assert_eq!(area.click(120.0, 50.0), Some(Hit::KeySignature { position: 4 }));
    assert_eq!(area.click(140.0, second + 50.0), Some(Hit::TimeSignature { position: 4 }));
    assert_eq!(area.click(20.0, second + 30.0), Some(Hit::Clef { staff_index: 0 }));
    assert_eq!(area.click(179.0, 100.0), Some(Hit::Staff { staff_index: 0, position: 7 }));

    assert_eq!(*barlines.borrow(), vec![SystemLocation { system_index: 0, position: 4 }]);
    assert_eq!(*keys.borrow(), vec![SystemLocation { system_index: 0, position: 4 }]);
    assert_eq!(*times.borrow(), vec![SystemLocation { system_index: 1, position: 4 }]);
    assert_eq!(*clefs.borrow(), vec![StaffLocation { system_index: 1, staff_index: 0 }]);
    assert_eq!(*selection.borrow(), vec![ScoreLocation::new(0, 0, 7)]);
}

#[test]
fn clicks_between_systems_hit_nothing() {
    let area = rendered_area(2);
    let gap = area.layout().systems()[0].bottom() + 10.0;
    assert_eq!(area.click(200.0, gap), None);
    assert_eq!(area.click(-5.0, 10.0), None);
}

#[test]
fn caret_movement_keeps_the_caret_system_visible() {
    let mut area = rendered_area(6);
    let viewport = Rc::new(RefCell::new(MemoryViewport::new(820.0, 500.0)));
    area.attach_viewport(Rc::clone(&viewport));

    let target = area.layout().systems()[5].scene_rect();
    area.document_mut().expect("document").caret.move_to_system(5);

    let visible = viewport.borrow().visible();
    assert!(visible.y <= target.y - 100.0);
    assert!(visible.bottom() >= target.bottom() + 100.0);
    assert_eq!(area.caret_tracker().current_system(), 5);

    area.document_mut().expect("document").caret.move_to_system(0);
    assert_eq!(viewport.borrow().visible().y, 0.0);
}

#[test]
fn redraw_system_syncs_scene_and_caret_regions() {
    let mut area = rendered_area(4);
    let before = area.layout().caret_regions();

    let document = area.document_mut().expect("document");
    let system = document.score.system_mut(1).expect("system 1");
    system.insert_staff(Staff::guitar());

    let moved = area.redraw_system(1).expect("redraw");
    assert_eq!(moved, 1..4);

    let after = area.layout().caret_regions();
    assert_eq!(after[0], before[0]);
    assert!(after[1].height > before[1].height);
    assert!(after[3].y > before[3].y);
    assert_eq!(area.caret_tracker().regions(), after);
    assert_eq!(area.scene().item_count(), 4);

    let scene_rects: Vec<_> = area
        .scene()
        .items()
        .map(|(id, _)| area.scene().item_scene_rect(id).expect("item"))
        .collect::<Vec<_>>();
    for rect in &after {
        assert!(scene_rects.contains(rect), "no scene item at {rect:?}");
    }
}

#[test]
fn notification_delivery_order_and_unsubscribe() {
    let channel = NotificationChannel::<SystemLocation>::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let first_log = Rc::clone(&log);
    let first = channel.subscribe(move |_| first_log.borrow_mut().push("first"));
    let second_log = Rc::clone(&log);
    channel.subscribe(move |_| second_log.borrow_mut().push("second"));

    let loc = SystemLocation { system_index: 0, position: 0 };
    channel.publish(&loc);
    assert_eq!(*log.borrow(), vec!["first", "second"]);

    assert!(channel.unsubscribe(first));
    channel.publish(&loc);
    assert_eq!(*log.borrow(), vec!["first", "second", "second"]);
}

#[test]
fn svg_export_contains_every_system() {
    let area = rendered_area(3);
    let svg = area.scene().to_svg();

    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<g transform=").count(), 3);
    assert!(svg.contains("2♯"), "key signature label");
    println!("✓ Rendered {} systems ({} bytes)", area.layout().len(), svg.len());
}
