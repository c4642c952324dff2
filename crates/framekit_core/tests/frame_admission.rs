use framekit_core::db::open_db_in_memory;
use framekit_core::{
    CircleParams, CircleService, FrameParams, FramePatch, FrameService, ServiceError,
    SqliteRegionStore, Violation,
};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

fn frame_count(conn: &rusqlite::Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM frames;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn admitted_frame_is_persisted_with_rounded_values() {
    let conn = setup();
    let service = FrameService::new(SqliteRegionStore::try_new(&conn).unwrap());

    let frame = service
        .admit_frame(&FrameParams::new("10.123456", "-4", "20", "8.5"))
        .unwrap();

    assert_eq!(frame.center_x, dec!(10.1235));
    assert_eq!(frame.center_y, dec!(-4));
    let loaded = service.get_frame(frame.id).unwrap();
    assert_eq!(loaded.frame, frame);
    assert_eq!(loaded.circles_count, 0);
}

#[test]
fn overlapping_frame_is_rejected_without_writes() {
    let conn = setup();
    let service = FrameService::new(SqliteRegionStore::try_new(&conn).unwrap());
    service
        .admit_frame(&FrameParams::new(0, 0, 100, 100))
        .unwrap();

    let err = service
        .admit_frame(&FrameParams::new(1, 1, 100, 100))
        .unwrap_err();

    match err {
        ServiceError::Rejected(rejection) => {
            assert_eq!(rejection.violations(), &[Violation::FrameCollision]);
            assert_eq!(rejection.message(), "collides with another existing frame");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(frame_count(&conn), 1);
}

#[test]
fn frames_sharing_an_edge_collide_but_separated_frames_do_not() {
    let conn = setup();
    let service = FrameService::new(SqliteRegionStore::try_new(&conn).unwrap());
    service
        .admit_frame(&FrameParams::new(0, 0, 100, 100))
        .unwrap();

    let touching = service.admit_frame(&FrameParams::new(100, 0, 100, 100));
    assert!(matches!(touching, Err(ServiceError::Rejected(_))));

    service
        .admit_frame(&FrameParams::new("100.0001", 0, 100, 100))
        .unwrap();
    assert_eq!(frame_count(&conn), 2);
}

#[test]
fn invalid_fields_are_reported_as_one_sentence() {
    let conn = setup();
    let service = FrameService::new(SqliteRegionStore::try_new(&conn).unwrap());
    let params = FrameParams {
        width: Some("0".to_string()),
        center_y: None,
        ..FrameParams::new(0, 0, 10, 10)
    };

    let err = service.admit_frame(&params).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Record Invalid: Center y can't be blank, Center y is not a number, and Width must be greater than 0"
    );
    assert_eq!(frame_count(&conn), 0);
}

#[test]
fn update_ignores_own_record_and_rechecks_neighbours() {
    let conn = setup();
    let service = FrameService::new(SqliteRegionStore::try_new(&conn).unwrap());
    let frame = service
        .admit_frame(&FrameParams::new(0, 0, 100, 100))
        .unwrap();
    service
        .admit_frame(&FrameParams::new(300, 0, 100, 100))
        .unwrap();

    let moved = service
        .update_frame(
            frame.id,
            &FramePatch {
                center_x: Some("10".to_string()),
                ..FramePatch::default()
            },
        )
        .unwrap();
    assert_eq!(moved.center_x, dec!(10));
    assert_eq!(moved.width, dec!(100));

    let err = service
        .update_frame(
            frame.id,
            &FramePatch {
                width: Some("500".to_string()),
                ..FramePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Rejected(_)));
    assert_eq!(service.get_frame(frame.id).unwrap().frame, moved);
}

#[test]
fn update_cannot_strand_owned_circles() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let frames = FrameService::new(store);
    let circles = CircleService::new(store);
    let frame = frames
        .admit_frame(&FrameParams::new(0, 0, 100, 100))
        .unwrap();
    circles
        .admit_circle_create(frame.id, &CircleParams::new(40, 0, 5))
        .unwrap();

    let err = frames
        .update_frame(
            frame.id,
            &FramePatch {
                width: Some("60".to_string()),
                ..FramePatch::default()
            },
        )
        .unwrap_err();

    match err {
        ServiceError::Rejected(rejection) => {
            assert_eq!(rejection.violations(), &[Violation::StrandedCircles]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn frame_with_circles_cannot_be_deleted_until_they_are_gone() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let frames = FrameService::new(store);
    let circles = CircleService::new(store);
    let frame = frames
        .admit_frame(&FrameParams::new(0, 0, 100, 100))
        .unwrap();
    let circle = circles
        .admit_circle_create(frame.id, &CircleParams::new(0, 0, 10))
        .unwrap();

    let err = frames.delete_frame(frame.id).unwrap_err();
    assert!(matches!(err, ServiceError::FrameInUse(id) if id == frame.id));
    assert!(err.to_string().contains("still referenced"));
    assert_eq!(frame_count(&conn), 1);

    circles.delete_circle(circle.id).unwrap();
    frames.delete_frame(frame.id).unwrap();
    assert_eq!(frame_count(&conn), 0);
}

#[test]
fn missing_frames_are_not_found() {
    let conn = setup();
    let service = FrameService::new(SqliteRegionStore::try_new(&conn).unwrap());
    let id = Uuid::new_v4();

    let err = service.get_frame(id).unwrap_err();
    assert_eq!(err.to_string(), format!("Couldn't find Frame with 'id'={id}"));
    assert!(matches!(
        service.delete_frame(id),
        Err(ServiceError::FrameNotFound(_))
    ));
    assert!(matches!(
        service.update_frame(id, &FramePatch::default()),
        Err(ServiceError::FrameNotFound(_))
    ));
}

#[test]
fn summary_exposes_extreme_circles() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let frames = FrameService::new(store);
    let circles = CircleService::new(store);
    let frame = frames
        .admit_frame(&FrameParams::new(0, 0, 100, 100))
        .unwrap();
    let top = circles
        .admit_circle_create(frame.id, &CircleParams::new(0, 30, 5))
        .unwrap();
    let bottom = circles
        .admit_circle_create(frame.id, &CircleParams::new(0, -30, 5))
        .unwrap();
    let left = circles
        .admit_circle_create(frame.id, &CircleParams::new(-30, 0, 5))
        .unwrap();
    let right = circles
        .admit_circle_create(frame.id, &CircleParams::new(30, 0, 5))
        .unwrap();

    let summary = frames.get_frame(frame.id).unwrap();
    assert_eq!(summary.circles_count, 4);
    assert_eq!(summary.highest_circle.as_ref().map(|c| c.id), Some(top.id));
    assert_eq!(summary.lowest_circle.as_ref().map(|c| c.id), Some(bottom.id));
    assert_eq!(summary.leftmost_circle.as_ref().map(|c| c.id), Some(left.id));
    assert_eq!(summary.rightmost_circle.as_ref().map(|c| c.id), Some(right.id));

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["id"], frame.id.to_string());
    assert_eq!(json["circles_count"], 4);
    assert_eq!(json["highest_circle"]["id"], top.id.to_string());
}

#[test]
fn list_frames_keeps_insertion_order_and_counts() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let frames = FrameService::new(store);
    let circles = CircleService::new(store);
    let first = frames
        .admit_frame(&FrameParams::new(0, 0, 10, 10))
        .unwrap();
    let second = frames
        .admit_frame(&FrameParams::new(50, 50, 10, 10))
        .unwrap();
    circles
        .admit_circle_create(second.id, &CircleParams::new(50, 50, 2))
        .unwrap();

    let listed = frames.list_frames().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].frame.id, first.id);
    assert_eq!(listed[0].circles_count, 0);
    assert!(listed[0].highest_circle.is_none());
    assert_eq!(listed[1].frame.id, second.id);
    assert_eq!(listed[1].circles_count, 1);
}
