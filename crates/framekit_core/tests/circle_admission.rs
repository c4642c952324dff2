use framekit_core::db::open_db_in_memory;
use framekit_core::{
    CircleParams, CirclePatch, CircleService, Frame, FrameParams, FrameService, ServiceError,
    SqliteRegionStore, Violation,
};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

fn circle_count(conn: &rusqlite::Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM circles;", [], |row| row.get(0))
        .unwrap()
}

fn admit_frame(store: SqliteRegionStore<'_>, center_x: i64) -> Frame {
    FrameService::new(store)
        .admit_frame(&FrameParams::new(center_x, 0, 100, 100))
        .unwrap()
}

fn rejected_with(err: ServiceError) -> Vec<Violation> {
    match err {
        ServiceError::Rejected(rejection) => rejection.into_violations(),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn second_overlapping_circle_is_rejected() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let frame = admit_frame(store, 0);
    let service = CircleService::new(store);

    let first = service
        .admit_circle_create(frame.id, &CircleParams::new(0, 0, 10))
        .unwrap();
    assert_eq!(first.frame_id, frame.id);
    assert_eq!(first.radius, dec!(10));

    let err = service
        .admit_circle_create(frame.id, &CircleParams::new(0, 1, 10))
        .unwrap_err();
    assert_eq!(err.to_string(), "Record Invalid: collides with another existing circle");
    assert_eq!(circle_count(&conn), 1);
}

#[test]
fn circle_reaching_outside_frame_is_rejected() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let frame = admit_frame(store, 0);
    let service = CircleService::new(store);

    let err = service
        .admit_circle_create(frame.id, &CircleParams::new(105, 0, 1))
        .unwrap_err();
    assert_eq!(rejected_with(err), vec![Violation::OutsideFrame]);

    service
        .admit_circle_create(frame.id, &CircleParams::new(45, 0, 5))
        .unwrap();
    assert_eq!(circle_count(&conn), 1);
}

#[test]
fn tangent_circles_collide() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let frame = admit_frame(store, 0);
    let service = CircleService::new(store);
    service
        .admit_circle_create(frame.id, &CircleParams::new(0, 0, 10))
        .unwrap();

    let err = service
        .admit_circle_create(frame.id, &CircleParams::new(20, 0, 10))
        .unwrap_err();
    assert_eq!(rejected_with(err), vec![Violation::CircleCollision]);

    service
        .admit_circle_create(frame.id, &CircleParams::new("20.0001", 0, 10))
        .unwrap();
}

#[test]
fn circles_in_different_frames_are_never_compared() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let left = admit_frame(store, 0);
    let right = admit_frame(store, 200);
    let service = CircleService::new(store);

    service
        .admit_circle_create(left.id, &CircleParams::new(40, 0, 10))
        .unwrap();
    service
        .admit_circle_create(right.id, &CircleParams::new(160, 0, 10))
        .unwrap();
    assert_eq!(circle_count(&conn), 2);
}

#[test]
fn invalid_circle_reports_field_problems() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let frame = admit_frame(store, 0);
    let service = CircleService::new(store);
    let params = CircleParams {
        radius: Some("-1".to_string()),
        ..CircleParams::new("abc", 0, 1)
    };

    let err = service.admit_circle_create(frame.id, &params).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Record Invalid: Center x is not a number and Radius must be greater than 0"
    );
    assert_eq!(circle_count(&conn), 0);
}

#[test]
fn unknown_frame_is_not_found() {
    let conn = setup();
    let service = CircleService::new(SqliteRegionStore::try_new(&conn).unwrap());
    let frame_id = Uuid::new_v4();

    let err = service
        .admit_circle_create(frame_id, &CircleParams::new(0, 0, 1))
        .unwrap_err();
    assert!(matches!(err, ServiceError::FrameNotFound(id) if id == frame_id));
}

#[test]
fn update_ignores_own_record() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let frame = admit_frame(store, 0);
    let service = CircleService::new(store);
    let circle = service
        .admit_circle_create(frame.id, &CircleParams::new(0, 0, 10))
        .unwrap();

    let shrunk = service
        .admit_circle_update(
            circle.id,
            &CirclePatch {
                radius: Some("4".to_string()),
                ..CirclePatch::default()
            },
        )
        .unwrap();

    assert_eq!(shrunk.id, circle.id);
    assert_eq!(shrunk.frame_id, frame.id);
    assert_eq!(shrunk.center_x, dec!(0));
    assert_eq!(shrunk.radius, dec!(4));
    assert_eq!(service.get_circle(circle.id).unwrap(), shrunk);
}

#[test]
fn rejected_update_leaves_circle_untouched() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let frame = admit_frame(store, 0);
    let service = CircleService::new(store);
    let circle = service
        .admit_circle_create(frame.id, &CircleParams::new(-20, 0, 5))
        .unwrap();
    service
        .admit_circle_create(frame.id, &CircleParams::new(20, 0, 5))
        .unwrap();

    let err = service
        .admit_circle_update(
            circle.id,
            &CirclePatch {
                center_x: Some("48".to_string()),
                radius: Some("5".to_string()),
                ..CirclePatch::default()
            },
        )
        .unwrap_err();

    assert_eq!(
        rejected_with(err),
        vec![Violation::OutsideFrame]
    );
    assert_eq!(service.get_circle(circle.id).unwrap(), circle);
}

#[test]
fn deleting_missing_circle_is_not_found() {
    let conn = setup();
    let service = CircleService::new(SqliteRegionStore::try_new(&conn).unwrap());
    let id = Uuid::new_v4();

    assert!(matches!(
        service.delete_circle(id),
        Err(ServiceError::CircleNotFound(missing)) if missing == id
    ));
    assert!(matches!(
        service.admit_circle_update(id, &CirclePatch::default()),
        Err(ServiceError::CircleNotFound(_))
    ));
}
