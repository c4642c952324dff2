use framekit_core::db::open_db_in_memory;
use framekit_core::{
    AreaQuery, CircleFilter, CircleParams, CircleService, FrameParams, FrameService,
    ServiceError, SqliteRegionStore, UsageError,
};
use rust_decimal_macros::dec;

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn area_filter_keeps_only_circles_inside_the_query_disk() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let frame = FrameService::new(store)
        .admit_frame(&FrameParams::new(0, 0, 100, 100))
        .unwrap();
    let service = CircleService::new(store);
    let inside = service
        .admit_circle_create(frame.id, &CircleParams::new(0, 0, 5))
        .unwrap();
    service
        .admit_circle_create(frame.id, &CircleParams::new(10, 10, 1))
        .unwrap();

    let filter =
        CircleFilter::all().with_area(AreaQuery::new(dec!(0), dec!(0), dec!(5)).unwrap());
    let matches = service.filter_circles(&filter).unwrap();

    assert_eq!(matches, vec![inside]);
}

#[test]
fn frame_and_area_filters_combine() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let frames = FrameService::new(store);
    let left = frames
        .admit_frame(&FrameParams::new(0, 0, 100, 100))
        .unwrap();
    let right = frames
        .admit_frame(&FrameParams::new(200, 0, 100, 100))
        .unwrap();
    let service = CircleService::new(store);
    let wanted = service
        .admit_circle_create(left.id, &CircleParams::new(40, 0, 2))
        .unwrap();
    service
        .admit_circle_create(left.id, &CircleParams::new(-40, 0, 2))
        .unwrap();
    service
        .admit_circle_create(right.id, &CircleParams::new(160, 0, 2))
        .unwrap();

    let everything = service.filter_circles(&CircleFilter::all()).unwrap();
    assert_eq!(everything.len(), 3);

    let by_frame = service
        .filter_circles(&CircleFilter::all().with_frame_id(left.id))
        .unwrap();
    assert_eq!(by_frame.len(), 2);

    let filter = CircleFilter::from_pairs([
        ("frame_id", left.id.to_string()),
        ("center_x", "100".to_string()),
        ("center_y", "0".to_string()),
        ("radius", "70".to_string()),
    ])
    .unwrap();
    assert_eq!(service.filter_circles(&filter).unwrap(), vec![wanted]);
}

#[test]
fn incomplete_area_filter_is_refused_before_reading() {
    let err = CircleFilter::from_pairs([("center_x", "0"), ("center_y", "0"), ("radius", " ")])
        .unwrap_err();
    assert_eq!(
        err,
        UsageError::PartialArea {
            missing: vec!["radius"]
        }
    );

    let service_err = ServiceError::from(err);
    assert!(service_err
        .to_string()
        .starts_with("Missing parameters: center_x, center_y and radius"));
}

#[test]
fn oversized_area_query_is_a_usage_error_not_a_crash() {
    let conn = setup();
    let store = SqliteRegionStore::try_new(&conn).unwrap();
    let frame = FrameService::new(store)
        .admit_frame(&FrameParams::new(0, 0, 100, 100))
        .unwrap();
    let service = CircleService::new(store);
    service
        .admit_circle_create(frame.id, &CircleParams::new(0, 0, 5))
        .unwrap();

    for (key, huge) in [("radius", "1e20"), ("center_x", "1e20"), ("center_y", "-1e40")] {
        let mut pairs = vec![("center_x", "0"), ("center_y", "0"), ("radius", "5")];
        for pair in pairs.iter_mut() {
            if pair.0 == key {
                pair.1 = huge;
            }
        }

        let err = CircleFilter::from_pairs(pairs).unwrap_err();
        assert!(matches!(
            err,
            UsageError::FilterValueOutOfRange { key: rejected, .. } if rejected == key
        ));
        assert_eq!(
            ServiceError::from(err).to_string(),
            format!("value `{huge}` for filter `{key}` is out of range")
        );
    }

    let widest = CircleFilter::from_pairs([
        ("center_x", "99999999.9999"),
        ("center_y", "-99999999.9999"),
        ("radius", "99999999.9999"),
    ])
    .unwrap();
    assert!(service.filter_circles(&widest).unwrap().is_empty());
}
