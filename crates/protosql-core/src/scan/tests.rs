use super::*;
use crate::{
    runner::DriverError,
    test_fixtures::{COLUMNS, ModelStatus, NestedModel, TestModel},
};
use time::{Duration, macros::datetime};

fn rows(rows: Vec<Row>) -> Rows<'static> {
    Box::new(rows.into_iter().map(Ok::<Row, DriverError>))
}

fn fetched_row() -> Row {
    Row::new(vec![
        SqlValue::Int64(22),
        "test".into(),
        "test.com".into(),
        "some descr".into(),
        SqlValue::Int64(1),
        SqlValue::Timestamp(datetime!(2024-06-01 09:00 +03:00)),
        SqlValue::Timestamp(datetime!(2024-06-01 06:30 UTC)),
        SqlValue::Int64(10_000),
        SqlValue::Int64(334),
        SqlValue::Text(r#"{"num": 123, "name": "some name", "active": true}"#.into()),
        SqlValue::Array(vec!["test".into(), "model".into()]),
        SqlValue::Bytes(br#"[{"num": 12, "name": "Item in nested list", "active": false}]"#.to_vec()),
        SqlValue::Bytes(b"123".to_vec()),
        SqlValue::Array(vec![SqlValue::Int32(1), SqlValue::Int32(2)]),
    ])
}

#[test]
fn scan_row_decodes_every_kind() {
    let record: TestModel = scan_row(fetched_row()).unwrap();

    assert_eq!(record.id, 22);
    assert_eq!(record.name, "test");
    assert_eq!(record.description, "some descr");
    assert_eq!(record.status, ModelStatus::Initial);
    assert_eq!(record.create_time, Some(datetime!(2024-06-01 06:00 UTC)));
    assert_eq!(record.update_time, Some(datetime!(2024-06-01 06:30 UTC)));
    assert_eq!(record.online_duration, Some(Duration::seconds(10)));
    assert_eq!(record.count, 334);
    assert_eq!(
        record.nested,
        Some(NestedModel {
            num: 123,
            name: "some name".into(),
            active: true,
        })
    );
    assert_eq!(record.tags, vec!["test", "model"]);
    assert_eq!(record.nested_list.len(), 1);
    assert_eq!(record.blob, b"123");
    assert_eq!(
        record.old_statuses,
        vec![ModelStatus::Initial, ModelStatus::Active]
    );
}

#[test]
fn scan_row_rejects_wrong_width() {
    let err = scan_row::<TestModel>(Row::new(vec![SqlValue::Int32(1)])).unwrap_err();

    assert!(matches!(
        err,
        DecodeError::ColumnCount {
            expected,
            found: 1
        } if expected == COLUMNS.len()
    ));
}

#[test]
fn adapter_rejects_mismatched_kind_with_column() {
    let mut values = fetched_row().into_values();
    values[5] = SqlValue::Text("yesterday".into());

    let err = scan_row::<TestModel>(Row::new(values)).unwrap_err();

    assert_eq!(
        err.to_string(),
        "column 'create_time': expected timestamp, found text"
    );
}

#[test]
fn null_columns_leave_defaults() {
    let mut values = fetched_row().into_values();
    for i in [4, 5, 7, 9, 10] {
        values[i] = SqlValue::Null;
    }

    let record: TestModel = scan_row(Row::new(values)).unwrap();

    assert_eq!(record.status, ModelStatus::Unspecified);
    assert_eq!(record.create_time, None);
    assert_eq!(record.online_duration, None);
    assert_eq!(record.nested, None);
    assert!(record.tags.is_empty());
}

#[test]
fn scan_one_on_zero_rows_is_not_found() {
    let err = scan_one::<TestModel>(rows(vec![])).unwrap_err();

    assert!(err.is_not_found());
}

#[test]
fn scan_one_takes_first_row() {
    let record: TestModel = scan_one(rows(vec![fetched_row(), Row::default()])).unwrap();

    assert_eq!(record.id, 22);
}

#[test]
fn scan_all_aborts_on_first_bad_row() {
    let err = scan_all::<TestModel>(rows(vec![fetched_row(), Row::default()])).unwrap_err();

    assert!(matches!(err, Error::Decode(DecodeError::ColumnCount { .. })));
}

#[test]
fn scan_all_passes_driver_errors_through() {
    let failing: Rows<'static> = Box::new(
        vec![
            Ok(fetched_row()),
            Err::<Row, DriverError>("connection reset".into()),
        ]
        .into_iter(),
    );

    let err = scan_all::<TestModel>(failing).unwrap_err();

    assert_eq!(err.to_string(), "connection reset");
    assert!(err.as_driver_error().is_some());
}
