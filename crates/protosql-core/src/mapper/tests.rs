use super::*;
use crate::{
    codec::FieldKind,
    test_fixtures::{COLUMNS, ModelStatus, TestModel, test_model},
};
use protosql_derive::Record;
use time::macros::datetime;

#[test]
fn name_component_wins_over_first_segment() {
    assert_eq!(name_from_tag("bytes,2,opt,name=display_name,proto3"), "display_name");
    assert_eq!(name_from_tag("website"), "website");
    assert_eq!(name_from_tag("nested_list,omitempty"), "nested_list");
}

#[test]
fn column_name_falls_back_to_secondary_tag() {
    assert_eq!(
        column_name(None, Some("descr")).as_deref(),
        Some("descr")
    );
    assert_eq!(
        column_name(Some("varint,1,name=id"), Some("ignored")).as_deref(),
        Some("id")
    );
    assert_eq!(column_name(None, None), None);
    assert_eq!(column_name(Some(""), None), None);
}

#[test]
fn layout_order_follows_declaration_and_skips_untagged() {
    let layout = TestModel::layout();

    assert_eq!(layout.columns().collect::<Vec<_>>(), COLUMNS);
    assert_eq!(layout.position("labels"), None);
    assert_eq!(layout.position("descr"), Some(3));
}

#[test]
fn layout_is_cached_per_type() {
    assert!(std::ptr::eq(TestModel::layout(), TestModel::layout()));
}

#[test]
fn layout_kinds_match_field_types() {
    let kinds = TestModel::layout()
        .fields()
        .iter()
        .map(|f| (f.column.as_str(), f.kind))
        .collect::<Vec<_>>();

    assert!(kinds.contains(&("status", FieldKind::Enum)));
    assert!(kinds.contains(&("create_time", FieldKind::Timestamp)));
    assert!(kinds.contains(&("online_duration", FieldKind::Duration)));
    assert!(kinds.contains(&("nested", FieldKind::Json)));
    assert!(kinds.contains(&("tags", FieldKind::Array)));
    assert!(kinds.contains(&("nested_list", FieldKind::Json)));
    assert!(kinds.contains(&("blob", FieldKind::Bytes)));
    assert!(kinds.contains(&("old_statuses", FieldKind::EnumArray)));
}

#[test]
fn encode_yields_one_value_per_column_in_order() {
    let values = TestModel::layout().encode(&test_model()).unwrap();

    assert_eq!(values.len(), COLUMNS.len());
    assert_eq!(values[0], SqlValue::Int32(123));
    assert_eq!(values[3], SqlValue::Text("model for testing Repo".into()));
    assert_eq!(values[4], SqlValue::Int32(3));
    assert_eq!(values[7], SqlValue::Int64(90_000));
    assert_eq!(
        values[9],
        SqlValue::Json(r#"{"num":323,"name":"Nested obj","active":true}"#.into())
    );
    assert_eq!(
        values[10],
        SqlValue::Array(vec![SqlValue::Text("test".into()), SqlValue::Text("model".into())])
    );
    assert_eq!(values[12], SqlValue::Bytes(b"123".to_vec()));
}

#[test]
fn decode_attaches_column_to_error() {
    let layout = TestModel::layout();
    let status = &layout.fields()[4];
    let mut record = TestModel::default();

    let err = status
        .decode(&mut record, SqlValue::Text("x".into()))
        .unwrap_err();

    assert_eq!(err.to_string(), "column 'status': expected ModelStatus, found text");
}

#[test]
fn stamp_touches_only_the_requested_role() {
    let layout = TestModel::layout();
    let mut record = TestModel {
        status: ModelStatus::Active,
        ..TestModel::default()
    };
    let now = datetime!(2025-01-01 00:00 UTC);

    layout
        .stamp(&mut record, FieldRole::UpdatedAt, now)
        .unwrap();

    assert_eq!(record.update_time, Some(now));
    assert_eq!(record.create_time, None);
}

#[test]
fn stamp_on_non_timestamp_field_is_reported() {
    let mut descriptors = TestModel::descriptors();
    descriptors[1].role = FieldRole::UpdatedAt;
    let layout = RecordLayout::reflect(descriptors);
    let mut record = TestModel::default();

    let err = layout
        .stamp(&mut record, FieldRole::UpdatedAt, datetime!(2025-01-01 00:00 UTC))
        .unwrap_err();

    assert_eq!(err.to_string(), "column 'name': expected text, found timestamp");
}

#[derive(Debug, Default, Record)]
struct Counters {
    #[sql(protobuf = "varint,1,rep,packed,name=hits,proto3")]
    hits: Vec<u32>,
}

#[test]
fn repeated_unsigned_field_is_a_native_array() {
    let layout = Counters::layout();
    assert_eq!(layout.fields()[0].kind, FieldKind::Array);

    let record = Counters { hits: vec![1, 2] };
    assert_eq!(
        layout.encode(&record).unwrap(),
        vec![SqlValue::Array(vec![SqlValue::Int64(1), SqlValue::Int64(2)])]
    );

    let mut scanned = Counters::default();
    layout.fields()[0]
        .decode(
            &mut scanned,
            SqlValue::Array(vec![SqlValue::Int32(3), SqlValue::Int64(4)]),
        )
        .unwrap();
    assert_eq!(scanned.hits, vec![3, 4]);
}

#[test]
fn reflect_drops_descriptors_without_a_column() {
    let mut descriptors = TestModel::descriptors();
    descriptors[1].primary_tag = Some(",");
    let layout = RecordLayout::reflect(descriptors);

    assert_eq!(layout.len(), COLUMNS.len() - 1);
    assert_eq!(layout.position("name"), None);
}
