use protosql_derive::{Enumeration, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::{Duration, OffsetDateTime};

pub(crate) const TABLE: &str = "xxx_table";

pub(crate) const COLUMNS: [&str; 14] = [
    "id",
    "name",
    "website",
    "descr",
    "status",
    "create_time",
    "update_time",
    "online_duration",
    "count",
    "nested",
    "tags",
    "nested_list",
    "blob",
    "old_statuses",
];

///
/// ModelStatus
///

#[derive(Clone, Copy, Debug, Default, Enumeration, Eq, PartialEq)]
pub(crate) enum ModelStatus {
    #[default]
    Unspecified = 0,
    Initial = 1,
    Active = 2,
    Blocked = 3,
}

///
/// NestedModel
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct NestedModel {
    pub(crate) num: i32,
    pub(crate) name: String,
    pub(crate) active: bool,
}

///
/// TestModel
///
/// Covers every field kind. `labels` has no tag and is never mapped.
///

#[derive(Clone, Debug, Default, PartialEq, Record)]
pub(crate) struct TestModel {
    #[sql(protobuf = "varint,1,opt,name=id,proto3")]
    pub(crate) id: i32,

    #[sql(protobuf = "bytes,2,opt,name=name,proto3")]
    pub(crate) name: String,

    #[sql(protobuf = "bytes,3,opt,name=website,proto3")]
    pub(crate) website: String,

    #[sql(protobuf = "bytes,4,opt,name=descr,proto3")]
    pub(crate) description: String,

    #[sql(protobuf = "varint,5,opt,name=status,proto3", enumeration)]
    pub(crate) status: ModelStatus,

    #[sql(protobuf = "bytes,6,opt,name=create_time,proto3", created_at)]
    pub(crate) create_time: Option<OffsetDateTime>,

    #[sql(protobuf = "bytes,7,opt,name=update_time,proto3", updated_at)]
    pub(crate) update_time: Option<OffsetDateTime>,

    #[sql(protobuf = "bytes,8,opt,name=online_duration,proto3")]
    pub(crate) online_duration: Option<Duration>,

    #[sql(protobuf = "varint,9,opt,name=count,proto3")]
    pub(crate) count: i64,

    #[sql(protobuf = "bytes,10,opt,name=nested,proto3")]
    pub(crate) nested: Option<NestedModel>,

    #[sql(protobuf = "bytes,11,rep,name=tags,proto3")]
    pub(crate) tags: Vec<String>,

    #[sql(db = "nested_list")]
    pub(crate) nested_list: Vec<NestedModel>,

    #[sql(protobuf = "bytes,13,opt,name=blob,proto3")]
    pub(crate) blob: Vec<u8>,

    #[sql(protobuf = "varint,14,rep,packed,name=old_statuses,proto3", enumeration)]
    pub(crate) old_statuses: Vec<ModelStatus>,

    pub(crate) labels: BTreeMap<String, String>,
}

/// The canonical fixture: status BLOCKED, two tags, one nested object.
pub(crate) fn test_model() -> TestModel {
    TestModel {
        id: 123,
        name: "test model".to_string(),
        website: "test.com".to_string(),
        description: "model for testing Repo".to_string(),
        status: ModelStatus::Blocked,
        create_time: Some(time::macros::datetime!(2024-03-01 10:00 UTC)),
        update_time: Some(time::macros::datetime!(2024-03-02 11:30 UTC)),
        online_duration: Some(Duration::seconds(90)),
        count: 30_005_000,
        nested: Some(NestedModel {
            num: 323,
            name: "Nested obj".to_string(),
            active: true,
        }),
        tags: vec!["test".to_string(), "model".to_string()],
        nested_list: vec![NestedModel {
            num: 12,
            name: "Item in nested list".to_string(),
            active: false,
        }],
        blob: b"123".to_vec(),
        old_statuses: vec![ModelStatus::Initial, ModelStatus::Active],
        labels: BTreeMap::new(),
    }
}

///
/// SortSpec
///
/// Legacy single-field sort request: each mapped field holds a direction
/// token or is left empty.
///

#[derive(Clone, Debug, Default, Record)]
pub(crate) struct SortSpec {
    #[sql(db = "name")]
    pub(crate) name: String,

    #[sql(db = "create_time")]
    pub(crate) create_time: String,
}
