use super::*;
use crate::{
    config::PlaceholderStyle,
    error::ErrorClass,
    mock::{MockConnection, MockEvent},
    test_fixtures::{COLUMNS, ModelStatus, TABLE, TestModel, test_model},
};

fn repo() -> Repo<TestModel> {
    Repo::new(TABLE)
}

fn last_sql(conn: &MockConnection) -> String {
    conn.last_statement()
        .and_then(|e| e.sql().map(str::to_string))
        .unwrap_or_default()
}

#[test]
fn insert_binds_every_column_in_layout_order() {
    let conn = MockConnection::new();
    let mut record = test_model();
    let before = OffsetDateTime::now_utc();

    repo()
        .insert(ExecContext::Connection(&conn), &mut record)
        .unwrap();

    let statement = conn.last_statement().unwrap();
    assert_eq!(
        statement.sql(),
        Some(
            "INSERT INTO xxx_table (id,name,website,descr,status,create_time,update_time,\
             online_duration,count,nested,tags,nested_list,blob,old_statuses) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14)"
        )
    );
    assert_eq!(statement.args().len(), COLUMNS.len());
    assert_eq!(statement.args()[0], SqlValue::Int32(123));

    // audit fields were stamped and the stamped values were bound
    assert!(record.create_time.is_some_and(|ts| ts >= before));
    assert_eq!(record.create_time, record.update_time);
    assert_eq!(statement.args()[5], SqlValue::from(record.create_time));
}

#[test]
fn insert_ignore_duplicate_reports_whether_a_row_was_written() {
    let conn = MockConnection::new();
    conn.push_affected(0);

    let written = repo()
        .insert_ignore_duplicate(ExecContext::Connection(&conn), &mut test_model())
        .unwrap();

    assert!(!written);
    assert!(last_sql(&conn).ends_with(" ON CONFLICT(id) DO NOTHING"));
}

#[test]
fn update_by_id_keeps_key_in_where_and_create_time_untouched() {
    let conn = MockConnection::new();
    let mut record = test_model();
    let created = record.create_time;

    let affected = repo()
        .update_by_id(ExecContext::Connection(&conn), &mut record)
        .unwrap();

    assert_eq!(affected, 1);
    assert_eq!(record.create_time, created);
    assert_ne!(record.update_time, test_model().update_time);

    let sql = last_sql(&conn);
    assert!(sql.starts_with("UPDATE xxx_table SET name=$2,website=$3,"));
    assert!(sql.ends_with(" WHERE id=$1"));
}

#[test]
fn update_by_filter_appends_filter_args() {
    let conn = MockConnection::new();

    repo()
        .update(
            ExecContext::Connection(&conn),
            &mut test_model(),
            &Filter::new().eq("name", "test model"),
        )
        .unwrap();

    let statement = conn.last_statement().unwrap();
    assert!(statement.sql().unwrap().ends_with(" WHERE name = $14"));
    assert_eq!(statement.args().len(), COLUMNS.len());
    assert_eq!(statement.args()[13], SqlValue::from("test model"));
}

#[test]
fn update_by_filter_never_rewrites_primary_key() {
    let conn = MockConnection::new();

    repo()
        .update(
            ExecContext::Connection(&conn),
            &mut test_model(),
            &Filter::new().eq("status", ModelStatus::Active),
        )
        .unwrap();

    let statement = conn.last_statement().unwrap();
    let sql = statement.sql().unwrap();
    assert!(sql.starts_with("UPDATE xxx_table SET name=$1,website=$2,"));
    assert!(!sql.contains("id="));
    assert!(sql.ends_with(" WHERE status = $14"));
    assert!(!statement.args().contains(&SqlValue::Int32(123)));
}

#[test]
fn update_by_id_without_key_column_is_input_error() {
    let conn = MockConnection::new();
    let config = SqlConfig {
        primary_key: "uuid".into(),
        ..SqlConfig::default()
    };

    let err = Repo::<TestModel>::with_config(TABLE, config)
        .update_by_id(ExecContext::Connection(&conn), &mut test_model())
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::Input);
    assert!(conn.events().is_empty());
}

#[test]
fn delete_and_exec_pass_through() {
    let conn = MockConnection::new();
    conn.push_affected(3);
    let ctx = ExecContext::Connection(&conn);

    let deleted = repo()
        .delete(ctx, &Filter::new().lt("count", 10))
        .unwrap();
    assert_eq!(deleted, 3);
    assert_eq!(last_sql(&conn), "DELETE FROM xxx_table WHERE count < $1");

    repo()
        .exec(ctx, "VACUUM xxx_table", Vec::new())
        .unwrap();
    assert_eq!(last_sql(&conn), "VACUUM xxx_table");
}

#[test]
fn find_by_id_selects_mapped_columns() {
    let conn = MockConnection::new();
    let values = TestModel::layout().encode(&test_model()).unwrap();
    conn.push_rows([values]);

    let found = repo()
        .find_by_id(ExecContext::Connection(&conn), 123)
        .unwrap();

    assert_eq!(found.id, 123);
    assert_eq!(found.status, test_model().status);

    let statement = conn.last_statement().unwrap();
    assert_eq!(
        statement.sql(),
        Some(format!("{} WHERE id = $1", repo().select_query()).as_str())
    );
    assert_eq!(statement.args(), &[SqlValue::Int32(123)]);
}

#[test]
fn find_by_id_without_rows_is_not_found() {
    let conn = MockConnection::new();

    let err = repo()
        .find_by_id(ExecContext::Connection(&conn), 404)
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.class(), ErrorClass::NotFound);
}

#[test]
fn select_fetches_every_row() {
    let conn = MockConnection::new();
    let values = TestModel::layout().encode(&test_model()).unwrap();
    conn.push_rows([values.clone(), values]);

    let found = repo()
        .select()
        .filter(Filter::new().eq("status", test_model().status))
        .paginate(crate::query::page(0, 2))
        .fetch(ExecContext::Connection(&conn))
        .unwrap();

    assert_eq!(found.len(), 2);
    assert!(last_sql(&conn).ends_with(" WHERE status = $1 LIMIT 2"));
}

#[test]
fn select_custom_scans_into_record() {
    let conn = MockConnection::new();
    conn.push_rows([TestModel::layout().encode(&test_model()).unwrap()]);

    let found = repo()
        .select_custom("SELECT * FROM xxx_table")
        .filter(Filter::new().eq("id", 123))
        .lock()
        .fetch_one(ExecContext::Connection(&conn))
        .unwrap();

    assert_eq!(found.tags, test_model().tags);
    assert_eq!(
        last_sql(&conn),
        "SELECT * FROM xxx_table WHERE id = $1 FOR UPDATE"
    );
}

#[test]
fn write_then_read_round_trips() {
    let conn = MockConnection::new();
    let mut original = test_model();
    repo()
        .insert(ExecContext::Connection(&conn), &mut original)
        .unwrap();

    let written = conn.last_statement().unwrap().args().to_vec();
    conn.push_rows([written]);

    let read = repo()
        .find_by_id(ExecContext::Connection(&conn), original.id)
        .unwrap();

    assert_eq!(read, original);
}

#[test]
fn question_placeholders_apply_to_writes() {
    let conn = MockConnection::new();
    let config = SqlConfig {
        placeholder_style: PlaceholderStyle::Question,
        ..SqlConfig::default()
    };

    Repo::<TestModel>::with_config(TABLE, config)
        .delete(
            ExecContext::Connection(&conn),
            &Filter::new().eq("name", "x").eq("count", 2),
        )
        .unwrap();

    assert_eq!(
        last_sql(&conn),
        "DELETE FROM xxx_table WHERE name = ? AND count = ?"
    );
}

#[test]
fn driver_errors_are_passed_through() {
    let conn = MockConnection::new();
    conn.push_execute_error("duplicate key");

    let err = repo()
        .insert(ExecContext::Connection(&conn), &mut test_model())
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::Execution);
    assert_eq!(err.to_string(), "mock: duplicate key");
}

// ----------------------------------------------------------------------
// Transactions
// ----------------------------------------------------------------------

#[test]
fn transaction_commits_on_success() {
    let conn = MockConnection::new();
    let repo = repo();

    repo.transaction(ExecContext::Connection(&conn), |tx| {
        assert!(tx.in_transaction());
        repo.insert(tx, &mut test_model())?;
        repo.delete(tx, &Filter::new().eq("id", 1))
    })
    .unwrap();

    let events = conn.events();
    assert_eq!(events.first(), Some(&MockEvent::Begin));
    assert_eq!(events.last(), Some(&MockEvent::Commit));
    assert_eq!(conn.statements().len(), 2);
}

#[test]
fn transaction_rolls_back_on_error() {
    let conn = MockConnection::new();
    conn.push_affected(1);
    conn.push_execute_error("boom");
    let repo = repo();

    let err = repo
        .transaction(ExecContext::Connection(&conn), |tx| {
            repo.insert(tx, &mut test_model())?;
            repo.insert(tx, &mut test_model())
        })
        .unwrap_err();

    assert_eq!(err.to_string(), "mock: boom");
    assert_eq!(conn.events().last(), Some(&MockEvent::Rollback));
}

#[test]
fn rollback_failure_keeps_original_error() {
    let conn = MockConnection::new();
    conn.fail_rollback();

    let err = repo()
        .transaction(ExecContext::Connection(&conn), |_| {
            Err::<(), _>(Error::not_found::<TestModel>())
        })
        .unwrap_err();

    assert!(err.is_not_found());
}

#[test]
fn nested_transaction_joins_outer() {
    let conn = MockConnection::new();
    let repo = repo();

    repo.transaction(ExecContext::Connection(&conn), |outer| {
        repo.transaction(outer, |inner| repo.delete(inner, &Filter::new()))
    })
    .unwrap();

    let begins = conn
        .events()
        .iter()
        .filter(|e| **e == MockEvent::Begin)
        .count();
    assert_eq!(begins, 1);
}
