use protosql::{
    config::PlaceholderStyle,
    error::ErrorClass,
    mock::{MockConnection, MockEvent},
    prelude::*,
    query::SelectQuery,
    runner::{Connection, DriverError, Rows, StatementRunner, Transaction},
    value::Row,
};
use std::collections::HashMap;
use time::{Duration, OffsetDateTime, macros::datetime};

#[derive(Clone, Copy, Debug, Default, Enumeration, Eq, PartialEq)]
enum Tier {
    #[default]
    Unspecified = 0,
    Free = 1,
    Pro = 2,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
struct Address {
    city: String,
    zip: String,
}

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct Account {
    #[sql(protobuf = "varint,1,opt,name=id,proto3")]
    id: i64,

    #[sql(protobuf = "bytes,2,opt,name=email,proto3")]
    email: String,

    #[sql(protobuf = "varint,3,opt,name=tier,proto3", enumeration)]
    tier: Tier,

    #[sql(protobuf = "bytes,4,opt,name=address,proto3")]
    address: Option<Address>,

    #[sql(db = "attributes")]
    attributes: HashMap<String, String>,

    #[sql(protobuf = "varint,6,rep,packed,name=scores,proto3")]
    scores: Vec<i32>,

    #[sql(protobuf = "bytes,7,opt,name=session_length,proto3")]
    session_length: Option<Duration>,

    #[sql(protobuf = "bytes,8,opt,name=created,proto3", created_at)]
    created: Option<OffsetDateTime>,

    cache: Vec<u8>,
}

///
/// ListAccounts
/// The shape of a typical list request message.
///

struct ListAccounts {
    page_size: u32,
    page: u32,
    tier: Tier,
    email: String,
}

impl Pager for ListAccounts {
    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn current_page(&self) -> u32 {
        self.page
    }
}

fn account() -> Account {
    Account {
        id: 7,
        email: "a@example.com".into(),
        tier: Tier::Pro,
        address: Some(Address {
            city: "Oslo".into(),
            zip: "0150".into(),
        }),
        attributes: HashMap::from([("source".to_string(), "import".to_string())]),
        scores: vec![3, 5],
        session_length: Some(Duration::minutes(3)),
        created: Some(datetime!(2025-02-03 04:05 UTC)),
        cache: Vec::new(),
    }
}

#[test]
fn list_request_lowers_to_expected_select() {
    let repo = Repo::<Account>::new("accounts");
    let request = ListAccounts {
        page_size: 20,
        page: 2,
        tier: Tier::Unspecified,
        email: "example".into(),
    };

    let statement = repo
        .select()
        .filter(
            Filter::new()
                .eq("tier", request.tier)
                .contain("email", request.email.as_str()),
        )
        .order_by(Sortings::from_pairs([("id", "desc")]).unwrap())
        .paginate(&request)
        .statement()
        .unwrap();

    assert_eq!(
        statement.sql,
        "SELECT accounts.id,accounts.email,accounts.tier,accounts.address,\
         accounts.attributes,accounts.scores,accounts.session_length,accounts.created \
         FROM accounts WHERE email ILIKE $1 ORDER BY id DESC LIMIT 20 OFFSET 40"
    );
    assert_eq!(statement.args, vec![SqlValue::from("%example%")]);
}

#[test]
fn round_trip_through_mock_runner() {
    let conn = MockConnection::new();
    let repo = Repo::<Account>::new("accounts");
    let mut written = account();

    repo.insert(ExecContext::Connection(&conn), &mut written)
        .unwrap();
    let args = conn.last_statement().unwrap().args().to_vec();
    conn.push_rows([args]);

    let read = repo
        .find_by_id(ExecContext::Connection(&conn), written.id)
        .unwrap();

    assert_eq!(read, written);
    assert!(read.cache.is_empty());
}

#[test]
fn config_from_json_switches_placeholder_style() {
    let config = SqlConfig::from_json(r#"{ "placeholder_style": "question", "max_page_size": 50 }"#)
        .unwrap();
    assert_eq!(config.placeholder_style, PlaceholderStyle::Question);
    assert_eq!(config.default_page_size, 12);

    let statement = SelectQuery::from_table("accounts", ["id"])
        .filter(Filter::new().in_("tier", Operand::enums([Tier::Free, Tier::Pro])))
        .paginate(page(0, 500))
        .build(&config)
        .unwrap();

    assert_eq!(
        statement.sql,
        "SELECT accounts.id FROM accounts WHERE tier IN (?, ?) LIMIT 50"
    );
}

#[test]
fn fetch_one_on_empty_result_is_not_found() {
    let conn = MockConnection::new();

    let err = Repo::<Account>::new("accounts")
        .select()
        .filter(Filter::new().eq("email", "nobody@example.com"))
        .fetch_one(ExecContext::Connection(&conn))
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::NotFound);
}

#[test]
fn transaction_wraps_statements() {
    let conn = MockConnection::new();
    let repo = Repo::<Account>::new("accounts");

    let moved = repo
        .transaction(ExecContext::Connection(&conn), |tx| {
            repo.select().filter(Filter::new().eq("id", 7_i64)).lock().fetch(tx)?;
            repo.update_by_id(tx, &mut account())
        })
        .unwrap();

    assert_eq!(moved, 1);
    let events = conn.events();
    assert_eq!(events[0], MockEvent::Begin);
    assert!(events[1].sql().unwrap().ends_with(" WHERE id = $1 FOR UPDATE"));
    assert!(events[2].sql().unwrap().starts_with("UPDATE accounts SET email=$2"));
    assert_eq!(events[3], MockEvent::Commit);
}

///
/// FailingBegin
/// A driver whose connection cannot start a transaction.
///

struct FailingBegin;

impl StatementRunner for FailingBegin {
    fn execute(&self, _sql: &str, _args: &[SqlValue]) -> Result<u64, DriverError> {
        Ok(0)
    }

    fn query(&self, _sql: &str, _args: &[SqlValue]) -> Result<Rows<'_>, DriverError> {
        Ok(Box::new(std::iter::empty::<Result<Row, DriverError>>()))
    }
}

impl Connection for FailingBegin {
    fn begin(&self) -> Result<Box<dyn Transaction + '_>, DriverError> {
        Err("too many connections".into())
    }
}

#[test]
fn begin_failure_is_execution_error() {
    let repo = Repo::<Account>::new("accounts");
    let mut ran = false;

    let err = repo
        .transaction(ExecContext::Connection(&FailingBegin), |_| {
            ran = true;
            Ok(())
        })
        .unwrap_err();

    assert!(!ran);
    assert_eq!(err.class(), ErrorClass::Execution);
    assert_eq!(err.to_string(), "too many connections");
}
