//! Model tests against a live database.
//!
//! Set `DATABASE_URL` (or put it in `.env`) to run them; otherwise each test
//! returns early. Every test works inside its own schema within a transaction
//! that is rolled back, so nothing persists.

use jobly::{
    Company, CompanyFilter, Job, JobFilter, JoblyError, NewCompany, NewJob, SqlValue, UpdateSpec,
    User,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_postgres::{Client, NoTls, Transaction};

static SCHEMA_SEQ: AtomicUsize = AtomicUsize::new(0);

const SCHEMA: &str = r#"
CREATE TABLE companies (
    handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
    name TEXT UNIQUE NOT NULL,
    num_employees INTEGER CHECK (num_employees >= 0),
    description TEXT NOT NULL,
    logo_url TEXT
);

CREATE TABLE jobs (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    salary INTEGER CHECK (salary >= 0),
    equity NUMERIC CHECK (equity <= 1.0),
    company_handle VARCHAR(25) NOT NULL REFERENCES companies ON DELETE CASCADE
);

CREATE TABLE users (
    username VARCHAR(25) PRIMARY KEY,
    password TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL CHECK (position('@' IN email) > 1),
    is_admin BOOLEAN NOT NULL DEFAULT FALSE
);

CREATE TABLE applications (
    username VARCHAR(25) REFERENCES users ON DELETE CASCADE,
    job_id INTEGER REFERENCES jobs ON DELETE CASCADE,
    PRIMARY KEY (username, job_id)
);

INSERT INTO companies (handle, name, num_employees, description, logo_url) VALUES
    ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
    ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
    ('c3', 'C3', 3, 'Desc3', 'http://c3.img');

INSERT INTO jobs (title, salary, equity, company_handle) VALUES
    ('Job1', 100000, '0.01', 'c1'),
    ('Job2', 200000, '0.02', 'c2'),
    ('Job3', 300000, '0', 'c3'),
    ('Engineer', NULL, NULL, 'c1');

INSERT INTO users (username, password, first_name, last_name, email, is_admin) VALUES
    ('u1', 'not-a-real-hash', 'U1F', 'U1L', 'u1@email.com', FALSE),
    ('u2', 'not-a-real-hash', 'U2F', 'U2L', 'u2@email.com', TRUE);
"#;

async fn try_connect() -> Option<Client> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

/// Open a transaction with a private, seeded schema on its search path.
async fn seeded(client: &mut Client) -> Transaction<'_> {
    let tx = client.transaction().await.unwrap();
    let schema = format!(
        "jobly_test_{}_{}",
        std::process::id(),
        SCHEMA_SEQ.fetch_add(1, Ordering::Relaxed)
    );
    tx.batch_execute(&format!(
        "CREATE SCHEMA {schema}; SET LOCAL search_path TO {schema};"
    ))
    .await
    .unwrap();
    tx.batch_execute(SCHEMA).await.unwrap();
    tx
}

macro_rules! db {
    ($client:ident, $tx:ident) => {
        let Some(mut $client) = try_connect().await else {
            eprintln!("DATABASE_URL not set; skipping");
            return;
        };
        let $tx = seeded(&mut $client).await;
    };
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn job_id(tx: &Transaction<'_>, title: &str) -> i32 {
    let jobs = Job::find_all(tx, &JobFilter::new().title(title)).await.unwrap();
    jobs[0].id
}

// ==================== companies ====================

#[tokio::test]
async fn company_create_works() {
    db!(client, tx);

    let new = NewCompany {
        handle: "new".into(),
        name: "New".into(),
        description: "New Description".into(),
        num_employees: Some(1),
        logo_url: Some("http://new.img".into()),
    };
    let company = Company::create(&tx, &new).await.unwrap();
    assert_eq!(company.handle, "new");
    assert_eq!(company.num_employees, Some(1));

    let err = Company::create(&tx, &new).await.unwrap_err();
    assert!(err.is_bad_request());
    assert_eq!(err.to_string(), "Bad request: Duplicate company: new");

    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn company_find_all_filters() {
    db!(client, tx);

    let handles = |companies: Vec<Company>| -> Vec<String> {
        companies.into_iter().map(|c| c.handle).collect()
    };

    let all = Company::find_all(&tx, &CompanyFilter::new()).await.unwrap();
    assert_eq!(handles(all), ["c1", "c2", "c3"]);

    let by_name = Company::find_all(&tx, &CompanyFilter::new().name("2")).await.unwrap();
    assert_eq!(handles(by_name), ["c2"]);

    let min = Company::find_all(&tx, &CompanyFilter::new().min_employees(2))
        .await
        .unwrap();
    assert_eq!(handles(min), ["c2", "c3"]);

    let max = Company::find_all(&tx, &CompanyFilter::new().max_employees(2))
        .await
        .unwrap();
    assert_eq!(handles(max), ["c1", "c2"]);

    let combined = CompanyFilter::new()
        .name("c")
        .min_employees(1)
        .max_employees(2);
    let combined = Company::find_all(&tx, &combined).await.unwrap();
    assert_eq!(handles(combined), ["c1", "c2"]);

    let huge = Company::find_all(&tx, &CompanyFilter::new().min_employees(3_000_000_000_i64))
        .await
        .unwrap();
    assert!(huge.is_empty());

    let inverted = CompanyFilter::new().min_employees(3).max_employees(1);
    assert!(Company::find_all(&tx, &inverted).await.unwrap().is_empty());

    let err = Company::find_all(&tx, &CompanyFilter::new().min_employees("many"))
        .await
        .unwrap_err();
    assert!(err.is_bad_request());

    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn company_get_includes_jobs() {
    db!(client, tx);

    let detail = Company::get(&tx, "c1").await.unwrap();
    assert_eq!(detail.company.name, "C1");
    let titles: Vec<_> = detail.jobs.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, ["Job1", "Engineer"]);

    let err = Company::get(&tx, "nope").await.unwrap_err();
    assert!(err.is_not_found());

    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn company_update() {
    db!(client, tx);

    let data = UpdateSpec::new()
        .set("name", "New")
        .set("numEmployees", SqlValue::Null)
        .set("logoUrl", "http://new.img");
    let company = Company::update(&tx, "c1", &data).await.unwrap();
    assert_eq!(company.name, "New");
    assert_eq!(company.num_employees, None);
    assert_eq!(company.logo_url.as_deref(), Some("http://new.img"));

    let err = Company::update(&tx, "nope", &data).await.unwrap_err();
    assert!(err.is_not_found());

    let err = Company::update(&tx, "c1", &UpdateSpec::new()).await.unwrap_err();
    assert!(err.is_bad_request());

    let err = Company::update(&tx, "c1", &UpdateSpec::new().set("handle", "c9"))
        .await
        .unwrap_err();
    assert!(err.is_bad_request());

    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn company_remove() {
    db!(client, tx);

    Company::remove(&tx, "c1").await.unwrap();
    assert!(Company::get(&tx, "c1").await.unwrap_err().is_not_found());
    assert!(Company::remove(&tx, "c1").await.unwrap_err().is_not_found());

    tx.rollback().await.unwrap();
}

// ==================== jobs ====================

#[tokio::test]
async fn job_create_works() {
    db!(client, tx);

    let new = NewJob {
        title: "new job".into(),
        salary: Some(60000),
        equity: Some(dec("0.01")),
        company_handle: "c1".into(),
    };
    let job = Job::create(&tx, &new).await.unwrap();
    assert_eq!(job.title, "new job");
    assert_eq!(job.equity, Some(dec("0.01")));

    let orphan = NewJob {
        company_handle: "nope".into(),
        ..new
    };
    let err = Job::create(&tx, &orphan).await.unwrap_err();
    assert!(err.is_bad_request());

    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn job_find_all_filters() {
    db!(client, tx);

    let titles = |jobs: Vec<Job>| -> Vec<String> { jobs.into_iter().map(|j| j.title).collect() };

    let all = Job::find_all(&tx, &JobFilter::new()).await.unwrap();
    assert_eq!(titles(all), ["Engineer", "Job1", "Job2", "Job3"]);

    let by_title = Job::find_all(&tx, &JobFilter::new().title("job")).await.unwrap();
    assert_eq!(titles(by_title), ["Job1", "Job2", "Job3"]);

    let by_salary = Job::find_all(&tx, &JobFilter::new().min_salary(150000))
        .await
        .unwrap();
    assert_eq!(titles(by_salary), ["Job2", "Job3"]);

    let with_equity = Job::find_all(&tx, &JobFilter::new().has_equity(true))
        .await
        .unwrap();
    assert_eq!(titles(with_equity), ["Job1", "Job2"]);

    let combined = JobFilter::new()
        .title("job")
        .min_salary(150000)
        .has_equity("true");
    let combined = Job::find_all(&tx, &combined).await.unwrap();
    assert_eq!(titles(combined), ["Job2"]);

    let huge = Job::find_all(&tx, &JobFilter::new().min_salary(3_000_000_000_i64))
        .await
        .unwrap();
    assert!(huge.is_empty());

    tx.rollback().await.unwrap();
}

// A check violation aborts the transaction, so each of these ends its test.

#[tokio::test]
async fn job_update_rejects_equity_above_one() {
    db!(client, tx);

    let id = job_id(&tx, "Job1").await;
    let err = Job::update(&tx, id, &UpdateSpec::new().set("equity", 1.5))
        .await
        .unwrap_err();
    assert!(matches!(err, JoblyError::CheckViolation(_)));
    assert_eq!(err.status_code(), 400);

    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn job_create_rejects_negative_salary() {
    db!(client, tx);

    let new = NewJob {
        title: "new job".into(),
        salary: Some(-1),
        equity: None,
        company_handle: "c1".into(),
    };
    let err = Job::create(&tx, &new).await.unwrap_err();
    assert_eq!(err.status_code(), 400);

    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn job_update_and_remove() {
    db!(client, tx);

    let id = job_id(&tx, "Job1").await;

    let data = UpdateSpec::new()
        .set("title", "New Title")
        .set("salary", 999999)
        .set("equity", "0.09");
    let job = Job::update(&tx, id, &data).await.unwrap();
    assert_eq!(job.title, "New Title");
    assert_eq!(job.salary, Some(999999));
    assert_eq!(job.equity, Some(dec("0.09")));
    assert_eq!(job.company_handle, "c1");

    let nulls = UpdateSpec::new()
        .set("title", "New")
        .set("salary", SqlValue::Null)
        .set("equity", SqlValue::Null);
    let job = Job::update(&tx, id, &nulls).await.unwrap();
    assert_eq!(job.salary, None);
    assert_eq!(job.equity, None);

    assert!(Job::update(&tx, 0, &data).await.unwrap_err().is_not_found());
    assert!(Job::update(&tx, 0, &UpdateSpec::new()).await.unwrap_err().is_bad_request());
    let err = Job::update(&tx, id, &UpdateSpec::new().set("company_handle", "c2"))
        .await
        .unwrap_err();
    assert!(err.is_bad_request());

    Job::remove(&tx, id).await.unwrap();
    assert!(Job::get(&tx, id).await.unwrap_err().is_not_found());
    assert!(Job::remove(&tx, 0).await.unwrap_err().is_not_found());

    tx.rollback().await.unwrap();
}

// ==================== users ====================

#[tokio::test]
async fn user_find_get_update() {
    db!(client, tx);

    let users = User::find_all(&tx).await.unwrap();
    let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["u1", "u2"]);

    let detail = User::get(&tx, "u2").await.unwrap();
    assert!(detail.user.is_admin);
    assert!(detail.jobs.is_empty());

    let data = UpdateSpec::new()
        .set("firstName", "Sunshine")
        .set("lastName", "River");
    let user = User::update(&tx, "u1", &data).await.unwrap();
    assert_eq!(user.first_name, "Sunshine");
    assert_eq!(user.last_name, "River");

    let err = User::update(&tx, "u1", &UpdateSpec::new().set("password", "hunter2"))
        .await
        .unwrap_err();
    assert!(err.is_bad_request());

    assert!(User::get(&tx, "nope").await.unwrap_err().is_not_found());

    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn user_apply_and_remove() {
    db!(client, tx);

    let id = job_id(&tx, "Job2").await;
    User::apply_to_job(&tx, "u1", id).await.unwrap();
    assert_eq!(User::get(&tx, "u1").await.unwrap().jobs, vec![id]);

    let err = User::apply_to_job(&tx, "u1", 0).await.unwrap_err();
    assert!(matches!(err, JoblyError::NotFound(_)));
    let err = User::apply_to_job(&tx, "nope", id).await.unwrap_err();
    assert!(err.is_not_found());

    User::remove(&tx, "u1").await.unwrap();
    assert!(User::remove(&tx, "u1").await.unwrap_err().is_not_found());

    tx.rollback().await.unwrap();
}
