//! Integration tests for `DieselApplicationRepository` against embedded
//! PostgreSQL.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use visa_backend::domain::ports::{ApplicationRepository, ApplicationRepositoryError};
use visa_backend::domain::{
    ApplicationField, ApplicationId, EmailAddress, ListingId, ListingSnapshot, PersonName,
    VisaApplication, VisaType,
};
use visa_backend::outbound::persistence::{DbPool, DieselApplicationRepository, PoolConfig};

mod support;

use support::{
    drop_table, handle_cluster_setup_failure, provision_template_database,
    shared_cluster_handle,
};

struct TestContext {
    runtime: Runtime,
    repository: DieselApplicationRepository,
    database_url: String,
    _database: TemporaryDatabase,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;
    let database = provision_template_database(cluster)?;
    let database_url = database.url().to_string();

    let config = PoolConfig::new(database_url.as_str())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        repository: DieselApplicationRepository::new(pool),
        database_url,
        _database: database,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 12, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn email(value: &str) -> EmailAddress {
    EmailAddress::new(value).expect("email")
}

fn application_id(suffix: u32) -> ApplicationId {
    ApplicationId::parse(&format!("65a0f180cccccccccc{suffix:06x}")).expect("application id")
}

fn application(
    suffix: u32,
    applicant: &str,
    country: &str,
    created_at: DateTime<Utc>,
) -> VisaApplication {
    VisaApplication {
        id: application_id(suffix),
        // Never stored as a listing: applications do not reference live rows.
        visa_id: ListingId::parse("65a0f180aaaaaaaaaa000001").expect("listing id"),
        applicant_email: email(applicant),
        first_name: PersonName::new("Arun", ApplicationField::FirstName).expect("first name"),
        last_name: PersonName::new("Kumar", ApplicationField::LastName).expect("last name"),
        applied_date: NaiveDate::from_ymd_opt(2024, 1, 12).expect("date"),
        fee: 120.5,
        listing: ListingSnapshot {
            country_name: country.to_owned(),
            country_image: Some("https://img.example/flag.png".to_owned()),
            visa_type: VisaType::Work,
            processing_time: "10 days".to_owned(),
            validity: "1 year".to_owned(),
            application_method: "Embassy".to_owned(),
        },
        created_at,
    }
}

fn ids(applications: &[VisaApplication]) -> Vec<ApplicationId> {
    applications
        .iter()
        .map(|application| application.id.clone())
        .collect()
}

#[rstest]
fn application_snapshot_round_trips(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: application_snapshot_round_trips skipped");
        return;
    };
    let repository = context.repository.clone();
    let stored = application(1, "applicant@example.com", "Canada", base_time());

    context
        .runtime
        .block_on(async { repository.insert(&stored).await })
        .expect("insert application");

    let fetched = context
        .runtime
        .block_on(async {
            repository
                .list_by_applicant(&email("applicant@example.com"))
                .await
        })
        .expect("list applications");
    assert_eq!(fetched, vec![stored]);
}

#[rstest]
fn applicant_scan_is_exact_and_in_submission_order(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: applicant_scan_is_exact_and_in_submission_order skipped");
        return;
    };
    let repository = context.repository.clone();
    let now = base_time();

    context.runtime.block_on(async {
        for application in [
            application(1, "applicant@example.com", "Canada", now),
            application(2, "Applicant@example.com", "Japan", now),
            application(3, "applicant@example.com", "Kenya", now - Duration::hours(1)),
            application(4, "applicant@example.com", "Chile", now),
        ] {
            repository
                .insert(&application)
                .await
                .expect("insert application");
        }
    });

    let listed = context
        .runtime
        .block_on(async {
            repository
                .list_by_applicant(&email("applicant@example.com"))
                .await
        })
        .expect("list applications");
    assert_eq!(
        ids(&listed),
        vec![application_id(3), application_id(1), application_id(4)]
    );
}

#[rstest]
fn withdraw_counts_only_the_applicants_rows(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: withdraw_counts_only_the_applicants_rows skipped");
        return;
    };
    let repository = context.repository.clone();
    let now = base_time();

    context.runtime.block_on(async {
        for application in [
            application(1, "applicant@example.com", "Canada", now),
            application(2, "applicant@example.com", "Japan", now),
            application(3, "other@example.com", "Kenya", now),
        ] {
            repository
                .insert(&application)
                .await
                .expect("insert application");
        }
    });

    let applicant = email("applicant@example.com");
    let counts = context.runtime.block_on(async {
        let first = repository
            .delete_by_applicant(&applicant)
            .await
            .expect("first withdraw");
        let second = repository
            .delete_by_applicant(&applicant)
            .await
            .expect("second withdraw");
        (first, second)
    });
    assert_eq!(counts, (2, 0));

    let others = context
        .runtime
        .block_on(async { repository.list_by_applicant(&email("other@example.com")).await })
        .expect("list other applications");
    assert_eq!(ids(&others), vec![application_id(3)]);
}

#[rstest]
fn duplicate_identifier_is_a_query_error(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_identifier_is_a_query_error skipped");
        return;
    };
    let repository = context.repository.clone();
    let stored = application(1, "applicant@example.com", "Canada", base_time());

    let error = context
        .runtime
        .block_on(async {
            repository.insert(&stored).await?;
            repository.insert(&stored).await
        })
        .expect_err("second insert with the same id");
    assert!(
        matches!(error, ApplicationRepositoryError::Query { .. }),
        "unexpected error: {error:?}"
    );
}

#[rstest]
fn lost_table_surfaces_as_query_error(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: lost_table_surfaces_as_query_error skipped");
        return;
    };
    drop_table(&context.database_url, "visa_applications").expect("drop applications table");
    let repository = context.repository.clone();

    let error = context
        .runtime
        .block_on(async {
            repository
                .delete_by_applicant(&email("applicant@example.com"))
                .await
        })
        .expect_err("delete against a missing table");
    assert!(
        matches!(error, ApplicationRepositoryError::Query { .. }),
        "unexpected error: {error:?}"
    );
}
