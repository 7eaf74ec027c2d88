//! Tests for the catalog services.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockListingRepository;
use crate::test_support::{
    fixed_clock, fixture_now, id_generator, listing_id, owner, sample_draft, sample_listing,
    stranger,
};

fn command_service(
    repo: MockListingRepository,
) -> CatalogCommandService<MockListingRepository> {
    CatalogCommandService::new(Arc::new(repo), id_generator(), fixed_clock())
}

fn query_service(repo: MockListingRepository) -> CatalogQueryService<MockListingRepository> {
    CatalogQueryService::new(Arc::new(repo))
}

#[tokio::test]
async fn create_assigns_id_owner_and_timestamp() {
    let mut repo = MockListingRepository::new();
    repo.expect_insert()
        .withf(|listing: &VisaListing| {
            listing.owner().email().as_str() == "owner@example.com"
                && listing.owner().name() == Some("Olive Owner")
        })
        .times(1)
        .return_once(|_| Ok(()));

    let listing = command_service(repo)
        .create_listing(&owner(), sample_draft())
        .await
        .expect("create succeeds");

    assert!(listing.id().as_str().starts_with("65a0f180"));
    assert_eq!(listing.created_at(), fixture_now());
    assert_eq!(listing.details().country_name(), "Japan");
}

#[tokio::test]
async fn create_rejects_invalid_drafts_before_touching_the_store() {
    let mut repo = MockListingRepository::new();
    repo.expect_insert().times(0);
    let mut draft = sample_draft();
    draft.description = "too short".to_owned();

    let error = command_service(repo)
        .create_listing(&owner(), draft)
        .await
        .expect_err("validation fails");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(ListingRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(ListingRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn create_maps_store_failures(
    #[case] failure: ListingRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockListingRepository::new();
    repo.expect_insert().return_once(move |_| Err(failure));

    let error = command_service(repo)
        .create_listing(&owner(), sample_draft())
        .await
        .expect_err("store failure");

    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn update_merges_only_supplied_fields() {
    let existing = sample_listing(1);
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update_details()
        .withf(|_, details: &ListingDetails| {
            (details.fee() - 75.0).abs() < f64::EPSILON && details.country_name() == "Japan"
        })
        .times(1)
        .return_once(|_, details| Ok(Some(sample_listing(1).with_details(details.clone()))));

    let patch = ListingPatch {
        fee: Some(75.0),
        ..ListingPatch::default()
    };
    let updated = command_service(repo)
        .update_listing(&owner(), &listing_id(1), patch)
        .await
        .expect("update succeeds");

    assert!((updated.details().fee() - 75.0).abs() < f64::EPSILON);
    assert_eq!(updated.details().country_name(), "Japan");
    assert_eq!(updated.owner().email().as_str(), "owner@example.com");
}

#[tokio::test]
async fn update_by_non_owner_is_forbidden() {
    let existing = sample_listing(1);
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update_details().times(0);

    let patch = ListingPatch {
        fee: Some(1.0),
        ..ListingPatch::default()
    };
    let error = command_service(repo)
        .update_listing(&stranger(), &listing_id(1), patch)
        .await
        .expect_err("forbidden");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn update_of_missing_listing_is_not_found() {
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let error = command_service(repo)
        .update_listing(&owner(), &listing_id(9), ListingPatch::default())
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_racing_a_delete_reports_not_found() {
    let existing = sample_listing(1);
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update_details().return_once(|_, _| Ok(None));

    let patch = ListingPatch {
        validity: Some("30 days".to_owned()),
        ..ListingPatch::default()
    };
    let error = command_service(repo)
        .update_listing(&owner(), &listing_id(1), patch)
        .await
        .expect_err("vanished");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn empty_patch_returns_current_listing_without_writing() {
    let existing = sample_listing(1);
    let expected = existing.clone();
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update_details().times(0);

    let listing = command_service(repo)
        .update_listing(&owner(), &listing_id(1), ListingPatch::default())
        .await
        .expect("no-op update");

    assert_eq!(listing, expected);
}

#[tokio::test]
async fn delete_of_missing_listing_succeeds() {
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));
    repo.expect_delete().times(0);

    let outcome = command_service(repo)
        .delete_listing(&owner(), &listing_id(4))
        .await
        .expect("idempotent delete");

    assert_eq!(outcome, DeleteListingOutcome::AlreadyAbsent);
}

#[rstest]
#[case(true, DeleteListingOutcome::Deleted)]
#[case(false, DeleteListingOutcome::AlreadyAbsent)]
#[tokio::test]
async fn delete_by_owner_removes_listing(
    #[case] removed: bool,
    #[case] expected: DeleteListingOutcome,
) {
    let existing = sample_listing(2);
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_delete()
        .times(1)
        .return_once(move |_| Ok(removed));

    let outcome = command_service(repo)
        .delete_listing(&owner(), &listing_id(2))
        .await
        .expect("delete succeeds");

    assert_eq!(outcome, expected);
}

#[tokio::test]
async fn delete_by_non_owner_is_forbidden() {
    let existing = sample_listing(2);
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_delete().times(0);

    let error = command_service(repo)
        .delete_listing(&stranger(), &listing_id(2))
        .await
        .expect_err("forbidden");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn get_listing_reports_not_found() {
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let error = query_service(repo)
        .get_listing(&listing_id(3))
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn latest_with_zero_limit_skips_the_store() {
    let mut repo = MockListingRepository::new();
    repo.expect_latest().times(0);

    let listings = query_service(repo)
        .latest_listings(0)
        .await
        .expect("empty result");

    assert!(listings.is_empty());
}

#[tokio::test]
async fn latest_passes_limit_through() {
    let mut repo = MockListingRepository::new();
    repo.expect_latest()
        .withf(|limit| *limit == 6)
        .times(1)
        .return_once(|_| Ok(vec![sample_listing(2), sample_listing(1)]));

    let listings = query_service(repo)
        .latest_listings(6)
        .await
        .expect("latest succeeds");

    assert_eq!(listings.len(), 2);
}

#[tokio::test]
async fn list_owned_maps_connection_failures() {
    let mut repo = MockListingRepository::new();
    repo.expect_list_by_owner()
        .return_once(|_| Err(ListingRepositoryError::connection("pool exhausted")));

    let error = query_service(repo)
        .list_owned(owner().email())
        .await
        .expect_err("unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
