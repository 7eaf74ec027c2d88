//! Handler tests for the visa application endpoints.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockApplicationCommand, MockApplicationQuery};
use crate::domain::{
    ApplicationCommandService, ApplicationQueryService, EmptyResultPolicy, Error,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::test_utils::{in_memory_ports, in_memory_state, sign_in, test_app};
use crate::outbound::memory::{InMemoryApplicationRepository, InMemoryListingRepository};
use crate::test_support::{fixed_clock, fixture_now, id_generator};

async fn send<S, B>(app: &S, request: actix_test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn publish<S, B>(app: &S, owner: &Cookie<'static>, country: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/visas")
            .cookie(owner.clone())
            .set_json(json!({
                "countryName": country,
                "visaType": "Work visa",
                "processingTime": "10 days",
                "requiredDocuments": ["Valid passport"],
                "description": "Long stay permit for skilled workers and families.",
                "ageRestriction": 21,
                "fee": 120.5,
                "validity": "1 year",
                "applicationMethod": "Embassy"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().expect("listing id").to_owned()
}

fn apply_request(cookie: &Cookie<'static>, body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/visa-applications")
        .cookie(cookie.clone())
        .set_json(body)
}

#[actix_web::test]
async fn submission_snapshots_the_listing() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let owner = sign_in(&app, "owner-token").await;
    let applicant = sign_in(&app, "applicant-token").await;
    let visa_id = publish(&app, &owner, "Canada").await;

    // Legacy clients echo the whole listing next to the applicant fields.
    let (status, body) = send(
        &app,
        apply_request(
            &applicant,
            json!({
                "visaId": visa_id,
                "applicantEmail": "applicant@example.com",
                "applicantFirstName": "Arun",
                "applicantLastName": "Kumar",
                "appliedDate": "1999-01-01",
                "fee": 1,
                "countryName": "Elsewhere"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["visaId"], visa_id.as_str());
    assert_eq!(body["applicantEmail"], "applicant@example.com");
    assert_eq!(body["fee"], 120.5);
    assert_eq!(body["countryName"], "Canada");
    assert_eq!(body["visaType"], "Work visa");
    assert_eq!(
        body["appliedDate"],
        fixture_now().date_naive().to_string().as_str()
    );
    assert!(body["_id"].as_str().is_some_and(|id| id.len() == 24));
}

#[actix_web::test]
async fn later_listing_edits_leave_applications_untouched() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let owner = sign_in(&app, "owner-token").await;
    let applicant = sign_in(&app, "applicant-token").await;
    let visa_id = publish(&app, &owner, "Canada").await;

    let (status, _) = send(
        &app,
        apply_request(
            &applicant,
            json!({
                "visaId": visa_id,
                "applicantFirstName": "Arun",
                "applicantLastName": "Kumar"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, updated) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/visa/{visa_id}"))
            .cookie(owner.clone())
            .set_json(json!({"fee": 500, "countryName": "Nippon"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["fee"], 500.0);

    let (status, listed) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/visaApplications")
            .cookie(applicant.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let applications = listed.as_array().expect("application list");
    assert_eq!(applications.len(), 1);
    let first = applications.first().expect("one application");
    assert_eq!(first["visaId"], visa_id.as_str());
    assert_eq!(first["fee"], 120.5);
    assert_eq!(first["countryName"], "Canada");
}

#[rstest]
#[case(json!({"visaId": "nope", "applicantFirstName": "Arun", "applicantLastName": "Kumar"}), StatusCode::BAD_REQUEST)]
#[case(json!({"visaId": "65a0f180aaaaaaaaaa000001", "applicantFirstName": "A", "applicantLastName": "Kumar"}), StatusCode::BAD_REQUEST)]
#[case(json!({"visaId": "65a0f180aaaaaaaaaa000001", "applicantFirstName": "Arun", "applicantLastName": "Kumar"}), StatusCode::NOT_FOUND)]
#[case(json!({"visaId": "65a0f180aaaaaaaaaa000001", "applicantFirstName": "Arun", "applicantLastName": "Kumar", "applicantEmail": "owner@example.com"}), StatusCode::FORBIDDEN)]
#[case(json!({"applicantFirstName": "Arun", "applicantLastName": "Kumar"}), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn invalid_submissions_are_rejected(#[case] body: Value, #[case] expected: StatusCode) {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let applicant = sign_in(&app, "applicant-token").await;

    let (status, _) = send(&app, apply_request(&applicant, body)).await;
    assert_eq!(status, expected);
}

#[rstest]
#[case(actix_test::TestRequest::post().uri("/visa-applications").set_json(json!({})))]
#[case(actix_test::TestRequest::get().uri("/visaApplications"))]
#[case(actix_test::TestRequest::delete().uri("/visaApplications"))]
#[actix_web::test]
async fn application_routes_require_a_session(#[case] request: actix_test::TestRequest) {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn list_search_and_withdraw_round_trip() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let owner = sign_in(&app, "owner-token").await;
    let applicant = sign_in(&app, "applicant-token").await;
    let canada = publish(&app, &owner, "Canada").await;
    let japan = publish(&app, &owner, "Japan").await;
    for visa_id in [&canada, &japan] {
        let (status, _) = send(
            &app,
            apply_request(
                &applicant,
                json!({"visaId": visa_id, "applicantFirstName": "Arun", "applicantLastName": "Kumar"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, all) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/visaApplications?email=applicant@example.com")
            .cookie(applicant.clone()),
    )
    .await;
    assert_eq!(all.as_array().map(Vec::len), Some(2));

    let (_, searched) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/visaApplications?search=JAP")
            .cookie(applicant.clone()),
    )
    .await;
    assert_eq!(searched.as_array().map(Vec::len), Some(1));
    assert_eq!(searched[0]["countryName"], "Japan");

    let (_, owner_view) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/visaApplications")
            .cookie(owner.clone()),
    )
    .await;
    assert_eq!(owner_view, json!([]));

    let (status, deleted) = send(
        &app,
        actix_test::TestRequest::delete()
            .uri("/visaApplications")
            .cookie(applicant.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        deleted,
        json!({"message": "2 visa application(s) deleted successfully", "deletedCount": 2})
    );

    let (status, again) = send(
        &app,
        actix_test::TestRequest::delete()
            .uri("/visaApplications")
            .cookie(applicant),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["deletedCount"], 0);
}

#[actix_web::test]
async fn applications_survive_listing_deletion() {
    let app = actix_test::init_service(test_app(in_memory_state())).await;
    let owner = sign_in(&app, "owner-token").await;
    let applicant = sign_in(&app, "applicant-token").await;
    let visa_id = publish(&app, &owner, "Canada").await;
    send(
        &app,
        apply_request(
            &applicant,
            json!({"visaId": visa_id, "applicantFirstName": "Arun", "applicantLastName": "Kumar"}),
        ),
    )
    .await;

    let (status, _) = send(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/visa/{visa_id}"))
            .cookie(owner),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/visaApplications")
            .cookie(applicant),
    )
    .await;
    assert_eq!(listed[0]["visaId"], visa_id.as_str());
    assert_eq!(listed[0]["countryName"], "Canada");
}

fn legacy_policy_state() -> HttpState {
    let listings = Arc::new(InMemoryListingRepository::default());
    let applications = Arc::new(InMemoryApplicationRepository::default());
    HttpState::new(HttpStatePorts {
        applications: Arc::new(
            ApplicationCommandService::new(
                applications.clone(),
                listings,
                id_generator(),
                fixed_clock(),
            )
            .with_empty_result_policy(EmptyResultPolicy::NotFound),
        ),
        applications_query: Arc::new(
            ApplicationQueryService::new(applications)
                .with_empty_result_policy(EmptyResultPolicy::NotFound),
        ),
        ..in_memory_ports()
    })
}

#[rstest]
#[case(actix_test::TestRequest::get().uri("/visaApplications"))]
#[case(actix_test::TestRequest::delete().uri("/visaApplications"))]
#[actix_web::test]
async fn legacy_policy_reports_empty_results_as_not_found(#[case] request: actix_test::TestRequest) {
    let app = actix_test::init_service(test_app(legacy_policy_state())).await;
    let applicant = sign_in(&app, "applicant-token").await;

    let (status, body) = send(&app, request.cookie(applicant)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[case("not-an-email", StatusCode::BAD_REQUEST)]
#[case("owner@example.com", StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn withdraw_query_must_name_the_session_user(
    #[case] email: &str,
    #[case] expected: StatusCode,
) {
    let mut command = MockApplicationCommand::new();
    command.expect_withdraw_all().never();
    let state = HttpState::new(HttpStatePorts {
        applications: Arc::new(command),
        ..in_memory_ports()
    });
    let app = actix_test::init_service(test_app(state)).await;
    let applicant = sign_in(&app, "applicant-token").await;

    let (status, _) = send(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/visaApplications?email={email}"))
            .cookie(applicant),
    )
    .await;
    assert_eq!(status, expected);
}

#[actix_web::test]
async fn search_is_forwarded_to_the_query_port() {
    let mut query = MockApplicationQuery::new();
    query
        .expect_list_applications()
        .withf(|email, search| {
            email.as_str() == "applicant@example.com" && search.as_deref() == Some("can")
        })
        .times(1)
        .returning(|_, _| Err(Error::service_unavailable("application repository unavailable")));
    let state = HttpState::new(HttpStatePorts {
        applications_query: Arc::new(query),
        ..in_memory_ports()
    });
    let app = actix_test::init_service(test_app(state)).await;
    let applicant = sign_in(&app, "applicant-token").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/visaApplications?search=can")
            .cookie(applicant),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
}
