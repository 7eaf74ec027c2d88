//! Shared fixtures for unit tests.
//!
//! Only compiled for `cargo test`. Integration tests under `tests/` drive the
//! HTTP surface and build their own state.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    EmailAddress, ListingDetails, ListingDraft, ListingId, ListingOwner, ObjectIdGenerator,
    VerifiedIdentity, VisaListing,
};

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 2024-01-12T08:00:00Z.
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 12, 8, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(fixture_now()))
}

pub fn id_generator() -> Arc<ObjectIdGenerator> {
    Arc::new(ObjectIdGenerator::new(fixed_clock()))
}

pub fn identity(email: &str, name: Option<&str>) -> VerifiedIdentity {
    VerifiedIdentity::new(
        EmailAddress::new(email).expect("fixture email"),
        name.map(str::to_owned),
    )
    .expect("fixture identity")
}

pub fn owner() -> VerifiedIdentity {
    identity("owner@example.com", Some("Olive Owner"))
}

pub fn applicant() -> VerifiedIdentity {
    identity("applicant@example.com", Some("Arun Applicant"))
}

pub fn stranger() -> VerifiedIdentity {
    identity("other@example.com", None)
}

pub fn sample_draft() -> ListingDraft {
    ListingDraft {
        country_name: "Japan".to_owned(),
        country_image: Some("https://img.example/japan.jpg".to_owned()),
        visa_type: "Tourist visa".to_owned(),
        processing_time: "5 working days".to_owned(),
        required_documents: vec!["Valid passport".to_owned(), "Proof of funds".to_owned()],
        description: "Short stay visa for sightseeing and visiting friends.".to_owned(),
        age_restriction: 18,
        fee: 50.0,
        validity: "90 days".to_owned(),
        application_method: "Online".to_owned(),
    }
}

pub fn listing_id(suffix: u32) -> ListingId {
    ListingId::parse(&format!("65a0f180aaaaaaaaaa{suffix:06x}")).expect("fixture listing id")
}

/// Listing owned by [`owner`] built from [`sample_draft`].
pub fn sample_listing(suffix: u32) -> VisaListing {
    let owner = owner();
    VisaListing::new(
        listing_id(suffix),
        ListingOwner::new(
            owner.email().clone(),
            owner.display_name().map(str::to_owned),
        ),
        ListingDetails::new(&sample_draft()).expect("fixture draft is valid"),
        fixture_now(),
    )
}
