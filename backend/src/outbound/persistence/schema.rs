//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Published visa listings.
    visa_listings (id) {
        /// 24-hex-character object id.
        id -> Varchar,
        /// Insertion sequence; breaks ties between equal `created_at` values.
        seq -> Int8,
        owner_email -> Varchar,
        owner_name -> Nullable<Varchar>,
        country_name -> Varchar,
        country_image -> Nullable<Text>,
        /// Display label of the visa type, e.g. `Tourist visa`.
        visa_type -> Varchar,
        processing_time -> Varchar,
        /// Display labels of the required documents, de-duplicated.
        required_documents -> Array<Text>,
        description -> Text,
        age_restriction -> Int4,
        fee -> Float8,
        validity -> Varchar,
        application_method -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Submitted visa applications with their listing snapshot.
    visa_applications (id) {
        id -> Varchar,
        seq -> Int8,
        /// Listing id at submission time. Not a foreign key.
        visa_id -> Varchar,
        applicant_email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        applied_date -> Date,
        fee -> Float8,
        country_name -> Varchar,
        country_image -> Nullable<Text>,
        visa_type -> Varchar,
        processing_time -> Varchar,
        validity -> Varchar,
        application_method -> Varchar,
        created_at -> Timestamptz,
    }
}
