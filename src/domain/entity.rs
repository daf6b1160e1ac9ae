//! PII entity categories
//!
//! Labels are stable wire strings; they feed token hashing and the mapping
//! store, so renaming a label breaks existing sessions.

use serde::{Deserialize, Serialize};

/// Category of a detected PII entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Date,
    ZipCode,
    Street,
    Address,
    PhoneNumber,
    TaxId,
    CreditCard,
    Iban,
    LicensePlate,
    SocialSecurity,
    IdCard,
    Position,
    Organization,
    AcademicTitle,
    FirstName,
    Person,
    Location,
    Email,
    /// Catch-all for labels the NLP engine emits that we don't model.
    Misc,
}

impl EntityType {
    /// Stable label used in tokens, the mapping store, and logs.
    pub fn label(&self) -> &'static str {
        match self {
            EntityType::Date => "DATE",
            EntityType::ZipCode => "ZIP_CODE",
            EntityType::Street => "STREET",
            EntityType::Address => "ADDRESS",
            EntityType::PhoneNumber => "PHONE_NUMBER",
            EntityType::TaxId => "TAX_ID",
            EntityType::CreditCard => "CREDIT_CARD",
            EntityType::Iban => "IBAN",
            EntityType::LicensePlate => "LICENSE_PLATE",
            EntityType::SocialSecurity => "SOCIAL_SECURITY",
            EntityType::IdCard => "ID_CARD",
            EntityType::Position => "POSITION",
            EntityType::Organization => "ORGANIZATION",
            EntityType::AcademicTitle => "ACADEMIC_TITLE",
            EntityType::FirstName => "FIRST_NAME",
            EntityType::Person => "PERSON",
            EntityType::Location => "LOCATION",
            EntityType::Email => "EMAIL",
            EntityType::Misc => "MISC",
        }
    }

    /// Parses a label; unknown labels map to [`EntityType::Misc`] so that
    /// new NLP-engine categories never abort a detection pass.
    pub fn parse_label(label: &str) -> Self {
        match label {
            "DATE" => EntityType::Date,
            "ZIP_CODE" => EntityType::ZipCode,
            "STREET" => EntityType::Street,
            "ADDRESS" => EntityType::Address,
            "PHONE_NUMBER" => EntityType::PhoneNumber,
            "TAX_ID" => EntityType::TaxId,
            "CREDIT_CARD" => EntityType::CreditCard,
            "IBAN" => EntityType::Iban,
            "LICENSE_PLATE" => EntityType::LicensePlate,
            "SOCIAL_SECURITY" => EntityType::SocialSecurity,
            "ID_CARD" => EntityType::IdCard,
            "POSITION" => EntityType::Position,
            "ORGANIZATION" | "ORG" => EntityType::Organization,
            "ACADEMIC_TITLE" => EntityType::AcademicTitle,
            "FIRST_NAME" => EntityType::FirstName,
            "PERSON" | "PER" => EntityType::Person,
            "LOCATION" | "LOC" => EntityType::Location,
            "EMAIL" | "EMAIL_ADDRESS" => EntityType::Email,
            _ => EntityType::Misc,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
