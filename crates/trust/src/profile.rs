use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::TrustError;

/// Whatever the form sent for an uploaded document. Only its presence matters for scoring.
///
/// Browsers and older clients send a bare path or a flag instead of file
/// metadata, so any non-null value is accepted. `null` or a missing key
/// deserializes to `None` on the owning field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentRef {
    #[serde(rename_all = "camelCase")]
    File {
        file_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
    },
    Path(String),
    Other(serde_json::Value),
}

impl DocumentRef {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self::File {
            file_name: file_name.into(),
            content_type: None,
        }
    }

    /// File name when the form sent file metadata or a path
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::File { file_name, .. } => Some(file_name),
            Self::Path(path) => Some(path),
            Self::Other(_) => None,
        }
    }
}

/// A certification listed on a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[validate(length(min = 1, message = "Certification name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Issuing organization is required"))]
    pub organization: String,
    /// Date of issue as entered on the form
    #[validate(length(min = 1, message = "Date of issue is required"))]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<DocumentRef>,
}

impl Certification {
    pub fn new(
        name: impl Into<String>,
        organization: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            organization: organization.into(),
            date: date.into(),
            certificate: None,
        }
    }

    pub fn with_certificate(mut self, certificate: DocumentRef) -> Self {
        self.certificate = Some(certificate);
        self
    }
}

/// A submitted user profile, as gathered from the profile form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 10, message = "Phone number must be at least 10 digits"))]
    pub phone: Option<String>,
    pub verification_document: Option<DocumentRef>,
    #[validate]
    pub certifications: Vec<Certification>,
}

impl ProfileInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_verification_document(mut self, document: DocumentRef) -> Self {
        self.verification_document = Some(document);
        self
    }

    pub fn with_certification(mut self, certification: Certification) -> Self {
        self.certifications.push(certification);
        self
    }

    /// Check the rules the profile form enforces before a submission is accepted.
    ///
    /// Scoring does not depend on this; an invalid profile still gets a score.
    pub fn validate_submission(&self) -> crate::Result<()> {
        let missing: Vec<&str> = [
            ("name", self.name.is_none()),
            ("email", self.email.is_none()),
            ("phone", self.phone.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(TrustError::InvalidProfile(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        self.validate()?;
        Ok(())
    }
}
