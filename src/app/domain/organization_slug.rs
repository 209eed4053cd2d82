use validator::ValidationError;

/// URL slug of an organization: 1–64 chars of `a-z`, `0-9` and `-`, no leading/trailing dash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationSlug(String);

impl OrganizationSlug {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let slug = raw.trim().to_lowercase();
        let allowed = slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if slug.is_empty() || slug.len() > 64 || !allowed || slug.starts_with('-') || slug.ends_with('-') {
            return Err(ValidationError::new("invalid_slug").with_message(
                "Slug may only contain lowercase letters, digits and dashes".into(),
            ));
        }
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
