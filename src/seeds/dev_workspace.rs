use std::env;

use async_trait::async_trait;
use rand::prelude::{IndexedRandom, SliceRandom};
use sqlx::SqlitePool;

use crate::app::{
    db::{self, surfaces::Environments, NewUser},
    domain::{
        Criticality, Email, FeatureSource, FeatureStatus, HashedPassword, OrganizationId,
        OrganizationRole, OrganizationSlug, Password, SurfaceType, UserId,
    },
    error::AppError,
};
use crate::seeds::{Seed, SeedOutcome};

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGIT: &[u8] = b"0123456789";

const DEMO_SLUG: &str = "demo";

fn pick(set: &[u8], rng: &mut impl rand::Rng) -> char {
    set.choose(rng).copied().unwrap_or(b'x') as char
}

/// 16 characters with at least one upper-case letter, one lower-case letter and one digit.
fn random_password() -> String {
    let mut rng = rand::rng();
    let mut chars = vec![pick(UPPER, &mut rng), pick(LOWER, &mut rng), pick(DIGIT, &mut rng)];
    let alphabet: Vec<u8> = UPPER.iter().chain(LOWER).chain(DIGIT).copied().collect();
    for _ in 0..13 {
        chars.push(pick(&alphabet, &mut rng));
    }
    chars.shuffle(&mut rng);
    chars.into_iter().collect()
}

/// Demo user owning a "Demo" organization with one product, surface and feature.
/// Skipped unless an email is configured (`SEED_DEMO_EMAIL`).
pub struct DevWorkspace {
    email: Option<String>,
}

impl DevWorkspace {
    pub fn new(email: Option<String>) -> Self {
        Self { email }
    }

    pub fn from_env() -> Self {
        Self::new(env::var("SEED_DEMO_EMAIL").ok())
    }
}

#[async_trait]
impl Seed for DevWorkspace {
    fn version(&self) -> i64 {
        20260101120000
    }

    fn description(&self) -> &str {
        "dev_workspace"
    }

    async fn run(&self, pool: &SqlitePool) -> Result<SeedOutcome, AppError> {
        let Some(raw) = self.email.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(SeedOutcome::Skipped);
        };
        let Ok(email) = Email::parse(raw) else {
            tracing::warn!(email = raw, "SEED_DEMO_EMAIL is not a valid email");
            return Ok(SeedOutcome::Skipped);
        };
        if db::find_by_email(pool, &email).await?.is_some() {
            return Ok(SeedOutcome::Applied);
        }
        let slug = OrganizationSlug::parse(DEMO_SLUG).map_err(|_| AppError::Internal)?;
        if db::organizations::slug_taken(pool, &slug).await? {
            return Ok(SeedOutcome::Skipped);
        }

        let password = Password::new(random_password()).map_err(|_| AppError::Internal)?;
        let password_hash = HashedPassword::from_password(&password).map_err(|_| AppError::Internal)?;
        let new_user_id = UserId::new();
        let user_id = new_user_id.as_str();
        let new_org_id = OrganizationId::new();
        let org_id = new_org_id.as_str();
        let product_id = ulid::Ulid::new().to_string();

        let mut tx = pool.begin().await?;

        db::users::insert(
            &mut *tx,
            &NewUser {
                id: new_user_id,
                name: "Demo User".to_string(),
                email: email.clone(),
                password_hash,
            },
        )
        .await?;
        db::users::mark_verified(&mut *tx, &user_id).await?;

        db::organizations::insert(
            &mut *tx,
            &db::organizations::NewOrganization {
                id: new_org_id,
                name: "Demo".to_string(),
                slug,
            },
        )
        .await?;
        db::organizations::add_member(&mut *tx, &org_id, &user_id, OrganizationRole::Owner).await?;

        db::products::insert(
            &mut *tx,
            &db::products::NewProduct {
                id: product_id.clone(),
                organization_id: org_id.clone(),
                name: "Checkout".to_string(),
                description: Some("Customer-facing checkout flow".to_string()),
                criticality: Criticality::High,
                owners: vec![email.as_str().to_string()],
            },
        )
        .await?;

        db::surfaces::insert(
            &mut *tx,
            &db::surfaces::NewSurface {
                id: ulid::Ulid::new().to_string(),
                product_id: product_id.clone(),
                organization_id: org_id.clone(),
                name: "checkout-api".to_string(),
                surface_type: SurfaceType::Service,
                location: Some("github.com/demo/checkout-api".to_string()),
                environments: Environments {
                    prod: Some("https://checkout.demo.example.com".to_string()),
                    ..Environments::default()
                },
                external_id: None,
            },
        )
        .await?;

        db::features::insert(
            &mut *tx,
            &db::features::NewFeature {
                id: ulid::Ulid::new().to_string(),
                product_id,
                organization_id: org_id.clone(),
                title: "Guest checkout".to_string(),
                description: None,
                acceptance_criteria: vec!["A shopper can pay without creating an account".to_string()],
                source: FeatureSource::Manual,
                source_key: None,
                status: FeatureStatus::Draft,
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            email = email.as_str(),
            password = password.expose(),
            organization_id = %org_id,
            "created demo workspace"
        );
        Ok(SeedOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_password_is_valid() {
        let generated = random_password();
        assert_eq!(generated.len(), 16);
        assert!(Password::new(generated.clone()).is_ok());
        assert!(generated.chars().any(|c| c.is_ascii_uppercase()));
        assert!(generated.chars().any(|c| c.is_ascii_lowercase()));
        assert!(generated.chars().any(|c| c.is_ascii_digit()));
    }
}
