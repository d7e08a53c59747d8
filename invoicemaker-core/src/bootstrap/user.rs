//! Superuser provisioning

use tracing::{info, warn};

use crate::db::DbPool;
use crate::models::{User, UserRole};
use crate::repository::UserRepository;
use crate::service::password::hash_password;
use crate::{Config, Error, Result};

/// Password used when no `SUPERUSER_PASSWORD` is configured. Accepted only
/// in debug mode; production provisioning fails instead of silently shipping
/// a well-known credential.
pub const DEV_DEFAULT_PASSWORD: &str = "admin";

/// What a provisioning run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// No account with the configured username existed; one was created.
    Created {
        username: String,
        email: String,
        password: String,
        used_default_password: bool,
    },
    /// The account existed and an explicit password override was supplied;
    /// only the password field changed.
    PasswordUpdated { username: String },
    /// The account existed and no override was supplied; nothing changed.
    Unchanged { username: String },
}

/// Create the administrative account, or update its password.
///
/// Behavior per configuration:
/// - username absent: create an admin account with the configured password
///   (or the development default when debug mode is on).
/// - username present, `SUPERUSER_PASSWORD` set: update only the password.
/// - username present, no override: leave the account untouched.
pub async fn provision_superuser(db: &DbPool, config: &Config) -> Result<ProvisionOutcome> {
    let repository = UserRepository::new(db.clone());
    let superuser = &config.superuser;

    if let Some(existing) = repository.get_by_username(&superuser.username).await? {
        info!("Superuser '{}' already exists", superuser.username);

        let Some(password) = &superuser.password else {
            return Ok(ProvisionOutcome::Unchanged {
                username: existing.username,
            });
        };

        let password_hash = hash_password(password).await?;
        repository.update_password(&existing.id, &password_hash).await?;
        info!("Superuser password updated from SUPERUSER_PASSWORD");
        return Ok(ProvisionOutcome::PasswordUpdated {
            username: existing.username,
        });
    }

    let (password, used_default_password) = match &superuser.password {
        Some(password) => (password.clone(), false),
        None if config.debug => {
            warn!(
                "No SUPERUSER_PASSWORD set, falling back to the development default. \
                 Change this password after first login."
            );
            (DEV_DEFAULT_PASSWORD.to_string(), true)
        }
        None => {
            return Err(Error::InvalidInput(
                "SUPERUSER_PASSWORD must be set when debug mode is off".to_string(),
            ));
        }
    };

    info!("Creating superuser '{}'...", superuser.username);

    let password_hash = hash_password(&password).await?;
    let mut user = User::new(
        superuser.username.clone(),
        Some(superuser.email.clone()),
        password_hash,
    );
    user.role = UserRole::Admin;
    repository.create(&user).await?;

    info!("Superuser created: username={}, role={}", user.username, user.role);

    Ok(ProvisionOutcome::Created {
        username: user.username,
        email: superuser.email.clone(),
        password,
        used_default_password,
    })
}
