use anyhow::Result;

use invoicemaker_core::{
    bootstrap::{provision_superuser, ProvisionOutcome},
    Config, DbPool,
};

/// Create the administrative account, or update its password when an
/// explicit `SUPERUSER_PASSWORD` override is set.
pub async fn run(config: &Config, db: &DbPool) -> Result<()> {
    match provision_superuser(db, config).await? {
        ProvisionOutcome::Created {
            username,
            email,
            password,
            used_default_password,
        } => {
            println!("Superuser created:");
            println!("  username: {username}");
            println!("  email: {email}");
            println!("  password: {password}");
            if used_default_password {
                println!(
                    "WARNING: Using the default superuser password. \
                     Set SUPERUSER_PASSWORD and change it after first login."
                );
            }
        }
        ProvisionOutcome::PasswordUpdated { username } => {
            println!("Superuser '{username}' already exists.");
            println!("Superuser password updated from SUPERUSER_PASSWORD.");
        }
        ProvisionOutcome::Unchanged { username } => {
            println!("Superuser '{username}' already exists.");
        }
    }
    Ok(())
}
