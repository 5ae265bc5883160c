//! Session commands.

use secrecy::SecretString;

use super::{CliError, Context, or_dash};

/// Sign in and persist the token.
pub async fn login(ctx: &Context, username: &str, password: &SecretString) -> Result<(), CliError> {
    ctx.client.login(username, password).await?;
    if let Some(path) = ctx.client.session().storage_path() {
        tracing::debug!(path = %path.display(), "Session saved");
    }

    let name = ctx
        .client
        .session()
        .admin_profile()
        .map_or_else(|| username.to_string(), |p| p.display_name());
    ctx.output.done(&format!("Logged in as {name}"))
}

pub fn logout(ctx: &Context) -> Result<(), CliError> {
    ctx.client.logout()?;
    ctx.output.done("Logged out")
}

/// Fetch the profile (refreshing the cached copy) and print it.
pub async fn whoami(ctx: &Context) -> Result<(), CliError> {
    ctx.require_login()?;
    let profile = ctx.client.get_profile().await?;

    ctx.output.record(
        &profile,
        &[
            ("Username", profile.username.clone()),
            ("Name", profile.display_name()),
            ("Email", profile.email.clone()),
            ("Phone", or_dash(profile.phone.as_deref())),
            ("Picture", or_dash(profile.picture_url.as_deref())),
        ],
    )
}
