use super::Context;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use quill_domain::Credential;

#[allow(clippy::print_stdout)]
pub(crate) async fn list(ctx: &Context) -> Result<()> {
    let set = ctx.load().await?;
    let now = Utc::now();

    if set.is_empty() {
        println!("no credentials stored");
        return Ok(());
    }

    println!("{:<24} {:<32} {:<12} EXPIRES", "NAME", "DOMAIN", "PATH");
    for credential in &set {
        println!(
            "{:<24} {:<32} {:<12} {}",
            credential.name,
            credential.domain,
            credential.path.as_deref().unwrap_or("-"),
            expiry(credential, now)
        );
    }
    Ok(())
}

fn expiry(credential: &Credential, now: DateTime<Utc>) -> String {
    let Some(at) = credential.expires_at.filter(|secs| *secs > 0.0) else {
        return "session".to_owned();
    };

    #[allow(clippy::cast_possible_truncation)]
    let formatted = DateTime::<Utc>::from_timestamp(at as i64, 0)
        .map_or_else(|| format!("{at}"), |t| t.to_rfc3339_opts(SecondsFormat::Secs, true));

    if credential.is_expired(now) { format!("{formatted} (expired)") } else { formatted }
}
