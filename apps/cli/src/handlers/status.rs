use super::Context;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use quill_domain::CredentialSet;
use serde_json::json;

#[allow(clippy::print_stdout)]
pub(crate) async fn status(ctx: &Context, as_json: bool) -> Result<()> {
    let present = ctx.store.exists().await?;
    let set = if present { ctx.load().await? } else { CredentialSet::default() };
    let now = Utc::now();
    let live = set.live(now).len();

    if as_json {
        let report = json!({
            "path": ctx.store.path().display().to_string(),
            "present": present,
            "count": set.len(),
            "live": live,
            "savedAt": present.then(|| saved_at(set.saved_at)),
        });
        println!("{report}");
        return Ok(());
    }

    println!("store:    {}", ctx.store.path().display());
    if !present {
        println!("status:   empty (no credential file)");
        return Ok(());
    }
    println!("status:   present");
    println!("count:    {} ({live} live, {} expired)", set.len(), set.len() - live);
    println!("saved at: {}", saved_at(set.saved_at));
    Ok(())
}

fn saved_at(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
