use super::{Context, escalate};
use anyhow::Result;

#[allow(clippy::print_stdout)]
pub(crate) async fn clear(ctx: &Context) -> Result<()> {
    let store = ctx.store.clone();
    ctx.resilience
        .with_timeout(async move { store.clear().await }, ctx.config.timeouts.save(), "credentials.clear")
        .await
        .map_err(|err| escalate(err, false))?;
    println!("cleared {}", ctx.store.path().display());
    Ok(())
}
