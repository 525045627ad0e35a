use super::Context;
use anyhow::Result;

/// A load rewrites a legacy file as a side effect, so migrating is loading.
#[allow(clippy::print_stdout)]
pub(crate) async fn migrate(ctx: &Context) -> Result<()> {
    if !ctx.store.exists().await? {
        println!("nothing to migrate: {} does not exist", ctx.store.path().display());
        return Ok(());
    }

    let set = ctx.load().await?;
    println!("{} credential(s) readable in encrypted form at {}", set.len(), ctx.store.path().display());
    Ok(())
}
