use chrono::Utc;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;

/// Record a click and print where the link goes. `--format raw` prints the
/// bare URL so it can be piped to a browser opener.
pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let viewer = ctx.viewer(flags).await?;
    let click = ctx.service.record_click(&viewer, id, Utc::now()).await?;
    if flags.format == OutputFormat::Raw {
        println!("{}", click.url);
        return Ok(());
    }
    output(&click, flags.format)
}
