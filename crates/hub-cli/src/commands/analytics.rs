use chrono::Utc;
use hub_core::analytics::AnalyticsWindow;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AnalyticsArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `linkhub analytics`.
pub async fn handle(
    args: &AnalyticsArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let viewer = ctx.viewer(flags).await?;
    let window = AnalyticsWindow {
        top: args.top,
        days: args.days,
        recent: args.recent,
    };
    let report = ctx
        .service
        .analytics_report(&viewer, window, Utc::now().date_naive())
        .await?;
    output(&report, flags.format)
}
