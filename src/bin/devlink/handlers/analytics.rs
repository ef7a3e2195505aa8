#![deny(clippy::all, clippy::pedantic)]

use devlink::application::analytics::AnalyticsDashboard;
use devlink::application::error::AppError;

use crate::args::AnalyticsArgs;
use crate::context::Ctx;
use crate::print::print_json;

pub async fn handle(ctx: &mut Ctx, args: AnalyticsArgs) -> Result<(), AppError> {
    let mut dashboard = AnalyticsDashboard::new(ctx.client.clone(), ctx.toasts.clone());
    dashboard.set_days(args.days)?;

    let report = if args.refresh {
        dashboard.refresh().await?
    } else {
        dashboard.load().await?
    };
    print_json(report)
}
