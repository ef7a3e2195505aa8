#![deny(clippy::all, clippy::pedantic)]

use devlink::application::error::AppError;
use devlink::application::gmail::GmailIntegration;
use serde_json::json;

use crate::args::GmailCmd;
use crate::context::Ctx;
use crate::print::print_json;

pub async fn handle(ctx: &mut Ctx, cmd: GmailCmd) -> Result<(), AppError> {
    let mut gmail = GmailIntegration::new(ctx.client.clone(), ctx.toasts.clone());

    match cmd {
        GmailCmd::Status => print_json(gmail.refresh_status().await?),
        GmailCmd::Connect => {
            let url = gmail.connect().await?;
            ctx.toasts
                .info("Open the URL below to grant DevLink access to your Gmail account");
            print_json(&json!({ "auth_url": url }))
        }
        GmailCmd::Disconnect => Ok(gmail.disconnect().await?),
        GmailCmd::Test { to } => {
            let id = gmail.send_test(to.as_deref()).await?;
            print_json(&json!({ "gmail_message_id": id }))
        }
    }
}
