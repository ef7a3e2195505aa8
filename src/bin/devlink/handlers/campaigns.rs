#![deny(clippy::all, clippy::pedantic)]

use devlink::application::campaigns::CampaignManager;
use devlink::application::error::{ActionError, AppError};
use devlink_api_types::CampaignRequest;
use serde_json::json;

use crate::args::CampaignsCmd;
use crate::context::Ctx;
use crate::io::{read_opt_value, read_value};
use crate::print::print_json;

pub async fn handle(ctx: &mut Ctx, cmd: CampaignsCmd) -> Result<(), AppError> {
    let mut manager = CampaignManager::new(ctx.client.clone(), ctx.toasts.clone());

    match cmd {
        CampaignsCmd::List => {
            let campaigns = manager
                .load()
                .await?
                .iter()
                .map(|campaign| {
                    json!({
                        "id": campaign.id,
                        "name": campaign.name,
                        "status": campaign.status,
                        "sent_count": campaign.sent_count,
                        "total_count": campaign.total_count,
                        "progress_percent": campaign.progress_percent(),
                    })
                })
                .collect::<Vec<_>>();
            print_json(&campaigns)
        }
        CampaignsCmd::Create {
            name,
            subject,
            body,
            body_file,
            recipients,
            template,
        } => {
            let request = CampaignRequest {
                name,
                subject,
                body: read_value("body", body, body_file)?,
                recipients: recipients
                    .into_iter()
                    .map(|email| json!({ "email": email }))
                    .collect(),
                template,
            };
            print_json(&manager.create(request).await?)
        }
        CampaignsCmd::Update {
            id,
            name,
            subject,
            body,
            body_file,
        } => {
            let body = read_opt_value(body, body_file)?;
            manager.load().await?;
            let current = manager.get(id).ok_or(ActionError::NotLoaded {
                entity: "campaign",
                id,
            })?;

            let mut request = CampaignRequest::from(current);
            if let Some(name) = name {
                request.name = name;
            }
            if let Some(subject) = subject {
                request.subject = subject;
            }
            if let Some(body) = body {
                request.body = body;
            }
            print_json(&manager.update(id, request).await?)
        }
        CampaignsCmd::Delete { id } => {
            manager.load().await?;
            Ok(manager.delete(id).await?)
        }
        CampaignsCmd::Send { id } => {
            manager.load().await?;
            Ok(manager.send(id).await?)
        }
    }
}
