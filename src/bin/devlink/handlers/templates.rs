#![deny(clippy::all, clippy::pedantic)]

use devlink::application::error::{ActionError, AppError};
use devlink::application::templates::TemplateManager;
use devlink_api_types::TemplateRequest;
use serde_json::json;

use crate::args::TemplatesCmd;
use crate::context::Ctx;
use crate::io::{read_opt_value, read_value};
use crate::print::print_json;

pub async fn handle(ctx: &mut Ctx, cmd: TemplatesCmd) -> Result<(), AppError> {
    let mut manager = TemplateManager::new(ctx.client.clone(), ctx.toasts.clone());

    match cmd {
        TemplatesCmd::List => print_json(manager.load().await?),
        TemplatesCmd::Create {
            name,
            subject,
            body,
            body_file,
            category,
            default,
        } => {
            let request = TemplateRequest {
                name,
                subject,
                body: read_value("body", body, body_file)?,
                category,
                is_default: default,
            };
            print_json(&manager.create(request).await?)
        }
        TemplatesCmd::Update {
            id,
            name,
            subject,
            body,
            body_file,
            category,
            default,
        } => {
            let body = read_opt_value(body, body_file)?;
            manager.load().await?;
            let current = manager.get(id).ok_or(ActionError::NotLoaded {
                entity: "template",
                id,
            })?;

            let mut request = TemplateRequest::from(current);
            if let Some(name) = name {
                request.name = name;
            }
            if let Some(subject) = subject {
                request.subject = subject;
            }
            if let Some(body) = body {
                request.body = body;
            }
            if let Some(category) = category {
                request.category = category;
            }
            if let Some(default) = default {
                request.is_default = default;
            }
            print_json(&manager.update(id, request).await?)
        }
        TemplatesCmd::Delete { id } => Ok(manager.delete(id).await?),
        TemplatesCmd::Use { id } => {
            manager.load().await?;
            let template = manager.use_template(id)?;
            print_json(&json!({
                "subject": template.subject,
                "body": template.body,
            }))
        }
    }
}
