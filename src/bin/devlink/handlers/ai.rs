#![deny(clippy::all, clippy::pedantic)]

use devlink::application::compose::EmailComposer;
use devlink::application::error::AppError;
use serde_json::json;

use crate::args::{AiCmd, DeveloperArgs};
use crate::context::Ctx;
use crate::handlers::email;
use crate::print::{print_inline_error, print_json};

pub async fn handle(ctx: &mut Ctx, cmd: AiCmd) -> Result<(), AppError> {
    let mut composer = EmailComposer::new(ctx.client.clone(), ctx.client.clone());

    match cmd {
        AiCmd::Email {
            business_name,
            business_category,
            developer,
            send_to,
        } => {
            composer.set_business(business_name, business_category);
            apply_developer(&mut composer, developer);
            if let Err(err) = composer.generate().await {
                print_inline_error(composer.error());
                return Err(err.into());
            }

            match send_to {
                Some(recipients) => {
                    composer.set_recipients(recipients);
                    email::send(ctx, &mut composer).await
                }
                None => print_draft(&composer),
            }
        }
        AiCmd::BulkEmail {
            category,
            developer,
        } => {
            apply_developer(&mut composer, developer);
            if let Err(err) = composer.generate_bulk(&category).await {
                print_inline_error(composer.error());
                return Err(err.into());
            }
            print_draft(&composer)
        }
    }
}

fn apply_developer(composer: &mut EmailComposer, developer: DeveloperArgs) {
    if developer.developer_name.is_none() && developer.developer_services.is_none() {
        return;
    }
    let (name, services) = composer.developer();
    let name = developer.developer_name.unwrap_or_else(|| name.to_string());
    let services = developer
        .developer_services
        .unwrap_or_else(|| services.to_string());
    composer.set_developer(name, services);
}

fn print_draft(composer: &EmailComposer) -> Result<(), AppError> {
    print_json(&json!({
        "subject": composer.subject(),
        "body": composer.body(),
    }))
}
