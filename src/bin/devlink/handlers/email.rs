#![deny(clippy::all, clippy::pedantic)]

use devlink::application::compose::EmailComposer;
use devlink::application::error::AppError;
use devlink::application::history::EmailHistory;
use serde_json::json;

use crate::args::EmailCmd;
use crate::context::Ctx;
use crate::io::read_value;
use crate::print::{print_inline_error, print_json};

pub async fn handle(ctx: &mut Ctx, cmd: EmailCmd) -> Result<(), AppError> {
    match cmd {
        EmailCmd::Send {
            to,
            subject,
            body,
            body_file,
        } => {
            let body = read_value("body", body, body_file)?;
            let mut composer = EmailComposer::new(ctx.client.clone(), ctx.client.clone());
            composer.set_recipients(to);
            composer.set_subject(subject);
            composer.set_body(body);
            send(ctx, &mut composer).await
        }
        EmailCmd::History { page, page_size } => {
            let mut history = EmailHistory::new(ctx.client.clone());
            history.set_page_size(page_size)?;
            match history.load(page).await {
                Ok(current) => {
                    let total_pages = current.total_pages();
                    print_json(&json!({
                        "page": current.page,
                        "page_size": current.page_size,
                        "total": current.total,
                        "total_pages": total_pages,
                        "results": current.results,
                    }))
                }
                Err(err) => {
                    print_inline_error(history.error());
                    Err(err.into())
                }
            }
        }
    }
}

/// Send the composed message and report the outcome on stderr.
pub async fn send(ctx: &Ctx, composer: &mut EmailComposer) -> Result<(), AppError> {
    match composer.send().await {
        Ok(sent) => {
            if let Some(message) = composer.success() {
                ctx.toasts.success(message);
            }
            print_json(&json!({ "sent": sent }))
        }
        Err(err) => {
            print_inline_error(composer.error());
            Err(err.into())
        }
    }
}
