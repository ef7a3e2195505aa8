#![deny(clippy::all, clippy::pedantic)]

use devlink::application::error::AppError;
use devlink::application::profile::ProfileManager;
use devlink_api_types::ProfileUpdateRequest;

use crate::args::ProfileCmd;
use crate::context::Ctx;
use crate::io::read_image;
use crate::print::{print_inline_error, print_json};

pub async fn handle(ctx: &mut Ctx, cmd: ProfileCmd) -> Result<(), AppError> {
    let mut manager = ProfileManager::new(ctx.client.clone(), ctx.toasts.clone());

    match cmd {
        ProfileCmd::Show => match manager.load().await {
            Ok(profile) => print_json(profile),
            Err(err) => {
                print_inline_error(manager.error());
                Err(err.into())
            }
        },
        ProfileCmd::Update {
            username,
            email,
            first_name,
            last_name,
            work_image,
        } => {
            let update = ProfileUpdateRequest {
                username,
                email,
                first_name,
                last_name,
            };
            let image = work_image.as_deref().map(read_image).transpose()?;
            let profile = manager.update(update, image).await?;
            print_json(profile)
        }
        ProfileCmd::Password {
            current,
            new,
            confirm,
        } => Ok(manager.change_password(&current, &new, &confirm).await?),
        ProfileCmd::Stats => print_json(manager.load_stats().await?),
    }
}
