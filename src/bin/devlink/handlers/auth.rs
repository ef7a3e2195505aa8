#![deny(clippy::all, clippy::pedantic)]

use devlink::application::error::{ActionError, AppError};

use crate::args::AuthCmd;
use crate::context::Ctx;
use crate::io::read_secret;
use crate::print::print_json;

pub async fn handle(ctx: &mut Ctx, cmd: AuthCmd) -> Result<(), AppError> {
    match cmd {
        AuthCmd::Login {
            username,
            password,
            password_file,
        } => {
            let password = read_secret("password", password, password_file)?;
            let user = match ctx.gate.login(&username, &password).await {
                Ok(user) => user,
                Err(err) => {
                    ctx.toasts.error(err.user_message("Login failed"));
                    return Err(err.into());
                }
            };
            ctx.toasts.success(format!("Welcome back, {}!", user.username));
            print_json(user)
        }
        AuthCmd::Register {
            username,
            email,
            password,
            password_file,
        } => {
            let password = read_secret("password", password, password_file)?;
            let user = match ctx.gate.register(&username, &email, &password).await {
                Ok(user) => user,
                Err(err) => {
                    ctx.toasts.error(err.user_message("Registration failed"));
                    return Err(err.into());
                }
            };
            ctx.toasts.success(format!("Welcome to DevLink, {}!", user.username));
            print_json(user)
        }
        AuthCmd::Logout => {
            ctx.gate.logout();
            ctx.toasts.info("Logged out");
            Ok(())
        }
        AuthCmd::Whoami => {
            ctx.gate.restore().await;
            match ctx.gate.user() {
                Some(user) => print_json(user),
                // The expired notice is reported by `Ctx::finish`.
                None if ctx.gate.session_expired() => Ok(()),
                None => Err(ActionError::NotAuthenticated.into()),
            }
        }
    }
}
