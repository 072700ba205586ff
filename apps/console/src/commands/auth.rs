//! # Session Commands
//!
//! `login`, `logout` and `whoami`. The token lives in the session file
//! between invocations; every other command reads it from there.

use chrono::Utc;
use clap::Args;
use serde::Serialize;

use sapore_client::CurrentUser;

use crate::error::CommandResult;
use crate::output::{or_dash, CommandOutput};
use crate::state::AppContext;

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long, help = "E-mail of the back-office account")]
    pub email: String,

    #[arg(long, env = "SAPORE_PASSWORD", hide_env_values = true, help = "Account password")]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WhoAmI<'a> {
    #[serde(flatten)]
    user: &'a CurrentUser,
    expired: bool,
}

pub async fn login(ctx: &AppContext, args: LoginArgs) -> CommandResult<CommandOutput> {
    let user = ctx.client.login(&args.email, &args.password).await?;
    let text = format!("Bem-vindo(a), {}.", user.display_name());
    CommandOutput::new(text, &user)
}

pub fn logout(ctx: &AppContext) -> CommandResult<CommandOutput> {
    ctx.client.logout()?;
    Ok(CommandOutput::message("Sessão encerrada."))
}

pub fn whoami(ctx: &AppContext) -> CommandResult<CommandOutput> {
    let user = ctx.client.require_user()?;
    let expired = user.is_expired(Utc::now());

    let mut text = format!(
        "{} <{}>\nPerfil: {}\nExpira: {}",
        user.display_name(),
        user.subject,
        or_dash(user.role.as_deref()),
        or_dash(user.expires_at.map(|t| t.format("%d/%m/%Y %H:%M UTC"))),
    );
    if expired {
        text.push_str("\nSessão expirada: faça login novamente.");
    }

    CommandOutput::new(text, &WhoAmI { user: &user, expired })
}
