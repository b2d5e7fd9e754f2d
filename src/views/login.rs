use std::io::{BufRead, Write};

use lasambus_cli::context::AppContext;
use lasambus_cli::prompt::Prompt;
use lasambus_cli::render::error_notice;
use lasambus_core::auth;
use lasambus_core::constants::{LOGIN_SUCCESS_NOTICE, REGISTER_SUCCESS_NOTICE};

use super::ViewExit;

/// Login and self-service registration.
pub async fn run<R: BufRead, W: Write>(
    ctx: &AppContext,
    prompt: &mut Prompt<R, W>,
) -> anyhow::Result<ViewExit> {
    prompt.say("")?;
    prompt.say("LASAMBUS - Lagos State Ambulance Service")?;

    loop {
        let Some(choice) = prompt.ask("[l]ogin, [r]egister or [q]uit:")? else {
            return Ok(ViewExit::Quit);
        };

        match choice.to_ascii_lowercase().as_str() {
            "l" | "login" => {
                let Some(email) = prompt.ask("Email:")? else {
                    return Ok(ViewExit::Quit);
                };
                let Some(password) = prompt.ask("Password:")? else {
                    return Ok(ViewExit::Quit);
                };
                match auth::login(&ctx.api, &ctx.session, &email, &password).await {
                    Ok(user) => {
                        prompt.say(LOGIN_SUCCESS_NOTICE)?;
                        prompt.say(&format!("Welcome, {}", user.full_name))?;
                        return Ok(ViewExit::Reroute);
                    }
                    Err(e) => {
                        prompt.say("Login failed")?;
                        prompt.say(&error_notice(&e))?;
                    }
                }
            }
            "r" | "register" => {
                let Some(email) = prompt.ask("Email:")? else {
                    return Ok(ViewExit::Quit);
                };
                let Some(full_name) = prompt.ask("Full name:")? else {
                    return Ok(ViewExit::Quit);
                };
                let Some(password) = prompt.ask("Password:")? else {
                    return Ok(ViewExit::Quit);
                };
                match auth::register(&ctx.api, &email, &full_name, &password).await {
                    Ok(_) => prompt.say(REGISTER_SUCCESS_NOTICE)?,
                    Err(e) => prompt.say(&error_notice(&e))?,
                }
            }
            "q" | "quit" => return Ok(ViewExit::Quit),
            _ => prompt.say("Unknown choice.")?,
        }
    }
}
