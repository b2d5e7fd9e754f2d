use lasambus_cli::context::{AppContext, init_tracing};
use lasambus_cli::prompt::Prompt;
use lasambus_core::{Route, resolve_route};

mod views;

use views::ViewExit;

/// Interactive LASAMBUS terminal client.
///
/// Shows the view for the current session (login, personnel dashboard or admin dashboard) and
/// switches views whenever the session changes: after login, logout, or a `401` from the
/// backend, which also prints "Session expired. Please login again.".
///
/// # Environment Variables
/// - `LASAMBUS_BACKEND_URL`: backend origin (default: "http://localhost:8001")
/// - `LASAMBUS_STATE_DIR`: where the session is kept between runs (default: ".lasambus")
/// - `LASAMBUS_HTTP_TIMEOUT_SECS`: per-request timeout (default: 30)
/// - `RUST_LOG`: log filter; logs go to stderr
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let ctx = AppContext::from_env()?;
    let mut prompt = Prompt::stdio();

    tracing::info!(backend = %ctx.config.backend_url(), "lasambus-run started");

    loop {
        if let Some(notice) = ctx.navigator.take_notice() {
            prompt.say(&notice)?;
        }

        let route = resolve_route(ctx.session.current().as_ref());
        ctx.navigator.show(route);

        let exit = match route {
            Route::Login => views::login::run(&ctx, &mut prompt).await?,
            Route::PersonnelDashboard => views::personnel::run(&ctx, &mut prompt).await?,
            Route::AdminDashboard => views::admin::run(&ctx, &mut prompt).await?,
        };

        if exit == ViewExit::Quit {
            break;
        }
    }

    Ok(())
}
