use chrono::Utc;
use whys_core::responses::{CompleteResponse, NextResponse};
use whys_engine::Advance;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SessionArgs;
use crate::commands::shared::{completed_since, notify_completion, snapshot};
use crate::context::AppContext;
use crate::output::output;

/// Handle `whys next`.
pub async fn handle(args: &SessionArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let started = Utc::now();
    let (session, advance) = ctx.engine.advance(&args.id).await?;
    let response = match advance {
        Advance::Question(question) => NextResponse::Question {
            session: snapshot(&session),
            question,
        },
        Advance::RootCause(root_cause) => {
            if completed_since(&session, started) {
                let payload = CompleteResponse {
                    session: snapshot(&session),
                    root_cause: root_cause.clone(),
                };
                notify_completion(ctx.callback_url(), &payload).await;
            }
            NextResponse::RootCause {
                session: snapshot(&session),
                root_cause,
            }
        }
    };
    output(&response, flags.format)
}
