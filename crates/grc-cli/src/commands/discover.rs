use anyhow::Context;
use grc_core::entities::ApplicationSchema;
use grc_core::enums::DiscoveryPhase;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DiscoverArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DiscoverResponse<'a> {
    tenant: &'a str,
    schema: &'a ApplicationSchema,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a [DiscoveryPhase]>,
}

/// Handle `grcs discover`.
pub async fn handle(
    args: &DiscoverArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let app = &args.application;
    let connection = ctx.connection()?;

    let outcome = ctx
        .discovery
        .discover_with_trace(
            app.application_id,
            &app.application_name,
            &app.retrieval_path,
            &connection,
            &ctx.tenant_id,
        )
        .await
        .with_context(|| format!("failed to discover schema for '{}'", app.application_name))?;

    let response = DiscoverResponse {
        tenant: &ctx.tenant_id,
        schema: &outcome.schema,
        trace: args.trace.then_some(outcome.trace.as_slice()),
    };
    output(&response, flags.format)
}
