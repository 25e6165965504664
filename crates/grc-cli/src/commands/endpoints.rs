use anyhow::Context;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct EndpointsResponse<'a> {
    tenant: &'a str,
    endpoints: &'a [String],
}

/// Handle `grcs endpoints`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let connection = ctx.connection()?;
    let endpoints = ctx
        .discovery
        .get_available_endpoints(&connection, &ctx.tenant_id)
        .await
        .context("failed to list endpoints")?;

    output(
        &EndpointsResponse {
            tenant: &ctx.tenant_id,
            endpoints: &endpoints,
        },
        flags.format,
    )
}
