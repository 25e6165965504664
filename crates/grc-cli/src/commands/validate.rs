use anyhow::{Context, bail};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ValidateArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `grcs validate`.
pub async fn handle(
    args: &ValidateArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let app = &args.application;
    let connection = ctx.connection()?;

    let schema = ctx
        .discovery
        .get_application_schema(
            app.application_id,
            &app.application_name,
            &app.retrieval_path,
            &connection,
            &ctx.tenant_id,
        )
        .await
        .with_context(|| format!("failed to discover schema for '{}'", app.application_name))?;

    let report = ctx
        .discovery
        .validate_application_schema(&schema, &connection)
        .await
        .with_context(|| format!("failed to validate schema for '{}'", app.application_name))?;

    output(&report, flags.format)?;

    if args.fail_on_drift && report.has_drift() {
        bail!(
            "schema drift detected for '{}': {} missing, {} extra, {} mismatched",
            report.application_name,
            report.missing_schema_fields.len(),
            report.extra_schema_fields.len(),
            report.data_type_mismatches.len()
        );
    }
    Ok(())
}
