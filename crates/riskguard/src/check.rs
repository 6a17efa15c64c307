//! The `check` use case: resolve configuration, build the rule set, evaluate.

use anyhow::Context;
use riskguard_domain::model::RunContext;
use riskguard_domain::{Report, RuleSet};
use riskguard_settings::{Overrides, ResolvedConfig};

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// The resolved run graph to evaluate.
    pub context: &'a RunContext,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// Host-supplied overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: Report,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config, build the rule set, evaluate the run.
///
/// Configuration problems are fatal. Rule failures are not: they show up in the
/// report as error results.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        riskguard_settings::RiskguardConfigV1::default()
    } else {
        riskguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved =
        riskguard_settings::resolve_config(cfg, input.overrides).context("resolve config")?;

    let rules = RuleSet::from_config(&resolved.effective).context("build rule set")?;
    tracing::debug!(
        profile = rules.profile(),
        rules = rules.len(),
        enabled = rules.enabled().count(),
        "rule set ready"
    );

    let report = riskguard_domain::evaluate(input.context, &rules);

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Deserialize a run context handed over by the resolver as JSON.
pub fn parse_run_context(json: &str) -> anyhow::Result<RunContext> {
    serde_json::from_str(json).context("parse run context")
}
