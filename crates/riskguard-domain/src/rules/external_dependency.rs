//! R403: the run depends on collections outside the allow-list.
//!
//! Deprecated and disabled by default; kept for hosts that still opt in.
//!
//! A collection is exempt when it matches a configured allow-list glob, is the
//! run's own collection, or is named in the run store's `allow_list`. Run-level
//! entries are plain collection names compared exactly. The exemptions are
//! rebuilt on every evaluation.

use crate::error::{ConfigError, RuleError};
use crate::model::RunContext;
use crate::rule::{Rule, RuleMode, RunRule, RunVerdict};
use crate::rules::utils::{build_allowlist, collection_of, is_allowed};
use globset::GlobSet;
use riskguard_types::{ids, RuleMeta, Severity, Tag};
use serde_json::json;
use std::collections::BTreeSet;

pub const RULE_ID: &str = ids::RULE_EXTERNAL_DEPENDENCY;

const SUBJECT: &str = "tasks";

#[derive(Clone, Debug)]
pub struct ExternalDependency {
    meta: RuleMeta,
    allow_list: Vec<String>,
    allow: Option<GlobSet>,
}

impl ExternalDependency {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                rule_id: RULE_ID.to_string(),
                name: "ExternalDependency".to_string(),
                description: "deprecated".to_string(),
                version: "v0.0.1".to_string(),
                severity: Severity::Low,
                tags: vec![Tag::Dependency],
                enabled: false,
            },
            allow_list: Vec::new(),
            allow: None,
        }
    }

    /// Configured allow-list entries are validated here, before any run is evaluated.
    pub fn with_allow_list(allow_list: Vec<String>) -> Result<Self, ConfigError> {
        let allow = build_allowlist(allow_list.as_slice()).map_err(|e| {
            ConfigError::InvalidAllowPattern {
                rule_id: RULE_ID.to_string(),
                pattern: e.glob().unwrap_or_default().to_string(),
                reason: e.kind().to_string(),
            }
        })?;
        Ok(Self {
            allow_list,
            allow,
            ..Self::new()
        })
    }

    pub fn allow_list(&self) -> &[String] {
        &self.allow_list
    }

    /// Collections exempted by the run itself: its own collection and the run
    /// store's `allow_list` entries.
    pub fn run_exemptions<'a>(
        &self,
        ctx: &'a RunContext,
    ) -> Result<BTreeSet<&'a str>, RuleError> {
        let mut exempt: BTreeSet<&str> =
            ctx.str_list(ids::VAR_ALLOW_LIST)?.into_iter().collect();
        if !ctx.collection_name.is_empty() {
            exempt.insert(ctx.collection_name.as_str());
        }
        Ok(exempt)
    }
}

impl Default for ExternalDependency {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for ExternalDependency {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn mode(&self) -> RuleMode<'_> {
        RuleMode::PerRun(self)
    }
}

impl RunRule for ExternalDependency {
    fn evaluate(&self, ctx: &RunContext) -> Result<RunVerdict, RuleError> {
        let exempt = self.run_exemptions(ctx)?;

        let mut external: BTreeSet<&str> = BTreeSet::new();
        let mut units = Vec::new();

        for (index, call) in ctx.task_calls() {
            if !call.is_module() {
                continue;
            }
            let resolved_name = call.resolved_name.as_str();
            if resolved_name.is_empty() {
                continue;
            }
            if resolved_name.starts_with(ids::BUILTIN_NAMESPACE) {
                continue;
            }
            let Some(collection) = collection_of(resolved_name) else {
                continue;
            };
            if exempt.contains(collection) || is_allowed(self.allow.as_ref(), collection) {
                continue;
            }
            if external.insert(collection) {
                units.push(index);
            }
        }

        let collections: Vec<&str> = external.into_iter().collect();
        let matched = !collections.is_empty();
        let message = if matched {
            format!("{SUBJECT} depend on external collections: {collections:?}")
        } else {
            format!("No {SUBJECT} depend on external dependencies")
        };

        Ok(RunVerdict {
            matched,
            units,
            message,
            detail: json!({ "collections": collections }),
        })
    }
}
