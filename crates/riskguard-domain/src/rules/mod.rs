//! Built-in rule catalog.
//!
//! Each rule lives behind a cargo feature, mirroring how hosts trim the set at
//! compile time. Catalog order is declaration order and therefore report order.

use crate::error::ConfigError;
use crate::rule::Rule;

#[cfg(feature = "rule-external-dependency")]
pub mod external_dependency;
#[cfg(feature = "rule-unresolved-module")]
pub mod unresolved_module;

mod utils;

pub use utils::{build_allowlist, collection_of, is_allowed};


/// A built-in rule and how to construct it from its configured allow-list.
#[derive(Clone, Copy)]
pub struct CatalogEntry {
    pub rule_id: &'static str,
    pub enabled_by_default: bool,
    pub deprecated: bool,
    pub accepts_allow_list: bool,
    pub build: fn(&[String]) -> Result<Box<dyn Rule>, ConfigError>,
}

pub fn catalog() -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    #[cfg(feature = "rule-unresolved-module")]
    entries.push(CatalogEntry {
        rule_id: unresolved_module::RULE_ID,
        enabled_by_default: true,
        deprecated: false,
        accepts_allow_list: false,
        build: build_unresolved_module,
    });

    #[cfg(feature = "rule-external-dependency")]
    entries.push(CatalogEntry {
        rule_id: external_dependency::RULE_ID,
        enabled_by_default: false,
        deprecated: true,
        accepts_allow_list: true,
        build: build_external_dependency,
    });

    entries
}

#[cfg(feature = "rule-unresolved-module")]
fn build_unresolved_module(_: &[String]) -> Result<Box<dyn Rule>, ConfigError> {
    Ok(Box::new(unresolved_module::UnresolvedModule::new()))
}

#[cfg(feature = "rule-external-dependency")]
fn build_external_dependency(allow: &[String]) -> Result<Box<dyn Rule>, ConfigError> {
    let rule = external_dependency::ExternalDependency::with_allow_list(allow.to_vec())?;
    Ok(Box::new(rule))
}

pub fn lookup(rule_id: &str) -> Option<CatalogEntry> {
    catalog().into_iter().find(|e| e.rule_id == rule_id)
}
