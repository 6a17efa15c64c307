//! Stable identifiers for rules and run-scoped store keys.
//!
//! `rule_id` values never change across rule versions; downstream tooling keys on them.

// Rules
pub const RULE_UNRESOLVED_MODULE: &str = "R304";
pub const RULE_EXTERNAL_DEPENDENCY: &str = "R403";

// Run-scoped store keys
pub const VAR_ALLOW_LIST: &str = "allow_list";

// Reserved namespace for modules shipped with the automation engine itself.
pub const BUILTIN_NAMESPACE: &str = "ansible.builtin.";
