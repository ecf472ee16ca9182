mod datastore;
mod flow;
mod hygiene;
mod process;

use crate::rules::types::Rule;
use std::sync::LazyLock;

static ALL_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let mut rules = Vec::with_capacity(16);
    rules.extend(flow::rules());
    rules.extend(process::rules());
    rules.extend(datastore::rules());
    rules.extend(hygiene::rules());
    rules
});

/// The fixed, ordered builtin rule library.
pub fn all_rules() -> &'static [Rule] {
    &ALL_RULES
}
