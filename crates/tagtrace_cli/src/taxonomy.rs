//! `tagtrace taxonomy`: prints the tag categories of each tier.

use tagtrace_config::{Taxonomy, Tier};

use crate::pipeline::load_project;
use crate::GlobalArgs;

/// Runs the `tagtrace taxonomy` command.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    print!("{}", render(&project.config.taxonomy));
    Ok(0)
}

fn render(taxonomy: &Taxonomy) -> String {
    let mut out = String::new();
    for tier in Tier::ALL {
        let categories = taxonomy.categories(tier);
        let list = if categories.is_empty() {
            "(none)".to_string()
        } else {
            categories.join(", ")
        };
        out.push_str(&format!("{:<15} {list}\n", tier.as_str()));
    }
    out
}
