//! Markdown reference of the built-in types, generated from their contracts.

use std::fmt::Write;

use crate::registry::{Category, ChildrenMode, Contract, Registry};

const CATEGORIES: [Category; 4] = [
    Category::Structure,
    Category::Layout,
    Category::Content,
    Category::Special,
];

fn children_note(mode: ChildrenMode) -> &'static str {
    match mode {
        ChildrenMode::Markup => "strings and nodes, rendered in order",
        ChildrenMode::Text => "strings only, joined",
        ChildrenMode::None => "not accepted",
    }
}

fn write_contract(out: &mut String, contract: &Contract) {
    let _ = writeln!(out, "### `{}`\n", contract.name);
    let _ = writeln!(out, "{}\n", contract.description);
    let _ = writeln!(out, "Children: {}\n", children_note(contract.children));

    if contract.props.is_empty() {
        return;
    }
    out.push_str("| Property | Type | Required | Default | Description |\n");
    out.push_str("|---|---|---|---|---|\n");
    for prop in contract.props {
        let _ = writeln!(
            out,
            "| `{}` | {} | {} | {} | {} |",
            prop.name,
            prop.prop_type.to_string().replace('|', "\\|"),
            if prop.required { "yes" } else { "no" },
            prop.default.map(|d| format!("`{}`", d)).unwrap_or_default(),
            prop.description
        );
    }
    out.push('\n');
}

/// Guide for every registered type, grouped by category.
pub fn component_guide() -> String {
    component_guide_for(Registry::global())
}

pub fn component_guide_for(registry: &Registry) -> String {
    let mut out = String::from("# Email components\n\n");
    let _ = writeln!(
        out,
        "Documents are JSON: `{{ \"subject\"?: string, \"component\": node }}`. A node is `{{ \"type\", \"props\"?, \"children\"? }}`; {} types are built in.\n",
        registry.len()
    );

    for category in CATEGORIES {
        let contracts: Vec<&Contract> = registry
            .contracts()
            .filter(|c| c.category == category)
            .collect();
        if contracts.is_empty() {
            continue;
        }
        let _ = writeln!(out, "## {}\n", category);
        for contract in contracts {
            write_contract(&mut out, contract);
        }
    }

    out.push_str("## Other tags\n\n");
    out.push_str(
        "Any other `type` is emitted as a literal HTML tag. Props become attributes, `style` objects become inline CSS, `true` becomes a bare attribute and `false` or `null` is dropped. `img`, `br`, `hr`, `input`, `meta` and `link` are self-closing.\n",
    );
    out
}
