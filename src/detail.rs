//! Markdown rendering of an item's detail view.

use crate::item::{Item, ItemCategory};

/// Placeholder shown instead of a hidden field's value.
pub const HIDDEN_PLACEHOLDER: &str = "••••••••";

fn category_emoji(category: ItemCategory) -> &'static str {
    match category {
        ItemCategory::Login => "🔐",
        ItemCategory::Alias => "📧",
        ItemCategory::Note => "📝",
        ItemCategory::CreditCard => "💳",
        ItemCategory::Identity => "👤",
        _ => "📄",
    }
}

/// Renders the title, notes and custom fields of `item` as markdown.
///
/// Hidden field values are never written out.
pub fn render_markdown(item: &Item) -> String {
    let mut lines = vec![format!("# {} {}", category_emoji(item.category()), item.name)];

    if !item.note.is_empty() {
        lines.extend(["", "---", "", "### Notes", ""].map(String::from));
        lines.push(item.note.clone());
    }

    if !item.extra_fields.is_empty() {
        lines.extend(["", "---", "", "### Custom Fields", ""].map(String::from));
        for field in &item.extra_fields {
            lines.push(format!("#### {}", field.name));
            if field.hidden {
                lines.push(format!("`{}` *(hidden)*", HIDDEN_PLACEHOLDER));
            } else if !field.value.is_empty() {
                lines.push(format!("`{}`", field.value));
            } else {
                lines.push("*empty*".to_string());
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}
