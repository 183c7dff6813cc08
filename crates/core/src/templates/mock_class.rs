use std::collections::HashSet;

use super::{RenderContext, keyword};
use crate::{
    error::Result,
    models::{Entity, Member},
    utils::tab,
};

/// Stored names a recording member declares for `identifier`
fn recording_names(identifier: &str) -> [String; 3] {
    [
        identifier.to_string(),
        format!("{identifier}CallCount"),
        format!("{identifier}Handler"),
    ]
}

/// Pick a unique identifier for every member of one mock class.
///
/// Stored properties reserve their names first, including the setter
/// counter a fresh property declares. Fresh methods are then visited in
/// order and each takes the shortest `name_by` level whose name, call
/// counter and handler are all still free. Processed members are
/// re-emitted verbatim, so they keep their own name and claim nothing.
pub fn resolve_identifiers(members: &[&Member]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    for member in members {
        if let Member::Property(property) = member {
            used.insert(property.name.clone());
            if !property.processed {
                used.insert(format!("{}SetCallCount", property.name));
            }
        }
    }

    members
        .iter()
        .map(|member| match member {
            Member::Property(property) => property.name.clone(),
            Member::Method(method) if method.is_initializer() || method.processed => method.name.clone(),
            Member::Method(method) => {
                // `name_by` never repeats, so a free level always exists
                let identifier = (0..)
                    .map(|level| method.name_by(level))
                    .find(|candidate| recording_names(candidate).iter().all(|name| !used.contains(name)))
                    .unwrap_or_else(|| method.full_name());
                used.extend(recording_names(&identifier));
                identifier
            }
        })
        .collect()
}

/// One `{Name}Mock` class.
pub struct MockClassTemplate<'a> {
    pub entity: &'a Entity,
    /// Own and inherited members, already de-duplicated
    pub members: Vec<&'a Member>,
    pub mock_final: bool,
}

impl MockClassTemplate<'_> {
    pub fn render(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let final_kind = if self.mock_final { "final" } else { "" };
        let mut lines = vec![
            format!(
                "{}{}class {}: {} {{",
                keyword(&self.entity.access_level),
                keyword(final_kind),
                self.entity.mock_name(),
                self.entity.name
            ),
            format!("{}private var _doneInit = false", tab(1)),
        ];

        // Processed initializers are dropped, so only fresh ones count
        let has_initializer = self
            .members
            .iter()
            .any(|member| member.is_initializer() && !member.is_processed());
        if !has_initializer {
            lines.push(format!(
                "{}{}init() {{ _doneInit = true }}",
                tab(1),
                keyword(&self.entity.access_level)
            ));
        }

        let identifiers = resolve_identifiers(&self.members);
        for (member, identifier) in self.members.iter().zip(&identifiers) {
            let Some(text) = member.render(identifier, ctx)? else {
                continue;
            };
            if member.is_processed() {
                lines.push(format!("{}{}", tab(1), text.trim_start()));
            } else {
                lines.push(text);
            }
        }

        lines.push("}".to_string());
        tracing::debug!(
            "Rendered {} with {} member(s)",
            self.entity.mock_name(),
            self.members.len()
        );
        Ok(lines.join("\n"))
    }
}
