use anyhow::{Context, Result};
use mocksmith_core::{
    CollectedResults, Entity, Generator, Member, SwiftParser, models::MemberKind,
    templates::mock_class::resolve_identifiers,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct AnalyzedMember {
    pub name: String,
    pub kind: &'static str,
    pub full_name: String,
    /// Name used for the counter and handler in a generated mock
    pub identifier: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzedEntity {
    pub name: String,
    pub kind: String,
    pub annotated: bool,
    pub inherited_types: Vec<String>,
    pub members: Vec<AnalyzedMember>,
}

fn member_kind(member: &Member) -> &'static str {
    match member {
        Member::Property(_) => "property",
        Member::Method(method) if method.is_initializer() => "initializer",
        Member::Method(method) if method.is_subscript() => "subscript",
        Member::Method(method) if method.kind == MemberKind::ComputedProperty => "computed property",
        Member::Method(_) => "method",
    }
}

pub fn analyze_entity(entity: &Entity) -> AnalyzedEntity {
    let members: Vec<&Member> = entity.members.iter().collect();
    let identifiers = resolve_identifiers(&members);
    AnalyzedEntity {
        name: entity.name.clone(),
        kind: format!("{:?}", entity.kind).to_lowercase(),
        annotated: entity.is_annotated,
        inherited_types: entity.inherited_types.clone(),
        members: members
            .iter()
            .zip(identifiers)
            .map(|(member, identifier)| AnalyzedMember {
                name: member.name().to_string(),
                kind: member_kind(member),
                full_name: member.full_name(),
                identifier,
            })
            .collect(),
    }
}

pub fn analyze_command(filepath: &Path, json: bool) -> Result<()> {
    debug!("Analyzing file: {}", filepath.display());

    if !filepath.exists() {
        return Err(anyhow::anyhow!("File not found: {}", filepath.display()));
    }

    let sink = Mutex::new(CollectedResults::new());
    Generator::new()
        .generate_from_tree(&SwiftParser::new(), &[filepath.to_path_buf()], false, &sink)
        .with_context(|| format!("Failed to analyze {}", filepath.display()))?;
    let results = sink.into_inner();
    let analyzed: Vec<AnalyzedEntity> = results.entities.iter().map(analyze_entity).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&analyzed)?);
        return Ok(());
    }

    println!("🔍 Analyzing: {}", filepath.display());
    println!("{}", "=".repeat(80));
    if analyzed.is_empty() {
        println!("\nNo protocols or classes found");
    }
    for entity in &analyzed {
        let marker = if entity.annotated { " 🎯" } else { "" };
        println!("\n📦 {} {}{}", entity.kind, entity.name, marker);
        if !entity.inherited_types.is_empty() {
            println!("   inherits: {}", entity.inherited_types.join(", "));
        }
        for member in &entity.members {
            println!(
                "   • {:<18} {:<24} full name: {}, mock id: {}",
                member.kind, member.name, member.full_name, member.identifier
            );
        }
    }
    Ok(())
}
