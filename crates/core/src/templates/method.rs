use std::collections::HashMap;

use super::keyword;
use crate::{
    models::{ClosureModel, MemberKind, ParamModel},
    types::TypeName,
    utils::tab,
};

/// Renders one callable member.
///
/// Initializers become a `required init` assigning every parameter. Every
/// other kind becomes three members: a call counter, a handler slot and the
/// member itself, recording the call and forwarding to the handler.
pub struct MethodTemplate<'a> {
    pub name: &'a str,
    /// Disambiguated name used for the counter and handler
    pub identifier: &'a str,
    pub kind: MemberKind,
    pub generic_params: &'a [ParamModel],
    pub params: &'a [ParamModel],
    pub return_type: &'a TypeName,
    pub is_static: bool,
    pub access_level: &'a str,
    pub suffix: &'a str,
    pub attributes: &'a [String],
    pub handler: Option<&'a ClosureModel>,
    pub type_keys: &'a HashMap<String, String>,
}

impl MethodTemplate<'_> {
    pub fn render(&self) -> String {
        match self.kind {
            MemberKind::Initializer => self.render_initializer(),
            _ => self.render_recording(),
        }
    }

    fn generics(&self) -> String {
        if self.generic_params.is_empty() {
            return String::new();
        }
        let list = self
            .generic_params
            .iter()
            .map(ParamModel::render_decl)
            .collect::<Vec<_>>()
            .join(", ");
        format!("<{list}>")
    }

    fn param_list(&self) -> String {
        self.params
            .iter()
            .map(ParamModel::render_decl)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn suffix_clause(&self) -> String {
        if self.suffix.is_empty() {
            String::new()
        } else {
            format!(" {}", self.suffix)
        }
    }

    fn return_clause(&self) -> String {
        if self.return_type.is_void() {
            String::new()
        } else {
            format!(" -> {}", self.return_type)
        }
    }

    fn modifiers(&self) -> String {
        let static_kind = if self.is_static { "static" } else { "" };
        format!("{}{}", keyword(self.access_level), keyword(static_kind))
    }

    fn render_initializer(&self) -> String {
        let mut lines = vec![format!(
            "{}{}required init{}({}){} {{",
            tab(1),
            keyword(self.access_level),
            self.generics(),
            self.param_list(),
            self.suffix_clause()
        )];
        for param in self.params {
            lines.push(format!("{}self.{} = {}", tab(2), param.name, param.name));
        }
        lines.push(format!("{}_doneInit = true", tab(2)));
        lines.push(format!("{}}}", tab(1)));
        lines.join("\n")
    }

    /// Counter increment followed by the handler invocation, `level` deep.
    fn recording_body(&self, level: usize) -> Vec<String> {
        let mut lines = vec![format!("{}{}CallCount += 1", tab(level), self.identifier)];
        if let Some(handler) = self.handler {
            let handler_name = format!("{}Handler", self.identifier);
            lines.push(handler.render_invocation(&handler_name, self.type_keys, level));
        }
        lines
    }

    fn render_recording(&self) -> String {
        let modifiers = self.modifiers();
        let handler_type = self
            .handler
            .map(ClosureModel::callable_type)
            .unwrap_or_else(|| "Any?".to_string());

        let mut lines = vec![
            format!("{}{modifiers}var {}CallCount = 0", tab(1), self.identifier),
            format!("{}{modifiers}var {}Handler: {handler_type}", tab(1), self.identifier),
        ];
        lines.extend(self.attributes.iter().map(|attr| format!("{}{attr}", tab(1))));

        match self.kind {
            MemberKind::Subscript => {
                lines.push(format!(
                    "{}{modifiers}subscript{}({}){} {{",
                    tab(1),
                    self.generics(),
                    self.param_list(),
                    self.return_clause()
                ));
                lines.push(format!("{}get{} {{", tab(2), self.suffix_clause()));
                lines.extend(self.recording_body(3));
                lines.push(format!("{}}}", tab(2)));
                lines.push(format!("{}set {{ }}", tab(2)));
            }
            MemberKind::ComputedProperty => {
                lines.push(format!(
                    "{}{modifiers}var {}: {} {{",
                    tab(1),
                    self.name,
                    self.return_type
                ));
                lines.push(format!("{}get{} {{", tab(2), self.suffix_clause()));
                lines.extend(self.recording_body(3));
                lines.push(format!("{}}}", tab(2)));
            }
            _ => {
                lines.push(format!(
                    "{}{modifiers}func {}{}({}){}{} {{",
                    tab(1),
                    self.name,
                    self.generics(),
                    self.param_list(),
                    self.suffix_clause(),
                    self.return_clause()
                ));
                lines.extend(self.recording_body(2));
            }
        }
        lines.push(format!("{}}}", tab(1)));
        lines.join("\n")
    }
}
