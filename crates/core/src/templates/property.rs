use std::collections::HashMap;

use super::keyword;
use crate::{types::TypeName, utils::tab};

/// Renders a stored property with a setter counter.
///
/// Types with a known default get an initialized `var` with a `didSet`
/// observer. Anything else is backed by an implicitly unwrapped private
/// slot behind a computed wrapper.
pub struct PropertyTemplate<'a> {
    pub name: &'a str,
    pub type_name: &'a TypeName,
    pub is_static: bool,
    pub access_level: &'a str,
    pub type_keys: &'a HashMap<String, String>,
}

impl PropertyTemplate<'_> {
    pub fn render(&self) -> String {
        let static_kind = if self.is_static { "static" } else { "" };
        let modifiers = format!("{}{}", keyword(self.access_level), keyword(static_kind));
        let counter = format!("{}SetCallCount", self.name);
        // Instance setters fire during `required init`; those are not calls
        let increment = if self.is_static {
            format!("{counter} += 1")
        } else {
            format!("if _doneInit {{ {counter} += 1 }}")
        };

        let mut lines = vec![format!("{}{modifiers}var {counter} = 0", tab(1))];
        match self.type_name.default_value(self.type_keys) {
            Some(value) if !value.is_empty() => {
                lines.push(format!(
                    "{}{modifiers}var {}: {} = {value} {{ didSet {{ {increment} }} }}",
                    tab(1),
                    self.name,
                    self.type_name
                ));
            }
            _ => {
                let backing = if self.type_name.as_str().contains("->") {
                    format!("({})!", self.type_name)
                } else {
                    format!("{}!", self.type_name)
                };
                lines.push(format!(
                    "{}private {}var _{}: {backing}",
                    tab(1),
                    keyword(static_kind),
                    self.name
                ));
                lines.push(format!(
                    "{}{modifiers}var {}: {} {{",
                    tab(1),
                    self.name,
                    self.type_name
                ));
                lines.push(format!("{}get {{ return _{} }}", tab(2), self.name));
                lines.push(format!("{}set {{", tab(2)));
                lines.push(format!("{}_{} = newValue", tab(3), self.name));
                lines.push(format!("{}{increment}", tab(3)));
                lines.push(format!("{}}}", tab(2)));
                lines.push(format!("{}}}", tab(1)));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(name: &str, ty: &str, is_static: bool, keys: &HashMap<String, String>) -> String {
        let type_name = TypeName::new(ty);
        PropertyTemplate {
            name,
            type_name: &type_name,
            is_static,
            access_level: "",
            type_keys: keys,
        }
        .render()
    }

    #[test]
    fn test_defaulted_property_observes_sets() {
        let rendered = render("count", "Int", false, &HashMap::new());
        assert_eq!(
            rendered,
            "    var countSetCallCount = 0\n    var count: Int = 0 { didSet { if _doneInit { countSetCallCount += 1 } } }"
        );
    }

    #[test]
    fn test_static_property_skips_init_guard() {
        let rendered = render("shared", "Bool", true, &HashMap::new());
        assert!(rendered.contains("    static var shared: Bool = false { didSet { sharedSetCallCount += 1 } }"));
    }

    #[test]
    fn test_property_without_default_uses_backing_slot() {
        let rendered = render("session", "URLSession", false, &HashMap::new());
        let expected = [
            "    var sessionSetCallCount = 0",
            "    private var _session: URLSession!",
            "    var session: URLSession {",
            "        get { return _session }",
            "        set {",
            "            _session = newValue",
            "            if _doneInit { sessionSetCallCount += 1 }",
            "        }",
            "    }",
        ]
        .join("\n");
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_closure_property_backing_is_parenthesized() {
        let rendered = render("onChange", "(Int) -> Void", false, &HashMap::new());
        assert!(rendered.contains("private var _onChange: ((Int) -> Void)!"));
    }

    #[test]
    fn test_type_keys_supply_defaults() {
        let mut keys = HashMap::new();
        keys.insert("Api".to_string(), "ApiMock()".to_string());
        let rendered = render("api", "Api", false, &keys);
        assert!(rendered.contains("var api: Api = ApiMock() { didSet"));
    }
}
