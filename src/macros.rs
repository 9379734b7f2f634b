use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::ast::KeyValuePair;
use crate::definitions;
use crate::error::Result;

const DDOC_SKELETON: &str = r#"<html><head>
<META http-equiv="content-type" content="text/html; charset=utf-8">
<title>$(TITLE)</title>
</head><body>
<h1>$(TITLE)</h1>
$(BODY)
<hr>$(SMALL Page generated by $(LINK2 https://dlang.org/spec/ddoc.html, Ddoc). $(COPYRIGHT))
</body></html>"#;

/// Macros every document can use. Their output is part of the compatibility
/// surface and must not change.
const BUILTIN_MACROS: &[(&str, &str)] = &[
    ("B", "<b>$0</b>"),
    ("I", "<i>$0</i>"),
    ("U", "<u>$0</u>"),
    ("P", "<p>$0</p>"),
    ("DL", "<dl>$0</dl>"),
    ("DT", "<dt>$0</dt>"),
    ("DD", "<dd>$0</dd>"),
    ("TABLE", "<table>$0</table>"),
    ("TR", "<tr>$0</tr>"),
    ("TH", "<th>$0</th>"),
    ("TD", "<td>$0</td>"),
    ("OL", "<ol>$0</ol>"),
    ("UL", "<ul>$0</ul>"),
    ("LI", "<li>$0</li>"),
    ("BIG", "<big>$0</big>"),
    ("SMALL", "<small>$0</small>"),
    ("BR", "<br>"),
    ("LINK", "<a href=\"$0\">$0</a>"),
    ("LINK2", "<a href=\"$1\">$+</a>"),
    ("LPAREN", "("),
    ("RPAREN", ")"),
    ("DOLLAR", "$"),
    ("BACKTICK", "`"),
    ("DEPRECATED", "$0"),
    ("RED", "<font color=red>$0</font>"),
    ("BLUE", "<font color=blue>$0</font>"),
    ("GREEN", "<font color=green>$0</font>"),
    ("YELLOW", "<font color=yellow>$0</font>"),
    ("BLACK", "<font color=black>$0</font>"),
    ("WHITE", "<font color=white>$0</font>"),
    ("D_CODE", "<pre class=\"d_code\">$0</pre>"),
    (
        "D_INLINECODE",
        "<pre style=\"display:inline;\" class=\"d_inline_code\">$0</pre>",
    ),
    ("D_COMMENT", "$(GREEN $0)"),
    ("D_STRING", "$(RED $0)"),
    ("D_KEYWORD", "$(BLUE $0)"),
    ("D_PSYMBOL", "$(U $0)"),
    ("D_PARAM", "$(I $0)"),
    ("DDOC", DDOC_SKELETON),
    ("DDOC_BACKQUOTED", "$(D_INLINECODE $0)"),
    ("DDOC_COMMENT", "<!-- $0 -->"),
    ("DDOC_DECL", "$(DT $(BIG $0))"),
    ("DDOC_DECL_DD", "$(DD $0)"),
    ("DDOC_DITTO", "$(BR)$0"),
    ("DDOC_SECTIONS", "$0"),
    ("DDOC_SUMMARY", "$0$(BR)$(BR)"),
    ("DDOC_DESCRIPTION", "$0$(BR)$(BR)"),
    ("DDOC_AUTHORS", "$(B Authors:)$(BR)\n$0$(BR)$(BR)"),
    ("DDOC_BUGS", "$(RED BUGS:)$(BR)\n$0$(BR)$(BR)"),
    ("DDOC_COPYRIGHT", "$(B Copyright:)$(BR)\n$0$(BR)$(BR)"),
    ("DDOC_DATE", "$(B Date:)$(BR)\n$0$(BR)$(BR)"),
    ("DDOC_DEPRECATED", "$(RED Deprecated:)$(BR)\n$0$(BR)$(BR)"),
    ("DDOC_EXAMPLES", "$(B Examples:)$(BR)\n$0$(BR)$(BR)"),
    ("DDOC_HISTORY", "$(B History:)$(BR)\n$0$(BR)$(BR)"),
    ("DDOC_LICENSE", "$(B License:)$(BR)\n$0$(BR)$(BR)"),
    ("DDOC_RETURNS", "$(B Returns:)$(BR)\n$0$(BR)$(BR)"),
    ("DDOC_SEE_ALSO", "$(B See Also:)$(BR)\n$0$(BR)$(BR)"),
    ("DDOC_STANDARDS", "$(B Standards:)$(BR)\n$0$(BR)$(BR)"),
    ("DDOC_THROWS", "$(B Throws:)$(BR)\n$0$(BR)$(BR)"),
    ("DDOC_VERSION", "$(B Version:)$(BR)\n$0$(BR)$(BR)"),
    ("DDOC_SECTION_H", "$(B $0)$(BR)\n"),
    ("DDOC_SECTION", "$0$(BR)$(BR)"),
    ("DDOC_MEMBERS", "$(DL $0)"),
    ("DDOC_MODULE_MEMBERS", "$(DDOC_MEMBERS $0)"),
    ("DDOC_CLASS_MEMBERS", "$(DDOC_MEMBERS $0)"),
    ("DDOC_STRUCT_MEMBERS", "$(DDOC_MEMBERS $0)"),
    ("DDOC_ENUM_MEMBERS", "$(DDOC_MEMBERS $0)"),
    ("DDOC_TEMPLATE_MEMBERS", "$(DDOC_MEMBERS $0)"),
    ("DDOC_ENUM_BASETYPE", "$0"),
    ("DDOC_PARAMS", "$(B Params:)$(BR)\n$(TABLE $0)$(BR)"),
    ("DDOC_PARAM_ROW", "$(TR $0)"),
    ("DDOC_PARAM_ID", "$(TD $0)"),
    ("DDOC_PARAM_DESC", "$(TD $0)"),
    ("DDOC_BLANKLINE", "$(BR)$(BR)"),
    ("DDOC_ANCHOR", "<a name=\"$1\"></a>"),
    ("DDOC_PSYMBOL", "$(U $0)"),
    ("DDOC_PSUPER_SYMBOL", "$(U $0)"),
    ("DDOC_KEYWORD", "$(B $0)"),
    ("DDOC_PARAM", "$(I $0)"),
];

static BUILTINS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| BUILTIN_MACROS.iter().copied().collect());

/// The process-wide built-in macro table
pub fn builtin_macros() -> &'static HashMap<&'static str, &'static str> {
    &BUILTINS
}

/// Resolve `name` against the overrides first, then the built-ins
pub fn lookup<'a>(
    name: &str,
    overrides: &'a HashMap<String, String>,
    builtin: &'a HashMap<&'static str, &'static str>,
) -> Option<&'a str> {
    overrides
        .get(name)
        .map(String::as_str)
        .or_else(|| builtin.get(name).copied())
}

/// Caller-supplied macros that take precedence over the built-ins.
///
/// Defining a name as the empty string disables the built-in of that name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MacroRegistry(HashMap<String, String>);

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load macro definitions from definition-file text
    pub fn load(&mut self, source: &str) -> Result<()> {
        let pairs = definitions::parse_source(Path::new("<input>"), source)?;
        self.extend(pairs);
        Ok(())
    }

    /// Load macro definitions from a file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.0.extend(definitions::parse_file(path)?);
        Ok(())
    }

    /// Load several definition files, later files winning
    pub fn load_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<()> {
        self.0.extend(definitions::parse_files(paths)?);
        Ok(())
    }

    pub fn extend<'a>(&mut self, pairs: impl IntoIterator<Item = KeyValuePair<'a>>) {
        for pair in pairs {
            self.define(pair.name, pair.value);
        }
    }

    /// Register an override
    pub fn define(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.0.insert(name.into(), template.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Get an override by name, ignoring the built-ins
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Check if a macro is overridden
    pub fn is_defined(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn overrides(&self) -> &HashMap<String, String> {
        &self.0
    }

    /// Resolve a macro against the overrides and then the built-ins
    pub fn lookup(&self, name: &str) -> Option<&str> {
        lookup(name, &self.0, builtin_macros())
    }
}

impl From<HashMap<String, String>> for MacroRegistry {
    fn from(overrides: HashMap<String, String>) -> Self {
        Self(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_compatibility_strings() {
        let builtin = builtin_macros();
        assert_eq!(builtin["B"], "<b>$0</b>");
        assert_eq!(builtin["LPAREN"], "(");
        assert_eq!(builtin["RPAREN"], ")");
        assert_eq!(builtin["DOLLAR"], "$");
        assert_eq!(builtin["BACKTICK"], "`");
        assert_eq!(builtin.len(), BUILTIN_MACROS.len());
    }

    #[test]
    fn test_lookup_precedence() {
        let mut registry = MacroRegistry::new();
        assert_eq!(registry.lookup("B"), Some("<b>$0</b>"));
        assert_eq!(registry.lookup("NOPE"), None);

        registry.define("B", "**$0**");
        assert_eq!(registry.lookup("B"), Some("**$0**"));

        registry.define("B", "");
        assert_eq!(registry.lookup("B"), Some(""));
        assert!(registry.is_defined("B"));

        registry.remove("B");
        assert_eq!(registry.lookup("B"), Some("<b>$0</b>"));
    }

    #[test]
    fn test_registry_from_overrides() {
        let overrides = HashMap::from([("B".to_string(), String::new())]);
        let registry = MacroRegistry::from(overrides);
        assert_eq!(registry.lookup("B"), Some(""));
        assert_eq!(registry.lookup("I"), Some("<i>$0</i>"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = MacroRegistry::new();
        assert_eq!(registry.lookup("b"), None);
    }

    #[test]
    fn test_load_definitions() {
        let mut registry = MacroRegistry::new();
        registry.load("TITLE = My Page\nEMPH = <em>$0</em>").unwrap();
        assert_eq!(registry.get("TITLE"), Some("My Page"));
        assert_eq!(registry.lookup("EMPH"), Some("<em>$0</em>"));
    }
}
