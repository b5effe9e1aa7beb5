//! Syntax tokens for the supported diagram dialects.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Diagram markup dialect
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Mermaid erDiagram
    #[default]
    Mermaid,
    /// PlantUML entity diagram
    #[serde(alias = "uml", alias = "puml")]
    PlantUml,
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mermaid" | "mmd" => Ok(Dialect::Mermaid),
            "plantuml" | "uml" | "puml" => Ok(Dialect::PlantUml),
            _ => Err(format!(
                "Unknown format: {}. Valid options: mermaid, plantuml",
                s
            )),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Mermaid => write!(f, "mermaid"),
            Dialect::PlantUml => write!(f, "plantuml"),
        }
    }
}

impl Dialect {
    /// File extension a saved diagram must carry
    pub fn extension(self) -> &'static str {
        match self {
            Dialect::Mermaid => "mmd",
            Dialect::PlantUml => "puml",
        }
    }

    /// Detect dialect from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mmd" | "mermaid" => Some(Dialect::Mermaid),
            "puml" | "plantuml" => Some(Dialect::PlantUml),
            _ => None,
        }
    }

    /// Name used in user-facing messages
    pub fn label(self) -> &'static str {
        match self {
            Dialect::Mermaid => "Mermaid diagram",
            Dialect::PlantUml => "PlantUML diagram",
        }
    }

    /// Line comment prefix
    pub(crate) fn comment(self) -> &'static str {
        match self {
            Dialect::Mermaid => "%%",
            Dialect::PlantUml => "'",
        }
    }

    /// Indentation of top-level statements
    pub(crate) fn indent(self) -> &'static str {
        match self {
            Dialect::Mermaid => "    ",
            Dialect::PlantUml => "",
        }
    }

    /// Indentation of attribute lines inside an entity block
    pub(crate) fn attribute_indent(self) -> &'static str {
        match self {
            Dialect::Mermaid => "        ",
            Dialect::PlantUml => "  ",
        }
    }

    /// Lines opening the document, after sanitized title text.
    ///
    /// The Mermaid title is a single-quoted YAML scalar so `:` and `#` in
    /// server or database names stay literal.
    pub(crate) fn header(self, title: &str) -> Vec<String> {
        match self {
            Dialect::Mermaid => vec![
                "---".to_string(),
                format!("title: '{}'", title.replace('\'', "''")),
                "---".to_string(),
                "erDiagram".to_string(),
            ],
            Dialect::PlantUml => vec![
                "@startuml".to_string(),
                format!("title {}", title),
                "hide circle".to_string(),
                "skinparam linetype ortho".to_string(),
            ],
        }
    }

    /// Line closing the document, if the dialect needs one
    pub(crate) fn footer(self) -> Option<&'static str> {
        match self {
            Dialect::Mermaid => None,
            Dialect::PlantUml => Some("@enduml"),
        }
    }

    /// Line opening an entity block
    pub(crate) fn open_entity(self, id: &str, label: &str) -> String {
        match self {
            Dialect::Mermaid => format!("{}{} {{", self.indent(), id),
            Dialect::PlantUml => format!("entity \"{}\" as {} {{", label, id),
        }
    }

    pub(crate) fn close_entity(self) -> String {
        format!("{}}}", self.indent())
    }

    /// Type token rendered in place of the real type in compact mode
    pub(crate) fn compact_type(self) -> Option<&'static str> {
        match self {
            Dialect::Mermaid => Some("_"),
            Dialect::PlantUml => None,
        }
    }

    /// Turn a formatted SQL type into this dialect's type token
    pub(crate) fn type_token(self, formatted: &str) -> String {
        match self {
            Dialect::Mermaid => formatted
                .chars()
                .filter(|c| *c != ')')
                .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
                .collect(),
            Dialect::PlantUml => formatted.to_string(),
        }
    }

    /// One attribute line; `type_token` is `None` when the dialect has no
    /// placeholder for compact mode
    pub(crate) fn attribute(
        self,
        type_token: Option<&str>,
        name: &str,
        key_marker: &str,
        mandatory: bool,
    ) -> String {
        let mut line = String::from(self.attribute_indent());
        match self {
            Dialect::Mermaid => {
                line.push_str(type_token.unwrap_or(""));
                line.push(' ');
                line.push_str(name);
                if !key_marker.is_empty() {
                    line.push(' ');
                    line.push_str(key_marker);
                }
            }
            Dialect::PlantUml => {
                if mandatory {
                    line.push_str("* ");
                }
                line.push_str(name);
                if let Some(t) = type_token {
                    line.push_str(" : ");
                    line.push_str(t);
                }
                if !key_marker.is_empty() {
                    line.push_str(&format!(" <<{}>>", key_marker));
                }
            }
        }
        line
    }

    /// One relationship line between two entity ids
    pub(crate) fn relationship(self, parent: &str, markers: &str, child: &str, label: &str) -> String {
        match self {
            Dialect::Mermaid => format!(
                "{}{} {} {} : \"{}\"",
                self.indent(),
                parent,
                markers,
                child,
                label
            ),
            Dialect::PlantUml => format!("{} {} {} : {}", parent, markers, child, label),
        }
    }

    pub(crate) fn comment_line(self, text: &str) -> String {
        format!("{}{} {}", self.indent(), self.comment(), text)
    }
}
