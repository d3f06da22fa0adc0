//! Target languages the generator can emit.

use serde::{Deserialize, Serialize};

/// Java reserved words plus the literals that cannot be used as identifiers
const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    #[default]
    Java,
}

impl TargetLanguage {
    /// File extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            TargetLanguage::Java => ".java",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::Java => "java",
        }
    }

    pub fn reserved_words(&self) -> &'static [&'static str] {
        match self {
            TargetLanguage::Java => JAVA_RESERVED,
        }
    }

    /// Case-sensitive keyword check
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words().contains(&name)
    }

    /// A letter followed by letters or digits, and not a reserved word
    pub fn is_legal_identifier(&self, name: &str) -> bool {
        let mut chars = name.chars();
        let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        starts_with_letter && chars.all(|c| c.is_ascii_alphanumeric()) && !self.is_reserved(name)
    }

    /// Output file name for a component
    pub fn file_name(&self, component_name: &str) -> String {
        format!("{}{}", component_name, self.extension())
    }
}
