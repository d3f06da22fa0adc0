//! # Component Code Generator
//!
//! Renders one source file per component through a Tera template.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tera::{Context, Tera, Value};

use crate::error::{GenError, Result};
use crate::language::TargetLanguage;
use crate::model::ComponentInfo;

const JAVA_COMPONENT_TEMPLATE: &str = include_str!("../../templates/component_type.java.tera");

/// A compiled component template
pub struct ComponentTemplate {
    tera: Tera,
}

impl ComponentTemplate {
    const NAME: &'static str = "component_type";

    /// The template shipped for `language`
    pub fn builtin(language: TargetLanguage) -> Result<Self> {
        match language {
            TargetLanguage::Java => Self::from_source(JAVA_COMPONENT_TEMPLATE),
        }
    }

    /// Compile `source`; templates may use the `java_string` filter
    pub fn from_source(source: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.register_filter("java_string", java_string);
        tera.add_raw_template(Self::NAME, source)?;
        Ok(Self { tera })
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = tokio::fs::read_to_string(path).await?;
        Self::from_source(&source)
    }
}

/// Escape a value for use inside a Java string literal
fn java_string(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    Ok(Value::String(escaped))
}

/// Render a single component
///
/// Pure: the same component and template always produce the same text.
pub fn emit(component: &ComponentInfo, template: &ComponentTemplate) -> Result<String> {
    let context = Context::from_serialize(component)?;
    Ok(template.tera.render(ComponentTemplate::NAME, &context)?)
}

/// Generates the full file set for a list of components
pub struct ComponentCodeGenerator<'a> {
    components: &'a [ComponentInfo],
    template: &'a ComponentTemplate,
    language: TargetLanguage,
}

impl<'a> ComponentCodeGenerator<'a> {
    pub fn new(
        components: &'a [ComponentInfo],
        template: &'a ComponentTemplate,
        language: TargetLanguage,
    ) -> Self {
        Self {
            components,
            template,
            language,
        }
    }

    /// Render every component, keyed by output file name
    pub fn generate_files(&self) -> Result<BTreeMap<String, String>> {
        let mut files = BTreeMap::new();

        for component in self.components {
            let file_name = self.language.file_name(&component.name);
            let code = emit(component, self.template)?;
            tracing::debug!("[CODEGEN] Rendered {} ({} bytes)", file_name, code.len());

            if files.insert(file_name.clone(), code).is_some() {
                return Err(GenError::CodeGeneration(format!(
                    "Two components render to the same file: {}",
                    file_name
                )));
            }
        }

        Ok(files)
    }
}
