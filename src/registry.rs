use std::collections::HashMap;
use std::error::Error;

use serde_json::Value;

use crate::component::Component;
use crate::context::ContextHandle;
use crate::factory::Factory;
use crate::layout::{self, Layout, XmlLayout};

pub type Config = Value;

/// Maps component type names to their factories.
///
/// The registry consumes already-parsed configuration values; reading and
/// parsing configuration files is somebody else's job.
pub struct Registry {
    layouts: HashMap<&'static str, Box<dyn Factory<Item = dyn Layout>>>,
}

impl Registry {
    pub fn new() -> Registry {
        let mut layouts: HashMap<&'static str, Box<dyn Factory<Item = dyn Layout>>> =
            HashMap::new();
        layouts.insert(XmlLayoutFactory::ty(), Box::new(XmlLayoutFactory));

        Registry { layouts }
    }

    /// Constructs a layout owned by the given context from its config.
    ///
    /// Configuration errors surface here, once, never per formatted event.
    pub fn layout(
        &self,
        cfg: &Config,
        owner: &ContextHandle,
    ) -> Result<Box<dyn Layout>, Box<dyn Error>> {
        let ty = cfg
            .get("type")
            .ok_or(r#"field "type" is required"#)?
            .as_str()
            .ok_or(r#"field "type" must be a string"#)?;

        self.layouts
            .get(ty)
            .ok_or_else(|| format!("layout with type \"{}\" not found", ty))?
            .from(cfg, owner)
    }
}

impl Default for Registry {
    fn default() -> Registry {
        Registry::new()
    }
}

/// Reads an optional string field, failing on a non-string value.
fn optional_str<'a>(cfg: &'a Config, field: &str) -> Result<Option<&'a str>, Box<dyn Error>> {
    match cfg.get(field) {
        None => Ok(None),
        Some(value) => match value.as_str() {
            Some(value) => Ok(Some(value)),
            None => Err(layout::Error::Config(
                format!("field \"{}\" must be a string", field),
            )
            .into()),
        },
    }
}

pub struct XmlLayoutFactory;

impl Factory for XmlLayoutFactory {
    type Item = dyn Layout;

    fn ty() -> &'static str {
        "xml"
    }

    fn from(
        &self,
        cfg: &Config,
        owner: &ContextHandle,
    ) -> Result<Box<dyn Layout>, Box<dyn Error>> {
        let mut layout = XmlLayout::new(owner);

        if let Some(name) = optional_str(cfg, "name")? {
            layout.set_name(name);
        }
        if let Some(header) = optional_str(cfg, "header")? {
            layout.set_header(header);
        }
        if let Some(footer) = optional_str(cfg, "footer")? {
            layout.set_footer(footer);
        }

        layout.activate_options()?;

        Ok(Box::new(layout))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Registry;
    use crate::component::Component;
    use crate::context::Context;
    use crate::layout::Layout;

    #[test]
    fn builds_xml_layout_from_config() {
        let context = Context::new();
        let registry = Registry::new();

        let cfg = json!({
            "type": "xml",
            "name": "wire",
            "header": "<log4j:eventSet>",
            "footer": "</log4j:eventSet>",
        });
        let layout = registry.layout(&cfg, &context.handle()).unwrap();

        assert_eq!("text/xml", layout.content_type());
        assert_eq!("wire", layout.name());
        assert_eq!("<log4j:eventSet>", layout.header());
        assert_eq!("</log4j:eventSet>", layout.footer());
    }

    #[test]
    fn fails_without_type() {
        let context = Context::new();
        let registry = Registry::new();

        assert!(registry.layout(&json!({}), &context.handle()).is_err());
    }

    #[test]
    fn fails_on_unknown_type() {
        let context = Context::new();
        let registry = Registry::new();

        let cfg = json!({"type": "pattern"});

        assert!(registry.layout(&cfg, &context.handle()).is_err());
    }

    #[test]
    fn fails_on_ill_typed_field() {
        let context = Context::new();
        let registry = Registry::new();

        let cfg = json!({"type": "xml", "header": 42});

        assert!(registry.layout(&cfg, &context.handle()).is_err());
    }
}
