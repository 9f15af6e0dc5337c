use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use strata_section::Section;
use strata_types::{Node, PatchCodec, DEFAULT_ABSENT_TOKEN};

/// Store layout loaded from TOML.
///
/// ```toml
/// absent_token = "$absent"
///
/// [[sections]]
/// path = "section1"
/// [sections.defaults]
/// a1 = "x"
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// String that marks a key for removal in JSON patches.
    pub absent_token: String,
    pub sections: Vec<SectionConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            absent_token: DEFAULT_ABSENT_TOKEN.to_string(),
            sections: Vec::new(),
        }
    }
}

/// One section: its path and default value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectionConfig {
    pub path: String,
    #[serde(default)]
    pub defaults: toml::Table,
}

impl StoreConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.absent_token.is_empty() {
            bail!("absent_token must not be empty");
        }
        let mut seen = BTreeSet::new();
        for section in &self.sections {
            if !seen.insert(section.path.as_str()) {
                bail!("section {:?} is declared more than once", section.path);
            }
        }
        Ok(())
    }

    pub fn codec(&self) -> PatchCodec {
        PatchCodec::new(self.absent_token.clone())
    }

    /// Build every declared section.
    pub fn build_sections(&self) -> anyhow::Result<Vec<Section>> {
        self.sections.iter().map(SectionConfig::build).collect()
    }
}

impl SectionConfig {
    pub fn default_node(&self) -> anyhow::Result<Node> {
        let value = serde_json::to_value(&self.defaults)
            .with_context(|| format!("converting defaults of section {:?}", self.path))?;
        Ok(Node::from(value))
    }

    pub fn build(&self) -> anyhow::Result<Section> {
        Ok(Section::with_default(self.path.clone(), self.default_node()?)?)
    }
}
