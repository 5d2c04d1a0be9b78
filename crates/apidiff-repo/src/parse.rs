use anyhow::Context;
use apidiff_domain::model::ModuleModel;
use serde::{Deserialize, Serialize};

/// Identity of a package snapshot, read from `package.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMeta {
    pub id: String,
    pub version: String,
}

pub fn parse_package_meta(text: &str) -> anyhow::Result<PackageMeta> {
    let meta: PackageMeta = serde_json::from_str(text).context("parse package metadata")?;
    if meta.id.trim().is_empty() {
        anyhow::bail!("package metadata has an empty id");
    }
    Ok(meta)
}

/// Parse one module description. `name` is the module key derived from the file name and
/// replaces an empty `name` in the document.
pub fn parse_module_json(name: &str, text: &str) -> anyhow::Result<ModuleModel> {
    let mut model: ModuleModel = serde_json::from_str(text)
        .with_context(|| format!("parse module description {name}"))?;
    if model.name.is_empty() {
        model.name = name.to_string();
    }
    model
        .validate()
        .with_context(|| format!("invalid module description {name}"))?;
    Ok(model)
}
