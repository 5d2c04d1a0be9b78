use anyhow::Context;
use apidiff_types::ids;
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

/// Platform directory names under `<root>/lib`, sorted.
///
/// A snapshot without a `lib` directory has no platforms.
pub fn discover_platforms(root: &Utf8Path) -> anyhow::Result<Vec<String>> {
    let lib = root.join(ids::PLATFORMS_DIR);
    if !lib.is_dir() {
        return Ok(Vec::new());
    }
    list_entries(&lib, EntryKind::Dir)
}

/// Module names (file name without the `.json` suffix) in a platform directory, sorted.
pub fn discover_modules(platform_dir: &Utf8Path) -> anyhow::Result<Vec<String>> {
    let suffix = format!(".{}", ids::MODULE_EXTENSION);
    let names = list_entries(platform_dir, EntryKind::File)?
        .into_iter()
        .filter_map(|file| file.strip_suffix(&suffix).map(str::to_string))
        .filter(|name| !name.is_empty())
        .collect();
    Ok(names)
}

/// Path of the description file for `module` in `platform_dir`.
pub fn module_path(platform_dir: &Utf8Path, module: &str) -> Utf8PathBuf {
    platform_dir.join(format!("{module}.{}", ids::MODULE_EXTENSION))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
}

fn list_entries(dir: &Utf8Path, kind: EntryKind) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("list {dir}"))?;
        let matches = match kind {
            EntryKind::Dir => entry.file_type().is_dir(),
            EntryKind::File => entry.file_type().is_file(),
        };
        if !matches {
            continue;
        }
        // Non-UTF-8 names cannot be matched against anything; skip them.
        if let Some(name) = entry.file_name().to_str() {
            out.push(name.to_string());
        }
    }

    // Stable order.
    out.sort();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn write_file(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    #[test]
    fn platforms_are_sorted_directories_only() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(&root.join("lib/netstandard2.0/A.dll.json"), "{}");
        write_file(&root.join("lib/net8.0/A.dll.json"), "{}");
        write_file(&root.join("lib/README.txt"), "not a platform");

        let platforms = discover_platforms(&root).expect("discover");
        assert_eq!(platforms, vec!["net8.0", "netstandard2.0"]);
    }

    #[test]
    fn missing_lib_directory_means_no_platforms() {
        let tmp = TempDir::new().expect("temp dir");
        let platforms = discover_platforms(&utf8_root(&tmp)).expect("discover");
        assert!(platforms.is_empty());
    }

    #[test]
    fn modules_strip_the_description_suffix() {
        let tmp = TempDir::new().expect("temp dir");
        let dir = utf8_root(&tmp).join("lib/net8.0");
        write_file(&dir.join("Acme.Core.dll.json"), "{}");
        write_file(&dir.join("Acme.Ui.dll.json"), "{}");
        write_file(&dir.join("Acme.Core.xml"), "<doc/>");
        write_file(&dir.join("nested/Deep.dll.json"), "{}");

        let modules = discover_modules(&dir).expect("discover");
        assert_eq!(modules, vec!["Acme.Core.dll", "Acme.Ui.dll"]);
        assert_eq!(
            module_path(&dir, "Acme.Core.dll"),
            dir.join("Acme.Core.dll.json")
        );
    }
}
