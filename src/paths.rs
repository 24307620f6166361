use std::path::{Component, Path, PathBuf};

/// Lexically normalizes a path: drops `.` segments and folds `name/..` pairs
/// without touching the filesystem. `..` directly under the root is dropped,
/// leading `..` of a relative path is kept, and an empty result becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                Some(Component::ParentDir) | Some(Component::CurDir) | None => {
                    parts.push(component);
                }
            },
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                parts.push(component);
            }
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }

    return parts.iter().collect();
}

/// Normalizes `target` and anchors it at `base` when it is relative.
pub fn resolve_against(base: &Path, target: &Path) -> PathBuf {
    let target = normalize(target);
    if target.is_absolute() {
        return target;
    }

    return normalize(&base.join(target));
}
