//! Per-day source skeleton rendered from a template directory.
//!
//! Both file paths and file contents may use `{{ name }}` placeholders.

use crate::domain::model::PuzzleId;
use crate::utils::error::{AocError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub relative: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateVars(BTreeMap<String, String>);

impl TemplateVars {
    pub fn for_puzzle(
        puzzle: PuzzleId,
        title: Option<&str>,
        src_dir: &Path,
        lib_dir: &Path,
        day_dir: &Path,
    ) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert("year".to_string(), puzzle.year.to_string());
        vars.insert("day".to_string(), puzzle.day.to_string());
        vars.insert("day_padded".to_string(), format!("{:02}", puzzle.day));
        vars.insert("title".to_string(), title.unwrap_or_default().to_string());
        vars.insert("src_dir".to_string(), slash_path(src_dir));
        vars.insert("lib_dir".to_string(), slash_path(lib_dir));
        vars.insert(
            "lib_dir_relative".to_string(),
            slash_path(&relative_path(day_dir, lib_dir)),
        );
        Self(vars)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// Replaces known placeholders; unknown ones are kept verbatim and returned.
pub fn render_str(text: &str, vars: &TemplateVars) -> (String, Vec<String>) {
    let mut unknown = Vec::new();
    let rendered = PLACEHOLDER.replace_all(text, |caps: &regex::Captures| {
        match vars.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => {
                unknown.push(caps[1].to_string());
                caps[0].to_string()
            }
        }
    });
    (rendered.into_owned(), unknown)
}

#[derive(Debug, Clone, Default)]
pub struct SkeletonTemplate {
    files: Vec<TemplateFile>,
}

impl SkeletonTemplate {
    pub fn from_files(files: Vec<TemplateFile>) -> Self {
        Self { files }
    }

    /// `Ok(None)` when the directory does not exist.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        if !dir.is_dir() {
            return Ok(None);
        }
        let mut files = Vec::new();
        collect_files(dir, dir, &mut files)?;
        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(Some(Self { files }))
    }

    pub fn files(&self) -> &[TemplateFile] {
        &self.files
    }

    /// Rendered files, relative to the day directory. A rendered path that
    /// would leave that directory is a `TemplateError`.
    pub fn render(&self, vars: &TemplateVars) -> Result<Vec<TemplateFile>> {
        self.files
            .iter()
            .map(|file| {
                let (relative, unknown_in_path) = render_str(&slash_path(&file.relative), vars);
                let (contents, unknown_in_body) = render_str(&file.contents, vars);
                for name in unknown_in_path.iter().chain(&unknown_in_body) {
                    tracing::warn!(
                        "Unknown placeholder '{{{{ {} }}}}' in template {}",
                        name,
                        file.relative.display()
                    );
                }
                let relative = PathBuf::from(relative);
                if !stays_inside(&relative) {
                    return Err(AocError::TemplateError {
                        path: file.relative.display().to_string(),
                        message: format!(
                            "rendered path '{}' escapes the day directory",
                            relative.display()
                        ),
                    });
                }
                Ok(TemplateFile { relative, contents })
            })
            .collect()
    }
}

fn stays_inside(relative: &Path) -> bool {
    relative.components().next().is_some()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<TemplateFile>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(root, &path, out)?;
            continue;
        }
        let relative = path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.clone());
        let bytes = std::fs::read(&path)?;
        let contents = String::from_utf8(bytes).map_err(|e| AocError::TemplateError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        out.push(TemplateFile { relative, contents });
    }
    Ok(())
}

/// Path that leads from `from` to `to`, both relative to the same root.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from.components().filter(|c| *c != Component::CurDir).collect();
    let to: Vec<Component> = to.components().filter(|c| *c != Component::CurDir).collect();

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut result = PathBuf::new();
    for _ in common..from.len() {
        result.push("..");
    }
    for component in &to[common..] {
        result.push(component.as_os_str());
    }
    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
