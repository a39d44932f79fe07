//! Project discovery and configuration

use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub const CONFIG_FILE: &str = "branchcount.toml";

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Could not find branchcount.toml in current directory or any parent")]
    ProjectNotFound,

    #[error("Failed to read branchcount.toml: {0}")]
    ConfigReadError(#[from] std::io::Error),

    #[error("Failed to parse branchcount.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Source directory {0:?} does not exist")]
    SourceDirMissing(PathBuf),
}

#[derive(Debug, Deserialize, Default)]
struct ProjectConfig {
    profile: Option<ProfileConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct ProfileConfig {
    default: Option<DefaultProfile>,
}

#[derive(Debug, Deserialize, Default)]
struct DefaultProfile {
    src: Option<String>,
    extensions: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
}

/// Where to look for IR files and which ones to take
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub src_dir: PathBuf,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
}

impl Project {
    /// Discover a project by searching for branchcount.toml from the current
    /// directory upward
    pub fn discover() -> Result<Self, ProjectError> {
        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let root = Self::find_project_root(start)?;
        let config_content = fs::read_to_string(root.join(CONFIG_FILE))?;
        Self::from_config(root, &config_content)
    }

    /// Build a project rooted at `root` from the contents of its config file
    pub fn from_config(root: PathBuf, config_content: &str) -> Result<Self, ProjectError> {
        let config: ProjectConfig = toml::from_str(config_content)?;
        let profile = config.profile.and_then(|p| p.default).unwrap_or_default();

        let src_dir = root.join(profile.src.unwrap_or_else(|| "ir".to_string()));
        let extensions = profile
            .extensions
            .unwrap_or_else(|| vec!["ll".to_string()])
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();

        debug!("project root {:?}, sources in {:?}", root, src_dir);

        Ok(Self {
            root,
            src_dir,
            extensions,
            exclude: profile.exclude.unwrap_or_default(),
        })
    }

    /// A project with default settings reading from `dir` directly
    pub fn for_directory(dir: &Path) -> Self {
        Self {
            root: dir.to_path_buf(),
            src_dir: dir.to_path_buf(),
            extensions: vec!["ll".to_string()],
            exclude: Vec::new(),
        }
    }

    fn find_project_root(start: &Path) -> Result<PathBuf, ProjectError> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(CONFIG_FILE).exists() {
                return Ok(current);
            }

            if !current.pop() {
                return Err(ProjectError::ProjectNotFound);
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    /// All IR files under the source directory, sorted by path
    pub fn find_ir_files(&self) -> Result<Vec<PathBuf>, ProjectError> {
        if !self.src_dir.is_dir() {
            return Err(ProjectError::SourceDirMissing(self.src_dir.clone()));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.src_dir)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e.path()))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && self.has_ir_extension(e.path()))
            .map(|e| e.into_path())
            .collect();

        files.sort();
        Ok(files)
    }

    fn has_ir_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|want| want == ext))
            .unwrap_or(false)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.src_dir).unwrap_or(path);
        relative.components().any(|c| {
            c.as_os_str()
                .to_str()
                .map(|name| self.exclude.iter().any(|ex| ex == name))
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_defaults() {
        let project = Project::from_config(PathBuf::from("/p"), "").unwrap();
        assert_eq!(project.src_dir(), Path::new("/p/ir"));
        assert_eq!(project.extensions, vec!["ll".to_string()]);
        assert!(project.exclude.is_empty());
    }

    #[test]
    fn test_profile_settings() {
        let config = r#"
[profile.default]
src = "build/ir"
extensions = [".ll", "ir"]
exclude = ["generated"]
"#;
        let project = Project::from_config(PathBuf::from("/p"), config).unwrap();
        assert_eq!(project.src_dir(), Path::new("/p/build/ir"));
        assert_eq!(project.extensions, vec!["ll".to_string(), "ir".to_string()]);
        assert_eq!(project.exclude, vec!["generated".to_string()]);
    }

    #[test]
    fn test_bad_config() {
        let err = Project::from_config(PathBuf::from("/p"), "[profile.default]\nsrc = 3\n");
        assert!(matches!(err, Err(ProjectError::ConfigParseError(_))));
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[profile.default]\nsrc = \"out\"\n").unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let project = Project::discover_from(&nested).unwrap();
        assert_eq!(project.root(), dir.path());
        assert_eq!(project.src_dir(), dir.path().join("out"));
    }

    #[test]
    fn test_find_ir_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "ir/b.ll");
        touch(dir.path(), "ir/a.ll");
        touch(dir.path(), "ir/nested/c.ll");
        touch(dir.path(), "ir/notes.txt");
        touch(dir.path(), "ir/generated/skip.ll");

        let config = "[profile.default]\nexclude = [\"generated\"]\n";
        let project = Project::from_config(dir.path().to_path_buf(), config).unwrap();
        let files = project.find_ir_files().unwrap();

        let rel: Vec<PathBuf> = files
            .iter()
            .map(|f| f.strip_prefix(project.src_dir()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("a.ll"),
                PathBuf::from("b.ll"),
                PathBuf::from("nested/c.ll"),
            ]
        );
    }

    #[test]
    fn test_missing_source_dir() {
        let dir = TempDir::new().unwrap();
        let project = Project::for_directory(&dir.path().join("nope"));
        assert!(matches!(
            project.find_ir_files(),
            Err(ProjectError::SourceDirMissing(_))
        ));
    }
}
