//! Shared fixtures for integration tests.
//!
//! `ARTIFACT` mirrors a real generated `searchindex.js`: loader-call wrapper,
//! bare object keys from the minifier, bare-integer document references, a
//! pruned term with an empty posting list, and section-number markup in
//! titles.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ARTIFACT: &str = r#"Search.setIndex({docnames:["content/course/running-the-course","content/infrastructure/setup-aws-cloud-architecture","content/preface"],envversion:{"sphinx.domains.c":1,"sphinx.domains.std":1,sphinx:56},filenames:["content/course/running-the-course.md","content/infrastructure/setup-aws-cloud-architecture.md","content/preface.md"],objects:{},objnames:{},objtypes:{},terms:{AWS:[],ansibl:1,cloud:1,cours:[0,2],instal:0,"new":1,run:[0,1],rudaux:2,student:[0,1,2],width:[]},titles:["<span class=\"section-number\">1. </span>Running the course","<span class=\"section-number\">2. </span>Set up AWS cloud architecture","Welcome to Rudaux!"],titleterms:{AWS:1,architectur:1,cours:0,run:0,rudaux:2,welcom:2}})"#;

/// Terms that carry at least one posting in [`ARTIFACT`] after merging.
#[allow(dead_code)] // Used in lookup_test.rs
pub const INDEXED_TERMS: &[&str] = &[
    "aws",
    "ansibl",
    "architectur",
    "cloud",
    "cours",
    "instal",
    "new",
    "run",
    "rudaux",
    "student",
    "welcom",
];

/// A temporary directory holding an artifact file.
pub struct ArtifactDir {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl ArtifactDir {
    /// Writes `content` as `searchindex.js` in a fresh temp directory.
    pub fn with_content(content: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        std::fs::write(root.join("searchindex.js"), content)
            .expect("Failed to write artifact fixture");
        Self { _temp: temp, root }
    }

    /// Writes the standard [`ARTIFACT`] fixture.
    pub fn standard() -> Self {
        Self::with_content(ARTIFACT)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.root.join("searchindex.js")
    }

    pub fn cache_path(&self) -> PathBuf {
        self.root.join("searchindex.cache")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Overwrites the artifact in place, as a regenerated site would.
    pub fn overwrite_artifact(&self, content: &str) {
        std::fs::write(self.artifact_path(), content).expect("Failed to overwrite artifact");
    }
}
