//! Tag operations

use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::TagInfo;

impl GitRepo {
    /// Get all tags, peeled to the commit they point at
    #[instrument(skip(self))]
    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = Vec::new();

        for name in self.repo.tag_names(None)?.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            if let Ok(commit) = reference.peel_to_commit() {
                tags.push(TagInfo::new(name, commit.id().to_string()));
            }
        }

        debug!(count = tags.len(), "listed all tags");
        Ok(tags)
    }

    /// Find the highest release tag, optionally only those of `<prefix>@x.y.z` form
    #[instrument(skip(self))]
    pub fn find_latest_tag(&self, prefix: Option<&str>) -> Result<Option<TagInfo>> {
        let result = self
            .tags()?
            .into_iter()
            .filter(|t| t.is_release_of(prefix))
            .max_by(|a, b| a.version.cmp(&b.version));

        debug!(latest = ?result.as_ref().map(|t| &t.name), "found latest tag");
        Ok(result)
    }
}
