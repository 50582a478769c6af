//! Candidate URLs produced by the enumerators

use std::fmt;
use url::Url;

/// One preview page to visit
///
/// The checkpoint key is the site path plus optional `#fragment`, without the
/// service root or the re-render flag. Catalog candidates also remember their
/// un-referenced form (`/u/<owner>/<repo>#<ingredient>`), which counts as a
/// skip key as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateUrl {
    path: String,
    fragment: Option<String>,
    key: String,
    unreferenced: Option<String>,
}

impl CandidateUrl {
    /// Builds a candidate from a site path and optional fragment
    pub fn new(path: impl Into<String>, fragment: Option<String>) -> Self {
        let path = path.into();
        let fragment = fragment.filter(|f| !f.is_empty());
        let key = match &fragment {
            Some(fragment) => format!("{}#{}", path, fragment),
            None => path.clone(),
        };

        Self {
            path,
            fragment,
            key,
            unreferenced: None,
        }
    }

    /// Splits a scraped link such as `/u/org/repo/v1#gen` at its first `#`
    pub fn parse(link: &str) -> Self {
        match link.split_once('#') {
            Some((path, fragment)) => Self::new(path, Some(fragment.to_string())),
            None => Self::new(link, None),
        }
    }

    /// Builds the candidate for one ingredient of a catalog entry at `reference`
    ///
    /// `full_name` is the `<owner>/<repo>` pair reported by the catalog.
    pub fn from_catalog(full_name: &str, reference: &str, ingredient: &str) -> Self {
        let mut candidate = Self::new(
            format!("/u/{}/{}", full_name, reference),
            Some(ingredient.to_string()),
        );
        candidate.unreferenced = Some(format!("/u/{}#{}", full_name, ingredient));
        candidate
    }

    /// The line written to a checkpoint file for this candidate
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Every key whose presence in a checkpoint file means this candidate is done
    pub fn skip_keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.key.as_str()).chain(self.unreferenced.as_deref())
    }

    /// Absolute URL of the page on the preview service
    ///
    /// The re-render flag goes into the query string, ahead of the fragment.
    pub fn preview_url(&self, root: &Url, rerender: bool) -> Result<Url, url::ParseError> {
        let mut url = root.join(&self.path)?;
        if rerender {
            url.query_pairs_mut().append_pair("rerender", "1");
        }
        url.set_fragment(self.fragment.as_deref());
        Ok(url)
    }
}

impl fmt::Display for CandidateUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
