use regex::Regex;
use std::sync::LazyLock;

static POST_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://www\.facebook\.com/([A-Za-z0-9]+)/posts/([0-9]+)$")
        .expect("post URL pattern is valid")
});

/// The two pieces of a public post URL we care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUrlMatch {
    /// Page or user handle, e.g. `barackobama`.
    pub handle: String,
    /// Numeric post suffix, e.g. `10154081443366749`.
    pub post_suffix: String,
}

impl PostUrlMatch {
    /// Match `https?://www.facebook.com/<handle>/posts/<digits>` exactly.
    /// No case folding, no trailing slash.
    pub fn parse(url: &str) -> Option<Self> {
        let captures = POST_URL.captures(url)?;
        Some(Self {
            handle: captures.get(1)?.as_str().to_string(),
            post_suffix: captures.get(2)?.as_str().to_string(),
        })
    }

    /// Graph id of the post once the owner's numeric id is known.
    pub fn composite_id(&self, user_id: &str) -> String {
        format!("{}_{}", user_id, self.post_suffix)
    }

    pub fn avatar_url(&self) -> String {
        format!("http://graph.facebook.com/{}/picture", self.handle)
    }
}
