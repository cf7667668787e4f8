use {
    crate::error::{Error, Result},
    serde::{Deserialize, Serialize},
    tap::Tap,
};

/// Nesting ceiling applied on top of [`Options::max_depth`], which may be unlimited.
pub const MAX_NESTING: usize = 128;

pub const DEFAULT_DELIMITER: &str = ".";

/// What unflattening does when a leaf meets another contribution at the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conflict {
    /// A leaf shadows everything beneath its path; of two leaves on one path the first wins.
    #[default]
    KeepLeaf,
    /// Report [`Error::MergeConflict`].
    Fail,
}

/// Settings shared by [`flatten`](crate::flatten) and [`unflatten`](crate::unflatten).
///
/// `max_depth == 0` means unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub delimiter: String,
    pub safe: bool,
    pub max_depth: usize,
    pub on_conflict: Conflict,
    pub rebuild_arrays: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            safe: false,
            max_depth: 0,
            on_conflict: Conflict::default(),
            rebuild_arrays: true,
        }
    }
}

impl Options {
    pub fn with_delimiter(self, delimiter: impl Into<String>) -> Self {
        self.tap_mut(|o| o.delimiter = delimiter.into())
    }

    pub fn safe(self, safe: bool) -> Self {
        self.tap_mut(|o| o.safe = safe)
    }

    pub fn max_depth(self, max_depth: usize) -> Self {
        self.tap_mut(|o| o.max_depth = max_depth)
    }

    pub fn on_conflict(self, on_conflict: Conflict) -> Self {
        self.tap_mut(|o| o.on_conflict = on_conflict)
    }

    pub fn rebuild_arrays(self, rebuild_arrays: bool) -> Self {
        self.tap_mut(|o| o.rebuild_arrays = rebuild_arrays)
    }

    pub fn validate(&self) -> Result<&Self> {
        match self.delimiter.is_empty() {
            true => Err(Error::InvalidConfiguration("delimiter must not be empty")),
            false => Ok(self),
        }
    }

    /// Whether a container at `depth` is flattened as a single opaque leaf.
    pub(crate) fn stops_at(&self, depth: usize) -> bool {
        depth >= MAX_NESTING || (self.max_depth > 0 && depth >= self.max_depth)
    }
}
