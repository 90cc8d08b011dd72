use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the declared output an artist marks as the deliverable.
pub const PRIMARY: &str = "primary";

/// Declared outputs of a render node, keyed by output name.
///
/// Katana stores names and locations as two parallel parameter arrays. They are
/// zipped into a map once so lookups never walk indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutputs {
    locations: HashMap<String, PathBuf>,
}

impl RenderOutputs {
    /// Build from the parallel name/location arrays. When a name is declared
    /// twice the first declaration wins, extra names without a location are dropped.
    pub fn from_declared<N, L>(names: N, locations: L) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<PathBuf>,
    {
        let mut map = HashMap::new();
        for (name, location) in names.into_iter().zip(locations) {
            map.entry(name.into()).or_insert_with(|| location.into());
        }
        Self { locations: map }
    }

    pub fn insert(&mut self, name: impl Into<String>, location: impl Into<PathBuf>) {
        self.locations.insert(name.into(), location.into());
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.locations.get(name).map(PathBuf::as_path)
    }

    pub fn primary(&self) -> Option<&Path> {
        self.get(PRIMARY)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_parallel_arrays() {
        let outputs = RenderOutputs::from_declared(
            ["deep", "primary", "primary"],
            ["/out/deep.exr", "/out/beauty.exr", "/out/other.exr"],
        );
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs.primary(), Some(Path::new("/out/beauty.exr")));
        assert_eq!(outputs.get("deep"), Some(Path::new("/out/deep.exr")));
    }

    #[test]
    fn missing_primary() {
        let outputs = RenderOutputs::from_declared(["deep"], ["/out/deep.exr"]);
        assert_eq!(outputs.primary(), None);
        assert!(RenderOutputs::default().is_empty());
    }
}
