use std::path::Path;

use lofty::file::TaggedFileExt;
use lofty::tag::ItemKey;

use crate::error::TagError;

/// Reads the lyrics field embedded in an audio file's tags.
pub trait AudioTagReader {
    /// `Ok(None)` when the file has no tag or no lyrics field.
    fn read_lyrics(&self, path: &Path) -> Result<Option<String>, TagError>;
}

impl<T: AudioTagReader + ?Sized> AudioTagReader for &T {
    fn read_lyrics(&self, path: &Path) -> Result<Option<String>, TagError> {
        (**self).read_lyrics(path)
    }
}

/// Tag reader backed by `lofty`, using the primary tag (or the first one).
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagReader;

impl AudioTagReader for LoftyTagReader {
    fn read_lyrics(&self, path: &Path) -> Result<Option<String>, TagError> {
        let tagged = lofty::read_from_path(path)?;
        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            return Ok(None);
        };
        Ok(tag.get_string(ItemKey::Lyrics).map(str::to_string))
    }
}
