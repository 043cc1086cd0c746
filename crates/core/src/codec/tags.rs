//! Tag transfer between source and encoded files.

use std::path::Path;

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag, TagExt, TagType};
use tracing::debug;

use super::error::CodecError;

/// Tag keys an MP3 target accepts, mirroring the common ID3v2 frame set.
pub fn mp3_accepted_keys() -> Vec<ItemKey> {
    vec![
        ItemKey::TrackTitle,
        ItemKey::TrackArtist,
        ItemKey::AlbumTitle,
        ItemKey::AlbumArtist,
        ItemKey::TrackNumber,
        ItemKey::TrackTotal,
        ItemKey::DiscNumber,
        ItemKey::DiscTotal,
        ItemKey::Year,
        ItemKey::RecordingDate,
        ItemKey::Genre,
        ItemKey::Composer,
        ItemKey::Conductor,
        ItemKey::Lyricist,
        ItemKey::Comment,
    ]
}

/// Copies accepted tag items from `source` to `dest`.
///
/// Unknown or rejected keys are dropped silently. Returns the number of
/// items carried over. With an empty accepted set nothing is read and the
/// destination file is left untouched.
pub async fn transfer_tags(
    source: &Path,
    dest: &Path,
    accepted: Vec<ItemKey>,
) -> Result<usize, CodecError> {
    if accepted.is_empty() {
        return Ok(0);
    }

    let source = source.to_path_buf();
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let carried = copy_accepted(&source, &dest, &accepted).map_err(|detail| {
            CodecError::TagTransferFailed {
                source_path: source.clone(),
                dest_path: dest.clone(),
                detail,
            }
        })?;
        debug!(
            source = %source.display(),
            dest = %dest.display(),
            carried,
            "tags transferred"
        );
        Ok(carried)
    })
    .await
    .map_err(|e| CodecError::Io(std::io::Error::other(e)))?
}

fn copy_accepted(source: &Path, dest: &Path, accepted: &[ItemKey]) -> Result<usize, String> {
    let tagged = Probe::open(source)
        .map_err(|e| e.to_string())?
        .read()
        .map_err(|e| e.to_string())?;
    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return Ok(0);
    };

    let mut out = Tag::new(TagType::Id3v2);
    let mut carried = 0;
    for key in accepted {
        if let Some(item) = tag.get(key) {
            if out.insert(item.clone()) {
                carried += 1;
            }
        }
    }

    if carried > 0 {
        out.save_to_path(dest, WriteOptions::default())
            .map_err(|e| e.to_string())?;
    }
    Ok(carried)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_accepted_set_is_a_noop() {
        // Paths do not need to exist when nothing is accepted.
        let carried = transfer_tags(
            Path::new("/no/such/source.flac"),
            Path::new("/no/such/dest.mp3"),
            Vec::new(),
        )
        .await
        .unwrap();
        assert_eq!(carried, 0);
    }

    #[tokio::test]
    async fn test_unreadable_source_is_an_error() {
        let result = transfer_tags(
            Path::new("/no/such/source.flac"),
            Path::new("/no/such/dest.mp3"),
            mp3_accepted_keys(),
        )
        .await;
        assert!(matches!(result, Err(CodecError::TagTransferFailed { .. })));
    }

    #[test]
    fn test_accepted_keys_cover_the_basics() {
        let keys = mp3_accepted_keys();
        assert!(keys.contains(&ItemKey::TrackTitle));
        assert!(keys.contains(&ItemKey::TrackArtist));
        assert!(keys.contains(&ItemKey::AlbumTitle));
        assert!(keys.contains(&ItemKey::TrackNumber));
    }
}
