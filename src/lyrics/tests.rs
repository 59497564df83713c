use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use super::*;
use crate::config::LyricsSettings;
use crate::error::TagError;

const SYNCED: &str = "[00:01.00]First line\n[00:05.50]Second line\n";
const PLAIN: &str = "First line\nSecond line\n";

struct FakeTags {
    lyrics: Result<Option<String>, String>,
    calls: Cell<usize>,
}

impl FakeTags {
    fn none() -> Self {
        Self::with(Ok(None))
    }

    fn text(text: &str) -> Self {
        Self::with(Ok(Some(text.to_string())))
    }

    fn failing() -> Self {
        Self::with(Err("corrupt header".to_string()))
    }

    fn with(lyrics: Result<Option<String>, String>) -> Self {
        Self {
            lyrics,
            calls: Cell::new(0),
        }
    }
}

impl AudioTagReader for FakeTags {
    fn read_lyrics(&self, _path: &Path) -> Result<Option<String>, TagError> {
        self.calls.set(self.calls.get() + 1);
        self.lyrics.clone().map_err(TagError::Other)
    }
}

fn resolver(tags: FakeTags) -> LyricsResolver<FakeTags, LrcTimestamps> {
    LyricsResolver::new(tags, LrcTimestamps, &LyricsSettings::default())
}

/// File names in `dir` in the order the directory lists them.
fn listing_order(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn synchronized_embedded_tag_wins_over_sidecars() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    write(dir.path(), "track.lrc", "[00:09.00]Sidecar\n");

    let r = resolver(FakeTags::text(SYNCED));
    let lyrics = r.resolve(&audio, "Track").unwrap();

    assert_eq!(lyrics.text, SYNCED);
    assert!(lyrics.synchronized);
    assert_eq!(lyrics.source, LyricsSource::Embedded);
}

#[test]
fn synchronized_embedded_tag_needs_no_directory() {
    let audio = Path::new("/definitely/not/a/dir/track.mp3");
    let lyrics = resolver(FakeTags::text(SYNCED)).resolve(audio, "Track").unwrap();
    assert!(lyrics.synchronized);
}

#[test]
fn synchronized_sidecar_beats_plain_sidecar() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    let lrc = write(dir.path(), "track.lrc", SYNCED);
    write(dir.path(), "track.txt", PLAIN);

    let lyrics = resolver(FakeTags::none()).resolve(&audio, "Track").unwrap();

    assert_eq!(lyrics.text, SYNCED);
    assert!(lyrics.synchronized);
    assert_eq!(lyrics.source, LyricsSource::Sidecar(lrc));
}

#[test]
fn plain_sidecar_is_returned_unsynchronized() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    let txt = write(dir.path(), "track.txt", PLAIN);

    let lyrics = resolver(FakeTags::none()).resolve(&audio, "Track").unwrap();

    assert_eq!(lyrics.text, PLAIN);
    assert!(!lyrics.synchronized);
    assert_eq!(lyrics.source, LyricsSource::Sidecar(txt));
}

#[test]
fn plain_sidecar_replaces_plain_embedded_text() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    write(dir.path(), "track.txt", PLAIN);

    let lyrics = resolver(FakeTags::text("embedded words"))
        .resolve(&audio, "Track")
        .unwrap();

    assert_eq!(lyrics.text, PLAIN);
    assert!(!lyrics.synchronized);
}

#[test]
fn plain_embedded_text_is_the_last_resort() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    write(dir.path(), "unrelated.txt", PLAIN);

    let lyrics = resolver(FakeTags::text("embedded words"))
        .resolve(&audio, "Track")
        .unwrap();

    assert_eq!(lyrics.text, "embedded words");
    assert!(!lyrics.synchronized);
    assert_eq!(lyrics.source, LyricsSource::Embedded);
}

#[test]
fn missing_directory_returns_embedded_text() {
    let audio = Path::new("/definitely/not/a/dir/track.mp3");

    let lyrics = resolver(FakeTags::text("embedded words")).resolve(audio, "Track");
    assert_eq!(lyrics.map(|l| l.text), Some("embedded words".to_string()));

    assert!(resolver(FakeTags::none()).resolve(audio, "Track").is_none());
}

#[test]
fn tag_read_failure_falls_back_to_sidecars() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    write(dir.path(), "track.lrc", SYNCED);

    let tags = FakeTags::failing();
    let r = LyricsResolver::new(&tags, LrcTimestamps, &LyricsSettings::default());
    let lyrics = r.resolve(&audio, "Track").unwrap();

    assert!(lyrics.synchronized);
    assert_eq!(tags.calls.get(), 1);
}

#[test]
fn blank_embedded_and_blank_sidecars_are_ignored() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    write(dir.path(), "track.lrc", "   \n\t");

    assert!(resolver(FakeTags::text("  \n ")).resolve(&audio, "Track").is_none());
}

#[test]
fn title_is_matched_literally() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "a1.mp3", "");
    let hit = write(dir.path(), "01 - Song (Live).TXT", PLAIN);
    // "(Live)" read as a group would match this one too.
    write(dir.path(), "Song Live.txt", "wrong");

    let lyrics = resolver(FakeTags::none())
        .resolve(&audio, "Song (Live)")
        .unwrap();

    assert_eq!(lyrics.source, LyricsSource::Sidecar(hit));
    assert_eq!(lyrics.text, PLAIN);
}

#[test]
fn pattern_metacharacters_in_names_do_not_break_matching() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "what?*[1].mp3", "");
    write(dir.path(), "what?*[1].lrc", SYNCED);

    let lyrics = resolver(FakeTags::none()).resolve(&audio, "a|b").unwrap();
    assert!(lyrics.synchronized);
}

#[test]
fn matching_is_case_insensitive_and_extension_bound() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "Track.mp3", "");
    write(dir.path(), "track.md", SYNCED);
    write(dir.path(), "track.lrc.bak", SYNCED);
    let lrc = write(dir.path(), "TRACK (remaster).LRC", SYNCED);

    let lyrics = resolver(FakeTags::none()).resolve(&audio, "").unwrap();
    assert_eq!(lyrics.source, LyricsSource::Sidecar(lrc));
}

#[test]
fn search_does_not_descend_into_subdirectories() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    let sub = dir.path().join("lyrics");
    fs::create_dir(&sub).unwrap();
    write(&sub, "track.lrc", SYNCED);
    // A directory with a matching name is not a candidate either.
    fs::create_dir(dir.path().join("track.txt")).unwrap();

    assert!(resolver(FakeTags::none()).resolve(&audio, "Track").is_none());
}

#[test]
fn blank_title_does_not_match_every_sidecar() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    write(dir.path(), "other.lrc", SYNCED);

    assert!(resolver(FakeTags::none()).resolve(&audio, "  ").is_none());
}

#[test]
fn configured_extensions_replace_the_defaults() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    write(dir.path(), "track.lrc", SYNCED);
    let custom = write(dir.path(), "track.lyrics", PLAIN);

    let settings = LyricsSettings {
        synced_extension: ".elrc".to_string(),
        plain_extension: "lyrics".to_string(),
        ..LyricsSettings::default()
    };
    let r = LyricsResolver::new(FakeTags::none(), LrcTimestamps, &settings);

    let lyrics = r.resolve(&audio, "Track").unwrap();
    assert_eq!(lyrics.source, LyricsSource::Sidecar(custom));
}

#[test]
fn injected_predicate_decides_synchronization() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    write(dir.path(), "track.txt", "SYNC: yes");

    let settings = LyricsSettings::default();
    let r = LyricsResolver::new(
        FakeTags::none(),
        |text: &str| text.starts_with("SYNC:"),
        &settings,
    );

    let lyrics = r.resolve(&audio, "Track").unwrap();
    assert!(lyrics.synchronized);
}

#[test]
fn local_resolver_reads_sidecar_next_to_unparseable_audio() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.bin", "definitely not audio");
    write(dir.path(), "track.lrc", SYNCED);

    let lyrics = LyricsResolver::local(&LyricsSettings::default())
        .resolve(&audio, "Track")
        .unwrap();

    assert_eq!(lyrics.text, SYNCED);
    assert!(lyrics.synchronized);
}

#[test]
fn plain_sidecar_listed_first_is_replaced_by_later_synchronized_one() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    write(dir.path(), "track a.txt", "");
    write(dir.path(), "track b.txt", "");

    let order: Vec<String> = listing_order(dir.path())
        .into_iter()
        .filter(|name| name.ends_with(".txt"))
        .collect();
    let first = write(dir.path(), &order[0], PLAIN);
    let second = write(dir.path(), &order[1], SYNCED);

    let lyrics = resolver(FakeTags::none()).resolve(&audio, "Track").unwrap();

    assert!(lyrics.synchronized);
    assert_eq!(lyrics.text, SYNCED);
    assert_eq!(lyrics.source, LyricsSource::Sidecar(second));
    assert_ne!(lyrics.source, LyricsSource::Sidecar(first));
}

#[test]
fn synchronized_sidecar_wins_in_either_listing_order() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    let lrc = write(dir.path(), "track.lrc", SYNCED);
    write(dir.path(), "track.txt", PLAIN);

    let order = listing_order(dir.path());
    let lrc_pos = order.iter().position(|n| n == "track.lrc").unwrap();
    let txt_pos = order.iter().position(|n| n == "track.txt").unwrap();
    assert_ne!(lrc_pos, txt_pos);

    let lyrics = resolver(FakeTags::none()).resolve(&audio, "Track").unwrap();
    assert_eq!(lyrics.source, LyricsSource::Sidecar(lrc));
    assert!(lyrics.synchronized);
}

#[test]
fn last_plain_sidecar_in_listing_order_wins() {
    let dir = tempdir().unwrap();
    let audio = write(dir.path(), "track.mp3", "");
    for n in 1..=3 {
        write(dir.path(), &format!("track {n}.txt"), &format!("words {n}"));
    }

    let last = listing_order(dir.path())
        .into_iter()
        .rfind(|name| name.ends_with(".txt"))
        .unwrap();
    let expected = fs::read_to_string(dir.path().join(&last)).unwrap();

    let lyrics = resolver(FakeTags::none()).resolve(&audio, "Track").unwrap();

    assert!(!lyrics.synchronized);
    assert_eq!(lyrics.text, expected);
    assert_eq!(lyrics.source, LyricsSource::Sidecar(dir.path().join(last)));
}

#[test]
fn unreadable_candidates_are_skipped() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("gone.lrc");
    // Reading a directory fails even with full permissions.
    let not_a_file = dir.path().join("folder.lrc");
    fs::create_dir(&not_a_file).unwrap();
    let txt = write(dir.path(), "track.txt", PLAIN);

    let r = resolver(FakeTags::none());

    let lyrics = r
        .pick_sidecar(vec![missing.clone(), txt.clone(), not_a_file.clone()])
        .unwrap();
    assert_eq!(lyrics.source, LyricsSource::Sidecar(txt));
    assert!(!lyrics.synchronized);

    assert!(r.pick_sidecar(vec![missing, not_a_file]).is_none());
}

#[test]
fn first_synchronized_candidate_stops_the_scan() {
    let dir = tempdir().unwrap();
    let plain = write(dir.path(), "a.txt", PLAIN);
    let synced = write(dir.path(), "b.lrc", SYNCED);
    let later = write(dir.path(), "c.lrc", "[00:02.00]Other\n");

    let lyrics = resolver(FakeTags::none())
        .pick_sidecar(vec![plain, synced.clone(), later])
        .unwrap();

    assert_eq!(lyrics.source, LyricsSource::Sidecar(synced));
    assert_eq!(lyrics.text, SYNCED);
}
