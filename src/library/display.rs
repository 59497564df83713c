//! Small formatting helpers used when reporting on tracks.

use super::model::{Track, TrackId};

/// Join two optional info parts with a bullet, skipping empty ones.
pub fn info_string(first: Option<&str>, second: Option<&str>) -> String {
    let first = first.filter(|s| !s.is_empty());
    let second = second.filter(|s| !s.is_empty());
    match (first, second) {
        (Some(a), Some(b)) => format!("{a}  •  {b}"),
        (Some(a), None) => a.to_string(),
        (None, Some(b)) => b.to_string(),
        (None, None) => String::new(),
    }
}

/// Format a duration as `mm:ss`, or `hh:mm:ss` from one hour up.
pub fn readable_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    if minutes < 60 {
        format!("{minutes:02}:{seconds:02}")
    } else {
        format!("{:02}:{:02}:{seconds:02}", minutes / 60, minutes % 60)
    }
}

/// Index letter for a title, ignoring a leading "the " or "a ".
pub fn section_name(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let stripped = lowered
        .strip_prefix("the ")
        .or_else(|| lowered.strip_prefix("a "))
        .unwrap_or(&lowered);
    stripped
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Tag writers encode the disc in the thousands (1002 = disc 1, track 2).
pub fn fixed_track_number(track_number: u32) -> u32 {
    track_number % 1000
}

pub fn year_string(year: i32) -> String {
    if year > 0 {
        year.to_string()
    } else {
        "-".to_string()
    }
}

pub fn song_count_string(count: usize) -> String {
    if count == 1 {
        "1 song".to_string()
    } else {
        format!("{count} songs")
    }
}

pub fn total_duration(tracks: &[Track]) -> u64 {
    tracks.iter().map(|t| t.duration_ms).sum()
}

pub fn index_of_track(tracks: &[Track], id: TrackId) -> Option<usize> {
    tracks.iter().position(|t| t.id == id)
}

/// Whether an artist name is one of the "unknown" placeholders.
pub fn is_unknown_artist(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let name = name.trim().to_lowercase();
    name == "unknown" || name == "<unknown>"
}

/// "N songs  •  mm:ss" summary for a list of tracks.
pub fn playlist_info_string(tracks: &[Track]) -> String {
    info_string(
        Some(&song_count_string(tracks.len())),
        Some(&readable_duration(total_duration(tracks))),
    )
}
