use std::fs;
use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};
use walkdir::WalkDir;

use crate::config::LyricsSettings;

use super::sync::{LrcTimestamps, SyncPredicate};
use super::tag::{AudioTagReader, LoftyTagReader};
use super::{Lyrics, LyricsSource};

pub struct LyricsResolver<T = LoftyTagReader, S = LrcTimestamps> {
    tags: T,
    sync: S,
    extensions: [String; 2],
    follow_links: bool,
}

impl LyricsResolver {
    /// Resolver reading tags with `lofty` and detecting LRC timestamps.
    pub fn local(settings: &LyricsSettings) -> Self {
        Self::new(LoftyTagReader, LrcTimestamps, settings)
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

impl<T: AudioTagReader, S: SyncPredicate> LyricsResolver<T, S> {
    pub fn new(tags: T, sync: S, settings: &LyricsSettings) -> Self {
        Self {
            tags,
            sync,
            extensions: [
                normalize_extension(&settings.synced_extension),
                normalize_extension(&settings.plain_extension),
            ],
            follow_links: settings.follow_links,
        }
    }

    /// Find lyrics for the audio file at `path` whose display title is `title`.
    ///
    /// A synchronized result is returned as soon as one is found. Otherwise
    /// the last plain sidecar wins, then the (unsynchronized) embedded text.
    /// Read failures only ever mean "nothing from this source".
    pub fn resolve(&self, path: &Path, title: &str) -> Option<Lyrics> {
        let embedded = self.embedded(path);
        if let Some(text) = &embedded {
            if self.sync.is_synchronized(text) {
                return Some(Lyrics {
                    text: text.clone(),
                    synchronized: true,
                    source: LyricsSource::Embedded,
                });
            }
        }

        let fallback = embedded.map(|text| Lyrics {
            text,
            synchronized: false,
            source: LyricsSource::Embedded,
        });

        let Some(dir) = parent_dir(path) else {
            return fallback;
        };
        if !dir.is_dir() {
            return fallback;
        }

        self.pick_sidecar(self.sidecars(&dir, path, title)).or(fallback)
    }

    /// Read `candidates` in order: the first synchronized one is returned
    /// at once, otherwise the last non-blank plain one. Unreadable files
    /// are skipped.
    pub(super) fn pick_sidecar(
        &self,
        candidates: impl IntoIterator<Item = PathBuf>,
    ) -> Option<Lyrics> {
        let mut plain: Option<Lyrics> = None;
        for candidate in candidates {
            let text = match fs::read(&candidate) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::warn!(
                        path = %candidate.display(),
                        error = %e,
                        "unreadable lyrics file"
                    );
                    continue;
                }
            };
            if text.trim().is_empty() {
                continue;
            }

            if self.sync.is_synchronized(&text) {
                tracing::debug!(path = %candidate.display(), "synchronized sidecar lyrics");
                return Some(Lyrics {
                    text,
                    synchronized: true,
                    source: LyricsSource::Sidecar(candidate),
                });
            }
            tracing::debug!(path = %candidate.display(), "plain sidecar lyrics");
            plain = Some(Lyrics {
                text,
                synchronized: false,
                source: LyricsSource::Sidecar(candidate),
            });
        }

        plain
    }

    /// Non-blank embedded lyrics, if the tag can be read.
    fn embedded(&self, path: &Path) -> Option<String> {
        match self.tags.read_lyrics(path) {
            Ok(text) => text.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to read embedded lyrics"
                );
                None
            }
        }
    }

    /// Case-insensitive `.*<literal>.*\.(ext|ext)` matcher over file names.
    fn pattern(&self, literal: &str) -> Option<Regex> {
        let exts: Vec<String> = self.extensions.iter().map(|e| regex::escape(e)).collect();
        let source = format!("^.*{}.*\\.(?:{})$", regex::escape(literal), exts.join("|"));
        match RegexBuilder::new(&source).case_insensitive(true).build() {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(literal, error = %e, "skipping lyrics file pattern");
                None
            }
        }
    }

    /// Files directly inside `dir` whose names match the audio file stem or
    /// the title, in directory-listing order.
    fn sidecars(&self, dir: &Path, audio: &Path, title: &str) -> Vec<PathBuf> {
        let stem = audio
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let patterns: Vec<Regex> = [stem.as_str(), title]
            .into_iter()
            .filter(|literal| !literal.trim().is_empty())
            .filter_map(|literal| self.pattern(literal))
            .collect();
        if patterns.is_empty() {
            return Vec::new();
        }

        let mut matches = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(
                        dir = %dir.display(),
                        error = %e,
                        "failed to list lyrics directory"
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if patterns.iter().any(|re| re.is_match(&name)) {
                matches.push(entry.into_path());
            }
        }
        matches
    }
}

fn parent_dir(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    absolute.parent().map(Path::to_path_buf)
}
