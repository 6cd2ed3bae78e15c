#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ranked high-score ledger persisted as a two-section text file.
//!
//! The file starts with a `[Name]` header followed by one name per line,
//! then a `[Moves]` header followed by the move counts in the same order.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use thiserror::Error;

/// Maximum number of entries the ledger retains.
pub const CAPACITY: usize = 10;

const NAME_HEADER: &str = "[Name]";
const MOVES_HEADER: &str = "[Moves]";

/// Single record of a won hunt.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScoreEntry {
    /// Name the winner entered.
    pub name: String,
    /// Moves the winner needed. Lower is better.
    pub moves: u32,
}

/// Result of offering a score to the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// The score entered the table.
    Recorded {
        /// 1-based position of the new entry.
        rank: usize,
    },
    /// The table is full and the score does not beat its worst entry.
    Rejected,
}

/// Errors raised while reading or writing the ledger file.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The file could not be read or written.
    #[error("failed to access score file {path}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A section header was absent or misplaced.
    #[error("score file is missing the {0} header")]
    MissingHeader(&'static str),
    /// The two sections list a different number of lines.
    #[error("score file lists {names} names but {moves} move counts")]
    Truncated {
        /// Lines found in the name section.
        names: usize,
        /// Lines found in the moves section.
        moves: usize,
    },
    /// A move count is not a non-negative integer.
    #[error("invalid move count {value:?} on line {line}")]
    InvalidMoves {
        /// 1-based line number in the file.
        line: usize,
        /// Offending text.
        value: String,
    },
}

/// Rewrites a player name so it occupies exactly one name line.
///
/// Line breaks become spaces, surrounding whitespace is trimmed, a name equal
/// to a section header loses its brackets and a blank name becomes
/// `Anonymous`.
#[must_use]
pub fn storable_name(name: &str) -> String {
    let single_line: String = name
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let trimmed = single_line.trim();
    if trimmed.is_empty() {
        return "Anonymous".to_owned();
    }
    if trimmed == NAME_HEADER || trimmed == MOVES_HEADER {
        return trimmed.trim_matches(|c| c == '[' || c == ']').to_owned();
    }
    trimmed.to_owned()
}

/// Top-ten table of the fewest moves needed to kill the Wumpus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    entries: Vec<ScoreEntry>,
}

impl ScoreLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a winning score to the table.
    ///
    /// While the table has room every score is appended. Once full, the
    /// first entry with the highest move count is replaced, but only by a
    /// strictly better score. Names are stored in a form the file format can
    /// read back, see [`storable_name`].
    pub fn submit(&mut self, name: impl Into<String>, moves: u32) -> Submission {
        if self.entries.len() >= CAPACITY {
            let Some(worst) = self.worst_index() else {
                return Submission::Rejected;
            };
            if moves >= self.entries[worst].moves {
                debug!("score of {moves} moves does not beat the table");
                return Submission::Rejected;
            }
            let evicted = self.entries.remove(worst);
            debug!("evicting {} with {} moves", evicted.name, evicted.moves);
        }

        self.entries.push(ScoreEntry {
            name: storable_name(&name.into()),
            moves,
        });
        self.entries.sort_by_key(|entry| entry.moves);

        let rank = self
            .entries
            .iter()
            .filter(|entry| entry.moves <= moves)
            .count();
        Submission::Recorded { rank }
    }

    /// Reports whether a score would enter the table.
    #[must_use]
    pub fn qualifies(&self, moves: u32) -> bool {
        self.entries.len() < CAPACITY
            || self
                .entries
                .iter()
                .map(|entry| entry.moves)
                .max()
                .map_or(true, |worst| moves < worst)
    }

    /// Entries in ascending order of moves.
    #[must_use]
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no score has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best recorded entry, if any.
    #[must_use]
    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    /// Renders the ledger in its file format.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        text.push_str(NAME_HEADER);
        text.push('\n');
        for entry in &self.entries {
            text.push_str(&entry.name);
            text.push('\n');
        }
        text.push_str(MOVES_HEADER);
        text.push('\n');
        for entry in &self.entries {
            text.push_str(&entry.moves.to_string());
            text.push('\n');
        }
        text
    }

    /// Parses a ledger from its file format.
    ///
    /// Blank input yields an empty ledger. Entries beyond the capacity are
    /// dropped after sorting.
    pub fn from_text(text: &str) -> Result<Self, LedgerError> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }

        let lines: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();
        if lines.first() != Some(&NAME_HEADER) {
            return Err(LedgerError::MissingHeader(NAME_HEADER));
        }
        let split = lines
            .iter()
            .position(|line| *line == MOVES_HEADER)
            .ok_or(LedgerError::MissingHeader(MOVES_HEADER))?;

        let names = &lines[1..split];
        let moves: Vec<&str> = lines[split + 1..]
            .iter()
            .copied()
            .filter(|line| !line.trim().is_empty())
            .collect();
        if names.len() != moves.len() {
            return Err(LedgerError::Truncated {
                names: names.len(),
                moves: moves.len(),
            });
        }

        let mut entries = Vec::with_capacity(names.len());
        for (offset, (name, value)) in names.iter().zip(&moves).enumerate() {
            let moves = value
                .trim()
                .parse::<u32>()
                .map_err(|_| LedgerError::InvalidMoves {
                    line: split + offset + 2,
                    value: (*value).to_owned(),
                })?;
            entries.push(ScoreEntry {
                name: (*name).to_owned(),
                moves,
            });
        }
        entries.sort_by_key(|entry| entry.moves);
        entries.truncate(CAPACITY);
        Ok(Self { entries })
    }

    /// Loads the ledger stored at `path`. A missing file yields an empty ledger.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                info!("no score file at {}; starting empty", path.display());
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(LedgerError::Io {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        let ledger = Self::from_text(&text)?;
        debug!("loaded {} scores from {}", ledger.len(), path.display());
        Ok(ledger)
    }

    /// Writes the ledger to `path`, replacing any previous contents.
    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        let io_error = |source| LedgerError::Io {
            path: path.to_owned(),
            source,
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, self.to_text()).map_err(io_error)?;
        debug!("saved {} scores to {}", self.len(), path.display());
        Ok(())
    }

    fn worst_index(&self) -> Option<usize> {
        let worst = self.entries.iter().map(|entry| entry.moves).max()?;
        self.entries.iter().position(|entry| entry.moves == worst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_score_ranks_first() {
        let mut ledger = ScoreLedger::new();

        assert_eq!(ledger.submit("A", 5), Submission::Recorded { rank: 1 });
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.best().map(|entry| entry.moves), Some(5));
    }

    #[test]
    fn ties_rank_behind_existing_entries() {
        let mut ledger = ScoreLedger::new();
        let _ = ledger.submit("A", 7);

        assert_eq!(ledger.submit("B", 7), Submission::Recorded { rank: 2 });
        assert_eq!(ledger.entries()[0].name, "A");
    }

    #[test]
    fn header_names_lose_their_brackets() {
        assert_eq!(storable_name("[Moves]"), "Moves");
        assert_eq!(storable_name(" [Name] "), "Name");
        assert_eq!(storable_name("Ada\nLovelace"), "Ada Lovelace");
        assert_eq!(storable_name("  \r\n"), "Anonymous");
        assert_eq!(storable_name("[Moves] club"), "[Moves] club");
    }

    #[test]
    fn blank_text_is_an_empty_ledger() {
        let ledger = ScoreLedger::from_text("\n").expect("blank text parses");

        assert!(ledger.is_empty());
    }

    #[test]
    fn text_lists_names_then_moves() {
        let mut ledger = ScoreLedger::new();
        let _ = ledger.submit("Ada", 9);
        let _ = ledger.submit("Bo", 4);

        assert_eq!(ledger.to_text(), "[Name]\nBo\nAda\n[Moves]\n4\n9\n");
    }

    #[test]
    fn missing_moves_header_is_rejected() {
        let error = ScoreLedger::from_text("[Name]\nAda\n4\n").unwrap_err();

        assert!(matches!(error, LedgerError::MissingHeader(MOVES_HEADER)));
    }

    #[test]
    fn uneven_sections_are_truncated() {
        let error = ScoreLedger::from_text("[Name]\nAda\nBo\n[Moves]\n4\n").unwrap_err();

        assert!(matches!(error, LedgerError::Truncated { names: 2, moves: 1 }));
    }

    #[test]
    fn non_numeric_moves_are_rejected() {
        let error = ScoreLedger::from_text("[Name]\nAda\n[Moves]\nfour\n").unwrap_err();

        match error {
            LedgerError::InvalidMoves { line, value } => {
                assert_eq!(line, 4);
                assert_eq!(value, "four");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
