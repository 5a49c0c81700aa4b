use serde::{Deserialize, Serialize};

/// Label used when no speaker can be attributed.
pub const UNKNOWN_SPEAKER: &str = "UNKNOWN";

/// Label used for hosts, anchors and interviewers.
pub const MODERATOR_SPEAKER: &str = "MODERATOR";

const HONORIFICS: &[&str] = &["MR", "MS", "MRS", "DR", "PROF", "REP", "SEN", "PRES", "VICE"];
const MODERATOR_ROLES: &[&str] = &["MODERATOR", "HOST", "ANCHOR", "INTERVIEWER"];

/// A known debate participant, used to recognize direct address in
/// unlabeled transcripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// The participant's name as it should be displayed
    pub name: String,
    /// Other ways the participant is addressed ("Charlie", "Mr. Kirk")
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases(name: impl Into<String>, aliases: Vec<String>) -> Self {
        Self {
            name: name.into(),
            aliases,
        }
    }

    /// Speaker label assigned to turns attributed to this participant.
    pub fn label(&self) -> String {
        normalize_speaker(&self.name)
    }

    /// Every lowercase form this participant may be addressed by. Multi-word
    /// names also contribute their individual words.
    pub fn mention_terms(&self) -> Vec<String> {
        let mut terms = vec![self.name.to_lowercase()];
        let words: Vec<&str> = self.name.split_whitespace().collect();
        if words.len() > 1 {
            terms.extend(
                words
                    .iter()
                    .map(|w| w.trim_matches('.').to_lowercase())
                    .filter(|w| w.len() >= 3),
            );
        }
        terms.extend(self.aliases.iter().map(|a| a.to_lowercase()));
        terms.retain(|t| !t.trim().is_empty());
        terms.sort();
        terms.dedup();
        terms
    }
}

/// Canonical speaker label: uppercase, honorifics removed, moderator roles
/// merged, long labels reduced to their last word.
pub fn normalize_speaker(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let words: Vec<&str> = upper
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c == '.' || c == ','))
        .filter(|w| !w.is_empty() && !HONORIFICS.contains(w))
        .collect();

    if words.is_empty() {
        return UNKNOWN_SPEAKER.to_string();
    }
    if words.iter().any(|w| MODERATOR_ROLES.contains(w)) {
        return MODERATOR_SPEAKER.to_string();
    }
    if words.len() > 2 {
        return words[words.len() - 1].to_string();
    }
    words.join(" ")
}

/// Parse a comma-separated participant list.
///
/// Aliases follow an `=` and are separated by `|`:
/// `"Charlie Kirk=Charlie|Kirk, Tom Smith"`.
pub fn parse_participants_string(input: &str) -> Vec<Participant> {
    input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((name, aliases)) => Participant::with_aliases(
                name.trim(),
                aliases
                    .split('|')
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect(),
            ),
            None => Participant::new(entry),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_participants_string() {
        let result = parse_participants_string("Alice Chen, Bob Smith, Carol Davis");
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].name, "Alice Chen");
        assert_eq!(result[2].name, "Carol Davis");
    }

    #[test]
    fn test_parse_participants_string_with_aliases() {
        let result = parse_participants_string("  Charlie Kirk = Charlie | Mr. Kirk ,  Bob  ");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Charlie Kirk");
        assert_eq!(result[0].aliases, vec!["Charlie", "Mr. Kirk"]);
        assert_eq!(result[1].name, "Bob");
    }

    #[test]
    fn test_parse_participants_string_empty() {
        assert!(parse_participants_string("").is_empty());
    }

    #[test]
    fn test_normalize_speaker() {
        assert_eq!(normalize_speaker("Charles"), "CHARLES");
        assert_eq!(normalize_speaker("Dr. Jane Goodall"), "JANE GOODALL");
        assert_eq!(normalize_speaker("Senator John Quincy Adams"), "ADAMS");
        assert_eq!(normalize_speaker("host"), "MODERATOR");
        assert_eq!(normalize_speaker("  "), "UNKNOWN");
    }

    #[test]
    fn test_mention_terms() {
        let p = Participant::with_aliases("Charlie Kirk", vec!["Mr. Kirk".to_string()]);
        let terms = p.mention_terms();
        assert!(terms.contains(&"charlie kirk".to_string()));
        assert!(terms.contains(&"charlie".to_string()));
        assert!(terms.contains(&"kirk".to_string()));
        assert!(terms.contains(&"mr. kirk".to_string()));
        assert_eq!(p.label(), "CHARLIE KIRK");
    }
}
