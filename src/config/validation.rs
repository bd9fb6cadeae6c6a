//! Config validation: unknown-key detection with Levenshtein suggestions.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.
//!
//! The `[games]` table is keyed by game id, so only the fields *inside* each
//! game entry are checked.

use std::collections::HashSet;

/// A non-fatal config warning (typo, misplaced key).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Top-level table holding the per-game source mapping.
const GAMES_TABLE: &str = "games";

/// Fields accepted inside a `[games.<id>]` entry.
pub const GAME_ENTRY_FIELDS: &[&str] = &["interface", "database", "table"];

/// Returns the set of valid dotted key paths outside the `[games]` table.
///
/// Maintained by hand to match the structs in `gateway_config.rs`.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [server]
        "server",
        "server.addr",
        // [logging]
        "logging",
        "logging.level",
        "logging.format",
        "logging.file",
        // [export]
        "export",
        "export.endpoint",
        "export.timeout_secs",
        // [sql]
        "sql",
        "sql.host",
        "sql.port",
        "sql.user",
        "sql.password",
        // [warehouse]
        "warehouse",
        "warehouse.project_id",
        "warehouse.credential_path",
        // [games]
        GAMES_TABLE,
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction<'a, I>(unknown: &str, known: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    known
        .into_iter()
        .map(|k| (k, levenshtein(unknown, k)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by(|(ka, da), (kb, db)| da.cmp(db).then_with(|| ka.cmp(kb)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys; it only warns. Parse errors are left
/// for serde to report.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };
    let Some(root) = value.as_table() else {
        return Vec::new();
    };

    let known = known_config_keys();
    let mut warnings = Vec::new();

    for (section, section_value) in root {
        if section == GAMES_TABLE {
            warnings.extend(validate_game_entries(section_value));
            continue;
        }

        let mut found = vec![section.clone()];
        if section_value.is_table() {
            found.extend(walk_toml_keys(section_value, section));
        }
        for key in found {
            if !known.contains(key.as_str()) {
                let suggestion = suggest_correction(&key, known.iter().copied());
                warnings.push(ValidationWarning {
                    message: format!("Unknown config key '{key}'"),
                    field: key,
                    suggestion,
                });
            }
        }
    }

    warnings
}

/// Check the fields of every `[games.<id>]` entry.
fn validate_game_entries(games: &toml::Value) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let Some(games) = games.as_table() else {
        warnings.push(ValidationWarning {
            field: GAMES_TABLE.to_string(),
            message: "'games' must be a table of game ids".to_string(),
            suggestion: None,
        });
        return warnings;
    };

    for (game_id, entry) in games {
        let Some(entry) = entry.as_table() else {
            warnings.push(ValidationWarning {
                field: format!("{GAMES_TABLE}.{game_id}"),
                message: format!("Game entry '{game_id}' must be a table"),
                suggestion: None,
            });
            continue;
        };
        for field in entry.keys() {
            if !GAME_ENTRY_FIELDS.contains(&field.as_str()) {
                let suggestion = suggest_correction(field, GAME_ENTRY_FIELDS.iter().copied())
                    .map(|s| format!("{GAMES_TABLE}.{game_id}.{s}"));
                warnings.push(ValidationWarning {
                    field: format!("{GAMES_TABLE}.{game_id}.{field}"),
                    message: format!("Unknown key '{field}' in game entry '{game_id}'"),
                    suggestion,
                });
            }
        }
    }

    warnings
}
