use crate::bot::*;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::fs;
use std::path::Path;

const DEFAULT_ADMIN_ROLE: &str = "ElectionAdmin";
const DEFAULT_MAX_MESSAGES: usize = 100;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// One of "random", "hashed" or "useCandidateOrder".
    #[serde(rename = "tiebreakMode")]
    pub tiebreak_mode: Option<String>,
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<JSValue>,
    /// One of "cascade" or "preferenceScore".
    #[serde(rename = "eliminationRule")]
    pub elimination_rule: Option<String>,
    #[serde(rename = "maxRounds")]
    pub max_rounds: Option<u32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(rename = "adminRoleName")]
    pub admin_role_name: Option<String>,
    #[serde(rename = "maxMessages")]
    pub max_messages: Option<usize>,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl BotConfig {
    pub fn admin_role(&self) -> &str {
        self.admin_role_name.as_deref().unwrap_or(DEFAULT_ADMIN_ROLE)
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages.unwrap_or(DEFAULT_MAX_MESSAGES)
    }
}

pub fn read_config(path: &Path) -> BotResult<BotConfig> {
    let path_s = path.display().to_string();
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path: path_s })?;
    let config: BotConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

fn read_js_seed(x: &JSValue) -> Option<u64> {
    match x {
        JSValue::Number(n) => n.as_u64(),
        JSValue::String(s) => s.parse::<u64>().ok(),
        _ => None,
    }
}

/// Turns the rules of the configuration into tabulation rules.
///
/// A seed given on the command line replaces the one of the configuration.
pub fn validate_rules(rules: &RulesConfig, seed_override: Option<u64>) -> BotResult<VoteRules> {
    let seed = match (seed_override, &rules.random_seed) {
        (Some(s), _) => Some(s),
        (None, None) => None,
        (None, Some(js)) => match read_js_seed(js) {
            Some(s) => Some(s),
            None => whatever!("Failed to understand randomSeed option: {}", js),
        },
    };
    let tiebreak_mode = match (rules.tiebreak_mode.as_deref().unwrap_or("random"), seed) {
        ("random", None) => TieBreakMode::Random,
        ("random", Some(s)) => TieBreakMode::Seeded(s),
        ("hashed", Some(s)) => match u32::try_from(s) {
            Ok(s32) => TieBreakMode::Hashed(s32),
            Err(_) => whatever!("The hashed tiebreak mode needs a seed below 2^32, got {}", s),
        },
        ("hashed", None) => whatever!("The hashed tiebreak mode needs a randomSeed"),
        ("useCandidateOrder", _) => TieBreakMode::UseCandidateOrder,
        (x, _) => whatever!("Cannot use tiebreak mode {:?}: not implemented", x),
    };
    let elimination_rule = match rules.elimination_rule.as_deref().unwrap_or("cascade") {
        "cascade" => EliminationRule::Cascade,
        "preferenceScore" => EliminationRule::PreferenceScore,
        x => whatever!("Cannot use elimination rule {:?}: not implemented", x),
    };
    let max_rounds = match rules.max_rounds {
        Some(0) => whatever!("maxRounds must be at least 1"),
        x => x,
    };
    Ok(VoteRules {
        tiebreak_mode,
        elimination_rule,
        max_rounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules(js: JSValue) -> RulesConfig {
        serde_json::from_value(js).unwrap()
    }

    #[test]
    fn reads_defaults() {
        let config: BotConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.admin_role(), "ElectionAdmin");
        assert_eq!(config.max_messages(), 100);
        let r = validate_rules(&config.rules, None).unwrap();
        assert_eq!(r, VoteRules::DEFAULT_RULES);

        let config: BotConfig = serde_json::from_value(json!({
            "adminRoleName": "Referee",
            "maxMessages": 20,
            "rules": {"tiebreakMode": "useCandidateOrder", "eliminationRule": "preferenceScore"}
        }))
        .unwrap();
        assert_eq!(config.admin_role(), "Referee");
        assert_eq!(config.max_messages(), 20);
        let r = validate_rules(&config.rules, None).unwrap();
        assert_eq!(r.tiebreak_mode, TieBreakMode::UseCandidateOrder);
        assert_eq!(r.elimination_rule, EliminationRule::PreferenceScore);
    }

    #[test]
    fn reads_seeds() {
        let r = validate_rules(&rules(json!({"randomSeed": "42"})), None).unwrap();
        assert_eq!(r.tiebreak_mode, TieBreakMode::Seeded(42));
        let r = validate_rules(&rules(json!({"randomSeed": 42})), Some(7)).unwrap();
        assert_eq!(r.tiebreak_mode, TieBreakMode::Seeded(7));
        let hashed = rules(json!({"tiebreakMode": "hashed", "randomSeed": 3}));
        let r = validate_rules(&hashed, None).unwrap();
        assert_eq!(r.tiebreak_mode, TieBreakMode::Hashed(3));
    }

    #[test]
    fn rejects_unknown_rules() {
        assert!(validate_rules(&rules(json!({"tiebreakMode": "coinFlip"})), None).is_err());
        assert!(validate_rules(&rules(json!({"tiebreakMode": "hashed"})), None).is_err());
        assert!(validate_rules(&rules(json!({"randomSeed": "abc"})), None).is_err());
        assert!(validate_rules(&rules(json!({"eliminationRule": "bottomTwo"})), None).is_err());
        let err = validate_rules(&rules(json!({"maxRounds": 0})), None).unwrap_err();
        assert_eq!(err.to_string(), "maxRounds must be at least 1");
    }
}
