use crate::{
    os,
    types::{OsStatus, Strategy},
};

/// Opaque calibration constants.
pub const CONFIDENCE_REPLATFORM_PROD: u8 = 92;
pub const CONFIDENCE_REPLATFORM: u8 = 88;
pub const CONFIDENCE_EXTENDED: u8 = 85;
pub const CONFIDENCE_REHOST_PROD: u8 = 95;
pub const CONFIDENCE_REHOST: u8 = 90;

/// Everything a strategy rule may look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facts {
    pub status: OsStatus,
    pub has_database: bool,
    pub is_production: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub strategy: Strategy,
    pub confidence: u8,
    /// Id of the rule that fired.
    pub rule: &'static str,
}

pub struct StrategyRule {
    pub id: &'static str,
    pub applies: fn(&Facts) -> bool,
    pub outcome: fn(&Facts) -> (Strategy, u8),
}

/// Evaluated top-down, first match wins. The last rule always applies.
pub static STRATEGY_RULES: &[StrategyRule] = &[
    StrategyRule {
        id: "UNSUPPORTED_OS",
        applies: |f| matches!(f.status, OsStatus::Eol | OsStatus::Unknown),
        outcome: |f| {
            let confidence = if f.is_production {
                CONFIDENCE_REPLATFORM_PROD
            } else {
                CONFIDENCE_REPLATFORM
            };
            (Strategy::Replatform, confidence)
        },
    },
    StrategyRule {
        id: "EXTENDED_SUPPORT",
        applies: |f| f.status == OsStatus::Extended,
        outcome: |f| {
            let strategy = if f.has_database {
                Strategy::Replatform
            } else {
                Strategy::Rehost
            };
            (strategy, CONFIDENCE_EXTENDED)
        },
    },
    StrategyRule {
        id: "SUPPORTED_OS",
        applies: |_| true,
        outcome: |f| {
            let confidence = if f.is_production {
                CONFIDENCE_REHOST_PROD
            } else {
                CONFIDENCE_REHOST
            };
            (Strategy::Rehost, confidence)
        },
    },
];

pub fn run_rules(facts: &Facts) -> Classification {
    let rule = STRATEGY_RULES
        .iter()
        .find(|r| (r.applies)(facts))
        .unwrap_or(&STRATEGY_RULES[STRATEGY_RULES.len() - 1]);
    let (strategy, confidence) = (rule.outcome)(facts);
    Classification {
        strategy,
        confidence,
        rule: rule.id,
    }
}

/// Status of a canonical key; anything outside the lifecycle table is `Unknown`.
pub fn status_of(normalized_os: &str) -> OsStatus {
    os::lookup(normalized_os)
        .map(|e| e.status)
        .unwrap_or(OsStatus::Unknown)
}

pub fn classify(normalized_os: &str, has_database: bool, is_production: bool) -> Classification {
    run_rules(&Facts {
        status: status_of(normalized_os),
        has_database,
        is_production,
    })
}
