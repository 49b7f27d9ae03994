use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The simplified two-tier position every permission check is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Tier {
    Employee,
    Admin,
}

/// The original three-tier job position still stored on user records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyPosition {
    RegularEmployee,
    TeamLead,
    QaManager,
}

/// Any position value that may appear on a stored user: either a legacy
/// position or an already-normalized tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Position {
    Legacy(LegacyPosition),
    Tier(Tier),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized position `{0}`")]
pub struct UnknownPosition(pub String);

/// Maps any position onto its tier. Total over the closed set, and
/// `normalize(Position::from(normalize(p))) == normalize(p)`.
pub fn normalize(position: Position) -> Tier {
    match position {
        Position::Legacy(LegacyPosition::RegularEmployee) => Tier::Employee,
        Position::Legacy(LegacyPosition::TeamLead) => Tier::Admin,
        Position::Legacy(LegacyPosition::QaManager) => Tier::Admin,
        Position::Tier(tier) => tier,
    }
}

/// Legacy position derived from a free-text job title, used when an account
/// has to be synthesized for a profile that never had one.
pub fn position_for_role(role: &str) -> LegacyPosition {
    match role.trim() {
        "QA Manager" => LegacyPosition::QaManager,
        "QA Lead" | "Senior QA Engineer" => LegacyPosition::TeamLead,
        _ => LegacyPosition::RegularEmployee,
    }
}

/// Legacy position stored for an account registered with an explicit tier.
pub fn legacy_for_tier(tier: Tier, role: &str) -> LegacyPosition {
    match tier {
        Tier::Admin if role.trim() == "QA Manager" => LegacyPosition::QaManager,
        Tier::Admin => LegacyPosition::TeamLead,
        Tier::Employee => LegacyPosition::RegularEmployee,
    }
}

impl Position {
    pub fn tier(self) -> Tier {
        normalize(self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Legacy(legacy) => legacy.as_str(),
            Position::Tier(tier) => tier.as_str(),
        }
    }
}

impl LegacyPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            LegacyPosition::RegularEmployee => "Regular Employee",
            LegacyPosition::TeamLead => "Team Lead",
            LegacyPosition::QaManager => "QA Manager",
        }
    }
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Employee => "Employee",
            Tier::Admin => "Admin",
        }
    }

    pub fn is_admin(self) -> bool {
        self == Tier::Admin
    }
}

impl FromStr for Position {
    type Err = UnknownPosition;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "Regular Employee" => Ok(Position::Legacy(LegacyPosition::RegularEmployee)),
            "Team Lead" => Ok(Position::Legacy(LegacyPosition::TeamLead)),
            "QA Manager" => Ok(Position::Legacy(LegacyPosition::QaManager)),
            "Employee" => Ok(Position::Tier(Tier::Employee)),
            "Admin" => Ok(Position::Tier(Tier::Admin)),
            other => Err(UnknownPosition(other.to_string())),
        }
    }
}

impl FromStr for Tier {
    type Err = UnknownPosition;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "Employee" => Ok(Tier::Employee),
            "Admin" => Ok(Tier::Admin),
            other => Err(UnknownPosition(other.to_string())),
        }
    }
}

impl TryFrom<String> for Position {
    type Error = UnknownPosition;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.as_str().to_string()
    }
}

impl From<Tier> for Position {
    fn from(value: Tier) -> Self {
        Position::Tier(value)
    }
}

impl From<LegacyPosition> for Position {
    fn from(value: LegacyPosition) -> Self {
        Position::Legacy(value)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [&str; 5] = ["Regular Employee", "Team Lead", "QA Manager", "Employee", "Admin"];

    #[test]
    fn legacy_positions_map_onto_tiers() {
        assert_eq!(normalize("Regular Employee".parse().unwrap()), Tier::Employee);
        assert_eq!(normalize("Team Lead".parse().unwrap()), Tier::Admin);
        assert_eq!(normalize("QA Manager".parse().unwrap()), Tier::Admin);
    }

    #[test]
    fn normalize_is_idempotent() {
        for label in ALL {
            let position: Position = label.parse().unwrap();
            let once = normalize(position);
            assert_eq!(normalize(Position::from(once)), once, "{label}");
        }
    }

    #[test]
    fn unknown_position_is_rejected() {
        let err = "Intern".parse::<Position>().unwrap_err();
        assert_eq!(err, UnknownPosition("Intern".to_string()));
        assert!("Team Lead".parse::<Tier>().is_err());
    }

    #[test]
    fn serde_round_trips_labels() {
        let position: Position = serde_json::from_str("\"QA Manager\"").unwrap();
        assert_eq!(position, Position::Legacy(LegacyPosition::QaManager));
        assert_eq!(serde_json::to_string(&position).unwrap(), "\"QA Manager\"");
        assert!(serde_json::from_str::<Position>("\"Boss\"").is_err());
    }

    #[test]
    fn role_lookup_matches_known_titles() {
        assert_eq!(position_for_role("QA Manager"), LegacyPosition::QaManager);
        assert_eq!(position_for_role("QA Lead"), LegacyPosition::TeamLead);
        assert_eq!(position_for_role("Senior QA Engineer"), LegacyPosition::TeamLead);
        assert_eq!(position_for_role("QA Analyst"), LegacyPosition::RegularEmployee);
    }

    #[test]
    fn tier_registration_picks_legacy_position() {
        assert_eq!(legacy_for_tier(Tier::Admin, "QA Manager"), LegacyPosition::QaManager);
        assert_eq!(legacy_for_tier(Tier::Admin, "QA Lead"), LegacyPosition::TeamLead);
        assert_eq!(legacy_for_tier(Tier::Employee, "QA Manager"), LegacyPosition::RegularEmployee);
    }
}
