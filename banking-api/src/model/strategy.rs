use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum weight a single strategy can carry.
pub const MAX_WEIGHT: u8 = 100;

/// Catalog identifier of an investment strategy, e.g. "aave-usdc".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrategyId(String);

impl StrategyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Banking category a strategy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankingType {
    Conventional,
    Islamic,
}

impl fmt::Display for BankingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankingType::Conventional => write!(f, "conventional"),
            BankingType::Islamic => write!(f, "islamic"),
        }
    }
}

impl std::str::FromStr for BankingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conventional" => Ok(BankingType::Conventional),
            "islamic" | "shariah" => Ok(BankingType::Islamic),
            other => Err(format!("unknown banking type '{}'", other)),
        }
    }
}

/// Risk tier selected by the investor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" | "conservative" => Ok(RiskTier::Low),
            "medium" | "balanced" => Ok(RiskTier::Medium),
            "high" | "aggressive" => Ok(RiskTier::High),
            other => Err(format!("unknown risk tier '{}'", other)),
        }
    }
}

fn default_active() -> bool {
    true
}

/// A selectable investment strategy with its allocation weight.
///
/// A strategy is active unless explicitly deactivated; a missing `active`
/// field in serialized form means active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    id: StrategyId,
    name: String,
    /// Annual yield as displayed, e.g. "7.2%".
    apy: String,
    /// Relative weight, 0 to 100.
    allocation: u8,
    risk: String,
    protocol: String,
    #[serde(rename = "type")]
    category: BankingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default = "default_active")]
    active: bool,
}

impl Strategy {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        apy: impl Into<String>,
        allocation: u8,
        risk: impl Into<String>,
        protocol: impl Into<String>,
        category: BankingType,
    ) -> Self {
        Self {
            id: StrategyId::new(id),
            name: name.into(),
            apy: apy.into(),
            allocation: allocation.min(MAX_WEIGHT),
            risk: risk.into(),
            protocol: protocol.into(),
            category,
            description: None,
            active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &StrategyId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apy(&self) -> &str {
        &self.apy
    }

    /// Numeric APY parsed from the display string ("7.2%" -> 7.2).
    pub fn apy_percent(&self) -> Option<f64> {
        self.apy.trim().trim_end_matches('%').trim().parse().ok()
    }

    pub fn weight(&self) -> u8 {
        self.allocation
    }

    /// Sets the weight, clamped to 0..=100.
    pub fn set_weight(&mut self, weight: u32) {
        self.allocation = weight.min(MAX_WEIGHT as u32) as u8;
    }

    pub fn risk(&self) -> &str {
        &self.risk
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn category(&self) -> BankingType {
        self.category
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lending() -> Strategy {
        Strategy::new(
            "aave-usdc",
            "USDC Lending (Aave)",
            "7.2%",
            100,
            "Very Low",
            "Aave",
            BankingType::Conventional,
        )
    }

    #[test]
    fn test_active_defaults_to_true_when_absent() {
        let json = r#"{"id":"sukuk","name":"Sukuk","apy":"4.8%","allocation":40,
            "risk":"Very Low","protocol":"Islamic Finance","type":"islamic"}"#;
        let strategy: Strategy = serde_json::from_str(json).unwrap();
        assert!(strategy.is_active());
        assert_eq!(strategy.category(), BankingType::Islamic);
    }

    #[test]
    fn test_weight_is_clamped() {
        let mut s = lending();
        s.set_weight(250);
        assert_eq!(s.weight(), 100);
        s.set_weight(0);
        assert_eq!(s.weight(), 0);
    }

    #[test]
    fn test_apy_percent() {
        assert_eq!(lending().apy_percent(), Some(7.2));
    }

    #[test]
    fn test_risk_tier_parse() {
        assert_eq!("Balanced".parse::<RiskTier>(), Ok(RiskTier::Medium));
        assert!("extreme".parse::<RiskTier>().is_err());
    }
}
