//! Static strategy catalog keyed by banking type and risk tier.

use banking::model::session::SessionMode;
use banking::model::strategy::{BankingType, RiskTier, Strategy};
use serde::Serialize;

/// Descriptor shown when the investor picks a risk tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskProfile {
    pub tier: RiskTier,
    pub name: &'static str,
    pub description: &'static str,
    pub expected_return: &'static str,
}

pub const RISK_PROFILES: [RiskProfile; 3] = [
    RiskProfile {
        tier: RiskTier::Low,
        name: "Conservative",
        description: "Low risk, steady returns",
        expected_return: "4-8% APY",
    },
    RiskProfile {
        tier: RiskTier::Medium,
        name: "Balanced",
        description: "Medium risk, balanced growth",
        expected_return: "8-15% APY",
    },
    RiskProfile {
        tier: RiskTier::High,
        name: "Aggressive",
        description: "High risk, maximum growth",
        expected_return: "15-25% APY",
    },
];

pub fn risk_profile(tier: RiskTier) -> &'static RiskProfile {
    match tier {
        RiskTier::Low => &RISK_PROFILES[0],
        RiskTier::Medium => &RISK_PROFILES[1],
        RiskTier::High => &RISK_PROFILES[2],
    }
}

/// The only strategy backed by a real on-chain position.
pub fn aave_usdc_lending() -> Strategy {
    Strategy::new(
        "aave-usdc",
        "USDC Lending (Aave)",
        "7.2%",
        100,
        "Very Low",
        "Aave",
        BankingType::Conventional,
    )
    .with_description("Lend USDC on Aave Base for stable returns")
}

fn conventional(id: &str, name: &str, apy: &str, weight: u8, risk: &str, protocol: &str) -> Strategy {
    Strategy::new(id, name, apy, weight, risk, protocol, BankingType::Conventional)
}

fn islamic(
    id: &str,
    name: &str,
    apy: &str,
    weight: u8,
    risk: &str,
    protocol: &str,
    description: &str,
) -> Strategy {
    Strategy::new(id, name, apy, weight, risk, protocol, BankingType::Islamic)
        .with_description(description)
}

/// Fresh strategy instances for the given banking type and tier.
///
/// In live mode the conservative tier is restricted to Aave USDC lending,
/// whatever the banking type, since it is the only strategy that can be
/// executed on chain.
pub fn strategies_for(banking: BankingType, tier: RiskTier, mode: SessionMode) -> Vec<Strategy> {
    if mode.is_live() && tier == RiskTier::Low {
        return vec![aave_usdc_lending()];
    }

    match (banking, tier) {
        (BankingType::Conventional, RiskTier::Low) => vec![aave_usdc_lending()],
        (BankingType::Conventional, RiskTier::Medium) => vec![
            conventional("treasury", "US Treasury Bills", "5.2%", 25, "Very Low", "Traditional Finance"),
            conventional("blue-chip", "Blue Chip Stocks", "12.5%", 30, "Medium", "Tokenized Assets"),
            conventional("defi-lending", "DeFi Lending", "11.2%", 25, "Medium", "Aave"),
            conventional("yield-farming", "Yield Farming", "18.7%", 20, "Medium-High", "Uniswap V3"),
        ],
        (BankingType::Conventional, RiskTier::High) => vec![
            conventional("blue-chip", "Blue Chip Stocks", "12.5%", 20, "Medium", "Tokenized Assets"),
            conventional("defi-lending", "DeFi Lending", "11.2%", 25, "Medium", "Aave"),
            conventional("yield-farming", "Yield Farming", "18.7%", 30, "Medium-High", "Uniswap V3"),
            conventional("liquidity-mining", "Liquidity Mining", "24.3%", 25, "High", "SushiSwap"),
        ],
        (BankingType::Islamic, RiskTier::Low) => vec![
            islamic("sukuk", "Sukuk (Islamic Bonds)", "4.8%", 40, "Very Low", "Islamic Finance", "Asset-backed Islamic securities"),
            islamic("wakalah", "Wakalah Investment", "5.5%", 35, "Low", "Islamic Banking", "Agency-based investment"),
            islamic("murabaha", "Murabaha Finance", "6.2%", 25, "Low", "Islamic Banking", "Cost-plus financing"),
        ],
        (BankingType::Islamic, RiskTier::Medium) => vec![
            islamic("sukuk", "Sukuk (Islamic Bonds)", "4.8%", 25, "Very Low", "Islamic Finance", "Asset-backed Islamic securities"),
            islamic("halal-stocks", "Halal Stock Portfolio", "11.8%", 30, "Medium", "Islamic ETFs", "Shariah-compliant equities"),
            islamic("musharaka", "Musharaka Investment", "10.5%", 25, "Medium", "Islamic Banking", "Partnership-based investment"),
            islamic("ijarah", "Ijarah (Leasing)", "8.9%", 20, "Medium", "Islamic Banking", "Asset leasing investment"),
        ],
        (BankingType::Islamic, RiskTier::High) => vec![
            islamic("halal-stocks", "Halal Stock Portfolio", "11.8%", 20, "Medium", "Islamic ETFs", "Shariah-compliant equities"),
            islamic("musharaka", "Musharaka Investment", "10.5%", 25, "Medium", "Islamic Banking", "Partnership-based investment"),
            islamic("halal-crypto", "Halal Crypto Mining", "16.2%", 30, "Medium-High", "Islamic DeFi", "Shariah-compliant mining"),
            islamic("salam", "Salam Forward Contracts", "14.7%", 25, "High", "Islamic Trading", "Forward sale contracts"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANKING: [BankingType; 2] = [BankingType::Conventional, BankingType::Islamic];
    const TIERS: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    #[test]
    fn test_every_catalog_entry_sums_to_100() {
        for banking in BANKING {
            for tier in TIERS {
                let total: u32 = strategies_for(banking, tier, SessionMode::Demo)
                    .iter()
                    .map(|s| s.weight() as u32)
                    .sum();
                assert_eq!(total, 100, "{} / {}", banking, tier);
            }
        }
    }

    #[test]
    fn test_catalog_category_matches_banking_type() {
        for banking in BANKING {
            for tier in TIERS {
                for s in strategies_for(banking, tier, SessionMode::Demo) {
                    assert_eq!(s.category(), banking);
                    assert!(s.is_active());
                }
            }
        }
    }

    #[test]
    fn test_live_conservative_is_aave_only() {
        let live = strategies_for(BankingType::Islamic, RiskTier::Low, SessionMode::Live);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id().as_str(), "aave-usdc");

        let demo = strategies_for(BankingType::Islamic, RiskTier::Low, SessionMode::Demo);
        assert_eq!(demo.len(), 3);
    }

    #[test]
    fn test_risk_profile_lookup() {
        assert_eq!(risk_profile(RiskTier::High).name, "Aggressive");
    }
}
