//! Application configuration: dashboard settings, source endpoints and
//! the commodity catalog. A TOML file can override any part; a built-in
//! catalog covers the usual mining-portfolio instruments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::shared::types::{Category, Commodity, Frequency, Timeframe};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardCfg {
    pub title: String,
    pub subtitle: String,
    pub default_timeframe: Timeframe,
    pub default_frequency: Frequency,
}

impl Default for DashboardCfg {
    fn default() -> Self {
        Self {
            title: "Commodity Price Dashboard".to_string(),
            subtitle: "Commodity price tracking for strategic decision making".to_string(),
            default_timeframe: Timeframe::OneYear,
            default_frequency: Frequency::Monthly,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCfg {
    /// Terminal gateway endpoint; synthetic data is used when absent
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Fall back to generated data when the terminal fails or is absent
    #[serde(default = "default_true")]
    pub synthetic_fallback: bool,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SourceCfg {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            synthetic_fallback: true,
            seed: default_seed(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_seed() -> u64 {
    42
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingCfg {
    pub log_dir: String,
}

impl Default for LoggingCfg {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardCfg,
    #[serde(default)]
    pub source: SourceCfg,
    #[serde(default)]
    pub logging: LoggingCfg,
    #[serde(default = "default_catalog")]
    pub commodities: Vec<Commodity>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dashboard: DashboardCfg::default(),
            source: SourceCfg::default(),
            logging: LoggingCfg::default(),
            commodities: default_catalog(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())?;
        let cfg: Self = toml::from_str(&s).context("parse config file")?;
        Ok(cfg)
    }

    pub fn commodity(&self, name: &str) -> Option<&Commodity> {
        self.commodities.iter().find(|c| c.name == name)
    }
}

macro_rules! commodity {
    ($name:expr, $category:expr, $ticker:expr, $alt:expr, $kind:expr, $units:expr, $desc:expr) => {
        Commodity {
            name: $name.to_string(),
            category: $category,
            preferred_ticker: $ticker.map(str::to_string),
            description: $desc.to_string(),
            alternative_ticker: $alt.map(str::to_string),
            alternative_description: None,
            kind: $kind.to_string(),
            units: $units.to_string(),
            data_source: "Terminal".to_string(),
        }
    };
}

/// The built-in commodity catalog used when no config file provides one
pub fn default_catalog() -> Vec<Commodity> {
    vec![
        commodity!(
            "Copper (Cu)",
            Category::Core,
            Some("LMCADY Comdty"),
            None::<&str>,
            "Spot (LME Cash)",
            "USD/MT",
            "LME Copper Cash Settlement Price"
        ),
        commodity!(
            "Zinc (Zn)",
            Category::Core,
            Some("LMZSDY Comdty"),
            None::<&str>,
            "Spot (LME Cash)",
            "USD/MT",
            "LME Zinc Cash Settlement Price"
        ),
        commodity!(
            "Nickel (Ni)",
            Category::Strategic,
            Some("LMNIDY Comdty"),
            None::<&str>,
            "Spot (LME Cash)",
            "USD/MT",
            "LME Nickel Cash Settlement Price"
        ),
        commodity!(
            "Lithium (Li)",
            Category::Strategic,
            Some("LJC1 Comdty"),
            Some("LFA1 Comdty"),
            "Futures",
            "USD/kg",
            "Lithium Carbonate CIF CJK (Fastmarkets) Futures"
        ),
        commodity!(
            "Uranium (U)",
            Category::Strategic,
            Some("UXCPSPTW UXCF Index"),
            Some("UXA1 Comdty"),
            "Weekly Spot / Futures",
            "USD/lb",
            "UxC Uranium U308 Weekly Spot Price"
        ),
        commodity!(
            "Molybdenum (Mo)",
            Category::Strategic,
            Some("MYB1 Comdty"),
            None::<&str>,
            "Futures",
            "USD/lb",
            "LME Molybdenum (Platts) Generic Future"
        ),
        commodity!(
            "Gold (Au)",
            Category::Industry,
            Some("XAU BGN Curncy"),
            Some("XAU"),
            "Spot",
            "USD/troy oz",
            "Gold spot price in the interbank market"
        ),
        commodity!(
            "Silver (Ag)",
            Category::Industry,
            Some("XAGUSD BGN Curncy"),
            Some("XAGUSD"),
            "Spot",
            "USD/troy oz",
            "Silver spot price in the interbank market"
        ),
        commodity!(
            "Platinum (Pt)",
            Category::Industry,
            Some("XPT BGN Curncy"),
            Some("XPT"),
            "Spot",
            "USD/troy oz",
            "Platinum spot price in the interbank market"
        ),
        commodity!(
            "Lead (Pb)",
            Category::Industry,
            Some("LMPBDY Comdty"),
            None::<&str>,
            "Spot (LME Cash)",
            "USD/MT",
            "LME Lead Cash Settlement Price"
        ),
        commodity!(
            "Cobalt (Co)",
            Category::Industry,
            Some("LMCODY Comdty"),
            None::<&str>,
            "Spot (LME Cash)",
            "USD/MT",
            "LME Cobalt Cash Settlement Price"
        ),
        commodity!(
            "Iron Ore (FeO)",
            Category::Industry,
            Some("ISIX62IU Index"),
            Some("CN62SPOT KLSH Index"),
            "Spot",
            "USD/MT",
            "Iron Ore Spot Price Index 62% Import Fine Ore CFR Qingdao"
        ),
        commodity!(
            "Iron Ore (FeO) Alt.",
            Category::Industry,
            Some("SCOM5 COMB Comdty"),
            None::<&str>,
            "Futures",
            "USD/MT",
            "SGX Iron Ore 62% TSI Active Futures"
        ),
        commodity!(
            "Germanium (Ge)",
            Category::Industry,
            Some("GECNMVKY AMTL Index"),
            None::<&str>,
            "Spot",
            "USD/kg",
            "China Germanium Metal 99.99% FOB"
        ),
        commodity!(
            "Oil",
            Category::Industry,
            Some("USCRWTIC Index"),
            None::<&str>,
            "Spot",
            "USD/barrel",
            "Crude Oil Domestic Sweet Cushing Cash Formula (WTI)"
        ),
        commodity!(
            "WCS Differential",
            Category::Additional,
            Some("WC1DSPOT MRXI Index"),
            Some("USCRWCAS Index"),
            "Spot Differential / Spot Price",
            "USD/barrel",
            "Western Canada Select vs WTI differential at Cushing"
        ),
        commodity!(
            "US HRC Steel",
            Category::Additional,
            Some("HRC1 Comdty"),
            Some("STANHCXW KLSH Index"),
            "Futures / Spot",
            "USD/short ton",
            "US Midwest Domestic Hot-Rolled Coil Steel Index Futures"
        ),
        commodity!(
            "Antimony",
            Category::Additional,
            Some("CCSMANT1 Index"),
            None::<&str>,
            "Spot",
            "CNY/MT",
            "China Shanghai Changjiang Antimony Grade 1 Spot Price"
        ),
        commodity!(
            "Indium",
            Category::Additional,
            Some("IUCNRZYP SMET Index"),
            None::<&str>,
            "Spot",
            "CNY/kg",
            "China Indium 99.99% Shanghai Spot"
        ),
        commodity!(
            "Cadmium",
            Category::Additional,
            Some("CMCNCUJV AMTL Index"),
            None::<&str>,
            "Spot",
            "CNY/MT",
            "China Cadmium Ingot 99.99% EXW"
        ),
        commodity!(
            "Sulphur",
            Category::Additional,
            None::<&str>,
            None::<&str>,
            "Spot",
            "USD/MT",
            "Sulphur price - no terminal coverage, sample data only"
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_shape() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 21);

        let copper = catalog.iter().find(|c| c.name == "Copper (Cu)").unwrap();
        assert_eq!(copper.category, Category::Core);
        assert_eq!(copper.primary_ticker(), Some("LMCADY Comdty"));

        // Sulphur has no terminal coverage at all.
        let sulphur = catalog.iter().find(|c| c.name == "Sulphur").unwrap();
        assert!(sulphur.primary_ticker().is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let cfg: Config = toml::from_str(
            r#"
            [source]
            endpoint = "http://localhost:8194"

            [[commodities]]
            name = "Copper (Cu)"
            category = "core"
            preferred_ticker = "LMCADY Comdty"
            description = "LME Copper"
            kind = "Spot (LME Cash)"
            units = "USD/MT"
            data_source = "Terminal"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.source.endpoint.as_deref(), Some("http://localhost:8194"));
        assert!(cfg.source.synthetic_fallback);
        assert_eq!(cfg.source.timeout_secs, 30);
        assert_eq!(cfg.commodities.len(), 1);
        assert_eq!(cfg.logging.log_dir, "logs");
        assert_eq!(cfg.dashboard.default_frequency, Frequency::Monthly);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.commodities.len(), 21);
        assert!(cfg.source.endpoint.is_none());
    }

    #[test]
    fn test_commodity_lookup() {
        let cfg = Config::default();
        assert!(cfg.commodity("Gold (Au)").is_some());
        assert!(cfg.commodity("Unobtainium").is_none());
    }
}
