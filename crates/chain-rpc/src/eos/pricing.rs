//! EOS resource pricing: RAM from the bonding curve, NET/CPU from a
//! reference account's stake-to-limit ratio.

use crate::error::ClientError;

use super::types::{AccountResources, NetCpuPrice, RamMarketRow};

/// Staked weights are reported in 1/10000 EOS.
const WEIGHT_PER_EOS: f64 = 10_000.0;
const BYTES_PER_KB: f64 = 1024.0;
const MICROS_PER_MS: f64 = 1000.0;

/// RAM price in EOS per KB: `quote / (1 + base / 1024)`.
pub fn ram_price(row: &RamMarketRow) -> Result<f64, ClientError> {
    let quote = asset_amount(&row.quote.balance)?;
    let base = asset_amount(&row.base.balance)?;
    Ok(round4(quote / (1.0 + base / BYTES_PER_KB)))
}

/// NET price (EOS per KB) and CPU price (EOS per ms) implied by `account`.
///
/// Fails when the account reports no available NET or CPU, since the ratio
/// would be infinite.
pub fn net_cpu_price(account: &AccountResources) -> Result<NetCpuPrice, ClientError> {
    let net_staked = account.net_weight as f64 / WEIGHT_PER_EOS;
    let net_available = account.net_limit.max as f64 / BYTES_PER_KB;

    let cpu_staked = account.cpu_weight as f64 / WEIGHT_PER_EOS;
    let cpu_available = account.cpu_limit.max as f64 / MICROS_PER_MS;

    let exhausted: Vec<&str> = [("NET", net_available), ("CPU", cpu_available)]
        .into_iter()
        .filter(|(_, available)| *available == 0.0)
        .map(|(name, _)| name)
        .collect();
    if !exhausted.is_empty() {
        return Err(ClientError::Guard(format!(
            "[EOS::get_net_and_cpu_price] reference account `{}` reports zero available {}; \
             pick an account with staked resources",
            account.account_name,
            exhausted.join(" and ")
        )));
    }

    Ok(NetCpuPrice {
        net_price: round4(net_staked / net_available),
        cpu_price: round4(cpu_staked / cpu_available),
    })
}

/// Numeric part of an asset string such as `"100.0000 EOS"`.
pub fn asset_amount(asset: &str) -> Result<f64, ClientError> {
    let amount = asset.split_whitespace().next().unwrap_or_default();
    amount
        .parse::<f64>()
        .map_err(|e| ClientError::invalid_response(format!("asset `{asset}`: {e}")))
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eos::types::{Connector, ResourceLimit};

    fn ram_row(quote: &str, base: &str) -> RamMarketRow {
        RamMarketRow {
            supply: "10000000000.0000 RAMCORE".into(),
            base: Connector {
                balance: base.into(),
                weight: "0.50000000000000000".into(),
            },
            quote: Connector {
                balance: quote.into(),
                weight: "0.50000000000000000".into(),
            },
        }
    }

    fn account(net_weight: i64, net_max: i64, cpu_weight: i64, cpu_max: i64) -> AccountResources {
        AccountResources {
            account_name: "heztanrqgene".into(),
            net_weight,
            cpu_weight,
            net_limit: ResourceLimit {
                used: 0,
                available: net_max,
                max: net_max,
            },
            cpu_limit: ResourceLimit {
                used: 0,
                available: cpu_max,
                max: cpu_max,
            },
        }
    }

    #[test]
    fn ram_price_follows_bonding_curve() {
        let price = ram_price(&ram_row("100.0000 EOS", "1024.0000 RAM")).unwrap();
        assert_eq!(price, 50.0);
    }

    #[test]
    fn ram_price_rounds_to_four_places() {
        let price = ram_price(&ram_row("10.0000 EOS", "2048 RAM")).unwrap();
        assert_eq!(price, 3.3333);
    }

    #[test]
    fn malformed_asset_is_rejected() {
        let err = ram_price(&ram_row("lots EOS", "1024 RAM")).expect_err("must reject");
        assert!(err.to_string().contains("lots EOS"));
    }

    #[test]
    fn net_cpu_price_normalizes_units() {
        // 10 EOS over 2 KB of NET, 20 EOS over 4 ms of CPU.
        let price = net_cpu_price(&account(100_000, 2048, 200_000, 4000)).unwrap();
        assert_eq!(price.net_price, 5.0);
        assert_eq!(price.cpu_price, 5.0);
    }

    #[test]
    fn zero_net_is_an_explicit_error() {
        let err = net_cpu_price(&account(100_000, 0, 200_000, 4000)).expect_err("must guard");
        assert!(matches!(err, ClientError::Guard(_)));
        let message = err.to_string();
        assert!(message.contains("zero available NET"), "{message}");
        assert!(!message.contains("CPU"), "{message}");
    }

    #[test]
    fn zero_cpu_and_net_are_both_named() {
        let err = net_cpu_price(&account(1, 0, 1, 0)).expect_err("must guard");
        assert!(err.to_string().contains("NET and CPU"));
    }
}
