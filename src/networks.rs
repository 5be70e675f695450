//! Redes conocidas y sus cuentas nombradas predefinidas.
use std::collections::BTreeMap;

use deploy_core::constants::DEPLOYER_ROLE;
use deploy_core::{Address, NamedAccounts};

use crate::errors::ConfigError;

const LAYERZERO_ENDPOINT_V2: &str = "0x6EDCE65403992e310A62460808c4b910D972f10f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkPreset {
    pub name: &'static str,
    pub chain_id: u64,
    pub named_accounts: &'static [(&'static str, &'static str)],
}

pub const NETWORKS: &[NetworkPreset] = &[NetworkPreset { name: "hardhat",
                                                         chain_id: 31337,
                                                         named_accounts: &[] },
                                         NetworkPreset { name: "optimismSepolia",
                                                         chain_id: 11155420,
                                                         named_accounts: &[("endpointv2", LAYERZERO_ENDPOINT_V2)] },
                                         NetworkPreset { name: "baseSepolia",
                                                         chain_id: 84532,
                                                         named_accounts: &[("endpointv2", LAYERZERO_ENDPOINT_V2)] }];

pub fn preset(name: &str) -> Option<&'static NetworkPreset> {
    NETWORKS.iter().find(|n| n.name == name)
}

pub fn known_names() -> Vec<&'static str> {
    NETWORKS.iter().map(|n| n.name).collect()
}

/// Cuentas de `network`: presets, luego `extra` (entorno) y por último el
/// deployer, cada capa pisando a la anterior.
pub fn named_accounts(network: &str,
                      deployer: Option<&Address>,
                      extra: &BTreeMap<String, Address>)
                      -> Result<NamedAccounts, ConfigError> {
    let preset = preset(network).ok_or_else(|| ConfigError::UnknownNetwork(network.to_string()))?;
    let mut accounts = NamedAccounts::new(preset.name);
    for (role, raw) in preset.named_accounts {
        let address = Address::parse(raw).map_err(|e| ConfigError::invalid(role, raw, e.to_string()))?;
        accounts.insert(*role, address);
    }
    for (role, address) in extra {
        accounts.insert(role.clone(), address.clone());
    }
    if let Some(deployer) = deployer {
        accounts.insert(DEPLOYER_ROLE, deployer.clone());
    }
    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testnets_carry_the_endpoint() {
        for name in ["optimismSepolia", "baseSepolia"] {
            let accounts = named_accounts(name, None, &BTreeMap::new()).expect("accounts");
            assert_eq!(accounts.get("endpointv2").map(Address::as_str),
                       Some("0x6edce65403992e310a62460808c4b910d972f10f"));
        }
        assert_eq!(preset("optimismSepolia").map(|p| p.chain_id), Some(11155420));
        assert_eq!(preset("baseSepolia").map(|p| p.chain_id), Some(84532));
    }

    #[test]
    fn overrides_and_deployer_are_layered() {
        let deployer = Address::from_bytes(&[0xde; 20]);
        let mut extra = BTreeMap::new();
        extra.insert("endpointv2".to_string(), Address::from_bytes(&[0x01; 20]));
        let accounts = named_accounts("baseSepolia", Some(&deployer), &extra).expect("accounts");
        assert_eq!(accounts.get("endpointv2"), Some(&Address::from_bytes(&[0x01; 20])));
        assert_eq!(accounts.get("deployer"), Some(&deployer));
    }

    #[test]
    fn unknown_network_is_rejected() {
        assert_eq!(named_accounts("mainnet", None, &BTreeMap::new()).unwrap_err(),
                   ConfigError::UnknownNetwork("mainnet".into()));
    }
}
