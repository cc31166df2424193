use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy::rpc::types::eth::Log;
use alloy::rpc::types::Filter;
use alloy::sol;
use alloy::transports::http::reqwest::Url;
use anyhow::Result;

use crate::decode::topic0;
use crate::events::EventKind;

sol! {
    #[sol(rpc)]
    contract PriceSubmitter {
        function getFtsoManager() external view returns (address);
    }

    #[sol(rpc)]
    contract FtsoManager {
        function getFtsos() external view returns (address[] memory);
    }

    #[sol(rpc)]
    contract Ftso {
        function symbol() external view returns (string memory);
    }
}

/// Everything the pipeline needs from the node. Kept synchronous so the
/// scheduler stays a plain single-threaded loop; implementations may spin up
/// a runtime internally.
pub trait ChainSource {
    fn latest_block(&self) -> Result<u64>;
    fn manager_address(&self, registry: Address) -> Result<Address>;
    fn feed_addresses(&self, manager: Address) -> Result<Vec<Address>>;
    fn feed_symbol(&self, feed: Address) -> Result<String>;
    fn logs(&self, contract: Address, kind: EventKind, from: u64, to: u64) -> Result<Vec<Log>>;
}

#[derive(Clone)]
pub struct AlloyProvider {
    pub url: Url,
}

impl ChainSource for AlloyProvider {
    fn latest_block(&self) -> Result<u64> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(rt.block_on(
            alloy::providers::ProviderBuilder::new()
                .on_http(self.url.clone())
                .get_block_number(),
        )?)
    }

    fn manager_address(&self, registry: Address) -> Result<Address> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(rt.block_on(async {
            let provider = alloy::providers::ProviderBuilder::new().on_http(self.url.clone());
            PriceSubmitter::new(registry, provider)
                .getFtsoManager()
                .call()
                .await
        })?
        ._0)
    }

    fn feed_addresses(&self, manager: Address) -> Result<Vec<Address>> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(rt.block_on(async {
            let provider = alloy::providers::ProviderBuilder::new().on_http(self.url.clone());
            FtsoManager::new(manager, provider).getFtsos().call().await
        })?
        ._0)
    }

    fn feed_symbol(&self, feed: Address) -> Result<String> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(rt.block_on(async {
            let provider = alloy::providers::ProviderBuilder::new().on_http(self.url.clone());
            Ftso::new(feed, provider).symbol().call().await
        })?
        ._0)
    }

    fn logs(&self, contract: Address, kind: EventKind, from: u64, to: u64) -> Result<Vec<Log>> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(rt.block_on(
            alloy::providers::ProviderBuilder::new()
                .on_http(self.url.clone())
                .get_logs(
                    &Filter::new()
                        .from_block(from)
                        .to_block(to)
                        .address(contract)
                        .event_signature(topic0(kind)),
                ),
        )?)
    }
}
