use crate::error::PoolError;
use alloy_primitives::{Address, U256};

/// An ERC-20 token on a specific chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Token {
    pub chain_id: u64,
    pub address: Address,
    pub decimals: u8,
    pub symbol: Option<String>,
}

impl Token {
    pub fn new(chain_id: u64, address: Address, decimals: u8, symbol: Option<&str>) -> Self {
        Self {
            chain_id,
            address,
            decimals,
            symbol: symbol.map(str::to_owned),
        }
    }

    /// Whether `self` is token0 of a pair with `other`, comparing addresses
    /// numerically.
    pub fn sorts_before(&self, other: &Token) -> Result<bool, PoolError> {
        if self.chain_id != other.chain_id {
            return Err(PoolError::ChainMismatch(self.chain_id, other.chain_id));
        }
        if self.address == other.address {
            return Err(PoolError::IdenticalTokens);
        }
        Ok(self.address < other.address)
    }

    /// Same chain and address; decimals and symbol are not compared.
    #[inline]
    pub fn equals(&self, other: &Token) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

/// A raw amount of a token, in its smallest unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenAmount {
    pub token: Token,
    raw: U256,
}

impl TokenAmount {
    #[inline]
    pub fn new(token: Token, raw: U256) -> Self {
        Self { token, raw }
    }

    #[inline]
    pub fn raw(&self) -> U256 {
        self.raw
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }
}
