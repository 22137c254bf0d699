use crate::error::PoolError;
use alloy_primitives::{Address, B256, address, b256, keccak256};

/// Canonical Uniswap V3 factory on Ethereum mainnet.
pub const FACTORY_ADDRESS: Address = address!("0x1F98431c8aD98523631AE4a59f267346ea31F984");

/// `keccak256` of the pool creation code deployed by [`FACTORY_ADDRESS`].
pub const POOL_INIT_CODE_HASH: B256 =
    b256!("0xe34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54");

/// CREATE2 address of the pool for a token pair and fee, in either token
/// order. The salt is `keccak256(abi.encode(token0, token1, fee))`.
pub fn compute_pool_address(
    factory: Address,
    token_a: Address,
    token_b: Address,
    fee: u32,
    init_code_hash: B256,
) -> Result<Address, PoolError> {
    if token_a == token_b {
        return Err(PoolError::IdenticalTokens);
    }
    let (token0, token1) = if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };

    let mut encoded = [0u8; 96];
    encoded[12..32].copy_from_slice(token0.as_slice());
    encoded[44..64].copy_from_slice(token1.as_slice());
    encoded[92..96].copy_from_slice(&fee.to_be_bytes());

    Ok(factory.create2(keccak256(encoded), init_code_hash))
}
