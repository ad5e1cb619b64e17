use soroban_sdk::{contractclient, Address, BytesN, Env};

/// Oracle coordinator interface consumed by the game.
///
/// The coordinator answers each request later by invoking
/// `fulfill_random_words(coordinator, request_id, random_words)` on the consumer.
#[contractclient(name = "VrfCoordinatorClient")]
pub trait VrfCoordinator {
    /// Subscription-funded request. Returns the request id.
    fn request_random_words(
        env: Env,
        consumer: Address,
        key_hash: BytesN<32>,
        subscription_id: u64,
        minimum_confirmations: u32,
        callback_gas_limit: u32,
        num_words: u32,
    ) -> u64;

    /// Direct-funded request; `fee` has already been transferred to the
    /// coordinator by the consumer. Returns the request id.
    fn request_randomness(env: Env, consumer: Address, key_hash: BytesN<32>, fee: i128) -> u64;
}
