use soroban_sdk::{contracttype, Address, BytesN, U256};

/// Lifecycle of the singleton game.
///
/// NotStarted → Open → AwaitingRandomness → Settled → Open → ...
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum GameStatus {
    NotStarted = 0,
    Open = 1,
    AwaitingRandomness = 2,
    Settled = 3,
}

/// How a random word is mapped onto the ledger.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum SelectionMode {
    /// One ticket per join, `random_word mod len(ledger)`
    Ticket = 0,
    /// Probability of winning proportional to contributed amount
    Weighted = 1,
}

/// Subscription-funded oracle with an interval-gated, permissionless draw.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RaffleParams {
    pub key_hash: BytesN<32>,
    pub subscription_id: u64,
    pub request_confirmations: u32,
    pub callback_gas_limit: u32,
    /// Seconds that must elapse after the round starts before a draw
    pub interval: u64,
}

/// Directly funded oracle: the game pays `fee` of `fee_token` per request.
/// Draws are owner-only.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RandomWinnerParams {
    pub key_hash: BytesN<32>,
    pub fee_token: Address,
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameVariant {
    Raffle(RaffleParams),
    RandomWinner(RandomWinnerParams),
}

/// Immutable configuration supplied at deployment.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameConfig {
    pub owner: Address,
    pub coordinator: Address,
    /// Token the entries are paid in and the pool is paid out in
    pub pool_token: Address,
    pub entry_fee: i128,
    pub selection: SelectionMode,
    pub variant: GameVariant,
}

/// One paid join. The same participant may appear any number of times.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub participant: Address,
    pub amount: i128,
}

/// Outcome of a settled round.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundResult {
    pub winner: Address,
    pub payout: i128,
    pub request_id: u64,
    pub random_word: U256,
    pub settled_at: u64,
}
