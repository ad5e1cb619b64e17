#![no_std]

mod coordinator;
mod error;
mod events;
pub mod settlement;
mod storage;
mod types;

pub use coordinator::VrfCoordinatorClient;
pub use error::GameError;
pub use types::{
    Entry, GameConfig, GameStatus, GameVariant, RaffleParams, RandomWinnerParams, RoundResult,
    SelectionMode,
};

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Vec, U256};
use storage::{
    DataKey, MAX_ENTRIES_PER_ROUND, MAX_REQUEST_CONFIRMATIONS, MIN_REQUEST_CONFIRMATIONS, NUM_WORDS,
};

/// Random Winner Game Contract
///
/// A lottery that collects entries in a pool token, asks an external
/// randomness coordinator for a random word, and pays the whole pool to
/// one participant once the word is delivered.
///
/// Lifecycle:
/// - Owner starts a round (`start_new_game`)
/// - Participants join by paying at least the entry fee (`add_balance`)
/// - A draw issues exactly one randomness request (`request_random_winner`)
/// - The coordinator answers through `fulfill_random_words`, which selects
///   the winner, transfers the pool and settles the round
///
/// Two variants share this state machine:
/// - `Raffle`: subscription-funded oracle, anyone may draw once the
///   configured interval has elapsed since the round started
/// - `RandomWinner`: oracle paid per request in a fee token, owner-only draw
#[contract]
pub struct RandomWinnerGame;

#[contractimpl]
impl RandomWinnerGame {
    /// Constructor: called automatically on deployment.
    ///
    /// Delegates to initialize() for the actual setup logic.
    pub fn __constructor(env: Env, config: GameConfig) {
        Self::initialize(env, config).expect("initialization failed");
    }

    /// Store the immutable game configuration.
    ///
    /// Can be called directly for manual deployment, or via constructor.
    /// The game starts in `NotStarted`; the owner opens the first round.
    pub fn initialize(env: Env, config: GameConfig) -> Result<(), GameError> {
        if storage::has(&env, &DataKey::Owner) {
            return Err(GameError::AlreadyInitialized);
        }

        Self::validate_config(&config)?;

        config.owner.require_auth();

        storage::write(&env, &DataKey::Owner, &config.owner);
        storage::write(&env, &DataKey::Coordinator, &config.coordinator);
        storage::write(&env, &DataKey::PoolToken, &config.pool_token);
        storage::write(&env, &DataKey::EntryFee, &config.entry_fee);
        storage::write(&env, &DataKey::Selection, &config.selection);
        storage::write(&env, &DataKey::Variant, &config.variant);
        storage::write(&env, &DataKey::Status, &GameStatus::NotStarted);
        storage::write(&env, &DataKey::TotalBalance, &0i128);
        storage::write(&env, &DataKey::StartedAt, &0u64);
        storage::write(&env, &DataKey::Round, &0u32);
        storage::extend_instance(&env);

        Ok(())
    }

    /// Open a new round (owner only).
    ///
    /// Clears the participant ledger and the pool balance left by any
    /// previous round and records the start time.
    ///
    /// # Arguments
    /// * `caller` - Must match the owner set at initialization
    ///
    /// # Returns
    /// The number of the round just opened (first round is 1)
    pub fn start_new_game(env: Env, caller: Address) -> Result<u32, GameError> {
        Self::require_initialized(&env)?;
        Self::require_owner(&env, &caller)?;
        caller.require_auth();

        let status: GameStatus = storage::read(&env, &DataKey::Status)?;
        if status == GameStatus::Open || status == GameStatus::AwaitingRandomness {
            return Err(GameError::GameInProgress);
        }

        let previous: u32 = storage::read(&env, &DataKey::Round)?;
        storage::remove_entries(&env, previous);

        let round = previous.checked_add(1).ok_or(GameError::Overflow)?;
        let started_at = env.ledger().timestamp();

        storage::write(&env, &DataKey::Round, &round);
        storage::write(&env, &DataKey::TotalBalance, &0i128);
        storage::write(&env, &DataKey::StartedAt, &started_at);
        storage::write(&env, &DataKey::Status, &GameStatus::Open);
        storage::extend_instance(&env);

        events::game_started(&env, round, started_at);

        Ok(round)
    }

    /// Join the open round.
    ///
    /// Every call is a separate entry, including repeated calls by the same
    /// participant.
    ///
    /// # Arguments
    /// * `participant` - Address paying the entry (must authorize)
    /// * `amount` - Pool token amount, at least the entry fee
    ///
    /// # Returns
    /// Pool balance after this entry
    pub fn add_balance(env: Env, participant: Address, amount: i128) -> Result<i128, GameError> {
        Self::require_initialized(&env)?;
        Self::require_open(&env)?;

        let entry_fee: i128 = storage::read(&env, &DataKey::EntryFee)?;
        if amount < entry_fee {
            return Err(GameError::InsufficientValue);
        }

        let round: u32 = storage::read(&env, &DataKey::Round)?;
        let mut entries = storage::read_entries(&env, round);
        if entries.len() >= MAX_ENTRIES_PER_ROUND {
            return Err(GameError::RoundFull);
        }

        let total: i128 = storage::read(&env, &DataKey::TotalBalance)?;
        let new_total = total.checked_add(amount).ok_or(GameError::Overflow)?;

        participant.require_auth();

        // Panics on insufficient balance or missing authorization, aborting the entry.
        let pool_token: Address = storage::read(&env, &DataKey::PoolToken)?;
        token::Client::new(&env, &pool_token).transfer(
            &participant,
            &env.current_contract_address(),
            &amount,
        );

        entries.push_back(Entry {
            participant: participant.clone(),
            amount,
        });
        storage::write_entries(&env, round, &entries);
        storage::write(&env, &DataKey::TotalBalance, &new_total);
        storage::extend_instance(&env);

        events::entry_added(&env, &participant, amount, new_total);

        Ok(new_total)
    }

    /// Close the round to entries and ask the coordinator for randomness.
    ///
    /// `RandomWinner`: owner only; the oracle fee is paid from the game's own
    /// fee token balance. `Raffle`: any caller, once the configured interval
    /// has elapsed since the round started.
    ///
    /// # Arguments
    /// * `caller` - Address triggering the draw (must authorize)
    ///
    /// # Returns
    /// The coordinator's request id
    pub fn request_random_winner(env: Env, caller: Address) -> Result<u64, GameError> {
        Self::require_initialized(&env)?;
        Self::require_open(&env)?;

        let variant: GameVariant = storage::read(&env, &DataKey::Variant)?;
        match &variant {
            GameVariant::RandomWinner(_) => Self::require_owner(&env, &caller)?,
            GameVariant::Raffle(params) => {
                if !Self::interval_elapsed(&env, params.interval)? {
                    return Err(GameError::DrawTooEarly);
                }
            }
        }

        caller.require_auth();

        let round: u32 = storage::read(&env, &DataKey::Round)?;
        if storage::read_entries(&env, round).is_empty() {
            return Err(GameError::NoParticipants);
        }

        let coordinator: Address = storage::read(&env, &DataKey::Coordinator)?;
        let client = VrfCoordinatorClient::new(&env, &coordinator);
        let consumer = env.current_contract_address();

        let request_id = match variant {
            GameVariant::Raffle(params) => client.request_random_words(
                &consumer,
                &params.key_hash,
                &params.subscription_id,
                &params.request_confirmations,
                &params.callback_gas_limit,
                &NUM_WORDS,
            ),
            GameVariant::RandomWinner(params) => {
                if params.fee > 0 {
                    let fee_token = token::Client::new(&env, &params.fee_token);
                    if fee_token.balance(&consumer) < params.fee {
                        return Err(GameError::InsufficientOracleFunds);
                    }
                    fee_token.transfer(&consumer, &coordinator, &params.fee);
                }
                client.request_randomness(&consumer, &params.key_hash, &params.fee)
            }
        };

        storage::write(&env, &DataKey::PendingRequest, &request_id);
        storage::write(&env, &DataKey::Status, &GameStatus::AwaitingRandomness);
        storage::extend_instance(&env);

        events::randomness_requested(&env, round, request_id);

        Ok(request_id)
    }

    /// Randomness callback (coordinator only).
    ///
    /// Accepted only for the single outstanding request. Selects the winner,
    /// transfers the whole pool and settles the round. Any failure, including
    /// a rejected payout, aborts the call and leaves the round awaiting
    /// randomness with its request still pending.
    ///
    /// # Arguments
    /// * `caller` - Must match the coordinator set at initialization
    /// * `request_id` - Id returned by the coordinator at request time
    /// * `random_words` - Delivered words; the first one decides the winner
    pub fn fulfill_random_words(
        env: Env,
        caller: Address,
        request_id: u64,
        random_words: Vec<U256>,
    ) -> Result<(), GameError> {
        Self::require_initialized(&env)?;

        let coordinator: Address = storage::read(&env, &DataKey::Coordinator)?;
        if caller != coordinator {
            return Err(GameError::Unauthorized);
        }
        caller.require_auth();

        match storage::read_pending_request(&env) {
            Some(pending) if pending == request_id => {}
            _ => {
                log!(&env, "rejected fulfillment for request", request_id);
                return Err(GameError::UnknownRequest);
            }
        }

        let random_word = random_words.get(0).ok_or(GameError::InvalidRandomness)?;

        Self::settle(&env, request_id, random_word)
    }

    /// Whether a non-owner draw would currently succeed (Raffle only).
    pub fn check_upkeep(env: Env) -> Result<bool, GameError> {
        Self::require_initialized(&env)?;

        let variant: GameVariant = storage::read(&env, &DataKey::Variant)?;
        let GameVariant::Raffle(params) = variant else {
            return Ok(false);
        };

        let status: GameStatus = storage::read(&env, &DataKey::Status)?;
        if status != GameStatus::Open {
            return Ok(false);
        }

        let round: u32 = storage::read(&env, &DataKey::Round)?;
        if storage::read_entries(&env, round).is_empty() {
            return Ok(false);
        }

        Self::interval_elapsed(&env, params.interval)
    }

    /// True while a round is open or awaiting randomness.
    pub fn game_started(env: Env) -> Result<bool, GameError> {
        let status = Self::status(env)?;
        Ok(status == GameStatus::Open || status == GameStatus::AwaitingRandomness)
    }

    /// Pool balance of the current round.
    pub fn total_balance(env: Env) -> Result<i128, GameError> {
        Self::require_initialized(&env)?;
        storage::read(&env, &DataKey::TotalBalance)
    }

    /// Minimum amount per entry.
    pub fn entry_fee(env: Env) -> Result<i128, GameError> {
        Self::require_initialized(&env)?;
        storage::read(&env, &DataKey::EntryFee)
    }

    pub fn status(env: Env) -> Result<GameStatus, GameError> {
        Self::require_initialized(&env)?;
        storage::read(&env, &DataKey::Status)
    }

    pub fn owner(env: Env) -> Result<Address, GameError> {
        Self::require_initialized(&env)?;
        storage::read(&env, &DataKey::Owner)
    }

    pub fn coordinator(env: Env) -> Result<Address, GameError> {
        Self::require_initialized(&env)?;
        storage::read(&env, &DataKey::Coordinator)
    }

    pub fn pool_token(env: Env) -> Result<Address, GameError> {
        Self::require_initialized(&env)?;
        storage::read(&env, &DataKey::PoolToken)
    }

    pub fn variant(env: Env) -> Result<GameVariant, GameError> {
        Self::require_initialized(&env)?;
        storage::read(&env, &DataKey::Variant)
    }

    pub fn selection(env: Env) -> Result<SelectionMode, GameError> {
        Self::require_initialized(&env)?;
        storage::read(&env, &DataKey::Selection)
    }

    /// Ledger timestamp at which the current round was opened.
    pub fn started_at(env: Env) -> Result<u64, GameError> {
        Self::require_initialized(&env)?;
        storage::read(&env, &DataKey::StartedAt)
    }

    /// Current round number (0 before the first start).
    pub fn round(env: Env) -> Result<u32, GameError> {
        Self::require_initialized(&env)?;
        storage::read(&env, &DataKey::Round)
    }

    /// Outstanding request id, if a draw is awaiting randomness.
    pub fn pending_request(env: Env) -> Option<u64> {
        storage::read_pending_request(&env)
    }

    /// Participant ledger of the current round, in join order.
    pub fn entries(env: Env) -> Result<Vec<Entry>, GameError> {
        let round = Self::round(env.clone())?;
        Ok(storage::read_entries(&env, round))
    }

    pub fn entry_count(env: Env) -> Result<u32, GameError> {
        Ok(Self::entries(env)?.len())
    }

    /// Winner of the last settled round.
    pub fn recent_winner(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::RecentWinner)
    }

    pub fn round_result(env: Env, round: u32) -> Option<RoundResult> {
        storage::read_round_result(&env, round)
    }

    // --- Internal helpers ---

    /// Pay the pool to the selected entry and settle the round.
    fn settle(env: &Env, request_id: u64, random_word: U256) -> Result<(), GameError> {
        let round: u32 = storage::read(env, &DataKey::Round)?;
        let entries = storage::read_entries(env, round);
        let total: i128 = storage::read(env, &DataKey::TotalBalance)?;
        let selection: SelectionMode = storage::read(env, &DataKey::Selection)?;

        let index = settlement::winner_index(env, &entries, total, &random_word, selection)?;
        let winner = entries
            .get(index)
            .ok_or(GameError::StorageCorrupted)?
            .participant;

        let pool_token: Address = storage::read(env, &DataKey::PoolToken)?;
        let token_client = token::Client::new(env, &pool_token);
        match token_client.try_transfer(&env.current_contract_address(), &winner, &total) {
            Ok(Ok(())) => {}
            _ => {
                log!(env, "payout failed", round, winner);
                return Err(GameError::PayoutFailed);
            }
        }

        storage::remove_entries(env, round);
        storage::clear_pending_request(env);
        storage::write(env, &DataKey::TotalBalance, &0i128);
        storage::write(env, &DataKey::Status, &GameStatus::Settled);
        storage::write(env, &DataKey::RecentWinner, &winner);
        storage::write_round_result(
            env,
            round,
            &RoundResult {
                winner: winner.clone(),
                payout: total,
                request_id,
                random_word: random_word.clone(),
                settled_at: env.ledger().timestamp(),
            },
        );
        storage::extend_instance(env);

        events::winner_paid(env, round, &winner, total, &random_word);

        Ok(())
    }

    fn validate_config(config: &GameConfig) -> Result<(), GameError> {
        if config.entry_fee <= 0 {
            return Err(GameError::InvalidConfig);
        }

        match &config.variant {
            GameVariant::Raffle(params) => {
                if params.interval == 0 || params.callback_gas_limit == 0 {
                    return Err(GameError::InvalidConfig);
                }
                if params.request_confirmations < MIN_REQUEST_CONFIRMATIONS
                    || params.request_confirmations > MAX_REQUEST_CONFIRMATIONS
                {
                    return Err(GameError::InvalidConfig);
                }
            }
            GameVariant::RandomWinner(params) => {
                if params.fee < 0 {
                    return Err(GameError::InvalidConfig);
                }
                // The oracle fee must never be drawn from the pool.
                if params.fee_token == config.pool_token {
                    return Err(GameError::InvalidConfig);
                }
            }
        }

        Ok(())
    }

    fn interval_elapsed(env: &Env, interval: u64) -> Result<bool, GameError> {
        let started_at: u64 = storage::read(env, &DataKey::StartedAt)?;
        Ok(env.ledger().timestamp() >= started_at.saturating_add(interval))
    }

    fn require_initialized(env: &Env) -> Result<(), GameError> {
        if !storage::has(env, &DataKey::Owner) {
            return Err(GameError::NotInitialized);
        }
        Ok(())
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), GameError> {
        let owner: Address = storage::read(env, &DataKey::Owner)?;
        if *caller != owner {
            return Err(GameError::Unauthorized);
        }
        Ok(())
    }

    fn require_open(env: &Env) -> Result<(), GameError> {
        let status: GameStatus = storage::read(env, &DataKey::Status)?;
        if status != GameStatus::Open {
            return Err(GameError::GameNotStarted);
        }
        Ok(())
    }
}
