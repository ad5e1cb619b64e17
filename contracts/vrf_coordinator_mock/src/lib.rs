#![no_std]

use soroban_sdk::{
    contract, contractclient, contracterror, contractimpl, contracttype, log, symbol_short,
    Address, Bytes, BytesN, Env, Vec, U256,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum CoordinatorError {
    /// Coordinator already initialized
    AlreadyInitialized = 1,
    /// Coordinator not initialized
    NotInitialized = 2,
    /// No outstanding request with this id
    UnknownRequest = 3,
    /// num_words is zero, above MAX_NUM_WORDS, or does not match the request
    InvalidNumWords = 4,
    /// minimum_confirmations outside the accepted range
    InvalidConfirmations = 5,
    /// Direct funding fee is negative
    InvalidFee = 6,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Operator allowed to fulfill requests
    Admin,
    /// Id handed out to the next request
    NextRequestId,
    /// Outstanding RandomnessRequest by id
    Request(u64),
}

/// An outstanding randomness request.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RandomnessRequest {
    pub consumer: Address,
    pub key_hash: BytesN<32>,
    /// 0 for direct-funded requests
    pub subscription_id: u64,
    pub minimum_confirmations: u32,
    pub callback_gas_limit: u32,
    pub num_words: u32,
    /// Fee paid up front for direct-funded requests, 0 otherwise
    pub fee: i128,
    /// Ledger sequence at request time
    pub requested_at: u32,
}

pub const MAX_NUM_WORDS: u32 = 500;
pub const MIN_REQUEST_CONFIRMATIONS: u32 = 3;
pub const MAX_REQUEST_CONFIRMATIONS: u32 = 200;

/// Callback every consumer must expose.
#[contractclient(name = "VrfConsumerClient")]
pub trait VrfConsumer {
    fn fulfill_random_words(env: Env, coordinator: Address, request_id: u64, random_words: Vec<U256>);
}

/// VRF Coordinator Mock
///
/// Local stand-in for an oracle randomness coordinator. Requests are recorded
/// and answered later by the admin, who either lets the mock derive the words
/// or supplies them. A consumer whose callback fails does not revert the
/// fulfillment; the outcome is reported in the return value and event.
#[contract]
pub struct VrfCoordinatorMock;

#[contractimpl]
impl VrfCoordinatorMock {
    pub fn __constructor(env: Env, admin: Address) {
        Self::initialize(env, admin).expect("initialization failed");
    }

    /// Initialize the coordinator.
    ///
    /// # Arguments
    /// * `admin` - Address that can fulfill requests
    pub fn initialize(env: Env, admin: Address) -> Result<(), CoordinatorError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(CoordinatorError::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::NextRequestId, &1u64);

        Ok(())
    }

    /// Record a subscription-funded request.
    ///
    /// # Returns
    /// The request id
    pub fn request_random_words(
        env: Env,
        consumer: Address,
        key_hash: BytesN<32>,
        subscription_id: u64,
        minimum_confirmations: u32,
        callback_gas_limit: u32,
        num_words: u32,
    ) -> Result<u64, CoordinatorError> {
        Self::require_initialized(&env)?;

        if num_words == 0 || num_words > MAX_NUM_WORDS {
            return Err(CoordinatorError::InvalidNumWords);
        }
        if minimum_confirmations < MIN_REQUEST_CONFIRMATIONS
            || minimum_confirmations > MAX_REQUEST_CONFIRMATIONS
        {
            return Err(CoordinatorError::InvalidConfirmations);
        }

        consumer.require_auth();

        Ok(Self::record(
            &env,
            RandomnessRequest {
                consumer,
                key_hash,
                subscription_id,
                minimum_confirmations,
                callback_gas_limit,
                num_words,
                fee: 0,
                requested_at: env.ledger().sequence(),
            },
        ))
    }

    /// Record a direct-funded request for a single word.
    ///
    /// The consumer transfers `fee` to this contract before calling.
    pub fn request_randomness(
        env: Env,
        consumer: Address,
        key_hash: BytesN<32>,
        fee: i128,
    ) -> Result<u64, CoordinatorError> {
        Self::require_initialized(&env)?;

        if fee < 0 {
            return Err(CoordinatorError::InvalidFee);
        }

        consumer.require_auth();

        Ok(Self::record(
            &env,
            RandomnessRequest {
                consumer,
                key_hash,
                subscription_id: 0,
                minimum_confirmations: MIN_REQUEST_CONFIRMATIONS,
                callback_gas_limit: 0,
                num_words: 1,
                fee,
                requested_at: env.ledger().sequence(),
            },
        ))
    }

    /// Answer a request with words derived from its id (admin only).
    ///
    /// Word `i` is `sha256(request_id_be || i_be)` read as a big-endian U256.
    ///
    /// # Returns
    /// Whether the consumer's callback succeeded
    pub fn fulfill_random_words(env: Env, request_id: u64) -> Result<bool, CoordinatorError> {
        Self::require_admin(&env)?;

        let request = Self::read_request(&env, request_id)?;
        let words = Self::derive_words(&env, request_id, request.num_words);

        Ok(Self::deliver(&env, request_id, &request, words))
    }

    /// Answer a request with caller-chosen words (admin only).
    pub fn fulfill_with_override(
        env: Env,
        request_id: u64,
        random_words: Vec<U256>,
    ) -> Result<bool, CoordinatorError> {
        Self::require_admin(&env)?;

        let request = Self::read_request(&env, request_id)?;
        if random_words.len() != request.num_words {
            return Err(CoordinatorError::InvalidNumWords);
        }

        Ok(Self::deliver(&env, request_id, &request, random_words))
    }

    pub fn get_request(env: Env, request_id: u64) -> Option<RandomnessRequest> {
        env.storage().instance().get(&DataKey::Request(request_id))
    }

    pub fn admin(env: Env) -> Result<Address, CoordinatorError> {
        Self::require_initialized(&env)?;
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(CoordinatorError::NotInitialized)
    }

    // --- Internal helpers ---

    fn record(env: &Env, request: RandomnessRequest) -> u64 {
        let request_id: u64 = env
            .storage()
            .instance()
            .get(&DataKey::NextRequestId)
            .unwrap_or(1);
        env.storage()
            .instance()
            .set(&DataKey::NextRequestId, &(request_id + 1));
        env.storage()
            .instance()
            .set(&DataKey::Request(request_id), &request);

        env.events().publish(
            (symbol_short!("vrf"), symbol_short!("request"), request.consumer.clone()),
            (request_id, request.num_words),
        );

        request_id
    }

    fn deliver(env: &Env, request_id: u64, request: &RandomnessRequest, words: Vec<U256>) -> bool {
        env.storage().instance().remove(&DataKey::Request(request_id));

        let consumer = VrfConsumerClient::new(env, &request.consumer);
        let success = matches!(
            consumer.try_fulfill_random_words(&env.current_contract_address(), &request_id, &words),
            Ok(Ok(()))
        );
        if !success {
            log!(env, "consumer callback failed", request_id);
        }

        env.events().publish(
            (symbol_short!("vrf"), symbol_short!("fulfill"), request.consumer.clone()),
            (request_id, success),
        );

        success
    }

    fn derive_words(env: &Env, request_id: u64, num_words: u32) -> Vec<U256> {
        let mut words = Vec::new(env);
        for i in 0..num_words {
            let mut seed = Bytes::from_array(env, &request_id.to_be_bytes());
            seed.extend_from_array(&i.to_be_bytes());
            let digest: BytesN<32> = env.crypto().sha256(&seed).into();
            words.push_back(U256::from_be_bytes(env, &Bytes::from(digest)));
        }
        words
    }

    fn read_request(env: &Env, request_id: u64) -> Result<RandomnessRequest, CoordinatorError> {
        env.storage()
            .instance()
            .get(&DataKey::Request(request_id))
            .ok_or(CoordinatorError::UnknownRequest)
    }

    fn require_initialized(env: &Env) -> Result<(), CoordinatorError> {
        if !env.storage().instance().has(&DataKey::Admin) {
            return Err(CoordinatorError::NotInitialized);
        }
        Ok(())
    }

    fn require_admin(env: &Env) -> Result<(), CoordinatorError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(CoordinatorError::NotInitialized)?;
        admin.require_auth();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::{contracterror, testutils::Address as _, vec, Env};

    #[contracterror]
    #[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
    #[repr(u32)]
    pub enum ConsumerError {
        Refused = 1,
    }

    #[derive(Clone)]
    #[contracttype]
    pub enum ConsumerKey {
        Refuse,
        LastRequest,
        LastWords,
    }

    /// Records what it was fulfilled with; can be told to refuse callbacks.
    #[contract]
    pub struct RecordingConsumer;

    #[contractimpl]
    impl RecordingConsumer {
        pub fn set_refuse(env: Env, refuse: bool) {
            env.storage().instance().set(&ConsumerKey::Refuse, &refuse);
        }

        pub fn fulfill_random_words(
            env: Env,
            coordinator: Address,
            request_id: u64,
            random_words: Vec<U256>,
        ) -> Result<(), ConsumerError> {
            coordinator.require_auth();
            let refuse: bool = env
                .storage()
                .instance()
                .get(&ConsumerKey::Refuse)
                .unwrap_or(false);
            if refuse {
                return Err(ConsumerError::Refused);
            }
            env.storage().instance().set(&ConsumerKey::LastRequest, &request_id);
            env.storage().instance().set(&ConsumerKey::LastWords, &random_words);
            Ok(())
        }

        pub fn last_request(env: Env) -> Option<u64> {
            env.storage().instance().get(&ConsumerKey::LastRequest)
        }

        pub fn last_words(env: Env) -> Option<Vec<U256>> {
            env.storage().instance().get(&ConsumerKey::LastWords)
        }
    }

    /// Returns (env, coordinator, consumer, admin)
    fn setup() -> (Env, Address, Address, Address) {
        let env = Env::default();
        env.mock_all_auths();

        let admin = Address::generate(&env);
        let coordinator_id = env.register(VrfCoordinatorMock, (admin.clone(),));
        let consumer_id = env.register(RecordingConsumer, ());

        (env, coordinator_id, consumer_id, admin)
    }

    fn key_hash(env: &Env) -> BytesN<32> {
        BytesN::from_array(env, &[9u8; 32])
    }

    #[test]
    fn test_initialize() {
        let (env, coordinator_id, _, admin) = setup();
        let client = VrfCoordinatorMockClient::new(&env, &coordinator_id);

        assert_eq!(client.admin(), admin);
        assert_eq!(client.get_request(&1), None);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1)")] // AlreadyInitialized = 1
    fn test_double_initialize() {
        let (env, coordinator_id, _, admin) = setup();
        let client = VrfCoordinatorMockClient::new(&env, &coordinator_id);

        client.initialize(&admin);
    }

    #[test]
    fn test_request_ids_increase() {
        let (env, coordinator_id, consumer_id, _) = setup();
        let client = VrfCoordinatorMockClient::new(&env, &coordinator_id);

        let first = client.request_random_words(&consumer_id, &key_hash(&env), &456, &3, &500_000, &1);
        let second = client.request_randomness(&consumer_id, &key_hash(&env), &100);

        assert_eq!(first, 1);
        assert_eq!(second, 2);

        let subscription = client.get_request(&first).unwrap();
        assert_eq!(subscription.consumer, consumer_id);
        assert_eq!(subscription.subscription_id, 456);
        assert_eq!(subscription.fee, 0);

        let direct = client.get_request(&second).unwrap();
        assert_eq!(direct.subscription_id, 0);
        assert_eq!(direct.num_words, 1);
        assert_eq!(direct.fee, 100);
    }

    #[test]
    fn test_request_validation() {
        let (env, coordinator_id, consumer_id, _) = setup();
        let client = VrfCoordinatorMockClient::new(&env, &coordinator_id);
        let kh = key_hash(&env);

        assert_eq!(
            client.try_request_random_words(&consumer_id, &kh, &1, &3, &100_000, &0),
            Err(Ok(CoordinatorError::InvalidNumWords))
        );
        assert_eq!(
            client.try_request_random_words(&consumer_id, &kh, &1, &3, &100_000, &(MAX_NUM_WORDS + 1)),
            Err(Ok(CoordinatorError::InvalidNumWords))
        );
        assert_eq!(
            client.try_request_random_words(&consumer_id, &kh, &1, &2, &100_000, &1),
            Err(Ok(CoordinatorError::InvalidConfirmations))
        );
        assert_eq!(
            client.try_request_random_words(&consumer_id, &kh, &1, &201, &100_000, &1),
            Err(Ok(CoordinatorError::InvalidConfirmations))
        );
        assert_eq!(
            client.try_request_randomness(&consumer_id, &kh, &-1),
            Err(Ok(CoordinatorError::InvalidFee))
        );
    }

    #[test]
    fn test_fulfill_delivers_derived_words() {
        let (env, coordinator_id, consumer_id, _) = setup();
        let client = VrfCoordinatorMockClient::new(&env, &coordinator_id);
        let consumer = RecordingConsumerClient::new(&env, &consumer_id);

        let request_id = client.request_random_words(&consumer_id, &key_hash(&env), &1, &3, &100_000, &2);
        assert!(client.fulfill_random_words(&request_id));

        let mut seed = Bytes::from_array(&env, &request_id.to_be_bytes());
        seed.extend_from_array(&1u32.to_be_bytes());
        let digest: BytesN<32> = env.crypto().sha256(&seed).into();
        let expected_second = U256::from_be_bytes(&env, &Bytes::from(digest));

        let words = consumer.last_words().unwrap();
        assert_eq!(consumer.last_request(), Some(request_id));
        assert_eq!(words.len(), 2);
        assert_eq!(words.get(1).unwrap(), expected_second);
        assert_ne!(words.get(0).unwrap(), words.get(1).unwrap());

        // Request is consumed
        assert_eq!(client.get_request(&request_id), None);
    }

    #[test]
    fn test_fulfill_with_override() {
        let (env, coordinator_id, consumer_id, _) = setup();
        let client = VrfCoordinatorMockClient::new(&env, &coordinator_id);
        let consumer = RecordingConsumerClient::new(&env, &consumer_id);

        let request_id = client.request_randomness(&consumer_id, &key_hash(&env), &0);
        let words = vec![&env, U256::from_u32(&env, 42)];

        assert!(client.fulfill_with_override(&request_id, &words));
        assert_eq!(consumer.last_words(), Some(words));
    }

    #[test]
    fn test_override_word_count_must_match() {
        let (env, coordinator_id, consumer_id, _) = setup();
        let client = VrfCoordinatorMockClient::new(&env, &coordinator_id);

        let request_id = client.request_randomness(&consumer_id, &key_hash(&env), &0);
        let words = vec![&env, U256::from_u32(&env, 1), U256::from_u32(&env, 2)];

        assert_eq!(
            client.try_fulfill_with_override(&request_id, &words),
            Err(Ok(CoordinatorError::InvalidNumWords))
        );
    }

    #[test]
    fn test_refused_callback_does_not_revert() {
        let (env, coordinator_id, consumer_id, _) = setup();
        let client = VrfCoordinatorMockClient::new(&env, &coordinator_id);
        let consumer = RecordingConsumerClient::new(&env, &consumer_id);

        consumer.set_refuse(&true);
        let request_id = client.request_randomness(&consumer_id, &key_hash(&env), &0);

        assert!(!client.fulfill_random_words(&request_id));
        assert_eq!(consumer.last_request(), None);
        assert_eq!(client.get_request(&request_id), None);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #3)")] // UnknownRequest = 3
    fn test_fulfill_unknown_request() {
        let (env, coordinator_id, _, _) = setup();
        let client = VrfCoordinatorMockClient::new(&env, &coordinator_id);

        client.fulfill_random_words(&7);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #3)")] // UnknownRequest = 3
    fn test_fulfill_twice_fails() {
        let (env, coordinator_id, consumer_id, _) = setup();
        let client = VrfCoordinatorMockClient::new(&env, &coordinator_id);

        let request_id = client.request_randomness(&consumer_id, &key_hash(&env), &0);
        client.fulfill_random_words(&request_id);
        client.fulfill_random_words(&request_id);
    }
}
