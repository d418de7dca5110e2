#![allow(dead_code)]

use {
    async_trait::async_trait,
    borsh::BorshSerialize,
    solana_program::{program_option::COption, program_pack::Pack, pubkey::Pubkey},
    solana_sdk::account::Account,
    spl_governance_addin_api::{
        max_voter_weight::MaxVoterWeightRecord, registrar::Registrar,
        voter_weight::VoterWeightRecord,
    },
    spl_governance_plugin_chain::{
        address::{
            get_max_voter_weight_record_address, get_registrar_address,
            get_voter_weight_record_address,
        },
        client::{PluginChainClient, ProgramClient, ProgramClientResult},
        error::{PluginChainError, PluginChainResult},
        plugins::gateway::{GatewayToken, GatewayTokenState},
        realm::{RealmContext, TokenOwnerRecordHeader, TOKEN_OWNER_RECORD_V2_ACCOUNT_TYPE},
        weight::{PluginDescriptor, VoterWeightPlugin},
    },
    spl_token::state::Mint,
    std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicBool, AtomicUsize, Ordering},
            Arc, RwLock,
        },
        time::Duration,
    },
};

pub mod cookies;

use self::cookies::RegistrarCookie;

/// In memory ledger
#[derive(Default)]
pub struct MemoryProgramClient {
    accounts: RwLock<HashMap<Pubkey, Account>>,
    reads: AtomicUsize,
    unavailable: AtomicBool,
    read_delay: RwLock<Option<Duration>>,
}

impl MemoryProgramClient {
    pub fn set_account(&self, address: &Pubkey, owner: &Pubkey, data: Vec<u8>) {
        let account = Account {
            lamports: 1_000_000,
            data,
            owner: *owner,
            executable: false,
            rent_epoch: 0,
        };
        self.accounts.write().unwrap().insert(*address, account);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_read_delay(&self, read_delay: Duration) {
        *self.read_delay.write().unwrap() = Some(read_delay);
    }
}

#[async_trait]
impl ProgramClient for MemoryProgramClient {
    async fn get_account(&self, address: Pubkey) -> ProgramClientResult<Option<Account>> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        let read_delay = *self.read_delay.read().unwrap();
        if let Some(read_delay) = read_delay {
            tokio::time::sleep(read_delay).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err("connection refused".into());
        }

        Ok(self.accounts.read().unwrap().get(&address).cloned())
    }
}

/// Outcome of a TestPlugin call
#[derive(Clone, Copy)]
pub enum TestPluginBehavior {
    Add(u64),
    Multiply(u64),
    Constant(u64),
    NoWeight,
    Fail,
}

/// Plugin counting its invocations
pub struct TestPlugin {
    behavior: TestPluginBehavior,
    calls: AtomicUsize,
    inputs: RwLock<Vec<u64>>,
}

impl TestPlugin {
    pub fn new(behavior: TestPluginBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            inputs: RwLock::new(vec![]),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<u64> {
        self.inputs.read().unwrap().clone()
    }

    fn apply(&self, input_weight: u64) -> PluginChainResult<Option<u64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.write().unwrap().push(input_weight);

        match self.behavior {
            TestPluginBehavior::Add(value) => Ok(Some(input_weight + value)),
            TestPluginBehavior::Multiply(value) => Ok(Some(input_weight * value)),
            TestPluginBehavior::Constant(value) => Ok(Some(value)),
            TestPluginBehavior::NoWeight => Ok(None),
            TestPluginBehavior::Fail => Err(PluginChainError::PluginComputation(
                "voter is not eligible".to_string(),
            )),
        }
    }
}

#[async_trait]
impl VoterWeightPlugin for TestPlugin {
    async fn calculate_voter_weight(
        &self,
        _wallet: &Pubkey,
        _realm: &Pubkey,
        _governing_token_mint: &Pubkey,
        input_voter_weight: u64,
    ) -> PluginChainResult<Option<u64>> {
        self.apply(input_voter_weight)
    }

    async fn calculate_max_voter_weight(
        &self,
        _realm: &Pubkey,
        _governing_token_mint: &Pubkey,
        input_max_voter_weight: u64,
    ) -> PluginChainResult<Option<u64>> {
        self.apply(input_max_voter_weight)
    }
}

pub fn test_plugin_descriptor(name: &str, plugin: &Arc<TestPlugin>) -> PluginDescriptor {
    PluginDescriptor::new(name, &Pubkey::new_unique(), plugin.clone())
}

pub struct PluginChainProgramTest {
    pub ledger: Arc<MemoryProgramClient>,
    pub client: PluginChainClient,
    pub realm_context: RealmContext,
}

impl PluginChainProgramTest {
    pub fn start_new() -> Self {
        Self::start_with_read_timeout(Duration::from_secs(5))
    }

    pub fn start_with_read_timeout(read_timeout: Duration) -> Self {
        solana_logger::setup_with_default("spl_governance_plugin_chain=debug");

        let ledger = Arc::new(MemoryProgramClient::default());
        let client = PluginChainClient::new(ledger.clone(), read_timeout);

        let realm_context = RealmContext::new(
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
        );

        Self {
            ledger,
            client,
            realm_context,
        }
    }

    /// Stores the plugin's Registrar for the test realm
    pub fn with_registrar(
        &self,
        program_id: &Pubkey,
        predecessor_program_id: Option<Pubkey>,
    ) -> RegistrarCookie {
        self.with_registrar_config(program_id, vec![], predecessor_program_id)
    }

    /// Stores the plugin's Registrar with the plugin configuration ahead of the predecessor
    pub fn with_registrar_config(
        &self,
        program_id: &Pubkey,
        plugin_config: Vec<u8>,
        predecessor_program_id: Option<Pubkey>,
    ) -> RegistrarCookie {
        let (address, _) = get_registrar_address(
            &self.realm_context.realm,
            &self.realm_context.governing_token_mint,
            program_id,
        );

        let account = Registrar {
            account_discriminator: Registrar::ACCOUNT_DISCRIMINATOR,
            governance_program_id: self.realm_context.governance_program_id,
            realm: self.realm_context.realm,
            governing_token_mint: self.realm_context.governing_token_mint,
            plugin_config,
            previous_voter_weight_plugin_program_id: predecessor_program_id,
        };

        let registrar_cookie = RegistrarCookie {
            address,
            program_id: *program_id,
            account,
        };
        self.store_registrar(&registrar_cookie);

        registrar_cookie
    }

    /// Overwrites the Registrar account with the cookie's data
    pub fn store_registrar(&self, registrar_cookie: &RegistrarCookie) {
        // Reserved space follows the predecessor
        let mut data = registrar_cookie.account.try_to_vec().unwrap();
        data.extend_from_slice(&[0; 64]);

        self.ledger.set_account(
            &registrar_cookie.address,
            &registrar_cookie.program_id,
            data,
        );
    }

    /// Stores the gateway plugin's Registrar configured for the gatekeeper network
    pub fn with_gateway_registrar(
        &self,
        program_id: &Pubkey,
        gatekeeper_network: &Pubkey,
        predecessor_program_id: Option<Pubkey>,
    ) -> RegistrarCookie {
        self.with_registrar_config(
            program_id,
            gatekeeper_network.to_bytes().to_vec(),
            predecessor_program_id,
        )
    }

    /// Stores a gateway token issued to the wallet for the gatekeeper network
    pub fn with_gateway_token(
        &self,
        gateway_program_id: &Pubkey,
        owner_wallet: &Pubkey,
        gatekeeper_network: &Pubkey,
        state: GatewayTokenState,
    ) -> Pubkey {
        let address = Pubkey::new_unique();

        let gateway_token = GatewayToken {
            features: 0,
            parent_gateway_token: None,
            owner_wallet: *owner_wallet,
            owner_identity: None,
            gatekeeper_network: *gatekeeper_network,
            issuing_gatekeeper: Pubkey::new_unique(),
            state,
            expire_time: None,
        };

        self.ledger.set_account(
            &address,
            gateway_program_id,
            gateway_token.try_to_vec().unwrap(),
        );

        address
    }

    pub fn with_voter_weight_record(&self, program_id: &Pubkey, voter_weight: u64) -> Pubkey {
        let (address, _) = get_voter_weight_record_address(
            &self.realm_context.realm,
            &self.realm_context.governing_token_mint,
            &self.realm_context.wallet,
            program_id,
        );

        let record = VoterWeightRecord {
            account_discriminator: VoterWeightRecord::ACCOUNT_DISCRIMINATOR,
            realm: self.realm_context.realm,
            governing_token_mint: self.realm_context.governing_token_mint,
            governing_token_owner: self.realm_context.wallet,
            voter_weight,
            voter_weight_expiry: None,
            weight_action: None,
            weight_action_target: None,
            reserved: [0; 8],
        };

        self.ledger
            .set_account(&address, program_id, record.try_to_vec().unwrap());

        address
    }

    pub fn with_max_voter_weight_record(
        &self,
        program_id: &Pubkey,
        max_voter_weight: u64,
    ) -> Pubkey {
        let (address, _) = get_max_voter_weight_record_address(
            &self.realm_context.realm,
            &self.realm_context.governing_token_mint,
            program_id,
        );

        let record = MaxVoterWeightRecord {
            account_discriminator: MaxVoterWeightRecord::ACCOUNT_DISCRIMINATOR,
            realm: self.realm_context.realm,
            governing_token_mint: self.realm_context.governing_token_mint,
            max_voter_weight,
            max_voter_weight_expiry: None,
            reserved: [0; 8],
        };

        self.ledger
            .set_account(&address, program_id, record.try_to_vec().unwrap());

        address
    }

    pub fn with_token_owner_record(&self, governing_token_deposit_amount: u64) -> Pubkey {
        let address = self.realm_context.get_token_owner_record_address();

        let record = TokenOwnerRecordHeader {
            account_type: TOKEN_OWNER_RECORD_V2_ACCOUNT_TYPE,
            realm: self.realm_context.realm,
            governing_token_mint: self.realm_context.governing_token_mint,
            governing_token_owner: self.realm_context.wallet,
            governing_token_deposit_amount,
        };

        // Remaining TokenOwnerRecord fields
        let mut data = record.try_to_vec().unwrap();
        data.extend_from_slice(&[0; 128]);

        self.ledger
            .set_account(&address, &self.realm_context.governance_program_id, data);

        address
    }

    pub fn with_governing_token_mint(&self, supply: u64) {
        let mint = Mint {
            mint_authority: COption::None,
            supply,
            decimals: 6,
            is_initialized: true,
            freeze_authority: COption::None,
        };

        let mut data = vec![0; Mint::LEN];
        Mint::pack(mint, &mut data).unwrap();

        self.ledger.set_account(
            &self.realm_context.governing_token_mint,
            &spl_token::id(),
            data,
        );
    }
}
