use solana_program::pubkey::Pubkey;
use spl_governance_addin_api::registrar::Registrar;

#[derive(Debug)]
pub struct RegistrarCookie {
    pub address: Pubkey,
    pub program_id: Pubkey,
    pub account: Registrar,
}
