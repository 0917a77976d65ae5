// Two security tiers: public (/auth/*, no credential) and protected
// (/api/*, bearer token required).
pub mod protected;
pub mod public;
