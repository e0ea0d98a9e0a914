//! Result registry.
//!
//! Turns a candidate list into a short per-user listing: ranks it, gives
//! each surviving entry a five-digit reference code and keeps the mapping
//! until the same user searches again. `/get<code>` resolves through here.

mod code;
mod rank;
mod render;
mod store;

pub use code::{CodeGenerator, InvalidCode, RandomCodes, ReferenceCode, CODE_MAX, CODE_MIN};
pub use rank::{rank_candidates, MAX_RESULTS};
pub use render::{format_size_gib, Listing};
pub use store::{Registry, RegistryError, ResultSet, MAX_CODE_ATTEMPTS};
