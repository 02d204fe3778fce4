pub mod builder;
pub mod entities;
pub mod errors;
pub mod nibbles;
pub mod node;
pub mod proofs;
pub mod reader;
pub mod rlp;

pub use builder::*;
pub use entities::*;
pub use errors::*;
pub use nibbles::*;
pub use node::*;
pub use proofs::*;
pub use reader::*;
pub use rlp::keccak256;
