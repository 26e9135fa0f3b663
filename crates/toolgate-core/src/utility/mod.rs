//! Local computations that need no upstream: subnet arithmetic, digests and
//! base64.

mod codec;
mod subnet;

pub use codec::{base64_transform, digest, Base64Mode, HashAlgorithm};
pub use subnet::{Cidr, SubnetInfo};
