//! Schain Fragments
//!
//! Reconstructs what every node of an OpenRTB supply chain actually saw for
//! the fields it protects, and renders one canonical fragment per node for
//! downstream signing.
//!
//! # Core Concepts
//!
//! - [`SupplyChainNode`]: one hop of `source.ext.schain.nodes`
//! - [`ProtectedPathRegistry`]: every referenced path, fetched in one pass
//! - [`OverrideResolver`]: nearest later replacement, else the current value
//! - [`FragmentAssembler`]: escaped `&key=value` fragments per node
//!
//! # Architecture
//!
//! ```text
//! bytes → BidRequestDocument → parse_chain → ProtectedPathRegistry::resolve_all
//!                                   ↓                      ↓
//!                           [SupplyChainNode]        ResolvedFields
//!                                   └──→ OverrideResolver ←┘
//!                                              ↓
//!                                     FragmentAssembler → ParsedBidRequest
//! ```
//!
//! # Example
//!
//! ```rust
//! use schain_fragments::parse_bid_request;
//!
//! let request = br#"{
//!     "app": {"bundle": "com.app.test"},
//!     "source": {"ext": {"schain": {"nodes": [
//!         {"asi": "directseller.com", "sid": "111111", "params": "app.bundle"}
//!     ]}}}
//! }"#;
//!
//! let parsed = parse_bid_request(request).unwrap();
//! assert_eq!(
//!     parsed.signature_message_fragments(),
//!     &["&schain.[0].asi=directseller.com&schain.[0].sid=111111&app.bundle=com.app.test"]
//! );
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod chain;
pub mod config;
pub mod document;
pub mod error;
pub mod fragment;
pub mod path;
pub mod pipeline;
pub mod registry;
pub mod resolver;

// Re-exports for convenience
pub use chain::{DeclaredReplacement, SupplyChainNode, NODES_PATH};
pub use config::{MissingFieldPolicy, ParserConfig};
pub use document::BidRequestDocument;
pub use error::{SchainError, SchainResult};
pub use fragment::{FragmentAssembler, SignedPair};
pub use path::{FieldPath, PathError, Segment};
pub use pipeline::{parse_bid_request, FragmentBuilder, ParsedBidRequest};
pub use registry::{PathOccurrence, ProtectedPathRegistry, ResolvedFields};
pub use resolver::{OverrideResolver, Resolution};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for extracting fragments
    pub use crate::{
        parse_bid_request, FragmentBuilder, MissingFieldPolicy, ParsedBidRequest, ParserConfig,
        SchainError, SchainResult,
    };
}
