//! A micro detection engine for application-layer inspection.
//!
//! The engine keeps the tables rule keywords are wired into and runs compiled
//! rule sets against protocol transactions:
//!
//! - **Keyword table** ([`KeywordTable`]): rule keywords by [`KeywordId`], each
//!   with its [`SigMatchFlags`] and setup hook.
//! - **Buffer types** ([`BufferTypeRegistry`]): named inspectable buffers,
//!   resolved to a [`BufferId`].
//! - **App-layer registries**: per buffer, protocol and direction, a prefilter
//!   entry ([`AppLayerMpm`]) and an inspection engine ([`AppLayerInspectEngine`]),
//!   both driven by a [`BufferExtractor`].
//! - **Inspection buffers** ([`InspectionBuffer`]): per worker scratch slots in
//!   a [`DetectEngineThreadCtx`], filled once per transaction.
//!
//! Tables are filled on a [`DetectEngineBuilder`] at startup and frozen into a
//! [`DetectEngine`]. Signatures are built against the frozen engine and compiled
//! into a [`DetectEngineCtx`], which workers share.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use micro_detect::{DetectEngine, DetectEngineCtx, DetectEngineThreadCtx, Signature};
//!
//! let engine = Arc::new(DetectEngine::builder().build());
//! let ctx = DetectEngineCtx::build(engine, vec![Signature::new(1)]).unwrap();
//! let mut det_ctx = DetectEngineThreadCtx::new();
//! # let _ = (&ctx, &mut det_ctx);
//! ```

mod buffer;
mod config;
mod detect;
mod direction;
mod engine;
mod error;
mod inspect;
mod keyword;
mod prefilter;
mod registry;
mod signature;
mod thread_ctx;
mod transform;
mod utils;

pub use buffer::{BufferId, BufferType, BufferTypeRegistry, InspectionBuffer};
pub use config::{DEFAULT_KEYWORD_CAPACITY, DEFAULT_MAX_TRANSFORMS, EngineConfig};
pub use detect::DetectEngineCtx;
pub use direction::{AppProto, Direction, DirectionSet};
pub use engine::{DetectEngine, DetectEngineBuilder};
pub use error::{RegistrationError, SetupError};
pub use inspect::inspect_buffer_generic;
pub use keyword::{KeywordId, KeywordSetup, KeywordTable, SigMatchFlags, SigTableElmt};
pub use prefilter::{DEFAULT_MPM_PRIORITY, MpmPattern, PrefilterEngine, prefilter_generic_mpm_register};
pub use registry::{AppLayerInspectEngine, AppLayerMpm, BufferExtractor, InspectEngineFn, PrefilterRegisterFn, Transaction};
pub use signature::{Content, SigBufferList, SigId, Signature};
pub use thread_ctx::DetectEngineThreadCtx;
pub use transform::{DetectEngineTransforms, Transform};
