//! Device-facing collaborators for ifbounce.
//!
//! This crate provides:
//! - The `CommandRunner` transport trait with a subprocess-backed real
//!   implementation and a scripted mock for tests
//! - Vendor CLI flavor selection (command templates per vendor syntax)
//! - The link-state prober, reachability prober, and interface actuator
//!   that the orchestrator consumes purely through their traits

pub mod actuator;
pub mod flavor;
pub mod link;
pub mod ping;
pub mod transport;

pub use actuator::{ConfigActuator, InterfaceActuator, MockActuator};
pub use flavor::CliFlavor;
pub use link::{LinkProber, LinkState, MockLinkProber, ShowInterfaceProber};
pub use ping::{MockReachabilityProber, PingProber, Reachability, ReachabilityProber};
pub use transport::{CommandRunner, ScriptedRunner, SubprocessCli, TransportError};
