//! Vendor CLI flavor selection.
//!
//! The transport and probers format commands per vendor syntax. The
//! flavor is chosen explicitly at startup from configuration; the tool
//! never probes the box for whichever CLI module happens to exist.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error for an unrecognized flavor name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown CLI flavor '{0}' (expected 'nexus' or 'eos')")]
pub struct UnknownFlavor(pub String);

/// Supported vendor CLI syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CliFlavor {
    /// Cisco NX-OS: commands run through `vsh -c`, config sub-commands
    /// chained with `;` in a single invocation.
    #[default]
    Nexus,
    /// Arista EOS: commands run through `Cli -c`, config sub-commands
    /// separated by newlines in a single invocation.
    Eos,
}

impl CliFlavor {
    /// The CLI binary to invoke.
    pub fn program(&self) -> &'static str {
        match self {
            CliFlavor::Nexus => "vsh",
            CliFlavor::Eos => "Cli",
        }
    }

    /// Fixed arguments preceding the command string.
    pub fn program_args(&self) -> &'static [&'static str] {
        match self {
            CliFlavor::Nexus => &["-c"],
            CliFlavor::Eos => &["-c"],
        }
    }

    /// Command that shows the operational status of `interface`.
    pub fn status_command(&self, interface: &str) -> String {
        match self {
            CliFlavor::Nexus => format!("show interface {} status", interface),
            CliFlavor::Eos => format!("show interfaces {} status", interface),
        }
    }

    /// Command that sets the administrative state of `interface`.
    pub fn admin_command(&self, interface: &str, enabled: bool) -> String {
        let action = if enabled { "no shutdown" } else { "shutdown" };
        match self {
            CliFlavor::Nexus => {
                format!("configure terminal ; interface {} ; {}", interface, action)
            }
            CliFlavor::Eos => {
                format!("configure terminal\ninterface {}\n{}", interface, action)
            }
        }
    }

    /// Command that sends one probe packet to `address`, optionally
    /// scoped to a routing context (VRF).
    pub fn ping_command(&self, address: &str, context: Option<&str>) -> String {
        match (self, context) {
            (CliFlavor::Nexus, Some(vrf)) => {
                format!("ping {} vrf {} count 1", address, vrf)
            }
            (CliFlavor::Nexus, None) => format!("ping {} count 1", address),
            (CliFlavor::Eos, Some(vrf)) => {
                format!("ping vrf {} {} repeat 1", vrf, address)
            }
            (CliFlavor::Eos, None) => format!("ping {} repeat 1", address),
        }
    }
}

impl fmt::Display for CliFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliFlavor::Nexus => write!(f, "nexus"),
            CliFlavor::Eos => write!(f, "eos"),
        }
    }
}

impl FromStr for CliFlavor {
    type Err = UnknownFlavor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nexus" | "nxos" | "nx-os" => Ok(CliFlavor::Nexus),
            "eos" | "arista" => Ok(CliFlavor::Eos),
            other => Err(UnknownFlavor(other.to_string())),
        }
    }
}
