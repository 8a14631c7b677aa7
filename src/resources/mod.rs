//! Resource declarations.
//!
//! A resource is pure data: the accepted parameter shape, the block and
//! field table the reconciler walks, and the line grammar the device parser
//! folds over. Adding a resource means adding a table, never a code path.

pub mod l2vpn;
pub mod l2vpn_evpn;
pub mod l2vpn_evpn_ptp;
pub mod l2vpn_evpn_vb;
pub mod vlan_configuration;

use serde::{Deserialize, Serialize};

use crate::config::Shape;
use crate::device::Grammar;
use crate::planner::Layout;

/// Static declaration of one resource.
#[derive(Debug)]
pub struct Resource {
    /// Resource identifier.
    pub kind: ResourceKind,
    /// One-line description.
    pub description: &'static str,
    /// Accepted shape of the `config` parameter.
    pub schema: Shape,
    /// Block and field table.
    pub layout: Layout,
    /// Device text grammar.
    pub grammar: Grammar,
}

/// Supported resources.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Global L2VPN settings.
    #[value(name = "l2vpn")]
    L2vpn,
    /// Global L2VPN EVPN settings.
    #[value(name = "l2vpn_evpn")]
    L2vpnEvpn,
    /// Point-to-point EVPN instances.
    #[value(name = "l2vpn_evpn_ptp")]
    L2vpnEvpnPtp,
    /// VLAN-based EVPN instances.
    #[value(name = "l2vpn_evpn_vb")]
    L2vpnEvpnVb,
    /// VLAN configuration mode.
    #[value(name = "vlan_configuration")]
    VlanConfiguration,
}

impl ResourceKind {
    /// Every supported resource.
    pub const ALL: [Self; 5] = [
        Self::L2vpn,
        Self::L2vpnEvpn,
        Self::L2vpnEvpnPtp,
        Self::L2vpnEvpnVb,
        Self::VlanConfiguration,
    ];

    /// Returns the resource name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::L2vpn => "l2vpn",
            Self::L2vpnEvpn => "l2vpn_evpn",
            Self::L2vpnEvpnPtp => "l2vpn_evpn_ptp",
            Self::L2vpnEvpnVb => "l2vpn_evpn_vb",
            Self::VlanConfiguration => "vlan_configuration",
        }
    }

    /// Returns the resource declaration.
    #[must_use]
    pub fn resource(self) -> &'static Resource {
        match self {
            Self::L2vpn => &l2vpn::RESOURCE,
            Self::L2vpnEvpn => &l2vpn_evpn::RESOURCE,
            Self::L2vpnEvpnPtp => &l2vpn_evpn_ptp::RESOURCE,
            Self::L2vpnEvpnVb => &l2vpn_evpn_vb::RESOURCE,
            Self::VlanConfiguration => &vlan_configuration::RESOURCE,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scenario helpers shared by the resource tests.

    use super::ResourceKind;
    use crate::config::Mode;
    use crate::reconciler::Reconciler;

    /// Reconciles JSON want against device text and renders each command.
    pub fn commands(kind: ResourceKind, want: serde_json::Value, device: &str, mode: Mode) -> Vec<String> {
        let reconciler = Reconciler::for_kind(kind);
        let want = reconciler
            .prepare(crate::tree::Value::from_json(&want).as_ref())
            .unwrap();
        let have = reconciler.parse(device).unwrap();
        reconciler
            .reconcile(&want, &have, mode)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Parses device text into denormalized JSON.
    pub fn parsed(kind: ResourceKind, device: &str) -> serde_json::Value {
        let have = Reconciler::for_kind(kind).parse(device).unwrap();
        serde_json::to_value(crate::planner::normalize::denormalize(have)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceParser;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_grammar_compiles() {
        for kind in ResourceKind::ALL {
            let resource = kind.resource();
            assert_eq!(resource.kind, kind);
            assert!(DeviceParser::new(&resource.grammar, resource.layout).is_ok(), "{kind}");
        }
    }

    #[test]
    fn test_names_round_trip_through_serde() {
        for kind in ResourceKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::json!(kind.as_str()));
            let back: ResourceKind = serde_json::from_value(json).unwrap();
            assert_eq!(back, kind);
        }
    }
}
