//! Global L2VPN EVPN settings (`l2vpn evpn`).

use crate::config::{DictSchema, Param, Shape};
use crate::device::{Capture, Grammar, LineAction, LineRule};
use crate::planner::{BlockSpec, DeleteMatch, FieldKind, FieldSpec, Layout, Piece, Removal, Template};

use super::{Resource, ResourceKind};

static LOGGING: DictSchema = DictSchema::new(&[
    Param::new("peer_state", Shape::Bool),
    Param::new("vpws_vc_state", Shape::Bool),
]);

static DUPLICATION: DictSchema = DictSchema::new(&[
    Param::new("limit", Shape::Int),
    Param::new("time", Shape::Int),
])
.together(&[&["limit", "time"]]);

static LEARNING_TIME: DictSchema = DictSchema::new(&[
    Param::new("down", Shape::Int),
    Param::new("poll", Shape::Int),
    Param::new("reachable", Shape::Int),
    Param::new("stale", Shape::Int),
]);

static LOCAL_LEARNING: DictSchema = DictSchema::new(&[
    Param::new("disable", Shape::Bool),
    Param::new("limit_per_mac_ipv4", Shape::Int),
    Param::new("limit_per_mac_ipv6", Shape::Int),
    Param::new("time", Shape::Dict(&LEARNING_TIME)),
]);

static SCHEMA: DictSchema = DictSchema::new(&[
    Param::new("logging", Shape::Dict(&LOGGING)),
    Param::new("replication_type", Shape::Choice(&["static", "ingress"])),
    Param::new("flooding_suppression_address_resolution_disable", Shape::Bool),
    Param::new("ip_duplication", Shape::Dict(&DUPLICATION)),
    Param::new("mac_duplication", Shape::Dict(&DUPLICATION)),
    Param::new("router_id", Shape::Str),
    Param::new("multihoming_aliasing_disable", Shape::Bool),
    Param::new("ip_local_learning", Shape::Dict(&LOCAL_LEARNING)),
    Param::new("default_gateway_advertise", Shape::Bool),
    Param::new("route_target_auto_vni", Shape::Bool),
    Param::new("multicast_advertise", Shape::Bool),
]);

const fn linear(path: &'static [&'static str], pieces: &'static [Piece]) -> FieldSpec {
    FieldSpec::new(path, FieldKind::Linear(Template::new(path[path.len() - 1], pieces)))
}

const fn duplication(path: &'static [&'static str], pieces: &'static [Piece]) -> FieldSpec {
    FieldSpec::new(path, FieldKind::Paired(Template::new(path[0], pieces)))
}

static BLOCK: BlockSpec = BlockSpec {
    name: "l2vpn evpn",
    enter: Template::new("l2vpn_evpn", &[Piece::Text("l2vpn evpn")]),
    removal: Removal::Plain,
    purge_whole: false,
    delete_match: DeleteMatch::Never,
    fields: &[
        linear(&["logging", "peer_state"], &[Piece::Text("logging peer state")]),
        linear(&["logging", "vpws_vc_state"], &[Piece::Text("logging vpws vc-state")]),
        linear(
            &["replication_type"],
            &[Piece::Text("replication-type "), Piece::Slot(&[])],
        ),
        linear(
            &["flooding_suppression_address_resolution_disable"],
            &[Piece::Text("flooding-suppression address-resolution disable")],
        ),
        duplication(
            &["ip_duplication"],
            &[
                Piece::Text("ip duplication limit "),
                Piece::Slot(&["limit"]),
                Piece::Text(" time "),
                Piece::Slot(&["time"]),
            ],
        ),
        duplication(
            &["mac_duplication"],
            &[
                Piece::Text("mac duplication limit "),
                Piece::Slot(&["limit"]),
                Piece::Text(" time "),
                Piece::Slot(&["time"]),
            ],
        ),
        linear(&["router_id"], &[Piece::Text("router-id "), Piece::Slot(&[])]),
        linear(
            &["multihoming_aliasing_disable"],
            &[Piece::Text("multihoming aliasing disable")],
        ),
        linear(
            &["ip_local_learning", "disable"],
            &[Piece::Text("ip local-learning disable")],
        ),
        linear(
            &["ip_local_learning", "limit_per_mac_ipv4"],
            &[Piece::Text("ip local-learning limit per-mac ipv4 "), Piece::Slot(&[])],
        ),
        linear(
            &["ip_local_learning", "limit_per_mac_ipv6"],
            &[Piece::Text("ip local-learning limit per-mac ipv6 "), Piece::Slot(&[])],
        ),
        linear(
            &["ip_local_learning", "time", "down"],
            &[Piece::Text("ip local-learning time down "), Piece::Slot(&[])],
        ),
        linear(
            &["ip_local_learning", "time", "poll"],
            &[Piece::Text("ip local-learning time poll "), Piece::Slot(&[])],
        ),
        linear(
            &["ip_local_learning", "time", "reachable"],
            &[Piece::Text("ip local-learning time reachable "), Piece::Slot(&[])],
        ),
        linear(
            &["ip_local_learning", "time", "stale"],
            &[Piece::Text("ip local-learning time stale "), Piece::Slot(&[])],
        ),
        linear(
            &["default_gateway_advertise"],
            &[Piece::Text("default-gateway advertise")],
        ),
        linear(&["route_target_auto_vni"], &[Piece::Text("route-target auto vni")]),
        linear(&["multicast_advertise"], &[Piece::Text("multicast advertise")]),
    ],
};

/// The `l2vpn_evpn` resource.
pub static RESOURCE: Resource = Resource {
    kind: ResourceKind::L2vpnEvpn,
    description: "Global L2VPN EVPN settings",
    schema: Shape::Dict(&SCHEMA),
    layout: Layout::Single(&BLOCK),
    grammar: Grammar {
        rules: &[
            LineRule::entity("l2vpn evpn", r"^l2vpn evpn\s*$", LineAction::Open { key: None }),
            LineRule::entity(
                "logging.peer_state",
                r"^ logging peer state\s*$",
                LineAction::Flag(&["logging", "peer_state"]),
            ),
            LineRule::entity(
                "logging.vpws_vc_state",
                r"^ logging vpws vc-state\s*$",
                LineAction::Flag(&["logging", "vpws_vc_state"]),
            ),
            LineRule::entity(
                "replication_type",
                r"^ replication-type (?P<replication_type>\S+)\s*$",
                LineAction::Text {
                    path: &["replication_type"],
                    group: "replication_type",
                },
            ),
            LineRule::entity(
                "flooding_suppression",
                r"^ flooding-suppression address-resolution disable\s*$",
                LineAction::Flag(&["flooding_suppression_address_resolution_disable"]),
            ),
            LineRule::entity(
                "ip_duplication",
                r"^ ip duplication limit (?P<limit>\S+) time (?P<time>\S+)\s*$",
                LineAction::Group {
                    path: &["ip_duplication"],
                    captures: &[Capture::text("limit"), Capture::text("time")],
                },
            ),
            LineRule::entity(
                "mac_duplication",
                r"^ mac duplication limit (?P<limit>\S+) time (?P<time>\S+)\s*$",
                LineAction::Group {
                    path: &["mac_duplication"],
                    captures: &[Capture::text("limit"), Capture::text("time")],
                },
            ),
            LineRule::entity(
                "router_id",
                r"^ router-id (?P<router_id>\S+)\s*$",
                LineAction::Text {
                    path: &["router_id"],
                    group: "router_id",
                },
            ),
            LineRule::entity(
                "multihoming_aliasing_disable",
                r"^ multihoming aliasing disable\s*$",
                LineAction::Flag(&["multihoming_aliasing_disable"]),
            ),
            LineRule::entity(
                "ip_local_learning.disable",
                r"^ ip local-learning disable\s*$",
                LineAction::Flag(&["ip_local_learning", "disable"]),
            ),
            LineRule::entity(
                "ip_local_learning.limit_per_mac",
                r"^ ip local-learning limit per-mac ipv4 (?P<limit>\S+)\s*$",
                LineAction::Text {
                    path: &["ip_local_learning", "limit_per_mac_ipv4"],
                    group: "limit",
                },
            ),
            LineRule::entity(
                "ip_local_learning.limit_per_mac_ipv6",
                r"^ ip local-learning limit per-mac ipv6 (?P<limit>\S+)\s*$",
                LineAction::Text {
                    path: &["ip_local_learning", "limit_per_mac_ipv6"],
                    group: "limit",
                },
            ),
            LineRule::entity(
                "ip_local_learning.time.down",
                r"^ ip local-learning time down (?P<value>\S+)\s*$",
                LineAction::Text {
                    path: &["ip_local_learning", "time", "down"],
                    group: "value",
                },
            ),
            LineRule::entity(
                "ip_local_learning.time.poll",
                r"^ ip local-learning time poll (?P<value>\S+)\s*$",
                LineAction::Text {
                    path: &["ip_local_learning", "time", "poll"],
                    group: "value",
                },
            ),
            LineRule::entity(
                "ip_local_learning.time.reachable",
                r"^ ip local-learning time reachable (?P<value>\S+)\s*$",
                LineAction::Text {
                    path: &["ip_local_learning", "time", "reachable"],
                    group: "value",
                },
            ),
            LineRule::entity(
                "ip_local_learning.time.stale",
                r"^ ip local-learning time stale (?P<value>\S+)\s*$",
                LineAction::Text {
                    path: &["ip_local_learning", "time", "stale"],
                    group: "value",
                },
            ),
            LineRule::entity(
                "default_gateway_advertise",
                r"^ default-gateway advertise\s*$",
                LineAction::Flag(&["default_gateway_advertise"]),
            ),
            LineRule::entity(
                "route_target_auto_vni",
                r"^ route-target auto vni\s*$",
                LineAction::Flag(&["route_target_auto_vni"]),
            ),
            LineRule::entity(
                "multicast_advertise",
                r"^ multicast advertise\s*$",
                LineAction::Flag(&["multicast_advertise"]),
            ),
        ],
    },
};
