//! VLAN-based EVPN instances (`l2vpn evpn instance N vlan-based`).

use crate::config::{DictSchema, EntrySchema, Param, Shape};
use crate::device::{Grammar, LineAction, LineRule};
use crate::planner::{BlockSpec, DeleteMatch, FieldKind, FieldSpec, Layout, Piece, Removal, Template};

use super::{Resource, ResourceKind};

const TOGGLE: &[&str] = &["enable", "disable"];

static INSTANCE_SCHEMA: EntrySchema = EntrySchema {
    entity: "instance",
    key: &["instance"],
    item: DictSchema::new(&[
        Param::new("instance", Shape::Str).required(),
        Param::new("route_target_import", Shape::StrList),
        Param::new("route_target_export", Shape::StrList),
        Param::new("encapsulation", Shape::Choice(&["vxlan"])),
        Param::new("rd", Shape::Str),
        Param::new("auto_route_target", Shape::Bool).default_bool(true),
        Param::new("replication_type", Shape::Choice(&["static", "ingress"])),
        Param::new("ip_local_learning", Shape::Choice(TOGGLE)),
        Param::new("default_gateway_advertise", Shape::Choice(TOGGLE)),
        Param::new("multicast_advertise", Shape::Choice(TOGGLE)),
        Param::new("re_originate_route_type5", Shape::Bool),
    ]),
};

const fn valued(path: &'static [&'static str], prefix: &'static [Piece]) -> FieldSpec {
    FieldSpec::new(path, FieldKind::Linear(Template::new(path[0], prefix)))
}

static INSTANCE: BlockSpec = BlockSpec {
    name: "instance",
    enter: Template::new(
        "instance",
        &[
            Piece::Text("l2vpn evpn instance "),
            Piece::Slot(&["instance"]),
            Piece::Text(" vlan-based"),
        ],
    ),
    removal: Removal::Plain,
    purge_whole: false,
    delete_match: DeleteMatch::Covered,
    fields: &[
        FieldSpec::new(
            &["route_target_import"],
            FieldKind::Set(Template::new(
                "route_target_import",
                &[Piece::Text("route-target import "), Piece::Slot(&[])],
            )),
        ),
        FieldSpec::new(
            &["route_target_export"],
            FieldKind::Set(Template::new(
                "route_target_export",
                &[Piece::Text("route-target export "), Piece::Slot(&[])],
            )),
        ),
        valued(&["encapsulation"], &[Piece::Text("encapsulation "), Piece::Slot(&[])]),
        valued(&["rd"], &[Piece::Text("rd "), Piece::Slot(&[])]),
        valued(&["auto_route_target"], &[Piece::Text("auto-route-target")]),
        valued(
            &["replication_type"],
            &[Piece::Text("replication-type "), Piece::Slot(&[])],
        ),
        valued(
            &["ip_local_learning"],
            &[Piece::Text("ip local-learning "), Piece::Slot(&[])],
        ),
        valued(
            &["default_gateway_advertise"],
            &[Piece::Text("default-gateway advertise "), Piece::Slot(&[])],
        ),
        valued(
            &["multicast_advertise"],
            &[Piece::Text("multicast advertise "), Piece::Slot(&[])],
        ),
        valued(
            &["re_originate_route_type5"],
            &[Piece::Text("re-originate route-type5")],
        ),
    ],
};

/// The `l2vpn_evpn_vb` resource.
pub static RESOURCE: Resource = Resource {
    kind: ResourceKind::L2vpnEvpnVb,
    description: "VLAN-based EVPN instances",
    schema: Shape::Entries(&INSTANCE_SCHEMA),
    layout: Layout::Keyed(&INSTANCE),
    grammar: Grammar {
        rules: &[
            LineRule::entity(
                "instance",
                r"^l2vpn evpn instance (?P<instance>\S+) vlan-based\s*$",
                LineAction::Open {
                    key: Some("instance"),
                },
            ),
            LineRule::entity(
                "encapsulation",
                r"^ encapsulation (?P<value>\S+)\s*$",
                LineAction::Text {
                    path: &["encapsulation"],
                    group: "value",
                },
            ),
            LineRule::entity(
                "rd",
                r"^ rd (?P<value>\S+)\s*$",
                LineAction::Text {
                    path: &["rd"],
                    group: "value",
                },
            ),
            LineRule::entity(
                "route_target_import",
                r"^ route-target import (?P<rt>\S+)\s*$",
                LineAction::Append {
                    path: &["route_target_import"],
                    group: "rt",
                },
            ),
            LineRule::entity(
                "route_target_export",
                r"^ route-target export (?P<rt>\S+)\s*$",
                LineAction::Append {
                    path: &["route_target_export"],
                    group: "rt",
                },
            ),
            LineRule::entity(
                "auto_route_target",
                r"^ (?P<negated>no )?auto-route-target\s*$",
                LineAction::Flag(&["auto_route_target"]),
            ),
            LineRule::entity(
                "replication_type",
                r"^ replication-type (?P<value>\S+)\s*$",
                LineAction::Text {
                    path: &["replication_type"],
                    group: "value",
                },
            ),
            LineRule::entity(
                "ip_local_learning",
                r"^ ip local-learning (?P<value>enable|disable)\s*$",
                LineAction::Text {
                    path: &["ip_local_learning"],
                    group: "value",
                },
            ),
            LineRule::entity(
                "default_gateway_advertise",
                r"^ default-gateway advertise (?P<value>enable|disable)\s*$",
                LineAction::Text {
                    path: &["default_gateway_advertise"],
                    group: "value",
                },
            ),
            LineRule::entity(
                "multicast_advertise",
                r"^ multicast advertise (?P<value>enable|disable)\s*$",
                LineAction::Text {
                    path: &["multicast_advertise"],
                    group: "value",
                },
            ),
            LineRule::entity(
                "re_originate_route_type5",
                r"^ re-originate route-type5\s*$",
                LineAction::Flag(&["re_originate_route_type5"]),
            ),
        ],
    },
};
