//! VLAN configuration mode (`vlan configuration N`).
//!
//! The richest resource: inline keyed member entries (pseudowires and IP
//! peers), a paired EVPN member, six `enable` + `attach-policy` features and
//! the `mdns-sd gateway` sub-mode.

use crate::config::schema::ATTACH_POLICY;
use crate::config::{DictSchema, EntrySchema, Param, Shape};
use crate::device::{Capture, Grammar, LineAction, LineRule};
use crate::planner::{BlockSpec, DeleteMatch, FieldKind, FieldSpec, Layout, Piece, Removal, Template};

use super::{Resource, ResourceKind};

// ============================================================================
// Schema
// ============================================================================

static PSEUDOWIRE: EntrySchema = EntrySchema {
    entity: "pseudowire",
    key: &["pwnumber"],
    item: DictSchema::new(&[
        Param::new("pwnumber", Shape::Str).required(),
        Param::new("address", Shape::Str),
        Param::new("vc_id", Shape::Str),
        Param::new("template", Shape::Str),
    ])
    .together(&[&["address", "vc_id"]]),
};

static IP_PEER: EntrySchema = EntrySchema {
    entity: "ip_peer",
    key: &["address", "vc_id"],
    item: DictSchema::new(&[
        Param::new("address", Shape::Str).required(),
        Param::new("vc_id", Shape::Str).required(),
        Param::new("template", Shape::Str),
    ]),
};

static EVPN: DictSchema = DictSchema::new(&[
    Param::new("instance", Shape::Str).required(),
    Param::new("vni", Shape::Str),
    Param::new("protected", Shape::Bool).default_bool(false),
])
.together(&[&["instance", "vni"]]);

static MEMBER: DictSchema = DictSchema::new(&[
    Param::new("vfi", Shape::Str),
    Param::new("access_vfi", Shape::Str),
    Param::new("vni", Shape::Str),
    Param::new("evpn", Shape::Dict(&EVPN)),
    Param::new("pseudowire", Shape::Entries(&PSEUDOWIRE)),
    Param::new("ip_peer", Shape::Entries(&IP_PEER)),
])
.exclusive(&[&["vfi", "access_vfi"], &["vni", "vfi", "evpn"]]);

static DHCP: DictSchema = DictSchema::new(&[
    Param::new("guard", Shape::Dict(&ATTACH_POLICY)),
    Param::new(
        "ldra_attach_policy",
        Shape::Choice(&["client-facing-trusted", "client-facing-untrusted"]),
    ),
]);

static ND: DictSchema = DictSchema::new(&[
    Param::new("ra_throttler", Shape::Dict(&ATTACH_POLICY)),
    Param::new("raguard", Shape::Dict(&ATTACH_POLICY)),
    Param::new("suppress", Shape::Dict(&ATTACH_POLICY)),
]);

static IPV6: DictSchema = DictSchema::new(&[
    Param::new("destination_guard", Shape::Dict(&ATTACH_POLICY)),
    Param::new("dhcp", Shape::Dict(&DHCP)),
    Param::new("nd", Shape::Dict(&ND)),
]);

static MDNS: DictSchema = DictSchema::new(&[
    Param::new("enable", Shape::Bool).required(),
    Param::new("active_query_timer", Shape::Str),
    Param::new("transport", Shape::Choice(&["ipv4", "ipv6", "both"])),
    Param::new("service_inst_suffix", Shape::Str),
    Param::new("service_mdns_query", Shape::Choice(&["ptr", "all"])),
    Param::new("source_interface", Shape::Str),
    Param::new("sdg_agent", Shape::Str),
    Param::new("service_policy", Shape::Str),
]);

static VLAN_SCHEMA: EntrySchema = EntrySchema {
    entity: "vlan",
    key: &["vlan"],
    item: DictSchema::new(&[
        Param::new("vlan", Shape::Str).required(),
        Param::new("member", Shape::Dict(&MEMBER)),
        Param::new("ipv6", Shape::Dict(&IPV6)),
        Param::new("device_tracking", Shape::Dict(&ATTACH_POLICY)),
        Param::new("et_analytics_enable", Shape::Bool),
        Param::new("mdns_sd_gateway", Shape::Dict(&MDNS)),
    ]),
};

// ============================================================================
// Field table
// ============================================================================

const ENCAPSULATION: Piece = Piece::IfAll {
    when: &[&["template"]],
    then: &[Piece::Text(" template "), Piece::Slot(&["template"])],
    otherwise: &[Piece::Text(" encapsulation mpls")],
};

const fn value(path: &'static [&'static str], pieces: &'static [Piece]) -> FieldSpec {
    FieldSpec::new(path, FieldKind::Linear(Template::new(path[path.len() - 1], pieces)))
}

const ATTACH: Piece = Piece::IfAll {
    when: &[&["attach_policy"]],
    then: &[Piece::Text(" attach-policy "), Piece::Slot(&["attach_policy"])],
    otherwise: &[],
};

const fn policy(path: &'static [&'static str], name: &'static str, pieces: &'static [Piece]) -> FieldSpec {
    FieldSpec::new(path, FieldKind::Dual(Template::new(name, pieces)))
}

static MDNS_FIELDS: &[FieldSpec] = &[
    value(&["active_query_timer"], &[Piece::Text("active-query timer "), Piece::Slot(&[])]),
    value(&["transport"], &[Piece::Text("transport "), Piece::Slot(&[])]),
    value(&["service_inst_suffix"], &[Piece::Text("service-inst-suffix "), Piece::Slot(&[])]),
    value(&["service_mdns_query"], &[Piece::Text("service-mdns-query "), Piece::Slot(&[])]),
    value(&["source_interface"], &[Piece::Text("source-interface "), Piece::Slot(&[])]),
    value(&["sdg_agent"], &[Piece::Text("sdg-agent "), Piece::Slot(&[])]),
    value(&["service_policy"], &[Piece::Text("service-policy "), Piece::Slot(&[])]),
];

static VLAN: BlockSpec = BlockSpec {
    name: "vlan",
    enter: Template::new(
        "vlan",
        &[Piece::Text("vlan configuration "), Piece::Slot(&["vlan"])],
    ),
    removal: Removal::Plain,
    purge_whole: true,
    delete_match: DeleteMatch::Exact,
    fields: &[
        FieldSpec::new(
            &["member", "pseudowire"],
            FieldKind::Entries(Template::new(
                "member.pseudowire",
                &[
                    Piece::Text("member pseudowire"),
                    Piece::Slot(&["pwnumber"]),
                    Piece::IfAll {
                        when: &[&["address"], &["vc_id"]],
                        then: &[
                            Piece::Text(" "),
                            Piece::Slot(&["address"]),
                            Piece::Text(" "),
                            Piece::Slot(&["vc_id"]),
                            ENCAPSULATION,
                        ],
                        otherwise: &[],
                    },
                ],
            )),
        ),
        FieldSpec::new(
            &["member", "ip_peer"],
            FieldKind::Entries(Template::new(
                "member.ip_peer",
                &[
                    Piece::Text("member "),
                    Piece::Slot(&["address"]),
                    Piece::Text(" "),
                    Piece::Slot(&["vc_id"]),
                    ENCAPSULATION,
                ],
            )),
        ),
        value(&["member", "vfi"], &[Piece::Text("member vfi "), Piece::Slot(&[])]),
        value(
            &["member", "access_vfi"],
            &[Piece::Text("member access-vfi "), Piece::Slot(&[])],
        ),
        value(&["member", "vni"], &[Piece::Text("member vni "), Piece::Slot(&[])]),
        FieldSpec::new(
            &["member", "evpn"],
            FieldKind::Paired(Template::new(
                "member.evpn",
                &[
                    Piece::Text("member evpn-instance "),
                    Piece::Slot(&["instance"]),
                    Piece::Text(" vni "),
                    Piece::Slot(&["vni"]),
                    Piece::Flag {
                        when: &["protected"],
                        text: " protected",
                    },
                ],
            )),
        ),
        value(
            &["ipv6", "dhcp", "ldra_attach_policy"],
            &[Piece::Text("ipv6 dhcp ldra attach-policy "), Piece::Slot(&[])],
        ),
        value(&["et_analytics_enable"], &[Piece::Text("et-analytics enable")]),
        policy(&["device_tracking"], "device_tracking", &[Piece::Text("device-tracking"), ATTACH]),
        policy(
            &["ipv6", "destination_guard"],
            "ipv6.destination_guard",
            &[Piece::Text("ipv6 destination-guard"), ATTACH],
        ),
        policy(&["ipv6", "dhcp", "guard"], "ipv6.dhcp.guard", &[Piece::Text("ipv6 dhcp guard"), ATTACH]),
        policy(
            &["ipv6", "nd", "ra_throttler"],
            "ipv6.nd.ra_throttler",
            &[Piece::Text("ipv6 nd ra-throttler"), ATTACH],
        ),
        policy(&["ipv6", "nd", "raguard"], "ipv6.nd.raguard", &[Piece::Text("ipv6 nd raguard"), ATTACH]),
        policy(&["ipv6", "nd", "suppress"], "ipv6.nd.suppress", &[Piece::Text("ipv6 nd suppress"), ATTACH]),
        FieldSpec::new(
            &["mdns_sd_gateway"],
            FieldKind::Gated {
                enable: Template::new("mdns_sd_gateway", &[Piece::Text("mdns-sd gateway")]),
                fields: MDNS_FIELDS,
            },
        ),
    ],
};

// ============================================================================
// Grammar
// ============================================================================

const POLICY_CAPTURES: &[Capture] = &[Capture::present("enable"), Capture::text("attach_policy")];

const fn policy_rule(name: &'static str, pattern: &'static str, path: &'static [&'static str]) -> LineRule {
    LineRule::entity(
        name,
        pattern,
        LineAction::Group {
            path,
            captures: POLICY_CAPTURES,
        },
    )
}

const fn mdns_rule(name: &'static str, pattern: &'static str, path: &'static [&'static str]) -> LineRule {
    LineRule::entity(name, pattern, LineAction::Text { path, group: "value" })
}

/// The `vlan_configuration` resource.
pub static RESOURCE: Resource = Resource {
    kind: ResourceKind::VlanConfiguration,
    description: "VLAN configuration mode",
    schema: Shape::Entries(&VLAN_SCHEMA),
    layout: Layout::Keyed(&VLAN),
    grammar: Grammar {
        rules: &[
            LineRule::entity(
                "vlan",
                r"^vlan configuration (?P<vlan>\S+)\s*$",
                LineAction::Open { key: Some("vlan") },
            ),
            LineRule::entity(
                "member.vfi",
                r"^ member vfi (?P<vfi>\S+)\s*$",
                LineAction::Text {
                    path: &["member", "vfi"],
                    group: "vfi",
                },
            ),
            LineRule::entity(
                "member.access_vfi",
                r"^ member access-vfi (?P<access_vfi>\S+)\s*$",
                LineAction::Text {
                    path: &["member", "access_vfi"],
                    group: "access_vfi",
                },
            ),
            LineRule::entity(
                "member.vni",
                r"^ member vni (?P<vni>\S+)\s*$",
                LineAction::Text {
                    path: &["member", "vni"],
                    group: "vni",
                },
            ),
            LineRule::entity(
                "member.evpn",
                r"^ member evpn-instance (?P<instance>\S+) vni (?P<vni>\S+)(?P<protected> protected)?\s*$",
                LineAction::Group {
                    path: &["member", "evpn"],
                    captures: &[
                        Capture::text("instance"),
                        Capture::text("vni"),
                        Capture::present("protected"),
                    ],
                },
            ),
            LineRule::entity(
                "member.pseudowire",
                r"^ member pseudowire(?P<pwnumber>\d+)(?: (?P<address>\S+) (?P<vc_id>\d+) (?:template (?P<template>\S+)|encapsulation mpls))?\s*$",
                LineAction::Entry {
                    path: &["member", "pseudowire"],
                    captures: &[
                        Capture::text("pwnumber"),
                        Capture::text("address"),
                        Capture::text("vc_id"),
                        Capture::text("template"),
                    ],
                },
            ),
            LineRule::entity(
                "member.ip_peer",
                r"^ member (?P<address>\d{1,3}(?:\.\d{1,3}){3}) (?P<vc_id>\d+) (?:template (?P<template>\S+)|encapsulation mpls)\s*$",
                LineAction::Entry {
                    path: &["member", "ip_peer"],
                    captures: &[
                        Capture::text("address"),
                        Capture::text("vc_id"),
                        Capture::text("template"),
                    ],
                },
            ),
            policy_rule(
                "device_tracking",
                r"^ (?P<enable>device-tracking)(?: attach-policy (?P<attach_policy>\S+))?\s*$",
                &["device_tracking"],
            ),
            policy_rule(
                "ipv6.destination_guard",
                r"^ ipv6 (?P<enable>destination-guard)(?: attach-policy (?P<attach_policy>\S+))?\s*$",
                &["ipv6", "destination_guard"],
            ),
            policy_rule(
                "ipv6.dhcp.guard",
                r"^ ipv6 dhcp (?P<enable>guard)(?: attach-policy (?P<attach_policy>\S+))?\s*$",
                &["ipv6", "dhcp", "guard"],
            ),
            policy_rule(
                "ipv6.nd.ra_throttler",
                r"^ ipv6 nd (?P<enable>ra-throttler)(?: attach-policy (?P<attach_policy>\S+))?\s*$",
                &["ipv6", "nd", "ra_throttler"],
            ),
            policy_rule(
                "ipv6.nd.raguard",
                r"^ ipv6 nd (?P<enable>raguard)(?: attach-policy (?P<attach_policy>\S+))?\s*$",
                &["ipv6", "nd", "raguard"],
            ),
            policy_rule(
                "ipv6.nd.suppress",
                r"^ ipv6 nd (?P<enable>suppress)(?: attach-policy (?P<attach_policy>\S+))?\s*$",
                &["ipv6", "nd", "suppress"],
            ),
            LineRule::entity(
                "ipv6.dhcp.ldra_attach_policy",
                r"^ ipv6 dhcp ldra attach-policy (?P<policy>\S+)\s*$",
                LineAction::Text {
                    path: &["ipv6", "dhcp", "ldra_attach_policy"],
                    group: "policy",
                },
            ),
            LineRule::entity(
                "et_analytics_enable",
                r"^ et-analytics enable\s*$",
                LineAction::Flag(&["et_analytics_enable"]),
            ),
            LineRule::entity(
                "mdns_sd_gateway",
                r"^ mdns-sd gateway\s*$",
                LineAction::Flag(&["mdns_sd_gateway", "enable"]),
            ),
            mdns_rule(
                "mdns_sd_gateway.active_query_timer",
                r"^  active-query timer (?P<value>\d+)\s*$",
                &["mdns_sd_gateway", "active_query_timer"],
            ),
            mdns_rule(
                "mdns_sd_gateway.transport",
                r"^  transport (?P<value>\S+)\s*$",
                &["mdns_sd_gateway", "transport"],
            ),
            mdns_rule(
                "mdns_sd_gateway.service_inst_suffix",
                r"^  service-inst-suffix (?P<value>\S+)\s*$",
                &["mdns_sd_gateway", "service_inst_suffix"],
            ),
            mdns_rule(
                "mdns_sd_gateway.service_mdns_query",
                r"^  service-mdns-query (?P<value>\S+)\s*$",
                &["mdns_sd_gateway", "service_mdns_query"],
            ),
            mdns_rule(
                "mdns_sd_gateway.source_interface",
                r"^  source-interface (?P<value>\S+)\s*$",
                &["mdns_sd_gateway", "source_interface"],
            ),
            mdns_rule(
                "mdns_sd_gateway.sdg_agent",
                r"^  sdg-agent (?P<value>\S+)\s*$",
                &["mdns_sd_gateway", "sdg_agent"],
            ),
            mdns_rule(
                "mdns_sd_gateway.service_policy",
                r"^  service-policy (?P<value>\S+)\s*$",
                &["mdns_sd_gateway", "service_policy"],
            ),
        ],
    },
};
