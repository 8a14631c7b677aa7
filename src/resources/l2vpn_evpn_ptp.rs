//! Point-to-point EVPN instances (`l2vpn evpn instance N point-to-point`).
//!
//! Instances are keyed by `instance` and hold keyed `vpws context` blocks.
//! Removing an instance asks for confirmation, so its removal is a prompted
//! record. `auto-route-target` is on unless the device says otherwise.

use crate::config::{DictSchema, EntrySchema, Param, Shape};
use crate::device::{Capture, Grammar, LineAction, LineRule};
use crate::planner::{BlockSpec, DeleteMatch, FieldKind, FieldSpec, Layout, Piece, Removal, Template};

use super::{Resource, ResourceKind};

static SERVICE: DictSchema = DictSchema::new(&[
    Param::new("target", Shape::Str),
    Param::new("source", Shape::Str),
])
.together(&[&["target", "source"]]);

static CONTEXT_SCHEMA: EntrySchema = EntrySchema {
    entity: "vpws context",
    key: &["context"],
    item: DictSchema::new(&[
        Param::new("context", Shape::Str).required(),
        Param::new("service", Shape::Dict(&SERVICE)),
        Param::new("member", Shape::Str),
        Param::new("remote_link_failure_notification", Shape::Bool),
        Param::new("shutdown", Shape::Bool),
    ]),
};

static INSTANCE_SCHEMA: EntrySchema = EntrySchema {
    entity: "instance",
    key: &["instance"],
    item: DictSchema::new(&[
        Param::new("instance", Shape::Str).required(),
        Param::new("route_target_import", Shape::StrList),
        Param::new("route_target_export", Shape::StrList),
        Param::new("auto_route_target", Shape::Bool).default_bool(true),
        Param::new("rd", Shape::Str),
        Param::new("vpws_context", Shape::Entries(&CONTEXT_SCHEMA)),
    ]),
};

static CONTEXT: BlockSpec = BlockSpec {
    name: "vpws context",
    enter: Template::new(
        "vpws_context",
        &[Piece::Text("vpws context "), Piece::Slot(&["context"])],
    ),
    removal: Removal::Plain,
    purge_whole: true,
    delete_match: DeleteMatch::Exact,
    fields: &[
        FieldSpec::new(
            &["service"],
            FieldKind::Paired(Template::new(
                "service",
                &[
                    Piece::Text("service target "),
                    Piece::Slot(&["target"]),
                    Piece::Text(" source "),
                    Piece::Slot(&["source"]),
                ],
            )),
        ),
        FieldSpec::new(
            &["member"],
            FieldKind::Exclusive(Template::new("member", &[Piece::Text("member "), Piece::Slot(&[])])),
        ),
        FieldSpec::new(
            &["remote_link_failure_notification"],
            FieldKind::Linear(Template::new(
                "remote_link_failure_notification",
                &[Piece::Text("remote link failure notification")],
            )),
        ),
        FieldSpec::new(
            &["shutdown"],
            FieldKind::Linear(Template::new("shutdown", &[Piece::Text("shutdown")])),
        ),
    ],
};

static INSTANCE: BlockSpec = BlockSpec {
    name: "instance",
    enter: Template::new(
        "instance",
        &[
            Piece::Text("l2vpn evpn instance "),
            Piece::Slot(&["instance"]),
            Piece::Text(" point-to-point"),
        ],
    ),
    removal: Removal::Prompted,
    purge_whole: true,
    delete_match: DeleteMatch::Exact,
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
        FieldSpec::new(
            &["auto_route_target"],
            FieldKind::DefaultOn(Template::new(
                "auto_route_target",
                &[Piece::Text("auto-route-target")],
            )),
        ),
        FieldSpec::new(
            &["rd"],
            FieldKind::Linear(Template::new("rd", &[Piece::Text("rd "), Piece::Slot(&[])])),
        ),
        FieldSpec::new(&["vpws_context"], FieldKind::Nested(&CONTEXT)),
    ],
};

/// The `l2vpn_evpn_ptp` resource.
pub static RESOURCE: Resource = Resource {
    kind: ResourceKind::L2vpnEvpnPtp,
    description: "Point-to-point EVPN instances",
    schema: Shape::Entries(&INSTANCE_SCHEMA),
    layout: Layout::Keyed(&INSTANCE),
    grammar: Grammar {
        rules: &[
            LineRule::entity(
                "instance",
                r"^l2vpn evpn instance (?P<instance>\S+) point-to-point\s*$",
                LineAction::Open {
                    key: Some("instance"),
                },
            ),
            LineRule::entity(
                "rd",
                r"^ rd (?P<rd>\S+)\s*$",
                LineAction::Text {
                    path: &["rd"],
                    group: "rd",
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
                "vpws_context",
                r"^ vpws context (?P<context>\S+)\s*$",
                LineAction::OpenNested {
                    path: &["vpws_context"],
                    key: "context",
                },
            ),
            LineRule::nested(
                "service",
                r"^  service target (?P<target>\S+) source (?P<source>\S+)\s*$",
                LineAction::Group {
                    path: &["service"],
                    captures: &[Capture::text("target"), Capture::text("source")],
                },
            ),
            LineRule::nested(
                "member",
                r"^  member (?P<member>\S+)\s*$",
                LineAction::Text {
                    path: &["member"],
                    group: "member",
                },
            ),
            LineRule::nested(
                "remote_link_failure_notification",
                r"^  (?P<negated>no )?remote link failure notification\s*$",
                LineAction::Flag(&["remote_link_failure_notification"]),
            ),
            LineRule::nested("shutdown", r"^  shutdown\s*$", LineAction::Flag(&["shutdown"])),
        ],
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Mode, TaskDocument};
    use crate::reconciler::Reconciler;
    use crate::resources::testing::{commands, parsed};
    use pretty_assertions::assert_eq;

    const DEVICE: &str = "\
l2vpn evpn instance 123 point-to-point
 rd 222:222
 route-target export 33:44
 route-target import 33:44
 no auto-route-target
 vpws context TEST
  service target 44 source 77
  member Vlan10
  remote link failure notification
 !
 vpws context TEST2
  member Vlan11
  remote link failure notification
  shutdown
 !
l2vpn evpn instance 124 point-to-point
 rd 333:333
 route-target export 43:45
 route-target import 43:45
 route-target export 45:55
 route-target import 45:55
 vpws context TEST3
  member Vlan12
  remote link failure notification
  shutdown
 !
 vpws context TEST4
  service target 55 source 55
  member Vlan14
  remote link failure notification
 !
";

    fn device_config() -> serde_json::Value {
        serde_json::json!([
            {
                "instance": "123",
                "rd": "222:222",
                "auto_route_target": false,
                "route_target_import": ["33:44"],
                "route_target_export": ["33:44"],
                "vpws_context": [
                    {
                        "context": "TEST",
                        "service": {"target": "44", "source": "77"},
                        "member": "Vlan10",
                        "remote_link_failure_notification": true,
                    },
                    {
                        "context": "TEST2",
                        "member": "Vlan11",
                        "remote_link_failure_notification": true,
                        "shutdown": true,
                    },
                ],
            },
            {
                "instance": "124",
                "rd": "333:333",
                "auto_route_target": true,
                "route_target_import": ["43:45", "45:55"],
                "route_target_export": ["43:45", "45:55"],
                "vpws_context": [
                    {
                        "context": "TEST3",
                        "member": "Vlan12",
                        "remote_link_failure_notification": true,
                        "shutdown": true,
                    },
                    {
                        "context": "TEST4",
                        "service": {"target": "55", "source": "55"},
                        "member": "Vlan14",
                        "remote_link_failure_notification": true,
                    },
                ],
            },
        ])
    }

    #[test]
    fn test_gathered() {
        assert_eq!(parsed(ResourceKind::L2vpnEvpnPtp, DEVICE), device_config());
    }

    #[test]
    fn test_rendered() {
        assert_eq!(
            commands(ResourceKind::L2vpnEvpnPtp, device_config(), "", Mode::Rendered),
            vec![
                "l2vpn evpn instance 123 point-to-point",
                "route-target import 33:44",
                "route-target export 33:44",
                "no auto-route-target",
                "rd 222:222",
                "vpws context TEST",
                "service target 44 source 77",
                "member Vlan10",
                "remote link failure notification",
                "exit",
                "vpws context TEST2",
                "member Vlan11",
                "remote link failure notification",
                "shutdown",
                "exit",
                "exit",
                "l2vpn evpn instance 124 point-to-point",
                "route-target import 43:45",
                "route-target import 45:55",
                "route-target export 43:45",
                "route-target export 45:55",
                "rd 333:333",
                "vpws context TEST3",
                "member Vlan12",
                "remote link failure notification",
                "shutdown",
                "exit",
                "vpws context TEST4",
                "service target 55 source 55",
                "member Vlan14",
                "remote link failure notification",
                "exit",
                "exit",
            ]
        );
    }

    #[test]
    fn test_merged() {
        let want = serde_json::json!([{
            "instance": "124",
            "rd": "333:333",
            "auto_route_target": true,
            "route_target_import": ["88:88"],
            "route_target_export": ["88:88"],
            "vpws_context": [
                {
                    "context": "TEST3",
                    "member": "Vlan12",
                    "remote_link_failure_notification": true,
                    "shutdown": true,
                },
                {
                    "context": "TEST4",
                    "service": {"target": "55", "source": "55"},
                    "member": "Vlan11",
                    "remote_link_failure_notification": true,
                },
            ],
        }]);
        assert_eq!(
            commands(ResourceKind::L2vpnEvpnPtp, want, DEVICE, Mode::Merged),
            vec![
                "l2vpn evpn instance 124 point-to-point",
                "route-target import 88:88",
                "route-target export 88:88",
                "vpws context TEST4",
                "no member Vlan14",
                "member Vlan11",
                "exit",
                "exit",
            ]
        );
    }

    #[test]
    fn test_merged_idempotent() {
        assert!(commands(ResourceKind::L2vpnEvpnPtp, device_config(), DEVICE, Mode::Merged).is_empty());
        assert!(commands(ResourceKind::L2vpnEvpnPtp, device_config(), DEVICE, Mode::Replaced).is_empty());
    }

    #[test]
    fn test_replaced() {
        let want = serde_json::json!([{
            "instance": "124",
            "rd": "333:333",
            "auto_route_target": false,
            "route_target_import": ["43:45"],
            "route_target_export": ["43:45"],
            "vpws_context": [
                {
                    "context": "TEST3",
                    "member": "Vlan11",
                    "remote_link_failure_notification": false,
                    "shutdown": false,
                },
                {
                    "context": "TEST4",
                    "service": {"target": "55", "source": "55"},
                    "member": "Vlan14",
                    "remote_link_failure_notification": true,
                },
            ],
        }]);
        assert_eq!(
            commands(ResourceKind::L2vpnEvpnPtp, want, DEVICE, Mode::Replaced),
            vec![
                "no l2vpn evpn instance 123 point-to-point [yes/no: yes]",
                "l2vpn evpn instance 124 point-to-point",
                "no route-target import 45:55",
                "no route-target export 45:55",
                "no auto-route-target",
                "vpws context TEST3",
                "no member Vlan12",
                "member Vlan11",
                "no remote link failure notification",
                "no shutdown",
                "exit",
                "exit",
            ]
        );
    }

    #[test]
    fn test_replaced_removes_unlisted_contexts() {
        let want = serde_json::json!([{
            "instance": "124",
            "rd": "333:333",
            "route_target_import": ["43:45", "45:55"],
            "route_target_export": ["43:45", "45:55"],
            "vpws_context": [{
                "context": "TEST4",
                "service": {"target": "55", "source": "55"},
                "member": "Vlan14",
                "remote_link_failure_notification": true,
            }],
        }]);
        let device = DEVICE.split_once("l2vpn evpn instance 124").map(|(_, rest)| format!("l2vpn evpn instance 124{rest}"));
        assert_eq!(
            commands(ResourceKind::L2vpnEvpnPtp, want, &device.unwrap(), Mode::Replaced),
            vec![
                "l2vpn evpn instance 124 point-to-point",
                "no vpws context TEST3",
                "exit",
            ]
        );
    }

    #[test]
    fn test_deleted() {
        let want = serde_json::json!([
            {
                "instance": "123",
                "rd": "222:222",
                "auto_route_target": false,
                "route_target_import": ["33:44"],
                "route_target_export": ["33:44"],
                "vpws_context": [
                    {"context": "TEST", "service": {"target": "44", "source": "77"}},
                    {
                        "context": "TEST2",
                        "member": "Vlan11",
                        "remote_link_failure_notification": true,
                        "shutdown": true,
                    },
                ],
            },
            device_config()[1].clone(),
        ]);
        assert_eq!(
            commands(ResourceKind::L2vpnEvpnPtp, want, DEVICE, Mode::Deleted),
            vec![
                "no l2vpn evpn instance 124 point-to-point [yes/no: yes]",
                "l2vpn evpn instance 123 point-to-point",
                "no route-target import 33:44",
                "no route-target export 33:44",
                "auto-route-target",
                "no rd 222:222",
                "no vpws context TEST2",
                "vpws context TEST",
                "no service target 44 source 77",
                "exit",
                "exit",
            ]
        );
    }

    #[test]
    fn test_deleted_all_as_prompted_records() {
        let device = "l2vpn evpn instance 123 point-to-point\nl2vpn evpn instance 124 point-to-point\n";
        let reconciler = Reconciler::for_kind(ResourceKind::L2vpnEvpnPtp);
        let document = TaskDocument::new(ResourceKind::L2vpnEvpnPtp, Mode::Deleted)
            .with_config(serde_json::json!([]));
        let outcome = reconciler.run(&document, Some(device)).unwrap();

        assert!(outcome.changed);
        assert_eq!(
            serde_json::to_value(&outcome.plan.commands).unwrap(),
            serde_json::json!([
                {"command": "no l2vpn evpn instance 123 point-to-point", "prompt": "yes/no", "answer": "yes"},
                {"command": "no l2vpn evpn instance 124 point-to-point", "prompt": "yes/no", "answer": "yes"},
            ])
        );
    }

    #[test]
    fn test_duplicate_instance_is_rejected() {
        let reconciler = Reconciler::for_kind(ResourceKind::L2vpnEvpnPtp);
        let raw = crate::tree::Value::from_json(&serde_json::json!([
            {"instance": "1", "rd": "1:1"},
            {"instance": "1", "rd": "2:2"},
        ]));
        let err = reconciler.prepare(raw.as_ref()).unwrap_err();
        assert!(err.is_input_fault());
        assert!(err.to_string().contains("Duplicate instance identifier '1'"));
    }
}
