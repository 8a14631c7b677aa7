//! Global L2VPN settings (`l2vpn`).

use crate::config::{DictSchema, Param, Shape};
use crate::device::{Grammar, LineAction, LineRule};
use crate::planner::{BlockSpec, DeleteMatch, FieldKind, FieldSpec, Layout, Piece, Removal, Template};

use super::{Resource, ResourceKind};

static LOGGING: DictSchema = DictSchema::new(&[
    Param::new("pseudowire_status", Shape::Bool),
    Param::new("redundancy", Shape::Bool),
    Param::new("vc_state", Shape::Bool),
]);

static SCHEMA: DictSchema = DictSchema::new(&[
    Param::new("logging", Shape::Dict(&LOGGING)),
    Param::new("router_id", Shape::Str),
    Param::new("redundancy_predictive_enabled", Shape::Bool),
    Param::new("pseudowire_group_status", Shape::Bool),
    Param::new("shutdown", Shape::Bool),
]);

const fn flag(path: &'static [&'static str], name: &'static str, pieces: &'static [Piece]) -> FieldSpec {
    FieldSpec::new(path, FieldKind::Linear(Template::new(name, pieces)))
}

static BLOCK: BlockSpec = BlockSpec {
    name: "l2vpn",
    enter: Template::new("l2vpn", &[Piece::Text("l2vpn")]),
    removal: Removal::Plain,
    purge_whole: false,
    delete_match: DeleteMatch::Never,
    fields: &[
        flag(
            &["logging", "pseudowire_status"],
            "logging.pseudowire_status",
            &[Piece::Text("logging pseudowire status")],
        ),
        flag(
            &["logging", "redundancy"],
            "logging.redundancy",
            &[Piece::Text("logging redundancy")],
        ),
        flag(
            &["logging", "vc_state"],
            "logging.vc_state",
            &[Piece::Text("logging vc-state")],
        ),
        flag(
            &["router_id"],
            "router_id",
            &[Piece::Text("router-id "), Piece::Slot(&[])],
        ),
        flag(
            &["redundancy_predictive_enabled"],
            "redundancy_predictive_enabled",
            &[Piece::Text("redundancy predictive enabled")],
        ),
        flag(
            &["pseudowire_group_status"],
            "pseudowire_group_status",
            &[Piece::Text("pseudowire group status")],
        ),
        flag(&["shutdown"], "shutdown", &[Piece::Text("shutdown")]),
    ],
};

/// The `l2vpn` resource.
pub static RESOURCE: Resource = Resource {
    kind: ResourceKind::L2vpn,
    description: "Global L2VPN settings",
    schema: Shape::Dict(&SCHEMA),
    layout: Layout::Single(&BLOCK),
    grammar: Grammar {
        rules: &[
            LineRule::entity("l2vpn", r"^l2vpn\s*$", LineAction::Open { key: None }),
            LineRule::entity(
                "logging.pseudowire_status",
                r"^ (?P<negated>no )?logging pseudowire status\s*$",
                LineAction::Flag(&["logging", "pseudowire_status"]),
            ),
            LineRule::entity(
                "logging.redundancy",
                r"^ (?P<negated>no )?logging redundancy\s*$",
                LineAction::Flag(&["logging", "redundancy"]),
            ),
            LineRule::entity(
                "logging.vc_state",
                r"^ (?P<negated>no )?logging vc-state\s*$",
                LineAction::Flag(&["logging", "vc_state"]),
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
                "redundancy_predictive_enabled",
                r"^ redundancy predictive enabled\s*$",
                LineAction::Flag(&["redundancy_predictive_enabled"]),
            ),
            LineRule::entity(
                "pseudowire_group_status",
                r"^ pseudowire group status\s*$",
                LineAction::Flag(&["pseudowire_group_status"]),
            ),
            LineRule::entity("shutdown", r"^ shutdown\s*$", LineAction::Flag(&["shutdown"])),
        ],
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;
    use crate::resources::testing::{commands, parsed};
    use pretty_assertions::assert_eq;

    const FULL: &str = "\
l2vpn
 logging pseudowire status
 logging redundancy
 logging vc-state
 redundancy predictive enabled
 pseudowire group status
 router-id 4.4.4.4
 shutdown
";

    fn want() -> serde_json::Value {
        serde_json::json!({
            "logging": {"redundancy": false, "vc_state": true},
            "redundancy_predictive_enabled": true,
            "pseudowire_group_status": false,
            "router_id": "4.4.4.4",
            "shutdown": true,
        })
    }

    #[test]
    fn test_parsed() {
        assert_eq!(
            parsed(ResourceKind::L2vpn, FULL),
            serde_json::json!({
                "logging": {"pseudowire_status": true, "redundancy": true, "vc_state": true},
                "redundancy_predictive_enabled": true,
                "pseudowire_group_status": true,
                "router_id": "4.4.4.4",
                "shutdown": true,
            })
        );
    }

    #[test]
    fn test_parse_ignores_other_sections() {
        let text = "l2vpn evpn\n router-id Loopback0\nl2vpn\n router-id 1.1.1.1\n";
        assert_eq!(
            parsed(ResourceKind::L2vpn, text),
            serde_json::json!({"router_id": "1.1.1.1"})
        );
    }

    #[test]
    fn test_rendered() {
        let config = serde_json::json!({
            "logging": {"pseudowire_status": true, "redundancy": true, "vc_state": true},
            "redundancy_predictive_enabled": true,
            "pseudowire_group_status": true,
            "router_id": "4.4.4.4",
            "shutdown": true,
        });
        assert_eq!(
            commands(ResourceKind::L2vpn, config, "", Mode::Rendered),
            vec![
                "l2vpn",
                "logging pseudowire status",
                "logging redundancy",
                "logging vc-state",
                "router-id 4.4.4.4",
                "redundancy predictive enabled",
                "pseudowire group status",
                "shutdown",
                "exit",
            ]
        );
    }

    #[test]
    fn test_merged() {
        let device = "l2vpn\n logging pseudowire status\n logging redundancy\n redundancy predictive enabled\n router-id 5.5.5.5\n";
        assert_eq!(
            commands(ResourceKind::L2vpn, want(), device, Mode::Merged),
            vec![
                "l2vpn",
                "no logging redundancy",
                "logging vc-state",
                "router-id 4.4.4.4",
                "shutdown",
                "exit",
            ]
        );
    }

    #[test]
    fn test_merged_idempotent() {
        let applied = "l2vpn\n logging vc-state\n redundancy predictive enabled\n router-id 4.4.4.4\n shutdown\n";
        assert!(commands(ResourceKind::L2vpn, want(), applied, Mode::Merged).is_empty());
    }

    #[test]
    fn test_replaced() {
        let device = "l2vpn\n logging pseudowire status\n logging redundancy\n redundancy predictive enabled\n router-id 4.4.4.4\n";
        assert_eq!(
            commands(ResourceKind::L2vpn, want(), device, Mode::Replaced),
            vec![
                "l2vpn",
                "no logging pseudowire status",
                "no logging redundancy",
                "logging vc-state",
                "shutdown",
                "exit",
            ]
        );
    }

    #[test]
    fn test_deleted() {
        let device = "l2vpn\n logging pseudowire status\n logging redundancy\n logging vc-state\n redundancy predictive enabled\n router-id 4.4.4.4\n shutdown\n";
        assert_eq!(
            commands(ResourceKind::L2vpn, want(), device, Mode::Deleted),
            vec![
                "l2vpn",
                "no logging vc-state",
                "no router-id 4.4.4.4",
                "no redundancy predictive enabled",
                "no shutdown",
                "exit",
            ]
        );
    }

    #[test]
    fn test_deleted_without_config_clears_everything() {
        let device = "l2vpn\n router-id 4.4.4.4\n shutdown\n";
        assert_eq!(
            commands(ResourceKind::L2vpn, serde_json::json!({}), device, Mode::Deleted),
            vec!["l2vpn", "no router-id 4.4.4.4", "no shutdown", "exit"]
        );
        assert!(commands(ResourceKind::L2vpn, serde_json::json!({}), "", Mode::Deleted).is_empty());
    }
}
