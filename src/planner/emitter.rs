//! Command emitter.
//!
//! Turns decisions into command lines. Negations restate the value the
//! device holds (`no ` + the have rendering), block removals are `no ` +
//! the enter command, and sub-block output is wrapped in enter / `exit`
//! only when it is non-empty.

use crate::error::TemplateError;
use crate::tree::{ConfigTree, Value};

use super::diff::{Decision, Source};
use super::fields::{BlockSpec, Removal};
use super::plan::Command;
use super::template::{Scope, Template};

/// Renders the positive form of a command.
///
/// # Errors
///
/// Returns an error if the template cannot be rendered.
pub fn positive(template: &Template, scope: Scope<'_>) -> Result<Command, TemplateError> {
    template.render(scope).map(Command::Plain)
}

/// Renders the negated form of a command.
///
/// # Errors
///
/// Returns an error if the template cannot be rendered.
pub fn negative(template: &Template, scope: Scope<'_>) -> Result<Command, TemplateError> {
    template
        .render(scope)
        .map(|line| Command::Plain(format!("no {line}")))
}

/// Renders the commands a decision calls for.
///
/// # Errors
///
/// Returns an error if a required scope is absent or a template cannot be
/// rendered.
pub fn emit(
    template: &Template,
    decision: Decision,
    want: Option<Scope<'_>>,
    have: Option<Scope<'_>>,
) -> Result<Vec<Command>, TemplateError> {
    Ok(match decision {
        Decision::NoOp => Vec::new(),
        Decision::Set(Source::Want) => vec![positive(template, side(template, want)?)?],
        Decision::Set(Source::Have) => vec![positive(template, side(template, have)?)?],
        Decision::Unset => vec![negative(template, side(template, have)?)?],
        Decision::Replace => vec![
            negative(template, side(template, have)?)?,
            positive(template, side(template, want)?)?,
        ],
    })
}

fn side<'a>(template: &Template, scope: Option<Scope<'a>>) -> Result<Scope<'a>, TemplateError> {
    scope.ok_or_else(|| TemplateError::unbound(template.name, "value"))
}

/// Renders a decision on a single value.
///
/// # Errors
///
/// Returns an error if the template cannot be rendered.
pub fn emit_values(
    template: &Template,
    decision: Decision,
    want: Option<&Value>,
    have: Option<&Value>,
) -> Result<Vec<Command>, TemplateError> {
    emit(template, decision, want.map(Scope::Value), have.map(Scope::Value))
}

/// Renders the command entering a block.
///
/// # Errors
///
/// Returns an error if the identifying fields are absent.
pub fn enter(block: &BlockSpec, entity: &ConfigTree) -> Result<Command, TemplateError> {
    positive(&block.enter, Scope::Tree(entity))
}

/// Renders the command removing a whole block.
///
/// # Errors
///
/// Returns an error if the identifying fields are absent.
pub fn removal(block: &BlockSpec, entity: &ConfigTree) -> Result<Command, TemplateError> {
    let line = format!("no {}", block.enter.render(Scope::Tree(entity))?);
    Ok(match block.removal {
        Removal::Plain => Command::Plain(line),
        Removal::Prompted => Command::prompted(line),
    })
}

/// Wraps inner commands in enter / `exit`, or yields nothing when there are
/// none.
#[must_use]
pub fn bracket(enter: Command, inner: Vec<Command>) -> Vec<Command> {
    if inner.is_empty() {
        return inner;
    }
    let mut out = Vec::with_capacity(inner.len() + 2);
    out.push(enter);
    out.extend(inner);
    out.push(Command::exit());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::fields::DeleteMatch;
    use crate::planner::template::Piece;
    use pretty_assertions::assert_eq;

    const POLICY: Template = Template::new(
        "ipv6_dhcp_guard",
        &[
            Piece::Text("ipv6 dhcp guard"),
            Piece::IfAll {
                when: &[&["attach_policy"]],
                then: &[Piece::Text(" attach-policy "), Piece::Slot(&["attach_policy"])],
                otherwise: &[],
            },
        ],
    );

    const MEMBER: Template = Template::new("member", &[Piece::Text("member "), Piece::Slot(&[])]);

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
        fields: &[],
    };

    fn policy(enable: bool, name: &str) -> Value {
        let mut tree = ConfigTree::new();
        tree.insert("enable", Value::Bool(enable));
        tree.insert("attach_policy", Value::from(name));
        Value::Tree(tree)
    }

    #[test]
    fn test_negation_restates_have() {
        let want = policy(false, "TEST");
        let have = policy(true, "TEST2");
        let commands = emit_values(&POLICY, Decision::Unset, Some(&want), Some(&have)).unwrap();
        assert_eq!(
            commands,
            vec![Command::plain("no ipv6 dhcp guard attach-policy TEST2")]
        );
    }

    #[test]
    fn test_replace_negates_first() {
        let want = Value::from("Vlan11");
        let have = Value::from("Vlan14");
        let commands =
            emit_values(&MEMBER, Decision::Replace, Some(&want), Some(&have)).unwrap();
        assert_eq!(
            commands,
            vec![Command::plain("no member Vlan14"), Command::plain("member Vlan11")]
        );
    }

    #[test]
    fn test_missing_side_is_an_error() {
        let err = emit_values(&MEMBER, Decision::Unset, None, None).unwrap_err();
        assert!(matches!(err, TemplateError::Unbound { .. }));
    }

    #[test]
    fn test_prompted_removal() {
        let mut entity = ConfigTree::new();
        entity.insert("instance", Value::from("123"));
        assert_eq!(
            removal(&INSTANCE, &entity).unwrap(),
            Command::prompted("no l2vpn evpn instance 123 point-to-point")
        );
        assert_eq!(
            enter(&INSTANCE, &entity).unwrap(),
            Command::plain("l2vpn evpn instance 123 point-to-point")
        );
    }

    #[test]
    fn test_bracket_suppresses_empty_blocks() {
        assert!(bracket(Command::plain("l2vpn"), Vec::new()).is_empty());
        assert_eq!(
            bracket(Command::plain("l2vpn"), vec![Command::plain("shutdown")]),
            vec![
                Command::plain("l2vpn"),
                Command::plain("shutdown"),
                Command::exit()
            ]
        );
    }
}
