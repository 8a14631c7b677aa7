//! Command line templates.
//!
//! A template is a static list of [`Piece`]s rendered against a scope. The
//! set of conditional forms is closed: an optional clause chosen by which
//! sibling fields are present, and a flag suffix emitted for a true boolean.

use crate::error::TemplateError;
use crate::tree::{ConfigTree, Value};

/// One piece of a command template.
#[derive(Debug, Clone, Copy)]
pub enum Piece {
    /// Literal text.
    Text(&'static str),
    /// Scalar looked up in scope; the empty path is the scope itself.
    Slot(&'static [&'static str]),
    /// `then` when every path in `when` is set, `otherwise` when not.
    IfAll {
        /// Paths that must all be set.
        when: &'static [&'static [&'static str]],
        /// Pieces rendered when they are.
        then: &'static [Piece],
        /// Pieces rendered when they are not.
        otherwise: &'static [Piece],
    },
    /// `text` when the boolean at `when` is true.
    Flag {
        /// Boolean path.
        when: &'static [&'static str],
        /// Suffix to append.
        text: &'static str,
    },
}

/// A named command template.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    /// Name used in diagnostics.
    pub name: &'static str,
    /// Pieces in output order.
    pub pieces: &'static [Piece],
}

/// What a template is rendered against.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    /// A single value (a leaf, a set element, or a field group).
    Value(&'a Value),
    /// An entity.
    Tree(&'a ConfigTree),
}

impl Scope<'_> {
    fn lookup(&self, path: &[&str]) -> Option<&Value> {
        match self {
            Self::Value(value) => value.lookup(path),
            Self::Tree(tree) => tree.lookup(path),
        }
    }

    fn is_set(&self, path: &[&str]) -> bool {
        self.lookup(path)
            .is_some_and(|v| !matches!(v, Value::Bool(false)) && !v.is_empty())
    }
}

impl Template {
    /// Declares a template.
    #[must_use]
    pub const fn new(name: &'static str, pieces: &'static [Piece]) -> Self {
        Self { name, pieces }
    }

    /// Renders the positive form of the command.
    ///
    /// # Errors
    ///
    /// Returns an error if a slot is unbound or not a scalar.
    pub fn render(&self, scope: Scope<'_>) -> Result<String, TemplateError> {
        let mut line = String::new();
        self.render_pieces(self.pieces, scope, &mut line)?;
        Ok(line)
    }

    fn render_pieces(
        &self,
        pieces: &[Piece],
        scope: Scope<'_>,
        line: &mut String,
    ) -> Result<(), TemplateError> {
        for piece in pieces {
            match piece {
                Piece::Text(text) => line.push_str(text),
                Piece::Slot(path) => {
                    let value = scope
                        .lookup(path)
                        .ok_or_else(|| TemplateError::unbound(self.name, placeholder(path)))?;
                    let text = value.scalar_text().ok_or_else(|| TemplateError::NotScalar {
                        template: self.name.to_string(),
                        placeholder: placeholder(path),
                    })?;
                    line.push_str(&text);
                }
                Piece::IfAll {
                    when,
                    then,
                    otherwise,
                } => {
                    let branch = if when.iter().all(|path| scope.is_set(path)) {
                        then
                    } else {
                        otherwise
                    };
                    self.render_pieces(branch, scope, line)?;
                }
                Piece::Flag { when, text } => {
                    if scope.lookup(when).and_then(Value::as_bool) == Some(true) {
                        line.push_str(text);
                    }
                }
            }
        }
        Ok(())
    }
}

fn placeholder(path: &[&str]) -> String {
    if path.is_empty() {
        String::from("value")
    } else {
        path.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTER_ID: Template = Template::new(
        "router_id",
        &[Piece::Text("router-id "), Piece::Slot(&[])],
    );

    const IP_PEER: Template = Template::new(
        "ip_peer",
        &[
            Piece::Text("member "),
            Piece::Slot(&["address"]),
            Piece::Text(" "),
            Piece::Slot(&["vc_id"]),
            Piece::IfAll {
                when: &[&["template"]],
                then: &[Piece::Text(" template "), Piece::Slot(&["template"])],
                otherwise: &[Piece::Text(" encapsulation mpls")],
            },
        ],
    );

    const EVPN: Template = Template::new(
        "evpn",
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
    );

    fn tree(pairs: &[(&str, Value)]) -> ConfigTree {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_render_scalar_scope() {
        let value = Value::from("4.4.4.4");
        assert_eq!(
            ROUTER_ID.render(Scope::Value(&value)).unwrap(),
            "router-id 4.4.4.4"
        );
    }

    #[test]
    fn test_optional_clause_prefers_template() {
        let with_template = tree(&[
            ("address", Value::from("4.4.4.4")),
            ("vc_id", Value::from("423")),
            ("template", Value::from("ip_peer_template")),
        ]);
        assert_eq!(
            IP_PEER.render(Scope::Tree(&with_template)).unwrap(),
            "member 4.4.4.4 423 template ip_peer_template"
        );

        let without = tree(&[
            ("address", Value::from("4.4.4.4")),
            ("vc_id", Value::from("423")),
        ]);
        assert_eq!(
            IP_PEER.render(Scope::Tree(&without)).unwrap(),
            "member 4.4.4.4 423 encapsulation mpls"
        );
    }

    #[test]
    fn test_flag_suffix() {
        let protected = tree(&[
            ("instance", Value::from("101")),
            ("vni", Value::from("10101")),
            ("protected", Value::Bool(true)),
        ]);
        assert_eq!(
            EVPN.render(Scope::Tree(&protected)).unwrap(),
            "member evpn-instance 101 vni 10101 protected"
        );

        let plain = tree(&[
            ("instance", Value::from("101")),
            ("vni", Value::from("10101")),
            ("protected", Value::Bool(false)),
        ]);
        assert_eq!(
            EVPN.render(Scope::Tree(&plain)).unwrap(),
            "member evpn-instance 101 vni 10101"
        );
    }

    #[test]
    fn test_unbound_placeholder() {
        let partial = tree(&[("address", Value::from("4.4.4.4"))]);
        let err = IP_PEER.render(Scope::Tree(&partial)).unwrap_err();
        assert_eq!(
            err,
            TemplateError::Unbound {
                template: String::from("ip_peer"),
                placeholder: String::from("vc_id"),
            }
        );
    }

    #[test]
    fn test_structured_slot_is_rejected() {
        let nested = tree(&[("address", Value::Tree(ConfigTree::new()))]);
        let err = IP_PEER.render(Scope::Tree(&nested)).unwrap_err();
        assert!(matches!(err, TemplateError::NotScalar { .. }));
    }
}
